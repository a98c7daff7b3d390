//! `Forsooth` - Ye Olde English speech rewriting and scoped countdown
//! timers for roleplay chat servers.
//!
//! Two feature slices of a larger roleplay server live here: the
//! data-driven speech transformation engine ([`speech::SpeechEngine`])
//! and the per-scope countdown timer with queued command execution
//! ([`timer::Timer`]). The surrounding server (transport, client
//! registry, command framework) is consumed through the narrow traits
//! in [`timer`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod rules;
pub mod speech;
pub mod timer;
