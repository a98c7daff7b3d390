//! Subcommand handlers.

pub mod check;
pub mod speak;
pub mod timer;
