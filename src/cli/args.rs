//! Argument definitions for the `forsooth` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::logging::LogFormat;

/// Ye Olde English speech rewriter and timer runner.
#[derive(Debug, Parser)]
#[command(name = "forsooth", version, about)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "human", global = true, env = "FORSOOTH_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a rule document and report its table sizes
    Check {
        /// Path to the JSON rule document
        rules: PathBuf,
    },

    /// Rewrite stdin lines into Ye Olde English
    Speak {
        /// Path to the JSON rule document
        rules: PathBuf,

        /// Fixed RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a demonstration countdown timer in-process
    Timer {
        /// Countdown duration, e.g. "90s" or "2m 30s"
        #[arg(long, value_parser = humantime::parse_duration)]
        duration: Duration,

        /// Timer id (0 is the global timer, 1-20 are scope-local)
        #[arg(long, default_value_t = 0)]
        id: u8,

        /// Command to queue for expiry; repeatable
        #[arg(long = "command")]
        commands: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_check() {
        let cli = Cli::try_parse_from(["forsooth", "check", "rules.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_speak_with_seed() {
        let cli =
            Cli::try_parse_from(["forsooth", "-vv", "speak", "rules.json", "--seed", "9"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Speak { seed, .. } => assert_eq!(seed, Some(9)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_timer_with_commands() {
        let cli = Cli::try_parse_from([
            "forsooth",
            "timer",
            "--duration",
            "90s",
            "--id",
            "3",
            "--command",
            "play waltz.opus",
            "--command",
            "announce court is back in session",
        ])
        .unwrap();
        match cli.command {
            Command::Timer {
                duration,
                id,
                commands,
            } => {
                assert_eq!(duration, Duration::from_secs(90));
                assert_eq!(id, 3);
                assert_eq!(commands.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn timer_rejects_unparsable_duration() {
        assert!(Cli::try_parse_from(["forsooth", "timer", "--duration", "soon"]).is_err());
    }
}
