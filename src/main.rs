//! Binary entrypoint for `forsooth`.

use clap::Parser;

use forsooth::cli::args::{Cli, Command};
use forsooth::cli::commands;
use forsooth::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, cli.verbose);

    let code = match cli.command {
        Command::Check { rules } => commands::check::run(&rules),
        Command::Speak { rules, seed } => commands::speak::run(&rules, seed),
        Command::Timer {
            duration,
            id,
            commands,
        } => commands::timer::run(duration, id, commands).await,
    };

    std::process::exit(code);
}
