pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "clerky",
    about = "Clerky retail support assistant CLI",
    long_about = "Run support turns against the configured completion provider, inspect configuration, and check runtime readiness.",
    after_help = "Examples:\n  clerky ask \"Do you have the iPhone 15 Pro in stock?\"\n  clerky chat\n  clerky doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run one support turn and print the composed reply")]
    Ask {
        #[arg(help = "The customer message to answer")]
        message: String,
    },
    #[command(about = "Interactive session: one message per line on stdin, one reply per turn")]
    Chat,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, completion credentials, and catalog integrity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { message } => commands::ask::run(&message),
        Command::Chat => commands::chat::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
