//! Blueprint - cross-runtime prompt framework installer
//!
//! Deploys the Blueprint command, agent and workflow files into the config
//! directories of Claude Code, OpenCode, Gemini and Cursor, converting each
//! document to the runtime's own command format.

use clap::Parser;

mod cli;
mod commands;
mod common;
mod error;
mod hash;
mod installer;
mod operations;
mod progress;
mod runtime;
mod settings;
mod source;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(args),
        Commands::Uninstall(args) => commands::uninstall::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
