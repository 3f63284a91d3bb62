//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod install;
pub mod uninstall;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use uninstall::UninstallArgs;

/// Blueprint - cross-runtime prompt framework installer
#[derive(Parser, Debug)]
#[command(
    name = "blueprint",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installer for the Blueprint prompt-engineering framework",
    long_about = "Blueprint deploys a meta-prompting, context engineering and spec-driven \
                  development system into the config directories of Claude Code, OpenCode, \
                  Gemini, and Cursor, converting commands and agents to each runtime's format.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  blueprint install --claude --global    \x1b[90m# Install for Claude Code globally\x1b[0m\n   \
                  blueprint install --all --global       \x1b[90m# Install for every runtime\x1b[0m\n   \
                  blueprint install --claude --local     \x1b[90m# Install into ./.claude of this project\x1b[0m\n   \
                  blueprint install -g -c ~/.claude-bc   \x1b[90m# Install to a custom config directory\x1b[0m\n   \
                  blueprint uninstall --claude --global  \x1b[90m# Remove Blueprint from Claude Code\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install Blueprint into one or more runtimes
    Install(InstallArgs),

    /// Remove Blueprint files from a runtime
    Uninstall(UninstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
