use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Interactive install (prompts for runtime and location):\n    blueprint install\n\n\
                  Install for Claude Code globally:\n    blueprint install --claude --global\n\n\
                  Install for all runtimes globally:\n    blueprint install --all --global\n\n\
                  Install to a custom config directory:\n    blueprint install --claude --global --config-dir ~/.claude-bc\n\n\
                  Install into the current project only:\n    blueprint install --claude --local")]
pub struct InstallArgs {
    /// Install for Claude Code
    #[arg(long)]
    pub claude: bool,

    /// Install for OpenCode
    #[arg(long)]
    pub opencode: bool,

    /// Install for Gemini
    #[arg(long)]
    pub gemini: bool,

    /// Install for Cursor
    #[arg(long)]
    pub cursor: bool,

    /// Install for all runtimes
    #[arg(long, conflicts_with_all = ["claude", "opencode", "gemini", "cursor"])]
    pub all: bool,

    /// Install globally (to the runtime's config directory)
    #[arg(long, short = 'g', conflicts_with = "local")]
    pub global: bool,

    /// Install locally (into ./<runtime dir> of the current project)
    #[arg(long, short = 'l')]
    pub local: bool,

    /// Custom config directory (takes priority over CLAUDE_CONFIG_DIR and friends)
    #[arg(long, short = 'c', value_name = "PATH", conflicts_with = "local")]
    pub config_dir: Option<String>,

    /// Replace an existing statusline without prompting
    #[arg(long)]
    pub force_statusline: bool,

    /// Blueprint source checkout to deploy from
    #[arg(
        long,
        value_name = "DIR",
        env = "BLUEPRINT_SOURCE_DIR",
        default_value = "."
    )]
    pub source: PathBuf,

    /// Answer prompts with their defaults
    #[arg(long, short = 'y')]
    pub yes: bool,
}
