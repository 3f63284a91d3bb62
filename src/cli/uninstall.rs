use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall from Claude Code globally:\n    blueprint uninstall --claude --global\n\n\
                  Uninstall from a project:\n    blueprint uninstall --claude --local\n\n\
                  Uninstall from every runtime without prompting:\n    blueprint uninstall --all --global -y")]
pub struct UninstallArgs {
    /// Uninstall from Claude Code
    #[arg(long)]
    pub claude: bool,

    /// Uninstall from OpenCode
    #[arg(long)]
    pub opencode: bool,

    /// Uninstall from Gemini
    #[arg(long)]
    pub gemini: bool,

    /// Uninstall from Cursor
    #[arg(long)]
    pub cursor: bool,

    /// Uninstall from all runtimes
    #[arg(long, conflicts_with_all = ["claude", "opencode", "gemini", "cursor"])]
    pub all: bool,

    /// Remove the global installation
    #[arg(long, short = 'g', conflicts_with = "local")]
    pub global: bool,

    /// Remove the local (project) installation
    #[arg(long, short = 'l')]
    pub local: bool,

    /// Custom config directory (takes priority over CLAUDE_CONFIG_DIR and friends)
    #[arg(long, short = 'c', value_name = "PATH", conflicts_with = "local")]
    pub config_dir: Option<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}
