use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    blueprint completions bash > ~/.bash_completion.d/blueprint\n\n\
                  Generate zsh completions:\n    blueprint completions zsh > ~/.zfunc/_blueprint\n\n\
                  Generate fish completions:\n    blueprint completions fish > ~/.config/fish/completions/blueprint.fish\n\n\
                  Generate PowerShell completions:\n    blueprint completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
