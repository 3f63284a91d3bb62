//! Uninstall command implementation
//!
//! Thin wrapper over the uninstall operation: validates the location flags,
//! collects the selected runtimes and asks for confirmation before anything
//! is removed.

use std::io::IsTerminal;

use inquire::Confirm;

use crate::cli::UninstallArgs;
use crate::error::{BlueprintError, Result};
use crate::operations;
use crate::runtime::{ALL_RUNTIMES, Location, Runtime, Target};
use crate::ui;

/// Run the uninstall command
pub fn run(args: UninstallArgs) -> Result<()> {
    ui::banner();

    if !args.global && !args.local {
        return Err(BlueprintError::InvalidArguments {
            message: "uninstall requires --global or --local".to_string(),
        });
    }
    let location = if args.local {
        Location::Local
    } else {
        Location::Global
    };

    let mut targets = Vec::new();
    for runtime in selected_runtimes(&args) {
        targets.push(Target::resolve(
            runtime,
            location,
            args.config_dir.as_deref(),
        )?);
    }

    if !args.yes && std::io::stdin().is_terminal() && !confirm_uninstall(&targets)? {
        println!("\n  {}\n", ui::yellow("Uninstall cancelled"));
        return Ok(());
    }

    for target in targets {
        operations::uninstall::uninstall_target(&target)?;
    }

    Ok(())
}

/// Runtimes named on the command line; bare `uninstall` targets Claude Code
fn selected_runtimes(args: &UninstallArgs) -> Vec<Runtime> {
    if args.all {
        return ALL_RUNTIMES.to_vec();
    }
    let mut selected = Vec::new();
    if args.claude {
        selected.push(Runtime::Claude);
    }
    if args.opencode {
        selected.push(Runtime::Opencode);
    }
    if args.gemini {
        selected.push(Runtime::Gemini);
    }
    if args.cursor {
        selected.push(Runtime::Cursor);
    }
    if selected.is_empty() {
        selected.push(Runtime::Claude);
    }
    selected
}

fn confirm_uninstall(targets: &[Target]) -> Result<bool> {
    println!("  The following installation(s) will be removed:");
    for target in targets {
        println!(
            "    - {} at {}",
            target.runtime.label(),
            target.location_label()
        );
    }
    println!();

    let confirmed = Confirm::new("Proceed with uninstall?")
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt_skippable()?;
    Ok(confirmed.unwrap_or(false))
}
