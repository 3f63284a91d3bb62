//! Install command implementation
//!
//! Resolves which runtimes and location to deploy to, prompting for
//! whatever the command line left open, then hands the resolved targets to
//! the install operation. Flags always win over prompts; a non-interactive
//! stdin falls back to a Claude Code global install.

use std::io::IsTerminal;

use inquire::{MultiSelect, Select};

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::installer::attribution::AttributionContext;
use crate::operations;
use crate::runtime::{self, ALL_RUNTIMES, Location, Runtime, Target};
use crate::source::SourceTree;
use crate::ui;

const RUNTIME_OPTIONS: [&str; 4] = [
    "Claude Code (~/.claude)",
    "OpenCode (~/.config/opencode) - open source, free models",
    "Gemini (~/.gemini)",
    "Cursor (~/.cursor)",
];

/// Run the install command
pub fn run(args: InstallArgs) -> Result<()> {
    ui::banner();

    let source = SourceTree::locate(&args.source)?;

    let Some((runtimes, location, interactive)) = resolve_selection(&args)? else {
        return cancelled();
    };

    let mut targets = Vec::new();
    for runtime in runtimes {
        targets.push(Target::resolve(
            runtime,
            location,
            args.config_dir.as_deref(),
        )?);
    }

    let mut attribution = AttributionContext::new(args.config_dir.as_deref());
    operations::install::run(
        &source,
        targets,
        &mut attribution,
        interactive,
        args.force_statusline,
    )
}

/// Work out which runtimes to install for and where. The `bool` is true
/// only when the location came from an interactive prompt; it gates the
/// statusline question later. `None` means the user cancelled.
fn resolve_selection(args: &InstallArgs) -> Result<Option<(Vec<Runtime>, Location, bool)>> {
    let flagged = selected_runtimes(args);

    if !flagged.is_empty() {
        if args.global || args.local {
            return Ok(Some((flagged, explicit_location(args), false)));
        }
        let Some((location, interactive)) = resolve_location(args, &flagged)? else {
            return Ok(None);
        };
        return Ok(Some((flagged, location, interactive)));
    }

    if args.global || args.local {
        // A location flag without a runtime defaults to Claude Code
        return Ok(Some((
            vec![Runtime::Claude],
            explicit_location(args),
            false,
        )));
    }

    if args.yes {
        return Ok(Some((vec![Runtime::Claude], Location::Global, false)));
    }

    if !std::io::stdin().is_terminal() {
        println!(
            "  {}\n",
            ui::yellow(
                "Non-interactive terminal detected, defaulting to Claude Code global install"
            )
        );
        return Ok(Some((vec![Runtime::Claude], Location::Global, false)));
    }

    let Some(runtimes) = prompt_runtimes()? else {
        return Ok(None);
    };
    let Some((location, interactive)) = resolve_location(args, &runtimes)? else {
        return Ok(None);
    };
    Ok(Some((runtimes, location, interactive)))
}

/// Runtimes named on the command line, in installation order
fn selected_runtimes(args: &InstallArgs) -> Vec<Runtime> {
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
    selected
}

fn explicit_location(args: &InstallArgs) -> Location {
    if args.local {
        Location::Local
    } else {
        Location::Global
    }
}

/// Location for a runtime selection that came without --global/--local
fn resolve_location(args: &InstallArgs, runtimes: &[Runtime]) -> Result<Option<(Location, bool)>> {
    if args.yes {
        return Ok(Some((Location::Global, false)));
    }
    if !std::io::stdin().is_terminal() {
        println!(
            "  {}\n",
            ui::yellow("Non-interactive terminal detected, defaulting to global install")
        );
        return Ok(Some((Location::Global, false)));
    }
    prompt_location(args, runtimes)
}

fn prompt_runtimes() -> Result<Option<Vec<Runtime>>> {
    let chosen = MultiSelect::new(
        "Which runtime(s) would you like to install for?",
        RUNTIME_OPTIONS.to_vec(),
    )
    .with_default(&[0])
    .with_help_message("↑↓ to move, SPACE to select/deselect, ENTER to confirm, ESC to cancel")
    .prompt_skippable()?;

    let Some(labels) = chosen else {
        return Ok(None);
    };
    if labels.is_empty() {
        return Ok(None);
    }
    Ok(Some(runtimes_for_labels(&labels)))
}

fn runtimes_for_labels(labels: &[&str]) -> Vec<Runtime> {
    labels
        .iter()
        .filter_map(|label| {
            ALL_RUNTIMES
                .iter()
                .copied()
                .find(|runtime| label.starts_with(runtime.label()))
        })
        .collect()
}

fn prompt_location(args: &InstallArgs, runtimes: &[Runtime]) -> Result<Option<(Location, bool)>> {
    let global_paths = runtimes
        .iter()
        .map(|runtime| {
            runtime
                .global_dir(args.config_dir.as_deref())
                .map(|dir| runtime::home_shortened(&dir))
        })
        .collect::<Result<Vec<_>>>()?
        .join(", ");
    let local_paths = runtimes
        .iter()
        .map(|runtime| format!("./{}", runtime.dir_name()))
        .collect::<Vec<_>>()
        .join(", ");

    let options = vec![
        format!("Global ({global_paths}) - available in all projects"),
        format!("Local ({local_paths}) - this project only"),
    ];

    let choice = Select::new("Where would you like to install?", options)
        .with_starting_cursor(0)
        .without_filtering()
        .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
        .prompt_skippable()?;

    Ok(choice.map(|picked| {
        let location = if picked.starts_with("Local") {
            Location::Local
        } else {
            Location::Global
        };
        (location, true)
    }))
}

fn cancelled() -> Result<()> {
    println!("\n  {}\n", ui::yellow("Installation cancelled"));
    Ok(())
}
