//! Uninstall orchestration
//!
//! Removes Blueprint-owned files from a target directory and prunes the
//! matching settings entries. User files and the config directory itself
//! are preserved. The file manifest and any patch backups are deliberately
//! left behind so a later reinstall can still detect local drift.

use std::path::Path;

use crate::common::fs;
use crate::error::{Result, file_read_failed};
use crate::runtime::{CommandLayout, Runtime, Target};
use crate::settings::{self, MergeLoad};
use crate::ui;

/// Hook scripts the installer places under `<config>/hooks/`
const HOOK_SCRIPTS: [&str; 3] = [
    "bp-statusline.js",
    "bp-check-update.js",
    "bp-check-update.sh",
];

pub fn uninstall_target(target: &Target) -> Result<()> {
    let runtime = target.runtime;
    println!(
        "  Uninstalling Blueprint from {} at {}\n",
        ui::cyan(runtime.label()),
        ui::cyan(target.location_label())
    );

    if !target.dir.exists() {
        ui::warn(format!(
            "Directory does not exist: {}",
            target.location_label()
        ));
        ui::line("Nothing to uninstall.");
        println!();
        return Ok(());
    }

    let mut removed = 0usize;

    match runtime.command_layout() {
        CommandLayout::NumberedSkills => {
            let skills_dir = target.dir.join("skills");
            if skills_dir.exists() {
                let mut skill_count = 0;
                for name in dir_names(&skills_dir)? {
                    let path = skills_dir.join(&name);
                    if name.starts_with("bp-") && path.is_dir() {
                        fs::remove_dir_all_if_exists(&path)?;
                        skill_count += 1;
                    }
                }
                if skill_count > 0 {
                    removed += 1;
                    ui::success(format!("Removed {skill_count} Blueprint skills"));
                }
            }
        }
        CommandLayout::Flattened => {
            let command_dir = target.dir.join("command");
            if command_dir.exists() {
                for name in dir_names(&command_dir)? {
                    if name.starts_with("bp-") && name.ends_with(".md") {
                        fs::remove_file_if_exists(&command_dir.join(&name))?;
                        removed += 1;
                    }
                }
                ui::success("Removed Blueprint commands from command/");
            }
        }
        CommandLayout::Nested => {
            let bp_commands = target.dir.join("commands").join("bp");
            if bp_commands.exists() {
                fs::remove_dir_all_if_exists(&bp_commands)?;
                removed += 1;
                ui::success("Removed commands/bp/");
            }
        }
    }

    let docs_dir = target.dir.join("blueprint");
    if docs_dir.exists() {
        fs::remove_dir_all_if_exists(&docs_dir)?;
        removed += 1;
        ui::success("Removed blueprint/");
    }

    let agents_dir = target.dir.join("agents");
    if agents_dir.exists() {
        let mut agent_count = 0;
        for name in dir_names(&agents_dir)? {
            if name.starts_with("bp-") && name.ends_with(".md") {
                fs::remove_file_if_exists(&agents_dir.join(&name))?;
                agent_count += 1;
            }
        }
        if agent_count > 0 {
            removed += 1;
            ui::success(format!("Removed {agent_count} Blueprint agents"));
        }
    }

    let hooks_dir = target.dir.join("hooks");
    if hooks_dir.exists() {
        let mut hook_count = 0;
        for hook in HOOK_SCRIPTS {
            if fs::remove_file_if_exists(&hooks_dir.join(hook))? {
                hook_count += 1;
            }
        }
        if hook_count > 0 {
            removed += 1;
            ui::success(format!("Removed {hook_count} Blueprint hooks"));
        }
    }

    if clean_settings(&target.dir.join("settings.json"))? {
        removed += 1;
    }

    if runtime == Runtime::Opencode && clean_opencode_permissions()? {
        removed += 1;
    }

    if removed == 0 {
        ui::warn("No Blueprint files found to remove.");
    }

    println!();
    println!(
        "  {} Blueprint has been uninstalled from {}.",
        ui::green("Done!"),
        runtime.label()
    );
    println!("  Your other files and settings have been preserved.");
    println!();

    Ok(())
}

/// Drop Blueprint entries from settings.json: the statusline when it points
/// at our hook, and SessionStart entries running our scripts. Containers
/// emptied by the pruning are deleted. Returns whether the file was
/// rewritten.
fn clean_settings(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let mut settings = match settings::load_for_merge(path)? {
        MergeLoad::Document(settings) => settings,
        MergeLoad::Unparsable { reason } => {
            ui::warn("Could not parse settings.json - leaving it untouched");
            ui::detail(format!("Reason: {reason}"));
            return Ok(false);
        }
    };

    let mut modified = false;

    let statusline_is_ours = settings
        .get("statusLine")
        .and_then(|s| s.get("command"))
        .and_then(|c| c.as_str())
        .is_some_and(|c| c.contains("bp-statusline"));
    if statusline_is_ours {
        settings.remove("statusLine");
        modified = true;
        ui::success("Removed Blueprint statusline from settings");
    }

    let had_session_start = settings
        .get("hooks")
        .and_then(|h| h.get("SessionStart"))
        .is_some();

    if let Some(session_start) = settings
        .get_mut("hooks")
        .and_then(|h| h.get_mut("SessionStart"))
        .and_then(|s| s.as_array_mut())
    {
        let before = session_start.len();
        session_start.retain(|entry| !references_blueprint_hook(entry));
        if session_start.len() < before {
            modified = true;
            ui::success("Removed Blueprint hooks from settings");
        }
    }

    if had_session_start {
        let session_start_empty = settings
            .get("hooks")
            .and_then(|h| h.get("SessionStart"))
            .and_then(|s| s.as_array())
            .is_some_and(|s| s.is_empty());
        if session_start_empty
            && let Some(hooks) = settings.get_mut("hooks").and_then(|h| h.as_object_mut())
        {
            hooks.remove("SessionStart");
        }

        let hooks_empty = settings
            .get("hooks")
            .and_then(|h| h.as_object())
            .is_some_and(|h| h.is_empty());
        if hooks_empty {
            settings.remove("hooks");
        }
    }

    if !modified {
        return Ok(false);
    }

    settings::write(path, &settings)?;
    Ok(true)
}

fn references_blueprint_hook(entry: &serde_json::Value) -> bool {
    entry
        .get("hooks")
        .and_then(|h| h.as_array())
        .is_some_and(|hooks| {
            hooks.iter().any(|h| {
                h.get("command").and_then(|c| c.as_str()).is_some_and(|c| {
                    c.contains("bp-check-update") || c.contains("bp-statusline")
                })
            })
        })
}

/// Remove Blueprint grants from the global opencode.json. Keys containing
/// "blueprint" are dropped from both permission scopes and containers
/// emptied by the removal are deleted. Parse failures leave the file
/// untouched.
fn clean_opencode_permissions() -> Result<bool> {
    let config_path = Runtime::Opencode.global_dir(None)?.join("opencode.json");
    if !config_path.exists() {
        return Ok(false);
    }

    let mut config = match settings::load_for_merge(&config_path)? {
        MergeLoad::Document(config) => config,
        MergeLoad::Unparsable { reason } => {
            ui::warn("Could not parse opencode.json - leaving it untouched");
            ui::detail(format!("Reason: {reason}"));
            return Ok(false);
        }
    };

    let mut modified = false;
    if let Some(permission) = config.get_mut("permission").and_then(|p| p.as_object_mut()) {
        for scope in ["read", "external_directory"] {
            let mut emptied = false;
            if let Some(grants) = permission.get_mut(scope).and_then(|g| g.as_object_mut()) {
                let before = grants.len();
                grants.retain(|key, _| !key.contains("blueprint"));
                if grants.len() < before {
                    modified = true;
                }
                emptied = grants.is_empty();
            }
            if emptied {
                permission.remove(scope);
            }
        }
        if permission.is_empty() {
            config.remove("permission");
        }
    }

    if !modified {
        return Ok(false);
    }

    settings::write(&config_path, &config)?;
    ui::success("Removed Blueprint permissions from opencode.json");
    Ok(true)
}

fn dir_names(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| file_read_failed(dir.display().to_string(), e.to_string()))?;

    let mut names = Vec::new();
    for entry in entries {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
