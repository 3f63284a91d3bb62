//! Install orchestration
//!
//! Runs the full sequence for one resolved target: local patch backup,
//! orphan cleanup, the projection passes, auxiliary artifacts, post-write
//! verification, and the settings merge. The statusline decision spans
//! runtimes (Claude and Gemini share one answer), so installation is split
//! into a per-target pass and a finish pass applied after the decision.

use std::path::{Path, PathBuf};

use inquire::Select;

use crate::common::fs;
use crate::error::{BlueprintError, Result, file_read_failed};
use crate::installer::attribution::AttributionContext;
use crate::installer::manifest::{self, MANIFEST_NAME, PATCHES_DIR_NAME};
use crate::installer::projector::{self, MarkerMiss};
use crate::progress::CopySpinner;
use crate::runtime::{self, CommandLayout, Runtime, Target};
use crate::settings::{self, MergeLoad, PermissionMerge, Settings};
use crate::source::SourceTree;
use crate::ui;

/// Per-target state handed from the projection pass to the finish pass
pub struct InstallOutcome {
    pub target: Target,
    pub settings_path: PathBuf,
    pub settings: Settings,
    /// False when settings.json exists but could not be parsed; the file
    /// is then left untouched
    pub settings_writable: bool,
    pub statusline_command: String,
}

/// Install every selected target, then finish each with the shared
/// statusline decision.
pub fn run(
    source: &SourceTree,
    targets: Vec<Target>,
    attribution: &mut AttributionContext,
    interactive: bool,
    force_statusline: bool,
) -> Result<()> {
    let mut outcomes = Vec::new();
    for target in targets {
        outcomes.push(install_target(source, target, attribution)?);
    }

    // One statusline decision covers Claude and Gemini. Whichever of the
    // two was installed first represents the user's current setup.
    let primary = outcomes
        .iter()
        .find(|o| o.target.runtime == Runtime::Claude)
        .or_else(|| {
            outcomes
                .iter()
                .find(|o| o.target.runtime == Runtime::Gemini)
        });

    let install_statusline = match primary {
        Some(outcome) => decide_statusline(&outcome.settings, interactive, force_statusline)?,
        None => false,
    };

    for runtime in [
        Runtime::Claude,
        Runtime::Gemini,
        Runtime::Opencode,
        Runtime::Cursor,
    ] {
        if let Some(pos) = outcomes.iter().position(|o| o.target.runtime == runtime) {
            let outcome = outcomes.remove(pos);
            finish_target(outcome, install_statusline && runtime.wires_session_hooks())?;
        }
    }

    Ok(())
}

/// Project all Blueprint content into one target directory and prepare its
/// settings merge. Settings are not written here; the caller decides the
/// statusline question first and then calls [`finish_target`].
pub fn install_target(
    source: &SourceTree,
    target: Target,
    attribution: &mut AttributionContext,
) -> Result<InstallOutcome> {
    let runtime = target.runtime;
    println!(
        "  Installing for {} to {}\n",
        ui::cyan(runtime.label()),
        ui::cyan(target.location_label())
    );

    let mut failures: Vec<&str> = Vec::new();

    report_patch_backups(&manifest::save_local_patches(&target.dir)?);

    for removed in settings::cleanup_orphaned_files(&target.dir)? {
        ui::success(format!("Removed orphaned {removed}"));
    }

    let attribution = attribution.resolve(runtime)?;
    let mut misses: Vec<MarkerMiss> = Vec::new();

    match runtime.command_layout() {
        CommandLayout::NumberedSkills => {
            let skills_dir = target.dir.join("skills");
            fs::create_dir_all(&skills_dir)?;
            let (count, skill_misses) = projector::copy_skills(
                &source.commands_dir(),
                &skills_dir,
                &target.path_prefix,
                &attribution,
            )?;
            misses.extend(skill_misses);
            if count > 0 {
                ui::success(format!("Installed {count} skills to skills/"));
            } else {
                failures.push("skills");
            }
        }
        CommandLayout::Flattened => {
            let command_dir = target.dir.join("command");
            fs::create_dir_all(&command_dir)?;
            projector::flatten_commands(
                &source.commands_dir(),
                &command_dir,
                "bp",
                &target.path_prefix,
                &attribution,
            )?;
            if verify_dir(&command_dir, "command/bp-*") {
                let count = count_prefixed(&command_dir, "bp-")?;
                ui::success(format!("Installed {count} commands to command/"));
            } else {
                failures.push("command/bp-*");
            }
        }
        CommandLayout::Nested => {
            let dest = target.dir.join("commands").join("bp");
            misses.extend(projector::mirror_tree(
                &source.commands_dir(),
                &dest,
                "commands/bp",
                runtime,
                &target.path_prefix,
                &attribution,
            )?);
            if verify_dir(&dest, "commands/bp") {
                ui::success("Installed commands/bp");
            } else {
                failures.push("commands/bp");
            }
        }
    }

    let docs_dest = target.dir.join("blueprint");
    let spinner = CopySpinner::start("Copying blueprint/");
    let docs_result = projector::mirror_tree(
        &source.docs_dir(),
        &docs_dest,
        "blueprint",
        runtime,
        &target.path_prefix,
        &attribution,
    );
    spinner.finish();
    misses.extend(docs_result?);
    if verify_dir(&docs_dest, "blueprint") {
        ui::success("Installed blueprint");
    } else {
        failures.push("blueprint");
    }

    if let Some(agents_src) = source.agents_dir() {
        let agents_dest = target.dir.join("agents");
        projector::copy_agents(
            &agents_src,
            &agents_dest,
            runtime,
            &target.path_prefix,
            &attribution,
        )?;
        if verify_dir(&agents_dest, "agents") {
            ui::success("Installed agents");
        } else {
            failures.push("agents");
        }
    }

    if let Some(changelog) = source.changelog() {
        let dest = target.dir.join("blueprint").join("CHANGELOG.md");
        fs::copy(&changelog, &dest)?;
        if verify_file(&dest, "CHANGELOG.md") {
            ui::success("Installed CHANGELOG.md");
        } else {
            failures.push("CHANGELOG.md");
        }
    }

    let version_dest = target.dir.join("blueprint").join("VERSION");
    fs::write(&version_dest, env!("CARGO_PKG_VERSION"))?;
    if verify_file(&version_dest, "VERSION") {
        ui::success(format!("Wrote VERSION ({})", env!("CARGO_PKG_VERSION")));
    } else {
        failures.push("VERSION");
    }

    if runtime.installs_hook_scripts()
        && let Some(hooks_src) = source.hooks_dist_dir()
    {
        let hooks_dest = target.dir.join("hooks");
        fs::create_dir_all(&hooks_dest)?;
        copy_dir_files(&hooks_src, &hooks_dest)?;
        if verify_dir(&hooks_dest, "hooks") {
            ui::success("Installed hooks (bundled)");
        } else {
            failures.push("hooks");
        }
    }

    report_marker_misses(&misses);

    if !failures.is_empty() {
        return Err(BlueprintError::InstallIncomplete {
            failed: failures.join(", "),
        });
    }

    let settings_path = target.dir.join("settings.json");
    let mut settings = Settings::new();
    let mut settings_writable = true;
    match settings::load_for_merge(&settings_path)? {
        MergeLoad::Document(document) => settings = document,
        MergeLoad::Unparsable { reason } => {
            settings_writable = false;
            ui::warn("Could not parse settings.json - skipping settings update");
            ui::detail(format!("Reason: {reason}"));
            ui::detail("The file was NOT modified. Fix the syntax manually and rerun.");
        }
    }

    if settings_writable {
        let cleanup = settings::cleanup_orphaned_hooks(&mut settings);
        if cleanup.removed_entries {
            ui::success("Removed orphaned hook registrations");
        }
        if cleanup.statusline_repointed {
            ui::success("Updated statusline path (statusline.js → bp-statusline.js)");
        }

        if runtime == Runtime::Gemini && settings::enable_experimental_agents(&mut settings) {
            ui::success("Enabled experimental agents");
        }

        if runtime.wires_session_hooks() {
            let update_command = runtime::hook_command(&target, "bp-check-update.js");
            if settings::ensure_update_check_hook(&mut settings, &update_command) {
                ui::success("Configured update check hook");
            }
        }
    }

    manifest::write_manifest(&target.dir)?;
    ui::success(format!("Wrote file manifest ({MANIFEST_NAME})"));

    report_local_patches(&target.dir);

    let statusline_command = runtime::hook_command(&target, "bp-statusline.js");
    Ok(InstallOutcome {
        target,
        settings_path,
        settings,
        settings_writable,
        statusline_command,
    })
}

/// Apply the statusline decision, write settings back, grant opencode
/// permissions, and print the completion message.
pub fn finish_target(mut outcome: InstallOutcome, install_statusline: bool) -> Result<()> {
    let runtime = outcome.target.runtime;

    if install_statusline && runtime != Runtime::Opencode && outcome.settings_writable {
        settings::set_statusline(&mut outcome.settings, &outcome.statusline_command);
        ui::success("Configured statusline");
    }

    if outcome.settings_writable {
        settings::write(&outcome.settings_path, &outcome.settings)?;
    }

    if runtime == Runtime::Opencode {
        match settings::configure_opencode_permissions()? {
            PermissionMerge::Configured => {
                ui::success("Configured read permission for Blueprint docs");
            }
            PermissionMerge::AlreadyConfigured => {}
            PermissionMerge::Skipped { reason } => {
                ui::warn("Could not parse opencode.json - skipping permission config");
                ui::detail(format!("Reason: {reason}"));
                ui::detail("Your config was NOT modified. Fix the syntax manually if needed.");
            }
        }
    }

    println!();
    println!(
        "  {} Launch {} and run {}.",
        ui::green("Done!"),
        runtime.label(),
        ui::cyan(runtime.help_command())
    );
    println!();
    println!(
        "  {} https://discord.gg/5JJgD5svVS",
        ui::cyan("Join the community:")
    );
    println!();

    Ok(())
}

/// Decide whether the Blueprint statusline replaces the user's settings
/// entry. A missing statusline installs without asking; an existing one is
/// kept unless forced or confirmed at the prompt.
pub fn decide_statusline(settings: &Settings, interactive: bool, force: bool) -> Result<bool> {
    if !settings::has_statusline(settings) {
        return Ok(true);
    }

    if force {
        return Ok(true);
    }

    if !interactive {
        ui::warn("Skipping statusline (already configured)");
        println!("    Use {} to replace\n", ui::cyan("--force-statusline"));
        return Ok(false);
    }

    println!();
    ui::warn("Existing statusline detected");
    println!();
    println!("  Your current statusline:");
    println!(
        "    {}",
        ui::dim(format!("command: {}", settings::statusline_summary(settings)))
    );
    println!();
    println!("  Blueprint includes a statusline showing:");
    println!("    • Model name");
    println!("    • Current task (from todo list)");
    println!("    • Context window usage (color-coded)");
    println!();

    let choice = Select::new(
        "Keep it or replace it?",
        vec!["Keep existing", "Replace with Blueprint statusline"],
    )
    .with_starting_cursor(0)
    .without_filtering()
    .with_help_message("↑↓ to move, ENTER to select, ESC to keep existing")
    .prompt_skippable()?;

    Ok(matches!(choice, Some("Replace with Blueprint statusline")))
}

fn report_patch_backups(backed_up: &[String]) {
    if backed_up.is_empty() {
        return;
    }
    ui::info(format!(
        "Found {} locally modified Blueprint file(s) — backed up to {PATCHES_DIR_NAME}/",
        backed_up.len()
    ));
    for file in backed_up {
        ui::detail(file);
    }
}

fn report_local_patches(target_dir: &Path) {
    let Some(meta) = manifest::read_local_patches(target_dir) else {
        return;
    };
    if meta.files.is_empty() {
        return;
    }

    println!();
    println!(
        "  {} (from v{}):",
        ui::yellow("Local patches detected"),
        meta.from_version
    );
    for file in &meta.files {
        println!("     {}", ui::cyan(file));
    }
    println!();
    println!(
        "  Your modifications are saved in {}",
        ui::cyan(format!("{PATCHES_DIR_NAME}/"))
    );
    println!(
        "  Run {} to merge them into the new version.",
        ui::cyan("/bp:reapply-patches")
    );
    println!("  Or manually compare and merge the files.");
    println!();
}

/// A conversion rule whose marker no longer matches leaves the file with
/// its original wording; surface each so the drift is visible.
fn report_marker_misses(misses: &[MarkerMiss]) {
    for miss in misses {
        ui::warn(format!(
            "Interaction marker not found in {} (rule {}); file left as written",
            miss.file, miss.rule
        ));
    }
}

/// A projected directory must exist and contain at least one entry
fn verify_dir(dir: &Path, description: &str) -> bool {
    if !dir.exists() {
        ui::failure(format!(
            "Failed to install {description}: directory not created"
        ));
        return false;
    }
    match std::fs::read_dir(dir) {
        Ok(mut entries) => {
            if entries.next().is_none() {
                ui::failure(format!("Failed to install {description}: directory is empty"));
                return false;
            }
            true
        }
        Err(e) => {
            ui::failure(format!("Failed to install {description}: {e}"));
            false
        }
    }
}

fn verify_file(path: &Path, description: &str) -> bool {
    if !path.exists() {
        ui::failure(format!("Failed to install {description}: file not created"));
        return false;
    }
    true
}

fn count_prefixed(dir: &Path, prefix: &str) -> Result<usize> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| file_read_failed(dir.display().to_string(), e.to_string()))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            count += 1;
        }
    }
    Ok(count)
}

/// Copy only the top-level files of a directory; subdirectories are skipped
fn copy_dir_files(src: &Path, dest: &Path) -> Result<()> {
    let entries = std::fs::read_dir(src)
        .map_err(|e| file_read_failed(src.display().to_string(), e.to_string()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            fs::copy(&path, &dest.join(entry.file_name()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Location;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_source(root: &Path) {
        std::fs::create_dir_all(root.join("commands/bp")).unwrap();
        std::fs::write(
            root.join("commands/bp/help.md"),
            "---\nname: help\n---\n\nRead ~/.claude/blueprint/core.md first.\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.join("blueprint")).unwrap();
        std::fs::write(root.join("blueprint/core.md"), "# Core\n").unwrap();
    }

    fn settings_with_statusline() -> Settings {
        json!({"statusLine": {"type": "command", "command": "node my-line.js"}})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_decide_statusline_installs_when_absent() {
        assert!(decide_statusline(&Settings::new(), false, false).unwrap());
    }

    #[test]
    fn test_decide_statusline_force_overrides_existing() {
        assert!(decide_statusline(&settings_with_statusline(), false, true).unwrap());
    }

    #[test]
    fn test_decide_statusline_keeps_existing_non_interactive() {
        assert!(!decide_statusline(&settings_with_statusline(), false, false).unwrap());
    }

    #[test]
    fn test_verify_dir_states() {
        let temp = TempDir::new().unwrap();
        assert!(!verify_dir(&temp.path().join("absent"), "absent"));

        let empty = temp.path().join("empty");
        std::fs::create_dir_all(&empty).unwrap();
        assert!(!verify_dir(&empty, "empty"));

        std::fs::write(empty.join("file.md"), "x").unwrap();
        assert!(verify_dir(&empty, "filled"));
    }

    #[test]
    fn test_verify_file_states() {
        let temp = TempDir::new().unwrap();
        assert!(!verify_file(&temp.path().join("missing"), "missing"));

        let present = temp.path().join("VERSION");
        std::fs::write(&present, "1.0.0").unwrap();
        assert!(verify_file(&present, "VERSION"));
    }

    #[test]
    fn test_count_prefixed() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bp-help.md"), "x").unwrap();
        std::fs::write(temp.path().join("bp-plan.md"), "x").unwrap();
        std::fs::write(temp.path().join("other.md"), "x").unwrap();
        assert_eq!(count_prefixed(temp.path(), "bp-").unwrap(), 2);
    }

    #[test]
    fn test_copy_dir_files_skips_subdirectories() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("hook.js"), "x").unwrap();
        std::fs::write(src.join("nested/inner.js"), "x").unwrap();

        let dest = temp.path().join("dest");
        std::fs::create_dir_all(&dest).unwrap();
        copy_dir_files(&src, &dest).unwrap();

        assert!(dest.join("hook.js").exists());
        assert!(!dest.join("nested").exists());
    }

    #[test]
    #[serial]
    fn test_install_target_claude_full_pass() {
        let temp = TempDir::new().unwrap();
        let source_root = temp.path().join("source");
        write_source(&source_root);
        let source = SourceTree::locate(&source_root).unwrap();

        let config_dir = temp.path().join("claude");
        unsafe { std::env::set_var("CLAUDE_CONFIG_DIR", &config_dir) };
        let target = Target::resolve(Runtime::Claude, Location::Global, None).unwrap();

        let mut attribution = AttributionContext::new(None);
        let outcome = install_target(&source, target, &mut attribution).unwrap();

        let deployed = config_dir.join("commands/bp/help.md");
        let content = std::fs::read_to_string(&deployed).unwrap();
        assert!(content.contains(&format!("{}blueprint/core.md", outcome.target.path_prefix)));
        assert!(config_dir.join("blueprint/core.md").exists());
        assert_eq!(
            std::fs::read_to_string(config_dir.join("blueprint/VERSION")).unwrap(),
            env!("CARGO_PKG_VERSION")
        );
        assert!(config_dir.join(MANIFEST_NAME).exists());

        // Settings land on disk only after the finish pass
        assert!(!config_dir.join("settings.json").exists());
        finish_target(outcome, true).unwrap();
        let written = std::fs::read_to_string(config_dir.join("settings.json")).unwrap();
        assert!(written.contains("bp-statusline.js"));
        assert!(written.contains("bp-check-update.js"));

        unsafe { std::env::remove_var("CLAUDE_CONFIG_DIR") };
    }

    #[test]
    #[serial]
    fn test_install_target_cursor_writes_numbered_skills() {
        let temp = TempDir::new().unwrap();
        let source_root = temp.path().join("source");
        write_source(&source_root);
        let source = SourceTree::locate(&source_root).unwrap();

        let config_dir = temp.path().join("cursor");
        unsafe { std::env::set_var("CURSOR_CONFIG_DIR", &config_dir) };
        let target = Target::resolve(Runtime::Cursor, Location::Global, None).unwrap();

        let mut attribution = AttributionContext::new(None);
        let outcome = install_target(&source, target, &mut attribution).unwrap();
        finish_target(outcome, false).unwrap();

        assert!(config_dir.join("skills/bp-27-help/SKILL.md").exists());
        // Hooks are not wired for Cursor
        let settings = std::fs::read_to_string(config_dir.join("settings.json")).unwrap();
        assert!(!settings.contains("bp-check-update"));

        unsafe { std::env::remove_var("CURSOR_CONFIG_DIR") };
    }

    #[test]
    #[serial]
    fn test_install_target_preserves_unparsable_settings() {
        let temp = TempDir::new().unwrap();
        let source_root = temp.path().join("source");
        write_source(&source_root);
        let source = SourceTree::locate(&source_root).unwrap();

        let config_dir = temp.path().join("claude");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("settings.json"), "{ not json").unwrap();
        unsafe { std::env::set_var("CLAUDE_CONFIG_DIR", &config_dir) };
        let target = Target::resolve(Runtime::Claude, Location::Global, None).unwrap();

        let mut attribution = AttributionContext::new(None);
        let outcome = install_target(&source, target, &mut attribution).unwrap();
        assert!(!outcome.settings_writable);
        finish_target(outcome, true).unwrap();

        assert_eq!(
            std::fs::read_to_string(config_dir.join("settings.json")).unwrap(),
            "{ not json"
        );

        unsafe { std::env::remove_var("CLAUDE_CONFIG_DIR") };
    }
}
