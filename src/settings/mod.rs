//! Runtime settings documents (`settings.json`, `opencode.json`).
//!
//! Reads are tolerant: a missing or unparsable document reads as empty.
//! In-place merges are guarded: a document that exists but cannot be
//! parsed is never written back, so user syntax errors are preserved
//! for manual repair instead of being clobbered.

pub mod jsonc;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::common::fs;
use crate::error::Result;
use crate::runtime::{Runtime, forward_slashes};

/// Top-level settings object
pub type Settings = Map<String, Value>;

/// Files from previous releases that are deleted from the target directory
/// when found. Paths are relative to the target root.
const ORPHANED_FILES: &[&str] = &[
    "hooks/gsd-notify.sh",
    "hooks/gsd-statusline.js",
    "hooks/gsd-check-update.js",
    "hooks/gsd-check-update.sh",
    "hooks/bp-notify.sh",
    "hooks/statusline.js",
];

/// Hook command substrings from previous releases. A registered hook entry
/// whose command contains any of these is removed during cleanup.
const ORPHANED_HOOK_PATTERNS: &[&str] = &[
    "gsd-notify.sh",
    "gsd-statusline.js",
    "gsd-check-update.js",
    "gsd-check-update.sh",
    "gsd-intel-index.js",
    "gsd-intel-session.js",
    "gsd-intel-prune.js",
    "bp-notify.sh",
    "hooks/statusline.js",
    "bp-intel-index.js",
    "bp-intel-session.js",
    "bp-intel-prune.js",
];

/// Read a settings document, treating a missing or unparsable file (or a
/// non-object root) as empty.
pub fn read(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::new());
    }
    let content = fs::read_to_string(path)?;
    match jsonc::parse(&content) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Ok(Settings::new()),
    }
}

/// Outcome of loading a settings document for an in-place merge
pub enum MergeLoad {
    /// Parsed (or absent); safe to modify and write back
    Document(Settings),
    /// Present but invalid; must be left untouched
    Unparsable { reason: String },
}

/// Load a settings document for modification. Unlike [`read`], a present
/// but unparsable file is reported instead of defaulted, so the caller can
/// skip the merge without overwriting the user's file.
pub fn load_for_merge(path: &Path) -> Result<MergeLoad> {
    if !path.exists() {
        return Ok(MergeLoad::Document(Settings::new()));
    }
    let content = fs::read_to_string(path)?;
    match jsonc::parse(&content) {
        Ok(Value::Object(map)) => Ok(MergeLoad::Document(map)),
        Ok(other) => Ok(MergeLoad::Unparsable {
            reason: format!("expected a JSON object, found {}", value_kind(&other)),
        }),
        Err(e) => Ok(MergeLoad::Unparsable {
            reason: e.to_string(),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Write a settings document as pretty-printed JSON with a trailing newline.
pub fn write(path: &Path, settings: &Settings) -> Result<()> {
    let rendered = serde_json::to_string_pretty(settings)?;
    fs::write(path, format!("{rendered}\n"))
}

/// Delete leftover files from previous releases. Returns the relative paths
/// that were removed.
pub fn cleanup_orphaned_files(target_dir: &Path) -> Result<Vec<&'static str>> {
    let mut removed = Vec::new();
    for rel_path in ORPHANED_FILES {
        if fs::remove_file_if_exists(&target_dir.join(rel_path))? {
            removed.push(*rel_path);
        }
    }
    Ok(removed)
}

/// What `cleanup_orphaned_hooks` changed
#[derive(Debug, Default, PartialEq)]
pub struct HookCleanup {
    pub removed_entries: bool,
    pub statusline_repointed: bool,
}

/// Drop hook registrations that point at hooks from previous releases, and
/// repoint a statusline still referencing the old script name.
pub fn cleanup_orphaned_hooks(settings: &mut Settings) -> HookCleanup {
    let mut cleanup = HookCleanup::default();

    if let Some(Value::Object(hooks)) = settings.get_mut("hooks") {
        for entries in hooks.values_mut() {
            let Value::Array(entries) = entries else {
                continue;
            };
            let before = entries.len();
            entries.retain(|entry| !entry_has_orphaned_hook(entry));
            if entries.len() != before {
                cleanup.removed_entries = true;
            }
        }
    }

    if let Some(Value::Object(status_line)) = settings.get_mut("statusLine")
        && let Some(Value::String(command)) = status_line.get("command")
        && command.contains("statusline.js")
        && !command.contains("bp-statusline.js")
    {
        let repointed = command.replacen("statusline.js", "bp-statusline.js", 1);
        status_line.insert("command".to_string(), Value::String(repointed));
        cleanup.statusline_repointed = true;
    }

    cleanup
}

fn entry_has_orphaned_hook(entry: &Value) -> bool {
    let Some(Value::Array(hooks)) = entry.get("hooks") else {
        return false;
    };
    hooks.iter().any(|hook| {
        hook.get("command")
            .and_then(Value::as_str)
            .is_some_and(|command| {
                ORPHANED_HOOK_PATTERNS
                    .iter()
                    .any(|pattern| command.contains(pattern))
            })
    })
}

/// Register the session-start update check hook unless an entry already
/// runs the update-check script. Returns true when the hook was added.
pub fn ensure_update_check_hook(settings: &mut Settings, command: &str) -> bool {
    let hooks = settings
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut();
    let Some(hooks) = hooks else {
        return false;
    };
    let session_start = hooks
        .entry("SessionStart")
        .or_insert_with(|| json!([]))
        .as_array_mut();
    let Some(session_start) = session_start else {
        return false;
    };

    let already_wired = session_start.iter().any(|entry| {
        entry
            .get("hooks")
            .and_then(Value::as_array)
            .is_some_and(|hooks| {
                hooks.iter().any(|hook| {
                    hook.get("command")
                        .and_then(Value::as_str)
                        .is_some_and(|c| c.contains("bp-check-update"))
                })
            })
    });
    if already_wired {
        return false;
    }

    session_start.push(json!({
        "hooks": [{ "type": "command", "command": command }]
    }));
    true
}

/// Turn on the experimental agents flag required for custom sub-agents.
/// Returns true when the flag was newly enabled.
pub fn enable_experimental_agents(settings: &mut Settings) -> bool {
    let experimental = settings
        .entry("experimental")
        .or_insert_with(|| json!({}))
        .as_object_mut();
    let Some(experimental) = experimental else {
        return false;
    };
    let enabled = experimental
        .get("enableAgents")
        .is_some_and(|v| v.as_bool() == Some(true));
    if enabled {
        return false;
    }
    experimental.insert("enableAgents".to_string(), Value::Bool(true));
    true
}

/// True when a statusline is already configured (any non-null value)
pub fn has_statusline(settings: &Settings) -> bool {
    settings.get("statusLine").is_some_and(|v| !v.is_null())
}

/// Point the statusline at the given command
pub fn set_statusline(settings: &mut Settings, command: &str) {
    settings.insert(
        "statusLine".to_string(),
        json!({ "type": "command", "command": command }),
    );
}

/// Human-readable summary of the configured statusline, for prompts
pub fn statusline_summary(settings: &Settings) -> String {
    let field = |name: &str| {
        settings
            .get("statusLine")
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    field("command")
        .or_else(|| field("url"))
        .unwrap_or("(custom)")
        .to_string()
}

/// Outcome of the opencode permission merge
pub enum PermissionMerge {
    Configured,
    AlreadyConfigured,
    /// Config exists but could not be parsed; nothing was written
    Skipped { reason: String },
}

/// Grant opencode read access to the installed reference docs so the agent
/// is not prompted on every lookup. The grant goes into the global
/// `opencode.json` under both `permission.read` and
/// `permission.external_directory`.
pub fn configure_opencode_permissions() -> Result<PermissionMerge> {
    let config_dir = Runtime::Opencode.global_dir(None)?;
    let config_path = config_dir.join("opencode.json");
    fs::create_dir_all(&config_dir)?;

    let mut config = match load_for_merge(&config_path)? {
        MergeLoad::Document(config) => config,
        MergeLoad::Unparsable { reason } => return Ok(PermissionMerge::Skipped { reason }),
    };

    let docs_glob = opencode_docs_glob(&config_dir)?;

    let mut modified = false;
    for scope in ["read", "external_directory"] {
        if grant_permission(&mut config, scope, &docs_glob) {
            modified = true;
        }
    }

    if !modified {
        return Ok(PermissionMerge::AlreadyConfigured);
    }

    write(&config_path, &config)?;
    Ok(PermissionMerge::Configured)
}

/// The glob covering installed reference docs. Uses the `~` shorthand when
/// the config dir is at its default location.
fn opencode_docs_glob(config_dir: &Path) -> Result<String> {
    let default_dir = default_opencode_dir()?;
    if *config_dir == default_dir {
        Ok("~/.config/opencode/blueprint/*".to_string())
    } else {
        Ok(format!("{}/blueprint/*", forward_slashes(config_dir)))
    }
}

fn default_opencode_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(crate::error::BlueprintError::HomeDirNotFound)?;
    Ok(home.join(".config").join("opencode"))
}

fn grant_permission(config: &mut Settings, scope: &str, glob: &str) -> bool {
    let permission = config
        .entry("permission")
        .or_insert_with(|| json!({}))
        .as_object_mut();
    let Some(permission) = permission else {
        return false;
    };
    let entry = permission.entry(scope).or_insert_with(|| json!({}));
    if !entry.is_object() {
        *entry = json!({});
    }
    let Some(scoped) = entry.as_object_mut() else {
        return false;
    };
    if scoped.get(glob).and_then(Value::as_str) == Some("allow") {
        return false;
    }
    scoped.insert(glob.to_string(), Value::String("allow".to_string()));
    true
}
