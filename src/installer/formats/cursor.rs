//! Cursor-specific format conversions
//!
//! Cursor installs commands as skills (`skills/bp-NN-name/SKILL.md`) and
//! agents as markdown with `model: inherit`. Skill frontmatter may not carry
//! tool grants or argument hints, and `/bp:name` references must point at
//! the numbered skill directories.

use std::sync::LazyLock;

use regex::Regex;

use super::frontmatter::{self, ItemLine, Scan};
use super::tables;

static COMMAND_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/bp:([a-z-]+)").unwrap());

/// Skill directory name for a command: `bp-01-map-codebase`, or `bp-<name>`
/// when the command has no assigned palette position.
pub fn skill_dir_name(command: &str) -> String {
    match tables::cursor_skill_number(command) {
        Some(num) => format!("bp-{num:02}-{command}"),
        None => format!("bp-{command}"),
    }
}

/// Rewrite `/bp:name` references to the numbered `/bp-NN-name` skill form.
/// References to unknown commands are left alone.
pub fn convert_command_references(content: &str) -> String {
    COMMAND_REF
        .replace_all(content, |caps: &regex::Captures| {
            let name = &caps[1];
            match tables::cursor_skill_number(name) {
                Some(num) => format!("/bp-{num:02}-{name}"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Convert a Claude-format command document to a Cursor skill
pub fn convert_skill(content: &str, path_prefix: &str) -> String {
    let converted = content.replace("~/.claude/", path_prefix);

    let Some(fm) = frontmatter::split(&converted) else {
        return converted;
    };

    let mut lines: Vec<String> = Vec::new();
    let mut scan = Scan::Fields;

    for line in fm.fields.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("allowed-tools:") {
            scan = Scan::ArrayItems;
            continue;
        }

        if scan == Scan::ArrayItems {
            match frontmatter::classify_item_line(trimmed) {
                ItemLine::Item(_) | ItemLine::Skip => continue,
                ItemLine::End => scan = Scan::Fields,
            }
        }

        if trimmed.starts_with("argument-hint:") {
            continue;
        }

        if trimmed.starts_with("agent:") {
            continue;
        }

        if let Some(value) = trimmed.strip_prefix("tools:") {
            if value.trim().is_empty() {
                scan = Scan::ArrayItems;
            }
            continue;
        }

        // Skills use bp-name, not the bp:name command form
        if let Some(value) = trimmed.strip_prefix("name:") {
            let name = value.trim();
            let name = name.strip_prefix("bp:").map_or_else(
                || name.to_string(),
                |rest| format!("bp-{rest}"),
            );
            lines.push(format!("name: {name}"));
            continue;
        }

        lines.push(line.to_string());
    }

    lines.push("disable-model-invocation: true".to_string());

    frontmatter::rebuild(&lines, fm.body)
}

/// Convert a Claude-format agent document to a Cursor agent
pub fn convert_agent(content: &str, path_prefix: &str) -> String {
    let converted = content.replace("~/.claude/", path_prefix);

    let Some(fm) = frontmatter::split(&converted) else {
        return converted;
    };

    let mut lines: Vec<String> = Vec::new();
    let mut scan = Scan::Fields;

    for line in fm.fields.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("allowed-tools:") {
            scan = Scan::ArrayItems;
            continue;
        }

        if scan == Scan::ArrayItems {
            match frontmatter::classify_item_line(trimmed) {
                ItemLine::Item(_) | ItemLine::Skip => continue,
                ItemLine::End => scan = Scan::Fields,
            }
        }

        if let Some(value) = trimmed.strip_prefix("tools:") {
            if value.trim().is_empty() {
                scan = Scan::ArrayItems;
            }
            continue;
        }

        if trimmed.starts_with("color:") {
            continue;
        }

        lines.push(line.to_string());
    }

    lines.push("model: inherit".to_string());

    frontmatter::rebuild(&lines, fm.body)
}
