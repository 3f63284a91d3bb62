//! OpenCode-specific format conversions
//!
//! OpenCode reads lowercase tool names, a `tools:` permission map instead of
//! `allowed-tools:`, hex colors only, and flat `/bp-name` commands. The body
//! is rewritten before the frontmatter so tool references inside prose get
//! the same renames.

use std::sync::LazyLock;

use regex::Regex;

use super::frontmatter::{self, ItemLine, Scan};
use super::tables;

static ASK_USER_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAskUserQuestion\b").unwrap());
static SLASH_COMMAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSlashCommand\b").unwrap());
static TODO_WRITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bTodoWrite\b").unwrap());
static CLAUDE_DIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~/\.claude\b").unwrap());

/// Convert a Claude-format markdown document to OpenCode format
pub fn convert(content: &str) -> String {
    let converted = ASK_USER_QUESTION.replace_all(content, "question");
    let converted = SLASH_COMMAND.replace_all(&converted, "skill");
    let converted = TODO_WRITE.replace_all(&converted, "todowrite");
    let converted = converted.replace("/bp:", "/bp-");
    let converted = CLAUDE_DIR
        .replace_all(&converted, "~/.config/opencode")
        .into_owned();

    let Some(fm) = frontmatter::split(&converted) else {
        return converted;
    };

    let mut lines: Vec<String> = Vec::new();
    let mut scan = Scan::Fields;
    let mut collected_tools: Vec<String> = Vec::new();

    for line in fm.fields.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("allowed-tools:") {
            scan = Scan::ArrayItems;
            continue;
        }

        if let Some(value) = trimmed.strip_prefix("tools:") {
            let value = value.trim();
            if value.is_empty() {
                scan = Scan::ArrayItems;
            } else {
                collected_tools.extend(frontmatter::split_comma_list(value).map(String::from));
            }
            continue;
        }

        // OpenCode derives the command name from the filename
        if trimmed.starts_with("name:") {
            continue;
        }

        if let Some(value) = trimmed.strip_prefix("color:") {
            let color = value.trim().to_lowercase();
            if let Some(hex) = tables::color_to_hex(&color) {
                lines.push(format!("color: \"{hex}\""));
            } else if color.starts_with('#') && is_valid_hex_color(&color) {
                lines.push(line.to_string());
            }
            continue;
        }

        if scan == Scan::ArrayItems {
            match frontmatter::classify_item_line(trimmed) {
                ItemLine::Item(tool) => {
                    collected_tools.push(tool.to_string());
                    continue;
                }
                ItemLine::Skip => continue,
                ItemLine::End => scan = Scan::Fields,
            }
        }

        lines.push(line.to_string());
    }

    if !collected_tools.is_empty() {
        lines.push("tools:".to_string());
        for tool in &collected_tools {
            lines.push(format!("  {}: true", tables::opencode_tool_name(tool)));
        }
    }

    frontmatter::rebuild(&lines, fm.body)
}

/// `#RGB` or `#RRGGBB`, case-insensitive
fn is_valid_hex_color(value: &str) -> bool {
    let digits = &value[1..];
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
