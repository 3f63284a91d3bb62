//! Gemini-specific format conversions
//!
//! Gemini CLI reads commands as TOML (`description`/`prompt` keys) and
//! agents as markdown whose `tools:` must be a YAML array of snake_case
//! built-in names. `color:` fails Gemini's validation and is dropped, and
//! `<sub>` tags render as raw HTML in terminals so they become italics.

use std::sync::LazyLock;

use regex::Regex;

use super::frontmatter::{self, ItemLine, Scan};
use super::tables;

static SUB_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<sub>(.*?)</sub>").unwrap());

/// Replace `<sub>text</sub>` with `*(text)*`
pub fn strip_sub_tags(content: &str) -> String {
    SUB_TAG.replace_all(content, "*($1)*").into_owned()
}

/// Convert a Claude-format agent to Gemini's agent frontmatter
pub fn convert_agent(content: &str) -> String {
    let Some(fm) = frontmatter::split(content) else {
        return content.to_string();
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
                for tool in frontmatter::split_comma_list(value) {
                    if let Some(mapped) = tables::gemini_tool_name(tool) {
                        collected_tools.push(mapped);
                    }
                }
            }
            continue;
        }

        // color: fails Gemini's agent validation
        if trimmed.starts_with("color:") {
            continue;
        }

        if scan == Scan::ArrayItems {
            match frontmatter::classify_item_line(trimmed) {
                ItemLine::Item(tool) => {
                    if let Some(mapped) = tables::gemini_tool_name(tool) {
                        collected_tools.push(mapped);
                    }
                    continue;
                }
                ItemLine::Skip => continue,
                ItemLine::End => scan = Scan::Fields,
            }
        }

        lines.push(line.to_string());
    }

    // Gemini requires array form
    if !collected_tools.is_empty() {
        lines.push("tools:".to_string());
        for tool in &collected_tools {
            lines.push(format!("  - {tool}"));
        }
    }

    frontmatter::rebuild(&lines, &strip_sub_tags(fm.body))
}

/// Convert a Claude-format command document to Gemini command TOML.
///
/// The frontmatter `description:` becomes the TOML `description` key and the
/// body becomes `prompt`. Documents without frontmatter turn into a bare
/// `prompt` holding the whole content.
pub fn command_to_toml(content: &str) -> String {
    let Some(fm) = frontmatter::split(content) else {
        return format!("prompt = {}\n", toml_string(content));
    };

    let description = fm
        .fields
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("description:"))
        .map(str::trim)
        .unwrap_or("");

    let mut toml = String::new();
    if !description.is_empty() {
        toml.push_str(&format!("description = {}\n", toml_string(description)));
    }
    toml.push_str(&format!("prompt = {}\n", toml_string(fm.body.trim())));
    toml
}

/// JSON string escaping doubles as a TOML basic string
fn toml_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
