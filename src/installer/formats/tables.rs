//! Per-runtime rename tables, modeled as immutable data.

/// Color names mapped to hex values OpenCode can render
pub const COLOR_NAME_TO_HEX: &[(&str, &str)] = &[
    ("cyan", "#00FFFF"),
    ("red", "#FF0000"),
    ("green", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("magenta", "#FF00FF"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
    ("pink", "#FFC0CB"),
    ("white", "#FFFFFF"),
    ("black", "#000000"),
    ("gray", "#808080"),
    ("grey", "#808080"),
];

/// Tool renames for OpenCode; unlisted tools are lowercased
pub const CLAUDE_TO_OPENCODE_TOOLS: &[(&str, &str)] = &[
    ("AskUserQuestion", "question"),
    ("SlashCommand", "skill"),
    ("TodoWrite", "todowrite"),
    ("WebFetch", "webfetch"),
    ("WebSearch", "websearch"),
];

/// Tool renames for Gemini CLI's snake_case built-in names
pub const CLAUDE_TO_GEMINI_TOOLS: &[(&str, &str)] = &[
    ("Read", "read_file"),
    ("Write", "write_file"),
    ("Edit", "replace"),
    ("Bash", "run_shell_command"),
    ("Glob", "glob"),
    ("Grep", "search_file_content"),
    ("WebSearch", "google_web_search"),
    ("WebFetch", "web_fetch"),
    ("TodoWrite", "write_todos"),
    ("AskUserQuestion", "ask_user"),
];

/// Numbered prefixes that keep Cursor's skill palette in workflow order
pub const CURSOR_SKILL_ORDER: &[(&str, u32)] = &[
    ("map-codebase", 1),
    ("new-project", 2),
    ("new-milestone", 3),
    ("discuss-phase", 4),
    ("research-phase", 5),
    ("plan-phase", 6),
    ("execute-phase", 7),
    ("verify-work", 8),
    ("audit-milestone", 9),
    ("plan-milestone-gaps", 10),
    ("complete-milestone", 11),
    ("add-phase", 12),
    ("insert-phase", 13),
    ("remove-phase", 14),
    ("progress", 15),
    ("resume-work", 16),
    ("pause-work", 17),
    ("quick", 18),
    ("debug", 19),
    ("list-phase-assumptions", 20),
    ("add-todo", 21),
    ("check-todos", 22),
    ("settings", 23),
    ("set-profile", 24),
    ("update", 25),
    ("reapply-patches", 26),
    ("help", 27),
    ("join-discord", 28),
];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn color_to_hex(name: &str) -> Option<&'static str> {
    lookup(COLOR_NAME_TO_HEX, name)
}

/// Convert a tool name to OpenCode format. MCP tools (`mcp__*`) keep their
/// name; everything without an explicit mapping is lowercased.
pub fn opencode_tool_name(tool: &str) -> String {
    if let Some(mapped) = lookup(CLAUDE_TO_OPENCODE_TOOLS, tool) {
        return mapped.to_string();
    }
    if tool.starts_with("mcp__") {
        return tool.to_string();
    }
    tool.to_lowercase()
}

/// Convert a tool name to Gemini format. Returns `None` for tools Gemini
/// provides itself: MCP tools are auto-discovered from mcpServers config and
/// agents are auto-registered in place of Task.
pub fn gemini_tool_name(tool: &str) -> Option<String> {
    if tool.starts_with("mcp__") {
        return None;
    }
    if tool == "Task" {
        return None;
    }
    if let Some(mapped) = lookup(CLAUDE_TO_GEMINI_TOOLS, tool) {
        return Some(mapped.to_string());
    }
    Some(tool.to_lowercase())
}

pub fn cursor_skill_number(command: &str) -> Option<u32> {
    CURSOR_SKILL_ORDER
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, num)| *num)
}
