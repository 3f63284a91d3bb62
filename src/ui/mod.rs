//! Terminal output helpers
//!
//! All operator-facing status lines go through this module so the two-space
//! indent and the colored status markers stay uniform across install and
//! uninstall. Interactive prompts live next to the code that needs them;
//! only the passive output shapes are collected here.

use console::Style;

/// Print the product banner shown at startup
pub fn banner() {
    println!();
    println!(
        "  Blueprint {}",
        Style::new()
            .dim()
            .apply_to(format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    println!("  A meta-prompting, context engineering and spec-driven");
    println!("  development system for Claude Code, OpenCode, Gemini, and Cursor by TÂCHES.");
    println!();
}

/// Green checkmark line for a completed step
pub fn success(message: impl std::fmt::Display) {
    println!("  {} {}", Style::new().green().apply_to("✓"), message);
}

/// Yellow warning line for a skipped or degraded step
pub fn warn(message: impl std::fmt::Display) {
    println!("  {} {}", Style::new().yellow().apply_to("⚠"), message);
}

/// Failure line for a verification miss, written to stderr
pub fn failure(message: impl std::fmt::Display) {
    eprintln!("  {} {}", Style::new().yellow().apply_to("✗"), message);
}

/// Informational line, used for the local-patch backup notice
pub fn info(message: impl std::fmt::Display) {
    println!("  {}  {}", Style::new().yellow().apply_to("i"), message);
}

/// Dimmed continuation line under a status message
pub fn detail(message: impl std::fmt::Display) {
    println!("     {}", Style::new().dim().apply_to(message));
}

/// Plain indented line
pub fn line(message: impl std::fmt::Display) {
    println!("  {}", message);
}

pub fn cyan(value: impl std::fmt::Display) -> String {
    Style::new().cyan().apply_to(value).to_string()
}

pub fn dim(value: impl std::fmt::Display) -> String {
    Style::new().dim().apply_to(value).to_string()
}

pub fn green(value: impl std::fmt::Display) -> String {
    Style::new().green().apply_to(value).to_string()
}

pub fn yellow(value: impl std::fmt::Display) -> String {
    Style::new().yellow().apply_to(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_helpers_wrap_value() {
        // Styles may be disabled in test terminals; the payload must survive
        assert!(cyan("/bp:help").contains("/bp:help"));
        assert!(dim("v1.0.0").contains("v1.0.0"));
        assert!(green("Done!").contains("Done!"));
        assert!(yellow("careful").contains("careful"));
    }

    #[test]
    fn test_status_lines_do_not_panic() {
        success("Installed commands/bp");
        warn("Skipping statusline (already configured)");
        failure("Failed to install blueprint: directory not created");
        info("Found 1 locally modified Blueprint file(s)");
        detail("commands/bp/plan.md");
        line("Nothing to uninstall.");
    }
}
