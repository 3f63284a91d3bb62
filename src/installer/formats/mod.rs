//! Runtime-specific format conversions
//!
//! Blueprint markdown is authored for Claude Code; the other runtimes each
//! need their own shape:
//!
//! - **opencode**: `tools:` permission map, lowercase tool names, hex colors,
//!   flat `/bp-name` command references
//! - **gemini**: commands become TOML, agents get snake_case tool arrays
//! - **cursor**: commands become numbered skills, agents get `model: inherit`,
//!   tool grants are stripped
//!
//! Claude Code is the passthrough case and has no converter here.

pub mod cursor;
pub mod frontmatter;
pub mod gemini;
pub mod opencode;
pub mod tables;
