//! High-level install and uninstall workflows
//!
//! The operations coordinate the lower layers:
//! - SourceTree: locating the deployable content (from the source module)
//! - projector and manifest passes: file projection (from the installer module)
//! - Settings: merges into settings.json / opencode.json (settings module)
//! - UI: status lines and prompts (ui module)
//!
//! Command modules stay thin; everything observable happens here.

pub mod install;
pub mod uninstall;
