//! Command implementations for the Blueprint CLI

pub mod completions;
pub mod install;
pub mod uninstall;
