//! Content transformation and copy passes.
//!
//! This module turns the source tree into runtime-ready files:
//! - format conversions for each runtime's frontmatter and command schema
//! - interactive-block rewriting for runtimes without AskUserQuestion
//! - commit-attribution policy applied to every written file
//! - layout projection (mirrored, flattened, numbered-skill, agents)
//! - install manifests and drift backups of locally modified files

pub mod attribution;
pub mod formats;
pub mod interaction;
pub mod manifest;
pub mod projector;
