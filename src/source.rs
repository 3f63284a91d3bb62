//! Source tree location and validation.
//!
//! The source tree is a Blueprint checkout holding the deployable content:
//! `commands/bp/` (slash commands), `blueprint/` (reference docs), and
//! optionally `agents/`, `hooks/dist/` and `CHANGELOG.md`.

use std::path::{Path, PathBuf};

use crate::error::{BlueprintError, Result};

/// A validated Blueprint source checkout
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    /// Validate a directory as a Blueprint source tree.
    ///
    /// `commands/bp/` and `blueprint/` are required; everything else the
    /// installer copies is optional and skipped when absent.
    pub fn locate(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join("commands").join("bp").is_dir() || !root.join("blueprint").is_dir() {
            return Err(BlueprintError::SourceTreeNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `commands/bp/`: the slash command files
    pub fn commands_dir(&self) -> PathBuf {
        self.root.join("commands").join("bp")
    }

    /// `blueprint/`: the reference docs tree mirrored into each target
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("blueprint")
    }

    /// `agents/` if the checkout ships agents
    pub fn agents_dir(&self) -> Option<PathBuf> {
        let dir = self.root.join("agents");
        dir.is_dir().then_some(dir)
    }

    /// `CHANGELOG.md` if present
    pub fn changelog(&self) -> Option<PathBuf> {
        let path = self.root.join("CHANGELOG.md");
        path.is_file().then_some(path)
    }

    /// `hooks/dist/`: bundled hook scripts, if the checkout ships them
    pub fn hooks_dist_dir(&self) -> Option<PathBuf> {
        let dir = self.root.join("hooks").join("dist");
        dir.is_dir().then_some(dir)
    }
}
