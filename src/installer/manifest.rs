//! Install manifest and local-patch backups.
//!
//! Every install records a hash manifest of the files it wrote. The next
//! install compares the manifest against what is on disk and backs up any
//! user-modified file before the tree replacement wipes it. Backups land in
//! a patches directory alongside a metadata file naming the drifted paths
//! and the version they drifted from.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::common::fs;
use crate::error::Result;
use crate::hash::hash_file;
use crate::runtime::forward_slashes;

pub const MANIFEST_NAME: &str = "bp-file-manifest.json";
pub const PATCHES_DIR_NAME: &str = "bp-local-patches";

/// Hash manifest of installed files, keyed by path relative to the target
/// directory
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// Metadata written next to backed-up local patches
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupMeta {
    #[serde(default)]
    pub backed_up_at: String,
    #[serde(default)]
    pub from_version: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Hash the managed subtrees under `target_dir` and persist the manifest.
///
/// Covers the docs tree, the nested command tree when present, and
/// Blueprint-owned agent files. Flattened and skill layouts keep their
/// command files outside these subtrees and are not tracked.
pub fn write_manifest(target_dir: &Path) -> Result<Manifest> {
    let mut files = BTreeMap::new();

    collect_tree(&target_dir.join("blueprint"), "blueprint", &mut files)?;
    let commands_dir = target_dir.join("commands").join("bp");
    if commands_dir.exists() {
        collect_tree(&commands_dir, "commands/bp", &mut files)?;
    }

    let agents_dir = target_dir.join("agents");
    if agents_dir.exists() {
        for entry in std::fs::read_dir(&agents_dir)
            .map_err(|e| crate::error::file_read_failed(agents_dir.display().to_string(), e.to_string()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("bp-") && name.ends_with(".md") && entry.path().is_file() {
                files.insert(format!("agents/{name}"), hash_file(&entry.path())?);
            }
        }
    }

    let manifest = Manifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        files,
    };

    let rendered = serde_json::to_string_pretty(&manifest)?;
    fs::write(&target_dir.join(MANIFEST_NAME), rendered)?;
    Ok(manifest)
}

fn collect_tree(dir: &Path, prefix: &str, files: &mut BTreeMap<String, String>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path());
        files.insert(
            format!("{}/{}", prefix, forward_slashes(rel)),
            hash_file(entry.path())?,
        );
    }
    Ok(())
}

/// Compare the recorded manifest against the live tree and back up every
/// modified file into the patches directory, preserving relative paths.
/// Returns the modified paths. Runs before any tree replacement; a missing
/// or unreadable manifest backs up nothing.
pub fn save_local_patches(target_dir: &Path) -> Result<Vec<String>> {
    let manifest_path = target_dir.join(MANIFEST_NAME);
    if !manifest_path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&manifest_path)?;
    let Ok(manifest) = serde_json::from_str::<Manifest>(&content) else {
        return Ok(Vec::new());
    };

    let patches_dir = target_dir.join(PATCHES_DIR_NAME);
    let mut modified = Vec::new();

    for (rel_path, original_hash) in &manifest.files {
        let full_path = target_dir.join(rel_path);
        if !full_path.exists() {
            continue;
        }
        if hash_file(&full_path)? != *original_hash {
            fs::copy(&full_path, &patches_dir.join(rel_path))?;
            modified.push(rel_path.clone());
        }
    }

    if !modified.is_empty() {
        let meta = BackupMeta {
            backed_up_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            from_version: manifest.version,
            files: modified.clone(),
        };
        let rendered = serde_json::to_string_pretty(&meta)?;
        fs::write(&patches_dir.join("backup-meta.json"), rendered)?;
    }

    Ok(modified)
}

/// Read backup metadata from a previous drift backup, if any. Returns None
/// when no backup exists or the metadata cannot be parsed.
pub fn read_local_patches(target_dir: &Path) -> Option<BackupMeta> {
    let meta_path = target_dir.join(PATCHES_DIR_NAME).join("backup-meta.json");
    let content = std::fs::read_to_string(meta_path).ok()?;
    serde_json::from_str(&content).ok()
}
