//! Common file system operations with unified error handling

use std::path::Path;

use crate::error::{
    Result, dir_create_failed, file_read_failed, file_write_failed, remove_failed,
};

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| dir_create_failed(parent.display().to_string(), e.to_string()))?;
    }
    Ok(())
}

/// Create a directory and all of its parents
pub fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .map_err(|e| dir_create_failed(path.display().to_string(), e.to_string()))
}

/// Read a file into a string
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))
}

/// Write a string to a file, creating parent directories as needed
pub fn write(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content)
        .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
}

/// Copy a file byte-for-byte, creating parent directories as needed
pub fn copy(source: &Path, target: &Path) -> Result<()> {
    ensure_parent_dir(target)?;
    std::fs::copy(source, target)
        .map_err(|e| file_write_failed(target.display().to_string(), e.to_string()))
        .map(|_| ())
}

/// Remove a directory tree if it exists
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)
            .map_err(|e| remove_failed(path.display().to_string(), e.to_string()))?;
    }
    Ok(())
}

/// Remove a single file if it exists. Returns whether a file was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| remove_failed(path.display().to_string(), e.to_string()))?;
        return Ok(true);
    }
    Ok(false)
}
