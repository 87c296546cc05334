use crate::error::{LiteKitsError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents half-copied templates when a copy is interrupted.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy a bundled kit file to `target`, creating parent directories.
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if !source.is_file() {
        return Err(LiteKitsError::KitFileNotFound(source.to_path_buf()));
    }
    let data = std::fs::read(source)?;
    atomic_write(target, &data)?;
    // Keep executable bits on shell scripts.
    let perms = std::fs::metadata(source)?.permissions();
    std::fs::set_permissions(target, perms)?;
    Ok(())
}

/// Remove a directory if it exists and is empty. Returns true if removed.
pub fn remove_dir_if_empty(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    if std::fs::read_dir(path)?.next().is_some() {
        return Ok(false);
    }
    std::fs::remove_dir(path)?;
    Ok(true)
}
