use anyhow::bail;
use std::path::{Path, PathBuf};

/// Resolve the project a command operates on: the positional `TARGET`
/// argument when given (relative to the current directory), else the
/// current directory. The directory must exist.
pub fn resolve_target(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let target = match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    };
    if !target.is_dir() {
        bail!("target directory does not exist: {}", target.display());
    }
    Ok(target)
}
