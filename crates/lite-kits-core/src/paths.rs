use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Well-known names
// ---------------------------------------------------------------------------

pub const MANIFEST_FILE: &str = "kits.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn manifest_path(kits_dir: &Path) -> PathBuf {
    kits_dir.join(MANIFEST_FILE)
}

/// Join a manifest-relative path (always written with `/`) onto `base`.
///
/// Backslashes are accepted too so manifests authored on Windows resolve the
/// same way on every platform.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

/// Render `path` relative to `root` with forward slashes, for display and
/// for the structured outcomes. Falls back to the full path when `path` is
/// outside `root`.
pub fn display_relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let kits = Path::new("/opt/lite-kits/kits");
        assert_eq!(
            manifest_path(kits),
            PathBuf::from("/opt/lite-kits/kits/kits.yaml")
        );
        assert_eq!(
            join_relative(Path::new("/tmp/proj"), ".claude/commands/orient.md"),
            PathBuf::from("/tmp/proj/.claude/commands/orient.md")
        );
    }

    #[test]
    fn join_relative_accepts_backslashes() {
        assert_eq!(
            join_relative(Path::new("/tmp/proj"), r".github\prompts\orient.prompt.md"),
            PathBuf::from("/tmp/proj/.github/prompts/orient.prompt.md")
        );
    }

    #[test]
    fn display_relative_uses_forward_slashes() {
        let root = Path::new("/tmp/proj");
        let p = root.join(".specify").join("memory");
        assert_eq!(display_relative(root, &p), ".specify/memory");
        assert_eq!(display_relative(root, root), ".");
    }
}
