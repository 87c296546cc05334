use anyhow::Context;
use lite_kits_core::manifest::KitManifest;
use lite_kits_core::paths::MANIFEST_FILE;
use std::path::{Path, PathBuf};

/// The kit bundle in the source tree, for `cargo run` and tests.
const BUILD_KITS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../kits");

/// Resolve the kit bundle directory.
///
/// Priority:
/// 1. `--kits-dir` flag / `LITE_KITS_DIR` env var (passed in as `explicit`)
/// 2. `kits/` next to the executable (release archives)
/// 3. `../share/lite-kits/kits` relative to the executable (system packages)
/// 4. The workspace `kits/` directory the binary was built from
pub fn resolve_kits_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let candidates = [
            exe_dir.join("kits"),
            exe_dir.join("../share/lite-kits/kits"),
        ];
        if let Some(found) = candidates.into_iter().find(|d| d.join(MANIFEST_FILE).is_file()) {
            return found;
        }
    }

    PathBuf::from(BUILD_KITS_DIR)
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<KitManifest> {
    let dir = resolve_kits_dir(explicit);
    tracing::debug!(kits_dir = %dir.display(), "using kit bundle");
    KitManifest::load(&dir)
        .with_context(|| format!("failed to load kits from {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_kits_dir_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_kits_dir(Some(dir.path())), dir.path());
    }

    #[test]
    fn build_bundle_loads() {
        let manifest = KitManifest::load(Path::new(BUILD_KITS_DIR)).unwrap();
        assert!(manifest.kit("dev").is_some());
        assert!(manifest.missing_sources().is_empty());
    }
}
