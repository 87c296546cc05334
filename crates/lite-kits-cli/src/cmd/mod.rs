pub mod add;
pub mod info;
pub mod remove;
pub mod status;
pub mod uninstall;
pub mod validate;

use lite_kits_core::manifest::KitManifest;
use std::path::Path;

/// Trim comma-split flag values and drop empty ones.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn all_kits(manifest: &KitManifest) -> Vec<String> {
    manifest.kit_names().into_iter().map(str::to_string).collect()
}

/// Kit selection from `--all`, `--recommended` and `--kit`. `None` lets the
/// installer fall back to the manifest default kit.
pub fn select_kits(
    manifest: &KitManifest,
    kit: Vec<String>,
    all: bool,
    recommended: bool,
) -> Option<Vec<String>> {
    if all {
        return Some(all_kits(manifest));
    }
    if recommended {
        return Some(
            manifest
                .recommended_kits()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
    }
    let kit = clean_list(kit);
    if kit.is_empty() {
        None
    } else {
        Some(kit)
    }
}

/// Where spec-kit detection looked, for error hints.
pub fn spec_kit_hint(manifest: &KitManifest) -> String {
    let markers: Vec<&str> = manifest
        .spec_kit()
        .markers
        .iter()
        .map(|m| m.path.as_str())
        .collect();
    format!("Looking for one of: {}", markers.join(", "))
}

pub fn not_spec_kit(manifest: &KitManifest, target: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "{} does not appear to be a spec-kit project\n  {}\n  \
         Install spec-kit first: https://github.com/github/spec-kit",
        target.display(),
        spec_kit_hint(manifest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_list_trims_and_drops_empty() {
        let values = vec![" dev".to_string(), String::new(), "multiagent ".to_string()];
        assert_eq!(clean_list(values), vec!["dev", "multiagent"]);
    }
}
