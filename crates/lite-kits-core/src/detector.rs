use crate::error::{LiteKitsError, Result};
use crate::manifest::{KitManifest, MarkerKind};
use crate::paths;
use std::path::Path;

/// Shorthands accepted for `--shell`.
const SHELL_ALIASES: &[(&str, &str)] = &[
    ("ps", "powershell"),
    ("pwsh", "powershell"),
    ("sh", "bash"),
];

pub fn normalize_shell(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    SHELL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lower)
}

/// Detects which agents and shells apply to a target project.
pub struct Detector<'a> {
    target_dir: &'a Path,
    manifest: &'a KitManifest,
}

impl<'a> Detector<'a> {
    pub fn new(target_dir: &'a Path, manifest: &'a KitManifest) -> Self {
        Self {
            target_dir,
            manifest,
        }
    }

    /// Explicit `preferred` agents are validated and returned as given.
    /// Otherwise every supported agent whose marker directory (or, for nested
    /// markers like `.github/prompts`, its parent) exists, by ascending priority.
    pub fn detect_agents(&self, preferred: &[String]) -> Result<Vec<String>> {
        if !preferred.is_empty() {
            for name in preferred {
                let Some(config) = self.manifest.agent_config(name) else {
                    return Err(LiteKitsError::UnknownAgent {
                        name: name.clone(),
                        valid: self.manifest.supported_agents().join(", "),
                    });
                };
                if !config.supported {
                    return Err(LiteKitsError::UnsupportedAgent(name.clone()));
                }
            }
            return Ok(preferred.to_vec());
        }

        let mut detected: Vec<(&str, i64)> = self
            .manifest
            .manifest()
            .agents
            .iter()
            .filter(|(_, cfg)| cfg.supported)
            .filter(|(_, cfg)| self.marker_dir_present(&cfg.marker_dir))
            .map(|(name, cfg)| (name.as_str(), cfg.priority))
            .collect();
        detected.sort_by_key(|(_, priority)| *priority);

        let agents: Vec<String> = detected.into_iter().map(|(n, _)| n.to_string()).collect();
        tracing::debug!(?agents, "detected agents");
        Ok(agents)
    }

    /// Explicit `preferred` shells are aliased, validated and returned.
    /// Otherwise the supported shells by priority: all of them with
    /// `prefer_all_shells`, else only the first. Empty when
    /// `auto_detect_shells` is off.
    pub fn detect_shells(&self, preferred: &[String]) -> Result<Vec<String>> {
        if !preferred.is_empty() {
            let mut shells = Vec::with_capacity(preferred.len());
            for name in preferred {
                let normalized = normalize_shell(name);
                let Some(config) = self.manifest.shell_config(&normalized) else {
                    return Err(LiteKitsError::UnknownShell {
                        name: name.clone(),
                        valid: self.manifest.supported_shells().join(", "),
                    });
                };
                if !config.supported {
                    return Err(LiteKitsError::UnsupportedShell(normalized));
                }
                shells.push(normalized);
            }
            return Ok(shells);
        }

        let options = self.manifest.options();
        if !options.auto_detect_shells {
            return Ok(Vec::new());
        }

        let mut supported: Vec<(&str, i64)> = self
            .manifest
            .manifest()
            .shells
            .iter()
            .filter(|(_, cfg)| cfg.supported)
            .map(|(name, cfg)| (name.as_str(), cfg.priority))
            .collect();
        supported.sort_by_key(|(_, priority)| *priority);

        let mut shells: Vec<String> = supported.into_iter().map(|(n, _)| n.to_string()).collect();
        if !options.prefer_all_shells {
            shells.truncate(1);
        }
        tracing::debug!(?shells, "selected shells");
        Ok(shells)
    }

    pub fn is_spec_kit_project(&self) -> bool {
        let spec = self.manifest.spec_kit();
        let found = spec
            .markers
            .iter()
            .filter(|marker| {
                let path = paths::join_relative(self.target_dir, &marker.path);
                match marker.kind {
                    MarkerKind::Directory => path.is_dir(),
                    MarkerKind::File => path.exists(),
                }
            })
            .count();

        if spec.require_any {
            found > 0
        } else {
            found == spec.markers.len()
        }
    }

    fn marker_dir_present(&self, marker_dir: &str) -> bool {
        let dir = paths::join_relative(self.target_dir, marker_dir);
        if dir.exists() {
            return true;
        }
        // A nested marker counts when its parent exists; the subdirectory is
        // created on install. Top-level markers have the target as parent.
        match dir.parent() {
            Some(parent) => parent != self.target_dir && parent.exists(),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_manifest, KitBundle};
    use tempfile::TempDir;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_markers_detects_nothing() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let d = Detector::new(project.path(), &m);
        assert!(d.detect_agents(&[]).unwrap().is_empty());
        assert!(!d.is_spec_kit_project());
    }

    #[test]
    fn nested_marker_detected_through_parent() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join(".github")).unwrap();
        let d = Detector::new(project.path(), &m);
        assert_eq!(d.detect_agents(&[]).unwrap(), strings(&["copilot"]));
    }

    #[test]
    fn unsupported_agents_are_never_detected() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join(".cursor/rules")).unwrap();
        let d = Detector::new(project.path(), &m);
        assert!(d.detect_agents(&[]).unwrap().is_empty());
    }

    #[test]
    fn detected_agents_sorted_by_priority() {
        // Declared out of priority order on purpose.
        let yaml = r#"
agents:
  copilot:
    marker_dir: .github/prompts
    priority: 2
    supported: true
  claude:
    marker_dir: .claude
    priority: 1
    supported: true
"#;
        let bundle = KitBundle::new(yaml);
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join(".claude")).unwrap();
        std::fs::create_dir_all(project.path().join(".github/prompts")).unwrap();
        let d = Detector::new(project.path(), &m);
        assert_eq!(d.detect_agents(&[]).unwrap(), strings(&["claude", "copilot"]));
    }

    #[test]
    fn explicit_agents_validated_and_kept_in_order() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let d = Detector::new(project.path(), &m);

        assert_eq!(
            d.detect_agents(&strings(&["copilot", "claude"])).unwrap(),
            strings(&["copilot", "claude"])
        );

        let err = d.detect_agents(&strings(&["emacs"])).unwrap_err();
        assert!(matches!(err, LiteKitsError::UnknownAgent { .. }));
        assert!(err.to_string().contains("Valid options: claude, copilot"));

        let err = d.detect_agents(&strings(&["cursor"])).unwrap_err();
        assert!(matches!(err, LiteKitsError::UnsupportedAgent(ref n) if n == "cursor"));
    }

    #[test]
    fn shell_aliases_normalize() {
        assert_eq!(normalize_shell("pwsh"), "powershell");
        assert_eq!(normalize_shell("PS"), "powershell");
        assert_eq!(normalize_shell("sh"), "bash");
        assert_eq!(normalize_shell("Bash"), "bash");
        assert_eq!(normalize_shell("fish"), "fish");
    }

    #[test]
    fn explicit_shells() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let d = Detector::new(project.path(), &m);

        assert_eq!(
            d.detect_shells(&strings(&["pwsh", "sh"])).unwrap(),
            strings(&["powershell", "bash"])
        );
        let err = d.detect_shells(&strings(&["fish"])).unwrap_err();
        assert!(matches!(err, LiteKitsError::UnknownShell { .. }));
        assert!(err.to_string().contains("Aliases"));
    }

    #[test]
    fn auto_shells_primary_only_by_default() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let d = Detector::new(project.path(), &m);
        assert_eq!(d.detect_shells(&[]).unwrap(), strings(&["bash"]));
    }

    #[test]
    fn auto_shells_policy_switches() {
        let all = sample_manifest().replace("prefer_all_shells: false", "prefer_all_shells: true");
        let bundle = KitBundle::new(&all);
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let d = Detector::new(project.path(), &m);
        assert_eq!(d.detect_shells(&[]).unwrap(), strings(&["bash", "powershell"]));

        let off =
            sample_manifest().replace("auto_detect_shells: true", "auto_detect_shells: false");
        let bundle = KitBundle::new(&off);
        let m = bundle.load();
        let d = Detector::new(project.path(), &m);
        assert!(d.detect_shells(&[]).unwrap().is_empty());
        // Explicit shells still work with auto-detection off.
        assert_eq!(d.detect_shells(&strings(&["bash"])).unwrap(), strings(&["bash"]));
    }

    #[test]
    fn spec_kit_directory_marker_requires_directory() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        // A plain file named `.specify` is not the directory marker.
        std::fs::write(project.path().join(".specify"), "x").unwrap();
        assert!(!Detector::new(project.path(), &m).is_spec_kit_project());

        std::fs::remove_file(project.path().join(".specify")).unwrap();
        std::fs::create_dir_all(project.path().join(".specify")).unwrap();
        assert!(Detector::new(project.path(), &m).is_spec_kit_project());
    }

    #[test]
    fn spec_kit_require_all() {
        let yaml = r#"
spec_kit:
  markers:
    - path: .specify
      type: directory
    - path: README.md
      type: file
  require_any: false
"#;
        let bundle = KitBundle::new(yaml);
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join(".specify")).unwrap();
        assert!(!Detector::new(project.path(), &m).is_spec_kit_project());

        std::fs::write(project.path().join("README.md"), "# readme").unwrap();
        assert!(Detector::new(project.path(), &m).is_spec_kit_project());
    }
}
