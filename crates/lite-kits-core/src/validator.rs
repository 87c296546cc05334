use crate::detector::Detector;
use crate::error::Result;
use crate::manifest::{FileEntry, KitManifest, ManifestOptions};
use crate::paths;
use serde::Serialize;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// KitStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KitStatus {
    NotInstalled,
    Installed,
    Partial,
}

impl KitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            KitStatus::NotInstalled => "not_installed",
            KitStatus::Installed => "installed",
            KitStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for KitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct KitCheck {
    pub kit: String,
    pub passed: bool,
    pub status: KitStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corrupted_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// True when at least one kit is fully installed.
    pub valid: bool,
    pub checks: Vec<KitCheck>,
}

impl ValidationReport {
    pub fn check(&self, kit: &str) -> Option<&KitCheck> {
        self.checks.iter().find(|c| c.kit == kit)
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct Validator<'a> {
    target_dir: &'a Path,
    manifest: &'a KitManifest,
    detector: Detector<'a>,
}

impl<'a> Validator<'a> {
    pub fn new(target_dir: &'a Path, manifest: &'a KitManifest) -> Self {
        Self {
            target_dir,
            manifest,
            detector: Detector::new(target_dir, manifest),
        }
    }

    pub fn validate_all(&self) -> Result<ValidationReport> {
        let options = self.manifest.options();
        let checks = self
            .manifest
            .kit_names()
            .into_iter()
            .map(|name| self.validate_kit(name, options))
            .collect::<Result<Vec<_>>>()?;
        let valid = checks.iter().any(|c| c.status == KitStatus::Installed);
        Ok(ValidationReport { valid, checks })
    }

    pub fn validate_kit(&self, kit_name: &str, options: &ManifestOptions) -> Result<KitCheck> {
        let display = self.manifest.kit_display_name(kit_name);

        if !self.is_kit_installed(kit_name) {
            return Ok(KitCheck {
                kit: kit_name.to_string(),
                passed: true,
                status: KitStatus::NotInstalled,
                message: format!("{display}: not installed"),
                missing_files: Vec::new(),
                corrupted_files: Vec::new(),
            });
        }

        let agents = self.detector.detect_agents(&[])?;
        let shells = self.detector.detect_shells(&[])?;

        // Agent and shell groups only count once the project has at least one
        // of their files; otherwise that integration was never installed.
        let mut to_validate: Vec<&FileEntry> = Vec::new();
        for group in agents.iter().chain(&shells) {
            let files = self.manifest.kit_files(kit_name, Some(group.as_str()));
            if files.iter().any(|f| !f.is_planned() && self.exists(f)) {
                to_validate.extend(files);
            }
        }
        to_validate.extend(
            self.manifest
                .kit_files(kit_name, None)
                .into_iter()
                .filter(|f| !f.kind.is_agent_specific()),
        );

        let mut missing = Vec::new();
        let mut corrupted = Vec::new();
        for entry in to_validate {
            if !entry.required || entry.is_planned() {
                continue;
            }
            let target = paths::join_relative(self.target_dir, &entry.path);
            let Ok(meta) = std::fs::metadata(&target) else {
                missing.push(entry.path.clone());
                continue;
            };
            if options.check_file_integrity && meta.len() < options.min_file_size {
                corrupted.push(entry.path.clone());
            }
        }

        if missing.is_empty() && corrupted.is_empty() {
            return Ok(KitCheck {
                kit: kit_name.to_string(),
                passed: true,
                status: KitStatus::Installed,
                message: format!("{display}: all files present"),
                missing_files: missing,
                corrupted_files: corrupted,
            });
        }

        let mut issues = Vec::new();
        if !missing.is_empty() {
            issues.push(format!("{} missing", missing.len()));
        }
        if !corrupted.is_empty() {
            issues.push(format!("{} corrupted", corrupted.len()));
        }
        tracing::info!(
            kit = kit_name,
            missing = missing.len(),
            corrupted = corrupted.len(),
            "kit partially installed"
        );

        Ok(KitCheck {
            kit: kit_name.to_string(),
            passed: false,
            status: KitStatus::Partial,
            message: format!(
                "{display}: {} - run: lite-kits add --kit {kit_name}",
                issues.join(", ")
            ),
            missing_files: missing,
            corrupted_files: corrupted,
        })
    }

    /// A kit counts as installed when any of its markers exists.
    pub fn is_kit_installed(&self, kit_name: &str) -> bool {
        self.manifest
            .kit_markers(kit_name)
            .iter()
            .any(|marker| paths::join_relative(self.target_dir, marker).exists())
    }

    fn exists(&self, entry: &FileEntry) -> bool {
        paths::join_relative(self.target_dir, &entry.path).exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{claude_project, sample_manifest, source_body, write, KitBundle};
    use tempfile::TempDir;

    fn install_claude_dev(root: &Path) {
        for (path, source) in [
            (".claude/commands/orient.md", "dev/claude/commands/orient.md"),
            (".claude/commands/commit.md", "dev/claude/commands/commit.md"),
        ] {
            write(root, path, &source_body(source));
        }
    }

    #[test]
    fn no_markers_means_not_installed() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = TempDir::new().unwrap();
        let v = Validator::new(project.path(), &m);

        assert!(!v.is_kit_installed("dev"));
        let check = v.validate_kit("dev", m.options()).unwrap();
        assert_eq!(check.status, KitStatus::NotInstalled);
        assert!(check.passed);
        assert_eq!(check.message, "Dev Kit: not installed");
    }

    #[test]
    fn complete_install_passes() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        install_claude_dev(project.path());

        let check = Validator::new(project.path(), &m)
            .validate_kit("dev", m.options())
            .unwrap();
        assert_eq!(check.status, KitStatus::Installed);
        assert!(check.passed);
        assert!(check.missing_files.is_empty());
    }

    #[test]
    fn missing_file_in_present_group_is_partial() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        write(
            project.path(),
            ".claude/commands/orient.md",
            &source_body("dev/claude/commands/orient.md"),
        );

        let check = Validator::new(project.path(), &m)
            .validate_kit("dev", m.options())
            .unwrap();
        assert_eq!(check.status, KitStatus::Partial);
        assert!(!check.passed);
        assert_eq!(check.missing_files, vec![".claude/commands/commit.md"]);
        assert_eq!(
            check.message,
            "Dev Kit: 1 missing - run: lite-kits add --kit dev"
        );
    }

    #[test]
    fn small_files_are_corrupted() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        install_claude_dev(project.path());
        write(project.path(), ".claude/commands/commit.md", "tiny");

        let v = Validator::new(project.path(), &m);
        let check = v.validate_kit("dev", m.options()).unwrap();
        assert_eq!(check.status, KitStatus::Partial);
        assert_eq!(check.corrupted_files, vec![".claude/commands/commit.md"]);

        let mut lenient = m.options().clone();
        lenient.check_file_integrity = false;
        let check = v.validate_kit("dev", &lenient).unwrap();
        assert_eq!(check.status, KitStatus::Installed);
    }

    #[test]
    fn untouched_agent_groups_are_not_validated() {
        // copilot is detected (.github exists) but has none of the kit's files.
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        std::fs::create_dir_all(project.path().join(".github/prompts")).unwrap();
        install_claude_dev(project.path());

        let check = Validator::new(project.path(), &m)
            .validate_kit("dev", m.options())
            .unwrap();
        assert_eq!(check.status, KitStatus::Installed);
    }

    #[test]
    fn agnostic_files_always_validated_but_optional_skipped() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        // Marker present, memory guide present, optional notes.md absent,
        // claude sync command absent.
        write(
            project.path(),
            ".specify/memory/pr-workflow-guide.md",
            &source_body("multiagent/memory/pr-workflow-guide.md"),
        );

        let check = Validator::new(project.path(), &m)
            .validate_kit("multiagent", m.options())
            .unwrap();
        assert_eq!(check.status, KitStatus::Installed);
    }

    #[test]
    fn validate_all_valid_when_any_installed() {
        let bundle = KitBundle::new(sample_manifest());
        let m = bundle.load();
        let project = claude_project();
        let v = Validator::new(project.path(), &m);

        let report = v.validate_all().unwrap();
        assert!(!report.valid);
        assert_eq!(report.checks.len(), 2);

        install_claude_dev(project.path());
        let report = v.validate_all().unwrap();
        assert!(report.valid);
        assert_eq!(report.check("dev").unwrap().status, KitStatus::Installed);
        assert_eq!(
            report.check("multiagent").unwrap().status,
            KitStatus::NotInstalled
        );
    }
}
