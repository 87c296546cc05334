//! Installer orchestration: preview, install, remove and validate.
//!
//! This is the only module that writes to the target project. Configuration
//! problems (unknown kits, agents or shells) fail [`Installer::new`]; anything
//! that goes wrong while copying or deleting is reported in the returned
//! outcome rather than as an `Err`.

use crate::conflict::{self, ConflictChecker, Overwrite};
use crate::detector::Detector;
use crate::error::{LiteKitsError, Result};
use crate::io;
use crate::manifest::{KitManifest, ManifestOptions};
use crate::paths;
use crate::validator::{ValidationReport, Validator};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InstallerOptions {
    /// Kits to operate on; `None` (or empty) means the manifest default kit.
    pub kits: Option<Vec<String>>,
    /// Skip the conflict check and overwrite existing files.
    pub force: bool,
    /// Explicit agents; empty means auto-detect.
    pub agents: Vec<String>,
    /// Explicit shells; empty means auto-detect.
    pub shells: Vec<String>,
    /// Report what would happen without touching the target.
    pub dry_run: bool,
}

/// Resolve the kit selection against the manifest. Repeated names keep their
/// first position. Unknown names fail with both the invalid and the valid
/// set, each sorted.
pub fn resolve_kits(manifest: &KitManifest, requested: Option<&[String]>) -> Result<Vec<String>> {
    let kits: Vec<String> = match requested {
        Some(kits) if !kits.is_empty() => {
            let mut seen = HashSet::new();
            kits.iter()
                .filter(|k| seen.insert(k.as_str()))
                .cloned()
                .collect()
        }
        _ => vec![manifest.default_kit().to_string()],
    };

    let invalid: BTreeSet<&str> = kits
        .iter()
        .map(String::as_str)
        .filter(|k| manifest.kit(k).is_none())
        .collect();
    if !invalid.is_empty() {
        let mut valid = manifest.kit_names();
        valid.sort_unstable();
        return Err(LiteKitsError::InvalidKits {
            invalid: invalid.into_iter().collect::<Vec<_>>().join(", "),
            valid: valid.join(", "),
        });
    }
    Ok(kits)
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct KitPreview {
    pub kit: String,
    pub name: String,
    pub new_files: Vec<String>,
    pub modified_files: Vec<String>,
    pub new_directories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallPreview {
    pub agents: Vec<String>,
    pub shells: Vec<String>,
    pub kits: Vec<KitPreview>,
    pub conflicts: Vec<Overwrite>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallOutcome {
    pub success: bool,
    pub dry_run: bool,
    pub agents: Vec<String>,
    pub shells: Vec<String>,
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Overwrite>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// Files of one kit, keyed by both the manifest key and display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitFiles {
    pub kit: String,
    pub name: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalPreview {
    pub kits: Vec<KitFiles>,
    pub total_files: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalOutcome {
    pub success: bool,
    pub dry_run: bool,
    pub removed: Vec<KitFiles>,
    pub not_found: Vec<String>,
    pub cleaned_dirs: Vec<String>,
    pub error: Option<String>,
}

/// Which detected agents and supported shells have at least one file of an
/// installed kit present.
#[derive(Debug, Clone, Serialize)]
pub struct KitPresence {
    pub kit: String,
    pub name: String,
    pub agents: Vec<String>,
    pub shells: Vec<String>,
}

// ---------------------------------------------------------------------------
// Installer
// ---------------------------------------------------------------------------

pub struct Installer {
    target_dir: PathBuf,
    manifest: KitManifest,
    kits: Vec<String>,
    agents: Vec<String>,
    shells: Vec<String>,
    force: bool,
    dry_run: bool,
}

impl Installer {
    pub fn new(target_dir: &Path, manifest: KitManifest, opts: InstallerOptions) -> Result<Self> {
        {
            let detector = Detector::new(target_dir, &manifest);
            if !opts.agents.is_empty() {
                detector.detect_agents(&opts.agents)?;
            }
            if !opts.shells.is_empty() {
                detector.detect_shells(&opts.shells)?;
            }
        }
        let kits = resolve_kits(&manifest, opts.kits.as_deref())?;

        Ok(Self {
            target_dir: target_dir.to_path_buf(),
            manifest,
            kits,
            agents: opts.agents,
            shells: opts.shells,
            force: opts.force,
            dry_run: opts.dry_run,
        })
    }

    pub fn manifest(&self) -> &KitManifest {
        &self.manifest
    }

    pub fn kits(&self) -> &[String] {
        &self.kits
    }

    fn options(&self) -> &ManifestOptions {
        self.manifest.options()
    }

    fn detector(&self) -> Detector<'_> {
        Detector::new(&self.target_dir, &self.manifest)
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(&self.target_dir, &self.manifest)
    }

    fn target(&self, rel: &str) -> PathBuf {
        paths::join_relative(&self.target_dir, rel)
    }

    /// Agent and spec-kit marker paths. Pruning never removes these, so a
    /// project still detects the same way after its kits are removed.
    fn marker_dirs(&self) -> HashSet<PathBuf> {
        let manifest = self.manifest.manifest();
        manifest
            .agents
            .values()
            .map(|agent| agent.marker_dir.as_str())
            .chain(manifest.spec_kit.markers.iter().map(|m| m.path.as_str()))
            .map(|rel| self.target(rel))
            .collect()
    }

    fn no_agents_detected(&self) -> String {
        format!(
            "No AI agents detected. Supported: {}",
            self.manifest.supported_agents().join(", ")
        )
    }

    pub fn is_spec_kit_project(&self) -> bool {
        self.detector().is_spec_kit_project()
    }

    pub fn is_kit_installed(&self, kit_name: &str) -> bool {
        self.validator().is_kit_installed(kit_name)
    }

    pub fn validate(&self) -> Result<ValidationReport> {
        self.validator().validate_all()
    }

    // -----------------------------------------------------------------------
    // Install
    // -----------------------------------------------------------------------

    pub fn preview_installation(&self) -> Result<InstallPreview> {
        let detector = self.detector();
        let mut preview = InstallPreview {
            agents: detector.detect_agents(&self.agents)?,
            shells: detector.detect_shells(&self.shells)?,
            ..Default::default()
        };

        if preview.agents.is_empty() {
            preview.warnings.push(self.no_agents_detected());
            return Ok(preview);
        }

        preview.conflicts = ConflictChecker::new(&self.target_dir, &self.manifest)
            .check_conflicts(&self.kits, &preview.agents, &preview.shells)
            .overwrites;

        for kit_name in &self.kits {
            let mut kit = KitPreview {
                kit: kit_name.clone(),
                name: self.manifest.kit_display_name(kit_name).to_string(),
                new_files: Vec::new(),
                modified_files: Vec::new(),
                new_directories: Vec::new(),
            };
            let candidates = conflict::candidate_files(
                &self.manifest,
                kit_name,
                &preview.agents,
                &preview.shells,
            );
            for entry in candidates {
                let target = self.target(&entry.path);
                if target.exists() {
                    kit.modified_files.push(entry.path.clone());
                    continue;
                }
                kit.new_files.push(entry.path.clone());
                if let Some(parent) = target.parent() {
                    let dir = paths::display_relative(&self.target_dir, parent);
                    if !parent.exists() && !kit.new_directories.contains(&dir) {
                        kit.new_directories.push(dir);
                    }
                }
            }
            preview.kits.push(kit);
        }

        Ok(preview)
    }

    pub fn install(&self) -> InstallOutcome {
        let mut outcome = InstallOutcome {
            dry_run: self.dry_run,
            ..Default::default()
        };
        if let Err(e) = self.try_install(&mut outcome) {
            tracing::warn!(error = %e, "install failed");
            outcome.success = false;
            outcome.error = Some(e.to_string());
        }
        outcome
    }

    fn try_install(&self, outcome: &mut InstallOutcome) -> Result<()> {
        let detector = self.detector();
        outcome.agents = detector.detect_agents(&self.agents)?;
        outcome.shells = detector.detect_shells(&self.shells)?;

        if outcome.agents.is_empty() {
            outcome.error = Some(format!(
                "No supported AI interface found. Supported: {}. \
                 To enable AI interface support, create a '.claude/' or \
                 '.github/prompts/' directory in your project.",
                self.manifest.supported_agents().join(", ")
            ));
            return Ok(());
        }

        if !self.force {
            let report = ConflictChecker::new(&self.target_dir, &self.manifest).check_conflicts(
                &self.kits,
                &outcome.agents,
                &outcome.shells,
            );
            if report.has_conflicts {
                let message = format!(
                    "Found {} file conflicts. Use --force to overwrite.",
                    report.conflicts.len()
                );
                outcome.conflicts = report.overwrites;
                if !self.dry_run {
                    outcome.error = Some(message);
                    return Ok(());
                }
                outcome.warnings.push(message);
            }
        }

        let skip_existing = self.options().skip_existing;
        for kit_name in &self.kits {
            for entry in
                conflict::install_order(&self.manifest, kit_name, &outcome.agents, &outcome.shells)
            {
                if entry.is_planned() {
                    outcome.skipped.push(format!("{} (planned)", entry.path));
                    continue;
                }
                let target = self.target(&entry.path);
                if skip_existing && !self.force && target.exists() {
                    outcome.skipped.push(entry.path.clone());
                    continue;
                }
                if !self.dry_run {
                    io::copy_file(&self.manifest.source_path(entry), &target)?;
                    tracing::debug!(path = %entry.path, "installed");
                }
                outcome.installed.push(entry.path.clone());
            }
        }

        if self.options().validate_on_install && !self.dry_run {
            outcome.validation = Some(self.validate()?);
        }
        outcome.success = true;
        tracing::info!(
            kits = ?self.kits,
            installed = outcome.installed.len(),
            skipped = outcome.skipped.len(),
            dry_run = self.dry_run,
            "install complete"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    /// Non-planned files of every group of a kit, each path once.
    fn removable_files(&self, kit_name: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.manifest
            .kit_files(kit_name, None)
            .into_iter()
            .filter(|f| !f.is_planned())
            .map(|f| f.path.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    pub fn preview_removal(&self) -> RemovalPreview {
        let mut preview = RemovalPreview::default();
        for kit_name in &self.kits {
            let files: Vec<String> = self
                .removable_files(kit_name)
                .into_iter()
                .filter(|p| self.target(p).exists())
                .map(str::to_string)
                .collect();
            if files.is_empty() {
                continue;
            }
            preview.total_files += files.len();
            preview.kits.push(KitFiles {
                kit: kit_name.clone(),
                name: self.manifest.kit_display_name(kit_name).to_string(),
                files,
            });
        }
        preview
    }

    pub fn remove(&self) -> RemovalOutcome {
        let mut outcome = RemovalOutcome {
            dry_run: self.dry_run,
            ..Default::default()
        };
        if let Err(e) = self.try_remove(&mut outcome) {
            tracing::warn!(error = %e, "remove failed");
            outcome.success = false;
            outcome.error = Some(e.to_string());
        }
        outcome
    }

    fn try_remove(&self, outcome: &mut RemovalOutcome) -> Result<()> {
        // Deepest first so nested directories empty out before their parents.
        let mut parents: BTreeSet<PathBuf> = BTreeSet::new();

        for kit_name in &self.kits {
            let mut removed = Vec::new();
            for rel in self.removable_files(kit_name) {
                let target = self.target(rel);
                if !target.exists() {
                    outcome.not_found.push(rel.to_string());
                    continue;
                }
                if !self.dry_run {
                    std::fs::remove_file(&target)?;
                    tracing::debug!(path = rel, "removed");
                }
                if let Some(parent) = target.parent() {
                    parents.insert(parent.to_path_buf());
                }
                removed.push(rel.to_string());
            }
            if !removed.is_empty() {
                outcome.removed.push(KitFiles {
                    kit: kit_name.clone(),
                    name: self.manifest.kit_display_name(kit_name).to_string(),
                    files: removed,
                });
            }
        }

        if !self.dry_run {
            let keep = self.marker_dirs();
            for dir in parents.iter().rev() {
                if dir.as_path() == self.target_dir
                    || !dir.starts_with(&self.target_dir)
                    || keep.contains(dir)
                {
                    continue;
                }
                if io::remove_dir_if_empty(dir)? {
                    outcome
                        .cleaned_dirs
                        .push(paths::display_relative(&self.target_dir, dir));
                }
            }
        }

        outcome.success = true;
        tracing::info!(
            kits = ?self.kits,
            removed = outcome.removed.iter().map(|k| k.files.len()).sum::<usize>(),
            dry_run = self.dry_run,
            "remove complete"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// Per installed manifest kit, the agents and shells it has files for.
    pub fn installed_breakdown(&self) -> Result<Vec<KitPresence>> {
        let agents = self.detector().detect_agents(&[])?;
        let shells = self.manifest.supported_shells();

        let mut out = Vec::new();
        for kit_name in self.manifest.kit_names() {
            if !self.is_kit_installed(kit_name) {
                continue;
            }
            let has_files = |group: &str| {
                self.manifest
                    .kit_files(kit_name, Some(group))
                    .iter()
                    .any(|f| !f.is_planned() && self.target(&f.path).exists())
            };
            out.push(KitPresence {
                kit: kit_name.to_string(),
                name: self.manifest.kit_display_name(kit_name).to_string(),
                agents: agents
                    .iter()
                    .filter(|a| has_files(a.as_str()))
                    .cloned()
                    .collect(),
                shells: shells
                    .iter()
                    .filter(|s| has_files(**s))
                    .map(|s| s.to_string())
                    .collect(),
            });
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
