use crate::manifest::{FileEntry, KitManifest};
use crate::paths;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// A file the install would replace with different content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overwrite {
    pub path: String,
    pub source: String,
    pub size_current: u64,
    pub size_new: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictReport {
    /// Existing targets whose content differs from the bundle, or could not be compared.
    pub conflicts: Vec<String>,
    /// Size details for the comparable conflicts.
    pub overwrites: Vec<Overwrite>,
    /// Targets that do not exist yet.
    pub safe: Vec<String>,
    pub has_conflicts: bool,
}

/// Every file an install of `kit_name` walks for the given agents and
/// shells: each agent's group, each shell's group, then every
/// agent-agnostic file. Planned entries are kept; repeated paths are not.
pub fn install_order<'m>(
    manifest: &'m KitManifest,
    kit_name: &str,
    agents: &[String],
    shells: &[String],
) -> Vec<&'m FileEntry> {
    let grouped = agents
        .iter()
        .chain(shells)
        .flat_map(|group| manifest.kit_files(kit_name, Some(group.as_str())));
    let agnostic = manifest
        .kit_files(kit_name, None)
        .into_iter()
        .filter(|f| !f.kind.is_agent_specific());

    let mut seen = HashSet::new();
    grouped
        .chain(agnostic)
        .filter(|f| {
            let entry: &'m FileEntry = *f;
            seen.insert(entry.path.as_str())
        })
        .collect()
}

/// [`install_order`] without planned files: what an install actually copies.
pub fn candidate_files<'m>(
    manifest: &'m KitManifest,
    kit_name: &str,
    agents: &[String],
    shells: &[String],
) -> Vec<&'m FileEntry> {
    install_order(manifest, kit_name, agents, shells)
        .into_iter()
        .filter(|f| !f.is_planned())
        .collect()
}

/// Compares bundled sources with what already exists in the target.
pub struct ConflictChecker<'a> {
    target_dir: &'a Path,
    manifest: &'a KitManifest,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(target_dir: &'a Path, manifest: &'a KitManifest) -> Self {
        Self {
            target_dir,
            manifest,
        }
    }

    pub fn check_conflicts(
        &self,
        kits: &[String],
        agents: &[String],
        shells: &[String],
    ) -> ConflictReport {
        let mut report = ConflictReport::default();
        for kit_name in kits {
            for entry in candidate_files(self.manifest, kit_name, agents, shells) {
                self.check_file(entry, &mut report);
            }
        }
        report.has_conflicts = !report.conflicts.is_empty();
        if report.has_conflicts {
            tracing::warn!(
                count = report.conflicts.len(),
                "existing files differ from kit sources"
            );
        }
        report
    }

    fn check_file(&self, entry: &FileEntry, report: &mut ConflictReport) {
        let target = paths::join_relative(self.target_dir, &entry.path);
        if !target.exists() {
            if !report.safe.contains(&entry.path) {
                report.safe.push(entry.path.clone());
            }
            return;
        }

        let source = self.manifest.source_path(entry);
        if !source.exists() {
            return;
        }
        if report.conflicts.contains(&entry.path) {
            return;
        }

        let compared = std::fs::read_to_string(&source).and_then(|new| {
            let current = std::fs::read_to_string(&target)?;
            Ok(new == current)
        });
        match compared {
            Ok(true) => {}
            Ok(false) => {
                report.conflicts.push(entry.path.clone());
                report.overwrites.push(Overwrite {
                    path: entry.path.clone(),
                    source: entry.source.clone(),
                    size_current: file_size(&target),
                    size_new: file_size(&source),
                });
            }
            Err(e) => {
                tracing::debug!(path = %entry.path, error = %e, "unreadable, treating as conflict");
                report.conflicts.push(entry.path.clone());
            }
        }
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
