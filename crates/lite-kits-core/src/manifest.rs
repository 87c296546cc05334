use crate::error::{LiteKitsError, Result};
use crate::paths;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// FileKind / FileStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Command,
    Prompt,
    Script,
    /// Memory guides, templates and anything else not tied to an agent or shell.
    #[default]
    #[serde(other)]
    Support,
}

impl FileKind {
    /// Commands, prompts and scripts are installed per agent/shell group.
    pub fn is_agent_specific(self) -> bool {
        matches!(self, FileKind::Command | FileKind::Prompt | FileKind::Script)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Planned,
    #[default]
    #[serde(other)]
    Normal,
}

// ---------------------------------------------------------------------------
// FileEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Target-relative destination.
    pub path: String,
    /// Bundle-relative source.
    pub source: String,
    #[serde(rename = "type", default)]
    pub kind: FileKind,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub status: FileStatus,
}

impl FileEntry {
    pub fn is_planned(&self) -> bool {
        self.status == FileStatus::Planned
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// KitDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub markers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: IndexMap<String, Vec<FileEntry>>,
    #[serde(default)]
    pub commands: Vec<KitCommand>,
}

// `agents:` with nothing under it parses as null.
fn null_as_empty<'de, D, V>(d: D) -> std::result::Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let opt: Option<IndexMap<String, V>> = Option::deserialize(d)?;
    Ok(opt.unwrap_or_default())
}

fn default_icon() -> String {
    "📦".to_string()
}

// ---------------------------------------------------------------------------
// AgentConfig / ShellConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub marker_dir: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub supported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub supported: bool,
}

fn default_priority() -> i64 {
    999
}

// ---------------------------------------------------------------------------
// SpecKitConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    #[default]
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecKitMarker {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecKitConfig {
    #[serde(default)]
    pub markers: Vec<SpecKitMarker>,
    #[serde(default = "default_true")]
    pub require_any: bool,
}

impl Default for SpecKitConfig {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            require_any: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestOptions {
    #[serde(default = "default_kit_name")]
    pub default_kit: String,
    #[serde(default = "default_true")]
    pub skip_existing: bool,
    #[serde(default = "default_true")]
    pub validate_on_install: bool,
    #[serde(default = "default_true")]
    pub check_file_integrity: bool,
    #[serde(default = "default_min_file_size")]
    pub min_file_size: u64,
    #[serde(default = "default_true")]
    pub auto_detect_shells: bool,
    #[serde(default)]
    pub prefer_all_shells: bool,
}

fn default_kit_name() -> String {
    "dev".to_string()
}

fn default_min_file_size() -> u64 {
    100
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            default_kit: default_kit_name(),
            skip_existing: true,
            validate_on_install: true,
            check_file_integrity: true,
            min_file_size: default_min_file_size(),
            auto_detect_shells: true,
            prefer_all_shells: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Manifest (document)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kits: IndexMap<String, KitDefinition>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub agents: IndexMap<String, AgentConfig>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shells: IndexMap<String, ShellConfig>,
    #[serde(default)]
    pub spec_kit: SpecKitConfig,
    #[serde(default)]
    pub options: ManifestOptions,
}

// ---------------------------------------------------------------------------
// KitManifest (document + bundle location)
// ---------------------------------------------------------------------------

/// A parsed `kits.yaml` together with the bundle directory its `source`
/// paths are relative to. Loaded once and owned by an installer.
#[derive(Debug, Clone)]
pub struct KitManifest {
    kits_dir: PathBuf,
    manifest: Manifest,
}

impl KitManifest {
    pub fn load(kits_dir: &Path) -> Result<Self> {
        let path = paths::manifest_path(kits_dir);
        if !path.is_file() {
            return Err(LiteKitsError::ManifestNotFound(path));
        }
        let data = std::fs::read_to_string(&path)?;
        let manifest: Manifest = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), kits = manifest.kits.len(), "loaded kit manifest");
        Ok(Self {
            kits_dir: kits_dir.to_path_buf(),
            manifest,
        })
    }

    pub fn kits_dir(&self) -> &Path {
        &self.kits_dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    // -----------------------------------------------------------------------
    // Kits
    // -----------------------------------------------------------------------

    pub fn kit(&self, name: &str) -> Option<&KitDefinition> {
        self.manifest.kits.get(name)
    }

    pub fn kit_names(&self) -> Vec<&str> {
        self.manifest.kits.keys().map(String::as_str).collect()
    }

    pub fn recommended_kits(&self) -> Vec<&str> {
        self.manifest
            .kits
            .iter()
            .filter(|(_, kit)| kit.recommended)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn default_kit(&self) -> &str {
        &self.manifest.options.default_kit
    }

    /// Files of a kit. `Some(group)` selects one file group (an agent or
    /// shell name); `None` concatenates every group in manifest order.
    /// Unknown kits and groups yield an empty list.
    pub fn kit_files(&self, kit_name: &str, group: Option<&str>) -> Vec<&FileEntry> {
        let Some(kit) = self.kit(kit_name) else {
            return Vec::new();
        };
        match group {
            Some(group) => kit
                .files
                .get(group)
                .map(|files| files.iter().collect())
                .unwrap_or_default(),
            None => kit.files.values().flatten().collect(),
        }
    }

    pub fn kit_markers(&self, kit_name: &str) -> &[String] {
        self.kit(kit_name)
            .map(|k| k.markers.as_slice())
            .unwrap_or(&[])
    }

    pub fn kit_commands(&self, kit_name: &str) -> &[KitCommand] {
        self.kit(kit_name)
            .map(|k| k.commands.as_slice())
            .unwrap_or(&[])
    }

    /// Display name of a kit, falling back to its key.
    pub fn kit_display_name<'a>(&'a self, kit_name: &'a str) -> &'a str {
        self.kit(kit_name)
            .map(|k| k.name.as_str())
            .unwrap_or(kit_name)
    }

    // -----------------------------------------------------------------------
    // Agents / shells / options
    // -----------------------------------------------------------------------

    pub fn agent_config(&self, agent: &str) -> Option<&AgentConfig> {
        self.manifest.agents.get(agent)
    }

    pub fn shell_config(&self, shell: &str) -> Option<&ShellConfig> {
        self.manifest.shells.get(shell)
    }

    pub fn supported_agents(&self) -> Vec<&str> {
        self.manifest
            .agents
            .iter()
            .filter(|(_, cfg)| cfg.supported)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn supported_shells(&self) -> Vec<&str> {
        self.manifest
            .shells
            .iter()
            .filter(|(_, cfg)| cfg.supported)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn options(&self) -> &ManifestOptions {
        &self.manifest.options
    }

    pub fn spec_kit(&self) -> &SpecKitConfig {
        &self.manifest.spec_kit
    }

    // -----------------------------------------------------------------------
    // Bundle
    // -----------------------------------------------------------------------

    pub fn source_path(&self, entry: &FileEntry) -> PathBuf {
        paths::join_relative(&self.kits_dir, &entry.source)
    }

    /// `(kit, source)` pairs for non-planned files whose bundled source is
    /// absent. An empty result means every installable file can be copied.
    pub fn missing_sources(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (kit_name, kit) in self.manifest.kits.iter() {
            for entry in kit.files.values().flatten() {
                if entry.is_planned() || self.source_path(entry).is_file() {
                    continue;
                }
                tracing::warn!(kit = %kit_name, source = %entry.source, "kit source file missing");
                missing.push((kit_name.clone(), entry.source.clone()));
            }
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
