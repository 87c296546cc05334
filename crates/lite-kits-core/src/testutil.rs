//! Fixtures shared by the unit tests: a throwaway kit bundle and project.

use crate::manifest::{KitManifest, Manifest};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const SAMPLE_MANIFEST: &str = r#"
kits:
  dev:
    name: Dev Kit
    description: Solo development essentials
    recommended: true
    icon: "🚀"
    markers:
      - .claude/commands/orient.md
      - .github/prompts/orient.prompt.md
    files:
      claude:
        - path: .claude/commands/orient.md
          source: dev/claude/commands/orient.md
          type: command
        - path: .claude/commands/commit.md
          source: dev/claude/commands/commit.md
          type: command
      copilot:
        - path: .github/prompts/orient.prompt.md
          source: dev/github/prompts/orient.prompt.md
          type: prompt
        - path: .github/prompts/commit.prompt.md
          source: dev/github/prompts/commit.prompt.md
          type: prompt
    commands:
      - name: orient
        description: Orient yourself in the project
        status: stable
      - name: commit
        description: Write a conventional commit

  multiagent:
    name: Multiagent Kit
    description: Multi-agent coordination
    markers:
      - .claude/commands/sync.md
      - .specify/memory/pr-workflow-guide.md
    files:
      claude:
        - path: .claude/commands/sync.md
          source: multiagent/claude/commands/sync.md
          type: command
        - path: .claude/commands/delegate.md
          source: multiagent/claude/commands/delegate.md
          type: command
          status: planned
      bash:
        - path: .specify/scripts/bash/sync-status.sh
          source: multiagent/scripts/bash/sync-status.sh
          type: script
      powershell:
        - path: .specify/scripts/powershell/sync-status.ps1
          source: multiagent/scripts/powershell/sync-status.ps1
          type: script
      memory:
        - path: .specify/memory/pr-workflow-guide.md
          source: multiagent/memory/pr-workflow-guide.md
          type: memory
        - path: .specify/memory/notes.md
          source: multiagent/memory/notes.md
          type: memory
          required: false

agents:
  claude:
    marker_dir: .claude
    priority: 1
    supported: true
  copilot:
    marker_dir: .github/prompts
    priority: 2
    supported: true
  cursor:
    marker_dir: .cursor/rules
    priority: 3
    supported: false

shells:
  bash:
    priority: 1
    supported: true
  powershell:
    priority: 2
    supported: true

spec_kit:
  markers:
    - path: .specify
      type: directory
    - path: .claude
      type: directory
    - path: .github/prompts
      type: directory
  require_any: true

options:
  default_kit: dev
  skip_existing: true
  validate_on_install: true
  check_file_integrity: true
  min_file_size: 100
  auto_detect_shells: true
  prefer_all_shells: false
"#;

pub(crate) fn sample_manifest() -> &'static str {
    SAMPLE_MANIFEST
}

/// Template body for a bundled source; comfortably above `min_file_size`.
pub(crate) fn source_body(source: &str) -> String {
    format!(
        "# {source}\n\nThis is the bundled template for {source}.\n\
         It is long enough to pass the integrity size check during validation.\n"
    )
}

/// Write `content` to `root/rel`, creating parents.
pub(crate) fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A kit bundle on disk: `kits.yaml` plus a source file for every
/// non-planned entry.
pub(crate) struct KitBundle {
    dir: TempDir,
}

impl KitBundle {
    pub(crate) fn new(yaml: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("kits.yaml"), yaml).unwrap();
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        for kit in manifest.kits.values() {
            for entry in kit.files.values().flatten() {
                if !entry.is_planned() {
                    write(dir.path(), &entry.source, &source_body(&entry.source));
                }
            }
        }
        Self { dir }
    }

    pub(crate) fn kits_dir(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn load(&self) -> KitManifest {
        KitManifest::load(self.kits_dir()).unwrap()
    }
}

/// An empty project with a `.claude/` directory so the claude agent is
/// detected and the target counts as a spec-kit project.
pub(crate) fn claude_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    dir
}
