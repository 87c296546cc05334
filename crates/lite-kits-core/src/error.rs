use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiteKitsError {
    #[error("kit manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Invalid kit(s): {invalid}. Valid: {valid}")]
    InvalidKits { invalid: String, valid: String },

    #[error("Unknown agent: '{name}'\nValid options: {valid}")]
    UnknownAgent { name: String, valid: String },

    #[error("Agent not supported: {0}")]
    UnsupportedAgent(String),

    #[error("Unknown shell: '{name}'\nValid options: {valid}\nAliases: ps/pwsh->powershell, sh->bash")]
    UnknownShell { name: String, valid: String },

    #[error("Shell not supported: {0}")]
    UnsupportedShell(String),

    #[error("Kit file not found: {}", .0.display())]
    KitFileNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LiteKitsError>;
