//! Context file I/O
//!
//! One scoped JSON record holds the active cluster selection. Writes are
//! atomic (temp file + rename) so concurrent readers never observe a
//! partial record; concurrent writers race under last-writer-wins.

use std::fs;
use std::path::PathBuf;

use crate::config::context as context_config;
use crate::error::EcsError;

use super::models::ContextConfig;

/// Handles reading and writing the persisted context file
pub struct ContextStore {
    config_path: PathBuf,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// Create a new store using the default path (~/.ecsctl/config.json)
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a store with a custom path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default context file path
    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(context_config::DIR_NAME)
            .join(context_config::FILE_NAME)
    }

    /// Load the persisted context from disk.
    /// Returns Default if the file doesn't exist; a corrupt file is an
    /// error naming the path, never silently reset.
    pub fn load(&self) -> Result<ContextConfig, EcsError> {
        if !self.config_path.exists() {
            return Ok(ContextConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            EcsError::Config(format!(
                "Failed to read context file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            EcsError::Config(format!(
                "Failed to parse context file {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }

    /// Save the context to disk.
    /// Uses atomic write (tmp file + rename) and creates the parent dir if needed.
    pub fn save(&self, config: &ContextConfig) -> Result<(), EcsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EcsError::Config(format!(
                    "Failed to create context directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| EcsError::Config(format!("Failed to serialize context: {}", e)))?;

        // Atomic write: write to tmp file, then rename
        let tmp_path = self.config_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json).map_err(|e| {
            EcsError::Config(format!(
                "Failed to write temp context file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        // Set 0600 permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, permissions).map_err(|e| {
                EcsError::Config(format!("Failed to set permissions on context file: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.config_path).map_err(|e| {
            EcsError::Config(format!(
                "Failed to rename temp context file to {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
