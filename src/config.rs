//! CLI configuration
//!
//! An optional YAML file supplying defaults for the command line. The sync
//! engine itself never reads it; the CLI turns it into [`SyncOptions`].
//!
//! ```yaml
//! git: /usr/local/bin/git
//! commit_message: "[Auto] Syncing local changes with remote"
//! log_level: debug
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sync::{SyncOptions, DEFAULT_COMMIT_MESSAGE};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Git binary to run
    pub git: PathBuf,
    /// Message for the temp commit
    pub commit_message: String,
    /// One of debug, info, warn, error
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        // An empty file deserializes to unit, not to an empty map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|err| Error::ConfigParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Sync options seeded from this config
    pub fn sync_options(&self, dry_run: bool, verbose: bool) -> SyncOptions {
        SyncOptions {
            dry_run,
            verbose,
            commit_message: self.commit_message.clone(),
        }
    }
}
