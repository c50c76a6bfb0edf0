//! Persistence for the "has seen onboarding" flag
//!
//! Client-local key-value storage: a single JSON object of string values.
//! A missing file or key means the flag is false.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Storage key of the onboarding flag
pub const HAS_SEEN_ONBOARDING_KEY: &str = "hasSeenOnboarding";

const TRUE_VALUE: &str = "true";

/// Any non-empty stored value counts, whatever it says
fn is_seen(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Where the onboarding flag lives
pub trait FlagStore: Send + Sync {
    /// Check if onboarding was already completed or skipped
    fn has_seen_onboarding(&self) -> Result<bool>;

    /// Record completion; never cleared by the application
    fn mark_onboarding_seen(&self) -> Result<()>;
}

/// Flag store backed by a JSON file
pub struct FileFlagStore {
    path: PathBuf,
}

impl FileFlagStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::Serialization(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl FlagStore for FileFlagStore {
    fn has_seen_onboarding(&self) -> Result<bool> {
        let values = self.load()?;
        Ok(is_seen(values.get(HAS_SEEN_ONBOARDING_KEY)))
    }

    fn mark_onboarding_seen(&self) -> Result<()> {
        // Keep whatever else lives in the file
        let mut values = self.load()?;
        values.insert(HAS_SEEN_ONBOARDING_KEY.to_string(), TRUE_VALUE.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json)?;

        info!(path = %self.path.display(), "Onboarding marked as seen");
        Ok(())
    }
}

/// Flag store that forgets everything on exit
#[derive(Default)]
pub struct MemoryFlagStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where onboarding was already seen
    pub fn seen() -> Self {
        let store = Self::new();
        store.set(HAS_SEEN_ONBOARDING_KEY, TRUE_VALUE);
        store
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
    }
}

impl FlagStore for MemoryFlagStore {
    fn has_seen_onboarding(&self) -> Result<bool> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(is_seen(values.get(HAS_SEEN_ONBOARDING_KEY)))
    }

    fn mark_onboarding_seen(&self) -> Result<()> {
        self.set(HAS_SEEN_ONBOARDING_KEY, TRUE_VALUE);
        debug!("Onboarding marked as seen (in memory)");
        Ok(())
    }
}
