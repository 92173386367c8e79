//! Gesture label to action name bindings.
//!
//! Bindings are a flat JSON object (`{"fist": "volume_mute", ...}`). A fresh
//! installation starts from a small default set, which is written out on
//! first load so it can be edited by hand.

use crate::{actions::Action, gesture_store::write_atomic, Error, Result};
use log::{info, warn};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Bindings used when no bindings file exists yet
pub const DEFAULT_BINDINGS: [(&str, &str); 5] = [
    ("fist", "volume_mute"),
    ("open_palm", "play_pause"),
    ("peace", "screenshot"),
    ("thumbs_up", "volume_up"),
    ("thumbs_down", "volume_down"),
];

/// Persistent gesture → action mapping
#[derive(Debug, Clone)]
pub struct ActionMap {
    path: Option<PathBuf>,
    mapping: BTreeMap<String, String>,
}

impl ActionMap {
    /// Load bindings from `path`, creating it with the defaults if absent.
    ///
    /// # Errors
    ///
    /// [`Error::Persistence`] if the file exists but is unreadable or not a
    /// JSON object of strings, or if the defaults cannot be written.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Persistence(format!("failed to read {}: {e}", path.display())))?;
            let mapping: BTreeMap<String, String> = serde_json::from_str(&content)
                .map_err(|e| Error::Persistence(format!("failed to parse {}: {e}", path.display())))?;
            info!("Loaded {} gesture bindings from {}", mapping.len(), path.display());
            return Ok(Self {
                path: Some(path),
                mapping,
            });
        }

        warn!("Bindings file not found at {}. Writing defaults.", path.display());
        let map = Self {
            path: Some(path),
            mapping: defaults(),
        };
        map.save(&map.mapping)?;
        Ok(map)
    }

    /// Bindings held only in memory, starting from the defaults
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            mapping: defaults(),
        }
    }

    /// Bindings held only in memory, starting empty
    #[must_use]
    pub fn empty() -> Self {
        Self {
            path: None,
            mapping: BTreeMap::new(),
        }
    }

    /// Bind `gesture` to `action`, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for empty names, [`Error::Persistence`] if the
    /// write fails (the previous binding is kept).
    pub fn map_gesture(&mut self, gesture: &str, action: &str) -> Result<()> {
        if gesture.is_empty() || action.is_empty() {
            return Err(Error::InvalidInput("gesture and action are required".to_string()));
        }
        let mut next = self.mapping.clone();
        next.insert(gesture.to_string(), action.to_string());
        self.commit(next)?;
        info!("Mapped {gesture} -> {action}");
        Ok(())
    }

    /// Move the binding of `old` to `new`. Succeeds without change when
    /// `old` has no binding.
    ///
    /// # Errors
    ///
    /// [`Error::Persistence`] if the write fails.
    pub fn rename_mapping(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new || !self.mapping.contains_key(old) {
            return Ok(());
        }
        let mut next = self.mapping.clone();
        if let Some(action) = next.remove(old) {
            next.insert(new.to_string(), action);
        }
        self.commit(next)
    }

    /// Drop the binding of `gesture`, if any.
    ///
    /// # Errors
    ///
    /// [`Error::Persistence`] if the write fails.
    pub fn remove_mapping(&mut self, gesture: &str) -> Result<()> {
        if !self.mapping.contains_key(gesture) {
            return Ok(());
        }
        let mut next = self.mapping.clone();
        next.remove(gesture);
        self.commit(next)
    }

    /// Raw action name bound to `gesture`
    #[must_use]
    pub fn action_name(&self, gesture: &str) -> Option<&str> {
        self.mapping.get(gesture).map(String::as_str)
    }

    /// Parsed action bound to `gesture`
    #[must_use]
    pub fn action_for(&self, gesture: &str) -> Option<Action> {
        self.action_name(gesture).map(Action::parse)
    }

    /// Whether `gesture` is bound to a continuous action
    #[must_use]
    pub fn is_continuous(&self, gesture: &str) -> bool {
        self.action_for(gesture).is_some_and(|a| a.is_continuous())
    }

    #[must_use]
    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> Result<()> {
        self.save(&next)?;
        self.mapping = next;
        Ok(())
    }

    fn save(&self, mapping: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(mapping)
            .map_err(|e| Error::Persistence(format!("failed to encode bindings: {e}")))?;
        write_atomic(path, &json)
    }
}

fn defaults() -> BTreeMap<String, String> {
    DEFAULT_BINDINGS
        .iter()
        .map(|(g, a)| ((*g).to_string(), (*a).to_string()))
        .collect()
}
