//! Theme Preference
//!
//! Persists the light/dark choice in its own storage slot.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StorefrontError};
use crate::storage::{SlotStorage, THEME_SLOT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Reads the stored theme. Anything missing or unrecognized is `Light`.
    pub fn load(storage: &dyn SlotStorage) -> Self {
        match storage.read(THEME_SLOT) {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                debug!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                debug!("Theme slot unreadable: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save(self, storage: &mut dyn SlotStorage) -> Result<()> {
        let payload = serde_json::to_string(&self)
            .map_err(|e| StorefrontError::Storage(format!("cannot encode theme: {}", e)))?;
        storage.write(THEME_SLOT, &payload)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}
