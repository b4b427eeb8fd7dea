use crate::domain::LockExpirationPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lock_expiration: LockExpirationPolicy,
    /// Organize both pages after a rollover push
    #[serde(default = "default_true")]
    pub auto_organize: bool,
    /// Default for `organize` when no flag is given
    #[serde(default)]
    pub delete_completed_on_organize: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lock_expiration: LockExpirationPolicy::Weekly,
            auto_organize: true,
            delete_completed_on_organize: false,
        }
    }
}

/// Load settings from settings.json. A missing file means defaults; a
/// broken file also falls back to defaults with a logged warning, since
/// settings are not user data worth failing over.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Settings {
    let path = path.as_ref();
    if !path.exists() {
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("ignoring unreadable settings file {}: {err}", path.display());
                Settings::default()
            }
        },
        Err(err) => {
            log::warn!("could not read settings file {}: {err}", path.display());
            Settings::default()
        }
    }
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
