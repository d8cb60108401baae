//! Overlay appearance preferences.
//!
//! Only how the overlay looks is persisted here. Placements themselves are
//! never stored.

use crate::error::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Appearance settings persisted between runs.
///
/// Settings are stored as JSON in the user's config directory
/// (e.g., `~/.config/gridsnap/settings.json` on Linux).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Darkness of the dimmed background (0-255, higher = darker).
    pub dim_alpha: u8,
    /// Draw the 3×3 divider lines.
    pub show_grid: bool,
    /// Highlight the cell the current drag would snap to.
    pub snap_preview: bool,
    /// Border width of the live selection.
    pub border_width: f32,
}

impl Settings {
    /// Returns the path to the settings file, if the platform has a config
    /// directory.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gridsnap").map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from disk, falling back to defaults if missing or
    /// unreadable.
    pub fn load() -> Self {
        Self::path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Loads settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .map(|content| Self::from_json(&content))
            .unwrap_or_default()
    }

    /// Parses settings, falling back to defaults on malformed input.
    pub fn from_json(content: &str) -> Self {
        match serde_json::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Persists settings to `path`, creating its directory if needed.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dim_alpha: 140,
            show_grid: true,
            snap_preview: true,
            border_width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "dim_alpha": 200 }"#);
        assert_eq!(s.dim_alpha, 200);
        assert!(s.show_grid);
        assert!(s.snap_preview);
    }

    #[test]
    fn malformed_json_is_default() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn json_round_trip() {
        let s = Settings {
            dim_alpha: 10,
            show_grid: false,
            snap_preview: false,
            border_width: 1.0,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            dim_alpha: 90,
            show_grid: false,
            ..Settings::default()
        };
        s.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), s);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.json")),
            Settings::default()
        );
    }
}
