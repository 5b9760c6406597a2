//! Player settings and preferences
//!
//! Persisted in LocalStorage, separately from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last name entered, prefilled on the start screen
    pub player_name: String,

    // === Leaderboard ===
    /// Base URL of the remote leaderboard; local-only when unset
    pub leaderboard_url: Option<String>,
    /// Public API key sent with leaderboard requests
    pub leaderboard_key: Option<String>,

    // === Entry ===
    /// Each run needs a confirmed payment of the entry fee
    pub require_payment: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no immunity pulse)
    pub reduced_motion: bool,
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "penguin_circuit_settings";

    /// Trimmed player name, `None` if blank
    pub fn player(&self) -> Option<&str> {
        let name = self.player_name.trim();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Whether a remote leaderboard is configured
    pub fn has_remote_leaderboard(&self) -> bool {
        self.leaderboard_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Load settings from LocalStorage, defaults if missing or corrupt
    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => {
                    log::warn!("Discarding corrupt settings: {}", e);
                    platform::storage_remove(Self::STORAGE_KEY);
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if platform::storage_set(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::error!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_is_trimmed() {
        let mut settings = Settings::default();
        assert_eq!(settings.player(), None);
        settings.player_name = "   ".to_string();
        assert_eq!(settings.player(), None);
        settings.player_name = "  Ada ".to_string();
        assert_eq!(settings.player(), Some("Ada"));
    }

    #[test]
    fn test_remote_leaderboard_detection() {
        let mut settings = Settings::default();
        assert!(!settings.has_remote_leaderboard());
        settings.leaderboard_url = Some(" ".to_string());
        assert!(!settings.has_remote_leaderboard());
        settings.leaderboard_url = Some("https://scores.example".to_string());
        assert!(settings.has_remote_leaderboard());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "player_name": "Ada" }"#).unwrap();
        assert_eq!(settings.player_name, "Ada");
        assert!(!settings.reduced_motion);
        assert!(!settings.require_payment);
        assert_eq!(settings.leaderboard_url, None);
    }

    #[test]
    fn test_native_load_falls_back_to_default() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
