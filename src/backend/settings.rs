use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;

/// Published CSV export of the submissions sheet.
pub const DEFAULT_FEED_URL: &str =
    "https://docs.google.com/spreadsheets/d/1YkJ7VEeP1RT4PGS2D_X9S4i0L9FT_KLeC-UKVVv5nbo/pub?output=csv";

/// Submission form for new listings.
pub const SUBMIT_FORM_URL: &str = "https://tally.so/r/wgLJAN";

const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(PartialEq, Clone, Copy, Serialize, Deserialize, Debug)]
pub enum Theme {
    System,
    Dark,
    Light,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::System, Theme::Dark, Theme::Light]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: f32,
    pub row_height: f32,
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            font_size: 14.0,
            row_height: 56.0,
            feed_url: default_feed_url(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "web3dir") {
            let config_path = proj_dirs.config_dir().join("config.json");

            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(&config_path) {
                    if let Ok(settings) = serde_json::from_str(&content) {
                        return settings;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "web3dir") {
            let config_dir = proj_dirs.config_dir();
            if !config_dir.exists() {
                let _ = fs::create_dir_all(config_dir);
            }
            let config_path = config_dir.join("config.json");

            if let Ok(content) = serde_json::to_string_pretty(self) {
                let _ = fs::write(config_path, content);
            }
        }
    }

    pub fn reset() {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "web3dir") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                let _ = fs::remove_file(config_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.feed_url, DEFAULT_FEED_URL);
        assert_eq!(settings.debounce_ms, 300);
        assert_eq!(settings.theme, Theme::System);
    }

    #[test]
    fn test_missing_fields_fall_back_on_deserialize() {
        // Older config files predate the feed settings.
        let json = r#"{"theme":"Dark","font_size":16.0,"row_height":48.0}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.feed_url, DEFAULT_FEED_URL);
        assert_eq!(settings.debounce_ms, 300);
    }
}
