use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::themes::ThemeName;
use tokgraph_core::Metric;

const DEFAULT_DAYS: u32 = 365;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Extra log roots scanned in addition to the discovered ones
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

fn default_theme() -> String {
    ThemeName::Green.as_str().to_string()
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn default_metric() -> String {
    Metric::Sessions.as_str().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            days: default_days(),
            metric: default_metric(),
            roots: Vec::new(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tokgraph").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| Self::from_json(&content))
            .unwrap_or_default()
    }

    /// Parse settings, falling back to defaults on malformed content.
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_default()
    }

    pub fn theme_name(&self) -> ThemeName {
        self.theme.parse().unwrap_or(ThemeName::Green)
    }

    /// Stored metric, or sessions if the stored name is unknown.
    pub fn metric(&self) -> Metric {
        self.metric.parse().unwrap_or_default()
    }

    /// Stored window, never less than one day.
    pub fn days(&self) -> u32 {
        self.days.max(1)
    }
}
