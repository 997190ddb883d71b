//! Game settings
//!
//! Read once at startup from a JSON file beside the executable, or from the
//! path in `STAR_CATCHER_CONFIG`. Every field is optional in the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::game::entities::Field;
use crate::game::GameConfig;

const CONFIG_ENV: &str = "STAR_CATCHER_CONFIG";
const CONFIG_FILE: &str = "star-catcher.json";

// The field must fit a basket and leave a spawn column for stars.
const MIN_FIELD_WIDTH: f64 = 120.0;
const MIN_FIELD_HEIGHT: f64 = 120.0;

/// Key names per logical action, e.g. `"Left"`, `"a"`, `"Enter"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            left: names(&["Left", "a"]),
            right: names(&["Right", "d"]),
            restart: names(&["r", "Enter"]),
            quit: names(&["q", "Esc"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical play-field size; the terminal view is scaled to it
    pub field_width: f64,
    pub field_height: f64,
    /// Length of one session in seconds
    pub session_secs: u32,
    /// Frame period in milliseconds (16 ≈ 60 FPS)
    pub frame_ms: u64,
    /// Frames a key press counts as held when the terminal cannot report releases.
    /// It must outlast the terminal's auto-repeat delay (often 250-500 ms) or the
    /// basket stutters after the first step; larger values make it coast longer
    /// after the key is let go.
    pub hold_frames: u32,
    pub keys: KeyBindings,
    /// Overrides the default high-score file location
    pub scores_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let field = Field::default();
        Self {
            field_width: field.width,
            field_height: field.height,
            session_secs: 60,
            frame_ms: 16,
            hold_frames: 30,
            keys: KeyBindings::default(),
            scores_file: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(CONFIG_FILE);
            }
        }
        PathBuf::from(CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            info!("no settings at {}, using defaults", path.display());
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("invalid settings in {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Replace out-of-range values with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.field_width >= MIN_FIELD_WIDTH && self.field_width.is_finite()) {
            warn!("field_width {} too small, using {}", self.field_width, defaults.field_width);
            self.field_width = defaults.field_width;
        }
        if !(self.field_height >= MIN_FIELD_HEIGHT && self.field_height.is_finite()) {
            warn!("field_height {} too small, using {}", self.field_height, defaults.field_height);
            self.field_height = defaults.field_height;
        }
        if self.session_secs == 0 {
            warn!("session_secs must be positive, using {}", defaults.session_secs);
            self.session_secs = defaults.session_secs;
        }
        if self.frame_ms == 0 {
            warn!("frame_ms must be positive, using {}", defaults.frame_ms);
            self.frame_ms = defaults.frame_ms;
        }
        self
    }

    pub fn field(&self) -> Field {
        Field {
            width: self.field_width,
            height: self.field_height,
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Game configuration. `releases_reported` tells whether the terminal
    /// sends key-release events; without them presses expire after `hold_frames`.
    pub fn game_config(&self, releases_reported: bool) -> GameConfig {
        GameConfig {
            field: self.field(),
            session_secs: self.session_secs,
            hold_frames: if releases_reported {
                None
            } else {
                Some(self.hold_frames.max(1))
            },
        }
    }
}

/// Parse a key name such as `"Left"`, `"Enter"`, `"Space"` or `"a"`.
/// Letters are matched case-insensitively.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c.to_ascii_lowercase()));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => return None,
    };
    Some(code)
}
