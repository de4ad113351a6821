// ── Startup configuration ─────────────────────────────────────────────────────
//
// Reads `%APPDATA%\Tack\config.json` if it exists.  Strictly read-only: the
// application never writes this file (or any other); a missing config simply
// means the built-in defaults.
// No `unsafe` — pure safe Rust + serde_json.

use std::{fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;

// ── Defaults ──────────────────────────────────────────────────────────────────
// All geometry is in 96-DPI pixels; `platform::win32::dpi::scale` applies the
// system scale factor at window-creation time.

const DEFAULT_TITLE: &str = "Tack";
const DEFAULT_WIDTH: i32 = 420;
const DEFAULT_HEIGHT: i32 = 240;

const DEFAULT_BUTTON_LABEL: &str = "Click me";
const DEFAULT_BUTTON_X: i32 = 110;
const DEFAULT_BUTTON_Y: i32 = 80;
const DEFAULT_BUTTON_WIDTH: i32 = 200;
const DEFAULT_BUTTON_HEIGHT: i32 = 50;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON config file.  Every field is optional in the file:
/// missing fields take the defaults above, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct WindowConfig {
    /// Title bar text.
    pub(crate) title: String,
    /// Outer window width at 96 DPI.
    pub(crate) width: i32,
    /// Outer window height at 96 DPI.
    pub(crate) height: i32,
    /// The push button.
    pub(crate) button: ButtonConfig,
}

/// Label and geometry of the push button, relative to the parent client area.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ButtonConfig {
    pub(crate) label: String,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            button: ButtonConfig::default(),
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_BUTTON_LABEL.to_owned(),
            x: DEFAULT_BUTTON_X,
            y: DEFAULT_BUTTON_Y,
            width: DEFAULT_BUTTON_WIDTH,
            height: DEFAULT_BUTTON_HEIGHT,
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the config file: `%APPDATA%\Tack\config.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
fn config_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Tack");
    p.push("config.json");
    Some(p)
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the config file, falling back to defaults.
///
/// A missing file is the normal case and stays silent; a file that exists
/// but cannot be read or parsed logs a warning and is ignored.
pub(crate) fn load() -> WindowConfig {
    let Some(path) = config_path() else {
        return WindowConfig::default();
    };
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return WindowConfig::default(),
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return WindowConfig::default();
        }
    };
    match parse(&data) {
        Some(config) => config,
        None => {
            log::warn!("ignoring malformed config at {}", path.display());
            WindowConfig::default()
        }
    }
}

/// Parse config JSON.  Returns `None` on any parse failure.
fn parse(data: &[u8]) -> Option<WindowConfig> {
    serde_json::from_slice(data).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_layout() {
        let cfg = WindowConfig::default();
        assert_eq!(cfg.title, "Tack");
        assert_eq!((cfg.width, cfg.height), (420, 240));
        assert_eq!(cfg.button.label, "Click me");
        assert_eq!(
            (cfg.button.x, cfg.button.y, cfg.button.width, cfg.button.height),
            (110, 80, 200, 50)
        );
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let cfg = parse(b"{}").expect("parse");
        assert_eq!(cfg, WindowConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let json = br#"{"title":"Hello","button":{"label":"Press"}}"#;
        let cfg = parse(json).expect("parse");
        assert_eq!(cfg.title, "Hello");
        assert_eq!(cfg.width, 420);
        assert_eq!(cfg.button.label, "Press");
        assert_eq!(cfg.button.x, 110);
    }

    #[test]
    fn full_file_overrides_everything() {
        let json = br#"{
            "title": "Big",
            "width": 800,
            "height": 600,
            "button": {"label": "Go", "x": 10, "y": 20, "width": 300, "height": 40}
        }"#;
        let cfg = parse(json).expect("parse");
        assert_eq!(cfg.title, "Big");
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!((cfg.button.x, cfg.button.y), (10, 20));
        assert_eq!((cfg.button.width, cfg.button.height), (300, 40));
        assert_eq!(cfg.button.label, "Go");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = parse(br#"{"theme":"dark","title":"T"}"#).expect("parse");
        assert_eq!(cfg.title, "T");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse(b"{not json").is_none());
        assert!(parse(b"").is_none());
    }
}
