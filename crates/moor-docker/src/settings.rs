// Docking behaviour settings stored in the platform config dir:
// e.g. ~/Library/Application Support/moor/settings.json on macOS,
// ~/.config/moor/settings.json on Linux.

use moor_core::Size;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockSettings {
    /// Pointer travel (px) before an embedded pane tears off.
    #[serde(default = "default_undock_threshold")]
    pub undock_threshold: f32,
    /// Inset (px) of the frame body where no frame-edge docking is offered.
    #[serde(default = "default_dock_outside_offset")]
    pub dock_outside_offset: f32,
    #[serde(default = "default_floating_size")]
    pub default_floating_size: Size,
    /// Offset between successive new floating panes.
    #[serde(default = "default_floating_cascade")]
    pub floating_cascade: f32,
    #[serde(default = "default_drag_opacity")]
    pub drag_opacity: f32,
    /// Keep floating panes fully opaque while dragging.
    #[serde(default)]
    pub opaque_on_drag: bool,
    #[serde(default = "default_indicator_size")]
    pub indicator_size: Size,
    /// Indicator shift towards a region's interior.
    #[serde(default = "default_indicator_inner_shift")]
    pub indicator_inner_shift: f32,
    /// Indicator shift away from the frame.
    #[serde(default = "default_indicator_outer_shift")]
    pub indicator_outer_shift: f32,
}

fn default_undock_threshold() -> f32 {
    20.0
}

fn default_dock_outside_offset() -> f32 {
    10.0
}

fn default_floating_size() -> Size {
    Size::new(250.0, 200.0)
}

fn default_floating_cascade() -> f32 {
    24.0
}

fn default_drag_opacity() -> f32 {
    0.5
}

fn default_indicator_size() -> Size {
    Size::new(25.0, 25.0)
}

fn default_indicator_inner_shift() -> f32 {
    20.0
}

fn default_indicator_outer_shift() -> f32 {
    10.0
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            undock_threshold: default_undock_threshold(),
            dock_outside_offset: default_dock_outside_offset(),
            default_floating_size: default_floating_size(),
            floating_cascade: default_floating_cascade(),
            drag_opacity: default_drag_opacity(),
            opaque_on_drag: false,
            indicator_size: default_indicator_size(),
            indicator_inner_shift: default_indicator_inner_shift(),
            indicator_outer_shift: default_indicator_outer_shift(),
        }
    }
}

impl DockSettings {
    /// Parse settings JSON; missing fields take their defaults.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// `<config_dir>/moor/settings.json`, if the platform has a config dir.
pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("moor").join("settings.json"))
}

/// Settings from the platform config dir, or defaults.
pub fn load_settings() -> DockSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => DockSettings::default(),
    }
}

/// Settings read from `path`. A missing or malformed file yields defaults.
pub fn load_settings_from(path: &Path) -> DockSettings {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return DockSettings::default(),
    };
    DockSettings::from_json(&data).unwrap_or_else(|e| {
        log::warn!("Failed to parse {}: {}", path.display(), e);
        DockSettings::default()
    })
}

/// Write `settings` as pretty JSON, creating parent dirs as needed.
pub fn save_settings_to(settings: &DockSettings, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    std::fs::write(path, json)?;
    log::debug!("saved dock settings to {}", path.display());
    Ok(())
}
