//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/spaceman/config.json`).  Every section is optional so
//! the file can grow new keys without breaking older ones.
//!
//! # Example
//!
//! ```json
//! {
//!   "settings": { "center_cursor_on_workspace_change": true },
//!   "floating_apps": ["1Password"],
//!   "hotkeys": { "switch_to_next_workspace": "ctrl+alt+right" },
//!   "profiles": [
//!     {
//!       "name": "Work",
//!       "workspaces": [
//!         { "name": "Code", "display": "DELL U2720Q", "apps": ["Xcode", "Terminal"] },
//!         { "name": "Chat", "apps": [{ "name": "Slack", "bundle_id": "com.tinyspeck.slackmacgap" }] }
//!       ]
//!     }
//!   ],
//!   "integrations": { "on_workspace_activated": "sketchybar --trigger workspace" }
//! }
//! ```

use crate::model::AppIdentity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// A minimal `{}` file is valid; all sections fall back to their
/// compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    /// Apps exempt from workspace show/hide partitioning.
    #[serde(default)]
    pub floating_apps: Vec<AppIdentity>,

    #[serde(default)]
    pub hotkeys: HotKeys,

    /// Named workspace sets.  An empty list behaves like a single empty
    /// profile called `"Default"`.
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,

    /// Name of the profile to start with.  Defaults to the first one.
    #[serde(default)]
    pub selected_profile: Option<String>,

    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

/// Feature toggles and timing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub center_cursor_on_workspace_change: bool,
    pub center_cursor_on_focus_change: bool,
    /// Gates the directional / cycling focus hot-keys.
    pub enable_focus_management: bool,
    pub enable_picture_in_picture_support: bool,
    /// Remember the last focused floating app and keep it in front across
    /// workspace switches.
    pub maintain_floating_app_focus: bool,
    /// Space control only lists workspaces of the display under the cursor.
    pub space_control_current_display_only: bool,
    /// The desktop file manager.  It is never hidden when no workspace app
    /// is running, and it is the last-resort focus target.
    pub file_manager: AppIdentity,
    /// Delay of the second hide pass after an activation (ms).
    pub rehide_delay_ms: u64,
    /// Window after an activation during which app-activation events are
    /// treated as echoes of that activation (ms).
    pub activation_guard_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            center_cursor_on_workspace_change: false,
            center_cursor_on_focus_change: false,
            enable_focus_management: true,
            enable_picture_in_picture_support: true,
            maintain_floating_app_focus: true,
            space_control_current_display_only: false,
            file_manager: AppIdentity::new("Finder", Some("com.apple.finder")),
            rehide_delay_ms: crate::rehide::DEFAULT_REHIDE_DELAY_MS,
            activation_guard_ms: crate::tracker::DEFAULT_ACTIVATION_GUARD_MS,
        }
    }
}

/// Key chords for global actions.  The chord syntax is up to the external
/// hot-key registrar; the engine only pairs chords with commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HotKeys {
    pub assign_focused_app: Option<String>,
    pub unassign_focused_app: Option<String>,
    pub toggle_focused_app_assignment: Option<String>,
    pub switch_to_recent_workspace: Option<String>,
    pub switch_to_next_workspace: Option<String>,
    pub switch_to_previous_workspace: Option<String>,
    pub float_focused_app: Option<String>,
    pub unfloat_focused_app: Option<String>,
    pub toggle_focused_app_floating: Option<String>,
    pub focus_left: Option<String>,
    pub focus_right: Option<String>,
    pub focus_up: Option<String>,
    pub focus_down: Option<String>,
    pub focus_next_workspace_app: Option<String>,
    pub focus_previous_workspace_app: Option<String>,
    pub focus_next_workspace_window: Option<String>,
    pub focus_previous_workspace_window: Option<String>,
}

/// A named set of workspaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceConfig>,
}

/// On-disk description of one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub apps: Vec<AppIdentity>,
    #[serde(default)]
    pub app_to_focus: Option<AppIdentity>,
    #[serde(default)]
    pub activate_shortcut: Option<String>,
    #[serde(default)]
    pub assign_app_shortcut: Option<String>,
    #[serde(default)]
    pub symbol_icon: Option<String>,
}

/// Hooks for third-party tools (status bars, scripts).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Shell command run after every workspace activation.
    pub on_workspace_activated: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
