//! Data types shared by every component.
//!
//! [`AppIdentity`] names an application, [`Workspace`] groups identities
//! under a display, and [`RunningApp`] / [`WindowInfo`] / [`DisplayInfo`]
//! describe live OS state as reported by a
//! [`WindowProvider`](crate::traits::WindowProvider).

use crate::geometry::Rect;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Logical name of a display (e.g. `"Built-in Retina Display"`).
pub type DisplayName = String;

/// A stable application identifier.
///
/// Two identities are equal when both carry a bundle identifier and those
/// match, otherwise when their display names match.  The bundle
/// identifier is preferred because display names are localised and not
/// unique.
#[derive(Debug, Clone, Serialize)]
pub struct AppIdentity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
}

impl AppIdentity {
    pub fn new(name: impl Into<String>, bundle_id: Option<&str>) -> Self {
        Self {
            name: name.into(),
            bundle_id: bundle_id.map(str::to_string),
        }
    }

    /// An identity known only by its display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bundle_id: None,
        }
    }
}

impl PartialEq for AppIdentity {
    fn eq(&self, other: &Self) -> bool {
        match (&self.bundle_id, &other.bundle_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Config format: either `"Safari"` or `{"name":"Safari","bundle_id":"com.apple.Safari"}`.
impl<'de> Deserialize<'de> for AppIdentity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = AppIdentity;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "app name string or object {{name, bundle_id}}")
            }
            fn visit_str<E>(self, s: &str) -> Result<AppIdentity, E>
            where
                E: DeError,
            {
                let name = s.trim();
                if name.is_empty() {
                    return Err(DeError::custom("app name must not be empty"));
                }
                Ok(AppIdentity::named(name))
            }
            fn visit_map<A>(self, mut map: A) -> Result<AppIdentity, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut bundle_id: Option<String> = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "bundle_id" => bundle_id = map.next_value()?,
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(AppIdentity {
                    name: name.ok_or_else(|| DeError::missing_field("name"))?,
                    bundle_id,
                })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Opaque workspace identifier, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceId(pub u64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named, ordered set of applications bound to a display.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    /// Target display.  `None`, or a display that is not connected, means
    /// "the display that currently has focus".
    pub display: Option<DisplayName>,
    /// Insertion order is priority order.
    pub apps: Vec<AppIdentity>,
    pub app_to_focus: Option<AppIdentity>,
    pub activate_shortcut: Option<String>,
    pub assign_app_shortcut: Option<String>,
    pub symbol_icon: Option<String>,
}

impl Workspace {
    pub fn contains(&self, app: &AppIdentity) -> bool {
        self.apps.contains(app)
    }
}

/// How an application participates in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivationPolicy {
    /// Ordinary app with a Dock icon and windows.
    #[default]
    Regular,
    /// Agent / menu-bar app.
    Accessory,
    /// Background-only process.
    Prohibited,
}

/// A running application as reported by the window provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningApp {
    pub pid: u32,
    pub identity: AppIdentity,
    #[serde(default)]
    pub policy: ActivationPolicy,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub supports_picture_in_picture: bool,
}

impl RunningApp {
    pub fn is_regular(&self) -> bool {
        self.policy == ActivationPolicy::Regular
    }
}

/// One window of a running application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Provider-specific window id.
    pub id: u64,
    pub pid: u32,
    pub frame: Rect,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub is_focused: bool,
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub is_picture_in_picture: bool,
}

/// A connected display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub name: DisplayName,
    pub frame: Rect,
}

/// Presentation-facing description of the workspace that just became active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWorkspaceDetails {
    pub name: String,
    /// 1-based position in the repository.
    pub number: Option<usize>,
    pub symbol_icon: Option<String>,
    pub display: DisplayName,
}
