//! Commands and types used throughout spaceman.
//!
//! This module defines the vocabulary of user intent: [`Command`] describes
//! every action a hot-key or script can trigger, and [`Direction`] /
//! [`Step`] / [`WorkspaceSelector`] are its arguments.
//!
//! Hot-key helpers forward raw arguments; the daemon parses direction
//! strings (e.g. "right", "Left"), steps ("next", "prev"), and workspace
//! selectors (1-based number or workspace name).

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Direction for spatial navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "right", "Right", " LEFT ").
fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Sequential navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    Next,
    Previous,
}

impl Step {
    pub fn is_next(self) -> bool {
        self == Step::Next
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next => write!(f, "next"),
            Step::Previous => write!(f, "previous"),
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.trim().to_lowercase().as_str() {
            "next" => Ok(Step::Next),
            "prev" | "previous" => Ok(Step::Previous),
            _ => Err(DeError::custom(format!("invalid step: {:?}", s))),
        }
    }
}

/// Names a workspace on the wire: a 1-based number or a workspace name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceSelector {
    Number(usize),
    Name(String),
}

impl fmt::Display for WorkspaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceSelector::Number(n) => write!(f, "{}", n),
            WorkspaceSelector::Name(name) => write!(f, "{:?}", name),
        }
    }
}

impl Serialize for WorkspaceSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WorkspaceSelector::Number(n) => serializer.serialize_u64(*n as u64),
            WorkspaceSelector::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for WorkspaceSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = WorkspaceSelector;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "1-based workspace number or workspace name")
            }
            fn visit_u64<E>(self, n: u64) -> Result<WorkspaceSelector, E> {
                Ok(WorkspaceSelector::Number(n as usize))
            }
            fn visit_str<E>(self, s: &str) -> Result<WorkspaceSelector, E>
            where
                E: DeError,
            {
                let s = s.trim();
                if s.is_empty() {
                    return Err(DeError::custom("workspace selector must not be empty"));
                }
                Ok(WorkspaceSelector::Name(s.to_string()))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every action the engine can perform on behalf of the user.
///
/// Commands are produced by hot-key helpers or scripts (delivered through
/// a [`MessageSource`](crate::traits::MessageSource)) and consumed by the
/// [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Show the given workspace on its display and focus one of its apps.
    ActivateWorkspace(WorkspaceSelector),

    /// Assign the focused app to a workspace.  `None` means the workspace
    /// that is active on the focused app's display.
    AssignFocusedApp(Option<WorkspaceSelector>),

    /// Remove the focused app from every workspace and hide it.
    UnassignFocusedApp,

    /// Unassign the focused app if it belongs to a workspace, otherwise
    /// assign it to the active workspace of its display.
    ToggleFocusedAppAssignment,

    /// Activate the next / previous workspace on the display under the
    /// pointer, wrapping around.
    CycleWorkspace(Step),

    /// Switch back to the previously active workspace on the display under
    /// the pointer.
    RecentWorkspace,

    FloatFocusedApp,
    UnfloatFocusedApp,
    ToggleFocusedAppFloating,

    /// Focus the closest window in the given direction.
    Focus(Direction),

    /// Focus the next / previous running app of the focused app's workspace.
    CycleApp(Step),

    /// Focus the next / previous window, crossing into adjacent apps.
    CycleWindow(Step),

    /// Move through the space-control grid of workspaces.
    SpaceControl(Direction),

    /// Select another named workspace profile.
    SwitchProfile(String),
}
