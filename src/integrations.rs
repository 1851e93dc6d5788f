//! Shell hook for status bars and scripts.
//!
//! When `integrations.on_workspace_activated` is configured, every
//! [`Event::ActiveWorkspaceChanged`] runs it through `sh -c` with the
//! workspace details in the environment:
//!
//! | variable           | value                                  |
//! |--------------------|----------------------------------------|
//! | `WORKSPACE`        | workspace name                         |
//! | `WORKSPACE_NUMBER` | 1-based position (empty if unknown)    |
//! | `WORKSPACE_ICON`   | symbol icon name (empty if none)       |
//! | `DISPLAY_NAME`     | display the workspace was activated on |

use crate::events::Event;
use crate::model::ActiveWorkspaceDetails;
use log::{debug, error, warn};
use std::process::Command;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Build the hook invocation for `details`.
pub fn hook_command(command: &str, details: &ActiveWorkspaceDetails) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .env("WORKSPACE", &details.name)
        .env(
            "WORKSPACE_NUMBER",
            details.number.map(|n| n.to_string()).unwrap_or_default(),
        )
        .env("WORKSPACE_ICON", details.symbol_icon.as_deref().unwrap_or(""))
        .env("DISPLAY_NAME", &details.display);
    cmd
}

/// Run `command` for every activation received on `events`, in order,
/// until the publisher goes away.
pub fn spawn(command: String, events: mpsc::Receiver<Event>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for event in events {
            let Event::ActiveWorkspaceChanged(details) = event else {
                continue;
            };
            debug!("running workspace hook for {}", details.name);
            match hook_command(&command, &details).status() {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("workspace hook exited with {}", status),
                Err(e) => error!("failed to run workspace hook: {}", e),
            }
        }
    })
}
