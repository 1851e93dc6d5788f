//! Typed notifications flowing in and out of the engine.
//!
//! * [`SystemEvent`]: what the engine consumes from the OS / settings UI.
//! * [`Message`]: the single envelope every [`MessageSource`](crate::traits::MessageSource)
//!   produces, so commands and OS events share one ordered stream.
//! * [`Event`]: what the engine produces for presentation layers (menu
//!   bar, overlays, integration hooks).
//!
//! [`EventBus`] is the in-process publish/subscribe registry for [`Event`]s.
//! Subscribers declare the [`EventKind`]s they accept and receive them on
//! their own [`mpsc`] channel, so no listener is owned by the publisher.

use crate::command::Command;
use crate::model::{ActiveWorkspaceDetails, RunningApp};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Notifications consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SystemEvent {
    /// The OS gave keyboard focus to an application.
    AppActivated(RunningApp),
    /// A display was added, removed or rearranged.
    DisplaysChanged,
    /// Workspace definitions were edited outside the engine.
    AppsListChanged,
}

/// Everything that can arrive on the engine's input channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Command(Command),
    System(SystemEvent),
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Self {
        Message::Command(cmd)
    }
}

impl From<SystemEvent> for Message {
    fn from(ev: SystemEvent) -> Self {
        Message::System(ev)
    }
}

/// Notifications produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A workspace became active on a display.
    ActiveWorkspaceChanged(ActiveWorkspaceDetails),
    /// Workspace app lists were changed by an assignment.
    AppsListChanged,
    /// An operator mistake that should be shown as a blocking message.
    Alert { title: String, message: String },
}

/// Discriminant of [`Event`], used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ActiveWorkspaceChanged,
    AppsListChanged,
    Alert,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ActiveWorkspaceChanged(_) => EventKind::ActiveWorkspaceChanged,
            Event::AppsListChanged => EventKind::AppsListChanged,
            Event::Alert { .. } => EventKind::Alert,
        }
    }
}

struct Subscriber {
    kinds: Vec<EventKind>,
    tx: mpsc::Sender<Event>,
}

/// Publish/subscribe registry for [`Event`]s.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `kinds` and return the receiving end.
    ///
    /// Dropping the receiver unsubscribes on the next publish.
    pub fn subscribe(&mut self, kinds: &[EventKind]) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber {
            kinds: kinds.to_vec(),
            tx,
        });
        rx
    }

    /// Deliver `event` to every subscriber that accepts its kind.
    pub fn publish(&mut self, event: Event) {
        let kind = event.kind();
        self.subscribers.retain(|sub| {
            if !sub.kinds.contains(&kind) {
                return true;
            }
            let alive = sub.tx.send(event.clone()).is_ok();
            if !alive {
                debug!("dropping closed {:?} subscriber", kind);
            }
            alive
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
