//! Core traits that decouple spaceman from any specific OS backend,
//! transport, or time source.
//!
//! Every concrete backend (an accessibility bridge, a Unix-socket listener,
//! a test harness, …) implements one of these traits.  The managers only
//! depend on these abstractions.

use crate::events::Message;
use crate::geometry::Point;
use crate::model::{DisplayInfo, DisplayName, RunningApp, WindowInfo};
use std::sync::mpsc;
use std::time::Instant;

/// Abstraction over the OS window-introspection primitives.
///
/// An implementation might talk to the macOS accessibility API, or it
/// might be an in-memory fake used in tests.
///
/// # Failure contract
///
/// Queries may fail for apps that are slow, unresponsive, or do not
/// support introspection.  Callers treat every error as "this window/app
/// does not participate"; errors are logged, never propagated.  Actions
/// are fire-and-forget.
pub trait WindowProvider {
    /// The error type produced by this provider.
    type Error: std::error::Error + Send + 'static;

    /// Connected displays.
    fn displays(&self) -> Result<Vec<DisplayInfo>, Self::Error>;

    /// Name of the display that currently holds keyboard focus.
    fn main_display(&self) -> Result<Option<DisplayName>, Self::Error>;

    /// Current pointer location, in window coordinates.
    fn cursor_location(&self) -> Result<Option<Point>, Self::Error>;

    /// Every running application, regular or not.
    fn running_apps(&self) -> Result<Vec<RunningApp>, Self::Error>;

    /// The application that currently has keyboard focus.
    fn frontmost_app(&self) -> Result<Option<RunningApp>, Self::Error>;

    /// Windows of `app` that have a frame.
    fn windows(&self, app: &RunningApp) -> Result<Vec<WindowInfo>, Self::Error>;

    /// Bring `app` to the front without necessarily giving it keyboard focus.
    fn raise_app(&self, app: &RunningApp) -> Result<(), Self::Error>;

    /// Give `app` keyboard focus.
    fn activate_app(&self, app: &RunningApp) -> Result<(), Self::Error>;

    fn hide_app(&self, app: &RunningApp) -> Result<(), Self::Error>;

    /// Raise one specific window.
    fn focus_window(&self, window: &WindowInfo) -> Result<(), Self::Error>;

    fn warp_cursor(&self, point: Point) -> Result<(), Self::Error>;

    /// Move the main window of `app` to the center of `display`.
    fn center_app(&self, app: &RunningApp, display: &str) -> Result<(), Self::Error>;
}

//  Message Source

/// A source of [`Message`]s.
///
/// Implementations listen on some transport (a Unix socket, an OS event
/// tap, an in-memory channel) and forward parsed messages into the
/// provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](MessageSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received message must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait MessageSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Message`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Message>) -> Result<(), Self::Error>;
}

//  Clock

/// Monotonic time source, injectable so the debounce windows are testable.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
