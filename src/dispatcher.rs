//! Routes every incoming [`Message`] to the component that handles it.
//!
//! [`Dispatcher`] owns the [`WorkspaceManager`] and the
//! [`FocusedWindowTracker`] and is the only place that mutates them, so
//! all state changes happen on one thread in arrival order.  It also
//! drives the re-hide timer: [`run`](Dispatcher::run) waits for the next
//! message no longer than the pending re-hide deadline.

use crate::actions::ActionError;
use crate::command::Command;
use crate::config::Config;
use crate::events::{Event, Message, SystemEvent};
use crate::focus::FocusManager;
use crate::tracker::FocusedWindowTracker;
use crate::traits::WindowProvider;
use crate::workspace_manager::WorkspaceManager;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

/// Single-threaded owner of the engine state.
///
/// # Typical usage
///
/// ```ignore
/// let manager = WorkspaceManager::new(provider, &config);
/// let mut dispatcher = Dispatcher::new(manager);
/// dispatcher.handle(Command::RecentWorkspace.into());
/// ```
pub struct Dispatcher<W: WindowProvider> {
    manager: WorkspaceManager<W>,
    tracker: FocusedWindowTracker,
    config_path: Option<PathBuf>,
}

impl<W: WindowProvider> Dispatcher<W> {
    /// Create a dispatcher with the tracker already listening.
    pub fn new(manager: WorkspaceManager<W>) -> Self {
        let mut tracker = FocusedWindowTracker::from_settings(&manager.settings().settings);
        tracker.start_tracking();
        Self {
            manager,
            tracker,
            config_path: None,
        }
    }

    /// Re-read workspace definitions from `path` whenever the app list
    /// changes.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn manager(&self) -> &WorkspaceManager<W> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut WorkspaceManager<W> {
        &mut self.manager
    }

    /// Process a single [`Message`].
    ///
    /// Operator mistakes are published as [`Event::Alert`]; everything
    /// else that goes wrong has already been logged and ignored.
    pub fn handle(&mut self, msg: Message) {
        match msg {
            Message::Command(cmd) => {
                if let Err(e) = self.handle_command(cmd) {
                    warn!("{}", e);
                    self.manager.publish(Event::Alert {
                        title: e.title().to_string(),
                        message: e.to_string(),
                    });
                }
            }
            Message::System(ev) => self.handle_system(ev),
        }
    }

    fn handle_command(&mut self, cmd: Command) -> Result<(), ActionError> {
        debug!("command {:?}", cmd);
        match cmd {
            Command::ActivateWorkspace(selector) => self.manager.activate_selected(&selector),
            Command::AssignFocusedApp(target) => {
                self.manager.assign_focused_app(target.as_ref())?
            }
            Command::UnassignFocusedApp => self.manager.unassign_focused_app(),
            Command::ToggleFocusedAppAssignment => {
                self.manager.toggle_focused_app_assignment()?
            }
            Command::CycleWorkspace(step) => self.manager.cycle_workspace(step),
            Command::RecentWorkspace => self.manager.activate_recent_workspace(),
            Command::FloatFocusedApp => self.manager.float_focused_app(),
            Command::UnfloatFocusedApp => self.manager.unfloat_focused_app(),
            Command::ToggleFocusedAppFloating => self.manager.toggle_focused_app_floating(),
            Command::Focus(direction) => FocusManager::new(&self.manager).focus(direction),
            Command::CycleApp(step) => FocusManager::new(&self.manager).cycle_app(step),
            Command::CycleWindow(step) => FocusManager::new(&self.manager).cycle_window(step),
            Command::SpaceControl(direction) => self.manager.space_control(direction),
            Command::SwitchProfile(name) => {
                self.manager.switch_profile(&name);
            }
        }
        Ok(())
    }

    fn handle_system(&mut self, ev: SystemEvent) {
        match ev {
            SystemEvent::AppActivated(app) => {
                self.manager.note_focused_app(&app);
                self.tracker
                    .active_application_changed(&mut self.manager, &app);
            }
            SystemEvent::DisplaysChanged => self.manager.handle_displays_changed(),
            SystemEvent::AppsListChanged => self.reload_workspaces(),
        }
    }

    fn reload_workspaces(&mut self) {
        let Some(path) = &self.config_path else {
            self.manager.refresh_active_details();
            return;
        };
        match Config::load(path) {
            Ok(config) => self.manager.reload_workspaces(&config),
            Err(e) => {
                warn!("keeping current workspaces: {}", e);
                self.manager.refresh_active_details();
            }
        }
    }

    /// When [`fire_timers`](Self::fire_timers) next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.manager.next_rehide_deadline()
    }

    /// Run whatever timed work is due.
    pub fn fire_timers(&mut self) {
        self.manager.run_due_rehide();
    }

    /// Process messages until every sender is gone.
    pub fn run(&mut self, rx: mpsc::Receiver<Message>) {
        info!("spaceman running");
        loop {
            let next = match self.next_deadline() {
                Some(due) => {
                    let wait = due.saturating_duration_since(self.manager.now());
                    rx.recv_timeout(wait)
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match next {
                Ok(msg) => self.handle(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.fire_timers();
        }
        info!("all message sources closed, exiting");
    }
}

//  Tests
