//! Reconciles OS application-activation events with workspace state.
//!
//! When the user focuses an app that belongs to a workspace which is not
//! shown, the tracker activates that workspace.  Activating a workspace
//! itself makes the OS report app activations, so every event that
//! arrives within [`DEFAULT_ACTIVATION_GUARD_MS`] of the last explicit
//! activation is treated as an echo and ignored.  Without that guard a
//! user switch and its echo are indistinguishable and the engine can
//! oscillate between two workspaces.

use crate::config::Settings;
use crate::model::RunningApp;
use crate::traits::WindowProvider;
use crate::workspace_manager::WorkspaceManager;
use log::{debug, info};
use std::time::Duration;

/// Window after an activation during which activation events are echoes.
pub const DEFAULT_ACTIVATION_GUARD_MS: u64 = 200;

/// Passive listener for application-activation events.
#[derive(Debug, Clone)]
pub struct FocusedWindowTracker {
    guard: Duration,
    tracking: bool,
    last_event_pid: Option<u32>,
}

impl FocusedWindowTracker {
    pub fn new(guard: Duration) -> Self {
        Self {
            guard,
            tracking: false,
            last_event_pid: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Duration::from_millis(settings.activation_guard_ms))
    }

    pub fn start_tracking(&mut self) {
        self.tracking = true;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Handle one activation event.  Returns `true` when it caused a
    /// workspace switch.
    pub fn active_application_changed<W: WindowProvider>(
        &mut self,
        manager: &mut WorkspaceManager<W>,
        app: &RunningApp,
    ) -> bool {
        if !self.tracking {
            return false;
        }
        if self.last_event_pid.replace(app.pid) == Some(app.pid) {
            return false;
        }

        if let Some(at) = manager.last_workspace_activation() {
            if manager.now().saturating_duration_since(at) < self.guard {
                debug!("ignoring activation of {} right after a switch", app.identity);
                return false;
            }
        }

        if manager.settings().is_floating(&app.identity) {
            if manager.settings().settings.maintain_floating_app_focus {
                manager
                    .settings_mut()
                    .set_last_focused_floating_app(Some(app.identity.clone()));
            }
            return false;
        }
        manager.settings_mut().set_last_focused_floating_app(None);

        // An active workspace listing the app wins over repository order.
        let owner = manager
            .active_workspaces()
            .map(|(_, w)| w)
            .find(|w| w.contains(&app.identity))
            .or_else(|| manager.workspaces().first_containing(&app.identity))
            .map(|w| (w.id, w.name.clone()));
        let Some((id, name)) = owner else {
            return false;
        };
        if manager.is_active(id) {
            return false;
        }

        if self.is_picture_in_picture(manager, app) {
            debug!("{} is in picture in picture, staying put", app.identity);
            return false;
        }

        info!("activating workspace {} for {}", name, app.identity);
        manager.set_last_focused_app(id, app.identity.clone());
        manager.activate_workspace(id, false);
        manager.activate(app);
        true
    }

    fn is_picture_in_picture<W: WindowProvider>(
        &self,
        manager: &WorkspaceManager<W>,
        app: &RunningApp,
    ) -> bool {
        manager.settings().settings.enable_picture_in_picture_support
            && app.supports_picture_in_picture
            && manager
                .windows(app)
                .iter()
                .find(|w| w.is_focused)
                .is_some_and(|w| w.is_picture_in_picture)
    }
}

impl Default for FocusedWindowTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ACTIVATION_GUARD_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkspaceId;
    use crate::testing::{identity, manager, FakeDesktop, ManualClock, STANDARD_CONFIG};

    struct Fixture {
        mgr: WorkspaceManager<FakeDesktop>,
        clock: ManualClock,
        tracker: FocusedWindowTracker,
        code: WorkspaceId,
        web: WorkspaceId,
    }

    fn fixture() -> Fixture {
        let (mut mgr, clock) = manager(STANDARD_CONFIG);
        let code = mgr.workspaces().find_by_name("Code").unwrap().id;
        let web = mgr.workspaces().find_by_name("Web").unwrap().id;
        mgr.activate_workspace(code, false);
        let mut tracker = FocusedWindowTracker::default();
        tracker.start_tracking();
        Fixture {
            mgr,
            clock,
            tracker,
            code,
            web,
        }
    }

    impl Fixture {
        fn focus(&mut self, pid: u32) -> bool {
            let app = self.mgr.provider().app(pid);
            self.tracker.active_application_changed(&mut self.mgr, &app)
        }

        fn active_on_main(&self) -> Option<WorkspaceId> {
            self.mgr.active_workspace("Main").map(|w| w.id)
        }
    }

    #[test]
    fn switches_to_workspace_of_focused_app() {
        let mut f = fixture();
        let safari = f.mgr.provider().launch("Safari", "Main");
        f.clock.advance(300);

        assert!(f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.web));
        assert_eq!(f.mgr.last_focused_app(f.web), Some(&identity("Safari")));
        assert_eq!(f.mgr.provider().activated_names(), vec!["Safari"]);
    }

    #[test]
    fn echoes_within_guard_are_ignored() {
        let mut f = fixture();
        let safari = f.mgr.provider().launch("Safari", "Main");
        f.clock.advance(199);
        assert!(!f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.code));

        // Same pid again would be a duplicate; use a second Web app.
        let mail = f.mgr.provider().launch("Mail", "Main");
        f.clock.advance(1);
        assert!(f.focus(mail));
        assert_eq!(f.active_on_main(), Some(f.web));
    }

    #[test]
    fn floating_app_grace_period() {
        let mut f = fixture();
        let notes = f.mgr.provider().launch("Notes", "Main");
        let safari = f.mgr.provider().launch("Safari", "Main");
        f.clock.advance(300);

        assert!(!f.focus(notes));
        assert_eq!(f.active_on_main(), Some(f.code));
        assert_eq!(
            f.mgr.settings().last_focused_floating_app(),
            Some(&identity("Notes"))
        );

        assert!(f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.web));
        assert!(f.mgr.settings().last_focused_floating_app().is_none());
    }

    #[test]
    fn floating_focus_not_recorded_when_disabled() {
        let mut f = fixture();
        f.mgr.settings_mut().settings.maintain_floating_app_focus = false;
        let notes = f.mgr.provider().launch("Notes", "Main");
        f.clock.advance(300);
        assert!(!f.focus(notes));
        assert!(f.mgr.settings().last_focused_floating_app().is_none());
    }

    #[test]
    fn apps_of_active_workspaces_do_not_switch() {
        let mut f = fixture();
        let xcode = f.mgr.provider().launch("Xcode", "Main");
        let music = f.mgr.provider().launch("Music", "Main");
        f.clock.advance(300);
        assert!(!f.focus(xcode));
        assert!(!f.focus(music));
        assert_eq!(f.active_on_main(), Some(f.code));
    }

    #[test]
    fn picture_in_picture_window_keeps_workspace() {
        let mut f = fixture();
        let safari = f.mgr.provider().launch("Safari", "Main");
        f.mgr.provider().with_app(safari, |a| {
            a.app.supports_picture_in_picture = true;
            a.windows[0].is_picture_in_picture = true;
        });
        f.clock.advance(300);
        assert!(!f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.code));

        // With the feature off the switch happens.
        f.mgr.settings_mut().settings.enable_picture_in_picture_support = false;
        let mail = f.mgr.provider().launch("Mail", "Main");
        f.mgr.provider().with_app(mail, |a| {
            a.app.supports_picture_in_picture = true;
            a.windows[0].is_picture_in_picture = true;
        });
        assert!(f.focus(mail));
    }

    #[test]
    fn duplicate_events_are_dropped() {
        let mut f = fixture();
        let safari = f.mgr.provider().launch("Safari", "Main");
        let xcode = f.mgr.provider().launch("Xcode", "Main");
        f.clock.advance(300);
        assert!(f.focus(safari));

        f.mgr.activate_workspace(f.code, false);
        f.clock.advance(300);
        assert!(!f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.code));

        assert!(!f.focus(xcode));
        assert!(f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.web));
    }

    #[test]
    fn events_are_ignored_until_tracking_starts() {
        let mut f = fixture();
        let safari = f.mgr.provider().launch("Safari", "Main");
        f.clock.advance(300);
        f.tracker = FocusedWindowTracker::default();
        assert!(!f.tracker.is_tracking());
        assert!(!f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.code));

        f.tracker.start_tracking();
        assert!(f.focus(safari));
        assert_eq!(f.active_on_main(), Some(f.web));
    }
}
