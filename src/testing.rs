//! Shared test doubles: an in-memory desktop that records every side
//! effect, and a manually advanced clock.

use crate::config::Config;
use crate::geometry::{Point, Rect};
use crate::model::{ActivationPolicy, AppIdentity, DisplayInfo, DisplayName, RunningApp, WindowInfo};
use crate::traits::{Clock, WindowProvider};
use crate::workspace_manager::WorkspaceManager;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A side effect requested from the desktop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    Raise(String),
    Activate(String),
    Hide(String),
    FocusWindow(u64),
    Warp(Point),
    Center(String, String),
}

#[derive(Debug, Clone)]
pub(crate) struct FakeApp {
    pub app: RunningApp,
    pub windows: Vec<WindowInfo>,
}

#[derive(Debug, thiserror::Error)]
#[error("fake desktop: {0}")]
pub(crate) struct FakeError(pub String);

/// In-memory desktop with two side-by-side 1920×1080 displays,
/// `"Main"` on the left and `"Side"` on the right.
#[derive(Debug)]
pub(crate) struct FakeDesktop {
    pub displays: RefCell<Vec<DisplayInfo>>,
    pub apps: RefCell<Vec<FakeApp>>,
    pub frontmost: RefCell<Option<u32>>,
    pub main_display: RefCell<Option<DisplayName>>,
    pub cursor: RefCell<Option<Point>>,
    /// Pids whose window queries fail.
    pub unresponsive: RefCell<Vec<u32>>,
    pub log: RefCell<Vec<Action>>,
    next_pid: Cell<u32>,
}

pub(crate) fn display_frame(display: &str) -> Rect {
    match display {
        "Side" => Rect::new(1920.0, 0.0, 1920.0, 1080.0),
        _ => Rect::new(0.0, 0.0, 1920.0, 1080.0),
    }
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self {
            displays: RefCell::new(vec![
                DisplayInfo {
                    name: "Main".into(),
                    frame: display_frame("Main"),
                },
                DisplayInfo {
                    name: "Side".into(),
                    frame: display_frame("Side"),
                },
            ]),
            apps: RefCell::new(Vec::new()),
            frontmost: RefCell::new(None),
            main_display: RefCell::new(Some("Main".into())),
            cursor: RefCell::new(Some(Point::new(100.0, 100.0))),
            unresponsive: RefCell::new(Vec::new()),
            log: RefCell::new(Vec::new()),
            next_pid: Cell::new(100),
        }
    }

    /// Launch a regular app with one main window filling the middle of
    /// `display`.  Returns its pid.
    pub fn launch(&self, name: &str, display: &str) -> u32 {
        let d = display_frame(display);
        let frame = Rect::new(d.x + 200.0, d.y + 100.0, 800.0, 600.0);
        self.launch_with(name, ActivationPolicy::Regular, &[frame])
    }

    /// Launch an app with the given window frames; the first one is main.
    pub fn launch_with(&self, name: &str, policy: ActivationPolicy, frames: &[Rect]) -> u32 {
        let pid = self.next_pid.get();
        self.next_pid.set(pid + 1);
        let windows = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| WindowInfo {
                id: pid as u64 * 100 + i as u64,
                pid,
                frame: *frame,
                is_main: i == 0,
                is_focused: i == 0,
                is_minimized: false,
                is_picture_in_picture: false,
            })
            .collect();
        self.apps.borrow_mut().push(FakeApp {
            app: RunningApp {
                pid,
                identity: identity(name),
                policy,
                is_hidden: false,
                supports_picture_in_picture: false,
            },
            windows,
        });
        pid
    }

    pub fn app(&self, pid: u32) -> RunningApp {
        self.apps
            .borrow()
            .iter()
            .find(|a| a.app.pid == pid)
            .map(|a| a.app.clone())
            .expect("unknown pid")
    }

    pub fn windows_of(&self, pid: u32) -> Vec<WindowInfo> {
        self.apps
            .borrow()
            .iter()
            .find(|a| a.app.pid == pid)
            .map(|a| a.windows.clone())
            .unwrap_or_default()
    }

    pub fn with_app<F: FnOnce(&mut FakeApp)>(&self, pid: u32, f: F) {
        if let Some(a) = self.apps.borrow_mut().iter_mut().find(|a| a.app.pid == pid) {
            f(a);
        }
    }

    pub fn set_frontmost(&self, pid: Option<u32>) {
        *self.frontmost.borrow_mut() = pid;
    }

    pub fn set_cursor(&self, point: Point) {
        *self.cursor.borrow_mut() = Some(point);
    }

    pub fn is_hidden(&self, pid: u32) -> bool {
        self.app(pid).is_hidden
    }

    pub fn actions(&self) -> Vec<Action> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Names of apps that received a hide request, in order.
    pub fn hidden_names(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|a| match a {
                Action::Hide(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn activated_names(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|a| match a {
                Action::Activate(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    fn name_of(&self, pid: u32) -> String {
        self.app(pid).identity.name
    }
}

pub(crate) fn identity(name: &str) -> AppIdentity {
    AppIdentity::new(name, Some(&format!("com.test.{}", name.to_lowercase())))
}

impl WindowProvider for FakeDesktop {
    type Error = FakeError;

    fn displays(&self) -> Result<Vec<DisplayInfo>, FakeError> {
        Ok(self.displays.borrow().clone())
    }

    fn main_display(&self) -> Result<Option<DisplayName>, FakeError> {
        Ok(self.main_display.borrow().clone())
    }

    fn cursor_location(&self) -> Result<Option<Point>, FakeError> {
        Ok(*self.cursor.borrow())
    }

    fn running_apps(&self) -> Result<Vec<RunningApp>, FakeError> {
        Ok(self.apps.borrow().iter().map(|a| a.app.clone()).collect())
    }

    fn frontmost_app(&self) -> Result<Option<RunningApp>, FakeError> {
        Ok(self.frontmost.borrow().map(|pid| self.app(pid)))
    }

    fn windows(&self, app: &RunningApp) -> Result<Vec<WindowInfo>, FakeError> {
        if self.unresponsive.borrow().contains(&app.pid) {
            return Err(FakeError(format!("{} is not responding", app.identity)));
        }
        Ok(self.windows_of(app.pid))
    }

    fn raise_app(&self, app: &RunningApp) -> Result<(), FakeError> {
        self.with_app(app.pid, |a| a.app.is_hidden = false);
        self.log.borrow_mut().push(Action::Raise(self.name_of(app.pid)));
        Ok(())
    }

    fn activate_app(&self, app: &RunningApp) -> Result<(), FakeError> {
        self.with_app(app.pid, |a| a.app.is_hidden = false);
        *self.frontmost.borrow_mut() = Some(app.pid);
        self.log.borrow_mut().push(Action::Activate(self.name_of(app.pid)));
        Ok(())
    }

    fn hide_app(&self, app: &RunningApp) -> Result<(), FakeError> {
        self.with_app(app.pid, |a| a.app.is_hidden = true);
        self.log.borrow_mut().push(Action::Hide(self.name_of(app.pid)));
        Ok(())
    }

    fn focus_window(&self, window: &WindowInfo) -> Result<(), FakeError> {
        self.with_app(window.pid, |a| {
            for w in &mut a.windows {
                w.is_main = w.id == window.id;
                w.is_focused = w.id == window.id;
            }
        });
        self.log.borrow_mut().push(Action::FocusWindow(window.id));
        Ok(())
    }

    fn warp_cursor(&self, point: Point) -> Result<(), FakeError> {
        *self.cursor.borrow_mut() = Some(point);
        self.log.borrow_mut().push(Action::Warp(point));
        Ok(())
    }

    fn center_app(&self, app: &RunningApp, display: &str) -> Result<(), FakeError> {
        let target = display_frame(display);
        self.with_app(app.pid, |a| {
            if let Some(w) = a.windows.iter_mut().find(|w| w.is_main) {
                w.frame.x = target.center().x - w.frame.width / 2.0;
                w.frame.y = target.center().y - w.frame.height / 2.0;
            }
        });
        self.log
            .borrow_mut()
            .push(Action::Center(self.name_of(app.pid), display.to_string()));
        Ok(())
    }
}

/// A clock that only moves when told to.  Clones share the same time.
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Build a config from a JSON literal.
pub(crate) fn config(json: &str) -> Config {
    serde_json::from_str(json).expect("valid test config")
}

/// A manager over a fresh [`FakeDesktop`] driven by a [`ManualClock`].
pub(crate) fn manager(json: &str) -> (WorkspaceManager<FakeDesktop>, ManualClock) {
    let clock = ManualClock::new();
    let mgr = WorkspaceManager::new(FakeDesktop::new(), &config(json)).with_clock(Box::new(clock.clone()));
    (mgr, clock)
}

/// Two workspaces on `"Main"` and one on `"Side"`.  App identities in the
/// config carry the same bundle ids [`FakeDesktop::launch`] uses.
pub(crate) const STANDARD_CONFIG: &str = r#"{
    "floating_apps": [{ "name": "Notes", "bundle_id": "com.test.notes" }],
    "profiles": [
        {
            "name": "Work",
            "workspaces": [
                {
                    "name": "Code",
                    "display": "Main",
                    "symbol_icon": "hammer",
                    "apps": [
                        { "name": "Xcode", "bundle_id": "com.test.xcode" },
                        { "name": "Terminal", "bundle_id": "com.test.terminal" }
                    ]
                },
                {
                    "name": "Web",
                    "display": "Main",
                    "apps": [
                        { "name": "Safari", "bundle_id": "com.test.safari" },
                        { "name": "Mail", "bundle_id": "com.test.mail" }
                    ]
                },
                {
                    "name": "Chat",
                    "display": "Side",
                    "apps": [{ "name": "Slack", "bundle_id": "com.test.slack" }]
                }
            ]
        },
        {
            "name": "Home",
            "workspaces": [
                {
                    "name": "Games",
                    "display": "Main",
                    "apps": [{ "name": "Steam", "bundle_id": "com.test.steam" }]
                }
            ]
        }
    ]
}"#;
