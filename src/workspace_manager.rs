//! The central state machine: which workspace is active on which display,
//! and what must be shown or hidden when that changes.
//!
//! [`WorkspaceManager`] owns the per-display runtime state, the workspace
//! and settings repositories, the [`EventBus`], and the re-hide debouncer.
//! It is generic over any [`WindowProvider`]; every side effect goes
//! through that trait.
//!
//! Provider failures never escape this module.  A query that fails is
//! logged and treated as "nothing there", an action that fails is logged
//! and forgotten.

use crate::config::Config;
use crate::events::{Event, EventBus, EventKind};
use crate::geometry::{display_at_point, display_for_frame, Point, Rect};
use crate::model::{
    ActiveWorkspaceDetails, AppIdentity, DisplayInfo, DisplayName, RunningApp, WindowInfo,
    Workspace, WorkspaceId,
};
use crate::rehide::RehideScheduler;
use crate::repository::{ProfileRepository, SettingsRepository, WorkspaceRepository};
use crate::traits::{Clock, SystemClock, WindowProvider};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Windows at most this many points wide or tall are ignored when working
/// out which display an app is on.
const DEGENERATE_WINDOW_SIDE: f64 = 10.0;

/// Owns workspace activation and the per-display runtime state.
pub struct WorkspaceManager<W: WindowProvider> {
    wm: W,
    profiles: ProfileRepository,
    settings: SettingsRepository,
    bus: EventBus,
    clock: Box<dyn Clock>,
    rehide: RehideScheduler,

    active_workspace: BTreeMap<DisplayName, WorkspaceId>,
    most_recent_workspace: BTreeMap<DisplayName, WorkspaceId>,
    last_focused_app: HashMap<WorkspaceId, AppIdentity>,
    last_workspace_activation: Option<Instant>,
    active_workspace_details: Option<ActiveWorkspaceDetails>,
}

impl<W: WindowProvider> WorkspaceManager<W> {
    /// Create a manager from the loaded configuration.
    ///
    /// No workspace is active until the first activation.
    pub fn new(wm: W, config: &Config) -> Self {
        let settings = SettingsRepository::from_config(config);
        let rehide = RehideScheduler::new(Duration::from_millis(settings.settings.rehide_delay_ms));
        Self {
            wm,
            profiles: ProfileRepository::from_config(
                &config.profiles,
                config.selected_profile.as_deref(),
            ),
            settings,
            bus: EventBus::new(),
            clock: Box::new(SystemClock),
            rehide,
            active_workspace: BTreeMap::new(),
            most_recent_workspace: BTreeMap::new(),
            last_focused_app: HashMap::new(),
            last_workspace_activation: None,
            active_workspace_details: None,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    //  Accessors

    pub fn provider(&self) -> &W {
        &self.wm
    }

    pub fn workspaces(&self) -> &WorkspaceRepository {
        self.profiles.current()
    }

    pub fn profiles(&self) -> &ProfileRepository {
        &self.profiles
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRepository {
        &mut self.settings
    }

    /// Subscribe to engine notifications.
    pub fn subscribe(&mut self, kinds: &[EventKind]) -> mpsc::Receiver<Event> {
        self.bus.subscribe(kinds)
    }

    pub(crate) fn publish(&mut self, event: Event) {
        self.bus.publish(event);
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// The workspace currently shown on `display`.
    pub fn active_workspace(&self, display: &str) -> Option<&Workspace> {
        self.active_workspace
            .get(display)
            .and_then(|id| self.workspaces().get(*id))
    }

    /// Every `(display, workspace)` pair that is currently active, ordered
    /// by display name.
    pub fn active_workspaces(&self) -> impl Iterator<Item = (&str, &Workspace)> {
        self.active_workspace
            .iter()
            .filter_map(|(d, id)| self.workspaces().get(*id).map(|w| (d.as_str(), w)))
    }

    pub fn is_active(&self, id: WorkspaceId) -> bool {
        self.active_workspace.values().any(|a| *a == id)
    }

    /// The workspace that was active on `display` before the current one.
    pub fn most_recent_workspace(&self, display: &str) -> Option<&Workspace> {
        self.most_recent_workspace
            .get(display)
            .and_then(|id| self.workspaces().get(*id))
    }

    pub fn last_focused_app(&self, id: WorkspaceId) -> Option<&AppIdentity> {
        self.last_focused_app.get(&id)
    }

    pub fn last_workspace_activation(&self) -> Option<Instant> {
        self.last_workspace_activation
    }

    pub fn active_workspace_details(&self) -> Option<&ActiveWorkspaceDetails> {
        self.active_workspace_details.as_ref()
    }

    /// Workspace whose re-hide pass is pending.
    pub fn pending_rehide(&self) -> Option<WorkspaceId> {
        self.rehide.pending()
    }

    /// When the pending re-hide pass is due.
    pub fn next_rehide_deadline(&self) -> Option<Instant> {
        self.rehide.deadline()
    }

    //  Workspace actions

    /// Make `id` the active workspace of its display.
    ///
    /// Raises every app of the workspace (plus floating apps on the same
    /// display), optionally focuses one of them, hides every other regular
    /// app on that display, and schedules a second hide pass.
    pub fn activate_workspace(&mut self, id: WorkspaceId, set_focus: bool) {
        let Some(workspace) = self.workspaces().get(id).cloned() else {
            debug!("workspace {} no longer exists", id);
            return;
        };
        let display = self.workspace_display(&workspace);
        info!(
            "activate workspace {} on {} (focus: {})",
            workspace.name, display, set_focus
        );

        self.update_active_workspace(&workspace, &display);
        self.show_apps(&workspace, &display, set_focus);
        self.hide_apps(&workspace, &display);

        let now = self.clock.now();
        self.rehide.schedule(id, now);
    }

    /// Move `app` into workspace `id` and make the result visible at once.
    pub fn assign_app(&mut self, app: AppIdentity, id: WorkspaceId) {
        if self.workspaces().get(id).is_none() {
            debug!("cannot assign {}: workspace {} no longer exists", app, id);
            return;
        }
        let repo = self.profiles.current_mut();
        repo.delete_app_from_all(&app);
        repo.add_app(id, app);

        self.activate_workspace(id, false);
        self.publish(Event::AppsListChanged);
    }

    /// Remove `app` from every workspace.
    pub fn unassign_app(&mut self, app: &AppIdentity) {
        self.profiles.current_mut().delete_app_from_all(app);
        self.publish(Event::AppsListChanged);
    }

    /// Run the re-hide pass if it is due.  Returns whether a pass ran.
    pub fn run_due_rehide(&mut self) -> bool {
        let now = self.clock.now();
        let Some(id) = self.rehide.take_due(now) else {
            return false;
        };
        let Some(workspace) = self.workspaces().get(id).cloned() else {
            return false;
        };
        let display = self.workspace_display(&workspace);
        debug!("re-hide pass for {}", workspace.name);
        self.hide_apps(&workspace, &display);
        true
    }

    /// Remember `app` as the last focused app of `id`.
    pub fn set_last_focused_app(&mut self, id: WorkspaceId, app: AppIdentity) {
        self.last_focused_app.insert(id, app);
    }

    /// Record `app` as last focused in the active workspace of its display,
    /// if that workspace lists it.
    pub fn note_focused_app(&mut self, app: &RunningApp) {
        let Some(display) = self.app_display(app) else {
            return;
        };
        let Some(ws) = self.active_workspace(&display) else {
            return;
        };
        if ws.contains(&app.identity) {
            let id = ws.id;
            self.last_focused_app.insert(id, app.identity.clone());
        }
    }

    //  Invalidation

    /// Display topology changed: display names may be stale, so forget
    /// which workspace is shown where.
    pub fn handle_displays_changed(&mut self) {
        info!("display parameters changed, resetting active workspaces");
        self.active_workspace.clear();
        self.most_recent_workspace.clear();
        self.active_workspace_details = None;
    }

    /// Select another profile and reset all runtime state.  Returns `false`
    /// when the profile does not exist.
    pub fn switch_profile(&mut self, name: &str) -> bool {
        if !self.profiles.select(name) {
            warn!("unknown profile {:?}", name);
            return false;
        }
        info!("switched to profile {}", name);
        self.last_focused_app.clear();
        self.active_workspace.clear();
        self.most_recent_workspace.clear();
        self.active_workspace_details = None;
        self.settings.set_last_focused_floating_app(None);
        self.rehide.cancel();
        true
    }

    /// Take new workspace definitions from `config`.
    ///
    /// Workspaces that survive the edit keep their runtime state; state
    /// for workspaces that are gone is dropped.  The active workspace
    /// details are then refreshed.
    pub fn reload_workspaces(&mut self, config: &Config) {
        self.profiles.reload(&config.profiles);
        info!(
            "reloaded {} workspace(s) for profile {}",
            self.workspaces().workspaces().len(),
            self.profiles.current_name()
        );

        let repo = self.profiles.current();
        let exists = |id: &WorkspaceId| repo.get(*id).is_some();
        self.active_workspace.retain(|_, id| exists(id));
        self.most_recent_workspace.retain(|_, id| exists(id));
        self.last_focused_app.retain(|id, _| exists(id));
        self.refresh_active_details();
    }

    /// Workspace definitions changed elsewhere: republish the active
    /// workspace details if its name or position moved.
    pub fn refresh_active_details(&mut self) {
        let Some(current) = self.active_workspace_details.clone() else {
            return;
        };
        let Some(ws) = self.active_workspace(&current.display).cloned() else {
            self.active_workspace_details = None;
            return;
        };
        let details = self.details_for(&ws, &current.display);
        if details != current {
            self.active_workspace_details = Some(details.clone());
            self.publish(Event::ActiveWorkspaceChanged(details));
        }
    }

    //  Internal

    fn update_active_workspace(&mut self, workspace: &Workspace, display: &str) {
        self.last_workspace_activation = Some(self.clock.now());

        match self.active_workspace.get(display).copied() {
            Some(prev) if prev == workspace.id => {}
            Some(prev) => {
                self.most_recent_workspace.insert(display.to_string(), prev);
            }
            None => {
                self.most_recent_workspace.remove(display);
            }
        }
        self.active_workspace.insert(display.to_string(), workspace.id);

        let details = self.details_for(workspace, display);
        self.active_workspace_details = Some(details.clone());
        self.publish(Event::ActiveWorkspaceChanged(details));
    }

    fn details_for(&self, workspace: &Workspace, display: &str) -> ActiveWorkspaceDetails {
        ActiveWorkspaceDetails {
            name: workspace.name.clone(),
            number: self.workspaces().number_of(workspace.id),
            symbol_icon: workspace.symbol_icon.clone(),
            display: display.to_string(),
        }
    }

    fn show_apps(&mut self, workspace: &Workspace, display: &str, set_focus: bool) {
        let running = self.running_apps();
        let apps_to_show: Vec<RunningApp> = running
            .iter()
            .filter(|app| app.is_regular())
            .filter(|app| {
                workspace.contains(&app.identity)
                    || (self.settings.is_floating(&app.identity)
                        && self.app_display(app).as_deref() == Some(display))
            })
            .cloned()
            .collect();

        for app in &apps_to_show {
            debug!("show {}", app.identity);
            self.raise(app);
        }

        if set_focus {
            if let Some(app) = self.find_app_to_focus(workspace, &apps_to_show, &running) {
                debug!("focus {}", app.identity);
                self.activate(&app);
                if self.settings.settings.center_cursor_on_workspace_change {
                    self.center_cursor(self.app_frame(&app));
                }
            }
        }

        if self.settings.settings.maintain_floating_app_focus {
            let floating = self.settings.last_focused_floating_app().and_then(|last| {
                apps_to_show
                    .iter()
                    .find(|a| &a.identity == last && self.settings.is_floating(&a.identity))
            });
            if let Some(app) = floating {
                debug!("keep floating {} in front", app.identity);
                self.raise(app);
            }
        }
    }

    /// Focus precedence: configured app, last focused app, last listed
    /// app, then the file manager.
    fn find_app_to_focus(
        &self,
        workspace: &Workspace,
        shown: &[RunningApp],
        running: &[RunningApp],
    ) -> Option<RunningApp> {
        let find_shown = |id: &AppIdentity| shown.iter().find(|a| &a.identity == id);
        let file_manager = &self.settings.settings.file_manager;

        workspace
            .app_to_focus
            .as_ref()
            .and_then(find_shown)
            .or_else(|| self.last_focused_app.get(&workspace.id).and_then(find_shown))
            .or_else(|| workspace.apps.last().and_then(find_shown))
            .or_else(|| running.iter().find(|a| &a.identity == file_manager))
            .cloned()
    }

    fn hide_apps(&self, workspace: &Workspace, display: &str) {
        let regular: Vec<RunningApp> = self
            .running_apps()
            .into_iter()
            .filter(|a| a.is_regular())
            .collect();
        let keep = |id: &AppIdentity| workspace.contains(id) || self.settings.is_floating(id);
        let is_any_workspace_app_running = regular.iter().any(|a| keep(&a.identity));
        let file_manager = &self.settings.settings.file_manager;

        let apps_to_hide = regular
            .iter()
            .filter(|a| !keep(&a.identity) && !a.is_hidden)
            .filter(|a| is_any_workspace_app_running || &a.identity != file_manager)
            .filter(|a| self.app_display(a).as_deref() == Some(display));

        for app in apps_to_hide {
            debug!("hide {}", app.identity);
            self.hide(app);
        }
    }

    fn center_cursor(&self, frame: Option<Rect>) {
        if let Some(frame) = frame {
            self.warp_cursor(frame.center());
        }
    }

    //  Provider access (failures become absence)

    fn query<T: Default>(&self, what: &str, result: Result<T, W::Error>) -> T {
        result.unwrap_or_else(|e| {
            warn!("{} unavailable: {}", what, e);
            T::default()
        })
    }

    fn perform(&self, what: &str, app: &dyn std::fmt::Display, result: Result<(), W::Error>) {
        if let Err(e) = result {
            warn!("{} {} failed: {}", what, app, e);
        }
    }

    pub(crate) fn displays(&self) -> Vec<DisplayInfo> {
        self.query("displays", self.wm.displays())
    }

    pub(crate) fn main_display(&self) -> Option<DisplayName> {
        self.query("main display", self.wm.main_display())
    }

    pub(crate) fn running_apps(&self) -> Vec<RunningApp> {
        self.query("running apps", self.wm.running_apps())
    }

    pub(crate) fn frontmost_app(&self) -> Option<RunningApp> {
        self.query("frontmost app", self.wm.frontmost_app())
    }

    pub(crate) fn windows(&self, app: &RunningApp) -> Vec<WindowInfo> {
        self.wm.windows(app).unwrap_or_else(|e| {
            debug!("windows of {} unavailable: {}", app.identity, e);
            Vec::new()
        })
    }

    /// The window the app reports as main, or failing that its focused one.
    pub(crate) fn main_window(&self, app: &RunningApp) -> Option<WindowInfo> {
        let windows = self.windows(app);
        let main = windows.iter().position(|w| w.is_main);
        let focused = windows.iter().position(|w| w.is_focused);
        main.or(focused).map(|i| windows[i].clone())
    }

    pub(crate) fn app_frame(&self, app: &RunningApp) -> Option<Rect> {
        self.main_window(app).map(|w| w.frame)
    }

    /// The display `app` lives on, judged by its main window.
    pub(crate) fn app_display(&self, app: &RunningApp) -> Option<DisplayName> {
        let windows = self.windows(app);
        let main = windows
            .iter()
            .find(|w| w.is_main)
            .or_else(|| windows.iter().find(|w| w.is_focused));
        let frame = match main {
            Some(w) if !w.frame.is_degenerate(DEGENERATE_WINDOW_SIDE) => w.frame,
            Some(_) => windows
                .iter()
                .find(|w| !w.frame.is_degenerate(DEGENERATE_WINDOW_SIDE))?
                .frame,
            None => return None,
        };
        display_for_frame(&self.displays(), &frame).map(|d| d.name.clone())
    }

    /// The display under the pointer.
    pub(crate) fn cursor_display(&self) -> Option<DisplayName> {
        let point = self.query("cursor location", self.wm.cursor_location())?;
        display_at_point(&self.displays(), point).map(|d| d.name.clone())
    }

    /// The display a workspace is shown on: its configured display when
    /// connected, otherwise the display that currently has focus.
    pub fn workspace_display(&self, workspace: &Workspace) -> DisplayName {
        let displays = self.displays();
        if let Some(name) = &workspace.display {
            if displays.iter().any(|d| &d.name == name) {
                return name.clone();
            }
        }
        self.main_display()
            .or_else(|| displays.first().map(|d| d.name.clone()))
            .or_else(|| workspace.display.clone())
            .unwrap_or_default()
    }

    pub(crate) fn raise(&self, app: &RunningApp) {
        self.perform("raise", &app.identity, self.wm.raise_app(app));
    }

    pub(crate) fn activate(&self, app: &RunningApp) {
        self.perform("activate", &app.identity, self.wm.activate_app(app));
    }

    pub(crate) fn hide(&self, app: &RunningApp) {
        self.perform("hide", &app.identity, self.wm.hide_app(app));
    }

    pub(crate) fn focus_window(&self, window: &WindowInfo) {
        self.perform("focus window", &window.id, self.wm.focus_window(window));
    }

    pub(crate) fn warp_cursor(&self, point: Point) {
        if let Err(e) = self.wm.warp_cursor(point) {
            warn!("warp cursor failed: {}", e);
        }
    }

    pub(crate) fn center_app(&self, app: &RunningApp, display: &str) {
        self.perform("center", &app.identity, self.wm.center_app(app, display));
    }
}

//  Tests
