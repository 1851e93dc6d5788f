//! Directional and sequential focus navigation.
//!
//! [`FocusManager`] is stateless: every call re-reads apps and windows
//! from the provider, so nothing it returns can go stale.  Frames use
//! window coordinates, with (0,0) at the top-left corner and the y axis
//! pointing down.

use crate::command::{Direction, Step};
use crate::geometry::Rect;
use crate::model::{AppIdentity, RunningApp, WindowInfo};
use crate::traits::WindowProvider;
use crate::workspace_manager::WorkspaceManager;
use log::debug;

/// A running workspace app with its windows in cycling order.
struct AppWindows {
    app: RunningApp,
    windows: Vec<WindowInfo>,
}

/// Focus navigation over the apps managed by a [`WorkspaceManager`].
pub struct FocusManager<'a, W: WindowProvider> {
    manager: &'a WorkspaceManager<W>,
}

impl<'a, W: WindowProvider> FocusManager<'a, W> {
    pub fn new(manager: &'a WorkspaceManager<W>) -> Self {
        Self { manager }
    }

    /// Focus the closest window in `direction` from the focused app's
    /// main window.
    pub fn focus(&self, direction: Direction) {
        let Some(focused) = self.manager.frontmost_app() else {
            return;
        };
        let Some(from) = self.manager.app_frame(&focused) else {
            return;
        };

        let candidates: Vec<(RunningApp, WindowInfo)> = self
            .visible_apps()
            .into_iter()
            .flat_map(|app| {
                self.manager
                    .windows(&app)
                    .into_iter()
                    .filter(|w| !w.is_minimized)
                    .map(move |w| (app.clone(), w))
            })
            .collect();

        let Some((app, window)) = closest_in_direction(&from, direction, candidates) else {
            debug!("nothing to focus {}", direction);
            return;
        };
        debug!("focus {} {} ({})", direction, app.identity, window.id);
        self.manager.focus_window(&window);
        self.manager.activate(&app);
        if self.manager.settings().settings.center_cursor_on_focus_change {
            self.manager.warp_cursor(window.frame.center());
        }
    }

    /// Activate the next or previous running app of the focused app's
    /// workspace, skipping apps that are not running.
    pub fn cycle_app(&self, step: Step) {
        let Some((index, apps)) = self.focused_app_index() else {
            return;
        };
        let running = self.manager.running_apps();
        let target = cycle_order(&apps, index, step)
            .into_iter()
            .find_map(|id| running.iter().find(|r| &r.identity == id));

        if let Some(app) = target {
            debug!("cycle {} app: {}", step, app.identity);
            self.manager.activate(app);
        }
    }

    /// Focus the next or previous window of the focused app, crossing into
    /// the adjacent workspace app at either end.
    pub fn cycle_window(&self, step: Step) {
        let Some(focused) = self.manager.frontmost_app() else {
            return self.cycle_app(step);
        };
        let Some((_, apps)) = self.focused_app_index() else {
            return;
        };

        let running = self.running_with_windows(&apps);
        let Some(pos) = running
            .iter()
            .position(|a| a.app.identity == focused.identity)
        else {
            return;
        };
        let windows = &running[pos].windows;
        let main = windows.iter().position(|w| w.is_main);

        let at_edge = match step {
            Step::Next => windows.last().is_some_and(|w| w.is_main),
            Step::Previous => windows.first().is_some_and(|w| w.is_main),
        };

        if !at_edge {
            let target = match (step, main) {
                (Step::Next, Some(i)) => windows.get(i + 1),
                (Step::Next, None) => windows.first(),
                (Step::Previous, Some(i)) => i.checked_sub(1).and_then(|i| windows.get(i)),
                (Step::Previous, None) => windows.last(),
            };
            if let Some(window) = target {
                debug!("cycle {} window: {}", step, window.id);
                self.manager.focus_window(window);
            }
            return;
        }

        // Cross into the adjacent app.  A lone app wraps onto itself.
        let n = running.len();
        let neighbour = match step {
            Step::Next => &running[(pos + 1) % n],
            Step::Previous => &running[(pos + n - 1) % n],
        };
        let window = match step {
            Step::Next => neighbour.windows.first(),
            Step::Previous => neighbour.windows.last(),
        };
        debug!("cycle {} window into {}", step, neighbour.app.identity);
        self.manager.activate(&neighbour.app);
        if let Some(window) = window {
            self.manager.focus_window(window);
        }
    }

    fn visible_apps(&self) -> Vec<RunningApp> {
        self.manager
            .running_apps()
            .into_iter()
            .filter(|a| a.is_regular() && !a.is_hidden)
            .collect()
    }

    /// The app list of the workspace that owns the focused app and the
    /// focused app's position in it.
    ///
    /// The active workspace of the focused display wins; otherwise the
    /// first workspace listing the app is used.
    fn focused_app_index(&self) -> Option<(Option<usize>, Vec<AppIdentity>)> {
        let focused = self.manager.frontmost_app()?;
        let active = self
            .manager
            .main_display()
            .and_then(|d| self.manager.active_workspace(&d));
        let workspace =
            active.or_else(|| self.manager.workspaces().first_containing(&focused.identity))?;

        let index = workspace.apps.iter().position(|a| a == &focused.identity);
        Some((index, workspace.apps.clone()))
    }

    /// Running, non-hidden apps of `apps` in list order, each with its
    /// windows sorted by id.
    fn running_with_windows(&self, apps: &[AppIdentity]) -> Vec<AppWindows> {
        let order = |app: &RunningApp| apps.iter().position(|a| a == &app.identity);
        let mut running: Vec<(usize, RunningApp)> = self
            .manager
            .running_apps()
            .into_iter()
            .filter(|a| !a.is_hidden)
            .filter_map(|a| order(&a).map(|i| (i, a)))
            .collect();
        running.sort_by_key(|(i, _)| *i);

        running
            .into_iter()
            .map(|(_, app)| {
                let mut windows = self.manager.windows(&app);
                windows.sort_by_key(|w| w.id);
                AppWindows { app, windows }
            })
            .collect()
    }
}

/// Whether `other` lies in `direction` from `from`.
pub fn is_in_direction(from: &Rect, other: &Rect, direction: Direction) -> bool {
    match direction {
        Direction::Right => other.max_x() > from.max_x() && other.vertical_intersect(from),
        Direction::Left => other.min_x() < from.min_x() && other.vertical_intersect(from),
        Direction::Down => other.max_y() > from.max_y() && other.horizontal_intersect(from),
        Direction::Up => other.min_y() < from.min_y() && other.horizontal_intersect(from),
    }
}

/// The candidate closest to `from` among those in `direction`.  Ties go to
/// the first candidate.
fn closest_in_direction(
    from: &Rect,
    direction: Direction,
    candidates: Vec<(RunningApp, WindowInfo)>,
) -> Option<(RunningApp, WindowInfo)> {
    candidates
        .into_iter()
        .filter(|(_, w)| is_in_direction(from, &w.frame, direction))
        .min_by(|(_, a), (_, b)| {
            a.frame
                .distance(from)
                .total_cmp(&b.frame.distance(from))
        })
}

/// Entries to try, in order, when stepping away from `index`.  Every entry
/// other than the current one is visited exactly once; when the current
/// app is not listed the whole list is scanned.
fn cycle_order(apps: &[AppIdentity], index: Option<usize>, step: Step) -> Vec<&AppIdentity> {
    match (index, step) {
        (Some(i), Step::Next) => apps[i + 1..].iter().chain(&apps[..i]).collect(),
        (Some(i), Step::Previous) => apps[..i]
            .iter()
            .rev()
            .chain(apps[i + 1..].iter().rev())
            .collect(),
        (None, Step::Next) => apps.iter().collect(),
        (None, Step::Previous) => apps.iter().rev().collect(),
    }
}
