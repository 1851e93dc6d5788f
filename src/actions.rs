//! Shortcut-driven workspace actions and the hot-key binding table.
//!
//! Every action acts on the focused application or on the display under
//! the pointer.  Missing preconditions (nothing focused, no display under
//! the pointer, unknown workspace) are silent no-ops.  Only the two
//! operator mistakes in [`ActionError`] are reported.

use crate::command::{Command, Direction, Step, WorkspaceSelector};
use crate::model::WorkspaceId;
use crate::traits::WindowProvider;
use crate::workspace_manager::WorkspaceManager;
use log::{debug, info};

/// A user mistake worth a blocking message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{name} is an agent (runs in background) and cannot be managed")]
    AgentApp { name: String },
    #[error("no workspace is active on the current display")]
    NoActiveWorkspace,
}

impl ActionError {
    /// Title for the alert shown to the user.
    pub fn title(&self) -> &str {
        match self {
            ActionError::AgentApp { name } => name,
            ActionError::NoActiveWorkspace => "Error",
        }
    }
}

impl<W: WindowProvider> WorkspaceManager<W> {
    /// Look up a workspace of the current profile.
    pub fn resolve(&self, selector: &WorkspaceSelector) -> Option<WorkspaceId> {
        let repo = self.workspaces();
        match selector {
            WorkspaceSelector::Number(n) => repo.by_number(*n),
            WorkspaceSelector::Name(name) => repo.find_by_name(name),
        }
        .map(|w| w.id)
    }

    pub fn activate_selected(&mut self, selector: &WorkspaceSelector) {
        match self.resolve(selector) {
            Some(id) => self.activate_workspace(id, true),
            None => debug!("no workspace {}", selector),
        }
    }

    /// Assign the focused app to `target`, or to the workspace active on
    /// the app's display when `target` is `None`.
    pub fn assign_focused_app(
        &mut self,
        target: Option<&WorkspaceSelector>,
    ) -> Result<(), ActionError> {
        let Some(app) = self.frontmost_app() else {
            return Ok(());
        };
        if !app.is_regular() {
            return Err(ActionError::AgentApp {
                name: app.identity.name.clone(),
            });
        }

        let id = match target {
            Some(selector) => match self.resolve(selector) {
                Some(id) => id,
                None => {
                    debug!("no workspace {}", selector);
                    return Ok(());
                }
            },
            None => self
                .app_display(&app)
                .and_then(|d| self.active_workspace(&d).map(|w| w.id))
                .ok_or(ActionError::NoActiveWorkspace)?,
        };
        let Some(workspace) = self.workspaces().get(id).cloned() else {
            return Ok(());
        };

        let display = self.workspace_display(&workspace);
        if self.app_display(&app).as_deref() != Some(display.as_str()) {
            self.center_app(&app, &display);
        }
        info!("assign {} to {}", app.identity, workspace.name);
        self.assign_app(app.identity, id);
        Ok(())
    }

    /// Remove the focused app from every workspace and hide it.
    pub fn unassign_focused_app(&mut self) {
        let Some(app) = self.frontmost_app() else {
            return;
        };
        if self.workspaces().is_assigned(&app.identity) {
            info!("unassign {}", app.identity);
        }
        self.unassign_app(&app.identity);
        self.hide(&app);
    }

    pub fn toggle_focused_app_assignment(&mut self) -> Result<(), ActionError> {
        let Some(app) = self.frontmost_app() else {
            return Ok(());
        };
        if self.workspaces().is_assigned(&app.identity) {
            self.unassign_focused_app();
            Ok(())
        } else {
            self.assign_focused_app(None)
        }
    }

    /// Activate the next or previous workspace of the display under the
    /// pointer, wrapping around.
    pub fn cycle_workspace(&mut self, step: Step) {
        let Some(screen) = self.cursor_display() else {
            return;
        };
        let mut ids: Vec<WorkspaceId> = self
            .workspaces()
            .workspaces()
            .iter()
            .filter(|w| self.workspace_display(w) == screen)
            .map(|w| w.id)
            .collect();
        if !step.is_next() {
            ids.reverse();
        }
        let Some(current) = self
            .active_workspace(&screen)
            .map(|w| w.id)
            .or_else(|| ids.first().copied())
        else {
            return;
        };
        let next = ids
            .iter()
            .skip_while(|id| **id != current)
            .nth(1)
            .or_else(|| ids.first())
            .copied();
        if let Some(id) = next {
            self.activate_workspace(id, true);
        }
    }

    /// Switch back to the previous workspace of the display under the
    /// pointer.
    pub fn activate_recent_workspace(&mut self) {
        let recent = self
            .cursor_display()
            .and_then(|screen| self.most_recent_workspace(&screen).map(|w| w.id));
        if let Some(id) = recent {
            self.activate_workspace(id, true);
        }
    }

    pub fn float_focused_app(&mut self) {
        let Some(app) = self.frontmost_app() else {
            return;
        };
        info!("float {}", app.identity);
        self.settings_mut().add_floating_app_if_needed(app.identity);
    }

    /// Stop floating the focused app.  It is hidden right away unless the
    /// active workspace of its display lists it.
    pub fn unfloat_focused_app(&mut self) {
        let Some(app) = self.frontmost_app() else {
            return;
        };
        info!("unfloat {}", app.identity);
        self.settings_mut().delete_floating_app(&app.identity);

        let Some(display) = self.app_display(&app) else {
            return;
        };
        let listed = self
            .active_workspace(&display)
            .is_some_and(|w| w.contains(&app.identity));
        if !listed {
            self.hide(&app);
        }
    }

    pub fn toggle_focused_app_floating(&mut self) {
        let Some(app) = self.frontmost_app() else {
            return;
        };
        if self.settings().is_floating(&app.identity) {
            self.unfloat_focused_app();
        } else {
            self.float_focused_app();
        }
    }

    /// Key chords paired with the command they trigger, for an external
    /// hot-key registrar.  Focus navigation is only bound when focus
    /// management is enabled.
    pub fn hot_keys(&self) -> Vec<(String, Command)> {
        let keys = &self.settings().hotkeys;
        let mut bindings = vec![
            (&keys.assign_focused_app, Command::AssignFocusedApp(None)),
            (&keys.unassign_focused_app, Command::UnassignFocusedApp),
            (
                &keys.toggle_focused_app_assignment,
                Command::ToggleFocusedAppAssignment,
            ),
            (&keys.switch_to_recent_workspace, Command::RecentWorkspace),
            (
                &keys.switch_to_previous_workspace,
                Command::CycleWorkspace(Step::Previous),
            ),
            (
                &keys.switch_to_next_workspace,
                Command::CycleWorkspace(Step::Next),
            ),
            (&keys.float_focused_app, Command::FloatFocusedApp),
            (&keys.unfloat_focused_app, Command::UnfloatFocusedApp),
            (
                &keys.toggle_focused_app_floating,
                Command::ToggleFocusedAppFloating,
            ),
        ];

        if self.settings().settings.enable_focus_management {
            bindings.extend([
                (&keys.focus_left, Command::Focus(Direction::Left)),
                (&keys.focus_right, Command::Focus(Direction::Right)),
                (&keys.focus_up, Command::Focus(Direction::Up)),
                (&keys.focus_down, Command::Focus(Direction::Down)),
                (&keys.focus_next_workspace_app, Command::CycleApp(Step::Next)),
                (
                    &keys.focus_previous_workspace_app,
                    Command::CycleApp(Step::Previous),
                ),
                (
                    &keys.focus_next_workspace_window,
                    Command::CycleWindow(Step::Next),
                ),
                (
                    &keys.focus_previous_workspace_window,
                    Command::CycleWindow(Step::Previous),
                ),
            ]);
        }

        let mut table: Vec<(String, Command)> = bindings
            .into_iter()
            .filter_map(|(key, cmd)| key.clone().map(|k| (k, cmd)))
            .collect();

        for ws in self.workspaces().workspaces() {
            let selector = WorkspaceSelector::Name(ws.name.clone());
            if let Some(key) = &ws.activate_shortcut {
                table.push((key.clone(), Command::ActivateWorkspace(selector.clone())));
            }
            if let Some(key) = &ws.assign_app_shortcut {
                table.push((key.clone(), Command::AssignFocusedApp(Some(selector))));
            }
        }
        table
    }
}
