//! In-memory stores for workspace definitions and settings.
//!
//! These are constructed once from the [`Config`](crate::config::Config)
//! and owned by the [`WorkspaceManager`](crate::workspace_manager::WorkspaceManager).
//! Writing changes back to disk is left to whoever owns the settings UI.

use crate::config::{Config, HotKeys, ProfileConfig, Settings, WorkspaceConfig};
use crate::model::{AppIdentity, Workspace, WorkspaceId};
use log::{debug, warn};

//  Workspaces

/// Ordered list of workspaces.
///
/// Order matters: it is the 1-based "number" shown to the user, the
/// cycling order, and the priority when an app is looked up.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceRepository {
    workspaces: Vec<Workspace>,
}

impl WorkspaceRepository {
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        Self { workspaces }
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn get(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.name == name)
    }

    /// Workspace at the 1-based `number`.
    pub fn by_number(&self, number: usize) -> Option<&Workspace> {
        number.checked_sub(1).and_then(|i| self.workspaces.get(i))
    }

    /// 1-based position of `id`.
    pub fn number_of(&self, id: WorkspaceId) -> Option<usize> {
        self.workspaces.iter().position(|w| w.id == id).map(|i| i + 1)
    }

    /// First workspace in repository order that lists `app`.
    pub fn first_containing(&self, app: &AppIdentity) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.contains(app))
    }

    pub fn is_assigned(&self, app: &AppIdentity) -> bool {
        self.first_containing(app).is_some()
    }

    /// Append `app` to the workspace `id` (no-op if already listed).
    pub fn add_app(&mut self, id: WorkspaceId, app: AppIdentity) {
        if let Some(ws) = self.workspaces.iter_mut().find(|w| w.id == id) {
            if !ws.contains(&app) {
                debug!("add {} to {}", app, ws.name);
                ws.apps.push(app);
            }
        }
    }

    /// Remove `app` from every workspace.
    pub fn delete_app_from_all(&mut self, app: &AppIdentity) {
        for ws in &mut self.workspaces {
            ws.apps.retain(|a| a != app);
        }
    }
}

//  Profiles

/// Named workspace repositories, one of which is selected.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    profiles: Vec<(String, WorkspaceRepository)>,
    selected: usize,
    next_id: u64,
}

impl ProfileRepository {
    /// Build every profile from config.  Workspace ids are allocated
    /// sequentially across all profiles so they never collide.
    pub fn from_config(profiles: &[ProfileConfig], selected: Option<&str>) -> Self {
        let mut repo = Self {
            profiles: Vec::new(),
            selected: 0,
            next_id: 1,
        };
        repo.rebuild(profiles);
        if let Some(name) = selected {
            repo.select(name);
        }
        repo
    }

    /// Replace every profile with fresh definitions.
    ///
    /// A workspace keeps its id when its profile still has a workspace of
    /// the same name, or failing that, one at the same position (a rename
    /// in place).  The selected profile stays selected while it exists.
    pub fn reload(&mut self, profiles: &[ProfileConfig]) {
        let selected = self.current_name().to_string();
        self.rebuild(profiles);
        if !self.select(&selected) {
            debug!("profile {} is gone, selecting {}", selected, self.current_name());
        }
    }

    fn rebuild(&mut self, profiles: &[ProfileConfig]) {
        let previous = std::mem::take(&mut self.profiles);
        let mut built: Vec<(String, WorkspaceRepository)> = Vec::with_capacity(profiles.len());
        for p in profiles {
            let old = previous
                .iter()
                .find(|(name, _)| *name == p.name)
                .map(|(_, repo)| repo.workspaces())
                .unwrap_or(&[]);
            let ids = self.carry_ids(old, &p.workspaces);
            let workspaces = p
                .workspaces
                .iter()
                .zip(ids)
                .map(|(w, id)| build_workspace(w, id))
                .collect();
            built.push((p.name.clone(), WorkspaceRepository::new(workspaces)));
        }

        if built.is_empty() {
            built.push(("Default".into(), WorkspaceRepository::default()));
        }
        self.profiles = built;
        self.selected = 0;
        enforce_exclusive_apps(self);
    }

    /// Ids for `fresh`, reusing those of `old` by name, then by position.
    fn carry_ids(&mut self, old: &[Workspace], fresh: &[WorkspaceConfig]) -> Vec<WorkspaceId> {
        let mut ids: Vec<Option<WorkspaceId>> = fresh
            .iter()
            .map(|w| old.iter().find(|o| o.name == w.name).map(|o| o.id))
            .collect();
        for i in 0..ids.len() {
            if ids[i].is_some() {
                continue;
            }
            if let Some(o) = old.get(i) {
                if !ids.contains(&Some(o.id)) && !fresh.iter().any(|w| w.name == o.name) {
                    ids[i] = Some(o.id);
                }
            }
        }
        ids.into_iter()
            .map(|id| {
                id.unwrap_or_else(|| {
                    let id = WorkspaceId(self.next_id);
                    self.next_id += 1;
                    id
                })
            })
            .collect()
    }

    pub fn current(&self) -> &WorkspaceRepository {
        &self.profiles[self.selected].1
    }

    pub fn current_mut(&mut self) -> &mut WorkspaceRepository {
        &mut self.profiles[self.selected].1
    }

    pub fn current_name(&self) -> &str {
        &self.profiles[self.selected].0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|(n, _)| n.as_str())
    }

    /// Select the profile called `name`.  Returns `false` when no such
    /// profile exists (the selection is left unchanged).
    pub fn select(&mut self, name: &str) -> bool {
        match self.profiles.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }
}

fn build_workspace(w: &WorkspaceConfig, id: WorkspaceId) -> Workspace {
    Workspace {
        id,
        name: w.name.clone(),
        display: w.display.clone(),
        apps: dedup_apps(&w.apps),
        app_to_focus: w.app_to_focus.clone(),
        activate_shortcut: w.activate_shortcut.clone(),
        assign_app_shortcut: w.assign_app_shortcut.clone(),
        symbol_icon: w.symbol_icon.clone(),
    }
}

fn dedup_apps(apps: &[AppIdentity]) -> Vec<AppIdentity> {
    let mut out: Vec<AppIdentity> = Vec::with_capacity(apps.len());
    for app in apps {
        if !out.contains(app) {
            out.push(app.clone());
        }
    }
    out
}

/// Hand-edited configs can list an app in two workspaces of the same
/// profile; the first listing wins.
fn enforce_exclusive_apps(repo: &mut ProfileRepository) {
    for (_, profile) in &mut repo.profiles {
        let mut seen: Vec<AppIdentity> = Vec::new();
        for ws in &mut profile.workspaces {
            ws.apps.retain(|app| {
                if seen.contains(app) {
                    warn!("{} is listed in more than one workspace, keeping the first", app);
                    false
                } else {
                    seen.push(app.clone());
                    true
                }
            });
        }
    }
}

//  Settings

/// Feature toggles, hot-key chords and the floating-app set.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    pub settings: Settings,
    pub hotkeys: HotKeys,
    floating_apps: Vec<AppIdentity>,
    last_focused_floating_app: Option<AppIdentity>,
}

impl SettingsRepository {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settings: config.settings.clone(),
            hotkeys: config.hotkeys.clone(),
            floating_apps: dedup_apps(&config.floating_apps),
            last_focused_floating_app: None,
        }
    }

    pub fn floating_apps(&self) -> &[AppIdentity] {
        &self.floating_apps
    }

    pub fn is_floating(&self, app: &AppIdentity) -> bool {
        self.floating_apps.contains(app)
    }

    pub fn add_floating_app_if_needed(&mut self, app: AppIdentity) {
        if !self.is_floating(&app) {
            self.floating_apps.push(app);
        }
    }

    pub fn delete_floating_app(&mut self, app: &AppIdentity) {
        self.floating_apps.retain(|a| a != app);
        if self.last_focused_floating_app.as_ref() == Some(app) {
            self.last_focused_floating_app = None;
        }
    }

    pub fn last_focused_floating_app(&self) -> Option<&AppIdentity> {
        self.last_focused_floating_app.as_ref()
    }

    pub fn set_last_focused_floating_app(&mut self, app: Option<AppIdentity>) {
        self.last_focused_floating_app = app;
    }
}
