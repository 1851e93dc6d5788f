//! Space control: workspaces laid out as a grid and navigated with arrows.
//!
//! The [`SpaceGrid`] places up to [`MAX_WORKSPACES`] workspaces row by row.
//! Up to three workspaces sit in a single row; beyond that the grid is at
//! least three columns wide and grows wider rather than taller, so it
//! never has more than three full rows.
//!
//! Moving left or right walks the list in order and wraps around.  Moving
//! up or down jumps a whole row and does nothing at the edge of the grid.

use crate::command::Direction;
use crate::model::WorkspaceId;
use crate::traits::WindowProvider;
use crate::workspace_manager::WorkspaceManager;
use log::debug;

/// Most workspaces shown in the grid.
pub const MAX_WORKSPACES: usize = 15;

/// A fixed grid of workspaces with a cursor on one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGrid {
    cells: Vec<WorkspaceId>,
    /// Number of columns (width).
    cols: usize,
    /// Number of rows (height).
    rows: usize,
    /// Index of the selected cell.
    index: Option<usize>,
}

impl SpaceGrid {
    /// Lay out `workspaces` and select `current`.  When `current` is not in
    /// the grid nothing is selected and navigation goes nowhere.
    pub fn new(mut workspaces: Vec<WorkspaceId>, current: Option<WorkspaceId>) -> Self {
        workspaces.truncate(MAX_WORKSPACES);
        let (cols, rows) = Self::layout(workspaces.len());
        let index = current.and_then(|c| workspaces.iter().position(|w| *w == c));
        Self {
            cells: workspaces,
            cols,
            rows,
            index,
        }
    }

    /// Grid size as `(cols, rows)` for `count` workspaces.
    pub fn layout(count: usize) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        let cols = if count <= 3 {
            count
        } else {
            count.div_ceil(3).max(3)
        };
        (cols, count.div_ceil(cols))
    }

    //  Accessors

    /// Grid dimensions as `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Selected position as `(col, row)`.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.index.map(|i| (i % self.cols, i / self.cols))
    }

    pub fn selected(&self) -> Option<WorkspaceId> {
        self.index.and_then(|i| self.cells.get(i).copied())
    }

    pub fn cell_at(&self, col: usize, row: usize) -> Option<WorkspaceId> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    //  Navigation

    /// Move one step in `direction` and return the newly selected
    /// workspace.  Returns `None` when nothing is selected.
    pub fn go(&mut self, direction: Direction) -> Option<WorkspaceId> {
        let n = self.cells.len();
        let index = self.index?;
        let next = match direction {
            Direction::Left => (index + n - 1) % n,
            Direction::Right => (index + 1) % n,
            Direction::Up if index >= self.cols => index - self.cols,
            Direction::Down if index + self.cols < n => index + self.cols,
            Direction::Up | Direction::Down => index,
        };
        self.index = Some(next);
        self.selected()
    }
}

impl<W: WindowProvider> WorkspaceManager<W> {
    /// The grid as seen from the focused display.
    pub fn space_grid(&self) -> SpaceGrid {
        let display = self.main_display();
        let only_current = self.settings().settings.space_control_current_display_only;
        let ids = self
            .workspaces()
            .workspaces()
            .iter()
            .filter(|w| !only_current || Some(self.workspace_display(w)) == display)
            .map(|w| w.id)
            .collect();
        let current = display.and_then(|d| self.active_workspace(&d).map(|w| w.id));
        SpaceGrid::new(ids, current)
    }

    /// Move through the grid and activate the workspace landed on.  Does
    /// nothing unless the focused display shows a workspace of the grid.
    pub fn space_control(&mut self, direction: Direction) {
        let mut grid = self.space_grid();
        let before = grid.selected();
        let Some(id) = grid.go(direction) else {
            debug!("space control {}: no workspace selected", direction);
            return;
        };
        if self.is_active(id) && Some(id) == before {
            debug!("space control {}: already on {}", direction, id);
            return;
        }
        self.activate_workspace(id, true);
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{manager, STANDARD_CONFIG};

    fn ids(n: u64) -> Vec<WorkspaceId> {
        (1..=n).map(WorkspaceId).collect()
    }

    #[test]
    fn layout_by_count() {
        assert_eq!(SpaceGrid::layout(0), (0, 0));
        assert_eq!(SpaceGrid::layout(1), (1, 1));
        assert_eq!(SpaceGrid::layout(3), (3, 1));
        assert_eq!(SpaceGrid::layout(4), (3, 2));
        assert_eq!(SpaceGrid::layout(9), (3, 3));
        assert_eq!(SpaceGrid::layout(10), (4, 3));
        assert_eq!(SpaceGrid::layout(15), (5, 3));
    }

    #[test]
    fn grid_is_capped() {
        let g = SpaceGrid::new(ids(20), None);
        assert_eq!(g.dimensions(), (5, 3));
        assert_eq!(g.cell_at(4, 2), Some(WorkspaceId(15)));
    }

    #[test]
    fn starts_on_current_workspace() {
        let g = SpaceGrid::new(ids(7), Some(WorkspaceId(5)));
        assert_eq!(g.position(), Some((1, 1)));
        let g = SpaceGrid::new(ids(7), Some(WorkspaceId(99)));
        assert_eq!(g.position(), None);
    }

    #[test]
    fn left_and_right_wrap() {
        let mut g = SpaceGrid::new(ids(4), Some(WorkspaceId(1)));
        assert_eq!(g.go(Direction::Left), Some(WorkspaceId(4)));
        assert_eq!(g.go(Direction::Right), Some(WorkspaceId(1)));
        assert_eq!(g.go(Direction::Right), Some(WorkspaceId(2)));
    }

    #[test]
    fn up_and_down_stop_at_edges() {
        // 3×2 grid with a partial second row: 1 2 3 / 4 5
        let mut g = SpaceGrid::new(ids(5), Some(WorkspaceId(3)));
        assert_eq!(g.go(Direction::Up), Some(WorkspaceId(3)));
        // No cell below 3.
        assert_eq!(g.go(Direction::Down), Some(WorkspaceId(3)));
        g.go(Direction::Left);
        assert_eq!(g.go(Direction::Down), Some(WorkspaceId(5)));
        assert_eq!(g.go(Direction::Up), Some(WorkspaceId(2)));
    }

    #[test]
    fn empty_grid_goes_nowhere() {
        let mut g = SpaceGrid::new(Vec::new(), None);
        assert_eq!(g.go(Direction::Right), None);
        assert_eq!(g.position(), None);
    }

    #[test]
    fn grid_without_selection_goes_nowhere() {
        let mut g = SpaceGrid::new(ids(5), None);
        for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            assert_eq!(g.go(direction), None);
        }
        assert_eq!(g.selected(), None);
    }

    #[test]
    fn space_control_needs_active_workspace_on_main_display() {
        let (mut mgr, _clock) = manager(STANDARD_CONFIG);
        mgr.space_control(Direction::Up);
        assert!(mgr.active_workspace("Main").is_none());

        // Chat is shown on the side display only.
        let chat = mgr.workspaces().find_by_name("Chat").unwrap().id;
        mgr.activate_workspace(chat, false);
        mgr.space_control(Direction::Right);
        assert!(mgr.active_workspace("Main").is_none());
        assert_eq!(mgr.active_workspace("Side").map(|w| w.id), Some(chat));
    }

    #[test]
    fn space_control_activates_neighbour() {
        let (mut mgr, _clock) = manager(STANDARD_CONFIG);
        let code = mgr.workspaces().find_by_name("Code").unwrap().id;
        let web = mgr.workspaces().find_by_name("Web").unwrap().id;
        let chat = mgr.workspaces().find_by_name("Chat").unwrap().id;
        mgr.activate_workspace(code, false);

        mgr.space_control(Direction::Right);
        assert_eq!(mgr.active_workspace("Main").map(|w| w.id), Some(web));
        mgr.space_control(Direction::Right);
        assert_eq!(mgr.active_workspace("Side").map(|w| w.id), Some(chat));
    }

    #[test]
    fn current_display_only_filters_grid() {
        let json = STANDARD_CONFIG.replacen(
            "{",
            r#"{ "settings": { "space_control_current_display_only": true },"#,
            1,
        );
        let (mut mgr, _clock) = manager(&json);
        assert_eq!(mgr.space_grid().dimensions(), (2, 1));

        let code = mgr.workspaces().find_by_name("Code").unwrap().id;
        let web = mgr.workspaces().find_by_name("Web").unwrap().id;
        mgr.activate_workspace(code, false);
        mgr.space_control(Direction::Left);
        assert_eq!(mgr.active_workspace("Main").map(|w| w.id), Some(web));
        assert!(mgr.active_workspace("Side").is_none());
    }
}
