use crate::map::GridMap;
use crate::types::{Action, AgentId, Color, Tile};
use std::collections::BTreeMap;

/// Third-party judge of norm compliance.
///
/// The observer keeps its own snapshot of the grid and scores joint actions
/// against it: every agent whose move would enter a norm-forbidden item adds
/// one to the loss.
#[derive(Debug, Clone)]
pub struct Observer {
    grid: GridMap,
    norm: BTreeMap<Color, bool>,
}

impl Observer {
    #[must_use]
    pub fn new(grid: GridMap, norm: BTreeMap<Color, bool>) -> Self {
        Self { grid, norm }
    }

    pub fn update_grid(&mut self, grid: &GridMap) {
        self.grid.clone_from(grid);
    }

    /// Norm loss of a joint action on the current snapshot.
    #[must_use]
    pub fn observation(&self, actions: &BTreeMap<AgentId, Action>) -> f32 {
        let violations = self
            .grid
            .iter()
            .filter_map(|(pos, tile)| match tile {
                Tile::Agent(id) => Some((pos, actions.get(&id)?)),
                _ => None,
            })
            .filter_map(|(pos, &action)| self.grid.get(pos.offset(action)?))
            .filter(|tile| match tile {
                Tile::Item(c) => self.norm.get(c).copied().unwrap_or(false),
                _ => false,
            })
            .count();
        violations as f32
    }
}
