//! Scripted depth-limited lookahead policy.
//!
//! The agent enumerates every sequence of its own moves up to `depth`, holding
//! the rest of the grid fixed (other agents act as walls). Each item entered
//! along a sequence is worth [`NormConfig::planning_value`], discounted by
//! [`PLAN_DISCOUNT`] per step. Leaves are scored by their BFS distance to the
//! nearest item worth collecting, so agents keep moving when nothing is in
//! reach. Ties go to the lowest action index.

use crate::config::NormConfig;
use crate::map::GridMap;
use crate::types::{Action, Position, Tile};

pub const PLAN_DISCOUNT: f32 = 0.9;

const DISTANCE_WEIGHT: f32 = 0.01;

/// Picks the action for the agent standing at `start`.
#[must_use]
pub fn lookahead(grid: &GridMap, start: Position, config: &NormConfig, depth: usize) -> Action {
    let mut view = grid.clone();
    view.set(start, Tile::Empty);
    let planner = Planner::new(view, config);

    let mut best = (Action::Up, f32::NEG_INFINITY);
    let mut consumed = Vec::with_capacity(depth);
    for action in Action::ALL {
        let q = planner.action_value(start, action, depth.max(1), &mut consumed);
        if q > best.1 {
            best = (action, q);
        }
    }
    best.0
}

struct Planner<'a> {
    view: GridMap,
    config: &'a NormConfig,
    distances: Vec<Option<usize>>,
    has_targets: bool,
}

impl<'a> Planner<'a> {
    fn new(view: GridMap, config: &'a NormConfig) -> Self {
        let targets: Vec<Position> = view
            .iter()
            .filter_map(|(pos, tile)| match tile {
                Tile::Item(c) if config.planning_value(c) > 0.0 => Some(pos),
                _ => None,
            })
            .collect();

        // Forbidden items are routed around, not through.
        let mut routing = view.clone();
        for (pos, tile) in view.iter() {
            if let Tile::Item(c) = tile {
                if config.planning_value(c) < 0.0 {
                    routing.set(pos, Tile::Wall);
                }
            }
        }
        let distances = routing.distance_field(&targets);

        Self { view, config, distances, has_targets: !targets.is_empty() }
    }

    fn step(&self, pos: Position, action: Action) -> Position {
        pos.offset(action)
            .filter(|&next| self.view.get(next).is_some_and(Tile::is_walkable))
            .unwrap_or(pos)
    }

    fn action_value(
        &self,
        pos: Position,
        action: Action,
        depth: usize,
        consumed: &mut Vec<Position>,
    ) -> f32 {
        let next = self.step(pos, action);
        match self.view.get(next) {
            Some(Tile::Item(c)) if !consumed.contains(&next) => {
                consumed.push(next);
                let future = self.state_value(next, depth - 1, consumed);
                consumed.pop();
                self.config.planning_value(c) + PLAN_DISCOUNT * future
            }
            _ => PLAN_DISCOUNT * self.state_value(next, depth - 1, consumed),
        }
    }

    fn state_value(&self, pos: Position, depth: usize, consumed: &mut Vec<Position>) -> f32 {
        if depth == 0 {
            return self.leaf_value(pos);
        }
        Action::ALL
            .iter()
            .map(|&a| self.action_value(pos, a, depth, consumed))
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn leaf_value(&self, pos: Position) -> f32 {
        if !self.has_targets {
            return 0.0;
        }
        let far = self.view.rows() * self.view.cols();
        let d = self.distances[pos.row * self.view.cols() + pos.col].unwrap_or(far);
        -DISTANCE_WEIGHT * d as f32
    }
}
