use crate::error::EnvError;
use crate::map::GridMap;
use crate::types::{Action, AgentId, Color};
use image::RgbImage;
use std::collections::BTreeMap;
use std::path::Path;

/// Per-agent observation: an RGB view of the grid.
pub type Observation = RgbImage;

/// Extra per-agent data returned by [`MultiAgentEnv::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInfo {
    /// Colour of the item consumed this step, if any.
    pub consumed: Option<Color>,
    /// Whether the consumed item was forbidden by the norm.
    pub violated_norm: bool,
}

/// Result of one joint step, keyed by agent.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub observations: BTreeMap<AgentId, Observation>,
    pub rewards: BTreeMap<AgentId, f32>,
    pub dones: BTreeMap<AgentId, bool>,
    /// Set once every agent is done.
    pub all_done: bool,
    pub infos: BTreeMap<AgentId, StepInfo>,
}

/// Multi-agent grid environment.
///
/// Modelled after the classic gym interface: [`step`] takes one action per
/// agent and returns the new observations, rewards and termination flags.
/// Environments also render themselves and expose scripted policies for
/// their agents.
///
/// [`step`]: MultiAgentEnv::step
pub trait MultiAgentEnv {
    /// Reset to the initial layout and return the initial observations.
    fn reset(&mut self) -> BTreeMap<AgentId, Observation>;

    /// Advance the environment by one joint action.
    ///
    /// # Errors
    ///
    /// Fails when an agent has no action in `actions`.
    fn step(&mut self, actions: &BTreeMap<AgentId, Action>) -> Result<StepOutcome, EnvError>;

    /// Ids of all agents, in index order.
    fn agent_ids(&self) -> Vec<AgentId>;

    fn num_agents(&self) -> usize {
        self.agent_ids().len()
    }

    /// Size of the discrete action space.
    fn action_space(&self) -> usize {
        Action::COUNT
    }

    /// Current grid, agents included.
    fn grid(&self) -> &GridMap;

    /// One pixel per cell, `width = cols` and `height = rows`.
    fn map_to_colors(&self) -> RgbImage;

    /// `(width, height)` in pixels of the frames written by [`render`].
    ///
    /// [`render`]: MultiAgentEnv::render
    fn frame_size(&self) -> (u32, u32);

    /// Write an upscaled frame of the current state to `filename`.
    ///
    /// # Errors
    ///
    /// Propagates image encoding and I/O failures.
    fn render(&self, filename: &Path) -> Result<(), EnvError>;

    /// Action chosen by the agent's scripted lookahead policy.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownAgent`] for an id outside the environment.
    fn scripted_action(&self, agent: AgentId, depth: usize) -> Result<Action, EnvError>;
}
