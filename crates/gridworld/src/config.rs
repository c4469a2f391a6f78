use crate::error::EnvError;
use crate::types::Color;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Largest accepted [`NormConfig::view_radius`].
pub const MAX_VIEW_RADIUS: usize = 64;
/// Largest accepted [`NormConfig::cell_pixels`].
pub const MAX_CELL_PIXELS: u32 = 128;

/// Parameters of a [`crate::NormEnv`].
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormConfig {
    pub num_agents: usize,
    /// `true` marks a colour whose consumption violates the norm.
    pub norm: BTreeMap<Color, bool>,
    /// Reward for consuming an item of each colour.
    pub reward: BTreeMap<Color, f32>,
    /// Cost the scripted policy assigns to a norm violation.
    pub norm_penalty: f32,
    /// Half-width of the egocentric observation window.
    pub view_radius: usize,
    /// Steps before a consumed item grows back.
    pub regrowth_steps: usize,
    pub seed: u64,
    /// ASCII layout, see [`crate::map`]. `None` uses [`crate::map::DEFAULT_LAYOUT`].
    pub layout: Option<Vec<String>>,
    /// Side length in pixels of one cell in rendered frames.
    pub cell_pixels: u32,
}

impl Default for NormConfig {
    fn default() -> Self {
        Self {
            num_agents: 2,
            norm: BTreeMap::from([(Color::Green, true), (Color::Red, false), (Color::Blue, false)]),
            reward: BTreeMap::from([(Color::Green, 0.5), (Color::Red, 0.5), (Color::Blue, 0.5)]),
            norm_penalty: 1.0,
            view_radius: 3,
            regrowth_steps: 20,
            seed: 0,
            layout: None,
            cell_pixels: 16,
        }
    }
}

impl NormConfig {
    /// Checks the values that size observation and frame buffers.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfig`] when `view_radius` exceeds
    /// [`MAX_VIEW_RADIUS`] or `cell_pixels` is outside `1..=MAX_CELL_PIXELS`.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.view_radius > MAX_VIEW_RADIUS {
            return Err(EnvError::InvalidConfig(format!(
                "view_radius {} exceeds {MAX_VIEW_RADIUS}",
                self.view_radius
            )));
        }
        if !(1..=MAX_CELL_PIXELS).contains(&self.cell_pixels) {
            return Err(EnvError::InvalidConfig(format!(
                "cell_pixels {} is outside 1..={MAX_CELL_PIXELS}",
                self.cell_pixels
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_forbidden(&self, color: Color) -> bool {
        self.norm.get(&color).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn reward_for(&self, color: Color) -> f32 {
        self.reward.get(&color).copied().unwrap_or(0.0)
    }

    /// Value the scripted policy places on consuming `color`.
    #[must_use]
    pub fn planning_value(&self, color: Color) -> f32 {
        let penalty = if self.is_forbidden(color) { self.norm_penalty } else { 0.0 };
        self.reward_for(color) - penalty
    }
}
