use crate::config::NormConfig;
use crate::env::{MultiAgentEnv, Observation, StepInfo, StepOutcome};
use crate::error::EnvError;
use crate::map::{GridMap, DEFAULT_LAYOUT};
use crate::palette;
use crate::policy;
use crate::types::{Action, AgentId, Color, Position, Tile};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::BTreeMap;
use std::path::Path;

/// State of one agent inside a [`NormEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub pos: Position,
    /// Sum of rewards since the last reset.
    pub total_reward: f32,
    /// Number of norm-forbidden items consumed since the last reset.
    pub violations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Regrowth {
    pos: Position,
    color: Color,
    due: usize,
}

/// Grid world where agents collect coloured items under a norm.
///
/// Agents move simultaneously, resolved one at a time in a shuffled order.
/// Consuming an item pays its configured reward whether or not the norm
/// forbids it; the norm only shows up in [`StepInfo::violated_norm`] and in
/// how the scripted policy values items.
pub struct NormEnv {
    config: NormConfig,
    layout: GridMap,
    spawns: Vec<Position>,
    frame_size: (u32, u32),
    grid: GridMap,
    agents: Vec<Agent>,
    regrowth: Vec<Regrowth>,
    timestep: usize,
    rng: fastrand::Rng,
}

impl NormEnv {
    /// Builds the environment and resets it.
    ///
    /// # Errors
    ///
    /// Fails when the config is out of range, the layout does not parse, the
    /// rendered frame would not fit in `u32` dimensions, or the layout has
    /// fewer spawn points than `config.num_agents`.
    pub fn new(config: NormConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let (layout, spawns) = match &config.layout {
            Some(rows) => GridMap::parse(rows.as_slice())?,
            None => GridMap::parse(&DEFAULT_LAYOUT)?,
        };
        if spawns.len() < config.num_agents {
            return Err(EnvError::NotEnoughSpawnPoints {
                required: config.num_agents,
                found: spawns.len(),
            });
        }

        let frame_size = scaled_size(&layout, config.cell_pixels)?;

        let mut env = Self {
            grid: layout.clone(),
            frame_size,
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            layout,
            spawns,
            agents: Vec::new(),
            regrowth: Vec::new(),
            timestep: 0,
        };
        env.reset();
        Ok(env)
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    /// Steps taken since the last reset.
    #[must_use]
    pub fn timestep(&self) -> usize {
        self.timestep
    }

    /// Egocentric view centred on the agent. Cells off the map use
    /// [`palette::OUT_OF_BOUNDS`].
    fn observe(&self, agent: &Agent) -> Observation {
        let r = self.config.view_radius;
        let side = (2 * r + 1) as u32;
        RgbImage::from_fn(side, side, |x, y| {
            let row = (agent.pos.row + y as usize).checked_sub(r);
            let col = (agent.pos.col + x as usize).checked_sub(r);
            match (row, col) {
                (Some(row), Some(col)) => self
                    .grid
                    .get(Position::new(row, col))
                    .map_or(palette::OUT_OF_BOUNDS, palette::tile),
                _ => palette::OUT_OF_BOUNDS,
            }
        })
    }

    fn observations(&self) -> BTreeMap<AgentId, Observation> {
        self.agents.iter().map(|a| (a.id, self.observe(a))).collect()
    }

    /// Moves one agent, returning its reward and what it consumed.
    fn move_agent(&mut self, index: usize, action: Action) -> (f32, StepInfo) {
        let agent = &self.agents[index];
        let Some(target) = agent
            .pos
            .offset(action)
            .filter(|&t| self.grid.get(t).is_some_and(Tile::is_walkable))
        else {
            return (0.0, StepInfo::default());
        };

        let consumed = match self.grid.get(target) {
            Some(Tile::Item(color)) => Some(color),
            _ => None,
        };
        let (id, from) = (agent.id, agent.pos);
        self.grid.set(from, Tile::Empty);
        self.grid.set(target, Tile::Agent(id));
        self.agents[index].pos = target;

        let Some(color) = consumed else {
            return (0.0, StepInfo::default());
        };
        let reward = self.config.reward_for(color);
        let violated = self.config.is_forbidden(color);
        let agent = &mut self.agents[index];
        agent.total_reward += reward;
        if violated {
            agent.violations += 1;
            tracing::debug!("{id} violated the norm on {color:?} at {target:?}");
        }
        self.regrowth.push(Regrowth {
            pos: target,
            color,
            due: self.timestep + self.config.regrowth_steps,
        });
        (reward, StepInfo { consumed: Some(color), violated_norm: violated })
    }

    /// Regrows due items whose cell is free again.
    fn regrow(&mut self) {
        let now = self.timestep;
        let grid = &mut self.grid;
        self.regrowth.retain(|r| {
            if r.due > now || grid.get(r.pos) != Some(Tile::Empty) {
                return true;
            }
            grid.set(r.pos, Tile::Item(r.color));
            false
        });
    }
}

/// Pixel size of `layout` with `cell_pixels` pixels per cell.
fn scaled_size(layout: &GridMap, cell_pixels: u32) -> Result<(u32, u32), EnvError> {
    let scale = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|c| c.checked_mul(cell_pixels))
            .ok_or_else(|| {
                EnvError::InvalidConfig(format!(
                    "{cells} cells at {cell_pixels} pixels each overflow the frame size"
                ))
            })
    };
    Ok((scale(layout.cols())?, scale(layout.rows())?))
}

impl MultiAgentEnv for NormEnv {
    fn reset(&mut self) -> BTreeMap<AgentId, Observation> {
        self.grid = self.layout.clone();
        self.agents = self
            .spawns
            .iter()
            .take(self.config.num_agents)
            .enumerate()
            .map(|(i, &pos)| Agent { id: AgentId(i), pos, total_reward: 0.0, violations: 0 })
            .collect();
        for agent in &self.agents {
            self.grid.set(agent.pos, Tile::Agent(agent.id));
        }
        self.regrowth.clear();
        self.timestep = 0;
        self.rng = fastrand::Rng::with_seed(self.config.seed);
        tracing::debug!(
            "Reset norm environment: {}x{} grid, {} agents",
            self.grid.rows(),
            self.grid.cols(),
            self.agents.len()
        );
        self.observations()
    }

    fn step(&mut self, actions: &BTreeMap<AgentId, Action>) -> Result<StepOutcome, EnvError> {
        if let Some(&unknown) = actions.keys().find(|id| id.0 >= self.agents.len()) {
            return Err(EnvError::UnknownAgent(unknown));
        }
        let mut chosen = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let action = actions.get(&agent.id).ok_or(EnvError::MissingAction(agent.id))?;
            chosen.push(*action);
        }

        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        self.rng.shuffle(&mut order);

        let mut outcome = StepOutcome::default();
        for index in order {
            let (reward, info) = self.move_agent(index, chosen[index]);
            let id = self.agents[index].id;
            outcome.rewards.insert(id, reward);
            outcome.infos.insert(id, info);
            outcome.dones.insert(id, false);
        }

        self.timestep += 1;
        self.regrow();

        outcome.observations = self.observations();
        outcome.all_done = false;
        Ok(outcome)
    }

    fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id).collect()
    }

    fn grid(&self) -> &GridMap {
        &self.grid
    }

    fn map_to_colors(&self) -> RgbImage {
        RgbImage::from_fn(self.grid.cols() as u32, self.grid.rows() as u32, |x, y| {
            self.grid
                .get(Position::new(y as usize, x as usize))
                .map_or(palette::OUT_OF_BOUNDS, palette::tile)
        })
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    fn render(&self, filename: &Path) -> Result<(), EnvError> {
        let (width, height) = self.frame_size;
        let scaled = imageops::resize(&self.map_to_colors(), width, height, FilterType::Nearest);
        scaled.save(filename)?;
        Ok(())
    }

    fn scripted_action(&self, agent: AgentId, depth: usize) -> Result<Action, EnvError> {
        let pos = self.agent(agent).ok_or(EnvError::UnknownAgent(agent))?.pos;
        Ok(policy::lookahead(&self.grid, pos, &self.config, depth))
    }
}
