//! Environment lifecycle and the rollout loop.

use crate::error::ControllerError;
use clap::ValueEnum;
use gridworld::{
    Action, AgentId, Color, EnvError, MultiAgentEnv, NormConfig, NormEnv, Observation, Observer,
};
use image::RgbImage;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory used by [`Controller::render_rollout`] when no path is given.
pub const DEFAULT_VIDEO_DIR: &str = "videos";
/// Subdirectory of the video directory holding PNG frames in pretty mode.
pub const FRAMES_DIR: &str = "frames";
/// Search depth of the scripted agent policies.
pub const LOOKAHEAD_DEPTH: usize = 2;
/// Agent whose rewards and observations are buffered.
pub const FOCUS_AGENT: AgentId = AgentId(0);

const PROGRESS_INTERVAL: usize = 50;

/// Supported environment variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    Norm,
}

impl EnvKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EnvKind::Norm => "norm",
        }
    }
}

impl FromStr for EnvKind {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "norm" => Ok(EnvKind::Norm),
            "cleanup" | "harvest" => Err(ControllerError::UnsupportedEnvironment(s.to_string())),
            other => Err(ControllerError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// How [`Controller::render_rollout`] produces its video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderType {
    /// Write each frame as a PNG, then assemble the video from the directory.
    Pretty,
    /// Keep frames in memory and encode them directly.
    Fast,
}

/// Buffers of one rollout, indexed by timestep.
#[derive(Debug, Clone, Default)]
pub struct Rollout {
    /// Reward of [`FOCUS_AGENT`] at each step.
    pub rewards: Vec<f32>,
    /// Observation of [`FOCUS_AGENT`] after each step.
    pub observations: Vec<Observation>,
    /// Whole-map RGB frame after each step, one pixel per cell.
    pub frames: Vec<RgbImage>,
    /// Number of norm violations the observer saw in each joint action.
    pub norm_loss: Vec<f32>,
}

impl Rollout {
    fn with_capacity(horizon: usize) -> Self {
        Self {
            rewards: Vec::with_capacity(horizon),
            observations: Vec::with_capacity(horizon),
            frames: Vec::with_capacity(horizon),
            norm_loss: Vec::with_capacity(horizon),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    #[must_use]
    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    #[must_use]
    pub fn total_norm_loss(&self) -> f32 {
        self.norm_loss.iter().sum()
    }
}

/// Drives an environment with scripted agents and renders the result.
pub struct Controller {
    kind: EnvKind,
    env: Box<dyn MultiAgentEnv>,
    norm: BTreeMap<Color, bool>,
}

impl Controller {
    /// Builds and resets the environment named `env_name`.
    ///
    /// # Errors
    ///
    /// Fails for unknown or unimplemented environment names, and when the
    /// environment itself cannot be built.
    pub fn new(env_name: &str, config: NormConfig) -> Result<Self, ControllerError> {
        let kind = env_name.parse::<EnvKind>()?;
        tracing::info!("Initializing {} environment", kind.name());

        let norm = config.norm.clone();
        let mut env: Box<dyn MultiAgentEnv> = match kind {
            EnvKind::Norm => Box::new(NormEnv::new(config)?),
        };
        if env.num_agents() == 0 {
            return Err(ControllerError::NoAgents);
        }
        env.reset();

        Ok(Self { kind, env, norm })
    }

    #[must_use]
    pub fn env_name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn env(&self) -> &dyn MultiAgentEnv {
        self.env.as_ref()
    }

    /// Steps the environment `horizon` times with every agent following its
    /// scripted policy. When `save_path` is set, a `frame%06d.png` is written
    /// there after each step.
    ///
    /// # Errors
    ///
    /// Propagates environment and frame-writing failures.
    pub fn rollout(
        &mut self,
        horizon: usize,
        save_path: Option<&Path>,
    ) -> Result<Rollout, ControllerError> {
        let mut buffers = Rollout::with_capacity(horizon);
        let mut observer = Observer::new(self.env.grid().clone(), self.norm.clone());

        for i in 0..horizon {
            observer.update_grid(self.env.grid());
            let actions = self.scripted_actions()?;
            let mut outcome = self.env.step(&actions)?;
            let loss = observer.observation(&actions);
            tracing::debug!("Step {i}: norm loss {loss}");

            if let Some(dir) = save_path {
                self.env.render(&dir.join(video::frame_file_name(i)))?;
            }

            buffers.frames.push(self.env.map_to_colors());
            buffers
                .observations
                .push(outcome.observations.remove(&FOCUS_AGENT).ok_or(ControllerError::NoAgents)?);
            buffers
                .rewards
                .push(outcome.rewards.get(&FOCUS_AGENT).copied().ok_or(ControllerError::NoAgents)?);
            buffers.norm_loss.push(loss);

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Rollout step {} complete. {} return so far: {}",
                    i + 1,
                    FOCUS_AGENT,
                    buffers.total_reward()
                );
            }
        }

        tracing::info!(
            "Rollout finished after {} steps: {} return {}, norm loss {}",
            horizon,
            FOCUS_AGENT,
            buffers.total_reward(),
            buffers.total_norm_loss()
        );
        Ok(buffers)
    }

    /// Runs a rollout and encodes it as `<path>/<env>_trajectory.gif`,
    /// returning the video path. `path` defaults to [`DEFAULT_VIDEO_DIR`].
    ///
    /// In [`RenderType::Pretty`] mode frames go through `<path>/frames/`,
    /// which is removed afterwards even when encoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`video::VideoError::InvalidFps`] before stepping when `fps` is
    /// zero, and propagates rollout, encoding and I/O failures.
    pub fn render_rollout(
        &mut self,
        horizon: usize,
        path: Option<&Path>,
        render_type: RenderType,
        fps: u32,
    ) -> Result<PathBuf, ControllerError> {
        if fps == 0 {
            return Err(video::VideoError::InvalidFps.into());
        }
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_VIDEO_DIR), Path::to_path_buf);
        fs::create_dir_all(&path)?;
        tracing::info!("Saving videos to {}", path.display());
        let video_name = format!("{}_trajectory", self.env_name());

        match render_type {
            RenderType::Pretty => {
                let image_path = path.join(FRAMES_DIR);
                if image_path.exists() {
                    tracing::debug!("Clearing stale frames in {}", image_path.display());
                    fs::remove_dir_all(&image_path)?;
                }
                fs::create_dir_all(&image_path)?;

                let encoded = self.rollout(horizon, Some(&image_path)).and_then(|_| {
                    video::make_video_from_image_dir(&path, &image_path, fps, &video_name)
                        .map_err(ControllerError::from)
                });
                let cleanup = fs::remove_dir_all(&image_path);
                let video = encoded?;
                cleanup?;
                Ok(video)
            }
            RenderType::Fast => {
                let rollout = self.rollout(horizon, None)?;
                let resize = Some(self.env.frame_size());
                Ok(video::make_video_from_rgb_imgs(
                    &rollout.frames,
                    &path,
                    fps,
                    &video_name,
                    resize,
                )?)
            }
        }
    }

    fn scripted_actions(&self) -> Result<BTreeMap<AgentId, Action>, EnvError> {
        self.env
            .agent_ids()
            .into_iter()
            .map(|id| Ok((id, self.env.scripted_action(id, LOOKAHEAD_DEPTH)?)))
            .collect()
    }
}
