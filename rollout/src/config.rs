//! Command-line flags.

use crate::controller::{RenderType, DEFAULT_VIDEO_DIR};
use crate::error::ControllerError;
use clap::Parser;
use gridworld::NormConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "rollout")]
#[command(version, about = "Roll out scripted agents in a grid world and render the trajectory", long_about = None)]
pub struct Args {
    /// Path to directory where videos are saved
    #[arg(long, default_value = DEFAULT_VIDEO_DIR)]
    pub vid_path: PathBuf,

    /// Name of the environment to roll out (cleanup, harvest or norm)
    #[arg(long, default_value = "norm")]
    pub env: String,

    /// pretty writes PNG frames before encoding; fast encodes from memory
    #[arg(long, value_enum, default_value_t = RenderType::Pretty)]
    pub render_type: RenderType,

    /// Frames per second of the video
    #[arg(long, default_value_t = 8)]
    pub fps: u32,

    /// Number of timesteps to roll out
    #[arg(long, default_value_t = 500)]
    pub horizon: usize,

    /// Seed for the environment, overriding the config file
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with environment parameters
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Environment parameters: the config file if one was given, else the
    /// defaults, with `--seed` applied on top.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be opened or parsed.
    pub fn env_config(&self) -> Result<NormConfig, ControllerError> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
            None => NormConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}
