//! Binary glue: logging setup, config and the controller run.

use anyhow::{Context, Result};
use rollout::{Args, Controller};
use tracing_subscriber::EnvFilter;

/// Builds the controller from `args` and renders one rollout.
///
/// # Errors
///
/// Returns any error produced while loading the config, building the
/// environment, rolling out or encoding the video.
pub fn run(args: &Args) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = args.env_config().context("failed to load environment config")?;
    let mut controller = Controller::new(&args.env, config)
        .with_context(|| format!("failed to create environment {:?}", args.env))?;

    let video = controller
        .render_rollout(args.horizon, Some(&args.vid_path), args.render_type, args.fps)
        .context("failed to render rollout")?;
    tracing::info!("Trajectory video written to {}", video.display());
    Ok(())
}
