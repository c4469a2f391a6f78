//! # Rollout
//!
//! Entry point for the rollout binary. Parses flags, then steps the chosen
//! environment and renders the trajectory, see [`rollout::Controller`].

mod app;

use anyhow::Result;
use clap::Parser;
use rollout::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    app::run(&args)
}
