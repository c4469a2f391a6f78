#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Grid World Rollouts
//!
//! Drives the [`gridworld`] norm environment with scripted agents for a fixed
//! horizon and turns the trajectory into a video with [`video`].
//!
//! The [`Controller`] owns the environment. [`Controller::rollout`] steps it,
//! buffering the rewards and observations of `agent-0`, a whole-map frame and
//! the observer's norm loss for every timestep. [`Controller::render_rollout`]
//! wraps a rollout and writes `<env>_trajectory.gif`, either from PNG frames
//! written to disk (`pretty`) or straight from memory (`fast`).
//!
//! The `rollout` binary exposes the same through [`config::Args`].

pub mod config;
pub mod controller;
pub mod error;

pub use config::Args;
pub use controller::{Controller, EnvKind, RenderType, Rollout};
pub use error::ControllerError;
