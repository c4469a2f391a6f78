#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Norm Grid World
//!
//! A small multi-agent grid world in which agents collect coloured items
//! while a *norm* marks some colours as off limits.
//!
//! ## Key Components
//!
//! -   **Environment:** [`NormEnv`] implements the [`MultiAgentEnv`] trait. It
//!     owns the [`GridMap`], moves agents, pays rewards, regrows consumed items
//!     and renders frames through the `image` crate.
//! -   **Policy:** every agent carries a scripted depth-limited lookahead
//!     policy, see [`policy`], reachable through
//!     [`MultiAgentEnv::scripted_action`].
//! -   **Observer:** [`Observer`] scores joint actions against a grid snapshot
//!     and reports how many of them break the norm.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridworld::{MultiAgentEnv, NormConfig, NormEnv};
//! use std::collections::BTreeMap;
//!
//! let mut env = NormEnv::new(NormConfig::default())?;
//! let actions: BTreeMap<_, _> = env
//!     .agent_ids()
//!     .into_iter()
//!     .map(|id| Ok((id, env.scripted_action(id, 2)?)))
//!     .collect::<Result<_, gridworld::EnvError>>()?;
//! let outcome = env.step(&actions)?;
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod map;
pub mod norm_env;
pub mod observer;
pub mod palette;
pub mod policy;
pub mod types;

pub use config::NormConfig;
pub use env::{MultiAgentEnv, Observation, StepInfo, StepOutcome};
pub use error::EnvError;
pub use map::GridMap;
pub use norm_env::{Agent, NormEnv};
pub use observer::Observer;
pub use types::{Action, AgentId, Color, Position, Tile};
