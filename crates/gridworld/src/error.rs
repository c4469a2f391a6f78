use crate::types::AgentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("layout has {found} spawn points but {required} agents were requested")]
    NotEnoughSpawnPoints { required: usize, found: usize },
    #[error("no action supplied for {0}")]
    MissingAction(AgentId),
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
