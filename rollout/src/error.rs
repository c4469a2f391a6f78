use gridworld::EnvError;
use thiserror::Error;
use video::VideoError;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("unknown environment {0:?}; expected one of cleanup, harvest or norm")]
    UnknownEnvironment(String),
    #[error("environment {0:?} is not implemented yet")]
    UnsupportedEnvironment(String),
    #[error("environment has no agents")]
    NoAgents,
    #[error("environment error: {0}")]
    Env(#[from] EnvError),
    #[error("video error: {0}")]
    Video(#[from] VideoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid environment config: {0}")]
    Config(#[from] serde_json::Error),
}
