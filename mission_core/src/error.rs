//! Errors raised while reading or writing objective data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("failed to parse objective data: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write objective data: {0}")]
    Write(#[from] toml::ser::Error),

    #[error("unknown objective condition: {0:?}")]
    UnknownCondition(String),
}
