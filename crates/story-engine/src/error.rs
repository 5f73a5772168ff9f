// FILE: crates/story-engine/src/error.rs

use thiserror::Error;

/// Reasons a playback session cannot be started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSessionError {
    #[error("Story catalog is empty")]
    EmptyCatalog,

    #[error("Start index {index} out of range for {group_count} groups")]
    StartIndexOutOfRange { index: usize, group_count: usize },

    #[error("Story group {group_index} has no stories")]
    EmptyGroup { group_index: usize },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    InvalidSession(#[from] InvalidSessionError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
