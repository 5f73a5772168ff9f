pub mod catalog;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::{StaticCatalog, StoryCatalog};
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    Duration, Story, StoryGroup, StoryId, Timestamp, UserId, UserRef, Validator, STORY_LIFETIME,
};
