//! Domain types for UniVibe
//!
//! - `story`: stories and per-author story groups
//! - `user`: user references attached to content
//! - `common`: shared time types and the `Validator` trait

mod common;
mod story;
mod user;

pub use common::{Duration, Timestamp, Validator};
pub use story::{Story, StoryGroup, StoryId, STORY_LIFETIME};
pub use user::{UserId, UserRef};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_are_exported() {
        let _story_id: StoryId = StoryId::new();
        let _user_id: UserId = UserId::new();
        let _author: UserRef = UserRef::new("Test");
    }
}
