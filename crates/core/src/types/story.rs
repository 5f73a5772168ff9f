//! Story and story group domain models

use crate::error::{AppError, Result};
use crate::types::{Duration, Timestamp, UserRef, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of a story before it expires
pub const STORY_LIFETIME: Duration = Duration::from_millis(24 * 60 * 60 * 1000);

/// Unique identifier for a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    /// Creates a new random StoryId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a StoryId from a UUID string
    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the StoryId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single ephemeral post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub author: UserRef,
    pub image: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(default)]
    pub viewed: bool,
    /// Overrides the viewer's default display duration (e.g. video stories)
    #[serde(default)]
    pub display_duration: Option<Duration>,
}

impl Story {
    /// Creates an unviewed story that expires after [`STORY_LIFETIME`]
    pub fn new(author: UserRef, image: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: StoryId::new(),
            author,
            image: image.into(),
            created_at,
            expires_at: created_at.plus(STORY_LIFETIME),
            viewed: false,
            display_duration: None,
        }
    }

    pub fn with_display_duration(mut self, duration: Duration) -> Self {
        self.display_duration = Some(duration);
        self
    }

    /// Marks the story as viewed
    ///
    /// Returns true only when the flag actually changed.
    pub fn mark_viewed(&mut self) -> bool {
        let changed = !self.viewed;
        self.viewed = true;
        changed
    }

    /// Returns true once `now` has reached the expiration timestamp
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Age of the story at `now`
    pub fn age(&self, now: Timestamp) -> Duration {
        now.since(self.created_at)
    }
}

impl Validator for Story {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.expires_at <= self.created_at {
            errors.push("Expiration must be after creation".to_string());
        }

        if self.image.trim().is_empty() {
            errors.push("Image reference cannot be empty".to_string());
        }

        if let Some(duration) = self.display_duration {
            if duration.is_zero() {
                errors.push("Display duration must be greater than zero".to_string());
            }
        }

        if let Err(author_errors) = self.author.validate() {
            errors.extend(author_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// All stories authored by one user for a viewing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryGroup {
    pub author: UserRef,
    pub stories: Vec<Story>,
}

impl StoryGroup {
    /// Creates a group, rejecting an empty story list
    pub fn new(author: UserRef, stories: Vec<Story>) -> Result<Self> {
        if stories.is_empty() {
            return Err(AppError::EmptyStoryGroup {
                author: author.display_name,
            });
        }
        Ok(Self { author, stories })
    }

    /// Number of stories in the group
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Index of the last story, `None` for an empty group
    pub fn last_index(&self) -> Option<usize> {
        self.stories.len().checked_sub(1)
    }

    pub fn story(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    /// True if any story in the group has not been viewed yet
    pub fn has_unviewed(&self) -> bool {
        self.stories.iter().any(|s| !s.viewed)
    }

    /// Returns a copy without expired stories, or `None` if nothing is left
    pub fn without_expired(&self, now: Timestamp) -> Option<StoryGroup> {
        let stories: Vec<Story> = self
            .stories
            .iter()
            .filter(|s| !s.is_expired(now))
            .cloned()
            .collect();

        if stories.is_empty() {
            None
        } else {
            Some(StoryGroup {
                author: self.author.clone(),
                stories,
            })
        }
    }
}

impl Validator for StoryGroup {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.stories.is_empty() {
            errors.push(format!(
                "Story group for {} has no stories",
                self.author.display_name
            ));
        }

        for (index, story) in self.stories.iter().enumerate() {
            if let Err(story_errors) = story.validate() {
                errors.extend(
                    story_errors
                        .into_iter()
                        .map(|e| format!("story {}: {}", index, e)),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
