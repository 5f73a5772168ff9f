//! Playback session state and story navigation

use crate::error::InvalidSessionError;
use std::time::Duration;
use univibe_core::{Story, StoryGroup};

/// Result of moving the story cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Moved within the current group
    Story,
    /// Crossed into another group
    Group,
    /// Already at the boundary; nothing moved
    Boundary,
}

/// Mutable state of one story viewing session
///
/// Exactly one (group, story) pair is current at all times. Progress is kept
/// as time spent on the current story and resets on every move.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    groups: Vec<StoryGroup>,
    group_index: usize,
    story_index: usize,
    elapsed: Duration,
    paused: bool,
    ended: bool,
}

impl PlaybackSession {
    /// Creates a session positioned at the first story of `start_index`
    pub fn new(groups: Vec<StoryGroup>, start_index: usize) -> Result<Self, InvalidSessionError> {
        if groups.is_empty() {
            return Err(InvalidSessionError::EmptyCatalog);
        }

        if start_index >= groups.len() {
            return Err(InvalidSessionError::StartIndexOutOfRange {
                index: start_index,
                group_count: groups.len(),
            });
        }

        if let Some(group_index) = groups.iter().position(|g| g.stories.is_empty()) {
            return Err(InvalidSessionError::EmptyGroup { group_index });
        }

        Ok(Self {
            groups,
            group_index: start_index,
            story_index: 0,
            elapsed: Duration::ZERO,
            paused: false,
            ended: false,
        })
    }

    pub fn groups(&self) -> &[StoryGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<StoryGroup> {
        self.groups
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    pub fn story_index(&self) -> usize {
        self.story_index
    }

    pub fn current_group(&self) -> &StoryGroup {
        &self.groups[self.group_index]
    }

    pub fn current_story(&self) -> &Story {
        &self.current_group().stories[self.story_index]
    }

    pub(crate) fn current_story_mut(&mut self) -> &mut Story {
        &mut self.groups[self.group_index].stories[self.story_index]
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn end(&mut self) {
        self.ended = true;
        self.paused = false;
    }

    pub(crate) fn add_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    /// Fraction of `duration` spent on the current story, clamped to [0, 1]
    pub fn progress_fraction(&self, duration: Duration) -> f32 {
        if duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
    }

    fn is_last_story(&self) -> bool {
        self.story_index + 1 >= self.current_group().stories.len()
    }

    fn is_last_group(&self) -> bool {
        self.group_index + 1 >= self.groups.len()
    }

    /// Moves to the next story, crossing into the next group when needed
    pub(crate) fn step_forward(&mut self) -> Step {
        let step = if !self.is_last_story() {
            self.story_index += 1;
            Step::Story
        } else if !self.is_last_group() {
            self.group_index += 1;
            self.story_index = 0;
            Step::Group
        } else {
            return Step::Boundary;
        };

        self.elapsed = Duration::ZERO;
        step
    }

    /// Moves to the previous story; entering a previous group lands on its
    /// last story
    pub(crate) fn step_back(&mut self) -> Step {
        let step = if self.story_index > 0 {
            self.story_index -= 1;
            Step::Story
        } else if self.group_index > 0 {
            self.group_index -= 1;
            self.story_index = self.current_group().stories.len() - 1;
            Step::Group
        } else {
            return Step::Boundary;
        };

        self.elapsed = Duration::ZERO;
        step
    }

    /// Total number of stories across all groups
    pub fn total_stories(&self) -> usize {
        self.groups.iter().map(|g| g.stories.len()).sum()
    }
}
