use serde::{Deserialize, Serialize};
use univibe_core::{Story, StoryGroup, StoryId};

/// Lifecycle phase of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active { paused: bool },
    Ended,
}

impl SessionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Active { paused: true })
    }
}

/// Outcome of a single controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Nothing observable changed
    Unchanged,
    /// Progress on the current story moved forward
    Progressed,
    /// Moved to another story in the same group
    StoryChanged,
    /// Moved into a different group
    GroupChanged,
    /// Playback ran past the last story; the session is over
    Ended,
}

impl Transition {
    /// True when the current (group, story) pair changed
    pub fn moved(&self) -> bool {
        matches!(self, Self::StoryChanged | Self::GroupChanged)
    }
}

/// Events queued by the controller for the presentation surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    StoryChanged {
        group_index: usize,
        story_index: usize,
    },
    /// A story's viewed flag flipped from false to true
    StoryViewed(StoryId),
    Paused,
    Resumed,
    /// One-shot signal telling the surface to close the viewer
    SessionEnded,
}

/// Everything the surface needs to draw the current frame
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub group: &'a StoryGroup,
    pub story: &'a Story,
    pub group_index: usize,
    pub story_index: usize,
    pub progress_fraction: f32,
    pub is_paused: bool,
    pub phase: SessionPhase,
}

impl RenderState<'_> {
    pub fn position(&self) -> (usize, usize) {
        (self.group_index, self.story_index)
    }
}
