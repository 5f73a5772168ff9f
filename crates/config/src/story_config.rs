//! Story playback timing section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing settings for the story viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoryConfig {
    /// How long each story stays on screen (milliseconds)
    pub story_duration_ms: u64,

    /// Interval between render ticks (milliseconds)
    pub tick_interval_ms: u64,

    /// Hold time before a press counts as a long press (milliseconds)
    pub long_press_ms: u64,
}

impl StoryConfig {
    pub const STORY_DURATION_RANGE: (u64, u64) = (100, 60_000);
    pub const TICK_INTERVAL_RANGE: (u64, u64) = (10, 1_000);
    pub const LONG_PRESS_RANGE: (u64, u64) = (100, 2_000);

    pub fn story_duration(&self) -> Duration {
        Duration::from_millis(self.story_duration_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            story_duration_ms: 3_000,
            tick_interval_ms: 50,
            long_press_ms: 300,
        }
    }
}

impl ConfigSection for StoryConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let (min_dur, max_dur) = Self::STORY_DURATION_RANGE;
        let (min_tick, max_tick) = Self::TICK_INTERVAL_RANGE;
        let (min_press, max_press) = Self::LONG_PRESS_RANGE;

        let mut results = vec![
            Validator::in_range(
                self.story_duration_ms,
                min_dur,
                max_dur,
                "story.story_duration_ms",
            ),
            Validator::in_range(
                self.tick_interval_ms,
                min_tick,
                max_tick,
                "story.tick_interval_ms",
            ),
            Validator::in_range(
                self.long_press_ms,
                min_press,
                max_press,
                "story.long_press_ms",
            ),
        ];

        // Only meaningful once both values are individually sane.
        if results.iter().all(Result::is_ok) {
            results.push(Validator::at_most(
                self.tick_interval_ms,
                self.story_duration_ms,
                "story.tick_interval_ms",
                "story_duration_ms",
            ));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.story_duration_ms = other.story_duration_ms;
        self.tick_interval_ms = other.tick_interval_ms;
        self.long_press_ms = other.long_press_ms;
    }

    fn section_name(&self) -> &'static str {
        "story"
    }
}
