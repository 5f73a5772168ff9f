//! Playback timing parameters

use crate::error::{EngineError, EngineResult};
use std::time::Duration;

/// Display time of a story without its own override
pub const DEFAULT_STORY_DURATION: Duration = Duration::from_millis(3000);

/// Nominal interval between host ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Hold time after which a press counts as a long press
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Default time each story stays on screen
    pub story_duration: Duration,
    /// How often the host is expected to call `tick`
    ///
    /// Only the total elapsed time per story affects playback; this value is
    /// a hint for hosts that drive the controller from a timer.
    pub tick_interval: Duration,
    /// Threshold separating a tap from a long press
    pub long_press: Duration,
}

impl PlaybackConfig {
    pub fn new(story_duration: Duration) -> EngineResult<Self> {
        let config = Self {
            story_duration,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_long_press(mut self, long_press: Duration) -> Self {
        self.long_press = long_press;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.story_duration.is_zero() {
            return Err(EngineError::InvalidConfig(
                "story duration must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval > self.story_duration {
            return Err(EngineError::InvalidConfig(format!(
                "tick interval {:?} exceeds story duration {:?}",
                self.tick_interval, self.story_duration
            )));
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            story_duration: DEFAULT_STORY_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            long_press: DEFAULT_LONG_PRESS,
        }
    }
}
