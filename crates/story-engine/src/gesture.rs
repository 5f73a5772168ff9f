//! Gesture classification
//!
//! Turns raw press/release samples from the presentation surface into the
//! intents the controller understands. The controller never sees
//! coordinates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which half of the surface was tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapSide {
    Left,
    Right,
}

impl TapSide {
    /// Classifies a horizontal position; the left half goes back
    pub fn from_position(x: f32, width: f32) -> Self {
        if width > 0.0 && x < width / 2.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Classified user intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gesture {
    TapLeft,
    TapRight,
    LongPressStart,
    LongPressEnd,
}

impl From<TapSide> for Gesture {
    fn from(side: TapSide) -> Self {
        match side {
            TapSide::Left => Self::TapLeft,
            TapSide::Right => Self::TapRight,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    side: TapSide,
    started_ms: u64,
    holding: bool,
}

/// Press/release state machine producing [`Gesture`]s
///
/// Timestamps are milliseconds on any monotonic clock chosen by the host.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    long_press_ms: u64,
    press: Option<Press>,
}

impl GestureClassifier {
    pub fn new(long_press: Duration) -> Self {
        Self {
            long_press_ms: long_press.as_millis() as u64,
            press: None,
        }
    }

    /// True while a long press is in progress
    pub fn is_holding(&self) -> bool {
        self.press.is_some_and(|p| p.holding)
    }

    /// Finger down at `x` on a surface `width` wide
    ///
    /// A second press while one is active replaces it.
    pub fn press(&mut self, x: f32, width: f32, now_ms: u64) {
        self.press = Some(Press {
            side: TapSide::from_position(x, width),
            started_ms: now_ms,
            holding: false,
        });
    }

    /// Reports `LongPressStart` once the active press exceeds the threshold
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        let long_press_ms = self.long_press_ms;
        let press = self.press.as_mut()?;

        if !press.holding && now_ms.saturating_sub(press.started_ms) >= long_press_ms {
            press.holding = true;
            log::debug!("Long press started after {}ms", now_ms - press.started_ms);
            return Some(Gesture::LongPressStart);
        }

        None
    }

    /// Finger up
    ///
    /// Ends a long press, or yields a tap if released before the threshold.
    /// A press that outlived the threshold without being polled produces
    /// nothing: the pause it implied was never delivered.
    pub fn release(&mut self, now_ms: u64) -> Option<Gesture> {
        let press = self.press.take()?;

        if press.holding {
            return Some(Gesture::LongPressEnd);
        }

        if now_ms.saturating_sub(press.started_ms) < self.long_press_ms {
            let gesture = Gesture::from(press.side);
            log::debug!("Classified tap as {:?}", gesture);
            Some(gesture)
        } else {
            None
        }
    }

    /// Drops the active press (e.g. the surface lost focus)
    pub fn cancel(&mut self) -> Option<Gesture> {
        match self.press.take() {
            Some(press) if press.holding => Some(Gesture::LongPressEnd),
            _ => None,
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LONG_PRESS)
    }
}
