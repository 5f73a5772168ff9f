//! Story Engine - ephemeral story playback for UniVibe

mod config;
mod controller;
mod error;
mod gesture;
mod session;
mod types;

pub use config::{PlaybackConfig, DEFAULT_LONG_PRESS, DEFAULT_STORY_DURATION, DEFAULT_TICK_INTERVAL};
pub use controller::StoryPlaybackController;
pub use error::{EngineError, EngineResult, InvalidSessionError};
pub use gesture::{Gesture, GestureClassifier, TapSide};
pub use session::PlaybackSession;
pub use types::{PlaybackEvent, RenderState, SessionPhase, Transition};
