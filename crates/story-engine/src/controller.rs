//! Story playback controller
//!
//! Owns one [`PlaybackSession`] and turns ticks and gestures into state
//! transitions. All operations are synchronous and never block; the host
//! drives time by calling [`StoryPlaybackController::tick`] from its own
//! render or timer loop.

use crate::config::PlaybackConfig;
use crate::error::EngineResult;
use crate::gesture::{Gesture, TapSide};
use crate::session::{PlaybackSession, Step};
use crate::types::{PlaybackEvent, RenderState, SessionPhase, Transition};
use std::time::Duration;
use univibe_core::{Story, StoryGroup, StoryId};

#[derive(Debug)]
pub struct StoryPlaybackController {
    session: PlaybackSession,
    config: PlaybackConfig,
    events: Vec<PlaybackEvent>,
}

impl StoryPlaybackController {
    /// Starts a session at the first story of group `start_index` with the
    /// default timing
    pub fn start(groups: Vec<StoryGroup>, start_index: usize) -> EngineResult<Self> {
        Self::start_with_config(groups, start_index, PlaybackConfig::default())
    }

    pub fn start_with_config(
        groups: Vec<StoryGroup>,
        start_index: usize,
        config: PlaybackConfig,
    ) -> EngineResult<Self> {
        let session = PlaybackSession::new(groups, start_index).map_err(|e| {
            log::warn!("Refusing to start story session: {}", e);
            e
        })?;
        Self::new(session, config)
    }

    /// Wraps an already validated session
    pub fn new(session: PlaybackSession, config: PlaybackConfig) -> EngineResult<Self> {
        config.validate()?;

        let mut controller = Self {
            session,
            config,
            events: Vec::new(),
        };

        log::info!(
            "Story session started at group {} of {} ({} stories)",
            controller.session.group_index(),
            controller.session.groups().len(),
            controller.session.total_stories()
        );
        controller.enter_current_story();
        Ok(controller)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        if self.session.is_ended() {
            SessionPhase::Ended
        } else {
            SessionPhase::Active {
                paused: self.session.is_paused(),
            }
        }
    }

    pub fn is_ended(&self) -> bool {
        self.session.is_ended()
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    pub fn current_group(&self) -> &StoryGroup {
        self.session.current_group()
    }

    pub fn current_story(&self) -> &Story {
        self.session.current_story()
    }

    /// Display time of the current story, honouring its own override
    pub fn current_story_duration(&self) -> Duration {
        self.current_story()
            .display_duration
            .filter(|d| !d.is_zero())
            .map(Duration::from)
            .unwrap_or(self.config.story_duration)
    }

    pub fn progress_fraction(&self) -> f32 {
        self.session
            .progress_fraction(self.current_story_duration())
    }

    /// Snapshot for rendering; no side effects
    pub fn current_state(&self) -> RenderState<'_> {
        RenderState {
            group: self.session.current_group(),
            story: self.session.current_story(),
            group_index: self.session.group_index(),
            story_index: self.session.story_index(),
            progress_fraction: self.progress_fraction(),
            is_paused: self.session.is_paused(),
            phase: self.phase(),
        }
    }

    /// Per-story progress bars for the current group: finished stories are
    /// full, the current one shows its progress, later ones are empty
    pub fn progress_bars(&self) -> Vec<f32> {
        let current = self.session.story_index();
        let progress = self.progress_fraction();

        (0..self.current_group().len())
            .map(|i| match i.cmp(&current) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => progress,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Advances the auto-advance timer by `elapsed`
    ///
    /// No-op while paused or after the session ended. When the current story
    /// has been shown for its full duration the controller advances; any
    /// excess time is discarded rather than carried into the next story.
    pub fn tick(&mut self, elapsed: Duration) -> Transition {
        if self.session.is_ended() || self.session.is_paused() {
            return Transition::Unchanged;
        }

        self.session.add_elapsed(elapsed);

        if self.session.elapsed() >= self.current_story_duration() {
            self.advance()
        } else if elapsed.is_zero() {
            Transition::Unchanged
        } else {
            Transition::Progressed
        }
    }

    /// Moves to the next story, the next group, or ends the session
    pub fn advance(&mut self) -> Transition {
        if self.session.is_ended() {
            return Transition::Unchanged;
        }

        match self.session.step_forward() {
            Step::Story => {
                self.enter_current_story();
                Transition::StoryChanged
            }
            Step::Group => {
                self.enter_current_story();
                Transition::GroupChanged
            }
            Step::Boundary => {
                self.session.end();
                self.events.push(PlaybackEvent::SessionEnded);
                log::info!("Story session ended after the last story");
                Transition::Ended
            }
        }
    }

    /// Moves to the previous story; a no-op on the very first story
    pub fn retreat(&mut self) -> Transition {
        if self.session.is_ended() {
            return Transition::Unchanged;
        }

        match self.session.step_back() {
            Step::Story => {
                self.enter_current_story();
                Transition::StoryChanged
            }
            Step::Group => {
                self.enter_current_story();
                Transition::GroupChanged
            }
            Step::Boundary => {
                log::debug!("Retreat ignored at the first story");
                Transition::Unchanged
            }
        }
    }

    /// A tap always resumes, then navigates
    pub fn handle_tap(&mut self, side: TapSide) -> Transition {
        if self.session.is_ended() {
            return Transition::Unchanged;
        }

        self.resume();

        match side {
            TapSide::Left => self.retreat(),
            TapSide::Right => self.advance(),
        }
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> Transition {
        match gesture {
            Gesture::TapLeft => self.handle_tap(TapSide::Left),
            Gesture::TapRight => self.handle_tap(TapSide::Right),
            Gesture::LongPressStart => {
                self.pause();
                Transition::Unchanged
            }
            Gesture::LongPressEnd => {
                self.resume();
                Transition::Unchanged
            }
        }
    }

    pub fn pause(&mut self) {
        if self.session.is_ended() || self.session.is_paused() {
            return;
        }
        self.session.set_paused(true);
        self.events.push(PlaybackEvent::Paused);
        log::debug!("Story playback paused");
    }

    pub fn resume(&mut self) {
        if self.session.is_ended() || !self.session.is_paused() {
            return;
        }
        self.session.set_paused(false);
        self.events.push(PlaybackEvent::Resumed);
        log::debug!("Story playback resumed");
    }

    /// Drains the events queued since the last call
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Identifiers of every story in the session that is marked viewed
    pub fn viewed_story_ids(&self) -> Vec<StoryId> {
        self.session
            .groups()
            .iter()
            .flat_map(|g| g.stories.iter())
            .filter(|s| s.viewed)
            .map(|s| s.id)
            .collect()
    }

    pub fn groups(&self) -> &[StoryGroup] {
        self.session.groups()
    }

    /// Ends the controller and hands the groups, with updated viewed flags,
    /// back to the caller
    pub fn into_groups(self) -> Vec<StoryGroup> {
        self.session.into_groups()
    }

    fn enter_current_story(&mut self) {
        let group_index = self.session.group_index();
        let story_index = self.session.story_index();

        self.events.push(PlaybackEvent::StoryChanged {
            group_index,
            story_index,
        });

        let story = self.session.current_story_mut();
        if story.mark_viewed() {
            let id = story.id;
            self.events.push(PlaybackEvent::StoryViewed(id));
        }

        log::debug!("Showing story ({}, {})", group_index, story_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, InvalidSessionError};
    use univibe_core::{Timestamp, UserRef};

    fn group(name: &str, count: usize) -> StoryGroup {
        let author = UserRef::new(name);
        let stories = (0..count)
            .map(|i| {
                Story::new(
                    author.clone(),
                    format!("{}/{}.jpg", name, i),
                    Timestamp::from_millis(0),
                )
            })
            .collect();
        StoryGroup::new(author, stories).unwrap()
    }

    fn scenario_groups() -> Vec<StoryGroup> {
        vec![group("a", 2), group("b", 1)]
    }

    fn position(controller: &StoryPlaybackController) -> (usize, usize) {
        controller.current_state().position()
    }

    #[test]
    fn test_start_marks_first_story_viewed() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        assert!(controller.current_story().viewed);
        assert!(!controller.groups()[0].stories[1].viewed);

        let events = controller.take_events();
        assert_eq!(
            events[0],
            PlaybackEvent::StoryChanged {
                group_index: 0,
                story_index: 0
            }
        );
        assert!(matches!(events[1], PlaybackEvent::StoryViewed(_)));
    }

    #[test]
    fn test_start_with_invalid_config() {
        let config = PlaybackConfig {
            story_duration: Duration::ZERO,
            ..PlaybackConfig::default()
        };
        let result = StoryPlaybackController::start_with_config(scenario_groups(), 0, config);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_empty_catalog() {
        let result = StoryPlaybackController::start(Vec::new(), 0);
        assert!(matches!(
            result,
            Err(EngineError::InvalidSession(InvalidSessionError::EmptyCatalog))
        ));
    }

    #[test]
    fn test_tick_returns_progressed() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        assert_eq!(controller.tick(Duration::from_millis(50)), Transition::Progressed);
        assert_eq!(controller.tick(Duration::ZERO), Transition::Unchanged);
    }

    #[test]
    fn test_tick_discards_overshoot() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        assert_eq!(
            controller.tick(Duration::from_millis(10_000)),
            Transition::StoryChanged
        );
        assert_eq!(position(&controller), (0, 1));
        assert_eq!(controller.progress_fraction(), 0.0);
    }

    #[test]
    fn test_display_duration_override() {
        let mut groups = scenario_groups();
        groups[0].stories[0].display_duration = Some(univibe_core::Duration::from_millis(6000));
        let mut controller = StoryPlaybackController::start(groups, 0).unwrap();

        assert_eq!(controller.current_story_duration(), Duration::from_millis(6000));
        controller.tick(Duration::from_millis(3000));
        assert_eq!(position(&controller), (0, 0));
        assert_eq!(controller.progress_fraction(), 0.5);

        controller.tick(Duration::from_millis(3000));
        assert_eq!(position(&controller), (0, 1));
        assert_eq!(controller.current_story_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_zero_override_falls_back_to_default() {
        let mut groups = scenario_groups();
        groups[0].stories[0].display_duration = Some(univibe_core::Duration::ZERO);
        let controller = StoryPlaybackController::start(groups, 0).unwrap();
        assert_eq!(controller.current_story_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_progress_bars() {
        let mut controller = StoryPlaybackController::start(vec![group("a", 3)], 0).unwrap();
        controller.advance();
        controller.tick(Duration::from_millis(750));

        assert_eq!(controller.progress_bars(), vec![1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_pause_and_resume_events_are_not_duplicated() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        controller.take_events();

        controller.pause();
        controller.pause();
        controller.resume();
        controller.resume();

        assert_eq!(
            controller.take_events(),
            vec![PlaybackEvent::Paused, PlaybackEvent::Resumed]
        );
    }

    #[test]
    fn test_tap_resumes_before_navigating() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        controller.pause();
        controller.take_events();

        assert_eq!(controller.handle_tap(TapSide::Left), Transition::Unchanged);
        assert!(!controller.is_paused());
        assert_eq!(controller.take_events(), vec![PlaybackEvent::Resumed]);
    }

    #[test]
    fn test_long_press_gestures_pause_and_resume() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        controller.handle_gesture(Gesture::LongPressStart);
        assert_eq!(controller.phase(), SessionPhase::Active { paused: true });

        controller.handle_gesture(Gesture::LongPressEnd);
        assert_eq!(controller.phase(), SessionPhase::Active { paused: false });
    }

    #[test]
    fn test_ended_session_ignores_everything() {
        let mut controller = StoryPlaybackController::start(vec![group("a", 1)], 0).unwrap();
        assert_eq!(controller.advance(), Transition::Ended);
        controller.take_events();

        assert_eq!(controller.advance(), Transition::Unchanged);
        assert_eq!(controller.retreat(), Transition::Unchanged);
        assert_eq!(controller.tick(Duration::from_secs(10)), Transition::Unchanged);
        assert_eq!(controller.handle_tap(TapSide::Right), Transition::Unchanged);
        controller.pause();
        controller.resume();

        assert_eq!(controller.phase(), SessionPhase::Ended);
        assert!(controller.take_events().is_empty());
    }

    #[test]
    fn test_into_groups_returns_viewed_flags() {
        let mut controller = StoryPlaybackController::start(scenario_groups(), 0).unwrap();
        controller.advance();

        assert_eq!(controller.viewed_story_ids().len(), 2);
        let groups = controller.into_groups();
        assert!(groups[0].stories.iter().all(|s| s.viewed));
        assert!(!groups[1].stories[0].viewed);
    }
}
