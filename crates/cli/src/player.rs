use anyhow::{Context, Result};
use console::{style, Key, Style, Term};
use story_engine::{Gesture, StoryPlaybackController, TapSide, Transition};
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use univibe_config::ThemeMode;
use univibe_core::{StoryId, Timestamp};

const BAR_WIDTH: usize = 48;

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewerCommand {
    Tap(TapSide),
    ToggleHold,
    Quit,
}

pub(crate) fn command_for_key(key: &Key) -> Option<ViewerCommand> {
    match key {
        Key::ArrowLeft | Key::Char('h') => Some(ViewerCommand::Tap(TapSide::Left)),
        Key::ArrowRight | Key::Char('l') => Some(ViewerCommand::Tap(TapSide::Right)),
        Key::Char(' ') => Some(ViewerCommand::ToggleHold),
        Key::Char('q') | Key::Escape => Some(ViewerCommand::Quit),
        _ => None,
    }
}

/// Applies a command; returns `false` when the viewer should close
pub(crate) fn apply_command(
    controller: &mut StoryPlaybackController,
    command: ViewerCommand,
) -> bool {
    match command {
        ViewerCommand::Tap(side) => {
            controller.handle_tap(side);
        }
        ViewerCommand::ToggleHold => {
            // Space stands in for a finger held on the story.
            let gesture = if controller.is_paused() {
                Gesture::LongPressEnd
            } else {
                Gesture::LongPressStart
            };
            controller.handle_gesture(gesture);
        }
        ViewerCommand::Quit => return false,
    }
    !controller.is_ended()
}

/// Runs the interactive viewer until the session ends or the user quits.
///
/// Returns the ids of every story marked viewed during the session.
pub async fn run_viewer(
    mut controller: StoryPlaybackController,
    theme: ThemeMode,
) -> Result<Vec<StoryId>> {
    let term = Term::stdout();
    if term.hide_cursor().is_err() {
        log::warn!("Failed to hide cursor");
    }

    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let reader_term = term.clone();
    // Plain thread: a blocked read must not hold up runtime shutdown.
    std::thread::spawn(move || {
        while let Ok(key) = reader_term.read_key() {
            let quit = matches!(command_for_key(&key), Some(ViewerCommand::Quit));
            if key_tx.send(key).is_err() || quit {
                break;
            }
        }
    });

    let mut ticker = interval(controller.config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    let result = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let transition = controller.tick(now - last);
                last = now;
                if transition == Transition::Ended {
                    break Ok(());
                }
            }
            key = key_rx.recv() => {
                let Some(key) = key else { break Ok(()) };
                let Some(command) = command_for_key(&key) else { continue };
                if !apply_command(&mut controller, command) {
                    break Ok(());
                }
                // A new story starts from zero rather than the partial tick.
                last = Instant::now();
            }
        }

        for event in controller.take_events() {
            log::debug!("Viewer event: {:?}", event);
        }

        if let Err(e) = draw_story(&term, &controller, theme) {
            break Err(e);
        }
    };

    let _ = term.clear_screen();
    let _ = term.show_cursor();

    result?;
    Ok(controller.viewed_story_ids())
}

fn palette(theme: ThemeMode) -> (Style, Style) {
    match theme {
        ThemeMode::Light => (Style::new().blue().bold(), Style::new().black()),
        ThemeMode::Dark => (Style::new().cyan().bold(), Style::new().white()),
        ThemeMode::System => (Style::new().magenta().bold(), Style::new()),
    }
}

fn draw_story(
    term: &Term,
    controller: &StoryPlaybackController,
    theme: ThemeMode,
) -> Result<()> {
    let state = controller.current_state();
    let (accent, body) = palette(theme);

    term.clear_screen().context("Failed to clear screen")?;

    term.write_line(&render_bars(&controller.progress_bars(), BAR_WIDTH))
        .context("Failed to write progress bars")?;
    term.write_line("").context("Failed to write blank line")?;

    let age = state.story.age(Timestamp::now()).as_relative();
    term.write_line(&format!(
        "  {}  {}",
        accent.apply_to(&state.group.author.display_name),
        style(format!("{} ago", age)).dim()
    ))
    .context("Failed to write author")?;

    term.write_line(&format!(
        "  {}",
        body.apply_to(&state.story.image)
    ))
    .context("Failed to write story")?;

    term.write_line(&format!(
        "  Story {}/{} · Group {}/{}",
        state.story_index + 1,
        state.group.len(),
        state.group_index + 1,
        controller.groups().len()
    ))
    .context("Failed to write position")?;
    term.write_line("").context("Failed to write blank line")?;

    let status = if state.is_paused {
        style("Paused").yellow()
    } else {
        style("Playing").green()
    };
    term.write_line(&format!("  Status: {}", status))
        .context("Failed to write status")?;
    term.write_line("").context("Failed to write blank line")?;

    term.write_line("  Controls:")
        .context("Failed to write controls header")?;
    term.write_line("    ←/→     - Previous/next story")
        .context("Failed to write control")?;
    term.write_line("    Space   - Hold/release")
        .context("Failed to write control")?;
    term.write_line("    Q/Esc   - Close")
        .context("Failed to write control")?;

    Ok(())
}

/// One segment per story in the group, sharing `width` columns
pub(crate) fn render_bars(bars: &[f32], width: usize) -> String {
    if bars.is_empty() {
        return String::new();
    }

    let gaps = bars.len() - 1;
    let segment = (width.saturating_sub(gaps) / bars.len()).max(1);

    let rendered: Vec<String> = bars
        .iter()
        .map(|progress| {
            let filled = ((progress.clamp(0.0, 1.0) * segment as f32).round() as usize).min(segment);
            format!("{}{}", "━".repeat(filled), "─".repeat(segment - filled))
        })
        .collect();

    format!("  {}", rendered.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use univibe_core::{Story, StoryGroup, UserRef};

    fn controller() -> StoryPlaybackController {
        let groups = ["a", "b"]
            .iter()
            .map(|name| {
                let author = UserRef::new(*name);
                let stories = (0..2)
                    .map(|i| {
                        Story::new(author.clone(), format!("{}-{}.jpg", name, i), Timestamp::now())
                    })
                    .collect();
                StoryGroup::new(author, stories).expect("non-empty group")
            })
            .collect();
        StoryPlaybackController::start(groups, 0).expect("Failed to start")
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            command_for_key(&Key::ArrowLeft),
            Some(ViewerCommand::Tap(TapSide::Left))
        );
        assert_eq!(
            command_for_key(&Key::ArrowRight),
            Some(ViewerCommand::Tap(TapSide::Right))
        );
        assert_eq!(command_for_key(&Key::Char(' ')), Some(ViewerCommand::ToggleHold));
        assert_eq!(command_for_key(&Key::Escape), Some(ViewerCommand::Quit));
        assert_eq!(command_for_key(&Key::Char('x')), None);
    }

    #[test]
    fn test_space_toggles_hold() {
        let mut controller = controller();

        assert!(apply_command(&mut controller, ViewerCommand::ToggleHold));
        assert!(controller.is_paused());

        assert!(apply_command(&mut controller, ViewerCommand::ToggleHold));
        assert!(!controller.is_paused());
    }

    #[test]
    fn test_tap_while_held_resumes_and_navigates() {
        let mut controller = controller();
        apply_command(&mut controller, ViewerCommand::ToggleHold);

        assert!(apply_command(&mut controller, ViewerCommand::Tap(TapSide::Right)));
        assert!(!controller.is_paused());
        assert_eq!(controller.current_state().position(), (0, 1));
    }

    #[test]
    fn test_viewer_closes_at_end_or_quit() {
        let mut controller = controller();
        assert!(!apply_command(&mut controller, ViewerCommand::Quit));

        for _ in 0..3 {
            assert!(apply_command(&mut controller, ViewerCommand::Tap(TapSide::Right)));
        }
        assert!(!apply_command(&mut controller, ViewerCommand::Tap(TapSide::Right)));
        assert!(controller.is_ended());
    }

    #[test]
    fn test_render_bars() {
        assert_eq!(render_bars(&[], 10), "");
        assert_eq!(render_bars(&[1.0, 0.5, 0.0], 11), "  ━━━ ━━─ ───");
    }
}
