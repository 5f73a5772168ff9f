// FILE: crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use story_engine::{PlaybackConfig, PlaybackEvent, StoryPlaybackController, Transition};
use univibe_config::{
    Config, ConfigManager, FileKeyValueStore, StoryConfig, ThemeMode, ThemeRecord,
    ThemeStorageManager,
};
use univibe_core::{StaticCatalog, StoryCatalog, StoryId, Timestamp};

/// Open the interactive viewer
pub async fn view(manager: &ConfigManager, config: &Config, matches: &ArgMatches) -> Result<()> {
    let path = catalog_path(config, matches);
    let mut catalog = load_catalog(path.as_deref(), Timestamp::now())?;
    let controller = start_session(&catalog, &config.story, start_index(matches))?;
    let theme = theme_storage(manager).mode();

    let viewed = crate::player::run_viewer(controller, theme).await?;

    finish_session(
        &mut catalog,
        &viewed,
        path.as_deref(),
        matches.get_flag("persist-viewed"),
    )
}

/// Play a session headlessly with fixed synthetic ticks
pub fn simulate(config: &Config, matches: &ArgMatches) -> Result<()> {
    let path = catalog_path(config, matches);
    let mut catalog = load_catalog(path.as_deref(), Timestamp::now())?;
    let mut controller = start_session(&catalog, &config.story, start_index(matches))?;

    let tick = matches
        .get_one::<u64>("tick-ms")
        .map(|ms| Duration::from_millis(*ms))
        .unwrap_or_else(|| config.story.tick_interval());
    let json = matches.get_flag("json");

    let mut stdout = std::io::stdout().lock();
    let summary = run_simulation(&mut controller, tick, json, &mut stdout)?;

    if !json {
        println!(
            "\n{} ticks, {:.1}s of playback, {} story changes",
            summary.ticks,
            summary.elapsed.as_secs_f64(),
            summary.story_changes
        );
    }

    finish_session(
        &mut catalog,
        &controller.viewed_story_ids(),
        path.as_deref(),
        matches.get_flag("persist-viewed"),
    )
}

/// List story groups with unviewed badges
pub fn list_catalog(config: &Config, matches: &ArgMatches) -> Result<()> {
    let now = Timestamp::now();
    let catalog = load_catalog(catalog_path(config, matches).as_deref(), now)?;

    if catalog.groups().is_empty() {
        println!("No stories yet. Point --catalog at a story file to get started.");
        return Ok(());
    }

    let active = catalog.active_groups(now);
    println!(
        "\n{} Story Groups ({} unviewed)",
        style(active.len()).bold().cyan(),
        style(active.iter().filter(|g| g.has_unviewed()).count()).yellow()
    );
    println!("{}", "=".repeat(60));

    for line in catalog_lines(&catalog, now) {
        println!("{}", line);
    }

    Ok(())
}

/// `theme get|set|clear`
pub fn theme(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let mut storage = theme_storage(manager);

    match matches.subcommand() {
        Some(("set", sub_matches)) => {
            let mode: ThemeMode = sub_matches
                .get_one::<String>("mode")
                .ok_or_else(|| anyhow::anyhow!("Theme mode is required"))?
                .parse()?;

            let mut record = ThemeRecord::new(mode);
            if let Some(accent) = sub_matches.get_one::<String>("accent") {
                record = record.with_accent(parse_accent(accent)?);
            }

            storage.save(&record).context("Failed to save theme")?;
            println!("{} Theme set to {}", style("✓").green().bold(), mode);
        }
        Some(("clear", _)) => {
            storage.clear().context("Failed to clear theme")?;
            println!("Theme preference cleared (using system)");
        }
        _ => match storage.load() {
            Some(record) => {
                print!("{}", record.mode);
                if let Some(accent) = &record.accent_color {
                    print!(" (accent {})", accent);
                }
                println!();
            }
            None => println!("{} (default)", ThemeMode::default()),
        },
    }

    Ok(())
}

/// `config show|path|reset`
pub fn config(manager: &ConfigManager, config: &Config, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("path", _)) => {
            println!("Config:      {}", manager.config_path().display());
            println!("Preferences: {}", manager.preferences_path().display());
        }
        Some(("reset", _)) => {
            manager.reset().context("Failed to reset configuration")?;
            println!(
                "{} Configuration reset at {}",
                style("✓").green().bold(),
                manager.config_path().display()
            );
        }
        _ => {
            let rendered =
                toml::to_string_pretty(config).context("Failed to render configuration")?;
            print!("{}", rendered);

            if let Err(errors) = config.validate() {
                for error in errors {
                    eprintln!("{} {}", style("warning:").yellow(), error);
                }
            }
        }
    }

    Ok(())
}

/// Outcome of a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SimulationSummary {
    pub ticks: u64,
    pub elapsed: Duration,
    pub story_changes: usize,
}

/// Ticks `controller` until the session ends, reporting every event to `out`
pub(crate) fn run_simulation<W: Write>(
    controller: &mut StoryPlaybackController,
    tick: Duration,
    json: bool,
    out: &mut W,
) -> Result<SimulationSummary> {
    if tick.is_zero() {
        bail!("Tick length must be greater than zero");
    }

    let mut summary = SimulationSummary {
        ticks: 0,
        elapsed: Duration::ZERO,
        story_changes: 0,
    };

    report_events(controller, summary.elapsed, json, out)?;

    while !controller.is_ended() {
        let transition = controller.tick(tick);
        summary.ticks += 1;
        summary.elapsed += tick;

        if matches!(
            transition,
            Transition::StoryChanged | Transition::GroupChanged
        ) {
            summary.story_changes += 1;
        }

        report_events(controller, summary.elapsed, json, out)?;
    }

    log::debug!("Simulation finished: {:?}", summary);
    Ok(summary)
}

fn report_events<W: Write>(
    controller: &mut StoryPlaybackController,
    at: Duration,
    json: bool,
    out: &mut W,
) -> Result<()> {
    for event in controller.take_events() {
        if json {
            let line = serde_json::to_string(&event).context("Failed to encode event")?;
            writeln!(out, "{}", line)?;
            continue;
        }

        let stamp = format!("[{:>7}ms]", at.as_millis());
        match event {
            PlaybackEvent::StoryChanged {
                group_index,
                story_index,
            } => {
                let group = &controller.groups()[group_index];
                writeln!(
                    out,
                    "{} ▶ {} {}/{}",
                    stamp,
                    group.author.display_name,
                    story_index + 1,
                    group.len()
                )?;
            }
            PlaybackEvent::StoryViewed(id) => writeln!(out, "{}   viewed {}", stamp, id)?,
            PlaybackEvent::Paused => writeln!(out, "{} ❚❚ paused", stamp)?,
            PlaybackEvent::Resumed => writeln!(out, "{} ▶ resumed", stamp)?,
            PlaybackEvent::SessionEnded => writeln!(out, "{} ■ session ended", stamp)?,
        }
    }
    Ok(())
}

/// Catalog file from the command line, else from config
fn catalog_path(config: &Config, matches: &ArgMatches) -> Option<PathBuf> {
    matches
        .get_one::<String>("catalog")
        .map(PathBuf::from)
        .or_else(|| config.app.catalog_path.clone())
}

pub(crate) fn load_catalog(path: Option<&Path>, now: Timestamp) -> Result<StaticCatalog> {
    match path {
        Some(path) => StaticCatalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => {
            log::info!("No catalog configured, using sample stories");
            Ok(StaticCatalog::sample(now))
        }
    }
}

pub(crate) fn playback_config(story: &StoryConfig) -> Result<PlaybackConfig> {
    let config = PlaybackConfig::new(story.story_duration())
        .context("Invalid story duration")?
        .with_tick_interval(story.tick_interval())
        .with_long_press(story.long_press());
    config.validate().context("Invalid story timing")?;
    Ok(config)
}

fn start_index(matches: &ArgMatches) -> usize {
    matches.get_one::<usize>("start").copied().unwrap_or(0)
}

/// Opens `start` within the unexpired groups, the same numbering `catalog` prints
pub(crate) fn start_session(
    catalog: &StaticCatalog,
    story: &StoryConfig,
    start: usize,
) -> Result<StoryPlaybackController> {
    let groups = catalog.active_groups(Timestamp::now());
    if groups.is_empty() {
        bail!("No active stories to show");
    }

    StoryPlaybackController::start_with_config(groups, start, playback_config(story)?)
        .context("Failed to start story session")
}

/// One line per group; only unexpired groups get a `--start` index
pub(crate) fn catalog_lines(catalog: &StaticCatalog, now: Timestamp) -> Vec<String> {
    let mut next_index = 0;
    catalog
        .groups()
        .iter()
        .map(|group| match group.without_expired(now) {
            Some(live) => {
                let line = group_line(next_index, &live, now);
                next_index += 1;
                line
            }
            None => style(format!("   -  {} (expired)", group.author.display_name))
                .dim()
                .to_string(),
        })
        .collect()
}

/// Folds viewed flags back into the catalog and optionally persists them
pub(crate) fn finish_session(
    catalog: &mut StaticCatalog,
    viewed: &[StoryId],
    path: Option<&Path>,
    persist: bool,
) -> Result<()> {
    let newly_viewed = catalog.record_viewed(viewed);

    if persist {
        match path {
            Some(path) => {
                let json = catalog.to_json().context("Failed to encode catalog")?;
                write_atomic(path, &json)
                    .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
                log::info!("Saved viewed flags to {}", path.display());
            }
            None => log::warn!("--persist-viewed has no effect on the sample catalog"),
        }
    }

    println!(
        "{} new stories viewed, {} groups still unviewed",
        newly_viewed,
        catalog.unviewed_group_count()
    );
    Ok(())
}

/// Replaces `path` through a sibling temp file so a failed write leaves the old catalog
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn theme_storage(manager: &ConfigManager) -> ThemeStorageManager<FileKeyValueStore> {
    ThemeStorageManager::new(FileKeyValueStore::new(manager.preferences_path()))
}

fn parse_accent(accent: &str) -> Result<String> {
    let hex = accent.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Accent colour must look like #RRGGBB, got '{}'", accent);
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

fn group_line(index: usize, group: &univibe_core::StoryGroup, now: Timestamp) -> String {
    let badge = if group.has_unviewed() {
        style("●").magenta().bold().to_string()
    } else {
        style("○").dim().to_string()
    };
    let newest = group
        .stories
        .iter()
        .map(|s| s.age(now))
        .min()
        .map(|age| age.as_relative())
        .unwrap_or_default();

    format!(
        "  {:>2}  {} {}  {} {}  {}",
        index,
        badge,
        style(&group.author.display_name).bold(),
        group.len(),
        if group.len() == 1 { "story" } else { "stories" },
        style(format!("{} ago", newest)).dim()
    )
}
