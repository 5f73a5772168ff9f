//! Property-style tests for the configuration system

use univibe_config::{
    Config, ConfigManager, ConfigSection, MemoryKeyValueStore, StoryConfig, ThemeMode, ThemeRecord,
    ThemeSerializer, ThemeStorageManager,
};
use tempfile::TempDir;

#[test]
fn property_serialization_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let toml_string = toml::to_string(&config)?;
    let deserialized: Config = toml::from_str(&toml_string)?;
    assert_eq!(config, deserialized);
    Ok(())
}

#[test]
fn property_load_save_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;

    manager.save(&Config::default())?;
    let loaded = manager.load()?;
    manager.save(&loaded)?;
    let loaded2 = manager.load()?;
    assert_eq!(loaded, loaded2);
    Ok(())
}

#[test]
fn property_validation_deterministic() {
    let mut config = Config::default();
    config.story.long_press_ms = 0;

    let e1 = config.validate().unwrap_err();
    let e2 = config.validate().unwrap_err();
    assert_eq!(e1, e2);
}

#[test]
fn property_merge_preserves_validity() {
    let mut base = Config::default();
    base.merge(Config::default());
    assert!(base.validate().is_ok());
}

#[test]
fn property_duration_range_is_exact() {
    let (min, max) = StoryConfig::STORY_DURATION_RANGE;

    for ms in [min - 1, min, min + 1, 3_000, max - 1, max, max + 1] {
        let config = StoryConfig {
            story_duration_ms: ms,
            tick_interval_ms: 10,
            ..StoryConfig::default()
        };
        let expected = (min..=max).contains(&ms);
        assert_eq!(config.validate().is_ok(), expected, "duration {} ms", ms);
    }
}

#[test]
fn property_tick_never_exceeds_duration() {
    for duration in [100u64, 250, 1_000] {
        for tick in [10u64, 99, 100, 250, 1_000] {
            let config = StoryConfig {
                story_duration_ms: duration,
                tick_interval_ms: tick,
                ..StoryConfig::default()
            };
            assert_eq!(config.validate().is_ok(), tick <= duration);
        }
    }
}

#[test]
fn property_every_theme_mode_persists() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = ThemeStorageManager::new(MemoryKeyValueStore::new());

    for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System] {
        let record = ThemeRecord::new(mode);
        manager.save(&record)?;
        assert_eq!(manager.load(), Some(record.clone()));

        let encoded = ThemeSerializer::encode(&record)?;
        assert_eq!(mode.to_string().parse::<ThemeMode>()?, mode);
        assert!(encoded.contains(&mode.to_string()));
    }

    Ok(())
}
