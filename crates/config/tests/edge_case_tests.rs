//! Edge case and error scenario tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use univibe_config::{
    Config, ConfigError, ConfigManager, FileKeyValueStore, ThemeMode, ThemeRecord,
    ThemeStorageManager,
};

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_corrupted_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "this is not valid TOML {{{")?;

    assert!(matches!(manager.load(), Err(ConfigError::ParseError { .. })));
    assert_eq!(manager.load_or_default(), Config::default());

    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let nested_path = temp_dir.path().join("a").join("b").join("c");
    let manager = ConfigManager::with_directory(nested_path)?;

    manager.save(&Config::default())?;
    assert!(manager.config_path().exists());

    Ok(())
}

#[test]
fn test_concurrent_config_loads() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config_dir = temp_dir.path().to_path_buf();
    let manager = ConfigManager::with_directory(config_dir.clone())?;
    manager.initialize()?;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dir = config_dir.clone();
            std::thread::spawn(move || {
                let mgr = ConfigManager::with_directory(dir).expect("manager");
                for _ in 0..10 {
                    let config = mgr.load().expect("load should succeed");
                    assert_eq!(config.story.story_duration_ms, 3000);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    Ok(())
}

#[test]
fn test_boundary_values_validation() {
    let mut config = Config::default();

    config.story.story_duration_ms = 100;
    config.story.tick_interval_ms = 100;
    assert!(config.validate().is_ok());

    config.story.story_duration_ms = 60_000;
    config.story.tick_interval_ms = 1_000;
    config.story.long_press_ms = 2_000;
    assert!(config.validate().is_ok());

    config.story.long_press_ms = 99;
    assert!(config.validate().is_err());
}

#[test]
fn test_special_characters_in_catalog_path() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut config = Config::default();
    config.app.catalog_path = Some(PathBuf::from("/srv/ünï vibe/stories \"today\".json"));
    manager.save(&config)?;

    assert_eq!(manager.load()?, config);
    Ok(())
}

#[test]
fn test_rapid_saves() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    let mut config = Config::default();

    for i in 0..100u64 {
        config.story.story_duration_ms = 1_000 + i * 10;
        manager.save(&config)?;
    }

    assert_eq!(manager.load()?.story.story_duration_ms, 1_990);
    Ok(())
}

#[test]
fn test_config_file_deleted_during_operation() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    fs::remove_file(manager.config_path())?;

    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_empty_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "")?;

    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
    Ok(())
}

#[test]
fn test_partial_config_toml() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let partial_toml = r#"
version = 1

[story]
story_duration_ms = 8000
"#;
    fs::write(manager.config_path(), partial_toml)?;

    let config = manager.load()?;
    assert_eq!(config.story.story_duration_ms, 8000);
    assert_eq!(config.story.tick_interval_ms, 50);
    assert_eq!(config.app.catalog_path, None);

    Ok(())
}

#[test]
fn test_invalid_values_on_disk_still_load() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.config_path(), "[story]\ntick_interval_ms = 0\n")?;

    let config = manager.load()?;
    assert_eq!(config.story.tick_interval_ms, 0);

    let errors = manager.validate()?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("story.tick_interval_ms"));

    Ok(())
}

#[test]
fn test_update_with_invalid_value() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    let result = manager.update(|config| {
        config.story.story_duration_ms = 0;
    });
    assert!(result.is_err());

    let config = manager.load()?;
    assert_eq!(config.story.story_duration_ms, 3000);

    Ok(())
}

#[test]
fn test_backup_preserved_on_failed_save() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut config = Config::default();
    config.story.story_duration_ms = 4000;
    manager.save(&config)?;
    manager.save(&config)?;

    config.story.story_duration_ms = 1;
    assert!(manager.save(&config).is_err());

    let backup_path = manager.config_path().with_extension("toml.backup");
    let backup_config: Config = toml::from_str(&fs::read_to_string(&backup_path)?)?;
    assert_eq!(backup_config.story.story_duration_ms, 4000);
    assert_eq!(manager.load()?.story.story_duration_ms, 4000);

    Ok(())
}

#[test]
fn test_theme_survives_config_reset() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut themes = ThemeStorageManager::new(FileKeyValueStore::new(manager.preferences_path()));
    themes.save(&ThemeRecord::new(ThemeMode::Dark))?;

    manager.reset()?;

    let reopened = ThemeStorageManager::new(FileKeyValueStore::new(manager.preferences_path()));
    assert_eq!(reopened.mode(), ThemeMode::Dark);

    Ok(())
}

#[test]
fn test_truncated_preferences_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(manager.preferences_path(), "{\"univibe.theme\": \"{\\\"mode\\\"")?;

    let themes = ThemeStorageManager::new(FileKeyValueStore::new(manager.preferences_path()));
    assert_eq!(themes.load(), None);
    assert_eq!(themes.mode(), ThemeMode::System);

    Ok(())
}
