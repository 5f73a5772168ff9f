// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use univibe_config::ConfigManager;

mod commands;
mod player;

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .short('c')
        .long("catalog")
        .value_name("FILE")
        .help("Story catalog JSON file (defaults to the built-in sample)")
}

fn start_arg() -> Arg {
    Arg::new("start")
        .short('s')
        .long("start")
        .value_name("INDEX")
        .help("Index of the story group to open")
        .value_parser(clap::value_parser!(usize))
        .default_value("0")
}

fn persist_arg() -> Arg {
    Arg::new("persist-viewed")
        .long("persist-viewed")
        .help("Write viewed flags back to the catalog file after the session")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("univibe")
        .version("0.1.0")
        .author("UniVibe Team")
        .about("Ephemeral campus stories in your terminal")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml and preferences.json")
                .global(true),
        )
        .subcommand(
            Command::new("view")
                .about("Open the interactive story viewer")
                .arg(catalog_arg())
                .arg(start_arg())
                .arg(persist_arg()),
        )
        .subcommand(
            Command::new("simulate")
                .about("Play a session headlessly with synthetic ticks")
                .arg(catalog_arg())
                .arg(start_arg())
                .arg(persist_arg())
                .arg(
                    Arg::new("tick-ms")
                        .short('t')
                        .long("tick-ms")
                        .value_name("MS")
                        .help("Synthetic tick length (defaults to the configured tick interval)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print playback events as JSON lines")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("catalog")
                .about("List story groups and their unviewed badges")
                .arg(catalog_arg()),
        )
        .subcommand(
            Command::new("theme")
                .about("Show or change the viewer theme")
                .subcommand(Command::new("get").about("Print the stored theme"))
                .subcommand(
                    Command::new("set")
                        .about("Store a new theme")
                        .arg(
                            Arg::new("mode")
                                .required(true)
                                .value_name("MODE")
                                .value_parser(["light", "dark", "system"]),
                        )
                        .arg(
                            Arg::new("accent")
                                .long("accent")
                                .value_name("#RRGGBB")
                                .help("Accent colour"),
                        ),
                )
                .subcommand(Command::new("clear").about("Forget the stored theme")),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or reset configuration")
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print config file locations"))
                .subcommand(Command::new("reset").about("Restore default configuration")),
        )
}

fn config_manager(matches: &clap::ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<String>("config-dir") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir)),
        None => ConfigManager::new(),
    }
    .context("Failed to locate configuration directory")
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;
    let loaded = manager.load_with_env_overrides();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();

    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}, using defaults", e);
    }

    match matches.subcommand() {
        Some(("view", sub_matches)) => commands::view(&manager, &config, sub_matches).await,
        Some(("simulate", sub_matches)) => commands::simulate(&config, sub_matches),
        Some(("catalog", sub_matches)) => commands::list_catalog(&config, sub_matches),
        Some(("theme", sub_matches)) => commands::theme(&manager, sub_matches),
        Some(("config", sub_matches)) => commands::config(&manager, &config, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_simulate_args() {
        let matches = build_cli()
            .try_get_matches_from(["univibe", "simulate", "--start", "2", "--tick-ms", "100"])
            .expect("valid arguments");
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "simulate");
        assert_eq!(sub.get_one::<usize>("start"), Some(&2));
        assert_eq!(sub.get_one::<u64>("tick-ms"), Some(&100));
        assert!(!sub.get_flag("json"));
    }

    #[test]
    fn test_theme_set_rejects_unknown_mode() {
        let result = build_cli().try_get_matches_from(["univibe", "theme", "set", "neon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_dir() {
        let matches = build_cli()
            .try_get_matches_from(["univibe", "config", "path", "--config-dir", "/tmp/uv"])
            .expect("valid arguments");
        assert_eq!(
            matches.get_one::<String>("config-dir").map(String::as_str),
            Some("/tmp/uv")
        );
    }

    #[test]
    fn test_tick_ms_must_be_positive() {
        let result = build_cli().try_get_matches_from(["univibe", "simulate", "--tick-ms", "0"]);
        assert!(result.is_err());
    }
}
