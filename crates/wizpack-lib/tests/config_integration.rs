use clap::Parser;
use wizpack_lib::application::cli::{Cli, CliConfig, Commands};
use wizpack_lib::application::config::AppConfig;
use wizpack_lib::primitives::{ColorIntent, LogFormat};

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert_eq!(config.packwiz, "packwiz");
    assert_eq!(config.color, ColorIntent::Auto);
    assert_eq!(config.workdir, None);
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig::default();
    let override_config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.color, ColorIntent::Never);
    assert_eq!(merged.packwiz, "packwiz");
}

#[test]
fn test_cli_config_resolves_workdir_and_command() {
    let cli = Cli::try_parse_from([
        "wizpack",
        "--workdir",
        "/packs/demo",
        "--packwiz",
        "/opt/bin/packwiz",
        "list",
        "--resource-packs",
    ])
    .unwrap();

    let config = CliConfig::from_cli(cli).unwrap();

    assert_eq!(config.app_config.workdir, Some("/packs/demo".into()));
    assert_eq!(config.app_config.packwiz, "/opt/bin/packwiz");
    assert!(matches!(
        config.command,
        Some(Commands::List {
            resource_packs: true,
            other: false
        })
    ));
}
