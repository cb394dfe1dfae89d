#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.workdir, None);
    assert_eq!(config.packwiz, "packwiz");
    assert_eq!(config.log_level, 0);
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.log_output, LogOutput::Stderr);
    assert_eq!(config.color, ColorIntent::Auto);
}

#[test]
fn test_merge_takes_non_default_values() {
    let base = AppConfig {
        packwiz: "/usr/local/bin/packwiz".to_string(),
        ..AppConfig::default()
    };
    let cli = AppConfig {
        workdir: Some(PathBuf::from("/packs/demo")),
        log_level: 3,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let merged = base.merge_with(cli);
    assert_eq!(merged.workdir, Some(PathBuf::from("/packs/demo")));
    assert_eq!(merged.packwiz, "/usr/local/bin/packwiz");
    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.color, ColorIntent::Never);
    assert_eq!(merged.log_format, LogFormat::Text);
}

#[test]
fn test_validate_resolves_workdir_and_relative_binary() {
    let cwd = std::env::current_dir().unwrap();
    let mut config = AppConfig {
        workdir: Some(PathBuf::from("pack")),
        packwiz: "./bin/packwiz".to_string(),
        ..AppConfig::default()
    };

    config.validate().unwrap();

    assert_eq!(config.workdir, Some(cwd.join("pack")));
    assert_eq!(PathBuf::from(&config.packwiz), cwd.join("./bin/packwiz"));
}

#[test]
fn test_validate_keeps_bare_binary_name() {
    let mut config = AppConfig::default();
    config.validate().unwrap();

    assert_eq!(config.packwiz, "packwiz");
    assert!(config.workdir.is_some());
}

#[test]
fn test_validate_rejects_empty_binary() {
    let mut config = AppConfig {
        packwiz: "  ".to_string(),
        ..AppConfig::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_logger_config_from_app_config() {
    let config = AppConfig {
        log_level: 2,
        log_format: LogFormat::Json,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Info);
    assert_eq!(logger.format, LogFormat::Json);
    assert!(!logger.ansi);
}

#[test]
fn test_deserialize_with_defaults() {
    let config: AppConfig = serde_json::from_str(r#"{"packwiz": "pw", "color": "always"}"#).unwrap();
    assert_eq!(config.packwiz, "pw");
    assert_eq!(config.color, ColorIntent::Always);
    assert_eq!(config.log_output, LogOutput::Stderr);
}
