use crate::primitives::ColorIntent;
use std::path::PathBuf;

#[test]
fn test_environment_color_applies_below_cli() {
    let env_config = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let config = AppConfig::layer(&env_config, AppConfig::default()).unwrap();
    assert_eq!(config.color, ColorIntent::Never);

    let cli = AppConfig {
        color: ColorIntent::Always,
        ..AppConfig::default()
    };
    let config = AppConfig::layer(&env_config, cli).unwrap();
    assert_eq!(config.color, ColorIntent::Always);
}

#[test]
fn test_layer_validates_result() {
    let cli = AppConfig {
        workdir: Some(PathBuf::from("/packs/demo")),
        log_level: 2,
        ..AppConfig::default()
    };

    let config = AppConfig::layer(&EnvironmentConfig::default(), cli).unwrap();
    assert_eq!(config.workdir, Some(PathBuf::from("/packs/demo")));
    assert_eq!(config.log_level, 2);
    assert_eq!(config.packwiz, "packwiz");
}
