//! Command handlers driven through a hermetic session
#![cfg(unix)]

use anyhow::Result;
use std::fs;
use wizpack_lib::application::cli::{AddSource, Commands};
use wizpack_lib::application::commands::execute_command_with_session;
use wizpack_lib::wizpack::ModLoader;
use wizpack_tests::HermeticSessionBuilder;

#[tokio::test]
async fn init_creates_a_loadable_pack() -> Result<()> {
    let builder = HermeticSessionBuilder::new()?.with_packwiz_simulator()?;
    let pack_dir = builder.test_env().work_path.join("fresh");
    let (session, test_env) = builder.with_workdir(pack_dir.clone()).build()?;

    execute_command_with_session(
        Commands::Init {
            name: "Fresh".to_string(),
            author: "Tester".to_string(),
            pack_version: "0.1.0".to_string(),
            minecraft_version: "1.20.1".to_string(),
            modloader: ModLoader::Quilt,
        },
        &session,
    )
    .await?;

    let manifest: toml::Table = toml::from_str(&fs::read_to_string(pack_dir.join("pack.toml"))?)?;
    assert_eq!(manifest["name"].as_str(), Some("Fresh"));
    assert_eq!(manifest["versions"]["quilt"].as_str(), Some("0.15.0"));
    assert!(test_env.mock_calls("packwiz")?[0].starts_with("init --name Fresh"));

    execute_command_with_session(Commands::Info, &session).await?;
    Ok(())
}

#[tokio::test]
async fn add_and_set_version_update_files_on_disk() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;
    let root = test_env.work_path.join("demo");

    execute_command_with_session(
        Commands::Add {
            source: AddSource::Modrinth {
                query: "sodium".to_string(),
                project: None,
                version_id: None,
                version_filename: None,
            },
        },
        &session,
    )
    .await?;
    assert!(root.join("mods/sodium.pw.toml").exists());

    execute_command_with_session(
        Commands::SetVersion {
            pack_version: "1.1.0".to_string(),
        },
        &session,
    )
    .await?;

    let manifest: toml::Table = toml::from_str(&fs::read_to_string(root.join("pack.toml"))?)?;
    assert_eq!(manifest["version"].as_str(), Some("1.1.0"));
    assert_ne!(manifest["index"]["hash"].as_str(), Some(""));
    Ok(())
}

#[tokio::test]
async fn add_url_creates_url_metafile() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;

    execute_command_with_session(
        Commands::AddUrl {
            name: "custom".to_string(),
            url: "https://example.com/custom.jar".to_string(),
        },
        &session,
    )
    .await?;

    assert!(test_env.verify_mock_call(
        "packwiz",
        &["url", "add", "custom", "https://example.com/custom.jar"]
    )?);
    assert!(test_env.work_path.join("demo/mods/custom.pw.toml").exists());
    Ok(())
}

#[tokio::test]
async fn devpack_writes_multimc_instance() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;

    execute_command_with_session(Commands::Devpack, &session).await?;

    let instance = test_env.work_path.join("demo/devpack-1.20.1-Fabric-0.15.0");
    assert!(instance.join(".minecraft").is_dir());

    let mmc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(instance.join("mmc-pack.json"))?)?;
    assert_eq!(mmc["formatVersion"], 1);
    assert_eq!(mmc["components"][1]["uid"], "net.fabricmc.fabric-loader");
    assert_eq!(mmc["components"][1]["version"], "0.15.0");

    let cfg = fs::read_to_string(instance.join("instance.cfg"))?;
    assert!(cfg.contains("http://localhost:8080/pack.toml"));
    Ok(())
}
