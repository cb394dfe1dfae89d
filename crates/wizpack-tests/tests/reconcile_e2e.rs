//! Pack reconciliation against a real directory and a packwiz stand-in
#![cfg(unix)]

use anyhow::Result;
use std::fs;
use wizpack_lib::application::session::Session;
use wizpack_lib::wizpack::{AddRequest, MetaFile, Pack, PackError, PackwizError};
use wizpack_tests::{HermeticSessionBuilder, MockBehavior, fixtures};

const SODIUM: &str = "mods/sodium.pw.toml";
const LITHIUM: &str = "mods/lithium.pw.toml";

#[tokio::test]
async fn add_then_remove_round_trip() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;
    let mut pack = Pack::open(&session, session.workdir()?)?;
    assert!(pack.meta_files().is_empty());

    let report = pack.add(AddRequest::modrinth("sodium")).await?;
    assert_eq!(report.created, vec![SODIUM.to_string()]);
    assert!(report.updated.is_empty());
    assert_eq!(pack.mod_slugs(), vec!["sodium".to_string()]);
    assert!(matches!(pack.meta_files().get(SODIUM), Some(MetaFile::Modrinth(_))));

    let report = pack.remove("sodium").await?;
    assert_eq!(report.removed, vec![SODIUM.to_string()]);
    assert!(pack.meta_files().is_empty());

    assert!(test_env.verify_mock_call("packwiz", &["modrinth", "add", "sodium", "-y"])?);
    assert!(test_env.verify_mock_call("packwiz", &["remove", "sodium"])?);
    Ok(())
}

#[tokio::test]
async fn update_all_reports_changed_metafiles_only() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;
    let root = session.workdir()?;
    fs::create_dir_all(root.join("config"))?;
    fs::write(root.join("config/sodium.json"), "{}")?;

    let mut pack = Pack::open(&session, root.clone())?;
    pack.add(AddRequest::modrinth("sodium")).await?;
    pack.add(AddRequest::modrinth("lithium")).await?;
    assert!(pack.other_files().contains("config/sodium.json"));

    let report = pack.update_all().await?;
    assert!(report.created.is_empty());
    assert!(report.removed.is_empty());
    assert_eq!(report.updated, vec![LITHIUM.to_string(), SODIUM.to_string()]);

    match pack.meta_files().get(SODIUM) {
        Some(MetaFile::Modrinth(meta)) => assert_eq!(meta.update.version, "2.0.0"),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn refresh_picks_up_hand_written_files() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "quilt", "0.20.0")?
        .build()?;
    let root = session.workdir()?;
    let mut pack = Pack::open(&session, root.clone())?;

    fs::create_dir_all(root.join("mods"))?;
    fs::write(root.join(LITHIUM), fixtures::modrinth_metafile("lithium", "1.0.0"))?;
    fs::write(root.join("options.txt"), "fov:90")?;

    let report = pack.refresh().await?;
    assert_eq!(
        report.created,
        vec![LITHIUM.to_string(), "options.txt".to_string()]
    );
    assert_eq!(pack.mod_slugs(), vec!["lithium".to_string()]);

    let report = pack.refresh().await?;
    assert!(report.is_empty());

    let report = pack.remove("options.txt").await?;
    assert_eq!(report.removed, vec!["options.txt".to_string()]);
    assert!(!root.join("options.txt").exists());
    Ok(())
}

#[tokio::test]
async fn failed_add_keeps_mirror_and_surfaces_output() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_packwiz_simulator()?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;
    let mut pack = Pack::open(&session, session.workdir()?)?;
    pack.add(AddRequest::modrinth("sodium")).await?;
    let before = pack.index();

    let err = pack
        .add(AddRequest::modrinth("missing-mod"))
        .await
        .unwrap_err();

    match err {
        PackError::Packwiz(PackwizError::CommandFailed { stdout, .. }) => {
            assert!(stdout.contains("No projects found for missing-mod"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(pack.index(), before);
    Ok(())
}

#[tokio::test]
async fn missing_packwiz_is_reported_before_running() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable(
            "packwiz",
            MockBehavior::Script {
                body: "exit 127".to_string(),
            },
        )?
        .with_pack("demo", "1.20.1", "fabric", "0.15.0")?
        .build()?;
    let mut pack = Pack::open(&session, session.workdir()?)?;

    let err = pack.refresh().await.unwrap_err();
    assert!(matches!(err, PackError::Packwiz(PackwizError::NotAvailable(_))));
    assert!(test_env.mock_calls("packwiz")?.is_empty());
    Ok(())
}
