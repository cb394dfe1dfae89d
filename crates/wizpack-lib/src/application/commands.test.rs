use crate::application::session_mocks::{MockCommandSession, MockFileSystemProvider, MockProcessProvider};
use crate::application::AppConfig;
use std::path::PathBuf;

const PACK_TOML: &str = r#"name = "Command Pack"
author = "Someone"
version = "0.3.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = "abc"

[versions]
minecraft = "1.20.1"
fabric = "0.15.0"
"#;

const INDEX_TOML: &str = r#"hash-format = "sha256"

[[files]]
file = "mods/jei.pw.toml"
hash = "11"
metafile = true

[[files]]
file = "config/jei.cfg"
hash = "22"
"#;

const JEI_META: &str = r#"name = "Just Enough Items"
filename = "jei-15.2.0.jar"
side = "both"

[download]
url = "https://cdn.modrinth.com/data/u6dRKJwZ/versions/x/jei-15.2.0.jar"
hash-format = "sha512"
hash = "00"

[update.modrinth]
mod-id = "u6dRKJwZ"
version = "x"
"#;

fn pack_root() -> PathBuf {
    PathBuf::from("/test/pack")
}

fn seeded_filesystem() -> MockFileSystemProvider {
    MockFileSystemProvider::new()
        .with_file(pack_root().join("pack.toml"), PACK_TOML)
        .with_file(pack_root().join("index.toml"), INDEX_TOML)
        .with_file(pack_root().join("mods/jei.pw.toml"), JEI_META)
        .with_file(pack_root().join("config/jei.cfg"), "enabled=true")
}

fn session_with(fs: MockFileSystemProvider, process: MockProcessProvider) -> MockCommandSession {
    MockCommandSession::new()
        .with_filesystem(fs)
        .with_process(process)
        .with_config(AppConfig {
            workdir: Some(pack_root()),
            ..AppConfig::default()
        })
}

#[tokio::test]
async fn test_info_reads_manifest_from_workdir() {
    let fs = seeded_filesystem();
    let session = session_with(fs.clone(), MockProcessProvider::new());

    execute_command_with_session(Commands::Info, &session)
        .await
        .unwrap();

    assert!(fs.read_log().contains(&pack_root().join("pack.toml")));
    assert!(session.process_provider.get_calls().is_empty());
}

#[tokio::test]
async fn test_missing_pack_reports_location() {
    let session = session_with(MockFileSystemProvider::new(), MockProcessProvider::new());

    let err = execute_command_with_session(Commands::Info, &session)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("/test/pack"), "{err:#}");
}

#[tokio::test]
async fn test_workdir_falls_back_to_current_dir() {
    let fs = seeded_filesystem().with_current_dir(pack_root());
    let session = MockCommandSession::new().with_filesystem(fs);

    execute_command_with_session(Commands::List { resource_packs: false, other: true }, &session)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_requires_slug_or_all() {
    let session = session_with(seeded_filesystem(), MockProcessProvider::new());

    let err = execute_command_with_session(Commands::Update { slug: None, all: false }, &session)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("--all"));
    assert!(session.process_provider.get_calls().is_empty());
}

#[tokio::test]
async fn test_update_all_runs_in_pack_root() {
    let session = session_with(seeded_filesystem(), MockProcessProvider::new());

    execute_command_with_session(Commands::Update { slug: None, all: true }, &session)
        .await
        .unwrap();

    assert!(
        session
            .process_provider
            .verify_call("packwiz", &["update", "-a"], &pack_root())
    );
}

#[tokio::test]
async fn test_add_modrinth_forwards_options() {
    let session = session_with(seeded_filesystem(), MockProcessProvider::new());

    let command = Commands::Add {
        source: AddSource::Modrinth {
            query: "sodium".to_string(),
            project: None,
            version_id: Some("mc1.20.1-0.5.3".to_string()),
            version_filename: None,
        },
    };
    execute_command_with_session(command, &session).await.unwrap();

    assert!(session.process_provider.verify_call(
        "packwiz",
        &["modrinth", "add", "sodium", "--version", "mc1.20.1-0.5.3", "-y"],
        &pack_root(),
    ));
}

#[tokio::test]
async fn test_packwiz_failure_surfaces_stdout() {
    let process = MockProcessProvider::new()
        .with_packwiz_failure(&["curseforge", "add", "nothing-here", "-y"], "no projects found");
    let session = session_with(seeded_filesystem(), process);

    let command = Commands::Add {
        source: AddSource::Curseforge {
            query: "nothing-here".to_string(),
            category: None,
            file_id: None,
        },
    };
    let err = execute_command_with_session(command, &session).await.unwrap_err();

    assert!(format!("{err:#}").contains("no projects found"), "{err:#}");
}

#[tokio::test]
async fn test_export_modrinth_without_domain_restriction() {
    let session = session_with(seeded_filesystem(), MockProcessProvider::new());

    let command = Commands::Export {
        format: ExportFormat::Modrinth,
        dir: Some("dist".to_string()),
        file_name: None,
        side: ExportSide::Client,
        no_restrict_domains: true,
    };
    execute_command_with_session(command, &session).await.unwrap();

    assert!(session.process_provider.verify_call(
        "packwiz",
        &[
            "modrinth",
            "export",
            "-o",
            "dist/Command Pack-0.3.0.mrpack",
            "--restrictDomains=false",
        ],
        &pack_root(),
    ));
}

#[tokio::test]
async fn test_remove_by_slug_runs_packwiz_remove() {
    let session = session_with(seeded_filesystem(), MockProcessProvider::new());

    execute_command_with_session(Commands::Remove { target: "jei".to_string() }, &session)
        .await
        .unwrap();

    assert!(
        session
            .process_provider
            .verify_call("packwiz", &["remove", "jei"], &pack_root())
    );
}

#[tokio::test]
async fn test_remove_tracked_file_deletes_then_refreshes() {
    let fs = seeded_filesystem();
    let session = session_with(fs.clone(), MockProcessProvider::new());

    execute_command_with_session(
        Commands::Remove { target: "config/jei.cfg".to_string() },
        &session,
    )
    .await
    .unwrap();

    assert_eq!(fs.removed_files(), vec![pack_root().join("config/jei.cfg")]);
    assert!(
        session
            .process_provider
            .verify_call("packwiz", &["refresh"], &pack_root())
    );
}

#[tokio::test]
async fn test_set_version_rewrites_manifest() {
    let fs = seeded_filesystem();
    let session = session_with(fs.clone(), MockProcessProvider::new());

    execute_command_with_session(
        Commands::SetVersion { pack_version: "0.4.0".to_string() },
        &session,
    )
    .await
    .unwrap();

    let written = fs.file(&pack_root().join("pack.toml")).unwrap();
    assert!(written.contains("version = \"0.4.0\""), "{written}");
    assert!(written.contains("name = \"Command Pack\""), "{written}");
}

#[tokio::test]
async fn test_init_runs_packwiz_init() {
    // packwiz leaves these behind; the mock only records the call
    let fs = seeded_filesystem();
    let session = session_with(fs, MockProcessProvider::new());

    let command = Commands::Init {
        name: "Command Pack".to_string(),
        author: "Someone".to_string(),
        pack_version: "0.3.0".to_string(),
        minecraft_version: "1.20.1".to_string(),
        modloader: ModLoader::Fabric,
    };
    execute_command_with_session(command, &session).await.unwrap();

    let calls = session.process_provider.get_calls_for_command("packwiz");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[0], "init");
    assert!(calls[0].args.contains(&"--fabric-latest".to_string()));
    assert_eq!(calls[0].working_dir, pack_root());
}

#[tokio::test]
async fn test_devpack_writes_instance_files() {
    let fs = seeded_filesystem();
    let session = session_with(fs.clone(), MockProcessProvider::new());

    execute_command_with_session(Commands::Devpack, &session)
        .await
        .unwrap();

    let base = pack_root().join("devpack-1.20.1-Fabric-0.15.0");
    assert!(fs.file(&base.join("instance.cfg")).is_some());
    let mmc = fs.file(&base.join("mmc-pack.json")).unwrap();
    assert!(mmc.contains("net.fabricmc.fabric-loader"), "{mmc}");
}

#[tokio::test]
async fn test_packwiz_unavailable_is_reported() {
    let session = session_with(
        seeded_filesystem(),
        MockProcessProvider::new().with_packwiz_unavailable(),
    );

    let err = execute_command_with_session(Commands::Refresh, &session)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("packwiz"), "{err:#}");
    assert!(session.process_provider.get_calls().is_empty());
}
