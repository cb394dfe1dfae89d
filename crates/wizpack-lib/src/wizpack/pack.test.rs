use crate::application::session_mocks::{MockCommandSession, MockFileSystemProvider, MockProcessProvider};
use crate::wizpack::packwiz::{ExportTarget, ModrinthExportOptions};

const JEI: &str = "mods/jei.pw.toml";
const SODIUM: &str = "mods/sodium.pw.toml";
const FAITHFUL: &str = "resourcepacks/faithful.pw.toml";
const FOO_CFG: &str = "config/foo.cfg";

fn root() -> PathBuf {
    PathBuf::from("/test/pack")
}

fn manifest(hash: &str) -> String {
    format!(
        r#"name = "Test Pack"
author = "Test Author"
version = "1.0.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = "{hash}"

[versions]
minecraft = "1.20.1"
fabric = "0.14.21"
"#
    )
}

fn index_toml(entries: &[(&str, &str, bool)]) -> String {
    let mut out = String::from("hash-format = \"sha256\"\n");
    for (file, hash, metafile) in entries {
        out.push_str(&format!("\n[[files]]\nfile = \"{file}\"\nhash = \"{hash}\"\n"));
        if *metafile {
            out.push_str("metafile = true\n");
        }
    }
    out
}

fn modrinth_meta(name: &str, version: &str) -> String {
    format!(
        r#"name = "{name}"
filename = "{name}-{version}.jar"
side = "both"

[download]
url = "https://cdn.modrinth.com/data/x/versions/{version}/{name}.jar"
hash-format = "sha512"
hash = "{version}"

[update.modrinth]
mod-id = "x"
version = "{version}"
"#
    )
}

fn curseforge_meta(name: &str, file_id: u64) -> String {
    format!(
        r#"name = "{name}"
filename = "{name}.zip"
side = "client"

[download]
hash-format = "sha1"
hash = "ff"
mode = "metadata:curseforge"

[update.curseforge]
file-id = {file_id}
project-id = 42
"#
    )
}

/// Simulate packwiz leaving a new manifest hash and index behind
fn write_state(fs: &MockFileSystemProvider, hash: &str, entries: &[(&str, &str, bool)]) {
    fs.set_file(root().join("pack.toml"), manifest(hash));
    fs.set_file(root().join("index.toml"), index_toml(entries));
}

fn seeded() -> MockFileSystemProvider {
    let fs = MockFileSystemProvider::new();
    write_state(
        &fs,
        "h0",
        &[(FOO_CFG, "c0", false), (JEI, "a1", true), (FAITHFUL, "r1", true)],
    );
    fs.set_file(root().join(FOO_CFG), "key=value");
    fs.set_file(root().join(JEI), modrinth_meta("JEI", "v1"));
    fs.set_file(root().join(FAITHFUL), curseforge_meta("Faithful", 100));
    fs
}

fn open(fs: &MockFileSystemProvider, process: &MockProcessProvider) -> Pack {
    let packwiz = Packwiz::new("packwiz", Arc::new(process.clone()), root());
    Pack::new(root(), Arc::new(fs.clone()), packwiz).unwrap()
}

fn assert_partition(pack: &Pack) {
    let index = pack.index();
    let index_paths: BTreeSet<String> = index.files.iter().map(|e| e.file.clone()).collect();
    let meta: BTreeSet<String> = pack.meta_files().keys().cloned().collect();
    let other = pack.other_files();

    assert!(meta.is_disjoint(&other), "{meta:?} overlaps {other:?}");
    let union: BTreeSet<String> = meta.union(&other).cloned().collect();
    assert_eq!(union, index_paths);
    for entry in &index.files {
        assert_eq!(entry.metafile, meta.contains(&entry.file), "{}", entry.file);
    }
}

#[test]
fn test_new_loads_every_record() {
    let fs = seeded();
    let pack = open(&fs, &MockProcessProvider::new());

    assert_eq!(pack.name(), "Test Pack");
    assert_eq!(pack.version(), "1.0.0");
    assert_eq!(pack.pack_file_path(), root().join("pack.toml"));
    assert_eq!(pack.index_file_path(), root().join("index.toml"));
    assert_eq!(pack.meta_files().len(), 2);
    assert_eq!(pack.other_files().into_iter().collect::<Vec<_>>(), vec![FOO_CFG]);
    assert_eq!(pack.mod_slugs(), vec!["jei"]);
    assert_eq!(pack.resource_pack_slugs(), vec!["faithful"]);
    assert_eq!(pack.mods()["jei"].name(), "JEI");
    assert_eq!(pack.resource_packs()["faithful"].provider(), "curseforge");
    assert_partition(&pack);
}

#[test]
fn test_new_fails_on_missing_metafile() {
    let fs = seeded();
    fs.delete_file(&root().join(JEI));

    let packwiz = Packwiz::new("packwiz", Arc::new(MockProcessProvider::new()), root());
    let result = Pack::new(root(), Arc::new(fs.clone()), packwiz);

    assert!(matches!(result, Err(PackError::Record(RecordError::Read { .. }))));
}

#[test]
fn test_accessors_return_snapshots() {
    let fs = seeded();
    let pack = open(&fs, &MockProcessProvider::new());

    let mut metas = pack.meta_files();
    metas.clear();
    let mut other = pack.other_files();
    other.insert("rogue.txt".to_string());
    let mut file = pack.file();
    file.name = "Changed".to_string();

    assert_eq!(pack.meta_files().len(), 2);
    assert!(!pack.other_files().contains("rogue.txt"));
    assert_eq!(pack.name(), "Test Pack");
}

#[test]
fn test_set_name_and_version_persist_manifest() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);

    pack.set_name("Renamed").unwrap();
    pack.set_version("2.0.0").unwrap();

    assert_eq!(pack.name(), "Renamed");
    assert_eq!(pack.version(), "2.0.0");
    let written = fs.file(&root().join("pack.toml")).unwrap();
    assert!(written.contains("name = \"Renamed\""));
    assert!(written.contains("version = \"2.0.0\""));
    assert!(!written.contains("author"));
    assert_eq!(PackFile::parse(&root(), &written).unwrap(), pack.file());
    assert!(process.get_calls().is_empty());
}

#[test]
fn test_mod_loader_and_version() {
    let fs = seeded();
    let pack = open(&fs, &MockProcessProvider::new());

    assert_eq!(pack.mod_loader(), ModLoader::Fabric);
    assert_eq!(pack.mod_loader_version().unwrap(), "0.14.21");
}

#[test]
fn test_missing_loader_version_is_an_error() {
    let fs = seeded();
    let content = manifest("h0").replace("fabric = \"0.14.21\"\n", "");
    fs.set_file(root().join("pack.toml"), content);
    let pack = open(&fs, &MockProcessProvider::new());

    assert_eq!(pack.mod_loader(), ModLoader::LiteLoader);
    let err = pack.mod_loader_version().unwrap_err();
    assert!(matches!(
        err,
        PackError::MissingLoaderVersion {
            loader: ModLoader::LiteLoader
        }
    ));
}

#[tokio::test]
async fn test_changed_and_created_metafiles_are_read() {
    let fs = MockFileSystemProvider::new();
    write_state(&fs, "h0", &[(JEI, "a1", true)]);
    fs.set_file(root().join(JEI), modrinth_meta("JEI", "v1"));
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);

    write_state(&fs, "h1", &[(JEI, "a2", true), (SODIUM, "b1", true)]);
    fs.set_file(root().join(JEI), modrinth_meta("JEI", "v2"));
    fs.set_file(root().join(SODIUM), modrinth_meta("Sodium", "s1"));
    fs.clear_read_log();

    let report = pack.add(AddRequest::modrinth("sodium")).await.unwrap();

    assert!(process.verify_call("packwiz", &["modrinth", "add", "sodium", "-y"], &root()));
    assert_eq!(report.created, vec![SODIUM]);
    assert_eq!(report.updated, vec![JEI]);
    assert!(report.removed.is_empty());

    let metas = pack.meta_files();
    assert_eq!(metas.len(), 2);
    assert_eq!(metas[JEI].filename(), "JEI-v2.jar");
    assert_eq!(metas[SODIUM].name(), "Sodium");

    let reads = fs.read_log();
    assert!(reads.contains(&root().join(JEI)));
    assert!(reads.contains(&root().join(SODIUM)));
    assert_partition(&pack);
}

#[tokio::test]
async fn test_vanished_opaque_path_leaves_metafiles_alone() {
    let fs = seeded();
    let mut pack = open(&fs, &MockProcessProvider::new());

    write_state(&fs, "h1", &[(JEI, "a1", true), (FAITHFUL, "r1", true)]);
    let report = pack.refresh().await.unwrap();

    assert_eq!(report.removed, vec![FOO_CFG]);
    assert!(pack.other_files().is_empty());
    assert_eq!(pack.meta_files().len(), 2);
    assert_partition(&pack);
}

#[tokio::test]
async fn test_remove_opaque_path_deletes_then_refreshes() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);

    write_state(&fs, "h1", &[(JEI, "a1", true), (FAITHFUL, "r1", true)]);
    let report = pack.remove(FOO_CFG).await.unwrap();

    assert_eq!(fs.removed_files(), vec![root().join(FOO_CFG)]);
    let calls = process.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["refresh"]);
    assert!(process.get_calls_for_command("packwiz").iter().all(|c| c.args[0] != "remove"));
    assert_eq!(report.removed, vec![FOO_CFG]);
    assert!(!pack.other_files().contains(FOO_CFG));
}

#[tokio::test]
async fn test_remove_unknown_target_is_rejected_without_side_effects() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);
    let metas_before = pack.meta_files();
    let other_before = pack.other_files();

    let err = pack.remove("nonexistent").await.unwrap_err();

    assert!(matches!(err, PackError::InvalidInput { ref value } if value == "nonexistent"));
    assert!(process.get_calls().is_empty());
    assert!(fs.removed_files().is_empty());
    assert_eq!(pack.meta_files(), metas_before);
    assert_eq!(pack.other_files(), other_before);
}

#[tokio::test]
async fn test_remove_metafile_by_slug_or_path_uses_slug() {
    for target in ["jei", JEI] {
        let fs = seeded();
        let process = MockProcessProvider::new();
        let mut pack = open(&fs, &process);

        write_state(&fs, "h1", &[(FOO_CFG, "c0", false), (FAITHFUL, "r1", true)]);
        fs.delete_file(&root().join(JEI));
        let report = pack.remove(target).await.unwrap();

        assert!(process.verify_call("packwiz", &["remove", "jei"], &root()), "{target}");
        assert!(fs.removed_files().is_empty());
        assert_eq!(report.removed, vec![JEI]);
        assert!(pack.mod_slugs().is_empty());
        assert_partition(&pack);
    }
}

#[tokio::test]
async fn test_remove_nested_metafile_path_uses_file_name() {
    const DEEP: &str = "mods/sub/deep.pw.toml";
    let fs = seeded();
    write_state(
        &fs,
        "h0",
        &[(FOO_CFG, "c0", false), (JEI, "a1", true), (FAITHFUL, "r1", true), (DEEP, "d1", true)],
    );
    fs.set_file(root().join(DEEP), modrinth_meta("Deep", "v1"));
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);
    assert!(pack.meta_files().contains_key(DEEP));

    write_state(&fs, "h1", &[(FOO_CFG, "c0", false), (JEI, "a1", true), (FAITHFUL, "r1", true)]);
    fs.delete_file(&root().join(DEEP));
    let report = pack.remove(DEEP).await.unwrap();

    assert!(process.verify_call("packwiz", &["remove", "deep"], &root()));
    assert_eq!(report.removed, vec![DEEP]);
    assert!(!pack.meta_files().contains_key(DEEP));
    assert_partition(&pack);
}

#[test]
fn test_read_progress_template_is_valid() {
    assert!(ProgressStyle::with_template(READ_PROGRESS_TEMPLATE).is_ok());
}

#[tokio::test]
async fn test_unchanged_index_hash_skips_index_and_metafile_reads() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);
    let metas_before = pack.meta_files();

    fs.set_file(root().join("index.toml"), index_toml(&[(JEI, "zz", true)]));
    fs.clear_read_log();
    let report = pack.update("jei").await.unwrap();

    assert!(report.is_empty());
    assert_eq!(fs.read_log(), vec![root().join("pack.toml")]);
    assert_eq!(pack.meta_files(), metas_before);
    assert_eq!(pack.index().files.len(), 3);
}

#[tokio::test]
async fn test_updated_opaque_file_is_not_reread() {
    let fs = seeded();
    let mut pack = open(&fs, &MockProcessProvider::new());

    write_state(
        &fs,
        "h1",
        &[(FOO_CFG, "c1", false), (JEI, "a1", true), (FAITHFUL, "r1", true)],
    );
    fs.clear_read_log();
    let report = pack.refresh().await.unwrap();

    assert_eq!(report.updated, vec![FOO_CFG]);
    assert!(!fs.read_log().contains(&root().join(FOO_CFG)));
    assert!(!fs.read_log().contains(&root().join(JEI)));
    assert!(pack.other_files().contains(FOO_CFG));
    assert_eq!(pack.index().entry(FOO_CFG).unwrap().hash, "c1");
    assert_partition(&pack);
}

#[tokio::test]
async fn test_metafile_flag_flip_moves_entry_between_collections() {
    let fs = seeded();
    let mut pack = open(&fs, &MockProcessProvider::new());
    let promoted = "mods/extra.pw.toml";

    write_state(
        &fs,
        "h1",
        &[(FOO_CFG, "c0", false), (JEI, "a1", false), (FAITHFUL, "r1", true), (promoted, "e1", false)],
    );
    pack.refresh().await.unwrap();
    assert!(pack.other_files().contains(JEI));
    assert!(!pack.meta_files().contains_key(JEI));
    assert_partition(&pack);

    write_state(
        &fs,
        "h2",
        &[(FOO_CFG, "c0", false), (JEI, "a1", true), (FAITHFUL, "r1", true), (promoted, "e1", true)],
    );
    fs.set_file(root().join(promoted), modrinth_meta("Extra", "e1"));
    let report = pack.refresh().await.unwrap();

    assert_eq!(report.created, vec![promoted, JEI]);
    assert!(pack.meta_files().contains_key(promoted));
    assert!(!pack.other_files().contains(JEI));
    assert_partition(&pack);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let fs = seeded();
    let mut pack = open(&fs, &MockProcessProvider::new());

    write_state(
        &fs,
        "h1",
        &[(FOO_CFG, "c0", false), (JEI, "a2", true), (FAITHFUL, "r1", true)],
    );
    fs.set_file(root().join(JEI), modrinth_meta("JEI", "v2"));
    let first = pack.update("jei").await.unwrap();
    let metas = pack.meta_files();
    let other = pack.other_files();

    let second = pack.update("jei").await.unwrap();

    assert_eq!(first.updated, vec![JEI]);
    assert!(second.is_empty());
    assert_eq!(pack.meta_files(), metas);
    assert_eq!(pack.other_files(), other);
}

#[tokio::test]
async fn test_failed_command_leaves_mirror_untouched() {
    let fs = seeded();
    let process = MockProcessProvider::new().with_packwiz_failure(&["update", "-a"], "network unreachable");
    let mut pack = open(&fs, &process);
    let metas_before = pack.meta_files();

    write_state(&fs, "h1", &[(JEI, "a9", true)]);
    fs.clear_read_log();
    let err = pack.update_all().await.unwrap_err();

    match err {
        PackError::Packwiz(PackwizError::CommandFailed { stdout, .. }) => {
            assert_eq!(stdout, "network unreachable")
        }
        other => panic!("expected command failure, got {other:?}"),
    }
    assert!(fs.read_log().is_empty());
    assert_eq!(pack.file().index.hash, "h0");
    assert_eq!(pack.meta_files(), metas_before);
    assert_eq!(pack.index().files.len(), 3);
}

#[tokio::test]
async fn test_unreadable_metafile_fails_the_pass() {
    let fs = seeded();
    let mut pack = open(&fs, &MockProcessProvider::new());

    write_state(
        &fs,
        "h1",
        &[(FOO_CFG, "c0", false), (JEI, "a1", true), (FAITHFUL, "r1", true), (SODIUM, "b1", true)],
    );
    let err = pack.add(AddRequest::modrinth("sodium")).await.unwrap_err();

    assert!(matches!(err, PackError::Record(RecordError::Read { .. })));
}

#[tokio::test]
async fn test_other_mutations_dispatch_expected_commands() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);

    pack.add(AddRequest::curseforge("jei")).await.unwrap();
    pack.add_external("Custom", "https://example.com/c.jar").await.unwrap();
    pack.import_modpack("modpack.zip").await.unwrap();
    pack.detect().await.unwrap();

    let args: Vec<Vec<String>> = process.get_calls().into_iter().map(|c| c.args).collect();
    assert_eq!(
        args,
        vec![
            vec!["curseforge", "add", "jei", "-y"],
            vec!["url", "add", "Custom", "https://example.com/c.jar"],
            vec!["curseforge", "import", "modpack.zip"],
            vec!["curseforge", "detect"],
        ]
    );
}

#[tokio::test]
async fn test_export_uses_default_file_name() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);
    fs.clear_read_log();

    let path = pack.export(ExportRequest::curseforge()).await.unwrap();

    assert_eq!(path, root().join("Test Pack-1.0.0.zip"));
    assert!(process.verify_call(
        "packwiz",
        &["curseforge", "export", "-o", "./Test Pack-1.0.0.zip", "--side", "client"],
        &root()
    ));
    assert!(fs.read_log().is_empty());
}

#[tokio::test]
async fn test_export_honours_target_overrides() {
    let fs = seeded();
    let process = MockProcessProvider::new();
    let mut pack = open(&fs, &process);

    let request = ExportRequest::Modrinth {
        target: ExportTarget {
            dir: Some("dist".to_string()),
            file_name: Some("release".to_string()),
        },
        options: ModrinthExportOptions {
            restrict_domains: false,
        },
    };
    let path = pack.export(request).await.unwrap();

    assert_eq!(path, root().join("dist/release.mrpack"));
    assert!(process.verify_call(
        "packwiz",
        &["modrinth", "export", "-o", "dist/release.mrpack", "--restrictDomains=false"],
        &root()
    ));
}

#[test]
fn test_initialize_runs_init_then_opens() {
    let fs = seeded();
    let session = MockCommandSession::new().with_filesystem(fs);

    let pack = Pack::initialize(
        &session,
        root(),
        InitOptions::new("Test Pack", "Test Author", "1.20.1", ModLoader::Fabric),
    )
    .unwrap();

    assert!(session.process_provider.verify_call(
        "packwiz",
        &[
            "init",
            "--name",
            "Test Pack",
            "--author",
            "Test Author",
            "--version",
            "1.0.0",
            "--mc-version",
            "1.20.1",
            "--modloader",
            "fabric",
            "--fabric-latest",
            "-y"
        ],
        &root()
    ));
    assert_eq!(pack.name(), "Test Pack");
}

#[test]
fn test_open_uses_configured_packwiz_binary() {
    let session = MockCommandSession::new()
        .with_filesystem(seeded())
        .with_config(crate::application::config::AppConfig {
            packwiz: "/opt/packwiz".to_string(),
            ..Default::default()
        });

    let pack = Pack::open(&session, root()).unwrap();
    assert_eq!(pack.packwiz.bin(), "/opt/packwiz");
}
