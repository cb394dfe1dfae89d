use crate::application::session_mocks::MockFileSystemProvider;
use std::path::PathBuf;

const FABRIC_PACK: &str = r#"name = "Test Pack"
author = "Test Author"
version = "1.0.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = "abc123"

[versions]
minecraft = "1.20.1"
fabric = "0.14.21"
"#;

fn pack_path() -> PathBuf {
    PathBuf::from("/test/pack/pack.toml")
}

#[test]
fn test_parse_fabric_pack() {
    let pack = PackFile::parse(&pack_path(), FABRIC_PACK).unwrap();

    assert_eq!(pack.name, "Test Pack");
    assert_eq!(pack.version, "1.0.0");
    assert_eq!(pack.pack_format, "packwiz:1.1.0");
    assert_eq!(pack.index.file, "index.toml");
    assert_eq!(pack.index.hash, "abc123");
    assert_eq!(pack.versions.minecraft, "1.20.1");
    assert_eq!(pack.versions.fabric.as_deref(), Some("0.14.21"));
    assert_eq!(pack.versions.forge, None);
}

#[test]
fn test_missing_version_defaults_to_empty() {
    let content = FABRIC_PACK.replace("version = \"1.0.0\"\n", "");
    let pack = PackFile::parse(&pack_path(), &content).unwrap();
    assert_eq!(pack.version, "");
}

#[test]
fn test_missing_index_table_is_parse_error() {
    let err = PackFile::parse(&pack_path(), "name = \"x\"\npack-format = \"1\"\n").unwrap_err();
    assert!(matches!(err, RecordError::Parse { .. }));
    assert!(err.to_string().contains("/test/pack/pack.toml"));
}

#[test]
fn test_loader_priority() {
    let mut versions = PackVersions {
        minecraft: "1.19.2".to_string(),
        ..PackVersions::default()
    };
    assert_eq!(versions.mod_loader(), ModLoader::LiteLoader);

    versions.quilt = Some("0.17.0".to_string());
    assert_eq!(versions.mod_loader(), ModLoader::Quilt);

    versions.fabric = Some("0.14.0".to_string());
    assert_eq!(versions.mod_loader(), ModLoader::Fabric);

    versions.forge = Some("43.2.0".to_string());
    assert_eq!(versions.mod_loader(), ModLoader::Forge);
    assert_eq!(versions.loader_version(ModLoader::Forge), Some("43.2.0"));
    assert_eq!(versions.loader_version(ModLoader::LiteLoader), None);
}

#[test]
fn test_mod_loader_names() {
    assert_eq!(ModLoader::LiteLoader.to_string(), "LiteLoader");
    assert_eq!(ModLoader::LiteLoader.key(), "liteloader");
    assert_eq!(ModLoader::parse(" Quilt "), Some(ModLoader::Quilt));
    assert_eq!(ModLoader::parse("neoforge"), None);
}

#[test]
fn test_write_drops_unknown_keys_and_orders_fields() {
    let fs = MockFileSystemProvider::new();
    let pack = PackFile::parse(&pack_path(), FABRIC_PACK).unwrap();

    pack.write(&fs, &pack_path()).unwrap();
    let written = fs.file(&pack_path()).unwrap();

    assert!(!written.contains("author"));
    let name_at = written.find("name =").unwrap();
    let version_at = written.find("version =").unwrap();
    let format_at = written.find("pack-format =").unwrap();
    let index_at = written.find("[index]").unwrap();
    let versions_at = written.find("[versions]").unwrap();
    assert!(name_at < version_at && version_at < format_at);
    assert!(format_at < index_at && index_at < versions_at);

    let fabric_at = written.find("fabric =").unwrap();
    let minecraft_at = written.find("minecraft =").unwrap();
    assert!(fabric_at < minecraft_at);
    assert!(!written.contains("forge"));
    assert!(!written.contains("quilt"));
}

#[test]
fn test_write_then_read_round_trip() {
    let fs = MockFileSystemProvider::new();
    let mut pack = PackFile::parse(&pack_path(), FABRIC_PACK).unwrap();
    pack.name = "Renamed".to_string();

    let written = pack.write(&fs, &pack_path()).unwrap();
    let reread = PackFile::read(&fs, &pack_path()).unwrap();

    assert_eq!(written, pack);
    assert_eq!(reread, written);
    assert_eq!(reread.versions.quilt, None);
}

#[test]
fn test_read_missing_file() {
    let fs = MockFileSystemProvider::new();
    let err = PackFile::read(&fs, &pack_path()).unwrap_err();
    assert!(matches!(err, RecordError::Read { .. }));
}
