const JEI_CURSEFORGE: &str = r#"name = "Just Enough Items (JEI)"
filename = "jei-1.19.2-forge-11.6.0.1016.jar"
side = "both"

[download]
hash-format = "sha1"
hash = "9a6e0d1ef4a7a4b1b2f2a7c2f2bb1b2c3d4e5f60"
mode = "metadata:curseforge"

[update.curseforge]
file-id = 4371666
project-id = 238222
"#;

const SODIUM_MODRINTH: &str = r#"name = "Sodium"
filename = "sodium-fabric-mc1.20.1-0.5.3.jar"
side = "client"

[download]
url = "https://cdn.modrinth.com/data/AANobbMI/versions/OihdIimA/sodium-fabric-mc1.20.1-0.5.3.jar"
hash-format = "sha512"
hash = "0123abcd"

[update.modrinth]
mod-id = "AANobbMI"
version = "OihdIimA"
"#;

const URL_ONLY: &str = r#"name = "Custom Mod"
filename = "custom.jar"

[download]
url = "https://example.com/custom.jar"
hash-format = "sha256"
hash = "beef"
"#;

#[test]
fn test_parse_curseforge_variant() {
    let path = Path::new("/pack/mods/jei.pw.toml");
    let meta = MetaFile::parse(path, JEI_CURSEFORGE).unwrap();

    assert_eq!(meta.provider(), "curseforge");
    assert_eq!(meta.path(), path);
    assert_eq!(meta.side(), Side::Both);
    match meta {
        MetaFile::CurseForge(cf) => {
            assert_eq!(cf.update.project_id, 238222);
            assert_eq!(cf.update.file_id, 4371666);
            assert_eq!(cf.download.mode, DownloadMode::CurseForgeMetadata);
            assert_eq!(cf.download.hash_format, "sha1");
        }
        other => panic!("expected curseforge, got {other:?}"),
    }
}

#[test]
fn test_parse_modrinth_variant() {
    let meta = MetaFile::parse(Path::new("mods/sodium.pw.toml"), SODIUM_MODRINTH).unwrap();

    assert_eq!(meta.name(), "Sodium");
    assert_eq!(meta.filename(), "sodium-fabric-mc1.20.1-0.5.3.jar");
    assert_eq!(meta.side(), Side::Client);
    match meta {
        MetaFile::Modrinth(mr) => {
            assert_eq!(mr.update.mod_id, "AANobbMI");
            assert_eq!(mr.update.version, "OihdIimA");
            assert!(mr.download.url.starts_with("https://cdn.modrinth.com/"));
        }
        other => panic!("expected modrinth, got {other:?}"),
    }
}

#[test]
fn test_parse_url_variant_defaults_side() {
    let meta = MetaFile::parse(Path::new("mods/custom.pw.toml"), URL_ONLY).unwrap();

    assert_eq!(meta.provider(), "url");
    assert_eq!(meta.side(), Side::Both);
}

#[test]
fn test_modrinth_without_url_is_rejected() {
    let content = SODIUM_MODRINTH.replace(
        "url = \"https://cdn.modrinth.com/data/AANobbMI/versions/OihdIimA/sodium-fabric-mc1.20.1-0.5.3.jar\"\n",
        "",
    );
    let err = MetaFile::parse(Path::new("mods/sodium.pw.toml"), &content).unwrap_err();
    assert!(matches!(err, RecordError::UnknownMetaFile { .. }));
}

#[test]
fn test_two_update_sources_are_rejected() {
    let content = format!("{JEI_CURSEFORGE}\n[update.modrinth]\nmod-id = \"x\"\nversion = \"y\"\n");
    let err = MetaFile::parse(Path::new("mods/jei.pw.toml"), &content).unwrap_err();
    assert!(err.to_string().contains("both curseforge and modrinth"));
}

#[test]
fn test_unknown_download_mode_is_parse_error() {
    let content = JEI_CURSEFORGE.replace("metadata:curseforge", "metadata:ftp");
    let err = MetaFile::parse(Path::new("mods/jei.pw.toml"), &content).unwrap_err();
    assert!(matches!(err, RecordError::Parse { .. }));
}

#[test]
fn test_slug_derivation() {
    assert_eq!(slug("mods/jei.pw.toml"), "jei");
    assert_eq!(slug("resourcepacks/faithful-32x.pw.toml"), "faithful-32x");
    assert_eq!(slug("mods/a.pw"), "");
}
