use std::path::PathBuf;

fn index_path() -> PathBuf {
    PathBuf::from("/test/pack/index.toml")
}

#[test]
fn test_parse_index_with_metafile_flags() {
    let content = r#"hash-format = "sha256"

[[files]]
file = "config/foo.cfg"
hash = "c0"

[[files]]
file = "mods/jei.pw.toml"
hash = "a1"
metafile = true

[[files]]
file = "options.txt"
hash = "d4"
hash-format = "sha1"
preserve = true
"#;

    let index = IndexFile::parse(&index_path(), content).unwrap();

    assert_eq!(index.hash_format, "sha256");
    assert_eq!(index.files.len(), 3);
    assert_eq!(index.files[0].file, "config/foo.cfg");
    assert!(!index.files[0].metafile);
    assert!(index.files[1].metafile);
    assert_eq!(index.files[2].hash_format.as_deref(), Some("sha1"));
    assert!(index.files[2].preserve);
    assert_eq!(index.entry("mods/jei.pw.toml").unwrap().hash, "a1");
    assert!(index.entry("mods/missing.pw.toml").is_none());
}

#[test]
fn test_missing_files_key_defaults_to_empty() {
    let index = IndexFile::parse(&index_path(), "hash-format = \"sha256\"\n").unwrap();
    assert!(index.files.is_empty());
}

#[test]
fn test_serialized_entries_omit_defaults() {
    let index = IndexFile {
        hash_format: "sha256".to_string(),
        files: vec![
            IndexEntry::new("config/foo.cfg", "c0", false),
            IndexEntry::new("mods/jei.pw.toml", "a1", true),
        ],
    };

    let content = index.to_toml(&index_path()).unwrap();
    assert_eq!(content.matches("metafile = true").count(), 1);
    assert!(!content.contains("preserve"));
    assert!(!content.contains("alias"));

    let reparsed = IndexFile::parse(&index_path(), &content).unwrap();
    assert_eq!(reparsed, index);
}
