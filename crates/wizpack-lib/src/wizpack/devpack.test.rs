use crate::application::session_mocks::{MockFileSystemProvider, MockProcessProvider};
use crate::wizpack::packwiz::Packwiz;
use std::sync::Arc;

const FORGE_PACK: &str = r#"name = "Forge Pack"
version = "0.3.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = "h0"

[versions]
forge = "43.2.0"
minecraft = "1.19.2"
"#;

fn root() -> PathBuf {
    PathBuf::from("/test/pack")
}

fn forge_pack(fs: &MockFileSystemProvider) -> Pack {
    fs.set_file(root().join("pack.toml"), FORGE_PACK);
    fs.set_file(root().join("index.toml"), "hash-format = \"sha256\"\n");
    let packwiz = Packwiz::new("packwiz", Arc::new(MockProcessProvider::new()), root());
    Pack::new(root(), Arc::new(fs.clone()), packwiz).unwrap()
}

#[test]
fn test_instance_descriptor_from_pack() {
    let fs = MockFileSystemProvider::new();
    let instance = DevInstance::from_pack(&forge_pack(&fs)).unwrap();

    assert_eq!(instance.slug, "devpack-1.19.2-Forge-43.2.0");
    assert!(instance.instance_cfg.starts_with("iconKey=default\nOverrideCommands=true\n"));
    assert!(instance.instance_cfg.contains(
        "PreLaunchCommand=\"$INST_JAVA\" -jar packwiz-installer-bootstrap.jar http://localhost:8080/pack.toml -g\n"
    ));
    assert!(instance.instance_cfg.ends_with("name=Forge Pack Dev Modpack"));

    let components = &instance.mmc_pack.components;
    assert_eq!(components[0].uid, "net.minecraft");
    assert_eq!(components[0].important, Some(true));
    assert_eq!(components[1].uid, "net.minecraftforge");
    assert_eq!(components[1].version, "43.2.0");
}

#[test]
fn test_mmc_pack_json_shape() {
    let fs = MockFileSystemProvider::new();
    let instance = DevInstance::from_pack(&forge_pack(&fs)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&instance.mmc_pack_json().unwrap()).unwrap();
    assert_eq!(value["formatVersion"], 1);
    assert_eq!(value["components"][0]["version"], "1.19.2");
    assert!(value["components"][1].get("important").is_none());
}

#[test]
fn test_loader_uids() {
    assert_eq!(loader_uid(ModLoader::Fabric), "net.fabricmc.fabric-loader");
    assert_eq!(loader_uid(ModLoader::Quilt), "org.quiltmc.quilt-loader");
    assert_eq!(loader_uid(ModLoader::LiteLoader), "com.mumfrey.liteloader");
}

#[test]
fn test_write_to_creates_instance_files() {
    let fs = MockFileSystemProvider::new();
    let instance = DevInstance::from_pack(&forge_pack(&fs)).unwrap();

    let dir = instance.write_to(&fs, &root()).unwrap();

    assert_eq!(dir, root().join("devpack-1.19.2-Forge-43.2.0"));
    assert!(fs.exists(&dir.join(".minecraft")));
    assert_eq!(fs.file(&dir.join(INSTANCE_CFG)).unwrap(), instance.instance_cfg);
    assert!(fs.file(&dir.join(MMC_PACK_JSON)).unwrap().contains("net.minecraftforge"));
}

#[test]
fn test_missing_loader_version_propagates() {
    let fs = MockFileSystemProvider::new();
    fs.set_file(
        root().join("pack.toml"),
        FORGE_PACK.replace("forge = \"43.2.0\"\n", ""),
    );
    fs.set_file(root().join("index.toml"), "hash-format = \"sha256\"\n");
    let packwiz = Packwiz::new("packwiz", Arc::new(MockProcessProvider::new()), root());
    let pack = Pack::new(root(), Arc::new(fs.clone()), packwiz).unwrap();

    let err = DevInstance::from_pack(&pack).unwrap_err();
    assert!(matches!(err, DevpackError::Pack(PackError::MissingLoaderVersion { .. })));
}
