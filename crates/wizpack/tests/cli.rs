//! CLI smoke tests for the wizpack binary

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wizpack_tests::TestEnvironment;

/// wizpack run from inside the test environment, ignoring any ambient config
fn wizpack_cmd(env: &TestEnvironment) -> Command {
    let mut cmd = cargo_bin_cmd!("wizpack");
    cmd.current_dir(&env.root_path)
        .env_remove("WIZPACK_WORKDIR")
        .env_remove("WIZPACK_PACKWIZ")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    let env = TestEnvironment::new().unwrap();

    wizpack_cmd(&env)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("devpack"))
        .stdout(predicate::str::contains("--workdir"));
}

#[test]
fn no_command_prints_hint() {
    let env = TestEnvironment::new().unwrap();

    wizpack_cmd(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("wizpack --help"));
}

#[test]
fn init_rejects_unknown_loader() {
    let env = TestEnvironment::new().unwrap();

    wizpack_cmd(&env)
        .args([
            "init",
            "--name",
            "Pack",
            "--author",
            "Me",
            "--mc-version",
            "1.20.1",
            "--modloader",
            "neoforge",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mod loader"));
}

#[test]
fn info_reads_pack_from_workdir() {
    let env = TestEnvironment::new().unwrap();
    let pack = env.init_pack("demo", "1.20.1", "fabric", "0.15.0").unwrap();

    wizpack_cmd(&env)
        .arg("--workdir")
        .arg(&pack)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("Fabric 0.15.0"));
}

#[test]
fn info_outside_a_pack_fails() {
    let env = TestEnvironment::new().unwrap();

    wizpack_cmd(&env)
        .args(["info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load pack"));
}

#[test]
fn missing_packwiz_binary_is_reported() {
    let env = TestEnvironment::new().unwrap();
    let pack = env.init_pack("demo", "1.20.1", "fabric", "0.15.0").unwrap();

    wizpack_cmd(&env)
        .env("WIZPACK_PACKWIZ", "definitely-not-packwiz")
        .arg("--workdir")
        .arg(&pack)
        .arg("refresh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be started"));
}
