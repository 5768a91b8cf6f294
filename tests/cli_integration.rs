//! End-to-end tests of the cirrus binary.
//!
//! Every test points `CIRRUS_CONFIG_DIR` at its own temp directory, so
//! nothing reads or writes the real home directory. No test reaches the
//! network: dispatch paths are exercised only up to their fail-fast
//! validation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cirrus(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cirrus").unwrap();
    cmd.env("CIRRUS_CONFIG_DIR", config_dir.path());
    cmd
}

#[test]
fn help_lists_services() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AVAILABLE SERVICES"))
        .stdout(predicate::str::contains("ecs"))
        .stdout(predicate::str::contains("rds"));
}

#[test]
fn no_arguments_shows_help() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("SYNOPSIS"));
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_service_exits_cleanly_with_guidance() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .arg("nosuchservice")
        .assert()
        .success()
        .stdout(predicate::str::contains("usage:"))
        .stdout(predicate::str::contains("ecs"));
}

#[test]
fn unknown_operation_lists_valid_operations() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "NoSuchOperation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DescribeInstanceAttribute"))
        .stdout(predicate::str::contains("ConfigVersion"));
}

#[test]
fn wrong_explicit_version_fails_closed() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args([
            "ecs",
            "DescribeInstanceAttribute",
            "--InstanceId",
            "i-1",
            "--version",
            "19990101",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong version"));
}

#[test]
fn parameter_help_shows_schema_fields() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "DescribeInstanceAttribute", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--InstanceId"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn extension_parameter_help_shows_options() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "ExportInstance", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filename"));
}

#[test]
fn missing_credentials_fail_fast() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "StartInstance", "--InstanceId", "i-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("access key"));
}

#[test]
fn missing_region_fails_fast_with_actionable_message() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["configure", "set", "access_key_id", "AKID"])
        .assert()
        .success();
    cirrus(&temp)
        .args(["configure", "set", "access_key_secret", "SECRET"])
        .assert()
        .success();

    cirrus(&temp)
        .args(["ecs", "DescribeInstanceAttribute", "--InstanceId", "i-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--RegionId"));
}

#[test]
fn config_version_pins_and_show_versions_reports_it() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "ConfigVersion", "--version", "20131115"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned ecs to 20131115"));

    let store = std::fs::read_to_string(temp.path().join("api_versions")).unwrap();
    assert!(store.contains("ecs=20131115"));

    cirrus(&temp)
        .args(["ecs", "ShowVersions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* 20131115"))
        .stdout(predicate::str::contains("20140526"));
}

#[test]
fn config_version_rejects_uninstalled_version() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "ConfigVersion", "--version", "19990101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong version"));
    assert!(!temp.path().join("api_versions").exists());
}

#[test]
fn configure_set_get_roundtrip() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["configure", "set", "region", "cn-hangzhou"])
        .assert()
        .success();

    cirrus(&temp)
        .args(["configure", "get", "region"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cn-hangzhou"));
}

#[test]
fn configure_list_masks_secrets() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["configure", "set", "access_key_secret", "SECRETEXAMPLE1234"])
        .assert()
        .success();

    cirrus(&temp)
        .args(["configure", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****************1234"))
        .stdout(predicate::str::contains("SECRETEXAMPLE1234").not());
}

#[test]
fn modify_endpoint_persists_override() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args([
            "ecs",
            "ModifyEndpoint",
            "--RegionId",
            "cn-hangzhou",
            "--Endpoint",
            "custom.example.test",
        ])
        .assert()
        .success();

    let store = std::fs::read_to_string(temp.path().join("endpoints")).unwrap();
    assert!(store.contains("ecs.cn-hangzhou=custom.example.test"));
}

#[test]
fn unknown_output_format_rejected() {
    let temp = TempDir::new().unwrap();
    cirrus(&temp)
        .args(["ecs", "StartInstance", "--InstanceId", "i-1", "--output", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn unknown_flag_warns_but_proceeds_to_validation() {
    let temp = TempDir::new().unwrap();
    // The typo'd flag is reported, then the invocation still fails on
    // the missing credentials rather than on the unknown key.
    cirrus(&temp)
        .args(["ecs", "StartInstance", "--InstanceId", "i-1", "--Typo", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parameter '--Typo'"))
        .stderr(predicate::str::contains("access key"));
}
