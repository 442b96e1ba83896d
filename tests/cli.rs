// ABOUTME: Integration tests for the ec2sh CLI commands.
// ABOUTME: Validates --help output, init behavior, and early ssh failures.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn ec2sh_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ec2sh"));
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_shows_commands() {
    let home = tempfile::tempdir().unwrap();

    ec2sh_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ssh"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn ssh_help_describes_destination() {
    let home = tempfile::tempdir().unwrap();

    ec2sh_cmd(home.path())
        .args(["ssh", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILTER_TAG"))
        .stdout(predicate::str::contains("--private"));
}

#[test]
fn init_creates_config_file() {
    let home = tempfile::tempdir().unwrap();
    let config_path = home.path().join(".ec2sh.yml");

    ec2sh_cmd(home.path())
        .args(["init", "config"])
        .assert()
        .success();

    assert!(config_path.exists(), ".ec2sh.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("login_name: ec2-user"));
}

#[test]
fn init_honors_explicit_config_path() {
    let home = tempfile::tempdir().unwrap();
    let config_path = home.path().join("conf").join("ec2sh.yml");

    ec2sh_cmd(home.path())
        .args(["init", "config", "--config"])
        .arg(&config_path)
        .assert()
        .success();

    assert!(config_path.exists());
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let home = tempfile::tempdir().unwrap();
    let config_path = home.path().join(".ec2sh.yml");
    fs::write(&config_path, "region: us-east-1\n").unwrap();

    ec2sh_cmd(home.path())
        .args(["init", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        "region: us-east-1\n"
    );
}

#[test]
fn init_force_overwrites_existing_config() {
    let home = tempfile::tempdir().unwrap();
    let config_path = home.path().join(".ec2sh.yml");
    fs::write(&config_path, "region: us-east-1\n").unwrap();

    ec2sh_cmd(home.path())
        .args(["init", "config", "--force"])
        .assert()
        .success();

    assert!(
        fs::read_to_string(&config_path)
            .unwrap()
            .contains("identity_file")
    );
}

#[test]
fn init_profile_creates_credentials_file() {
    let home = tempfile::tempdir().unwrap();
    let credentials = home.path().join(".aws").join("credentials");

    ec2sh_cmd(home.path())
        .args(["init", "profile"])
        .assert()
        .success();

    let content = fs::read_to_string(&credentials).unwrap();
    assert!(content.starts_with("[default]"));
    assert!(content.contains("aws_access_key_id"));
}

#[test]
fn init_profile_refuses_to_overwrite_credentials() {
    let home = tempfile::tempdir().unwrap();
    let aws_dir = home.path().join(".aws");
    fs::create_dir(&aws_dir).unwrap();
    fs::write(aws_dir.join("credentials"), "[work]\n").unwrap();

    ec2sh_cmd(home.path())
        .args(["init", "profile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(aws_dir.join("credentials")).unwrap(),
        "[work]\n"
    );
}

#[test]
fn ssh_with_missing_key_fails_before_contacting_aws() {
    let home = tempfile::tempdir().unwrap();
    let missing_key = home.path().join("no_such_key");

    ec2sh_cmd(home.path())
        .args(["ssh", "--region", "us-east-1", "-i"])
        .arg(&missing_key)
        .arg("web")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unable to read private key"));
}

#[test]
fn ssh_with_missing_explicit_config_fails() {
    let home = tempfile::tempdir().unwrap();

    ec2sh_cmd(home.path())
        .args(["ssh", "--config"])
        .arg(home.path().join("missing.yml"))
        .arg("web")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn ssh_rejects_malformed_filter_tag() {
    let home = tempfile::tempdir().unwrap();

    ec2sh_cmd(home.path())
        .args(["ssh", "Role:"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("filter tag value cannot be empty"));
}
