//! Command line behaviour of the `jet-bundler` binary.

#[cfg(unix)]
mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn jet_bundler() -> Command {
    let mut cmd = Command::cargo_bin("jet-bundler").unwrap();
    cmd.env_remove("JET_HOME");
    cmd
}

#[test]
fn help_lists_subcommands() {
    jet_bundler()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("test-run"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    jet_bundler().assert().failure().code(2);
}

#[test]
fn malformed_property_is_rejected() {
    jet_bundler()
        .args(["-D", "jet.home", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn missing_configuration_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    jet_bundler()
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("jet-bundler.toml"));
}

#[test]
fn clean_with_output_dir_succeeds_without_configuration() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("out/build/lib")).unwrap();
    std::fs::create_dir_all(dir.path().join("out/app")).unwrap();

    jet_bundler()
        .current_dir(dir.path())
        .args(["--output-dir", "out", "clean"])
        .assert()
        .success();
    assert!(!dir.path().join("out/build").exists());
    assert!(!dir.path().join("out/app").exists());
}

#[cfg(unix)]
#[test]
fn unresolvable_toolchain_prints_hints() {
    let project = common::Project::new();
    let config = r#"
[project]
artifact_id = "hello"

[build]
main_jar = "target/hello.jar"
main_class = "com.example.Hello"
"#;
    std::fs::write(project.root().join("jet-bundler.toml"), config).unwrap();

    jet_bundler()
        .current_dir(project.root())
        .env("PATH", "/nonexistent")
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Excelsior JET installation not found"))
        .stderr(predicate::str::contains("hint:"));
}

#[cfg(unix)]
#[test]
fn build_prints_the_artifact_path() {
    let jet = common::FakeJet::new(common::PRO_32);
    let project = common::Project::new();
    project.write_config(&jet, "");

    jet_bundler()
        .current_dir(project.root())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.zip"));
    assert!(project.output().join("hello.zip").is_file());
}
