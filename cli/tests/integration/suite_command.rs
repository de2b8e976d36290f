//! End-to-end `tfverify suite` against the scripted terraform.

#![allow(clippy::expect_used)]

use std::fs;

use predicates::prelude::*;

use crate::support::{FakeTerraform, KEY_VAULT_OUTPUTS};

const SUITE: &str = r"
template_dir: basic
vars:
  key_vault_name: test-cert-vault
  location: eastus
  resource_group_name: test-rg
checks:
  - output: key_vault_name
    equals: test-cert-vault
  - output: self_signed_certificate_id
    matches: '^https://test-cert-vault\.vault\.azure\.net/certificates/'
";

#[test]
fn test_suite_resolves_template_dir_against_file() {
    let fake = FakeTerraform::new();
    let suite = fake.root().join("kv.suite.yaml");
    fs::write(&suite, SUITE).expect("write suite");

    fake.command(KEY_VAULT_OUTPUTS)
        .arg("suite")
        .arg(&suite)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 check(s) passed"));

    let apply = &fake.calls()[2];
    assert!(
        apply.contains(&format!("-chdir={}", fake.template_dir.display())),
        "got: {apply}"
    );
}

#[test]
fn test_suite_equals_mismatch_fails() {
    let fake = FakeTerraform::new();
    let suite = fake.root().join("kv.suite.yaml");
    fs::write(&suite, SUITE.replace("equals: test-cert-vault", "equals: other-vault"))
        .expect("write suite");

    let output = fake
        .command(KEY_VAULT_OUTPUTS)
        .args(["--json", "suite"])
        .arg(&suite)
        .output()
        .expect("spawn");

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["error"]["code"], "ASSERTION");
    assert_eq!(fake.steps().last().map(String::as_str), Some("destroy"));
}

#[test]
fn test_suite_unknown_key_rejected_before_terraform() {
    let fake = FakeTerraform::new();
    let suite = fake.root().join("bad.suite.yaml");
    fs::write(&suite, "template_dir: basic\nchecks: []\nworkspace: prod\n").expect("write");

    fake.command(KEY_VAULT_OUTPUTS)
        .arg("suite")
        .arg(&suite)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("workspace"));

    assert!(fake.steps().is_empty());
}

#[test]
fn test_suite_missing_file() {
    let fake = FakeTerraform::new();
    fake.command(KEY_VAULT_OUTPUTS)
        .arg("suite")
        .arg(fake.root().join("absent.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn test_suite_given_as_relative_path_passes_absolute_var_file() {
    let fake = FakeTerraform::new();
    fs::write(
        fake.root().join("kv.suite.yaml"),
        format!("{SUITE}var_files:\n  - prod.tfvars\n"),
    )
    .expect("write suite");
    fs::write(fake.root().join("prod.tfvars"), "location = \"eastus\"\n").expect("tfvars");

    fake.command(KEY_VAULT_OUTPUTS)
        .current_dir(fake.root())
        .args(["suite", "kv.suite.yaml"])
        .assert()
        .success();

    let root = fs::canonicalize(fake.root()).expect("canonical root");
    let apply = &fake.calls()[2];
    assert!(apply.contains("-chdir=basic apply"), "got: {apply}");
    assert!(
        apply.contains(&format!("-var-file={}", root.join("prod.tfvars").display())),
        "got: {apply}"
    );
}
