//! Unit tests for `TerraformEngine`.
//!
//! These tests verify that `TerraformEngine` builds the correct CLI argument
//! lists and environment for each step, and that non-zero exits surface
//! stderr with the step as context.

#![allow(clippy::expect_used)]

use std::time::Duration;

use anyhow::bail;
use tfverify::application::ports::ProvisioningEngine;
use tfverify::domain::ProvisioningConfig;
use tfverify::infra::command_runner::{DEFAULT_CMD_TIMEOUT, DEFAULT_PROVISION_TIMEOUT};
use tfverify::infra::terraform::TerraformEngine;

use crate::mocks::{MockCommandRunner, basic_config, err_output, ok_output};

fn engine(runner: &MockCommandRunner) -> TerraformEngine<MockCommandRunner> {
    TerraformEngine::new(runner.clone(), "terraform")
}

// ── init / apply / destroy argv ───────────────────────────────────────────────

#[tokio::test]
async fn test_init_args() {
    let runner = MockCommandRunner::new_ok();
    engine(&runner).init(&basic_config()).await.expect("init");

    let calls = runner.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "terraform");
    assert_eq!(
        calls[0].args,
        ["-chdir=fixtures/basic", "init", "-input=false", "-no-color"]
    );
    assert_eq!(calls[0].timeout, DEFAULT_PROVISION_TIMEOUT);
}

#[tokio::test]
async fn test_init_upgrade_flag() {
    let runner = MockCommandRunner::new_ok();
    let cfg = ProvisioningConfig::builder("t")
        .upgrade(true)
        .no_color(false)
        .build()
        .expect("config");
    engine(&runner).init(&cfg).await.expect("init");
    assert_eq!(
        runner.recorded_calls()[0].args,
        ["-chdir=t", "init", "-input=false", "-upgrade"]
    );
}

#[tokio::test]
async fn test_apply_args_include_sorted_vars() {
    let runner = MockCommandRunner::new_ok();
    engine(&runner).apply(&basic_config()).await.expect("apply");

    assert_eq!(
        runner.recorded_calls()[0].args,
        [
            "-chdir=fixtures/basic",
            "apply",
            "-input=false",
            "-auto-approve",
            "-no-color",
            "-var",
            "key_vault_name=test-cert-vault",
            "-var",
            "location=eastus",
            "-var",
            "resource_group_name=test-rg",
        ]
    );
}

#[tokio::test]
async fn test_destroy_uses_same_vars_as_apply() {
    let runner = MockCommandRunner::new_ok();
    let eng = engine(&runner);
    eng.apply(&basic_config()).await.expect("apply");
    eng.destroy(&basic_config()).await.expect("destroy");

    let calls = runner.recorded_calls();
    assert_eq!(calls[1].args[1], "destroy");
    assert_eq!(calls[0].args[2..], calls[1].args[2..]);
}

#[tokio::test]
async fn test_lock_disabled_adds_flag() {
    let runner = MockCommandRunner::new_ok();
    let cfg = ProvisioningConfig::builder("t")
        .lock(false)
        .build()
        .expect("config");
    engine(&runner).apply(&cfg).await.expect("apply");
    assert!(
        runner.recorded_calls()[0]
            .args
            .contains(&"-lock=false".to_string())
    );
}

#[tokio::test]
async fn test_env_includes_automation_and_config_env() {
    let runner = MockCommandRunner::new_ok();
    let cfg = ProvisioningConfig::builder("t")
        .env("ARM_SUBSCRIPTION_ID", "00000000-0000-0000-0000-000000000000")
        .build()
        .expect("config");
    engine(&runner).apply(&cfg).await.expect("apply");

    let env = &runner.recorded_calls()[0].env;
    assert!(env.contains(&("TF_IN_AUTOMATION".to_string(), "1".to_string())));
    assert!(env.contains(&(
        "ARM_SUBSCRIPTION_ID".to_string(),
        "00000000-0000-0000-0000-000000000000".to_string()
    )));
}

#[tokio::test]
async fn test_provision_timeout_override() {
    let runner = MockCommandRunner::new_ok();
    TerraformEngine::new(runner.clone(), "tofu")
        .with_provision_timeout(Duration::from_secs(5))
        .apply(&basic_config())
        .await
        .expect("apply");
    let call = &runner.recorded_calls()[0];
    assert_eq!(call.program, "tofu");
    assert_eq!(call.timeout, Duration::from_secs(5));
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nonzero_exit_carries_step_and_stderr() {
    let runner = MockCommandRunner::with(|_| {
        Ok(err_output(b"Error: \"mars\" was not found in the list of supported Azure Locations\n"))
    });
    let err = engine(&runner)
        .apply(&basic_config())
        .await
        .expect_err("should fail");
    let msg = format!("{err:#}");
    assert!(msg.contains("terraform apply failed"), "got: {msg}");
    assert!(msg.contains("supported Azure Locations"), "got: {msg}");
}

#[tokio::test]
async fn test_spawn_error_gets_step_context() {
    let runner = MockCommandRunner::with(|_| bail!("failed to spawn terraform"));
    let err = engine(&runner)
        .destroy(&basic_config())
        .await
        .expect_err("should fail");
    let msg = format!("{err:#}");
    assert!(msg.starts_with("terraform destroy"), "got: {msg}");
    assert!(msg.contains("failed to spawn"), "got: {msg}");
}

// ── Outputs ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_outputs_parses_json_document() {
    let runner = MockCommandRunner::with(|_| {
        Ok(ok_output(
            br#"{"key_vault_name":{"sensitive":false,"type":"string","value":"test-cert-vault"}}"#,
        ))
    });
    let outputs = engine(&runner)
        .outputs(&basic_config())
        .await
        .expect("outputs");

    assert_eq!(
        outputs.get_string("key_vault_name").as_deref(),
        Some("test-cert-vault")
    );
    let call = &runner.recorded_calls()[0];
    assert_eq!(
        call.args,
        ["-chdir=fixtures/basic", "output", "-no-color", "-json"]
    );
    assert_eq!(call.timeout, DEFAULT_CMD_TIMEOUT);
}

const OUTPUT_DOCUMENT: &[u8] = br#"{
  "key_vault_name": {"sensitive": false, "type": "string", "value": "test-cert-vault"},
  "admin_password": {"sensitive": true, "type": "string", "value": "hunter2"}
}"#;

#[tokio::test]
async fn test_single_output_reads_from_full_document() {
    let runner = MockCommandRunner::with(|_| Ok(ok_output(OUTPUT_DOCUMENT)));
    let value = engine(&runner)
        .output(&basic_config(), "key_vault_name")
        .await
        .expect("output")
        .expect("present");
    assert_eq!(value.render(), "test-cert-vault");
    assert_eq!(
        runner.recorded_calls()[0].args,
        ["-chdir=fixtures/basic", "output", "-no-color", "-json"]
    );
}

#[tokio::test]
async fn test_single_output_keeps_sensitive_marker() {
    let runner = MockCommandRunner::with(|_| Ok(ok_output(OUTPUT_DOCUMENT)));
    let value = engine(&runner)
        .output(&basic_config(), "admin_password")
        .await
        .expect("output")
        .expect("present");
    assert!(value.sensitive);
    assert_eq!(value.display(), "(sensitive)");
}

#[tokio::test]
async fn test_single_output_absent_is_none() {
    let runner = MockCommandRunner::with(|_| Ok(ok_output(OUTPUT_DOCUMENT)));
    let value = engine(&runner)
        .output(&basic_config(), "nope")
        .await
        .expect("lookup");
    assert!(value.is_none());
}

// ── Var files ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_relative_var_file_resolved_against_caller_not_template() {
    let runner = MockCommandRunner::new_ok();
    // What a suite at `fixtures/kv.suite.yaml` with `var_files: [prod.tfvars]`
    // produces once joined with the suite directory.
    let cfg = ProvisioningConfig::builder("fixtures/basic")
        .var_file("fixtures/prod.tfvars")
        .build()
        .expect("config");
    engine(&runner).apply(&cfg).await.expect("apply");

    let expected = std::env::current_dir()
        .expect("cwd")
        .join("fixtures/prod.tfvars");
    let args = &runner.recorded_calls()[0].args;
    assert!(
        args.contains(&format!("-var-file={}", expected.display())),
        "got: {args:?}"
    );
    assert!(!args.contains(&"-var-file=fixtures/prod.tfvars".to_string()));
}

#[tokio::test]
async fn test_absolute_var_file_unchanged_and_before_vars() {
    let runner = MockCommandRunner::new_ok();
    let cfg = ProvisioningConfig::builder("t")
        .var("location", "eastus")
        .var_file("/etc/tfverify/prod.tfvars")
        .build()
        .expect("config");
    engine(&runner).destroy(&cfg).await.expect("destroy");
    assert_eq!(
        runner.recorded_calls()[0].args[5..],
        ["-var-file=/etc/tfverify/prod.tfvars", "-var", "location=eastus"]
    );
}

// ── Preflight ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_preflight_missing_template_dir() {
    let runner = MockCommandRunner::new_ok();
    let cfg = ProvisioningConfig::builder("/nonexistent/template")
        .build()
        .expect("config");
    let err = engine(&runner)
        .preflight(&cfg)
        .await
        .expect_err("missing dir");
    assert!(err.to_string().contains("/nonexistent/template"), "got: {err}");
    assert!(runner.recorded_calls().is_empty());
}

#[tokio::test]
async fn test_preflight_checks_engine_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let runner = MockCommandRunner::with(|args| {
        if args.len() == 1 && args[0] == "version" {
            Ok(ok_output(b"Terraform v1.9.8\non linux_amd64\n"))
        } else {
            bail!("unexpected call {args:?}")
        }
    });
    let cfg = ProvisioningConfig::builder(dir.path())
        .build()
        .expect("config");
    let eng = engine(&runner);
    eng.preflight(&cfg).await.expect("preflight");
    assert_eq!(eng.version().await.expect("version"), "Terraform v1.9.8");
}

#[tokio::test]
async fn test_preflight_unusable_binary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let runner = MockCommandRunner::with(|_| bail!("failed to spawn terraform"));
    let cfg = ProvisioningConfig::builder(dir.path())
        .build()
        .expect("config");
    let err = engine(&runner)
        .preflight(&cfg)
        .await
        .expect_err("no binary");
    assert!(err.to_string().contains("not usable"), "got: {err}");
}

#[tokio::test]
async fn test_steps_follow_call_order() {
    let runner = MockCommandRunner::new_ok();
    let eng = engine(&runner);
    let cfg = basic_config();
    eng.init(&cfg).await.expect("init");
    eng.apply(&cfg).await.expect("apply");
    eng.destroy(&cfg).await.expect("destroy");
    assert_eq!(runner.steps(), ["init", "apply", "destroy"]);
}
