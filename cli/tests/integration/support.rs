//! Scripted terraform stand-in for end-to-end tests.
//!
//! The script appends each argv to a log file and answers from environment
//! variables, so every test gets an isolated fake without touching the
//! parent process environment.

#![allow(clippy::expect_used, dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_TF_LOG"
if [ "$1" = "version" ]; then
    echo "Terraform v1.9.8"
    exit 0
fi
case "$2" in
    apply)
        if [ -n "$FAKE_TF_APPLY_ERROR" ]; then
            echo "$FAKE_TF_APPLY_ERROR" >&2
            exit 1
        fi
        ;;
    output)
        printf '%s\n' "$FAKE_TF_OUTPUTS"
        ;;
    destroy)
        if [ -n "$FAKE_TF_DESTROY_ERROR" ]; then
            echo "$FAKE_TF_DESTROY_ERROR" >&2
            exit 1
        fi
        ;;
esac
exit 0
"#;

/// Outputs of a healthy key-vault apply, in `terraform output -json` shape.
pub const KEY_VAULT_OUTPUTS: &str = r#"{
  "key_vault_name": {"sensitive": false, "type": "string", "value": "test-cert-vault"},
  "self_signed_certificate_id": {"sensitive": false, "type": "string", "value": "https://test-cert-vault.vault.azure.net/certificates/self-signed/0123abcd"}
}"#;

pub struct FakeTerraform {
    root: TempDir,
    pub template_dir: PathBuf,
    binary: PathBuf,
    log: PathBuf,
}

impl FakeTerraform {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let template_dir = root.path().join("basic");
        fs::create_dir(&template_dir).expect("template dir");
        fs::write(template_dir.join("main.tf"), "# stand-in\n").expect("main.tf");

        let binary = root.path().join("terraform");
        fs::write(&binary, SCRIPT).expect("script");
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).expect("chmod");

        let log = root.path().join("calls.log");
        Self {
            root,
            template_dir,
            binary,
            log,
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// A `tfverify` command wired to this fake, answering with `outputs`.
    pub fn command(&self, outputs: &str) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfverify"));
        cmd.env("NO_COLOR", "1")
            .env("TFVERIFY_TERRAFORM_BIN", &self.binary)
            .env("FAKE_TF_LOG", &self.log)
            .env("FAKE_TF_OUTPUTS", outputs)
            .env_remove("RUST_LOG");
        cmd
    }

    /// Every recorded argv, one line per invocation.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Subcommands in call order (`version`, `init`, `apply`, ...).
    pub fn steps(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|line| {
                let mut words = line.split_whitespace();
                match words.next() {
                    Some(first) if first.starts_with("-chdir=") => {
                        words.next().unwrap_or_default().to_owned()
                    }
                    Some(first) => first.to_owned(),
                    None => String::new(),
                }
            })
            .collect()
    }
}
