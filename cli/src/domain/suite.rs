//! Suite file schema: a config and its checks in one YAML document.
//!
//! ```yaml
//! template_dir: fixtures/basic
//! vars:
//!   key_vault_name: test-cert-vault
//! checks:
//!   - output: key_vault_name
//!     not_empty: true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::check::{OutputCheck, Predicate};
use crate::domain::config::{ProvisioningConfig, VarValue};
use crate::domain::error::HarnessError;

/// Top-level suite document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteFile {
    /// Template directory; relative paths are resolved against the suite file.
    pub template_dir: PathBuf,
    #[serde(default)]
    pub vars: BTreeMap<String, VarValue>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub var_files: Vec<PathBuf>,
    #[serde(default)]
    pub upgrade: bool,
    #[serde(default = "default_lock")]
    pub lock: bool,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

fn default_lock() -> bool {
    true
}

/// One check entry. Exactly one predicate key must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSpec {
    pub output: String,
    #[serde(default)]
    pub not_empty: bool,
    #[serde(default)]
    pub equals: Option<String>,
    #[serde(default)]
    pub matches: Option<String>,
}

impl CheckSpec {
    /// Convert to an [`OutputCheck`].
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` unless exactly one predicate is given,
    /// or if a `matches` pattern does not compile.
    pub fn to_check(&self) -> Result<OutputCheck, HarnessError> {
        let predicate = match (self.not_empty, &self.equals, &self.matches) {
            (true, None, None) => Predicate::NotEmpty,
            (false, Some(expected), None) => Predicate::Equals(expected.clone()),
            (false, None, Some(pattern)) => Predicate::matches(pattern)?,
            _ => {
                return Err(HarnessError::Config(format!(
                    "check for output '{}' must set exactly one of: not_empty, equals, matches",
                    self.output
                )));
            }
        };
        Ok(OutputCheck::new(self.output.clone(), predicate))
    }
}

impl SuiteFile {
    /// Parse a suite document.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` on malformed YAML or unknown keys.
    pub fn parse(yaml: &str) -> Result<Self, HarnessError> {
        serde_yaml::from_str(yaml).map_err(|e| HarnessError::Config(format!("suite file: {e}")))
    }

    /// Build the config and checks, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if the config or any check is invalid.
    pub fn into_parts(
        self,
        base_dir: &Path,
    ) -> Result<(ProvisioningConfig, Vec<OutputCheck>), HarnessError> {
        let checks = self
            .checks
            .iter()
            .map(CheckSpec::to_check)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = ProvisioningConfig::builder(base_dir.join(&self.template_dir))
            .vars(self.vars)
            .lock(self.lock)
            .upgrade(self.upgrade);
        for file in &self.var_files {
            builder = builder.var_file(base_dir.join(file));
        }
        for (k, v) in self.env {
            builder = builder.env(k, v);
        }
        Ok((builder.build()?, checks))
    }
}
