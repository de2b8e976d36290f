//! Provisioning configuration and Terraform variable rendering.
//!
//! Pure functions only - no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::domain::error::HarnessError;

/// Value of a template input variable.
pub type VarValue = Value;

// ── Config ───────────────────────────────────────────────────────────────────

/// Template directory plus everything needed to apply it.
///
/// Immutable once built; construct with [`ProvisioningConfig::builder`].
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningConfig {
    template_dir: PathBuf,
    vars: BTreeMap<String, VarValue>,
    env: BTreeMap<String, String>,
    var_files: Vec<PathBuf>,
    no_color: bool,
    lock: bool,
    upgrade: bool,
}

impl ProvisioningConfig {
    /// Start building a config for the template at `template_dir`.
    pub fn builder(template_dir: impl Into<PathBuf>) -> ProvisioningConfigBuilder {
        ProvisioningConfigBuilder {
            config: Self {
                template_dir: template_dir.into(),
                vars: BTreeMap::new(),
                env: BTreeMap::new(),
                var_files: Vec::new(),
                no_color: true,
                lock: true,
                upgrade: false,
            },
        }
    }

    #[must_use]
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    #[must_use]
    pub fn vars(&self) -> &BTreeMap<String, VarValue> {
        &self.vars
    }

    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    #[must_use]
    pub fn var_files(&self) -> &[PathBuf] {
        &self.var_files
    }

    #[must_use]
    pub fn no_color(&self) -> bool {
        self.no_color
    }

    #[must_use]
    pub fn lock(&self) -> bool {
        self.lock
    }

    #[must_use]
    pub fn upgrade(&self) -> bool {
        self.upgrade
    }

    /// `-var name=value` pairs in key order, so argv is deterministic.
    ///
    /// Var files are not included: their paths are relative to the caller,
    /// while the engine runs inside the template directory.
    #[must_use]
    pub fn var_args(&self) -> Vec<String> {
        self.vars
            .iter()
            .flat_map(|(name, value)| ["-var".to_string(), format!("{name}={}", render_var(value))])
            .collect()
    }
}

/// Builder for [`ProvisioningConfig`].
#[derive(Debug, Clone)]
pub struct ProvisioningConfigBuilder {
    config: ProvisioningConfig,
}

impl ProvisioningConfigBuilder {
    /// Set an input variable. A later call with the same name wins.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.config.vars.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<VarValue>,
    {
        self.config
            .vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Extra environment for every engine invocation (e.g. `ARM_SUBSCRIPTION_ID`).
    #[must_use]
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn var_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.var_files.push(path.into());
        self
    }

    #[must_use]
    pub fn no_color(mut self, no_color: bool) -> Self {
        self.config.no_color = no_color;
        self
    }

    #[must_use]
    pub fn lock(mut self, lock: bool) -> Self {
        self.config.lock = lock;
        self
    }

    #[must_use]
    pub fn upgrade(mut self, upgrade: bool) -> Self {
        self.config.upgrade = upgrade;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if the template directory is empty or a
    /// variable name is not a valid Terraform identifier.
    pub fn build(self) -> Result<ProvisioningConfig, HarnessError> {
        if self.config.template_dir.as_os_str().is_empty() {
            return Err(HarnessError::Config(
                "template directory must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.config.vars.keys().find(|k| !is_identifier(k)) {
            return Err(HarnessError::Config(format!(
                "invalid variable name '{bad}': must match ^[A-Za-z_][A-Za-z0-9_-]*$"
            )));
        }
        Ok(self.config)
    }
}

// ── Validators / rendering ───────────────────────────────────────────────────

/// Terraform identifier: a letter or underscore, then letters, digits,
/// underscores or dashes.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Render a variable value for `-var name=<value>`.
///
/// Top-level strings are passed raw; everything else is written as an HCL
/// expression so lists and maps reach the template with their types intact.
#[must_use]
pub fn render_var(value: &VarValue) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => to_hcl(other),
    }
}

fn to_hcl(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escaping is valid HCL string escaping.
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(to_hcl).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", Value::String(k.clone()), to_hcl(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Parse a `name=value` CLI pair. The value is taken verbatim as a string.
///
/// # Errors
///
/// Returns `HarnessError::Config` if there is no `=` or the name is empty.
pub fn parse_key_value(pair: &str) -> Result<(String, String), HarnessError> {
    match pair.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(HarnessError::Config(format!(
            "expected NAME=VALUE, got '{pair}'"
        ))),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
