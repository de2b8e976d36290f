//! Loads YAML suite files from disk.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{OutputCheck, ProvisioningConfig, SuiteFile};

/// Reads suite files and resolves their relative paths.
pub struct YamlSuiteStore;

impl YamlSuiteStore {
    /// Load the suite at `path` into a config and its checks.
    ///
    /// Relative `template_dir` and `var_files` entries are resolved against
    /// the directory containing the suite file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the suite is invalid.
    pub fn load(&self, path: &Path) -> Result<(ProvisioningConfig, Vec<OutputCheck>)> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let parts = SuiteFile::parse(&content)
            .and_then(|suite| suite.into_parts(base_dir))
            .with_context(|| format!("cannot load suite {}", path.display()))?;
        tracing::debug!(suite = %path.display(), checks = parts.1.len(), "suite loaded");
        Ok(parts)
    }
}
