//! Template outputs as reported by `terraform output -json`.
//!
//! Pure parsing and rendering only.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single named output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    /// Raw JSON value.
    pub value: Value,
    /// Whether the template marked the output `sensitive = true`.
    #[serde(default)]
    pub sensitive: bool,
}

impl OutputValue {
    /// Plain (non-sensitive) output wrapping `value`.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            sensitive: false,
        }
    }

    /// Render the way `terraform output -raw` does: strings unquoted,
    /// scalars via `Display`, null as empty, compound values as compact JSON.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            compound => compound.to_string(),
        }
    }

    /// `null`, `""`, `[]` and `{}` are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Rendering safe for logs and failure messages.
    #[must_use]
    pub fn display(&self) -> String {
        if self.sensitive {
            "(sensitive)".to_string()
        } else {
            format!("{:?}", self.render())
        }
    }
}

/// All outputs of an applied template, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputSet {
    outputs: BTreeMap<String, OutputValue>,
}

impl OutputSet {
    /// Parse the document printed by `terraform output -json`.
    ///
    /// An empty document (no outputs declared, or nothing applied yet) is an
    /// empty set; Terraform prints `{}` in that case but older versions print
    /// nothing at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object of outputs.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let outputs: BTreeMap<String, OutputValue> =
            serde_json::from_slice(bytes).context("parsing terraform output -json")?;
        Ok(Self { outputs })
    }

    /// Look up an output by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    /// Rendered value of an output, as `terraform output -raw <name>` prints it.
    #[must_use]
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(OutputValue::render)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OutputValue) {
        self.outputs.insert(name.into(), value);
    }

    /// Take one output out of the set.
    pub fn remove(&mut self, name: &str) -> Option<OutputValue> {
        self.outputs.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl FromIterator<(String, OutputValue)> for OutputSet {
    fn from_iter<I: IntoIterator<Item = (String, OutputValue)>>(iter: I) -> Self {
        Self {
            outputs: iter.into_iter().collect(),
        }
    }
}
