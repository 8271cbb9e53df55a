use std::collections::BTreeMap;

use serde_json::Value;

use super::ResourceBinding;
use crate::error::{DiscoveryError, Result};

/// Selects bindings by exact query, type name and parameter values.
///
/// Unset criteria are unconstrained. A parameter criterion matches when the
/// binding's effective value (explicit or default) equals the given value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingFilter {
  pub query: Option<String>,
  pub type_name: Option<String>,
  pub parameters: BTreeMap<String, Value>,
}

impl BindingFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn query(mut self, query: impl Into<String>) -> Self {
    self.query = Some(query.into());
    self
  }

  pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
    self.type_name = Some(type_name.into());
    self
  }

  pub fn parameter(mut self, name: impl Into<String>, value: Value) -> Self {
    self.parameters.insert(name.into(), value);
    self
  }

  /// Reject criteria that can never be meaningful.
  pub fn validate(&self) -> Result<()> {
    if self.query.as_deref().is_some_and(str::is_empty) {
      return Err(DiscoveryError::InvalidArgument("query filter must not be empty".to_string()));
    }
    if self.type_name.as_deref().is_some_and(str::is_empty) {
      return Err(DiscoveryError::InvalidArgument(
        "type filter must not be empty".to_string(),
      ));
    }
    Ok(())
  }

  pub fn matches(&self, binding: &ResourceBinding) -> bool {
    if self.query.as_deref().is_some_and(|q| q != binding.query()) {
      return false;
    }
    if self.type_name.as_deref().is_some_and(|t| t != binding.type_name()) {
      return false;
    }
    self
      .parameters
      .iter()
      .all(|(name, expected)| matches!(binding.parameter_value(name), Ok(Some(actual)) if actual == expected))
  }
}
