use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binding_type::BindingType;
use crate::consts::DEFAULT_LANGUAGE;
use crate::error::{DiscoveryError, Result};
use crate::resource::{Resource, ResourceRepository};

/// Sequential identifier assigned to a binding when it is inserted.
///
/// IDs start at 1 and are never handed out twice by the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(pub u64);

impl BindingId {
  /// Backend key holding this binding.
  pub fn key(&self) -> String {
    self.0.to_string()
  }
}

impl fmt::Display for BindingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Where a binding gets its resources from.
#[derive(Clone)]
enum Resolution {
  /// Resources fixed at construction. Never empty.
  Eager(Vec<Resource>),
  /// Resolved through the repository on every access.
  Lazy(Arc<dyn ResourceRepository>),
}

impl fmt::Debug for Resolution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resolution::Eager(resources) => f.debug_tuple("Eager").field(resources).finish(),
      Resolution::Lazy(_) => f.write_str("Lazy"),
    }
  }
}

/// An immutable association between a query and a binding type.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
  query: String,
  language: String,
  binding_type: Arc<BindingType>,
  parameter_values: BTreeMap<String, Value>,
  resolution: Resolution,
}

impl ResourceBinding {
  /// Create a binding over resources that are already resolved.
  pub fn eager(
    query: impl Into<String>,
    resources: Vec<Resource>,
    binding_type: Arc<BindingType>,
    parameter_values: BTreeMap<String, Value>,
  ) -> Result<Self> {
    if resources.is_empty() {
      return Err(DiscoveryError::InvalidArgument(
        "an eager binding needs at least one resource".to_string(),
      ));
    }
    Self::build(query.into(), binding_type, parameter_values, Resolution::Eager(resources))
  }

  /// Create a binding whose resources are looked up in `repository` on
  /// demand.
  pub fn lazy(
    query: impl Into<String>,
    binding_type: Arc<BindingType>,
    parameter_values: BTreeMap<String, Value>,
    repository: Arc<dyn ResourceRepository>,
  ) -> Result<Self> {
    Self::build(query.into(), binding_type, parameter_values, Resolution::Lazy(repository))
  }

  fn build(
    query: String,
    binding_type: Arc<BindingType>,
    parameter_values: BTreeMap<String, Value>,
    resolution: Resolution,
  ) -> Result<Self> {
    if query.is_empty() {
      return Err(DiscoveryError::InvalidArgument("binding query must not be empty".to_string()));
    }
    binding_type.validate_values(&parameter_values)?;

    Ok(Self {
      query,
      language: DEFAULT_LANGUAGE.to_string(),
      binding_type,
      parameter_values,
      resolution,
    })
  }

  /// Set the query language, `glob` by default.
  pub fn with_language(mut self, language: impl Into<String>) -> Result<Self> {
    let language = language.into();
    if language.is_empty() {
      return Err(DiscoveryError::InvalidArgument("query language must not be empty".to_string()));
    }
    self.language = language;
    Ok(self)
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn language(&self) -> &str {
    &self.language
  }

  pub fn binding_type(&self) -> &Arc<BindingType> {
    &self.binding_type
  }

  pub fn type_name(&self) -> &str {
    self.binding_type.name()
  }

  pub fn is_lazy(&self) -> bool {
    matches!(self.resolution, Resolution::Lazy(_))
  }

  /// Values set on this binding, without defaults.
  pub fn explicit_parameter_values(&self) -> &BTreeMap<String, Value> {
    &self.parameter_values
  }

  /// Type defaults overlaid with the values set on this binding.
  pub fn parameter_values(&self) -> BTreeMap<String, Value> {
    let mut values = self.binding_type.default_values();
    values.extend(self.parameter_values.iter().map(|(k, v)| (k.clone(), v.clone())));
    values
  }

  /// The effective value of `name`, or `None` if it is neither set nor
  /// defaulted.
  pub fn parameter_value(&self, name: &str) -> Result<Option<&Value>> {
    let parameter = self.binding_type.parameter(name)?;
    Ok(self.parameter_values.get(name).or(parameter.default_value()))
  }

  /// The resources selected by this binding.
  ///
  /// Lazy bindings query the repository on every call.
  pub fn resources(&self) -> Result<Vec<Resource>> {
    match &self.resolution {
      Resolution::Eager(resources) => Ok(resources.clone()),
      Resolution::Lazy(repository) => Ok(repository.find(&self.query, &self.language)?),
    }
  }
}
