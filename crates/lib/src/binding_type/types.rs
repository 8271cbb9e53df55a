use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DiscoveryError, Result};

/// Characters allowed after the leading letter of a type name.
fn is_type_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':')
}

fn is_parameter_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

fn validate_name(kind: &str, name: &str, allowed: fn(char) -> bool) -> Result<()> {
  let mut chars = name.chars();
  match chars.next() {
    None => return Err(DiscoveryError::InvalidArgument(format!("{} name must not be empty", kind))),
    Some(first) if !first.is_ascii_alphabetic() => {
      return Err(DiscoveryError::InvalidArgument(format!(
        "{} name {:?} must start with a letter",
        kind, name
      )));
    }
    Some(_) => {}
  }

  if let Some(bad) = chars.find(|c| !allowed(*c)) {
    return Err(DiscoveryError::InvalidArgument(format!(
      "{} name {:?} contains invalid character {:?}",
      kind, name, bad
    )));
  }

  Ok(())
}

/// A parameter declared on a [`BindingType`].
///
/// Required parameters must be set by every binding of the type. Optional
/// parameters may carry a default that applies when a binding leaves them
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingParameter {
  name: String,
  required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  default: Option<Value>,
}

impl BindingParameter {
  pub fn required(name: impl Into<String>) -> Result<Self> {
    Self::build(name.into(), true, None)
  }

  pub fn optional(name: impl Into<String>) -> Result<Self> {
    Self::build(name.into(), false, None)
  }

  pub fn with_default(name: impl Into<String>, default: Value) -> Result<Self> {
    Self::build(name.into(), false, Some(default))
  }

  fn build(name: String, required: bool, default: Option<Value>) -> Result<Self> {
    let parameter = Self {
      name,
      required,
      default,
    };
    parameter.validate()?;
    Ok(parameter)
  }

  fn validate(&self) -> Result<()> {
    validate_name("parameter", &self.name, is_parameter_name_char)?;
    if self.required && self.default.is_some() {
      return Err(DiscoveryError::InvalidArgument(format!(
        "required parameter {} must not have a default value",
        self.name
      )));
    }
    Ok(())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_required(&self) -> bool {
    self.required
  }

  pub fn default_value(&self) -> Option<&Value> {
    self.default.as_ref()
  }
}

/// Serialized shape of a [`BindingType`]. Parameters are stored as a list
/// sorted by name; decoding goes back through [`BindingType::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingTypeDef {
  name: String,
  #[serde(default)]
  parameters: Vec<BindingParameter>,
}

/// A named binding schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BindingTypeDef", into = "BindingTypeDef")]
pub struct BindingType {
  name: String,
  parameters: BTreeMap<String, BindingParameter>,
}

impl BindingType {
  /// Create a type with the given parameters.
  ///
  /// Fails with [`DiscoveryError::InvalidArgument`] if the name does not
  /// start with a letter or a parameter name appears twice.
  pub fn new(name: impl Into<String>, parameters: Vec<BindingParameter>) -> Result<Self> {
    let name = name.into();
    validate_name("type", &name, is_type_name_char)?;

    let mut by_name = BTreeMap::new();
    for parameter in parameters {
      parameter.validate()?;
      if by_name.contains_key(parameter.name()) {
        return Err(DiscoveryError::InvalidArgument(format!(
          "parameter {} is declared twice on type {}",
          parameter.name(),
          name
        )));
      }
      by_name.insert(parameter.name().to_string(), parameter);
    }

    Ok(Self {
      name,
      parameters: by_name,
    })
  }

  /// Create a type without parameters.
  pub fn named(name: impl Into<String>) -> Result<Self> {
    Self::new(name, Vec::new())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Declared parameters keyed by name.
  pub fn parameters(&self) -> &BTreeMap<String, BindingParameter> {
    &self.parameters
  }

  pub fn parameter(&self, name: &str) -> Result<&BindingParameter> {
    self
      .parameters
      .get(name)
      .ok_or_else(|| DiscoveryError::NoSuchParameter {
        type_name: self.name.clone(),
        parameter: name.to_string(),
      })
  }

  pub fn has_parameter(&self, name: &str) -> bool {
    self.parameters.contains_key(name)
  }

  pub fn has_parameters(&self) -> bool {
    !self.parameters.is_empty()
  }

  /// Defaults of all optional parameters that declare one.
  pub fn default_values(&self) -> BTreeMap<String, Value> {
    self
      .parameters
      .values()
      .filter_map(|p| p.default_value().map(|v| (p.name.clone(), v.clone())))
      .collect()
  }

  /// Check `values` against the schema.
  ///
  /// Every key must name a declared parameter and every required parameter
  /// must be present.
  pub fn validate_values(&self, values: &BTreeMap<String, Value>) -> Result<()> {
    if let Some(unknown) = values.keys().find(|k| !self.parameters.contains_key(*k)) {
      return Err(DiscoveryError::NoSuchParameter {
        type_name: self.name.clone(),
        parameter: unknown.clone(),
      });
    }

    if let Some(missing) = self
      .parameters
      .values()
      .find(|p| p.is_required() && !values.contains_key(p.name()))
    {
      return Err(DiscoveryError::MissingParameter {
        type_name: self.name.clone(),
        parameter: missing.name.clone(),
      });
    }

    Ok(())
  }
}

impl TryFrom<BindingTypeDef> for BindingType {
  type Error = DiscoveryError;

  fn try_from(def: BindingTypeDef) -> Result<Self> {
    BindingType::new(def.name, def.parameters)
  }
}

impl From<BindingType> for BindingTypeDef {
  fn from(binding_type: BindingType) -> Self {
    Self {
      name: binding_type.name,
      parameters: binding_type.parameters.into_values().collect(),
    }
  }
}

/// Anything `define_type` accepts: a full type or just a name.
pub trait IntoBindingType {
  fn into_binding_type(self) -> Result<BindingType>;
}

impl IntoBindingType for BindingType {
  fn into_binding_type(self) -> Result<BindingType> {
    Ok(self)
  }
}

impl IntoBindingType for &str {
  fn into_binding_type(self) -> Result<BindingType> {
    BindingType::named(self)
  }
}

impl IntoBindingType for String {
  fn into_binding_type(self) -> Result<BindingType> {
    BindingType::named(self)
  }
}
