//! `bindisc type` subcommands: define, undefine and list binding types.

use std::path::Path;

use anyhow::{Context, Result};
use bindisc_lib::{BindingParameter, BindingType};
use clap::Subcommand;
use tracing::info;

use super::{open_discovery, parse_json_value};
use crate::output::{OutputFormat, format_value, print_info, print_json, print_stat, print_success};

#[derive(Subcommand, Debug)]
pub enum TypeCommand {
  /// Define a new binding type
  Define {
    /// Type name (must start with a letter)
    name: String,

    /// Declare a required parameter
    #[arg(long = "required", value_name = "PARAM")]
    required: Vec<String>,

    /// Declare an optional parameter, with an optional JSON default (name or name=value)
    #[arg(long = "param", value_name = "PARAM[=VALUE]")]
    params: Vec<String>,
  },

  /// Undefine a binding type and remove every binding of it
  Undefine {
    /// Type name
    name: String,
  },

  /// List defined binding types
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

pub fn cmd_type(command: TypeCommand, store: &Path, root: &Path) -> Result<()> {
  match command {
    TypeCommand::Define { name, required, params } => cmd_define(&name, &required, &params, store, root),
    TypeCommand::Undefine { name } => cmd_undefine(&name, store, root),
    TypeCommand::List { output } => cmd_list(output, store, root),
  }
}

fn optional_parameter(arg: &str) -> Result<BindingParameter> {
  let parameter = match arg.split_once('=') {
    Some((name, raw)) => BindingParameter::with_default(name, parse_json_value(raw)),
    None => BindingParameter::optional(arg),
  };
  parameter.with_context(|| format!("Invalid parameter: {}", arg))
}

fn cmd_define(name: &str, required: &[String], params: &[String], store: &Path, root: &Path) -> Result<()> {
  let mut parameters = Vec::with_capacity(required.len() + params.len());
  for param in required {
    let parameter =
      BindingParameter::required(param.as_str()).with_context(|| format!("Invalid parameter: {}", param))?;
    parameters.push(parameter);
  }
  for param in params {
    parameters.push(optional_parameter(param)?);
  }

  let binding_type = BindingType::new(name, parameters).with_context(|| format!("Invalid type: {}", name))?;

  let mut discovery = open_discovery(store, root)?;
  let defined = discovery
    .define_type(binding_type)
    .with_context(|| format!("Failed to define type: {}", name))?;

  info!(type_name = %defined.name(), "type defined");
  print_success(&format!("Defined type {}", defined.name()));
  Ok(())
}

fn cmd_undefine(name: &str, store: &Path, root: &Path) -> Result<()> {
  let mut discovery = open_discovery(store, root)?;
  let removed = discovery
    .undefine_type(name)
    .with_context(|| format!("Failed to undefine type: {}", name))?;

  print_success(&format!("Undefined type {}", name));
  print_stat("Bindings removed", &removed.to_string());
  Ok(())
}

fn cmd_list(output: OutputFormat, store: &Path, root: &Path) -> Result<()> {
  let mut discovery = open_discovery(store, root)?;
  let types = discovery.get_defined_types()?;

  if output.is_json() {
    let plain: Vec<&BindingType> = types.iter().map(|t| t.as_ref()).collect();
    return print_json(&plain);
  }

  if types.is_empty() {
    print_info("No types defined");
    return Ok(());
  }

  for binding_type in &types {
    println!("{}", binding_type.name());
    if !binding_type.has_parameters() {
      print_stat("parameters", "none");
    }
    for parameter in binding_type.parameters().values() {
      let detail = if parameter.is_required() {
        "required".to_string()
      } else {
        match parameter.default_value() {
          Some(value) => format!("default {}", format_value(value)),
          None => "optional".to_string(),
        }
      };
      print_stat(parameter.name(), &detail);
    }
  }

  Ok(())
}
