mod cmd;
mod output;
mod prompts;
mod repository;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{TypeCommand, cmd_bind, cmd_clear, cmd_find, cmd_type, cmd_unbind};
use output::{OutputFormat, print_error};

/// bindisc - Bind resource queries to typed, parameterized binding types
#[derive(Parser)]
#[command(name = "bindisc")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the store file (default: $BINDISC_STORE or the data directory)
  #[arg(long, global = true, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Directory that glob queries are resolved against (default: current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage binding types
  #[command(subcommand)]
  Type(TypeCommand),

  /// Bind a query to a binding type
  Bind {
    /// Resource query (a glob such as /app/*.css)
    query: String,

    /// Binding type name
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// Set a parameter value (name=value, value parsed as JSON)
    #[arg(long, value_name = "PARAM=VALUE")]
    set: Vec<String>,

    /// Query language
    #[arg(long)]
    language: Option<String>,
  },

  /// Remove bindings by id or by query, type and parameter values
  Unbind {
    /// Remove the binding with this id
    #[arg(long, conflicts_with_all = ["query", "type_name", "set"])]
    id: Option<u64>,

    /// Only bindings with exactly this query
    #[arg(long)]
    query: Option<String>,

    /// Only bindings of this type
    #[arg(long = "type", value_name = "TYPE")]
    type_name: Option<String>,

    /// Only bindings with this parameter value (name=value)
    #[arg(long, value_name = "PARAM=VALUE")]
    set: Vec<String>,
  },

  /// Find bindings
  Find {
    /// Only bindings with exactly this query
    #[arg(long)]
    query: Option<String>,

    /// Only bindings of this type
    #[arg(long = "type", value_name = "TYPE")]
    type_name: Option<String>,

    /// Only bindings with this parameter value (name=value)
    #[arg(long, value_name = "PARAM=VALUE")]
    set: Vec<String>,

    /// Resolve each binding's query and list its resources
    #[arg(long)]
    resolve: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Remove every type and binding from the store
  Clear {
    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let store = cli.store.unwrap_or_else(bindisc_lib::paths::store_path);
  let root = match cli.root {
    Some(root) => root,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  let root = dunce::canonicalize(&root).unwrap_or(root);

  match cli.command {
    Commands::Type(command) => cmd_type(command, &store, &root),
    Commands::Bind {
      query,
      type_name,
      set,
      language,
    } => cmd_bind(&query, &type_name, &set, language.as_deref(), &store, &root),
    Commands::Unbind {
      id,
      query,
      type_name,
      set,
    } => cmd_unbind(
      cmd::UnbindArgs {
        id,
        query,
        type_name,
        set,
      },
      &store,
      &root,
    ),
    Commands::Find {
      query,
      type_name,
      set,
      resolve,
      output,
    } => cmd_find(query, type_name, &set, resolve, output, &store, &root),
    Commands::Clear { force } => cmd_clear(force, &store, &root),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
