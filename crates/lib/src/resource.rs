//! Resources and the repository that resolves queries into them.
//!
//! The discovery core never interprets a query itself. Lazily resolved
//! bindings hand their query and language to a [`ResourceRepository`] each
//! time their resources are requested.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_LANGUAGE;

/// A resource selected by a query.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Resource {
  pub path: String,
}

impl Resource {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into() }
  }
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.path)
  }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("unsupported query language: {0}")]
  UnsupportedLanguage(String),

  #[error("invalid query {query}: {message}")]
  InvalidQuery { query: String, message: String },

  #[error("failed to resolve query {query}: {message}")]
  Resolve { query: String, message: String },
}

/// Resolves a query string in a query language into resources.
pub trait ResourceRepository: Send + Sync {
  fn find(&self, query: &str, language: &str) -> Result<Vec<Resource>, RepositoryError>;
}

/// Repository backed by a fixed table of query results.
///
/// Unknown queries resolve to an empty collection. Every call to
/// [`find`](ResourceRepository::find) is counted.
#[derive(Debug, Default)]
pub struct MemoryRepository {
  results: BTreeMap<(String, String), Vec<Resource>>,
  calls: AtomicUsize,
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register the result for `query` in the default language.
  pub fn with(self, query: &str, paths: &[&str]) -> Self {
    self.with_language(query, DEFAULT_LANGUAGE, paths)
  }

  pub fn with_language(mut self, query: &str, language: &str, paths: &[&str]) -> Self {
    let resources = paths.iter().map(|p| Resource::new(*p)).collect();
    self
      .results
      .insert((query.to_string(), language.to_string()), resources);
    self
  }

  /// Number of `find` calls served so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::Relaxed)
  }
}

impl ResourceRepository for MemoryRepository {
  fn find(&self, query: &str, language: &str) -> Result<Vec<Resource>, RepositoryError> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    Ok(
      self
        .results
        .get(&(query.to_string(), language.to_string()))
        .cloned()
        .unwrap_or_default(),
    )
  }
}
