//! Filesystem-backed resource repository.
//!
//! Resources are files under a root directory, named by their path relative
//! to the root with a leading `/` and `/` separators on every platform.
//! Queries are glob patterns in the same form.

use std::path::{Path, PathBuf};

use bindisc_lib::{RepositoryError, Resource, ResourceRepository, consts::DEFAULT_LANGUAGE};
use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct FsRepository {
  root: PathBuf,
}

impl FsRepository {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn matcher(query: &str) -> Result<GlobMatcher, RepositoryError> {
    let pattern = if query.starts_with('/') {
      query.to_string()
    } else {
      format!("/{}", query)
    };

    GlobBuilder::new(&pattern)
      .literal_separator(true)
      .build()
      .map(|glob| glob.compile_matcher())
      .map_err(|e| RepositoryError::InvalidQuery {
        query: query.to_string(),
        message: e.to_string(),
      })
  }

  fn resource_path(&self, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(&self.root).ok()?;
    let parts: Vec<_> = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy().into_owned())
      .collect();
    if parts.is_empty() {
      return None;
    }
    Some(format!("/{}", parts.join("/")))
  }
}

impl ResourceRepository for FsRepository {
  fn find(&self, query: &str, language: &str) -> Result<Vec<Resource>, RepositoryError> {
    if language != DEFAULT_LANGUAGE {
      return Err(RepositoryError::UnsupportedLanguage(language.to_string()));
    }

    let matcher = Self::matcher(query)?;
    let mut resources = Vec::new();

    for entry in WalkDir::new(&self.root).sort_by_file_name() {
      let entry = entry.map_err(|e| RepositoryError::Resolve {
        query: query.to_string(),
        message: e.to_string(),
      })?;
      if !entry.file_type().is_file() {
        continue;
      }
      let Some(path) = self.resource_path(entry.path()) else {
        continue;
      };
      if matcher.is_match(&path) {
        trace!(path = %path, "matched resource");
        resources.push(Resource::new(path));
      }
    }

    resources.sort();
    debug!(query = %query, root = %self.root.display(), count = resources.len(), "resolved query");
    Ok(resources)
  }
}
