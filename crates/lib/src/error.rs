//! Error types for bindisc-lib

use thiserror::Error;

use crate::binding::BindingId;
use crate::resource::RepositoryError;
use crate::store::StoreError;

/// Errors that can occur in discovery operations
#[derive(Debug, Error)]
pub enum DiscoveryError {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("binding type {0} is already defined")]
  DuplicateType(String),

  #[error("binding type {0} is not defined")]
  NoSuchType(String),

  #[error("binding type {type_name} has no parameter {parameter}")]
  NoSuchParameter { type_name: String, parameter: String },

  #[error("binding type {type_name} requires parameter {parameter}")]
  MissingParameter { type_name: String, parameter: String },

  /// An index references a binding whose stored value is gone. The in-memory
  /// state no longer matches the backend and cannot be repaired here.
  #[error("storage consistency violation: binding {id} is indexed but not stored")]
  StorageConsistency { id: BindingId },

  /// The ID counter, as stored or as implied by the indices, cannot advance
  /// without wrapping.
  #[error("binding id counter exhausted at {0}")]
  IdExhausted(u64),

  #[error("store error: {0}")]
  Store(#[from] StoreError),

  #[error("failed to encode stored value {key}: {source}")]
  Serialize {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to decode stored value {key}: {source}")]
  Deserialize {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("resource repository error: {0}")]
  Repository(#[from] RepositoryError),
}

pub type Result<T, E = DiscoveryError> = std::result::Result<T, E>;
