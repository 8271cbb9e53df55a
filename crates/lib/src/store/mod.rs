//! Key-value backends.
//!
//! The discovery core only ever talks to a [`KeyValueStore`]. Values are
//! JSON documents so that any backend able to hold `serde_json::Value`
//! can persist bindings, types and index snapshots.
//!
//! # Submodules
//!
//! - [`memory`] - Volatile `BTreeMap` backend
//! - [`file`] - Single JSON file backend with atomic rewrites

pub mod file;
pub mod memory;

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Failed to read the backing file.
  #[error("failed to read store: {0}")]
  Read(#[source] io::Error),

  /// Failed to write the backing file.
  #[error("failed to write store: {0}")]
  Write(#[source] io::Error),

  /// Failed to create the directory holding the backing file.
  #[error("failed to create store directory: {0}")]
  CreateDir(#[source] io::Error),

  /// The backing file is not valid JSON.
  #[error("failed to parse store: {0}")]
  Parse(#[source] serde_json::Error),

  /// Failed to serialize the store contents.
  #[error("failed to serialize store: {0}")]
  Serialize(#[source] serde_json::Error),

  /// The backing file holds valid JSON that is not an object.
  #[error("store file {0} does not contain a JSON object")]
  NotAnObject(PathBuf),
}

/// A string-keyed map of JSON values.
///
/// Reads take `&self`; writes take `&mut self`. Implementations decide on
/// their own durability, but every call must be visible to the next read on
/// the same instance.
pub trait KeyValueStore {
  /// Returns the value stored under `key`, or `None` when absent.
  fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

  /// Stores `value` under `key`, replacing any previous value.
  fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

  /// Removes `key`. Removing an absent key is not an error.
  fn remove(&mut self, key: &str) -> Result<(), StoreError>;

  /// Returns whether `key` holds a value.
  fn exists(&self, key: &str) -> Result<bool, StoreError>;

  /// Removes every key.
  fn clear(&mut self) -> Result<(), StoreError>;

  /// Returns all keys in ascending order.
  fn keys(&self) -> Result<Vec<String>, StoreError>;

  /// Returns the value stored under `key`, or `default` when absent.
  fn get_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
    Ok(self.get(key)?.unwrap_or(default))
  }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
  fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    (**self).get(key)
  }

  fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
    (**self).set(key, value)
  }

  fn remove(&mut self, key: &str) -> Result<(), StoreError> {
    (**self).remove(key)
  }

  fn exists(&self, key: &str) -> Result<bool, StoreError> {
    (**self).exists(key)
  }

  fn clear(&mut self) -> Result<(), StoreError> {
    (**self).clear()
  }

  fn keys(&self) -> Result<Vec<String>, StoreError> {
    (**self).keys()
  }
}
