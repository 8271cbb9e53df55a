//! Default locations for the on-disk store.
//!
//! The store file resolves in this order:
//! 1. `BINDISC_STORE` if set
//! 2. `{data_dir}/store.json`

use std::path::PathBuf;

use crate::consts::{APP_NAME, STORE_ENV_VAR, STORE_FILENAME};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir())
    .join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

pub fn store_path() -> PathBuf {
  if let Ok(path) = std::env::var(STORE_ENV_VAR) {
    return PathBuf::from(path);
  }

  data_dir().join(STORE_FILENAME)
}
