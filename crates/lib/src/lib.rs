//! bindisc-lib: resource binding discovery
//!
//! This crate associates named binding types with resources selected by
//! query strings, and keeps the associations in an external key-value store:
//! - `BindingType`: a named schema with optional parameters
//! - `ResourceBinding`: an immutable query to type association
//! - `BindingIndex`: reverse indices by query and by type
//! - `PersistenceAdapter`: maps bindings, types and indices onto the store
//! - `Discovery`: the CRUD facade tying the pieces together

pub mod binding;
pub mod binding_type;
pub mod consts;
pub mod discovery;
pub mod error;
pub mod index;
pub mod paths;
pub mod persistence;
pub mod resource;
pub mod store;

pub use binding::{BindingFilter, BindingId, ResourceBinding};
pub use binding_type::{BindingParameter, BindingType, IntoBindingType};
pub use discovery::Discovery;
pub use error::{DiscoveryError, Result};
pub use resource::{MemoryRepository, RepositoryError, Resource, ResourceRepository};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
