//! Binding types and their parameter schemas.
//!
//! A [`BindingType`] names a kind of binding and declares the parameters
//! bindings of that kind may carry. Type objects are immutable once built;
//! the facade shares them as `Arc<BindingType>`.
//!
//! # Submodules
//!
//! - [`registry`] - In-memory cache of loaded type objects

pub mod registry;
mod types;

pub use types::*;
