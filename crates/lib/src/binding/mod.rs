//! Resource bindings.
//!
//! A binding associates a query, interpreted by a resource repository, with
//! a [`BindingType`](crate::binding_type::BindingType) and a set of
//! parameter values. Bindings never change after construction; replacing one
//! means removing it and inserting a new one.
//!
//! # Resolution
//!
//! - Eager bindings carry the resources they were built with.
//! - Lazy bindings ask the repository every time their resources are read.
//!
//! # Submodules
//!
//! - [`filter`] - Query/type/parameter predicates used for lookup and removal

pub mod filter;
mod types;

pub use filter::BindingFilter;
pub use types::*;
