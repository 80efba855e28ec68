//! Core domain model for linernotes.
//!
//! This crate defines the row and catalog types that flow through an
//! enrichment run, the credential store for the catalog API, and the
//! run-scoped cache abstraction used by the resolvers.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod credentials;
pub mod error;
pub mod model;

pub use cache::{Cache, MemoryCache};
pub use credentials::Credentials;
pub use error::{Error, Result};
