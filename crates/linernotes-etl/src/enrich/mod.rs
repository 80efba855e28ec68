//! Catalog enrichment components.

pub mod catalog;
pub mod engine;
pub mod genre;
pub mod session;
pub mod spotify;

#[cfg(test)]
pub(crate) mod testing;
