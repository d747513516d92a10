//! HTTP adapters for the settlement engine's collaborators.
//!
//! This crate provides:
//! - Contract registry client, with an optional in-memory cache
//! - Periodic calculation service client
//! - Settlement store client

pub mod cache;
pub mod calculation;
pub mod http;
pub mod registry;
pub mod store;

#[cfg(test)]
mod tests;

pub use cache::CachedContractRegistry;
pub use calculation::HttpPeriodicCalculation;
pub use http::{HttpCollaborator, build_client};
pub use registry::HttpContractRegistry;
pub use store::HttpSettlementStore;
