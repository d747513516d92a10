//! Core business logic for Repasse.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `contract` - Lease contract data as supplied by the contract registry
//! - `settlement` - Rent settlement calculation engine and session controller
//! - `ports` - Contracts of the external collaborators the engine consumes

pub mod contract;
pub mod ports;
pub mod settlement;
