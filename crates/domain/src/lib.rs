//! Domain layer for the Records API backend.
//!
//! This crate contains:
//! - Domain models (Record and its create request)
//! - The record store abstraction used by the API layer

pub mod models;
pub mod services;
