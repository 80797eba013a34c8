//! Shared utilities and common types for the Records API backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Common validation logic

pub mod validation;
