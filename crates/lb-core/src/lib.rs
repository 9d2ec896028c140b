//! # lb-core
//!
//! Core types and utilities for LightBnB RS.
//!
//! This crate provides the foundational building blocks used across the other crates:
//! - The application error taxonomy
//! - Shared identifier and money types
//! - Configuration loading

pub mod error;
pub mod types;
pub mod config;

pub use error::*;
pub use types::*;
