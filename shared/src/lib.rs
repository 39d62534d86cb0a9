//! Shared types and models for the Factory Inventory Management Platform
//!
//! This crate contains domain types shared between the backend server and
//! its test suites.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
