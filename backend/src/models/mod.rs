//! Database models for the Factory Inventory Management Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
