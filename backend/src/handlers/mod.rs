//! HTTP handlers for the Factory Inventory Management Platform

pub mod auth;
pub mod health;
pub mod materials;
pub mod stock;
pub mod users;

pub use auth::*;
pub use health::*;
pub use materials::*;
pub use stock::*;
pub use users::*;
