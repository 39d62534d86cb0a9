//! Business logic services for the Factory Inventory Management Platform

pub mod auth;
pub mod material;
pub mod stock;
pub mod user;

pub use auth::AuthService;
pub use material::MaterialService;
pub use stock::StockLedgerService;
pub use user::UserService;
