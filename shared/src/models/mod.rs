//! Domain models for the Factory Inventory Management Platform

mod batch;
mod ledger;
mod material;
mod user;

pub use batch::*;
pub use ledger::*;
pub use material::*;
pub use user::*;
