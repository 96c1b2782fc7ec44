//! HTTP handlers for the Metrify API

pub mod health;
pub mod import;
pub mod products;
pub mod reporting;
pub mod settings;
pub mod stock;

pub use health::*;
pub use import::*;
pub use products::*;
pub use reporting::*;
pub use settings::*;
pub use stock::*;
