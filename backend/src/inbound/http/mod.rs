//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod not_found;
pub mod register;
pub mod state;
pub mod users;

pub use error::{ApiResult, json_config};
