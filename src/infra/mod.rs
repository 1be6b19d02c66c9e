//! Infrastructure adapters and runtime bootstrap.

pub mod assets;
pub mod csrf;
pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
