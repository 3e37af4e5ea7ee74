//! Infrastructure adapters: search engine, HTTP surface and telemetry.

pub mod elastic;
pub mod error;
pub mod http;
pub mod telemetry;
