//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `config`: Application configuration and settings
//! - `error`: Error type for the HTTP surface
//! - `http`: Outbound HTTP client
//! - `metrics`: Prometheus metrics helpers

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
