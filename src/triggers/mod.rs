//! Inbound surfaces that feed stream envelopes into the pipeline.

mod http;
mod redis;

pub use http::{invoke, InvokeResponse};
pub use redis::RedisTrigger;
