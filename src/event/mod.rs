//! Inbound order events.
//!
//! - `envelope`: unwraps the stream trigger payload into an [`OrderEvent`]
//! - `types`: the order event model and its [`NotificationFlow`] classification

mod envelope;
mod types;

pub use envelope::{decode_envelope, DecodeError, Envelope, StreamData, StreamRecord};
pub use types::{NotificationFlow, OrderDetails, OrderEvent};
