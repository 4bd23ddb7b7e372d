// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::http;
pub use infrastructure::metrics;

// Domain layer
pub mod codec;
pub mod event;
pub mod mailer;
pub mod pipeline;
pub mod template;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;

// Supporting modules
pub mod telemetry;
