mod app;
mod middleware;
mod state;

pub use app::create_app;
pub use middleware::API_KEY_HEADER;
pub use state::AppState;
