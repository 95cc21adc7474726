//! HTTP Layer - Gateway 服务器

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, PROXY_FAILURE_MESSAGE};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
