mod config;
mod handlers;
mod middleware;
mod routes;
mod types;


pub use config::ServerConfig;
pub use handlers::ApiState;
pub use routes::create_router;
pub use types::{ErrorResponse, HealthResponse};
