use axum::Router;

pub mod prices;
pub mod system;

/// Router for all pricing endpoints.
pub fn router() -> Router {
    Router::new().nest("/pricing/v1/prices", prices::router())
}
