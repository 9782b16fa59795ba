use axum::{routing::get, Router};

pub mod replenishment;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/replenishment", replenishment::router())
}
