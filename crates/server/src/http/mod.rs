use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{Deployment, routes};

pub fn router(deployment: Deployment) -> Router {
    let api_routes = Router::new()
        .merge(routes::tasks::router(&deployment))
        .merge(routes::reminders::router())
        .merge(routes::stats::router())
        .merge(routes::email::router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(deployment)
}
