use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use crate::controllers::SongController;

pub mod root;
pub mod song;

pub use root::health_check_route;
pub use song::song_routes;

#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongController>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .merge(song_routes())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    let status = response.status();
                    match status.as_u16() {
                        400..=499 => tracing::warn!("{} ({}ms)", status, latency.as_millis()),
                        500..=599 => tracing::error!("{} ({}ms)", status, latency.as_millis()),
                        _ => tracing::info!("{} ({}ms)", status, latency.as_millis()),
                    }
                }),
        )
        .with_state(state)
}
