use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::registry::AdStore;

use crate::errors::ApiError;

pub mod ads;

#[derive(Clone)]
pub struct AppState {
    pub ads: AdStore,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok", service: "ads-api" })
}

// Matched path, unsupported verb
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method Not Allowed".into())
}

// No route matched at all; also covers non-numeric id segments
async fn no_route() -> ApiError {
    ApiError::NotFound("Not Found".into())
}

fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    ApiError::Internal("Internal Server Error".into()).into_response()
}

/// Build the full application router with error, trace, and panic layers
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health).fallback(method_not_allowed))
        .route("/ads", post(ads::create_ad).fallback(method_not_allowed))
        .route(
            "/ads/:id",
            get(ads::get_ad).delete(ads::delete_ad).fallback(method_not_allowed),
        )
        .fallback(no_route)
        .with_state(state)
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
