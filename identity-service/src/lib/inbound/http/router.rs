use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::check_exists::check_exists;
use super::handlers::get_profile::get_profile;
use super::handlers::get_session::get_session;
use super::handlers::login::login;
use super::handlers::register_buyer::register_buyer;
use super::handlers::register_vendor::register_vendor;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AccountServicePort;
use crate::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub session_service: Arc<dyn SessionServicePort>,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    session_service: Arc<dyn SessionServicePort>,
) -> Router {
    let state = AppState {
        account_service,
        session_service,
    };

    let public_routes = Router::new()
        .route("/api/register/vendor", post(register_vendor))
        .route("/api/register/buyer", post(register_buyer))
        .route("/api/login", post(login))
        .route("/api/exists", get(check_exists));

    let protected_routes = Router::new()
        .route("/api/session", get(get_session))
        .route("/api/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
