use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::{Extension, Json, Router};
use leadgen::auth::{auth_router, session_gate, DASHBOARD_PATH, LOGIN_PATH};
use leadgen::config::AuthConfig;
use leadgen::leads::{lead_router, LeadSearchService, PlacesProvider};
use serde_json::json;

const LOGIN_PAGE: &str = include_str!("../assets/login.html");
const DASHBOARD_PAGE: &str = include_str!("../assets/dashboard.html");

/// Full application surface: lead APIs, login, pages, and operational endpoints,
/// all behind the session gate.
pub(crate) fn with_dashboard_routes<P>(service: LeadSearchService<P>, auth: AuthConfig) -> Router
where
    P: PlacesProvider + 'static,
{
    lead_router(service)
        .merge(auth_router(auth))
        .route("/", get(|| async { Redirect::temporary(DASHBOARD_PATH) }))
        .route(LOGIN_PATH, get(login_page))
        .route(DASHBOARD_PATH, get(dashboard_page))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(middleware::from_fn(session_gate))
}

pub(crate) async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub(crate) async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
