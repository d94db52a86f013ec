//! Dashboard session gate: a login endpoint that sets the session cookie and a
//! middleware that keeps anonymous requests away from the dashboard and its APIs.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::AuthConfig;

pub const SESSION_COOKIE: &str = "auth_token";
const SESSION_VALUE: &str = "authenticated";
const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

const PROTECTED_PREFIXES: [&str; 4] = [
    DASHBOARD_PATH,
    "/api/search",
    "/api/autocomplete",
    "/api/export",
];

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login and logout endpoints.
pub fn auth_router(config: AuthConfig) -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .with_state(config)
}

pub(crate) async fn login_handler(
    State(config): State<AuthConfig>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let Some(credentials) = &config.credentials else {
        warn!("login attempted but AUTH_USERNAME/AUTH_PASSWORD are not configured");
        return unauthorized("Invalid credentials");
    };

    if !credentials.matches(&request.username, &request.password) {
        warn!(username = %request.username, "rejected dashboard login");
        return unauthorized("Invalid credentials");
    }

    info!(username = %request.username, "dashboard login");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(config.secure_cookie))],
        Json(json!({ "success": true })),
    )
        .into_response()
}

pub(crate) async fn logout_handler(State(config): State<AuthConfig>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_cookie(config.secure_cookie))],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Middleware applied to the whole application.
///
/// Signed-in visitors of `/login` go to the dashboard. Anonymous requests to a
/// protected prefix get 401 on API paths and a redirect to `/login` otherwise.
pub async fn session_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let authenticated = has_session(request.headers());

    if path == LOGIN_PATH && authenticated {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }

    let protected = PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix));
    if protected && !authenticated {
        if path.starts_with("/api/") {
            return unauthorized("Unauthorized");
        }
        return Redirect::temporary(LOGIN_PATH).into_response();
    }

    next.run(request).await
}

/// True when the request carries the session cookie with the signed-in value.
pub fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SESSION_COOKIE && value == SESSION_VALUE)
}

fn session_cookie(secure: bool) -> String {
    cookie(SESSION_VALUE, SESSION_MAX_AGE_SECS, secure)
}

fn cleared_cookie(secure: bool) -> String {
    cookie("", 0, secure)
}

fn cookie(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
