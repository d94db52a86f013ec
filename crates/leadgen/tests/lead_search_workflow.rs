use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::NaiveDate;
use leadgen::auth::{auth_router, session_gate};
use leadgen::config::{AuthConfig, Credentials, PlacesConfig};
use leadgen::leads::{
    export_leads, lead_router, ExportContext, ExportFormat, ExportSelection, GooglePlacesClient,
    LeadLabel, LeadSearchRequest, LeadSearchService,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "integration-key";

async fn fake_places_api(uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if headers.get("X-Goog-Api-Key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }

    match uri.path() {
        "/v1/places:searchText" => {
            assert!(headers.contains_key("X-Goog-FieldMask"));
            let query = body["textQuery"].as_str().unwrap_or_default();
            if query.starts_with("relocation services") {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            if query.starts_with("movers") {
                return Json(json!({ "places": [
                    {
                        "id": "acme",
                        "displayName": { "text": "Acme Moving" },
                        "formattedAddress": "1 Main St, Des Moines, IA",
                        "internationalPhoneNumber": "+1 515-555-0199",
                        "websiteUri": "https://acme.example.com",
                        "googleMapsUri": "https://maps.google.com/?cid=1",
                        "rating": 4.8,
                        "userRatingCount": 120,
                        "businessStatus": "OPERATIONAL",
                        "currentOpeningHours": { "openNow": true }
                    },
                    {
                        "id": "gone",
                        "displayName": { "text": "Gone Movers" },
                        "businessStatus": "CLOSED_PERMANENTLY"
                    }
                ]}))
                .into_response();
            }
            Json(json!({ "places": [
                {
                    "id": "acme",
                    "displayName": { "text": "Acme (stale)" }
                },
                {
                    "id": "bluestem",
                    "displayName": { "text": "Bluestem Haulers" },
                    "nationalPhoneNumber": "(515) 555-0100",
                    "rating": 4.5,
                    "userRatingCount": 30,
                    "currentOpeningHours": { "openNow": true }
                }
            ]}))
            .into_response()
        }
        "/v1/places:autocomplete" => Json(json!({ "suggestions": [
            { "placePrediction": { "placeId": "ChIJ-dsm", "text": { "text": "Des Moines, IA, USA" } } },
            { "queryPrediction": { "text": { "text": "des moines movers" } } }
        ]}))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake_places_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, Router::new().fallback(fake_places_api))
            .await
            .expect("fake api serves");
    });
    format!("http://{addr}/v1")
}

fn places_config() -> PlacesConfig {
    PlacesConfig {
        api_key: Some(API_KEY.to_string()),
        max_results: 20,
        timeout: Duration::from_secs(5),
    }
}

async fn live_service() -> LeadSearchService<GooglePlacesClient> {
    let base_url = spawn_fake_places_api().await;
    let client = GooglePlacesClient::from_config(&places_config())
        .expect("client builds")
        .expect("api key configured")
        .with_base_url(base_url);
    LeadSearchService::from_provider(Some(client))
}

#[tokio::test]
async fn search_against_places_api_merges_and_ranks() {
    let service = live_service().await;

    let leads = service
        .search(LeadSearchRequest {
            location: "Des Moines, IA".to_string(),
            industries: Some(vec!["moving".to_string()]),
            custom_query: None,
        })
        .await
        .expect("search succeeds despite one failing query");

    let ids: Vec<&str> = leads.iter().map(|lead| lead.id.as_str()).collect();
    assert_eq!(ids, vec!["acme", "bluestem"]);

    let acme = &leads[0];
    assert_eq!(acme.name, "Acme Moving");
    assert_eq!(acme.lead_score, 9);
    assert_eq!(acme.lead_label, LeadLabel::Hot);
    assert_eq!(acme.maps_url, "https://maps.google.com/?cid=1");

    assert_eq!(leads[1].lead_score, 6);
    assert_eq!(leads[1].lead_label, LeadLabel::Warm);

    let file = export_leads(
        &leads,
        &ExportSelection::all(),
        ExportFormat::Csv,
        &ExportContext {
            location: Some("Des Moines, IA".to_string()),
            industry: Some("moving".to_string()),
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        },
    )
    .expect("csv export");
    let text = String::from_utf8(file.bytes).expect("utf-8");
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test]
async fn autocomplete_against_places_api_keeps_place_predictions() {
    let service = live_service().await;

    let suggestions = service
        .suggest_locations("Des M")
        .await
        .expect("configured");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].place_id, "ChIJ-dsm");
    assert_eq!(suggestions[0].description, "Des Moines, IA, USA");
}

#[tokio::test]
async fn wrong_api_key_degrades_to_empty_results() {
    let base_url = spawn_fake_places_api().await;
    let config = PlacesConfig {
        api_key: Some("revoked".to_string()),
        ..places_config()
    };
    let client = GooglePlacesClient::from_config(&config)
        .expect("client builds")
        .expect("api key configured")
        .with_base_url(base_url);
    let service = LeadSearchService::from_provider(Some(client));

    let leads = service
        .search(LeadSearchRequest {
            location: "Des Moines, IA".to_string(),
            industries: Some(vec!["moving".to_string()]),
            custom_query: None,
        })
        .await
        .expect("rejections are absorbed");
    assert!(leads.is_empty());
}

fn gated_dashboard(service: LeadSearchService<GooglePlacesClient>) -> Router {
    let auth = AuthConfig {
        credentials: Some(Credentials {
            username: "ops".to_string(),
            password: "s3cret".to_string(),
        }),
        secure_cookie: false,
    };
    lead_router(service)
        .merge(auth_router(auth))
        .layer(axum::middleware::from_fn(session_gate))
}

#[tokio::test]
async fn search_api_requires_a_login_session() {
    let app = gated_dashboard(live_service().await);
    let search = || {
        Request::post("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "location": "Des Moines, IA", "industries": ["moving"] }).to_string(),
            ))
            .expect("request builds")
    };

    let response = app.clone().oneshot(search()).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let login = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "ops", "password": "s3cret" }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .expect("session cookie")
        .to_string();

    let mut request = search();
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().expect("cookie header"));
    let response = app.oneshot(request).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["results"].as_array().map(Vec::len), Some(2));
}
