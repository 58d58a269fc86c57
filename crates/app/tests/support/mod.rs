//! In-process stub of the users service.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used, missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use reqres_application::UsersEndpoints;
use reqres_infrastructure::{HarnessConfig, ReqwestHttpClient};
use serde::Deserialize;
use serde_json::{Value, json};

pub const API_KEY: &str = "stub-key";
const PER_PAGE: usize = 6;
const USERS: [(u64, &str, &str); 12] = [
    (1, "George", "Bluth"),
    (2, "Janet", "Weaver"),
    (3, "Emma", "Wong"),
    (4, "Eve", "Holt"),
    (5, "Charles", "Morris"),
    (6, "Tracey", "Ramos"),
    (7, "Michael", "Lawson"),
    (8, "Lindsay", "Ferguson"),
    (9, "Tobias", "Funke"),
    (10, "Byron", "Fields"),
    (11, "George", "Edwards"),
    (12, "Rachel", "Howell"),
];

/// How the stub misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Answers like the real service.
    None,
    /// Delete answers 200 with a body.
    WrongStatus,
    /// Get-user answers 200 with a body that is not JSON.
    MalformedBody,
    /// Every answer is delayed.
    Slow(Duration),
}

struct Stub {
    fault: Fault,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

#[derive(Deserialize)]
struct Payload {
    name: String,
    job: String,
}

/// Serves the stub on `127.0.0.1:0` and returns its address.
pub async fn spawn_stub(fault: Fault) -> SocketAddr {
    let state = Arc::new(Stub { fault });
    let app = Router::new()
        .route("/api/users/", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user)
                .patch(update_user)
                .put(update_user)
                .delete(delete_user),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

/// A local address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    listener.local_addr().expect("probe address")
}

/// Configuration pointing at `addr`.
pub fn config_for(addr: SocketAddr, timeout_ms: u64) -> HarnessConfig {
    HarnessConfig {
        base_uri: format!("http://{addr}"),
        api_key: API_KEY.to_string(),
        timeout_ms,
        ..HarnessConfig::default()
    }
}

/// Client and endpoints for `config`.
pub fn harness(config: &HarnessConfig) -> (Arc<ReqwestHttpClient>, UsersEndpoints) {
    (
        Arc::new(config.http_client().expect("client")),
        config.endpoints().expect("endpoints"),
    )
}

fn user_json(id: u64) -> Option<Value> {
    USERS.iter().find(|(uid, ..)| *uid == id).map(|(id, first, last)| {
        json!({
            "id": id,
            "email": format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            "first_name": first,
            "last_name": last,
            "avatar": format!("https://reqres.in/img/faces/{id}-image.jpg"),
        })
    })
}

fn support() -> Value {
    json!({"url": "https://contentcaddy.io", "text": "Tired of writing endless social media content?"})
}

fn timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

async fn delay(stub: &Stub) {
    if let Fault::Slow(duration) = stub.fault {
        tokio::time::sleep(duration).await;
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == API_KEY)
}

fn missing_key() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Missing API key"})),
    )
        .into_response()
}

async fn list_users(State(stub): State<Arc<Stub>>, Query(query): Query<PageQuery>) -> Response {
    delay(&stub).await;
    let page = query.page.unwrap_or(1).max(1);
    let data: Vec<Value> = USERS
        .iter()
        .skip((page - 1) * PER_PAGE)
        .take(PER_PAGE)
        .filter_map(|(id, ..)| user_json(*id))
        .collect();
    Json(json!({
        "page": page,
        "per_page": PER_PAGE,
        "total": USERS.len(),
        "total_pages": USERS.len().div_ceil(PER_PAGE),
        "data": data,
        "support": support(),
    }))
    .into_response()
}

async fn get_user(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    delay(&stub).await;
    if !authorized(&headers) {
        return missing_key();
    }
    if stub.fault == Fault::MalformedBody {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"data\": {\"id\": 2,",
        )
            .into_response();
    }
    match user_json(id) {
        Some(user) => Json(json!({"data": user, "support": support()})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create_user(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(payload): Json<Payload>,
) -> Response {
    delay(&stub).await;
    if !authorized(&headers) {
        return missing_key();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "name": payload.name,
            "job": payload.job,
            "id": "523",
            "createdAt": timestamp(),
        })),
    )
        .into_response()
}

async fn update_user(
    State(stub): State<Arc<Stub>>,
    Path(_id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<Payload>,
) -> Response {
    delay(&stub).await;
    if !authorized(&headers) {
        return missing_key();
    }
    Json(json!({
        "name": payload.name,
        "job": payload.job,
        "updatedAt": timestamp(),
    }))
    .into_response()
}

async fn delete_user(
    State(stub): State<Arc<Stub>>,
    Path(_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    delay(&stub).await;
    if !authorized(&headers) {
        return missing_key();
    }
    if stub.fault == Fault::WrongStatus {
        return Json(json!({"deleted": true})).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
