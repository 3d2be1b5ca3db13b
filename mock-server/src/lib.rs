//! In-process HTTP server used by the client integration tests.
//!
//! A small reqres.in-style users API plus two diagnostic endpoints: `/api/echo`
//! reflects the received request back as JSON, and `/api/xml` serves a fixed
//! XML document. Write endpoints accept both JSON and form-urlencoded bodies,
//! dispatching on the Content-Type header, so the client's body encodings can
//! be exercised end to end.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub job: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub job: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub job: Option<String>,
}

/// Paged listing shape, loosely after reqres.in.
#[derive(Serialize, Deserialize)]
pub struct UserPage {
    pub page: u32,
    pub total: usize,
    pub data: Vec<User>,
}

/// What `/api/echo` reflects back.
#[derive(Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub query: Option<String>,
    pub body: String,
    pub body_len: usize,
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/echo", any(echo))
        .route("/api/xml", get(xml_sample))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Deserialize a request body as JSON or form-urlencoded, depending on the
/// declared Content-Type.
fn parse_body<T: DeserializeOwned>(headers: &HeaderMap, body: &str) -> Option<T> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if content_type.starts_with("application/x-www-form-urlencoded") {
        serde_urlencoded::from_str(body).ok()
    } else {
        serde_json::from_str(body).ok()
    }
}

async fn list_users(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<UserPage> {
    let page = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let users = db.read().await;
    let data: Vec<User> = users.values().cloned().collect();
    Json(UserPage {
        page,
        total: data.len(),
        data,
    })
}

async fn create_user(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let input: CreateUser =
        parse_body(&headers, &body).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
        job: input.job,
    };
    db.write().await.insert(user.id, user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<User>, StatusCode> {
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<User>, StatusCode> {
    let input: UpdateUser =
        parse_body(&headers, &body).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(job) = input.job {
        user.job = job;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut users = db.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Json<Echo> {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        content_type: header_str(header::CONTENT_TYPE),
        user_agent: header_str(header::USER_AGENT),
        query,
        body_len: body.len(),
        body,
    })
}

async fn xml_sample() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        "<users><user><name>Neo</name><job>The One</job></user><user><name>Morpheus</name><job>Leader</job></user></users>",
    )
}
