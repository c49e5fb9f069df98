use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use snip_store::{can_edit, CreateRequest, Paste, PasteStore, Version};
use snip_types::{Language, PasteId, Theme};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Shared state for all handlers.
pub struct AppState {
    pub store: PasteStore,
    pub config: ServerConfig,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// JSON body for paste creation. Every field has a default so minimal
/// payloads like `{"content": "…"}` work.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreatePayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub ttl: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub author: String,
}

/// Query parameters for raw-body creation, where the body is the content
/// and everything else rides in the query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateQuery {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub ttl: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub editable: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: String,
    pub url: String,
    pub raw_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// 1-based version index; out-of-range values fall back to the latest.
    pub v: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PasteView {
    pub id: String,
    pub content: String,
    pub language: Language,
    pub theme: Theme,
    pub editable: bool,
    pub author: String,
    /// 1-based index of the version shown.
    pub version: usize,
    /// Total number of versions.
    pub versions: usize,
    pub version_author: String,
    pub version_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditQuery {
    pub key: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditPayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub id: String,
    pub versions: usize,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Pastes whose expiry is still in the future.
    pub active: usize,
    /// Entries physically held, expired-but-unswept included.
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        active: state.store.count_active(),
        total: state.store.len(),
    })
}

/// Create a paste. Accepts either a JSON payload or a raw text body with
/// the remaining fields as query parameters.
pub async fn create_paste(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let payload = if is_json_request(&headers, &body) {
        serde_json::from_slice::<CreatePayload>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?
    } else {
        let content = String::from_utf8(body.to_vec())
            .map_err(|_| ApiError::BadRequest("body is not valid UTF-8".into()))?;
        CreatePayload {
            content,
            language: query.language,
            ttl: query.ttl,
            theme: query.theme,
            editable: is_truthy(&query.editable),
            author: query.author,
        }
    };

    guard_secrets(&state.config, &payload.content)?;

    let paste = state.store.create(CreateRequest {
        content: payload.content,
        language: payload.language,
        ttl: payload.ttl,
        theme: payload.theme,
        editable: payload.editable,
        author: payload.author,
    })?;

    let id = paste.id.to_string();
    let edit_url = paste
        .edit_key
        .as_ref()
        .map(|key| state.config.url(&format!("/api/paste/{id}/edit?key={}", key.as_str())));

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            url: state.config.url(&format!("/api/paste/{id}")),
            raw_url: state.config.url(&format!("/raw/{id}")),
            edit_url,
            expires_at: paste.expires_at,
            id,
        }),
    ))
}

/// JSON view of a paste, optionally at an explicit version.
pub async fn get_paste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<PasteView>, ApiError> {
    let paste = state
        .store
        .get(&PasteId::from(id.as_str()))
        .ok_or(ApiError::NotFound)?;

    let (index, version) = select_version(&paste, query.v);
    let content = version.content().map_err(ApiError::corrupt)?;

    Ok(Json(PasteView {
        id,
        content,
        language: version.language,
        theme: paste.theme,
        editable: paste.editable,
        author: paste.author.clone(),
        version: index + 1,
        versions: paste.version_count(),
        version_author: version.author.clone(),
        version_created_at: version.created_at,
        created_at: paste.created_at,
        updated_at: paste.updated_at,
        expires_at: paste.expires_at,
    }))
}

/// Raw text view of a paste's content.
pub async fn raw_paste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<([(HeaderName, &'static str); 1], String), ApiError> {
    let paste = state
        .store
        .get(&PasteId::from(id.as_str()))
        .ok_or(ApiError::NotFound)?;

    let (_, version) = select_version(&paste, query.v);
    let content = version.content().map_err(ApiError::corrupt)?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}

/// Append a version (or refresh metadata) on an editable paste.
///
/// The edit token arrives via `?key=`; the access policy itself does not
/// care how the caller obtained it.
pub async fn edit_paste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<EditQuery>,
    Json(payload): Json<EditPayload>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = PasteId::from(id.as_str());
    let paste = state.store.get(&id).ok_or(ApiError::NotFound)?;

    let key = query.key.unwrap_or_default();
    if key.is_empty() {
        return Err(ApiError::MissingKey);
    }
    if !can_edit(&paste, &key) {
        return Err(ApiError::Forbidden);
    }

    guard_secrets(&state.config, &payload.content)?;

    let versions = state.store.append_version(
        &id,
        &payload.content,
        &payload.language,
        &payload.author,
    )?;

    Ok(Json(EditResponse {
        url: state.config.url(&format!("/api/paste/{id}?v={versions}")),
        id: id.to_string(),
        versions,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pick the displayed version: 1-based `requested` when in range,
/// otherwise the latest.
fn select_version(paste: &Paste, requested: Option<usize>) -> (usize, &Version) {
    let total = paste.version_count();
    let index = match requested {
        Some(n) if (1..=total).contains(&n) => n - 1,
        _ => total - 1,
    };
    (index, &paste.versions[index])
}

/// JSON detection: declared content type, or a tolerant body sniff for
/// callers that forget the header.
fn is_json_request(headers: &HeaderMap, body: &[u8]) -> bool {
    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    declared || looks_like_json(body)
}

fn looks_like_json(body: &[u8]) -> bool {
    body.iter()
        .find(|&&b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .is_some_and(|&b| b == b'{')
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Optional pre-commit guard: reject content with secret-shaped matches
/// when the deployment opted in.
fn guard_secrets(config: &ServerConfig, content: &str) -> Result<(), ApiError> {
    if !config.block_secrets {
        return Ok(());
    }
    let findings = snip_scan::scan(content);
    if findings.is_empty() {
        return Ok(());
    }
    tracing::warn!(
        findings = findings.len(),
        "rejecting content flagged by the secret scanner"
    );
    Err(ApiError::SecretsBlocked(snip_scan::brief(&findings, 5)))
}
