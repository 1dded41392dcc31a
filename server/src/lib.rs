use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use qgram_core::{load_from_path, EngineConfig, EntityId, QGramIndex, Score, SearchHit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 30 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<Hit>,
}

#[derive(Debug, Serialize)]
pub struct Hit {
    pub entity_id: EntityId,
    pub name: String,
    pub score: Score,
    pub ped: usize,
}

impl From<SearchHit<'_>> for Hit {
    fn from(h: SearchHit<'_>) -> Self {
        Hit { entity_id: h.entity_id, name: h.name.to_string(), score: h.score, ped: h.ped }
    }
}

#[derive(Serialize)]
pub struct EntityResponse {
    pub entity_id: EntityId,
    pub name: String,
    pub score: Score,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<QGramIndex>,
}

#[derive(Debug, Default, Clone)]
pub struct AppOptions {
    /// Directory served for every path the API does not claim.
    pub static_dir: Option<PathBuf>,
    /// Comma-separated origins allowed to call the API; `None` allows any.
    pub cors_allow_origin: Option<String>,
}

/// Maps engine errors onto HTTP statuses.
pub struct ApiError(qgram_core::Error);

impl From<qgram_core::Error> for ApiError {
    fn from(err: qgram_core::Error) -> Self { ApiError(err) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            qgram_core::Error::UnknownId { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Reads the corpus and builds the index served for the process lifetime.
pub fn load_index(corpus: &std::path::Path, config: EngineConfig, strict: bool) -> Result<QGramIndex> {
    let loaded = load_from_path(corpus, config)?;
    if strict {
        return Ok(loaded.strict()?);
    }
    if !loaded.skipped.is_empty() {
        tracing::warn!(skipped = loaded.skipped.len(), "serving index built without malformed corpus lines");
    }
    Ok(loaded.index)
}

pub fn build_app(index: Arc<QGramIndex>, options: AppOptions) -> Router {
    let state = AppState { index };

    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/entity/:id", get(entity_handler))
        .with_state(state);
    if let Some(dir) = options.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(options.cors_allow_origin.as_deref()))
}

/// Browser front ends on other hosts call `/search` directly. Without a
/// usable origin list every origin may query the index.
fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET]).allow_headers(Any);
    let origins = allow_origin.map(parse_origins).unwrap_or_default();
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Comma-separated origins; entries that are not valid header values are dropped.
fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let hits = state.index.search(&params.q);
    let total_hits = hits.len();
    let k = params.k.clamp(1, MAX_K);
    let results: Vec<Hit> = hits.into_iter().take(k).map(Hit::from).collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, "search served");
    Json(SearchResponse { query: params.q, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn entity_handler(State(state): State<AppState>, Path(raw_id): Path<i64>) -> Result<Json<EntityResponse>, ApiError> {
    let id = state.index.resolve_id(raw_id)?;
    let entity = state.index.entity(id)?;
    Ok(Json(EntityResponse { entity_id: entity.id, name: entity.name.clone(), score: entity.score }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_ignores_blanks_and_bad_entries() {
        let origins = parse_origins(" https://a.example , ,https://b.example,bad\nvalue");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }
}
