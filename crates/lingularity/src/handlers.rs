use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use lingua_corpus::{BilingualCorpus, Metadata};
use lingua_normalize::NormalizerKind;
use lingua_types::{Direction, SentencePair};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::deviation::deviation_masks;
use crate::forenames::ForenameConvertor;
use crate::session::{DataPaths, SessionError, SessionOptions, TrainingMode, TrainingSession};

type SessionKey = (String, Direction);

/// Filled by whichever request opens the session first; later requests await it.
pub type SessionSlot = Arc<OnceCell<Arc<TrainingSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<DataPaths>,
    pub metadata: Arc<Metadata>,
    pub options: Arc<SessionOptions>,
    pub sessions: Arc<DashMap<SessionKey, SessionSlot>>,
    pub max_sentences: usize,
    pub disable_cache: bool,
}

impl AppState {
    pub fn new(
        paths: DataPaths,
        metadata: Metadata,
        options: SessionOptions,
        max_sentences: usize,
        disable_cache: bool,
    ) -> Self {
        Self {
            paths: Arc::new(paths),
            metadata: Arc::new(metadata),
            options: Arc::new(options),
            sessions: Arc::new(DashMap::new()),
            max_sentences,
            disable_cache,
        }
    }
}

#[derive(Deserialize)]
pub struct SentencesQuery {
    pub vocable: String,
    pub limit: Option<usize>,
    pub reversed: Option<bool>,
}

#[derive(Deserialize)]
pub struct TrainingQuery {
    pub mode: Option<TrainingMode>,
    pub limit: Option<usize>,
    pub reversed: Option<bool>,
}

#[derive(Deserialize)]
pub struct DeviationsRequest {
    pub response: String,
    pub ground_truth: String,
}

#[derive(Serialize)]
pub struct LanguageSummary {
    language: String,
    normalizer: NormalizerKind,
    forenames: bool,
}

#[derive(Serialize)]
pub struct SentencesResponse {
    language: String,
    vocable: String,
    items: Vec<SentencePair>,
}

#[derive(Serialize)]
pub struct TrainingResponse {
    language: String,
    mode: TrainingMode,
    total: usize,
    items: Vec<SentencePair>,
}

#[derive(Serialize)]
pub struct DeviationsResponse {
    response_mask: Vec<bool>,
    ground_truth_mask: Vec<bool>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/languages", get(languages))
        .route("/v1/languages/{language}/sentences", get(sentences))
        .route("/v1/languages/{language}/training", get(training))
        .route("/v1/deviations", post(deviations))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn languages(State(state): State<AppState>) -> Response {
    let items: Vec<LanguageSummary> = state
        .metadata
        .languages()
        .into_iter()
        .filter(|language| BilingualCorpus::path_for(&state.paths.corpora_dir, language).is_file())
        .map(|language| LanguageSummary {
            language: language.to_string(),
            normalizer: NormalizerKind::available_for(language, state.paths.lexicon_dir.as_deref()),
            forenames: ForenameConvertor::available_for(&state.metadata, language),
        })
        .collect();
    let body = Json(json!({ "items": items }));

    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )],
        body,
    )
        .into_response()
}

async fn sentences(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Query(params): Query<SentencesQuery>,
) -> Result<Json<SentencesResponse>, ApiError> {
    if params.vocable.trim().is_empty() {
        return Err(ApiError::bad_request("vocable is required"));
    }
    let limit = clamp_limit(params.limit, state.max_sentences)?;
    let direction = Direction::from_reversed(params.reversed.unwrap_or(false));
    let session = session(&state, &language, direction).await?;

    let mut rng = rand::thread_rng();
    let items = session
        .related_sentence_pairs(&params.vocable, limit, &mut rng)
        .unwrap_or_default();
    Ok(Json(SentencesResponse {
        language,
        vocable: params.vocable,
        items,
    }))
}

async fn training(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Query(params): Query<TrainingQuery>,
) -> Result<Json<TrainingResponse>, ApiError> {
    let limit = clamp_limit(params.limit, state.max_sentences)?;
    let mode = params.mode.unwrap_or_default();
    let direction = Direction::from_reversed(params.reversed.unwrap_or(false));
    let session = session(&state, &language, direction).await?;

    let mut rng = rand::thread_rng();
    let (total, items) = session.training_sentence_pairs(mode, limit, &mut rng);
    Ok(Json(TrainingResponse {
        language,
        mode,
        total,
        items,
    }))
}

async fn deviations(Json(request): Json<DeviationsRequest>) -> Json<DeviationsResponse> {
    let (response_mask, ground_truth_mask) =
        deviation_masks(&request.response, &request.ground_truth);
    Json(DeviationsResponse {
        response_mask,
        ground_truth_mask,
    })
}

fn clamp_limit(limit: Option<usize>, max: usize) -> Result<usize, ApiError> {
    let limit = limit.unwrap_or(max);
    if limit == 0 {
        return Err(ApiError::bad_request("limit must be >= 1"));
    }
    Ok(limit.min(max))
}

/// Cached session of `language`, opened on first use.
async fn session(
    state: &AppState,
    language: &str,
    direction: Direction,
) -> Result<Arc<TrainingSession>, ApiError> {
    if language.is_empty()
        || !language
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-')
    {
        return Err(ApiError::NotFound(format!("unknown language {language:?}")));
    }
    let key = (language.to_string(), direction);
    let slot = Arc::clone(state.sessions.entry(key.clone()).or_default().value());

    let opened = slot
        .get_or_try_init(|| async {
            let paths = Arc::clone(&state.paths);
            let metadata = Arc::clone(&state.metadata);
            let options = Arc::clone(&state.options);
            let owned_language = language.to_string();
            let session = tokio::task::spawn_blocking(move || {
                let mut rng = rand::thread_rng();
                TrainingSession::open(&paths, &metadata, &owned_language, direction, &options, &mut rng)
            })
            .await
            .map_err(|err| {
                error!("session task failed: {err}");
                ApiError::Internal
            })??;
            info!("opened {language} session ({direction:?})");
            Ok::<_, ApiError>(Arc::new(session))
        })
        .await;

    match opened {
        Ok(session) => Ok(Arc::clone(session)),
        Err(err) => {
            state
                .sessions
                .remove_if(&key, |_, slot| !slot.initialized());
            Err(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownLanguage(language) => {
                ApiError::NotFound(format!("unknown language {language:?}"))
            }
            other => {
                error!("failed to open session: {other}");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
