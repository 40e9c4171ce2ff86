use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tilovat_lib::{
    classify, highlight, matched_field_label, snippet_text, AppConfig, AppState, ContentStats, FieldFilter,
    HadithHit, NavigationTarget, QueryIntent, QueryOutcome, QuizQuestion, SearchResult, Surah,
    TilovatError, TranslationSource,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

const MAX_SEARCH_LIMIT: usize = 100;
const MAX_BODY_BYTES: usize = 64 * 1024;

// === Request/Response types ===

#[derive(Deserialize)]
struct ClassifyQuery {
    q: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    filter: Option<FieldFilter>,
    translation: Option<TranslationSource>,
    limit: Option<usize>,
    surah: Option<u32>,
}

#[derive(Deserialize)]
struct HadithQuery {
    q: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    content: ContentStats,
    uptime_seconds: i64,
    cached_books: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HighlightSegment {
    text: String,
    is_match: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultView {
    #[serde(flatten)]
    result: SearchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet: Option<Vec<HighlightSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_field_label: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum SearchResponse {
    Navigate { target: NavigationTarget },
    Results { total: usize, results: Vec<ResultView> },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HadithResponse {
    total: usize,
    results: Vec<HadithView>,
}

#[derive(Serialize)]
struct HadithView {
    #[serde(flatten)]
    hit: HadithHit,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizResponse {
    lesson_id: u32,
    questions: Vec<QuizQuestion>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: TilovatError) -> ApiError {
    let status = match e {
        TilovatError::NotFound(_) => StatusCode::NOT_FOUND,
        TilovatError::InvalidQuizConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

fn result_view(result: SearchResult, query: &str) -> ResultView {
    let snippet = result.as_verse().map(|(verse, fields)| {
        highlight(snippet_text(verse, fields), query)
            .into_iter()
            .map(|s| HighlightSegment { text: s.text.to_string(), is_match: s.is_match })
            .collect()
    });
    let label = result.as_verse().and_then(|(_, fields)| matched_field_label(fields));
    ResultView { result, snippet, matched_field_label: label }
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let content = state.store.stats();
    let uptime_seconds = (chrono::Utc::now() - content.loaded_at).num_seconds();
    Json(HealthResponse {
        status: "ok".to_string(),
        content,
        uptime_seconds,
        cached_books: state.books.stats().0,
    })
}

async fn list_surahs(State(state): State<Arc<AppState>>) -> Json<Vec<Surah>> {
    Json(state.store.surahs().to_vec())
}

async fn classify_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClassifyQuery>,
) -> Json<QueryIntent> {
    Json(classify(&params.q, state.store.surahs()))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let mut options = state
        .search_options(params.filter.unwrap_or_default())
        .with_surah(params.surah);
    if let Some(translation) = params.translation {
        options.translation = translation;
    }
    options.max_results = params.limit.unwrap_or(options.max_results).min(MAX_SEARCH_LIMIT);

    let response = match state.query(&params.q, &options) {
        QueryOutcome::Navigate { target } => SearchResponse::Navigate { target },
        QueryOutcome::Results { results } => {
            let query = params.q.trim();
            let results: Vec<ResultView> = results.into_iter().map(|r| result_view(r, query)).collect();
            SearchResponse::Results { total: results.len(), results }
        }
    };
    Json(response)
}

async fn hadith_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HadithQuery>,
) -> Json<HadithResponse> {
    let results: Vec<HadithView> = state
        .search_hadith(&params.q)
        .into_iter()
        .map(|hit| HadithView { preview: hit.preview(), hit })
        .collect();
    Json(HadithResponse { total: results.len(), results })
}

async fn lesson_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<QuizResponse>, ApiError> {
    let lesson_id = state.lesson(id).map_err(error_response)?.id;
    let questions = state.lesson_quiz(id).map_err(error_response)?;
    Ok(Json(QuizResponse { lesson_id, questions }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!("Loading content from {:?}", config.data_dir);
    let state = Arc::new(AppState::new(config)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/surahs", get(list_surahs))
        .route("/classify", get(classify_query))
        .route("/search", get(search))
        .route("/hadith/search", get(hadith_search))
        .route("/qaida/lessons/:id/quiz", get(lesson_quiz))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
