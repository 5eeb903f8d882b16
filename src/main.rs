use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tariff_ingest::runtime::store::FsScheduleStore;
use tariff_ingest::search::{SearchService, KEYWORD_RESULT_LIMIT, NOTE_RESULT_LIMIT};

#[derive(Deserialize)]
struct KeywordsQuery {
    keywords: String,
}

#[derive(Deserialize)]
struct CodesQuery {
    codes: String,
}

#[derive(Deserialize)]
struct KeywordQuery {
    keyword: String,
}

async fn handle_search(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<KeywordsQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.search_items(&query.keywords) {
        Ok(hits) => {
            let message = if hits.len() > KEYWORD_RESULT_LIMIT {
                format!(
                    "More than the maximum of {KEYWORD_RESULT_LIMIT} items were found; narrow the keywords to see the rest."
                )
            } else {
                String::new()
            };
            let shown: Vec<_> = hits.iter().take(KEYWORD_RESULT_LIMIT).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "keywords": query.keywords,
                    "found": shown.len(),
                    "hit_count": hits.len(),
                    "message": message,
                    "results": shown,
                })),
            )
        }
        Err(err) => search_error(err),
    }
}

async fn handle_hs_search(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<CodesQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.search_by_hs_code(&query.codes) {
        Ok(hits) => (
            StatusCode::OK,
            Json(json!({
                "hs_codes": query.codes,
                "found": hits.len(),
                "results": hits,
            })),
        ),
        Err(err) => search_error(err),
    }
}

async fn handle_note_search(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<KeywordQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.search_notes(&query.keyword) {
        Ok(hits) => (
            StatusCode::OK,
            Json(json!({
                "keyword": query.keyword,
                "found": hits.len(),
                "results": hits.iter().take(NOTE_RESULT_LIMIT).collect::<Vec<_>>(),
            })),
        ),
        Err(err) => search_error(err),
    }
}

async fn handle_rate_comparison(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<KeywordsQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.compare_tax_rates(&query.keywords) {
        Ok(hits) => (
            StatusCode::OK,
            Json(json!({
                "keywords": query.keywords,
                "found": hits.len(),
                "results": hits,
            })),
        ),
        Err(err) => search_error(err),
    }
}

async fn handle_law_detail(
    State(service): State<Arc<SearchService>>,
    Path(code): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.law_details(&code) {
        Ok(details) => (
            StatusCode::OK,
            Json(json!({
                "law_code": code,
                "details": details,
            })),
        ),
        Err(err) => search_error(err),
    }
}

fn search_error(err: String) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Search failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err })),
    )
}

async fn handle_health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tariffdata".to_string());
    let service = Arc::new(SearchService::new(FsScheduleStore::new(&data_dir)));

    let app = Router::new()
        .route("/search", get(handle_search))
        .route("/search/hs", get(handle_hs_search))
        .route("/search/notes", get(handle_note_search))
        .route("/search/rates", get(handle_rate_comparison))
        .route("/laws/{code}", get(handle_law_detail))
        .fallback(handle_health)
        .with_state(service);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("Failed to bind to port 8080");

    tracing::info!("Serving tariff search for {data_dir} on :8080");

    axum::serve(listener, app).await.expect("Server failed");
}
