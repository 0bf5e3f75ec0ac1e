use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use rect_patterns::dedup::DuplicatePair;
use rect_patterns::grid::Grid;
use rect_patterns::report::Summary;
use rect_patterns::types::{EnumerationConfig, GridSize, Shape};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct EnumerateRequest {
    grid: GridSize,
    shapes: Vec<Shape>,
    #[serde(flatten)]
    config: EnumerationConfig,
    #[serde(default)]
    include_patterns: bool,
}

#[derive(Serialize)]
struct EnumerateResponse {
    #[serde(flatten)]
    summary: Summary,
    duplicates: Vec<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patterns: Option<Vec<Grid>>,
}

async fn enumerate(
    Json(req): Json<EnumerateRequest>,
) -> Result<Json<EnumerateResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /enumerate"
    );

    let include_patterns = req.include_patterns;
    // The search is CPU bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        rect_patterns::run(req.grid, req.shapes, req.config, true)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let report = result.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let response = EnumerateResponse {
        summary: Summary::from_report(&report),
        duplicates: report
            .duplicates
            .iter()
            .map(|&DuplicatePair { duplicate, original }| (duplicate, original))
            .collect(),
        patterns: include_patterns.then(|| report.unique_grids().cloned().collect()),
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        ..Default::default()
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/enumerate", post(enumerate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
