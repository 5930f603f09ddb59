use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

mod extract;
mod fetch;
mod models;

use fetch::{FetchStrategy, ScrapeError};
use models::{ScrapeRequest, ScrapedRecord};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/scrape", post(scrape_endpoint));

    let addr =
        std::env::var("PAGESCOPE_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn scrape_endpoint(Json(req): Json<ScrapeRequest>) -> Response {
    if req.url.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "URL is required"})),
        )
            .into_response();
    }

    match scrape(&req.url).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => {
            // Full cause stays server-side; the client gets a generic body.
            tracing::error!("scrape of {} failed: {}", req.url, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to scrape the website"})),
            )
                .into_response()
        }
    }
}

async fn scrape(url: &str) -> Result<ScrapedRecord, ScrapeError> {
    let strategy = FetchStrategy::from_env();
    let html = fetch::fetch_html(strategy, url).await?;
    Ok(extract::extract_record(&html))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_fetching() {
        let response = scrape_endpoint(Json(ScrapeRequest {
            url: String::new(),
        }))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn absent_url_field_deserializes_to_empty() {
        let req: ScrapeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.url.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_yields_generic_500_body() {
        // .invalid is reserved and never resolves.
        let response = scrape_endpoint(Json(ScrapeRequest {
            url: "http://pagescope-test.invalid/".to_string(),
        }))
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to scrape the website");
        // Nothing beyond the generic message leaks to the client.
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
