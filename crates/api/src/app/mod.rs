//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, ledger engine and catalog service wiring
//! - `routes/`: HTTP routes + handlers (one file per resource group)
//! - `dto.rs`: request/response DTOs and the success envelope
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let services = Arc::new(services::AppServices::new(config.ledger));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(&ApiConfig::default());
        let (status, _) = send(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_path_id_is_bad_request() {
        let app = build_app(&ApiConfig::default());
        let (status, body) = send(app, "DELETE", "/mutations/42", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "invalid_id");
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let app = build_app(&ApiConfig::default());
        let (status, body) = send(app, "POST", "/mutations", Some("{not json")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);
        assert_eq!(body["message"], "invalid input");
        assert_eq!(body["error"], "invalid_body");
    }

    #[tokio::test]
    async fn unknown_mutation_is_not_found() {
        let app = build_app(&ApiConfig::default());
        let uri = format!("/mutations/{}", stockledger_core::MutationId::new());
        let (status, body) = send(app, "GET", &uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "mutation not found");
    }

    #[tokio::test]
    async fn empty_lists_use_success_envelope() {
        let app = build_app(&ApiConfig::default());
        let (status, body) = send(app, "GET", "/categories", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"], serde_json::json!([]));
    }
}
