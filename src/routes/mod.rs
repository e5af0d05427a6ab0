//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (one session per connection)
/// - REST-ish API under `/api/v1/...` (sessionId addressing)
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/session", post(http::http_create_session))
        .route("/api/v1/session/:id", delete(http::http_end_session))
        .route("/api/v1/configure", post(http::http_configure))
        .route("/api/v1/questions", post(http::http_generate_questions))
        .route("/api/v1/question/select", post(http::http_select_question))
        .route("/api/v1/answer", post(http::http_save_answer))
        .route("/api/v1/evaluate", post(http::http_evaluate))
        .route("/api/v1/progress", get(http::http_progress))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(Arc::new(AppState::new()))
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let res = app
            .clone()
            .oneshot(post_json("/api/v1/session", json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        body_json(res).await["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn generate_without_key_is_unauthorized() {
        let app = app();
        let sid = create_session(&app).await;
        let res = app
            .oneshot(post_json(
                "/api/v1/questions",
                json!({ "sessionId": sid, "company": "Acme", "role": "SDE", "interviewType": "hr" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["kind"], json!("missing_api_key"));
    }

    #[tokio::test]
    async fn answer_for_unknown_session_is_not_found() {
        let res = app()
            .oneshot(post_json(
                "/api/v1/answer",
                json!({ "sessionId": "nope", "index": 0, "answer": "hi" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["kind"], json!("unknown_session"));
    }

    #[tokio::test]
    async fn evaluate_before_generation_is_bad_request() {
        let app = app();
        let sid = create_session(&app).await;
        let res = app
            .clone()
            .oneshot(post_json(
                "/api/v1/configure",
                json!({ "sessionId": sid, "apiKey": "test-key" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(post_json("/api/v1/evaluate", json!({ "sessionId": sid, "index": 0 })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["kind"], json!("unknown_question"));
    }

    #[tokio::test]
    async fn session_delete_is_idempotent_in_status_only() {
        let app = app();
        let sid = create_session(&app).await;
        let del = |sid: &str| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/session/{sid}"))
                .body(Body::empty())
                .unwrap()
        };
        let res = app.clone().oneshot(del(&sid)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res = app.oneshot(del(&sid)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn progress_for_fresh_session_is_empty() {
        let app = app();
        let sid = create_session(&app).await;
        let res = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/progress?sessionId={sid}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["total"], json!(0));
        assert_eq!(body["answered"], json!(0));
    }
}
