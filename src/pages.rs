//! Admin console delivery.

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::state::AppState;

/// Serve the admin console with the configured secret injected as a meta
/// tag, so the page stays in sync with the environment it runs in.
pub async fn serve_admin(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match tokio::fs::read_to_string("static/admin.html").await {
        Ok(content) => {
            let meta = format!(
                "  <meta name=\"admin-secret\" content=\"{}\">\n</head>",
                state.admin.secret()
            );
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(content.replace("</head>", &meta)))
                .unwrap()
        }
        Err(_) => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("Admin page not found"))
            .unwrap(),
    }
}
