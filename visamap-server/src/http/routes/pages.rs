//! HTML pages and frontend assets

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::http::server::AppState;

/// `/` (map), `/about`, and `/static/*`
pub fn router(static_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/about", ServeFile::new(static_dir.join("about.html")))
        .nest_service("/static", ServeDir::new(static_dir))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::http::server::tests::offline_router;

    async fn get(uri: &str) -> axum::response::Response {
        offline_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_index_and_about() {
        for uri in ["/", "/about"] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
            assert!(content_type.starts_with("text/html"), "{uri}: {content_type}");
        }
    }

    #[tokio::test]
    async fn serves_assets() {
        let response = get("/static/app.js").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_asset_is_404() {
        let response = get("/static/nope.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
