//! HTTP server exposing posts as page data

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{LoadError, Post, PostSummary};
use crate::Blog;

/// A failed load, turned into a response
pub struct ApiError(LoadError);

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_not_found() {
            tracing::debug!("{}", self.0);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        } else {
            tracing::error!("{}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load post").into_response()
        }
    }
}

/// Build the router: the post index, one route per post, static files as
/// fallback
pub fn router(blog: Blog) -> Router {
    let route = blog.config.route.trim_matches('/');
    let (index_path, post_path) = if route.is_empty() {
        ("/".to_string(), "/:slug".to_string())
    } else {
        (format!("/{}", route), format!("/{}/:slug", route))
    };

    let static_files = ServeDir::new(&blog.static_dir);

    Router::new()
        .route(&index_path, get(index_handler))
        .route(&post_path, get(post_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let app = router(blog.clone());

    println!(
        "Serving {:?} at http://{}:{}/{}",
        blog.content_dir,
        ip,
        port,
        blog.config.route.trim_matches('/')
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(blog): State<Blog>) -> Result<Json<Vec<PostSummary>>, ApiError> {
    Ok(Json(blog.list_posts().await?))
}

async fn post_handler(
    State(blog): State<Blog>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(blog.load_post(&slug).await?))
}
