use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:slug", get(handlers::get_article))
        .route("/api/videos/:channel", get(handlers::list_videos))
        .route("/api/videos/:channel/feed", get(handlers::video_feed))
        .route("/api/videos/:channel/:slug", get(handlers::get_video))
        .layer(cors)
        .with_state(Arc::new(state))
}
