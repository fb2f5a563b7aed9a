use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use wf_core::{feed, slug, Article, Video};

use crate::AppState;

const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: format!("{} not found", what),
        }),
    )
        .into_response()
}

/// An unloadable feed renders as "no content", never as a 500; the
/// failure is logged here for diagnosis.
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Json<Vec<Article>> {
    let articles = match state.store.articles().await {
        Ok(articles) => articles,
        Err(err) => {
            warn!("articles feed unavailable: {}", err);
            return Json(vec![]);
        }
    };
    let ordered = feed::latest(articles.len(), articles.as_slice());
    Json(feed::page(pagination.page, pagination.limit, &ordered).to_vec())
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let articles = match state.store.articles().await {
        Ok(articles) => articles,
        Err(err) => {
            warn!("articles feed unavailable: {}", err);
            return not_found("article");
        }
    };
    match feed::find_by_slug(&slug, articles.as_slice()) {
        Some(article) => Json(article.clone()).into_response(),
        None => not_found("article"),
    }
}

/// The whole channel in feed-native order, the shape the load-more UI
/// re-fetches with a growing limit.
pub async fn video_feed(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
) -> Json<Vec<Video>> {
    match state.store.videos(&channel).await {
        Ok(videos) => Json(videos.as_slice().to_vec()),
        Err(err) => {
            warn!("video feed '{}' unavailable: {}", channel, err);
            Json(vec![])
        }
    }
}

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Json<Vec<Video>> {
    match state.store.videos(&channel).await {
        Ok(videos) => Json(
            feed::page(pagination.page, pagination.limit, videos.as_slice()).to_vec(),
        ),
        Err(err) => {
            warn!("video feed '{}' unavailable: {}", channel, err);
            Json(vec![])
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub slug: String,
    pub embed_url: Option<String>,
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path((channel, slug)): Path<(String, String)>,
) -> Response {
    let videos = match state.store.videos(&channel).await {
        Ok(videos) => videos,
        Err(err) => {
            warn!("video feed '{}' unavailable: {}", channel, err);
            return not_found("video");
        }
    };
    match feed::find_by_slug(&slug, videos.as_slice()) {
        Some(video) => Json(VideoDetail {
            video: video.clone(),
            embed_url: slug::embed_url(&video.link),
            slug,
        })
        .into_response(),
        None => not_found("video"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use wf_core::{FeedSource, FeedStore};

    const VIDEOS: &str = r#"[
        {"title": "Ep. 1", "link": "https://rumble.com/v1aaaaa-ep-1.html", "uploader": "Channel"},
        {"title": "Ep. 2", "link": "https://rumble.com/v6qi45w-ep-2.html", "uploader": "Channel"},
        {"title": "Ep. 3", "link": "https://rumble.com/v3ccccc-ep-3.html", "uploader": "Channel"}
    ]"#;

    const ARTICLES: &str = r#"[
        {"url": "https://news.example.org/2025/04/older-story/",
         "title": "Older", "author": "A", "timestamp": "2025-04-01T00:00:00Z"},
        {"url": "https://news.example.org/2025/05/newer-story/",
         "title": "Newer", "author": "A", "timestamp": "2025-05-01T00:00:00Z"}
    ]"#;

    async fn test_app(dir: &std::path::Path) -> axum::Router {
        std::fs::write(dir.join("videos.json"), VIDEOS).unwrap();
        std::fs::write(dir.join("articles.json"), ARTICLES).unwrap();

        let mut store = FeedStore::new();
        store.set_articles(FeedSource::File(dir.join("articles.json")), None);
        store.add_channel("show", FeedSource::File(dir.join("videos.json")), None);
        create_app(AppState { store }).await
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn articles_are_listed_latest_first() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let (status, body) = get_json(app, "/api/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["title"], "Newer");
        assert_eq!(body[1]["title"], "Older");
    }

    #[tokio::test]
    async fn article_lookup_by_slug() {
        let dir = tempfile::tempdir().unwrap();

        let app = test_app(dir.path()).await;
        let (status, body) = get_json(app, "/api/articles/newer-story").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Newer");

        let app = test_app(dir.path()).await;
        let (status, _) = get_json(app, "/api/articles/no-such-story").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn video_pagination_and_feed() {
        let dir = tempfile::tempdir().unwrap();

        let app = test_app(dir.path()).await;
        let (status, body) = get_json(app, "/api/videos/show?page=2&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Ep. 3");

        let app = test_app(dir.path()).await;
        let (status, body) = get_json(app, "/api/videos/show/feed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn video_detail_carries_slug_and_embed_url() {
        let dir = tempfile::tempdir().unwrap();

        let app = test_app(dir.path()).await;
        let (status, body) = get_json(app, "/api/videos/show/v6qi45w").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "v6qi45w");
        assert_eq!(body["embed_url"], "https://rumble.com/embed/v6qi45w/");
        assert_eq!(body["title"], "Ep. 2");

        let app = test_app(dir.path()).await;
        let (status, _) = get_json(app, "/api/videos/show/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unloadable_feeds_render_as_empty_lists() {
        let mut store = FeedStore::new();
        store.set_articles(
            FeedSource::File(std::path::PathBuf::from("/nonexistent/articles.json")),
            None,
        );
        let app = create_app(AppState { store }).await;

        let (status, body) = get_json(app, "/api/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_channel_is_an_empty_feed() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let (status, body) = get_json(app, "/api/videos/elsewhere/feed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
