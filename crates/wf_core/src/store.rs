//! Feed loading and the process-lifetime cache.
//!
//! Feed files are deploy-time static, so a successfully parsed feed is
//! cached once and never invalidated. A failed load is not cached: the
//! next caller retries, and concurrent first callers may redundantly
//! re-read the same file, which is harmless.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Article, Video};

/// Where a feed snapshot lives. The HTTP variant points at a co-located
/// endpoint serving the same file, so both read the current snapshot.
#[derive(Debug, Clone)]
pub enum FeedSource {
    File(PathBuf),
    Http(String),
}

impl FeedSource {
    async fn read(&self) -> Result<Vec<u8>> {
        match self {
            FeedSource::File(path) => Ok(tokio::fs::read(path).await?),
            FeedSource::Http(url) => {
                let response = reqwest::get(url).await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

/// How a record type reads its backing document. Most feeds are a bare
/// JSON array of records.
trait FeedRecord: DeserializeOwned + Send + Sync + 'static {
    fn parse_document(raw: &[u8]) -> serde_json::Result<Vec<Self>> {
        serde_json::from_slice(raw)
    }
}

impl FeedRecord for Video {}

/// Some article snapshots wrap the array in an envelope alongside
/// pipeline metadata; both shapes exist in the wild.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArticleDocument {
    Wrapped { articles: Vec<Article> },
    Bare(Vec<Article>),
}

impl FeedRecord for Article {
    fn parse_document(raw: &[u8]) -> serde_json::Result<Vec<Self>> {
        Ok(match serde_json::from_slice(raw)? {
            ArticleDocument::Wrapped { articles } => articles,
            ArticleDocument::Bare(articles) => articles,
        })
    }
}

struct FeedHandle<T> {
    name: String,
    primary: FeedSource,
    fallback: Option<FeedSource>,
    cache: OnceCell<Arc<Vec<T>>>,
}

impl<T: FeedRecord> FeedHandle<T> {
    fn new(name: String, primary: FeedSource, fallback: Option<FeedSource>) -> Self {
        Self {
            name,
            primary,
            fallback,
            cache: OnceCell::new(),
        }
    }

    async fn records(&self) -> Result<Arc<Vec<T>>> {
        self.cache
            .get_or_try_init(|| async { self.load().await.map(Arc::new) })
            .await
            .cloned()
    }

    async fn load(&self) -> Result<Vec<T>> {
        let primary_err = match self.read(&self.primary).await {
            Ok(records) => return Ok(records),
            Err(err) => err,
        };
        warn!("feed '{}': primary source failed: {}", self.name, primary_err);

        let fallback = match &self.fallback {
            Some(source) => source,
            None => return Err(Error::SourceUnavailable(self.name.clone())),
        };
        self.read(fallback).await.map_err(|err| {
            warn!("feed '{}': fallback source failed: {}", self.name, err);
            Error::SourceUnavailable(self.name.clone())
        })
    }

    async fn read(&self, source: &FeedSource) -> Result<Vec<T>> {
        let raw = source.read().await?;
        Ok(T::parse_document(&raw)?)
    }
}

/// Read-only access to the article feed and any number of named video
/// channels. Callers never touch file paths or JSON themselves.
pub struct FeedStore {
    articles: Option<FeedHandle<Article>>,
    channels: HashMap<String, FeedHandle<Video>>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            articles: None,
            channels: HashMap::new(),
        }
    }

    pub fn set_articles(&mut self, source: FeedSource, fallback: Option<FeedSource>) {
        self.articles = Some(FeedHandle::new("articles".to_string(), source, fallback));
    }

    pub fn add_channel(&mut self, name: &str, source: FeedSource, fallback: Option<FeedSource>) {
        self.channels.insert(
            name.to_string(),
            FeedHandle::new(name.to_string(), source, fallback),
        );
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub async fn articles(&self) -> Result<Arc<Vec<Article>>> {
        match &self.articles {
            Some(handle) => handle.records().await,
            None => Err(Error::SourceUnavailable("articles".to_string())),
        }
    }

    pub async fn videos(&self, channel: &str) -> Result<Arc<Vec<Video>>> {
        match self.channels.get(channel) {
            Some(handle) => handle.records().await,
            None => Err(Error::SourceUnavailable(channel.to_string())),
        }
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
