use crate::traits::FeedSource;
use crate::types::{RawListing, RawPost, Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://reddit.com";
const USER_AGENT: &str = "reddit-watcher/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Listing envelope: {"data": {"children": [{"data": {...}}]}}
#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

/// Fetches a subreddit's "new" listing page over HTTP.
pub struct RedditSource {
    client: Client,
    base_url: Url,
}

impl RedditSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the source at a different host, for tests and mirrors.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }
}

#[async_trait]
impl FeedSource for RedditSource {
    async fn fetch(&self, subreddit: &str) -> Result<RawListing> {
        let endpoint = self.base_url.join(&format!("r/{}/new.json", subreddit))?;
        debug!("GET {}", endpoint);

        let response = self.client.get(endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::FetchStatus {
                subreddit: subreddit.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: ListingEnvelope = serde_json::from_str(&body)?;

        Ok(RawListing {
            posts: envelope
                .data
                .children
                .into_iter()
                .map(|child| child.data)
                .collect(),
        })
    }
}
