#![allow(dead_code)]

use async_trait::async_trait;
use reddit_watcher::composer::EmailTemplate;
use reddit_watcher::config::WatcherConfig;
use reddit_watcher::traits::{FeedSource, Notifier};
use reddit_watcher::types::{Message, Post, RawListing, RawPost, Result, WatchError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

/// Fixed creation time for scripted posts.
pub const CREATED_AT: f64 = 1_700_000_000.0;
/// "Now" used when normalizing posts directly in tests.
pub const NOW: i64 = 1_700_000_500;

/// Builds a raw post with the fields most tests care about.
pub fn raw_post(permalink: &str, title: &str) -> RawPost {
    RawPost {
        domain: "example.com".to_string(),
        subreddit: "test".to_string(),
        url: format!("https://example.com{}", permalink),
        permalink: permalink.to_string(),
        title: title.to_string(),
        author: "someone".to_string(),
        score: 1,
        is_self: false,
        selftext: String::new(),
        num_comments: 0,
        over_18: false,
        created_utc: CREATED_AT,
    }
}

/// A normalized post as the pipeline would build it.
pub fn post(permalink: &str, title: &str) -> Post {
    Post::from_raw(raw_post(permalink, title), NOW)
}

/// A template that is structurally valid and exercises the common
/// placeholders.
pub fn template() -> EmailTemplate {
    EmailTemplate {
        from: "watcher@example.com".to_string(),
        to: "alerts@example.com".to_string(),
        subject: "{count} new posts in r/{subreddit}".to_string(),
        body: "<html>{posts}</html>".to_string(),
        post: "<p><a href=\"{url}\">{title}</a> by {author}</p>".to_string(),
    }
}

pub fn watcher_config(subreddit: &str) -> WatcherConfig {
    WatcherConfig {
        subreddit: subreddit.to_string(),
        interval: Some(5_000),
        filters: Vec::new(),
        email_template: Some(template()),
        enabled: None,
    }
}

/// One scripted fetch outcome.
pub enum Page {
    Listing(Vec<RawPost>),
    Failure,
}

/// FeedSource that replays scripted pages per subreddit and records when
/// each fetch started. An exhausted script serves empty listings, i.e. a
/// feed that stopped changing.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<HashMap<String, VecDeque<Page>>>,
    fetches: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, subreddit: &str, page: Page) {
        self.pages
            .lock()
            .unwrap()
            .entry(subreddit.to_string())
            .or_default()
            .push_back(page);
    }

    pub fn fetches(&self) -> Vec<(String, Instant)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count_for(&self, subreddit: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == subreddit)
            .count()
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch(&self, subreddit: &str) -> Result<RawListing> {
        self.fetches
            .lock()
            .unwrap()
            .push((subreddit.to_string(), Instant::now()));

        let page = self
            .pages
            .lock()
            .unwrap()
            .get_mut(subreddit)
            .and_then(|queue| queue.pop_front());

        match page {
            Some(Page::Listing(posts)) => Ok(RawListing { posts }),
            Some(Page::Failure) => Err(WatchError::FetchStatus {
                subreddit: subreddit.to_string(),
                status: 503,
            }),
            None => Ok(RawListing::default()),
        }
    }
}

/// Notifier that records every delivery attempt and can be told to reject
/// them.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Message>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_sends(&self, reject: bool) {
        self.fail.store(reject, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(WatchError::SendRejected {
                status: 401,
                body: "invalid key".to_string(),
            });
        }
        Ok(())
    }
}
