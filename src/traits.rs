use crate::types::{Message, RawListing, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Transport seam for reading one page of a subreddit's "new" listing.
///
/// Implementations return the page in the feed's native order
/// (newest-first); normalization and change detection happen in the core.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, subreddit: &str) -> Result<RawListing>;
}

/// Delivery seam for one composed notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Message) -> Result<()>;
}

#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
    async fn fetch(&self, subreddit: &str) -> Result<RawListing> {
        (**self).fetch(subreddit).await
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send(&self, message: &Message) -> Result<()> {
        (**self).send(message).await
    }
}
