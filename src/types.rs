use serde::Deserialize;

/// Canonical base prefixed onto raw permalinks so post identifiers are
/// stable and comparable across polls.
pub const REDDIT_BASE_URL: &str = "https://reddit.com";

/// Link text substituted for self posts, whose `url` field is empty or
/// points back at the post itself.
pub const SELF_POST_TARGET_URL: &str = "(text only/self post)";

/// One page of a subreddit listing as returned by a `FeedSource`,
/// newest-first.
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub posts: Vec<RawPost>,
}

/// Raw post fields straight out of the listing payload, before
/// normalization. Field names follow the reddit JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub domain: String,
    pub subreddit: String,
    pub url: String,
    pub permalink: String,
    pub title: String,
    pub author: String,
    pub score: i64,
    pub is_self: bool,
    pub selftext: String,
    pub num_comments: i64,
    pub over_18: bool,
    // reddit serves this as a float
    pub created_utc: f64,
}

/// A normalized listing entry. Built fresh on every fetch cycle and never
/// mutated; the next poll's snapshot supersedes it wholesale.
#[derive(Debug, Clone)]
pub struct Post {
    /// Stable identifier: `REDDIT_BASE_URL` + raw permalink. Equality is
    /// defined on this field alone, since score and comment counts drift
    /// between polls.
    pub permalink: String,
    pub title: String,
    pub author: String,
    pub domain: String,
    pub subreddit: String,
    pub url: String,
    pub self_post: bool,
    pub self_text: String,
    pub score: i64,
    pub comments: i64,
    pub over_18: bool,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    /// Whole seconds since creation, relative to "now" at normalization.
    pub age: i64,
}

impl Post {
    pub fn from_raw(raw: RawPost, now: i64) -> Self {
        let created_at = raw.created_utc as i64;
        let url = if raw.is_self {
            SELF_POST_TARGET_URL.to_string()
        } else {
            raw.url
        };

        Self {
            permalink: format!("{}{}", REDDIT_BASE_URL, raw.permalink),
            title: raw.title,
            author: raw.author,
            domain: raw.domain,
            subreddit: raw.subreddit,
            url,
            self_post: raw.is_self,
            self_text: raw.selftext,
            score: raw.score,
            comments: raw.num_comments,
            over_18: raw.over_18,
            created_at,
            age: now - created_at,
        }
    }

    /// Human-readable age. Buckets into "<1 minute" or
    /// "H hour(s) M minute(s)"; there is deliberately no days unit, so old
    /// posts render with large hour counts.
    pub fn age_string(&self) -> String {
        let hours = self.age / 3600;
        let minutes = (self.age - hours * 3600) / 60;

        if hours <= 0 && minutes <= 0 {
            "<1 minute".to_string()
        } else {
            format!("{} hour(s) {} minute(s)", hours, minutes)
        }
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.permalink == other.permalink
    }
}

impl Eq for Post {}

/// A composed notification, ready to hand to a `Notifier`.
#[derive(Debug, Clone)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("listing fetch for r/{subreddit} failed with HTTP {status}")]
    FetchStatus { subreddit: String, status: u16 },

    #[error("delivery rejected with HTTP {status}: {body}")]
    SendRejected { status: u16, body: String },

    #[error("invalid subreddit name: {0:?}")]
    InvalidSubreddit(String),

    #[error("no usable email template")]
    MissingTemplate,
}

pub type Result<T> = std::result::Result<T, WatchError>;
