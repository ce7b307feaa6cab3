use crate::composer::{self, EmailTemplate};
use crate::config::WatcherConfig;
use crate::detector::find_new;
use crate::filter::Filter;
use crate::traits::{FeedSource, Notifier};
use crate::types::{Post, Result, WatchError};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

/// Configured intervals below this floor are replaced by the default.
pub const MIN_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_INTERVAL_MS: u64 = 60_000;

/// Per-subreddit state: polling interval, filter set, notification
/// template, and the snapshot of the most recent successful poll.
#[derive(Debug)]
pub struct Watcher {
    pub subreddit: String,
    pub interval: Duration,
    pub filters: Vec<Filter>,
    pub email: EmailTemplate,
    pub enabled: bool,
    old_posts: Vec<Post>,
}

impl Watcher {
    /// Builds a watcher from one configuration entry, applying the interval
    /// floor/default and the template fallback chain. A watcher that fails
    /// validation is disabled, never rejected outright.
    pub fn from_config(config: WatcherConfig, default_template: Option<&EmailTemplate>) -> Self {
        let subreddit = config.subreddit.to_lowercase();
        let mut enabled = config.enabled.unwrap_or(true);

        let interval = config
            .interval
            .filter(|ms| *ms >= MIN_INTERVAL_MS)
            .unwrap_or(DEFAULT_INTERVAL_MS);

        let email = match select_template(config.email_template, default_template, &subreddit) {
            Ok(template) => template,
            Err(err) => {
                warn!("r/{}: {}; the watcher will be disabled", subreddit, err);
                enabled = false;
                EmailTemplate::default()
            }
        };

        if let Err(err) = validate_subreddit(&subreddit) {
            warn!("{}; the watcher will be disabled", err);
            enabled = false;
        }

        Self {
            subreddit,
            interval: Duration::from_millis(interval),
            filters: config.filters,
            email,
            enabled,
            old_posts: Vec::new(),
        }
    }

    /// The snapshot retained from the most recent successful poll, always
    /// the full listing rather than the notified subset.
    pub fn snapshot(&self) -> &[Post] {
        &self.old_posts
    }

    /// A post passes the watcher when it matches at least one filter, or
    /// unconditionally when no filters are configured.
    pub fn passes_filters(&self, post: &Post) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|filter| filter.test(post))
    }

    /// One full poll cycle: fetch, normalize, detect, filter, compose,
    /// deliver, snapshot-replace. Fetch failures abort the cycle with the
    /// snapshot untouched; delivery failures are logged but do not roll the
    /// snapshot back, so the same posts are not re-reported next cycle.
    pub async fn check<S, N>(&mut self, source: &S, notifier: &N)
    where
        S: FeedSource + ?Sized,
        N: Notifier + ?Sized,
    {
        if !self.enabled {
            return;
        }

        info!("r/{}: checking for new posts", self.subreddit);
        let listing = match source.fetch(&self.subreddit).await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(
                    "r/{}: listing read failure, keeping previous snapshot: {}",
                    self.subreddit, err
                );
                return;
            }
        };

        let now = Utc::now().timestamp();
        let loaded: Vec<Post> = listing
            .posts
            .into_iter()
            .map(|raw| Post::from_raw(raw, now))
            .collect();
        info!("r/{}: {} posts loaded", self.subreddit, loaded.len());

        let mut fresh: Vec<Post> = find_new(&loaded, &self.old_posts).to_vec();
        fresh.retain(|post| self.passes_filters(post));
        info!(
            "r/{}: {} new posts match the filters",
            self.subreddit,
            fresh.len()
        );

        if !fresh.is_empty() {
            let message = composer::compose(&self.email, &self.subreddit, &fresh);
            match notifier.send(&message).await {
                Ok(()) => {
                    info!(
                        "r/{}: alert email for {} posts sent to {}",
                        self.subreddit,
                        fresh.len(),
                        self.email.to
                    );
                }
                Err(err) => {
                    warn!(
                        "r/{}: failed to deliver alert email to {}: {}",
                        self.subreddit, self.email.to, err
                    );
                    warn!(
                        "r/{}: check that the API key is valid, the mail service is up, \
                         and the from/to addresses are correct",
                        self.subreddit
                    );
                }
            }
        }

        self.old_posts = loaded;
    }
}

fn validate_subreddit(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(WatchError::InvalidSubreddit(name.to_string()));
    }
    Ok(())
}

fn select_template(
    provided: Option<EmailTemplate>,
    default_template: Option<&EmailTemplate>,
    subreddit: &str,
) -> Result<EmailTemplate> {
    match provided {
        Some(template) if template.is_valid() => return Ok(template),
        Some(_) => warn!(
            "r/{}: the provided email template is not usable, falling back to the default",
            subreddit
        ),
        None => {}
    }

    default_template
        .filter(|template| template.is_valid())
        .cloned()
        .ok_or(WatchError::MissingTemplate)
}
