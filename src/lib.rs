pub mod composer;
pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod filter;
pub mod notifier;
pub mod sources;
pub mod traits;
pub mod types;
pub mod watch;

pub use composer::{compose, replace_all, EmailTemplate};
pub use config::{WatchConfig, WatcherConfig};
pub use detector::find_new;
pub use dispatcher::Dispatcher;
pub use filter::{Filter, StringCriterion};
pub use notifier::MandrillNotifier;
pub use sources::RedditSource;
pub use traits::{FeedSource, Notifier};
pub use types::*;
pub use watch::Watcher;
