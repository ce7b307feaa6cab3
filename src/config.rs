use crate::composer::EmailTemplate;
use crate::filter::Filter;
use serde::Deserialize;

/// Top-level configuration, pre-validated by the binary before the core
/// sees it. Mirrors the `config.json` layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchConfig {
    pub watchers: Vec<WatcherConfig>,
    pub default_email_template: Option<EmailTemplate>,
    pub mandrill_key: String,
}

/// One watcher definition as configured.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatcherConfig {
    pub subreddit: String,
    /// Polling interval in milliseconds. Values below the floor, or no
    /// value at all, take the default instead of being rejected.
    pub interval: Option<u64>,
    pub filters: Vec<Filter>,
    pub email_template: Option<EmailTemplate>,
    pub enabled: Option<bool>,
}
