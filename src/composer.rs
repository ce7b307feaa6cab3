use crate::types::{Message, Post};
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::HashMap;

/// Email-protocol-friendly subject cap: subjects longer than this are cut
/// to `SUBJECT_TRUNCATE_AT` characters plus an ellipsis marker.
pub const SUBJECT_MAX_LEN: usize = 77;
const SUBJECT_TRUNCATE_AT: usize = 74;

// Structural address check, taken from the HTML5 email input spec.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Notification template. `subject` and `body` are the outer templates;
/// `post` is rendered once per new post and substituted into the body's
/// `{posts}` placeholder.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmailTemplate {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub post: String,
}

impl EmailTemplate {
    /// A template is usable when every field is present and the sender and
    /// recipient look like addresses.
    pub fn is_valid(&self) -> bool {
        if self.from.is_empty()
            || self.to.is_empty()
            || self.subject.is_empty()
            || self.body.is_empty()
            || self.post.is_empty()
        {
            return false;
        }
        is_email_address(&self.from) && is_email_address(&self.to)
    }
}

fn is_email_address(value: &str) -> bool {
    RegexBuilder::new(EMAIL_PATTERN)
        .build()
        .expect("email pattern is a valid regex")
        .is_match(value)
}

/// Substitutes every placeholder in one pass, case-insensitively.
///
/// All keys are compiled into a single alternation, so a substituted value
/// is never re-scanned for further placeholders. Placeholders that appear
/// in the text but not in the map are left as literal text. Map keys must
/// be lower-cased, braces included.
pub fn replace_all(text: &str, replacements: &HashMap<String, String>) -> String {
    if replacements.is_empty() {
        return text.to_string();
    }

    let alternation = replacements
        .keys()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .expect("escaped placeholder alternation is a valid regex");

    pattern
        .replace_all(text, |captured: &regex::Captures| {
            replacements
                .get(&captured[0].to_lowercase())
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

impl Post {
    /// Explicit field-to-placeholder mapping, keyed by lower-cased field
    /// name. Every template-visible attribute is enumerated here.
    pub fn placeholders(&self) -> HashMap<String, String> {
        HashMap::from([
            ("{permalink}".to_string(), self.permalink.clone()),
            ("{title}".to_string(), self.title.clone()),
            ("{author}".to_string(), self.author.clone()),
            ("{domain}".to_string(), self.domain.clone()),
            ("{subreddit}".to_string(), self.subreddit.clone()),
            ("{url}".to_string(), self.url.clone()),
            ("{selfpost}".to_string(), self.self_post.to_string()),
            ("{selftext}".to_string(), self.self_text.clone()),
            ("{score}".to_string(), self.score.to_string()),
            ("{comments}".to_string(), self.comments.to_string()),
            ("{over18}".to_string(), self.over_18.to_string()),
            ("{createdat}".to_string(), self.created_at.to_string()),
            ("{age}".to_string(), self.age.to_string()),
            ("{agestring}".to_string(), self.age_string()),
        ])
    }
}

/// Builds the notification for a batch of new posts: each post is rendered
/// through the per-post sub-template, the concatenation lands in the body's
/// `{posts}` placeholder, and the feed-level placeholders (`{subreddit}`,
/// `{count}`, `{titles}`) fill in subject and body.
pub fn compose(template: &EmailTemplate, subreddit: &str, posts: &[Post]) -> Message {
    let rendered_posts: String = posts
        .iter()
        .map(|post| replace_all(&template.post, &post.placeholders()))
        .collect();

    let titles = posts
        .iter()
        .map(|post| post.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut feed_level = HashMap::from([
        ("{subreddit}".to_string(), subreddit.to_string()),
        ("{count}".to_string(), posts.len().to_string()),
        ("{titles}".to_string(), titles),
    ]);

    let subject = truncate_subject(&replace_all(&template.subject, &feed_level));

    feed_level.insert("{posts}".to_string(), rendered_posts);
    let body = replace_all(&template.body, &feed_level);

    Message {
        from: template.from.clone(),
        to: template.to.clone(),
        subject,
        body,
    }
}

fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() <= SUBJECT_MAX_LEN {
        return subject.to_string();
    }
    let mut truncated: String = subject.chars().take(SUBJECT_TRUNCATE_AT).collect();
    truncated.push_str("...");
    truncated
}
