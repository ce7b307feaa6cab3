use crate::types::Post;
use serde::Deserialize;

/// A string-match criterion: either one needle or a set of alternatives.
/// Matching is case-insensitive substring containment. An unset criterion
/// (the empty string) matches everything; an explicitly empty list of
/// alternatives matches nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringCriterion {
    One(String),
    Any(Vec<String>),
}

impl Default for StringCriterion {
    fn default() -> Self {
        StringCriterion::One(String::new())
    }
}

impl StringCriterion {
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        match self {
            StringCriterion::One(needle) => {
                needle.is_empty() || haystack.contains(&needle.to_lowercase())
            }
            StringCriterion::Any(alternatives) => alternatives
                .iter()
                .any(|needle| haystack.contains(&needle.to_lowercase())),
        }
    }
}

/// One named rule set. All defined criteria are ANDed; absent criteria are
/// neutral and always pass. A watcher's overall filter is the OR of its
/// `Filter`s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filter {
    pub domain: StringCriterion,
    pub title: StringCriterion,
    pub url: StringCriterion,
    pub permalink: StringCriterion,
    pub author: StringCriterion,
    pub self_text: StringCriterion,

    /// Lower bound on score. `None` means no constraint; it is never
    /// evaluated as a literal comparison against a sentinel.
    pub score: Option<i64>,
    /// Lower bound on comment count.
    pub comments: Option<i64>,
    /// Lower bound on age in seconds.
    pub age: Option<i64>,

    pub self_post: Option<bool>,
    pub over_18: Option<bool>,
}

impl Filter {
    /// Evaluates every defined criterion as a conjunction, short-circuiting
    /// on the first failure.
    pub fn test(&self, post: &Post) -> bool {
        if let Some(self_post) = self.self_post {
            if self_post != post.self_post {
                return false;
            }
        }
        if let Some(over_18) = self.over_18 {
            if over_18 != post.over_18 {
                return false;
            }
        }

        // Negative thresholds are config-level "unset" sentinels.
        if let Some(score) = self.score.filter(|s| *s >= 0) {
            if post.score < score {
                return false;
            }
        }
        if let Some(comments) = self.comments.filter(|c| *c >= 0) {
            if post.comments < comments {
                return false;
            }
        }
        if let Some(age) = self.age.filter(|a| *a >= 0) {
            if post.age < age {
                return false;
            }
        }

        self.domain.matches(&post.domain)
            && self.title.matches(&post.title)
            && self.url.matches(&post.url)
            && self.permalink.matches(&post.permalink)
            && self.author.matches(&post.author)
            && self.self_text.matches(&post.self_text)
    }
}
