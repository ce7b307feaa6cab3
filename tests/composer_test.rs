mod common;

use common::{post, raw_post, template, NOW};
use reddit_watcher::composer::{compose, replace_all, EmailTemplate, SUBJECT_MAX_LEN};
use reddit_watcher::types::{Post, SELF_POST_TARGET_URL};
use std::collections::HashMap;

#[test]
fn substitutes_feed_level_placeholders() {
    let mut tpl = template();
    tpl.subject = "{count} new in {subreddit}: {titles}".to_string();

    let posts = vec![post("/r/test/a", "A"), post("/r/test/b", "B")];
    let message = compose(&tpl, "test", &posts);

    assert_eq!(message.subject, "2 new in test: A, B");
    assert_eq!(message.from, "watcher@example.com");
    assert_eq!(message.to, "alerts@example.com");
}

#[test]
fn unknown_placeholders_stay_literal() {
    let mut tpl = template();
    tpl.subject = "{count} new, {foo} unknown".to_string();

    let message = compose(&tpl, "test", &[post("/r/test/a", "A")]);
    assert_eq!(message.subject, "1 new, {foo} unknown");
}

#[test]
fn placeholder_matching_is_case_insensitive() {
    let mut tpl = template();
    tpl.post = "{TITLE} by {Author}".to_string();

    let message = compose(&tpl, "test", &[post("/r/test/a", "Hello")]);
    assert!(message.body.contains("Hello by someone"));
}

#[test]
fn renders_each_post_through_the_sub_template() {
    let posts = vec![post("/r/test/a", "A"), post("/r/test/b", "B")];
    let message = compose(&template(), "test", &posts);

    assert!(message.body.starts_with("<html>"));
    assert!(message.body.contains(r#"<a href="https://example.com/r/test/a">A</a>"#));
    assert!(message.body.contains(r#"<a href="https://example.com/r/test/b">B</a>"#));
}

#[test]
fn substituted_values_are_not_re_expanded() {
    let mut tpl = template();
    tpl.post = "{title}".to_string();

    // A post title that looks like a placeholder must come through
    // verbatim rather than picking up the subreddit name.
    let message = compose(&tpl, "rust", &[post("/r/test/a", "{subreddit} pwned")]);
    assert!(message.body.contains("{subreddit} pwned"));
    assert!(!message.body.contains("rust pwned"));
}

#[test]
fn long_subjects_truncate_to_the_cap() {
    let mut tpl = template();
    tpl.subject = "x".repeat(120);

    let message = compose(&tpl, "test", &[post("/r/test/a", "A")]);
    assert_eq!(message.subject.chars().count(), SUBJECT_MAX_LEN);
    assert_eq!(message.subject, format!("{}...", "x".repeat(74)));
}

#[test]
fn subjects_at_the_cap_are_untouched() {
    let mut tpl = template();
    tpl.subject = "y".repeat(SUBJECT_MAX_LEN);

    let message = compose(&tpl, "test", &[post("/r/test/a", "A")]);
    assert_eq!(message.subject, "y".repeat(SUBJECT_MAX_LEN));
}

#[test]
fn replace_all_is_a_single_pass() {
    let replacements = HashMap::from([
        ("{a}".to_string(), "{b}".to_string()),
        ("{b}".to_string(), "boom".to_string()),
    ]);

    assert_eq!(replace_all("{a} {b}", &replacements), "{b} boom");
}

#[test]
fn template_validation_requires_every_field_and_real_addresses() {
    assert!(template().is_valid());

    let mut missing_body = template();
    missing_body.body = String::new();
    assert!(!missing_body.is_valid());

    let mut bad_sender = template();
    bad_sender.from = "not an address".to_string();
    assert!(!bad_sender.is_valid());

    assert!(!EmailTemplate::default().is_valid());
}

#[test]
fn self_posts_get_the_placeholder_url() {
    let mut raw = raw_post("/r/test/self", "self post");
    raw.is_self = true;
    raw.selftext = "body text".to_string();

    let normalized = Post::from_raw(raw, NOW);
    assert_eq!(normalized.url, SELF_POST_TARGET_URL);
    assert_eq!(normalized.self_text, "body text");
}

#[test]
fn age_string_buckets_into_hours_and_minutes() {
    let mut fresh = post("/r/test/a", "A");
    fresh.age = 30;
    assert_eq!(fresh.age_string(), "<1 minute");

    fresh.age = 3_660;
    assert_eq!(fresh.age_string(), "1 hour(s) 1 minute(s)");

    // No days unit: very old posts still render as hours.
    fresh.age = 90_000;
    assert_eq!(fresh.age_string(), "25 hour(s) 0 minute(s)");
}
