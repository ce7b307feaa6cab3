use crate::types::Post;

/// Returns the posts in `latest` that were not seen by the previous poll.
///
/// `latest` is scanned from the front and every post is new until one
/// equals the single most recent post of `previous`; scanning stops there.
/// This is O(new posts) and relies entirely on the feed returning a stable
/// newest-first order: once the previously-newest post is re-encountered,
/// everything after it was already seen by some earlier poll.
///
/// Known limitation: if the upstream listing ever reorders (ties, edits
/// bumping a post, pagination drift), this can miss genuinely-new posts
/// that sort below a re-surfaced old one, or re-report an old post as new.
/// That trade-off is deliberate; a full-set membership check would change
/// both the cost and the ordering semantics.
///
/// An empty `previous` means this is the watcher's first poll: the whole
/// listing becomes the baseline and nothing is reported as new.
pub fn find_new<'a>(latest: &'a [Post], previous: &[Post]) -> &'a [Post] {
    let Some(newest_seen) = previous.first() else {
        return &latest[..0];
    };

    let end = latest
        .iter()
        .position(|post| post == newest_seen)
        .unwrap_or(latest.len());

    &latest[..end]
}
