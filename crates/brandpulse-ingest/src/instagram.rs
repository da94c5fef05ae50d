//! Instagram row normalization.

use chrono::Utc;
use uuid::Uuid;

use brandpulse_core::{InstagramPost, MediaType};

use crate::fields::{bool_field, count_field, first_date, first_string, opt_count_field};
use crate::tags::extract_list;
use crate::RawRow;

/// Timestamp columns probed in order; the first parseable value wins.
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "createTimeISO", "createTime", "date", "createdAt"];

/// Normalize raw Instagram export rows into canonical posts.
///
/// Infallible by contract: malformed rows produce zeroed counts, missing
/// timestamps fall back to the normalization instant, and the output
/// preserves input row order. Ids are freshly generated each call.
#[must_use]
pub fn normalize_instagram_rows(rows: &[RawRow]) -> Vec<InstagramPost> {
    rows.iter().map(normalize_row).collect()
}

fn normalize_row(row: &RawRow) -> InstagramPost {
    let timestamp = first_date(row, TIMESTAMP_KEYS).unwrap_or_else(|| {
        tracing::debug!("instagram row has no parseable timestamp; using now");
        Utc::now()
    });

    let caption = first_string(row, &["caption"]).unwrap_or_default();
    let video_view_count = opt_count_field(row, &["videoViewCount"]);
    let video_play_count = opt_count_field(row, &["videoPlayCount"]);
    let media_type = classify_media(row, video_view_count, video_play_count);

    InstagramPost {
        id: Uuid::new_v4(),
        timestamp,
        sentiment: brandpulse_sentiment::score(&caption),
        likes_count: count_field(row, &["likesCount", "likes"]),
        comments_count: count_field(row, &["commentsCount", "comments"]),
        media_type,
        hashtags: extract_list(row, "hashtags", "hashtag"),
        mentions: extract_list(row, "mentions", "mention"),
        is_sponsored: bool_field(row, "isSponsored"),
        video_view_count,
        video_play_count,
        caption,
    }
}

/// A post is a video when any of view count > 0, play count > 0, or an
/// explicit `"video"` type field holds; otherwise the explicit field may
/// mark it a sidecar, and everything else is an image.
fn classify_media(
    row: &RawRow,
    video_view_count: Option<u64>,
    video_play_count: Option<u64>,
) -> MediaType {
    let explicit = first_string(row, &["mediaType", "type"]);
    let explicit_video = explicit
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("video"));

    if explicit_video
        || video_view_count.is_some_and(|c| c > 0)
        || video_play_count.is_some_and(|c| c > 0)
    {
        return MediaType::Video;
    }

    if explicit
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("sidecar"))
    {
        return MediaType::Sidecar;
    }

    MediaType::Image
}

#[cfg(test)]
mod tests {
    use brandpulse_core::SentimentLabel;
    use chrono::Datelike;
    use serde_json::{json, Value};

    use super::*;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn normalizes_well_formed_row() {
        let rows = vec![row(&[
            ("timestamp", json!("2024-03-15T00:00:00Z")),
            ("caption", json!("Spring looks we love #spring")),
            ("likesCount", json!("100")),
            ("commentsCount", json!(50)),
            ("mediaType", json!("Image")),
            ("hashtags", json!("#spring, #style")),
            ("isSponsored", json!("TRUE")),
        ])];
        let posts = normalize_instagram_rows(&rows);
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.timestamp.year(), 2024);
        assert_eq!(post.likes_count, 100);
        assert_eq!(post.comments_count, 50);
        assert_eq!(post.media_type, MediaType::Image);
        assert_eq!(post.hashtags, vec!["#spring", "#style"]);
        assert!(post.is_sponsored);
        assert_eq!(post.sentiment.label, SentimentLabel::Neutral);
    }

    #[test]
    fn malformed_counts_become_zero_never_panic() {
        let rows = vec![row(&[
            ("likesCount", json!("many")),
            ("commentsCount", json!(null)),
        ])];
        let post = &normalize_instagram_rows(&rows)[0];
        assert_eq!(post.likes_count, 0);
        assert_eq!(post.comments_count, 0);
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let post = &normalize_instagram_rows(&[row(&[("caption", json!("hi"))])])[0];
        let after = Utc::now();
        assert!(post.timestamp >= before && post.timestamp <= after);
    }

    #[test]
    fn timestamp_probing_uses_fallback_fields() {
        let rows = vec![row(&[
            ("createTimeISO", json!("2024-02-01T08:00:00Z")),
            ("date", json!("2023-01-01")),
        ])];
        let post = &normalize_instagram_rows(&rows)[0];
        assert_eq!((post.timestamp.year(), post.timestamp.month()), (2024, 2));
    }

    #[test]
    fn view_count_alone_classifies_video() {
        // mediaType unset; a positive videoViewCount is enough.
        let post = &normalize_instagram_rows(&[row(&[("videoViewCount", json!(500))])])[0];
        assert_eq!(post.media_type, MediaType::Video);
        assert_eq!(post.video_view_count, Some(500));
    }

    #[test]
    fn play_count_alone_classifies_video() {
        let post = &normalize_instagram_rows(&[row(&[("videoPlayCount", json!("12"))])])[0];
        assert_eq!(post.media_type, MediaType::Video);
    }

    #[test]
    fn explicit_type_field_classifies_video() {
        let post = &normalize_instagram_rows(&[row(&[("type", json!("VIDEO"))])])[0];
        assert_eq!(post.media_type, MediaType::Video);
    }

    #[test]
    fn zero_view_count_is_not_video() {
        let post = &normalize_instagram_rows(&[row(&[("videoViewCount", json!(0))])])[0];
        assert_eq!(post.media_type, MediaType::Image);
    }

    #[test]
    fn sidecar_type_is_preserved() {
        let post = &normalize_instagram_rows(&[row(&[("mediaType", json!("Sidecar"))])])[0];
        assert_eq!(post.media_type, MediaType::Sidecar);
    }

    #[test]
    fn output_preserves_input_order() {
        let rows = vec![
            row(&[("caption", json!("first"))]),
            row(&[("caption", json!("second"))]),
            row(&[("caption", json!("third"))]),
        ];
        let posts = normalize_instagram_rows(&rows);
        let captions: Vec<_> = posts.iter().map(|p| p.caption.as_str()).collect();
        assert_eq!(captions, vec!["first", "second", "third"]);
    }

    #[test]
    fn normalization_is_idempotent_except_ids() {
        let rows = vec![row(&[
            ("timestamp", json!("2024-03-15T00:00:00Z")),
            ("caption", json!("love this")),
            ("likesCount", json!(3)),
            ("hashtags/0", json!("#a")),
        ])];
        let first = normalize_instagram_rows(&rows).remove(0);
        let second = normalize_instagram_rows(&rows).remove(0);
        assert_ne!(first.id, second.id);
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(first.caption, second.caption);
        assert_eq!(first.likes_count, second.likes_count);
        assert_eq!(first.hashtags, second.hashtags);
        assert_eq!(first.sentiment, second.sentiment);
    }

    #[test]
    fn sentiment_is_derived_from_caption() {
        let post = &normalize_instagram_rows(&[row(&[("caption", json!("worst drop ever"))])])[0];
        assert_eq!(post.sentiment.label, SentimentLabel::Negative);
    }

    #[test]
    fn empty_rows_produce_empty_defaults() {
        let post = &normalize_instagram_rows(&[row(&[])])[0];
        assert_eq!(post.caption, "");
        assert_eq!(post.likes_count, 0);
        assert!(post.hashtags.is_empty());
        assert!(post.mentions.is_empty());
        assert!(!post.is_sponsored);
        assert_eq!(post.sentiment.label, SentimentLabel::Neutral);
    }
}
