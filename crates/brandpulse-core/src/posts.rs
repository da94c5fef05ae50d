//! Canonical post records produced by the ingest layer.
//!
//! Everything downstream of normalization (filtering, aggregation,
//! rollups, the API) operates on these strict types; the loose row shape
//! never leaks past the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Three-way sentiment bucket derived from a post's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Comparative (length-normalized) sentiment score with its label bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub score: f64,
    pub label: SentimentLabel,
}

impl SentimentScore {
    /// The score assigned to empty or unscorable text.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

/// Media classification of an Instagram post.
///
/// A post counts as `Video` when any of videoViewCount > 0,
/// videoPlayCount > 0, or an explicit `"video"` type field holds.
/// Sidecars (multi-image carousels) behave like images for engagement:
/// they have no view denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Sidecar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramPost {
    /// Generated at normalization time; not stable across reloads.
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub caption: String,
    pub likes_count: u64,
    pub comments_count: u64,
    pub media_type: MediaType,
    /// Original spelling preserved; compared case-insensitively downstream.
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub is_sponsored: bool,
    /// Only meaningful for video posts.
    pub video_view_count: Option<u64>,
    pub video_play_count: Option<u64>,
    pub sentiment: SentimentScore,
}

impl InstagramPost {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    /// Likes + comments.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.likes_count + self.comments_count
    }

    /// Reach proxy for video rate math: view count, else play count.
    /// `None` for videos missing both, whose rate denominator is zero.
    #[must_use]
    pub fn video_reach(&self) -> Option<u64> {
        self.video_view_count.or(self.video_play_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorMeta {
    pub id: String,
    pub name: String,
    /// Follower count, used for top-creator rollups.
    pub fans: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TikTokTag {
    pub id: String,
    pub name: String,
}

/// Post location, feeding the region distribution rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMeta {
    pub city: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokPost {
    /// Generated at normalization time; not stable across reloads.
    pub id: Uuid,
    pub text: String,
    pub create_time: DateTime<Utc>,
    pub author: AuthorMeta,
    pub play_count: u64,
    /// TikTok's like count.
    pub digg_count: u64,
    pub share_count: u64,
    pub comment_count: u64,
    pub collect_count: u64,
    pub hashtags: Vec<TikTokTag>,
    pub location: Option<LocationMeta>,
    pub sentiment: SentimentScore,
}

impl TikTokPost {
    /// Diggs + comments + shares + collects.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.digg_count + self.comment_count + self.share_count + self.collect_count
    }
}

/// Access to a post's canonical instant, for platform-generic filtering
/// and date bucketing.
pub trait Timestamped {
    fn occurred_at(&self) -> DateTime<Utc>;
}

impl Timestamped for InstagramPost {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for TikTokPost {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.create_time
    }
}

/// Access to a post's derived sentiment, for platform-generic rollups.
pub trait Scored {
    fn sentiment(&self) -> SentimentScore;
}

impl Scored for InstagramPost {
    fn sentiment(&self) -> SentimentScore {
        self.sentiment
    }
}

impl Scored for TikTokPost {
    fn sentiment(&self) -> SentimentScore {
        self.sentiment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_post(view: Option<u64>, play: Option<u64>) -> InstagramPost {
        InstagramPost {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            caption: String::new(),
            likes_count: 10,
            comments_count: 5,
            media_type: MediaType::Video,
            hashtags: vec![],
            mentions: vec![],
            is_sponsored: false,
            video_view_count: view,
            video_play_count: play,
            sentiment: SentimentScore::neutral(),
        }
    }

    #[test]
    fn interactions_sum_likes_and_comments() {
        assert_eq!(video_post(None, None).interactions(), 15);
    }

    #[test]
    fn video_reach_prefers_view_count() {
        assert_eq!(video_post(Some(500), Some(900)).video_reach(), Some(500));
        assert_eq!(video_post(None, Some(900)).video_reach(), Some(900));
        assert_eq!(video_post(None, None).video_reach(), None);
    }

    #[test]
    fn sentiment_label_display() {
        assert_eq!(SentimentLabel::Positive.to_string(), "positive");
        assert_eq!(SentimentLabel::Neutral.to_string(), "neutral");
        assert_eq!(SentimentLabel::Negative.to_string(), "negative");
    }
}
