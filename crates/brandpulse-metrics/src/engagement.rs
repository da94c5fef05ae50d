//! Platform-specific engagement aggregation.
//!
//! Instagram image posts have no reach denominator, so their "rate" is the
//! absolute interaction sum; Instagram video posts and all TikTok posts are
//! percentage rates over a reach proxy (views/plays). Each aggregate call
//! uses fresh local accumulators, so computing a primary/competitor pair is
//! two independent calls with no shared state.

use serde::Serialize;

use brandpulse_core::{InstagramPost, TikTokPost};

use crate::math::{round1, safe_divide};

/// Per-brand Instagram aggregate for one filtered snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstagramEngagement {
    pub image_post_count: u64,
    pub video_post_count: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    /// Summed view-or-play reach across video posts.
    pub total_video_views: u64,
    /// Absolute likes+comments over image-like posts (no view denominator).
    pub image_engagement: u64,
    /// `((likes + comments) / views) * 100` over video posts; 0 when no views.
    pub video_engagement_rate: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
}

/// Per-brand TikTok aggregate for one filtered snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TikTokEngagement {
    pub post_count: u64,
    pub total_plays: u64,
    pub total_diggs: u64,
    pub total_comments: u64,
    pub total_shares: u64,
    pub total_collects: u64,
    /// `((diggs + comments + shares + collects) / plays) * 100`; 0 when no plays.
    pub engagement_rate: f64,
    pub avg_plays: f64,
    pub avg_diggs: f64,
}

/// Both sides of a primary-vs-competitor comparison, computed at identical
/// precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandPair<T> {
    pub primary: T,
    pub competitor: T,
}

/// Aggregate a filtered Instagram snapshot.
///
/// Empty input yields all-zero totals and rates, never NaN or infinity.
pub fn aggregate_instagram<'a>(
    posts: impl IntoIterator<Item = &'a InstagramPost>,
) -> InstagramEngagement {
    let mut image_post_count = 0u64;
    let mut video_post_count = 0u64;
    let mut total_likes = 0u64;
    let mut total_comments = 0u64;
    let mut total_video_views = 0u64;
    let mut image_engagement = 0u64;
    let mut video_interactions = 0u64;

    for post in posts {
        total_likes += post.likes_count;
        total_comments += post.comments_count;

        if post.is_video() {
            video_post_count += 1;
            video_interactions += post.interactions();
            total_video_views += post.video_reach().unwrap_or(0);
        } else {
            image_post_count += 1;
            image_engagement += post.interactions();
        }
    }

    let post_count = image_post_count + video_post_count;

    #[allow(clippy::cast_precision_loss)]
    let video_engagement_rate = round1(
        safe_divide(video_interactions as f64, total_video_views as f64, 0.0) * 100.0,
    );
    #[allow(clippy::cast_precision_loss)]
    let avg_likes = round1(safe_divide(total_likes as f64, post_count as f64, 0.0));
    #[allow(clippy::cast_precision_loss)]
    let avg_comments = round1(safe_divide(total_comments as f64, post_count as f64, 0.0));

    InstagramEngagement {
        image_post_count,
        video_post_count,
        total_likes,
        total_comments,
        total_video_views,
        image_engagement,
        video_engagement_rate,
        avg_likes,
        avg_comments,
    }
}

/// Aggregate a filtered TikTok snapshot.
///
/// Empty input yields all-zero totals and rates, never NaN or infinity.
pub fn aggregate_tiktok<'a>(posts: impl IntoIterator<Item = &'a TikTokPost>) -> TikTokEngagement {
    let mut post_count = 0u64;
    let mut total_plays = 0u64;
    let mut total_diggs = 0u64;
    let mut total_comments = 0u64;
    let mut total_shares = 0u64;
    let mut total_collects = 0u64;

    for post in posts {
        post_count += 1;
        total_plays += post.play_count;
        total_diggs += post.digg_count;
        total_comments += post.comment_count;
        total_shares += post.share_count;
        total_collects += post.collect_count;
    }

    let interactions = total_diggs + total_comments + total_shares + total_collects;

    #[allow(clippy::cast_precision_loss)]
    let engagement_rate = round1(safe_divide(interactions as f64, total_plays as f64, 0.0) * 100.0);
    #[allow(clippy::cast_precision_loss)]
    let avg_plays = round1(safe_divide(total_plays as f64, post_count as f64, 0.0));
    #[allow(clippy::cast_precision_loss)]
    let avg_diggs = round1(safe_divide(total_diggs as f64, post_count as f64, 0.0));

    TikTokEngagement {
        post_count,
        total_plays,
        total_diggs,
        total_comments,
        total_shares,
        total_collects,
        engagement_rate,
        avg_plays,
        avg_diggs,
    }
}

/// Compute a primary/competitor Instagram pair from isolated snapshots.
pub fn compare_instagram<'a>(
    primary: impl IntoIterator<Item = &'a InstagramPost>,
    competitor: impl IntoIterator<Item = &'a InstagramPost>,
) -> BrandPair<InstagramEngagement> {
    BrandPair {
        primary: aggregate_instagram(primary),
        competitor: aggregate_instagram(competitor),
    }
}

/// Compute a primary/competitor TikTok pair from isolated snapshots.
pub fn compare_tiktok<'a>(
    primary: impl IntoIterator<Item = &'a TikTokPost>,
    competitor: impl IntoIterator<Item = &'a TikTokPost>,
) -> BrandPair<TikTokEngagement> {
    BrandPair {
        primary: aggregate_tiktok(primary),
        competitor: aggregate_tiktok(competitor),
    }
}
