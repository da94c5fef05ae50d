//! Aggregation over canonical posts: month/date filtering, platform
//! engagement formulas, hashtag and sentiment rollups, and the chart-ready
//! series shapes the dashboard consumes.
//!
//! Every function here is a pure, stateless transform over an immutable
//! snapshot of posts. Division is centralized in [`math::safe_divide`] so
//! empty inputs yield zeroed aggregates instead of NaN.

pub mod engagement;
pub mod filter;
pub mod math;
pub mod rollup;
pub mod series;

pub use engagement::{
    aggregate_instagram, aggregate_tiktok, compare_instagram, compare_tiktok, BrandPair,
    InstagramEngagement, TikTokEngagement,
};
pub use filter::{filter_by_date_range, filter_posts, is_in_selected_month, month_matches};
pub use math::{round1, safe_divide};
pub use rollup::{
    region_distribution, sentiment_by_date, sentiment_distribution, top_creators, top_hashtags,
    unified_top_hashtags, BrandTagSeries, CreatorRank, DateSentiment, RegionCount,
    SentimentDistribution, TagCount, UnifiedHashtags,
};
pub use series::{ChartSeries, NamedSeries, SeriesError};
