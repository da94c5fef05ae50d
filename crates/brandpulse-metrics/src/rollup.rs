//! Hashtag frequency and sentiment rollups.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use brandpulse_core::{Scored, SentimentLabel, TikTokPost, Timestamped};

use crate::math::safe_divide;
use crate::series::ChartSeries;

/// One ranked hashtag. `tag` is the first-encountered spelling with any
/// leading `#` stripped; counting is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// Counts by three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

/// Average sentiment for one calendar date (UTC). Dates with no posts are
/// omitted entirely; the series is sparse, not zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSentiment {
    pub date: NaiveDate,
    pub avg_score: f64,
}

/// Cross-brand hashtag rollup: the top tags by total usage, with each
/// brand's individual count for exactly those tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedHashtags {
    pub tags: Vec<String>,
    pub brands: Vec<BrandTagSeries>,
}

/// One brand's counts, index-aligned with [`UnifiedHashtags::tags`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandTagSeries {
    pub brand: String,
    pub counts: Vec<u64>,
}

/// Case-insensitive comparison key: trimmed, `#`-stripped, lowercased.
/// Empty after stripping means the tag is ignored.
fn tag_key(raw: &str) -> Option<String> {
    let stripped = raw.trim().trim_start_matches('#');
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_lowercase())
}

/// Display spelling: trimmed with the leading `#` removed, case preserved.
fn tag_display(raw: &str) -> String {
    raw.trim().trim_start_matches('#').to_string()
}

/// Counter preserving first-encounter order for deterministic tie-breaks.
struct TagCounter {
    slots: Vec<TagCount>,
    index: HashMap<String, usize>,
}

impl TagCounter {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, raw: &str) {
        let Some(key) = tag_key(raw) else { return };
        if let Some(&slot) = self.index.get(&key) {
            self.slots[slot].count += 1;
        } else {
            self.index.insert(key, self.slots.len());
            self.slots.push(TagCount {
                tag: tag_display(raw),
                count: 1,
            });
        }
    }

    /// Descending by count; ties keep first-encounter order (stable sort).
    fn ranked(mut self, n: usize) -> Vec<TagCount> {
        self.slots.sort_by(|a, b| b.count.cmp(&a.count));
        self.slots.truncate(n);
        self.slots
    }
}

/// Top `n` hashtags by case-insensitive count.
///
/// Ranking is descending by count with ties broken by first-encountered
/// order, so identical input always yields identical output.
pub fn top_hashtags<'a>(tags: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<TagCount> {
    let mut counter = TagCounter::new();
    for tag in tags {
        counter.add(tag);
    }
    counter.ranked(n)
}

/// Count posts per sentiment label.
pub fn sentiment_distribution(
    labels: impl IntoIterator<Item = SentimentLabel>,
) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for label in labels {
        match label {
            SentimentLabel::Positive => dist.positive += 1,
            SentimentLabel::Neutral => dist.neutral += 1,
            SentimentLabel::Negative => dist.negative += 1,
        }
    }
    dist
}

/// Average sentiment score bucketed by calendar date, ascending and sparse.
pub fn sentiment_by_date<'a, T>(posts: impl IntoIterator<Item = &'a T>) -> Vec<DateSentiment>
where
    T: Timestamped + Scored + 'a,
{
    let mut buckets: std::collections::BTreeMap<NaiveDate, (f64, u64)> =
        std::collections::BTreeMap::new();

    for post in posts {
        let date = post.occurred_at().date_naive();
        let entry = buckets.entry(date).or_insert((0.0, 0));
        entry.0 += post.sentiment().score;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (sum, count))| {
            #[allow(clippy::cast_precision_loss)]
            let count = count as f64;
            DateSentiment {
                date,
                avg_score: safe_divide(sum, count, 0.0),
            }
        })
        .collect()
}

/// Top `n` tags by total usage across all brands, then each brand's own
/// count for exactly those tags.
///
/// Every input brand appears in the result; a brand that never used a top
/// tag reports 0 for it, and all count vectors share `tags.len()`.
pub fn unified_top_hashtags(brand_tags: &[(String, Vec<String>)], n: usize) -> UnifiedHashtags {
    let mut global = TagCounter::new();
    for (_, tags) in brand_tags {
        for tag in tags {
            global.add(tag);
        }
    }
    let top = global.ranked(n);
    let top_keys: Vec<String> = top
        .iter()
        .filter_map(|tc| tag_key(&tc.tag))
        .collect();

    let brands = brand_tags
        .iter()
        .map(|(brand, tags)| {
            let mut counts = vec![0u64; top_keys.len()];
            for tag in tags {
                let Some(key) = tag_key(tag) else { continue };
                if let Some(pos) = top_keys.iter().position(|k| *k == key) {
                    counts[pos] += 1;
                }
            }
            BrandTagSeries {
                brand: brand.clone(),
                counts,
            }
        })
        .collect();

    UnifiedHashtags {
        tags: top.into_iter().map(|tc| tc.tag).collect(),
        brands,
    }
}

impl UnifiedHashtags {
    /// Chart shape: tag labels plus one equal-length series per brand.
    #[must_use]
    pub fn to_chart_series(&self) -> ChartSeries {
        let mut chart = ChartSeries::new(self.tags.clone());
        for brand in &self.brands {
            #[allow(clippy::cast_precision_loss)]
            let values: Vec<f64> = brand.counts.iter().map(|&c| c as f64).collect();
            // Lengths are equal by construction; a mismatch here is a bug.
            if chart.try_push_series(&brand.brand, values).is_err() {
                tracing::error!(brand = %brand.brand, "unified rollup produced mismatched series length");
            }
        }
        chart
    }
}

/// One ranked creator: display name, the largest follower count observed
/// across their posts, and how many posts they contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorRank {
    pub name: String,
    pub fans: u64,
    pub post_count: u64,
}

/// Post count for one region, keyed by uppercased country code with the
/// city as fallback when the export carries no code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: u64,
}

/// Top `n` creators by follower count.
///
/// Creators are keyed by source author id, falling back to the lowercased
/// name when the export omits ids. Follower counts drift between rows of
/// the same export, so the largest observed value wins. Posts with no
/// author name are skipped. Ties keep first-encounter order.
pub fn top_creators<'a>(
    posts: impl IntoIterator<Item = &'a TikTokPost>,
    n: usize,
) -> Vec<CreatorRank> {
    let mut slots: Vec<CreatorRank> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for post in posts {
        if post.author.name.is_empty() {
            continue;
        }
        let key = if post.author.id.is_empty() {
            post.author.name.to_lowercase()
        } else {
            post.author.id.clone()
        };
        if let Some(&slot) = index.get(&key) {
            let entry = &mut slots[slot];
            entry.post_count += 1;
            entry.fans = entry.fans.max(post.author.fans);
        } else {
            index.insert(key, slots.len());
            slots.push(CreatorRank {
                name: post.author.name.clone(),
                fans: post.author.fans,
                post_count: 1,
            });
        }
    }

    slots.sort_by(|a, b| b.fans.cmp(&a.fans));
    slots.truncate(n);
    slots
}

/// Post counts grouped by region, descending.
///
/// Country codes compare case-insensitively and display uppercased; a
/// post without a code falls back to its city, and posts with neither are
/// left out of the distribution. Ties keep first-encounter order.
pub fn region_distribution<'a>(
    posts: impl IntoIterator<Item = &'a TikTokPost>,
) -> Vec<RegionCount> {
    let mut slots: Vec<RegionCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for post in posts {
        let Some(location) = &post.location else {
            continue;
        };
        let region = location
            .country_code
            .as_deref()
            .map(str::to_uppercase)
            .or_else(|| location.city.clone());
        let Some(region) = region.filter(|r| !r.is_empty()) else {
            continue;
        };

        let key = region.to_lowercase();
        if let Some(&slot) = index.get(&key) {
            slots[slot].count += 1;
        } else {
            index.insert(key, slots.len());
            slots.push(RegionCount { region, count: 1 });
        }
    }

    slots.sort_by(|a, b| b.count.cmp(&a.count));
    slots
}

#[cfg(test)]
mod tests {
    use brandpulse_core::SentimentScore;
    use chrono::{DateTime, Utc};

    use super::*;

    struct FakePost {
        at: DateTime<Utc>,
        score: f64,
    }

    impl Timestamped for FakePost {
        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    impl Scored for FakePost {
        fn sentiment(&self) -> SentimentScore {
            SentimentScore {
                score: self.score,
                label: SentimentLabel::Neutral,
            }
        }
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn counting_is_case_insensitive_and_strips_hash() {
        let tags = ["#Sale", "sale", "SALE"];
        let ranked = top_hashtags(tags, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].count, 3);
        // Display keeps the first-encountered spelling, hash stripped.
        assert_eq!(ranked[0].tag, "Sale");
    }

    #[test]
    fn ranking_descending_with_stable_ties() {
        let tags = ["#b", "#a", "#a", "#c", "#b"];
        let ranked = top_hashtags(tags, 5);
        // b and a both have 2; b was encountered first so it ranks first.
        assert_eq!(
            ranked.iter().map(|t| t.tag.as_str()).collect::<Vec<_>>(),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn top_n_is_caller_controlled() {
        let tags = ["#a", "#b", "#c", "#d", "#e", "#f"];
        assert_eq!(top_hashtags(tags, 5).len(), 5);
        assert_eq!(top_hashtags(tags, 10).len(), 6);
        assert!(top_hashtags(tags, 0).is_empty());
    }

    #[test]
    fn empty_and_bare_hash_tags_are_ignored() {
        let tags = ["", "#", "  ", "#real"];
        let ranked = top_hashtags(tags, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tag, "real");
    }

    #[test]
    fn distribution_counts_labels() {
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ];
        let dist = sentiment_distribution(labels);
        assert_eq!(dist.positive, 2);
        assert_eq!(dist.neutral, 1);
        assert_eq!(dist.negative, 1);
    }

    #[test]
    fn sentiment_by_date_averages_and_sorts() {
        let posts = vec![
            FakePost { at: utc("2024-03-02T10:00:00Z"), score: 0.4 },
            FakePost { at: utc("2024-03-01T10:00:00Z"), score: 0.2 },
            FakePost { at: utc("2024-03-02T18:00:00Z"), score: 0.6 },
        ];
        let series = sentiment_by_date(&posts);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2024-03-01");
        assert!((series[0].avg_score - 0.2).abs() < 1e-9);
        assert_eq!(series[1].date.to_string(), "2024-03-02");
        assert!((series[1].avg_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn sentiment_by_date_is_sparse() {
        let posts = vec![
            FakePost { at: utc("2024-03-01T10:00:00Z"), score: 0.1 },
            FakePost { at: utc("2024-03-05T10:00:00Z"), score: 0.1 },
        ];
        let series = sentiment_by_date(&posts);
        // No zero-filled entries for the 2nd-4th.
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn unified_rollup_reports_zeros_for_unused_tags() {
        let input = vec![
            (
                "Nordstrom".to_string(),
                vec!["#sale".to_string(), "#sale".to_string(), "#style".to_string()],
            ),
            ("Target".to_string(), vec!["#Sale".to_string()]),
        ];
        let unified = unified_top_hashtags(&input, 2);
        assert_eq!(unified.tags, vec!["sale", "style"]);
        assert_eq!(unified.brands.len(), 2);
        assert_eq!(unified.brands[0].counts, vec![2, 1]);
        // Target never used #style: 0, not omitted.
        assert_eq!(unified.brands[1].counts, vec![1, 0]);
    }

    #[test]
    fn unified_rollup_ranks_by_total_usage() {
        // "style" is each brand's minority tag but the global majority.
        let input = vec![
            (
                "A".to_string(),
                vec!["#style".to_string(), "#style".to_string(), "#a".to_string()],
            ),
            (
                "B".to_string(),
                vec!["#style".to_string(), "#b".to_string(), "#b".to_string()],
            ),
        ];
        let unified = unified_top_hashtags(&input, 1);
        assert_eq!(unified.tags, vec!["style"]);
    }

    #[test]
    fn unified_rollup_chart_series_is_rectangular() {
        let input = vec![
            ("A".to_string(), vec!["#x".to_string()]),
            ("B".to_string(), vec![]),
        ];
        let chart = unified_top_hashtags(&input, 5).to_chart_series();
        assert_eq!(chart.labels.len(), 1);
        for series in &chart.series {
            assert_eq!(series.values.len(), chart.labels.len());
        }
    }

    fn tt_post(author_id: &str, author_name: &str, fans: u64) -> TikTokPost {
        TikTokPost {
            id: uuid::Uuid::new_v4(),
            text: String::new(),
            create_time: Utc::now(),
            author: brandpulse_core::AuthorMeta {
                id: author_id.to_string(),
                name: author_name.to_string(),
                fans,
            },
            play_count: 0,
            digg_count: 0,
            share_count: 0,
            comment_count: 0,
            collect_count: 0,
            hashtags: vec![],
            location: None,
            sentiment: SentimentScore::neutral(),
        }
    }

    fn located(city: Option<&str>, country_code: Option<&str>) -> TikTokPost {
        let mut post = tt_post("1", "someone", 0);
        post.location = Some(brandpulse_core::LocationMeta {
            city: city.map(ToOwned::to_owned),
            country_code: country_code.map(ToOwned::to_owned),
        });
        post
    }

    #[test]
    fn creators_rank_by_follower_count() {
        let posts = vec![
            tt_post("1", "small", 100),
            tt_post("2", "huge", 500_000),
            tt_post("3", "mid", 9_000),
        ];
        let ranked = top_creators(&posts, 2);
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["huge", "mid"]);
    }

    #[test]
    fn repeat_posts_merge_into_one_creator() {
        // Fan counts drift between rows; the largest observed wins.
        let posts = vec![
            tt_post("7", "styleguru", 120_000),
            tt_post("7", "styleguru", 121_500),
        ];
        let ranked = top_creators(&posts, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].fans, 121_500);
        assert_eq!(ranked[0].post_count, 2);
    }

    #[test]
    fn creators_without_ids_merge_by_name() {
        let posts = vec![tt_post("", "NoId", 10), tt_post("", "noid", 20)];
        let ranked = top_creators(&posts, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].post_count, 2);
    }

    #[test]
    fn anonymous_posts_are_skipped() {
        let posts = vec![tt_post("", "", 999), tt_post("1", "named", 5)];
        let ranked = top_creators(&posts, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "named");
    }

    #[test]
    fn regions_group_by_country_code_case_insensitively() {
        let posts = vec![
            located(Some("Seattle"), Some("US")),
            located(Some("Portland"), Some("us")),
            located(None, Some("CA")),
        ];
        let dist = region_distribution(&posts);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].region, "US");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[1].region, "CA");
    }

    #[test]
    fn region_falls_back_to_city_without_country_code() {
        let posts = vec![located(Some("Seattle"), None)];
        let dist = region_distribution(&posts);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].region, "Seattle");
    }

    #[test]
    fn unlocated_posts_are_left_out_of_regions() {
        let posts = vec![tt_post("1", "someone", 0), located(None, None)];
        assert!(region_distribution(&posts).is_empty());
    }
}
