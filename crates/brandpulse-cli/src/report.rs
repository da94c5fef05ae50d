//! Offline aggregate reports from local row exports.
//!
//! Loads `{slug}.{platform}.json` files through the store's `FileSource`,
//! runs the same normalize/filter/aggregate pipeline the server uses, and
//! prints one JSON document to stdout.

use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::Serialize;

use brandpulse_core::{
    BrandConfig, DateRange, FilterSelection, MonthName, MonthSelection, Platform, Scored,
};
use brandpulse_metrics::{
    aggregate_instagram, aggregate_tiktok, filter_posts, sentiment_distribution, top_hashtags,
    InstagramEngagement, SentimentDistribution, TagCount, TikTokEngagement,
};
use brandpulse_store::{refresh_brands, FileSource, PostStore};

const REPORT_TOP_HASHTAGS: usize = 5;

#[derive(Debug, Serialize)]
struct Report {
    platform: String,
    month: String,
    brands: Vec<BrandReport>,
}

#[derive(Debug, Serialize)]
struct BrandReport {
    name: String,
    slug: String,
    role: String,
    post_count: usize,
    engagement: Engagement,
    top_hashtags: Vec<TagCount>,
    sentiment: SentimentDistribution,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Engagement {
    Instagram(InstagramEngagement),
    Tiktok(TikTokEngagement),
}

/// Default "all months" span used when no explicit range is configured:
/// February through May of the current year, matching the dashboard default.
fn default_span(year: i32) -> Option<DateRange> {
    DateRange::month_span(year, MonthName::February, MonthName::May)
}

fn resolve_selection(platform: Platform, month: &str) -> anyhow::Result<FilterSelection> {
    let year = Utc::now().year();
    match MonthSelection::parse(month) {
        MonthSelection::AllMonths => {
            let range = default_span(year)
                .ok_or_else(|| anyhow::anyhow!("failed to build the all-months span"))?;
            Ok(FilterSelection::all_months(platform, range))
        }
        MonthSelection::Named(name) => FilterSelection::named_month(platform, name, year)
            .ok_or_else(|| anyhow::anyhow!("failed to build a range for {name}")),
        MonthSelection::Unrecognized(raw) => {
            anyhow::bail!("unrecognized month selection '{raw}'; use a month name or \"All\"")
        }
    }
}

async fn brand_report(
    store: &PostStore,
    brand: &BrandConfig,
    selection: &FilterSelection,
) -> BrandReport {
    let slug = brand.slug();
    let (post_count, engagement, tags, sentiment) = match selection.platform {
        Platform::Instagram => {
            let posts = store.instagram_posts(&slug).await;
            let filtered = filter_posts(&posts, selection);
            let tags: Vec<String> = filtered
                .iter()
                .flat_map(|p| p.hashtags.iter().cloned())
                .collect();
            let sentiment =
                sentiment_distribution(filtered.iter().map(|p| p.sentiment().label));
            (
                filtered.len(),
                Engagement::Instagram(aggregate_instagram(filtered)),
                tags,
                sentiment,
            )
        }
        Platform::Tiktok => {
            let posts = store.tiktok_posts(&slug).await;
            let filtered = filter_posts(&posts, selection);
            let tags: Vec<String> = filtered
                .iter()
                .flat_map(|p| p.hashtags.iter().map(|t| t.name.clone()))
                .collect();
            let sentiment =
                sentiment_distribution(filtered.iter().map(|p| p.sentiment().label));
            (
                filtered.len(),
                Engagement::Tiktok(aggregate_tiktok(filtered)),
                tags,
                sentiment,
            )
        }
    };

    BrandReport {
        name: brand.name.clone(),
        slug,
        role: brand.role.to_string(),
        post_count,
        engagement,
        top_hashtags: top_hashtags(tags.iter().map(String::as_str), REPORT_TOP_HASHTAGS),
        sentiment,
    }
}

pub(crate) async fn run_report(
    data_dir: &Path,
    platform: &str,
    brand_filter: Option<&str>,
    month: &str,
    brands_path: &Path,
) -> anyhow::Result<()> {
    let platform = Platform::from_str(platform)
        .map_err(|e| anyhow::anyhow!("invalid --platform: {e}"))?;
    let roster = brandpulse_core::load_brands(brands_path)?;

    let brands: Vec<BrandConfig> = match brand_filter {
        Some(slug) => {
            let brand = roster
                .by_slug(slug)
                .ok_or_else(|| anyhow::anyhow!("brand '{slug}' not found in roster"))?;
            vec![brand.clone()]
        }
        None => roster.brands.clone(),
    };

    let selection = resolve_selection(platform, month)?;

    let store = PostStore::new();
    let source = FileSource::new(data_dir);
    refresh_brands(&store, &source, &brands, platform).await;

    let mut reports = Vec::with_capacity(brands.len());
    for brand in &brands {
        reports.push(brand_report(&store, brand, &selection).await);
    }

    let report = Report {
        platform: platform.to_string(),
        month: month.to_string(),
        brands: reports,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
