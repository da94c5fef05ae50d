//! Canonical domain model for the Brandpulse dashboard.
//!
//! Holds the typed post records that the ingest layer produces, the brand
//! roster and platform enums, month/date-range filter types, the tolerant
//! date parser shared by ingest and filtering, and the env-based app config.

pub mod app_config;
pub mod brands;
pub mod config;
pub mod datetime;
pub mod error;
pub mod months;
pub mod platform;
pub mod posts;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brands, BrandConfig, BrandRole, BrandsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use datetime::parse_date_like;
pub use error::ConfigError;
pub use months::{DateRange, FilterSelection, MonthName, MonthSelection};
pub use platform::Platform;
pub use posts::{
    AuthorMeta, InstagramPost, LocationMeta, MediaType, Scored, SentimentLabel, SentimentScore,
    TikTokPost, TikTokTag, Timestamped,
};
