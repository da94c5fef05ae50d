use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::Platform;

/// Role of a brand in every dashboard comparison: the single primary brand
/// is always shown; competitors are selected against it one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandRole {
    Primary,
    Competitor,
}

impl std::fmt::Display for BrandRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrandRole::Primary => write!(f, "primary"),
            BrandRole::Competitor => write!(f, "competitor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub role: BrandRole,
    /// Sheet identifier holding this brand's Instagram row export.
    /// Absent means no data source is known: reads yield zero posts.
    pub instagram_sheet: Option<String>,
    /// Sheet identifier holding this brand's TikTok row export.
    pub tiktok_sheet: Option<String>,
    pub notes: Option<String>,
}

impl BrandConfig {
    /// Generate a URL-safe slug from the brand name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Sheet identifier for the given platform, if one is configured.
    #[must_use]
    pub fn sheet_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Instagram => self.instagram_sheet.as_deref(),
            Platform::Tiktok => self.tiktok_sheet.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandConfig>,
}

impl BrandsFile {
    /// The primary brand. Validation guarantees exactly one exists.
    #[must_use]
    pub fn primary(&self) -> Option<&BrandConfig> {
        self.brands.iter().find(|b| b.role == BrandRole::Primary)
    }

    /// All competitor brands, in roster order.
    #[must_use]
    pub fn competitors(&self) -> Vec<&BrandConfig> {
        self.brands
            .iter()
            .filter(|b| b.role == BrandRole::Competitor)
            .collect()
    }

    /// Look up a brand by its slug.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&BrandConfig> {
        self.brands.iter().find(|b| b.slug() == slug)
    }
}

/// Load and validate the brand roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<BrandsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brands_file: BrandsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::BrandsFileParse)?;

    validate_brands(&brands_file)?;

    Ok(brands_file)
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();
    let mut primary_count = 0usize;

    for brand in &brands_file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if brand.role == BrandRole::Primary {
            primary_count += 1;
        }

        let lower_name = brand.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        let slug = brand.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.name
            )));
        }
    }

    if primary_count != 1 {
        return Err(ConfigError::Validation(format!(
            "the roster must declare exactly one primary brand, found {primary_count}"
        )));
    }

    Ok(())
}
