use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency attached to every record. Never inferred from the page; the
/// remote scorer assumes rupee prices.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Category used when neither breadcrumbs nor URL keywords resolve one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Retailer a page belongs to.
///
/// `Unknown` is accepted on the wire for compatibility with the remote
/// service; hostname detection never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Flipkart,
    Myntra,
    Generic,
    Unknown,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Flipkart => "flipkart",
            Platform::Myntra => "myntra",
            Platform::Generic => "generic",
            Platform::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Limited,
    #[default]
    Unknown,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::InStock => write!(f, "in_stock"),
            Availability::OutOfStock => write!(f, "out_of_stock"),
            Availability::Limited => write!(f, "limited"),
            Availability::Unknown => write!(f, "unknown"),
        }
    }
}

/// Normalized snapshot of one product listing as observed on one page.
///
/// The field set is the wire contract with the remote analysis service and
/// only grows additively. Optional fields the extractor could not determine
/// are omitted from the JSON form rather than sent as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// List / MRP price shown struck through next to the selling price.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,
    pub currency: String,
    /// Star rating on a 0–5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub platform: Platform,
}

impl ProductRecord {
    /// A structurally valid record carrying only the always-resolved fields.
    #[must_use]
    pub fn empty(url: impl Into<String>, platform: Platform) -> Self {
        Self {
            url: url.into(),
            title: None,
            price: None,
            original_price: None,
            currency: DEFAULT_CURRENCY.to_string(),
            rating: None,
            review_count: None,
            brand: None,
            availability: Availability::Unknown,
            images: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            platform,
        }
    }
}

/// The single value held by the last-extraction cache slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedExtraction {
    pub record: ProductRecord,
    pub extracted_at: DateTime<Utc>,
}

impl CachedExtraction {
    #[must_use]
    pub fn now(record: ProductRecord) -> Self {
        Self {
            record,
            extracted_at: Utc::now(),
        }
    }
}
