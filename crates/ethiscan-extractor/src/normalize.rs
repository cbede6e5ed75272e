//! Pure text normalizers: raw page text in, typed values out.
//!
//! Every function here is deterministic and reads only its argument. No
//! currency or locale is inferred beyond what literally appears in the text.

use std::str::FromStr;
use std::sync::LazyLock;

use ethiscan_core::Availability;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number directly after a currency marker: `"₹1,499.00"`, `"Rs. 799"`, `"$45.99"`.
static CURRENCY_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:₹|\$|€|£|rs\.?|inr|usd)\s*(\d[\d,]*(?:\.\d+)?)")
        .expect("valid currency amount regex")
});

/// Any number with optional thousands separators and decimals.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid amount regex"));

static RATING_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*out\s+of\s+5\b").expect("valid out-of regex"),
        Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*5\b").expect("valid slash regex"),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*stars?\b").expect("valid stars regex"),
    ]
});

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid decimal regex"));

/// Digit run with separators, an optional fraction, and an optional
/// `k`/`m` magnitude suffix (`"12.5k Ratings"`).
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*)(\.\d+)?\s*([kKmM])?\b").expect("valid review count regex")
});

static ONLY_LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"only\s+\d+\s+left").expect("valid only-left regex"));

const OUT_OF_STOCK_PHRASES: &[&str] = &[
    "out of stock",
    "outofstock",
    "sold out",
    "soldout",
    "currently unavailable",
    "unavailable",
    "not available",
    "discontinued",
    "notify me",
];

const LIMITED_PHRASES: &[&str] = &[
    "limitedavailability",
    "limited stock",
    "limited availability",
    "few left",
    "hurry",
];

const IN_STOCK_PHRASES: &[&str] = &[
    "in stock",
    "instock",
    "add to cart",
    "add to bag",
    "buy now",
    "available",
];

/// Collapses runs of whitespace into single spaces and trims.
///
/// Returns `None` when nothing but whitespace remains.
#[must_use]
pub fn clean_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Parses the first monetary amount in `raw`.
///
/// An amount that follows a currency marker wins over a bare number earlier
/// in the text, so `"Save 20% ₹1,499"` yields `1499`. Thousands separators
/// (including Indian `1,49,999` grouping) are stripped before parsing.
///
/// ```
/// use ethiscan_extractor::normalize::normalize_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize_price("₹1,499.00"), Some(Decimal::new(149_900, 2)));
/// assert_eq!(normalize_price("no price"), None);
/// ```
#[must_use]
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    let matched = CURRENCY_AMOUNT_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .or_else(|| AMOUNT_RE.find(raw))?;
    let digits: String = matched.as_str().chars().filter(|c| *c != ',').collect();
    let value = Decimal::from_str(&digits).ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

/// Parses a 0–5 star rating from visible text or an accessibility label.
///
/// Tries `"<N> out of 5"`, `"<N>/5"`, and `"<N> stars"` before falling back
/// to the first decimal number. Values outside `[0, 5]` are rejected.
#[must_use]
pub fn normalize_rating(raw: &str) -> Option<f32> {
    let matched = RATING_PATTERNS
        .iter()
        .find_map(|re| re.captures(raw).and_then(|caps| caps.get(1)))
        .or_else(|| DECIMAL_RE.find(raw))?;
    let value = matched.as_str().parse::<f32>().ok()?;
    (0.0..=5.0).contains(&value).then_some(value)
}

/// Parses the first count in `raw`: `"12,456 ratings"` → `12456`.
///
/// A trailing `k` or `m` scales the number (`"1.2k"` → `1200`); without a
/// suffix any fractional part is ignored.
#[must_use]
pub fn normalize_review_count(raw: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(raw)?;
    let whole: String = caps[1].chars().filter(|c| *c != ',').collect();

    let Some(suffix) = caps.get(3) else {
        return whole.parse::<u64>().ok();
    };

    let multiplier = match suffix.as_str() {
        "k" | "K" => Decimal::from(1_000u32),
        _ => Decimal::from(1_000_000u32),
    };
    let fraction = caps.get(2).map_or("", |m| m.as_str());
    Decimal::from_str(&format!("{whole}{fraction}"))
        .ok()?
        .checked_mul(multiplier)?
        .trunc()
        .to_u64()
}

/// Classifies stock text, including schema.org availability URLs.
///
/// Out-of-stock phrases are checked first because several of them contain
/// the word "available".
#[must_use]
pub fn normalize_availability(raw: &str) -> Option<Availability> {
    let lower = raw.to_lowercase();
    let contains_any = |phrases: &[&str]| phrases.iter().any(|p| lower.contains(p));

    if contains_any(OUT_OF_STOCK_PHRASES) {
        Some(Availability::OutOfStock)
    } else if contains_any(LIMITED_PHRASES) || ONLY_LEFT_RE.is_match(&lower) {
        Some(Availability::Limited)
    } else if contains_any(IN_STOCK_PHRASES) {
        Some(Availability::InStock)
    } else {
        None
    }
}

/// Strips retailer decoration around a brand name: `"Visit the Rusabl Store"`,
/// `"Brand: Rusabl"`.
#[must_use]
pub fn normalize_brand(raw: &str) -> Option<String> {
    let text = clean_text(raw)?;
    let mut brand = text.as_str();
    for prefix in ["Visit the ", "Brand: ", "Brand:"] {
        if let Some(rest) = brand.strip_prefix(prefix) {
            brand = rest;
        }
    }
    if let Some(rest) = brand.strip_suffix(" Store") {
        brand = rest;
    }
    clean_text(brand)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
