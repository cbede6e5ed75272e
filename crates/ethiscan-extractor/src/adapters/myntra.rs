use std::sync::LazyLock;

use ethiscan_core::Platform;
use regex::Regex;

use super::{jsonld, Adapter, FieldChains};
use crate::error::ExtractError;
use crate::page::Page;
use crate::strategy::Strategy;

/// `url("...")` inside an inline `background-image` style.
static BACKGROUND_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')]+)["']?\s*\)"#).expect("valid background url regex")
});

pub struct MyntraAdapter;

static CHAINS: FieldChains = FieldChains {
    title: &[
        Strategy::text("pdp-name", "h1.pdp-name"),
        Strategy::custom("json-ld", jsonld::product_name),
        Strategy::meta("og-title", "og:title"),
    ],
    price: &[
        Strategy::text("pdp-price-strong", "span.pdp-price strong"),
        Strategy::text("pdp-price", "span.pdp-price"),
        Strategy::custom("json-ld", jsonld::product_price),
    ],
    original_price: &[
        Strategy::text("pdp-mrp-strike", "span.pdp-mrp s"),
        Strategy::text("pdp-mrp", "span.pdp-mrp"),
    ],
    rating: &[
        Strategy::text("overall-rating-value", "div.index-overallRating > div"),
        Strategy::text("overall-rating", "div.index-overallRating"),
        Strategy::custom("json-ld", jsonld::product_rating),
    ],
    review_count: &[
        Strategy::text("ratings-count", "div.index-ratingsCount"),
        Strategy::custom("json-ld", jsonld::product_review_count),
    ],
    brand: &[
        Strategy::text("pdp-title", "h1.pdp-title"),
        Strategy::custom("json-ld", jsonld::product_brand),
    ],
    availability: &[
        Strategy::text("out-of-stock", "div.size-buttons-out-of-stock"),
        Strategy::text("add-to-bag", "div.pdp-add-to-bag"),
        Strategy::custom("json-ld", jsonld::product_availability),
    ],
    images: &[
        Strategy::custom("image-grid", image_grid),
        Strategy::custom("json-ld", jsonld::product_images),
        Strategy::meta("og-image", "og:image"),
    ],
    breadcrumbs: &[
        Strategy::trail("crumbs", "div.breadcrumbs-container a"),
        Strategy::custom("json-ld", jsonld::breadcrumb_trail),
    ],
};

impl Adapter for MyntraAdapter {
    fn platform(&self) -> Platform {
        Platform::Myntra
    }

    fn chains(&self) -> &'static FieldChains {
        &CHAINS
    }
}

/// Gallery images are CSS backgrounds on `div.image-grid-image`, not `<img>`.
fn image_grid(page: &Page) -> Result<Vec<String>, ExtractError> {
    Ok(page
        .attrs("div.image-grid-image", "style")?
        .iter()
        .filter_map(|style| BACKGROUND_URL_RE.captures(style))
        .map(|caps| caps[1].trim().to_string())
        .collect())
}
