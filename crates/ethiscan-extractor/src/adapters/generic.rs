use ethiscan_core::Platform;

use super::{jsonld, Adapter, FieldChains};
use crate::strategy::Strategy;

/// Fallback for any storefront: structured data first (JSON-LD, OpenGraph
/// and `product:*` meta, schema.org microdata), then common markup.
pub struct GenericAdapter;

static CHAINS: FieldChains = FieldChains {
    title: &[
        Strategy::custom("json-ld", jsonld::product_name),
        Strategy::meta("og-title", "og:title"),
        Strategy::text("heading", "h1"),
        Strategy::text("document-title", "title"),
    ],
    price: &[
        Strategy::custom("json-ld", jsonld::product_price),
        Strategy::meta("product-price", "product:price:amount"),
        Strategy::meta("og-price", "og:price:amount"),
        Strategy::attr("microdata-price-content", "[itemprop=\"price\"]", "content"),
        Strategy::text("microdata-price", "[itemprop=\"price\"]"),
        Strategy::text("sale-price", ".price ins"),
        Strategy::text("price-class", ".price"),
    ],
    original_price: &[
        Strategy::meta("product-original-price", "product:original_price:amount"),
        Strategy::text("price-del", ".price del"),
        Strategy::text("compare-at", ".compare-at-price"),
        Strategy::text("was-price", ".was-price"),
    ],
    rating: &[
        Strategy::custom("json-ld", jsonld::product_rating),
        Strategy::attr("microdata-rating-content", "[itemprop=\"ratingValue\"]", "content"),
        Strategy::text("microdata-rating", "[itemprop=\"ratingValue\"]"),
    ],
    review_count: &[
        Strategy::custom("json-ld", jsonld::product_review_count),
        Strategy::attr("microdata-review-content", "[itemprop=\"reviewCount\"]", "content"),
        Strategy::text("microdata-review-count", "[itemprop=\"reviewCount\"]"),
        Strategy::text("microdata-rating-count", "[itemprop=\"ratingCount\"]"),
    ],
    brand: &[
        Strategy::custom("json-ld", jsonld::product_brand),
        Strategy::meta("product-brand", "product:brand"),
        Strategy::meta("og-brand", "og:brand"),
        Strategy::text("microdata-brand-name", "[itemprop=\"brand\"] [itemprop=\"name\"]"),
        Strategy::attr("microdata-brand-content", "[itemprop=\"brand\"]", "content"),
        Strategy::text("microdata-brand", "[itemprop=\"brand\"]"),
    ],
    availability: &[
        Strategy::custom("json-ld", jsonld::product_availability),
        Strategy::meta("product-availability", "product:availability"),
        Strategy::meta("og-availability", "og:availability"),
        Strategy::attr("microdata-availability-href", "link[itemprop=\"availability\"]", "href"),
        Strategy::attr("microdata-availability", "[itemprop=\"availability\"]", "content"),
        Strategy::text("stock-class", ".stock"),
        Strategy::text("availability-class", ".availability"),
    ],
    images: &[
        Strategy::custom("json-ld", jsonld::product_images),
        Strategy::meta("og-image", "og:image"),
        Strategy::meta("twitter-image", "twitter:image"),
        Strategy::attr("microdata-image", "img[itemprop=\"image\"]", "src"),
    ],
    breadcrumbs: &[
        Strategy::custom("json-ld", jsonld::breadcrumb_trail),
        Strategy::trail("aria-breadcrumb", "nav[aria-label=\"breadcrumb\"] a"),
        Strategy::trail("breadcrumb-class", ".breadcrumb a"),
        Strategy::trail("breadcrumbs-class", ".breadcrumbs a"),
    ],
};

impl Adapter for GenericAdapter {
    fn platform(&self) -> Platform {
        Platform::Generic
    }

    fn chains(&self) -> &'static FieldChains {
        &CHAINS
    }
}
