use ethiscan_core::Platform;

use super::{jsonld, Adapter, FieldChains};
use crate::strategy::Strategy;

/// Flipkart ships obfuscated class names that rotate between site builds;
/// each chain lists the current name first and older ones after it.
pub struct FlipkartAdapter;

static CHAINS: FieldChains = FieldChains {
    title: &[
        Strategy::text("title", "span.VU-ZEz"),
        Strategy::text("legacy-title", "span.B_NuCI"),
        Strategy::custom("json-ld", jsonld::product_name),
        Strategy::text("heading", "h1"),
    ],
    price: &[
        Strategy::text("price", "div.Nx9bqj"),
        Strategy::text("legacy-price", "div._30jeq3"),
        Strategy::custom("json-ld", jsonld::product_price),
    ],
    original_price: &[
        Strategy::text("mrp", "div.yRaY8j"),
        Strategy::text("legacy-mrp", "div._3I9_wc"),
    ],
    rating: &[
        Strategy::text("rating", "div.XQDdHH"),
        Strategy::text("legacy-rating", "div._3LWZlK"),
        Strategy::custom("json-ld", jsonld::product_rating),
    ],
    review_count: &[
        Strategy::text("ratings-and-reviews", "span.Wphh3N"),
        Strategy::text("legacy-ratings-and-reviews", "span._2_R_DZ"),
        Strategy::custom("json-ld", jsonld::product_review_count),
    ],
    brand: &[
        Strategy::text("brand", "span.mEh187"),
        Strategy::text("legacy-brand", "span.G6XhRU"),
        Strategy::custom("json-ld", jsonld::product_brand),
    ],
    availability: &[
        Strategy::text("sold-out", "div.Z8JjpR"),
        Strategy::text("legacy-sold-out", "div._16FRp0"),
        Strategy::text("action-button", "ul.row li button"),
        Strategy::custom("json-ld", jsonld::product_availability),
    ],
    images: &[
        Strategy::attr("hero", "img.DByuf4", "src"),
        Strategy::attr("legacy-hero", "img._396cs4", "src"),
        Strategy::custom("json-ld", jsonld::product_images),
        Strategy::meta("og-image", "og:image"),
    ],
    breadcrumbs: &[
        Strategy::trail("crumbs", "div.r2CdBx a"),
        Strategy::trail("legacy-crumbs", "div._1MR4o5 a"),
        Strategy::custom("json-ld", jsonld::breadcrumb_trail),
    ],
};

impl Adapter for FlipkartAdapter {
    fn platform(&self) -> Platform {
        Platform::Flipkart
    }

    fn chains(&self) -> &'static FieldChains {
        &CHAINS
    }
}
