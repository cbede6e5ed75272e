use ethiscan_core::Platform;
use serde_json::{Map, Value};

use super::{jsonld, Adapter, FieldChains};
use crate::error::ExtractError;
use crate::page::Page;
use crate::strategy::Strategy;

pub struct AmazonAdapter;

static CHAINS: FieldChains = FieldChains {
    title: &[
        Strategy::text("product-title", "#productTitle"),
        Strategy::text("title-section", "#title span"),
        Strategy::meta("og-title", "og:title"),
    ],
    price: &[
        Strategy::text("price-to-pay", ".a-price.priceToPay .a-offscreen"),
        Strategy::text(
            "core-price-desktop",
            "#corePriceDisplay_desktop_feature_div .a-price .a-offscreen",
        ),
        Strategy::text("core-price", "#corePrice_feature_div .a-price .a-offscreen"),
        Strategy::text("deal-price", "#priceblock_dealprice"),
        Strategy::text("our-price", "#priceblock_ourprice"),
        Strategy::text("buybox-price", "#price_inside_buybox"),
    ],
    original_price: &[
        Strategy::text(
            "strike-price",
            ".a-price.a-text-price[data-a-strike=\"true\"] .a-offscreen",
        ),
        Strategy::text("basis-price", "span.basisPrice .a-offscreen"),
        Strategy::text("list-price", "#listPrice"),
        Strategy::text("legacy-list-price", "#priceblock_listprice"),
    ],
    rating: &[
        Strategy::attr("popover-title", "#acrPopover", "title"),
        Strategy::text("popover-alt", "#acrPopover .a-icon-alt"),
        Strategy::text("star-icon-alt", "i.a-icon-star .a-icon-alt"),
    ],
    review_count: &[
        Strategy::text("customer-reviews", "#acrCustomerReviewText"),
        Strategy::text("review-link", "#acrCustomerReviewLink span"),
    ],
    brand: &[
        Strategy::text("byline", "#bylineInfo"),
        Strategy::text("brand-anchor", "a#brand"),
        Strategy::text("overview-brand", "tr.po-brand td.a-span9 span"),
    ],
    availability: &[
        Strategy::text("availability", "#availability"),
        Strategy::text("out-of-stock", "#outOfStock"),
        Strategy::attr("add-to-cart", "#add-to-cart-button", "value"),
        Strategy::text("buy-now", "#buy-now-button"),
    ],
    images: &[
        Strategy::custom("dynamic-image", dynamic_images),
        Strategy::attr("landing-hires", "#landingImage", "data-old-hires"),
        Strategy::attr("landing-src", "#landingImage", "src"),
        Strategy::attr("alt-images", "#altImages img", "src"),
        Strategy::meta("og-image", "og:image"),
    ],
    breadcrumbs: &[
        Strategy::trail("wayfinding", "#wayfinding-breadcrumbs_feature_div ul li a"),
        Strategy::custom("json-ld", jsonld::breadcrumb_trail),
    ],
};

impl Adapter for AmazonAdapter {
    fn platform(&self) -> Platform {
        Platform::Amazon
    }

    fn chains(&self) -> &'static FieldChains {
        &CHAINS
    }
}

/// Image URLs keyed in the `data-a-dynamic-image` JSON object of the hero
/// image (`{"https://...jpg":[500,500], ...}`).
fn dynamic_images(page: &Page) -> Result<Vec<String>, ExtractError> {
    let mut urls = Vec::new();
    for raw in page.attrs("#landingImage, #imgBlkFront", "data-a-dynamic-image")? {
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(map) => urls.extend(map.into_iter().map(|(url, _)| url)),
            Err(e) => {
                tracing::debug!(url = page.url(), error = %e, "unreadable data-a-dynamic-image");
            }
        }
    }
    Ok(urls)
}
