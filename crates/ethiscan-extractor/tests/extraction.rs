//! End-to-end extraction passes over captured-style product pages.
//!
//! Each test drives the full `Orchestrator` (detection, adapter, record
//! assembly, cache) against a static HTML fixture.

use std::sync::Arc;

use ethiscan_core::{Availability, Platform};
use ethiscan_extractor::{
    Adapter, AdapterRegistry, ExtractError, ExtractionCache, FieldChains, MemoryCache,
    Orchestrator, Page, PartialProductRecord, Strategy,
};
use rust_decimal::Decimal;
use serde_json::json;

fn orchestrator() -> (Orchestrator, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let orchestrator = Orchestrator::new(AdapterRegistry::with_defaults(), cache.clone());
    (orchestrator, cache)
}

const AMAZON_PAGE: &str = r#"<!doctype html>
<html><head><title>Amazon.in: Bamboo Toothbrush</title></head>
<body>
  <div id="wayfinding-breadcrumbs_feature_div"><ul>
    <li><a href="/health">Health &amp; Personal Care</a></li>
    <li><span>›</span></li>
    <li><a href="/oral">Oral Care</a></li>
  </ul></div>
  <span id="productTitle">Rusabl Bamboo Toothbrush, Pack of 4</span>
  <a id="bylineInfo" href="/stores/Rusabl">Visit the Rusabl Store</a>
  <span id="acrPopover" title="4.3 out of 5 stars"><span class="a-icon-alt">4.3 out of 5 stars</span></span>
  <span id="acrCustomerReviewText">12,456 ratings</span>
  <div id="corePriceDisplay_desktop_feature_div">
    <span class="a-price priceToPay"><span class="a-offscreen">₹1,499.00</span></span>
    <span class="a-price a-text-price" data-a-strike="true"><span class="a-offscreen">₹2,499.00</span></span>
  </div>
  <div id="availability"><span class="a-size-medium a-color-success">In stock</span></div>
  <div id="imgTagWrapperId">
    <img id="landingImage" src="https://m.media-amazon.com/images/I/small._SX38_.jpg"
         data-old-hires="https://m.media-amazon.com/images/I/large.jpg">
  </div>
</body></html>"#;

#[test]
fn amazon_page_extracts_full_record() {
    let (orchestrator, cache) = orchestrator();
    let page = Page::parse("https://www.amazon.in/Rusabl-Bamboo/dp/B0TEST", AMAZON_PAGE);

    let report = orchestrator.run(&page);
    assert!(report.success);
    let record = &report.record;
    assert_eq!(record.platform, Platform::Amazon);
    assert_eq!(
        record.title.as_deref(),
        Some("Rusabl Bamboo Toothbrush, Pack of 4")
    );
    assert_eq!(record.brand.as_deref(), Some("Rusabl"));
    assert_eq!(record.price, Some(Decimal::new(149_900, 2)));
    assert_eq!(record.original_price, Some(Decimal::new(249_900, 2)));
    assert_eq!(record.rating, Some(4.3));
    assert_eq!(record.review_count, Some(12_456));
    assert_eq!(record.availability, Availability::InStock);
    assert_eq!(
        record.images,
        vec!["https://m.media-amazon.com/images/I/large.jpg"]
    );
    assert_eq!(record.category, "Health & Personal Care");
    assert_eq!(record.currency, "INR");

    let cached = cache.last().expect("successful pass is cached");
    assert_eq!(cached.record, report.record);
}

#[test]
fn price_present_rating_absent() {
    let (orchestrator, _) = orchestrator();
    let html = r#"<div class="Nx9bqj">₹9,999</div><span class="VU-ZEz">Steel Bottle 1L</span>"#;
    let page = Page::parse("https://www.flipkart.com/steel-bottle/p/itm1", html);

    let reply = orchestrator.run(&page).into_reply();
    assert!(reply.success);
    let data = serde_json::to_value(reply.data.expect("data on success")).unwrap();
    assert_eq!(data["price"], json!(9999.0));
    assert!(data.get("rating").is_none());
    assert!(data.get("reviewCount").is_none());
    assert_eq!(data["platform"], "flipkart");
    assert_eq!(data["availability"], "unknown");
}

#[test]
fn generic_page_without_hints_is_general() {
    let (orchestrator, _) = orchestrator();
    let html = r#"<html><head><meta property="og:title" content="Handwoven Basket"></head>
                  <body><img itemprop="image" src="basket.jpg"></body></html>"#;
    let page = Page::parse("https://shop.example.com/p/42", html);

    let record = orchestrator.run(&page).record;
    assert_eq!(record.platform, Platform::Generic);
    assert_eq!(record.title.as_deref(), Some("Handwoven Basket"));
    assert_eq!(record.category, "General");
    assert_eq!(record.images, vec!["https://shop.example.com/p/basket.jpg"]);
}

#[test]
fn url_keyword_category_when_no_breadcrumbs() {
    let (orchestrator, _) = orchestrator();
    let page = Page::parse("https://www.myntra.com/fashion/roadster/tee/123/buy", "");
    let record = orchestrator.run(&page).record;
    assert_eq!(record.platform, Platform::Myntra);
    assert_eq!(record.category, "Fashion");
}

#[test]
fn every_platform_survives_partial_pages() {
    let fragments = [
        "",
        "<span id=\"productTitle\">Only a title</span>",
        "<div class=\"XQDdHH\">not a number</div>",
        "<span class=\"pdp-price\"><strong>free</strong></span>",
        "<script type=\"application/ld+json\">{\"@type\":\"Product\",\"offers\":7}</script>",
    ];
    let urls = [
        "https://www.amazon.in/dp/X",
        "https://www.flipkart.com/p/X",
        "https://www.myntra.com/X/buy",
        "https://shop.example.com/X",
    ];
    let (orchestrator, _) = orchestrator();
    for url in urls {
        for html in fragments {
            let report = orchestrator.run(&Page::parse(url, html));
            assert!(report.success, "{url} with {html:?}");
            assert!(!report.record.category.is_empty());
            if let Some(rating) = report.record.rating {
                assert!((0.0..=5.0).contains(&rating));
            }
        }
    }
}

#[test]
fn absurd_review_count_is_dropped_not_fatal() {
    let (orchestrator, cache) = orchestrator();
    let html = r#"<span id="productTitle">Steel Bottle</span>
        <span id="acrCustomerReviewText">79228162514264337593543950335K ratings</span>"#;
    let report = orchestrator.run(&Page::parse("https://www.amazon.in/dp/B0BIG", html));

    assert!(report.success);
    assert_eq!(report.record.title.as_deref(), Some("Steel Bottle"));
    assert!(report.record.review_count.is_none());
    assert!(cache.last().is_some());
}

struct BrokenAdapter;

fn detached_node(_: &Page) -> Result<Vec<String>, ExtractError> {
    Err(ExtractError::Document {
        context: "price".to_string(),
        reason: "node detached during render".to_string(),
    })
}

static BROKEN_CHAINS: FieldChains = FieldChains {
    title: &[Strategy::text("title", "h1")],
    price: &[Strategy::custom("detached", detached_node)],
    original_price: &[],
    rating: &[],
    review_count: &[],
    brand: &[],
    availability: &[],
    images: &[],
    breadcrumbs: &[],
};

impl Adapter for BrokenAdapter {
    fn platform(&self) -> Platform {
        Platform::Amazon
    }

    fn chains(&self) -> &'static FieldChains {
        &BROKEN_CHAINS
    }
}

#[test]
fn adapter_failure_is_contained() {
    let cache = Arc::new(MemoryCache::new());
    let mut registry = AdapterRegistry::with_defaults();
    registry.register(Box::new(BrokenAdapter));
    let orchestrator = Orchestrator::new(registry, cache.clone());

    let page = Page::parse("https://www.amazon.in/dp/B0TEST", "<h1>Title</h1>");
    let report = orchestrator.run(&page);
    assert!(!report.success);
    assert_eq!(report.record.platform, Platform::Amazon);
    assert!(report.record.title.is_none());

    let reply = serde_json::to_value(report.into_reply()).unwrap();
    assert_eq!(reply, json!({"success": false, "data": null}));
    assert!(cache.last().is_none(), "failed pass must not touch the cache");
}

#[test]
fn failed_pass_keeps_previous_cache_entry() {
    let cache = Arc::new(MemoryCache::new());
    let healthy = Orchestrator::new(AdapterRegistry::with_defaults(), cache.clone());
    let _ = healthy.run(&Page::parse("https://shop.example.com/p/1", "<h1>First</h1>"));

    let mut registry = AdapterRegistry::with_defaults();
    registry.register(Box::new(BrokenAdapter));
    let broken = Orchestrator::new(registry, cache.clone());
    let _ = broken.run(&Page::parse("https://www.amazon.in/dp/B0TEST", "<h1>Second</h1>"));

    let last = cache.last().unwrap();
    assert_eq!(last.record.title.as_deref(), Some("First"));
}

#[test]
fn partial_record_default_is_empty() {
    let partial = PartialProductRecord::default();
    assert!(partial.title.is_none());
    assert!(partial.images.is_empty());
}
