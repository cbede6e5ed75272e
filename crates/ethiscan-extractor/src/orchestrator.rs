//! One extraction pass: detect → extract → normalize → report.
//!
//! The pass is an explicit state machine stepped by [`Orchestrator::advance`].
//! Adapter failures are contained here; callers always get a report.

use std::sync::Arc;
use std::time::Duration;

use ethiscan_core::{CachedExtraction, Platform, ProductRecord, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};

use crate::adapters::{AdapterRegistry, PartialProductRecord};
use crate::cache::ExtractionCache;
use crate::category::infer_category;
use crate::page::Page;
use crate::platform::detect_platform;

#[derive(Debug, Clone, PartialEq)]
pub enum PassState {
    Idle,
    Detecting,
    Extracting(Platform),
    Normalizing(Platform, PartialProductRecord),
    Done(ExtractionReport),
}

/// Outcome of one pass. On failure `record` is the empty record for the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub success: bool,
    pub record: ProductRecord,
}

impl ExtractionReport {
    /// The failed outcome for `url`: an empty record that is never cached.
    #[must_use]
    pub fn failed(url: impl Into<String>, platform: Platform) -> Self {
        Self {
            success: false,
            record: ProductRecord::empty(url, platform),
        }
    }

    #[must_use]
    pub fn into_reply(self) -> MessageReply {
        MessageReply {
            success: self.success,
            data: self.success.then_some(self.record),
        }
    }
}

/// Wire reply to an inbound message: `{"success": bool, "data": record|null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReply {
    pub success: bool,
    pub data: Option<ProductRecord>,
}

pub struct Orchestrator {
    registry: AdapterRegistry,
    cache: Arc<dyn ExtractionCache>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(registry: AdapterRegistry, cache: Arc<dyn ExtractionCache>) -> Self {
        Self { registry, cache }
    }

    #[must_use]
    pub fn cache(&self) -> &dyn ExtractionCache {
        self.cache.as_ref()
    }

    /// Performs one transition. `Done` is terminal and returned unchanged.
    #[must_use]
    pub fn advance(&self, page: &Page, state: PassState) -> PassState {
        match state {
            PassState::Idle => PassState::Detecting,
            PassState::Detecting => {
                let platform = page
                    .hostname()
                    .map_or(Platform::Generic, |host| detect_platform(&host));
                tracing::debug!(url = page.url(), %platform, "platform detected");
                PassState::Extracting(platform)
            }
            PassState::Extracting(platform) => {
                match self.registry.resolve(platform).extract(page) {
                    Ok(partial) => PassState::Normalizing(platform, partial),
                    Err(e) => {
                        tracing::warn!(
                            url = page.url(),
                            %platform,
                            error = %e,
                            "product extraction failed"
                        );
                        PassState::Done(ExtractionReport::failed(page.url(), platform))
                    }
                }
            }
            PassState::Normalizing(platform, partial) => {
                let record = assemble_record(page.url(), platform, partial);
                self.cache.store(CachedExtraction::now(record.clone()));
                tracing::info!(
                    url = page.url(),
                    %platform,
                    has_price = record.price.is_some(),
                    availability = %record.availability,
                    images = record.images.len(),
                    "product extracted"
                );
                PassState::Done(ExtractionReport {
                    success: true,
                    record,
                })
            }
            done @ PassState::Done(_) => done,
        }
    }

    /// Runs a fresh pass over `page` to completion.
    #[must_use]
    pub fn run(&self, page: &Page) -> ExtractionReport {
        let mut state = PassState::Idle;
        loop {
            state = self.advance(page, state);
            if let PassState::Done(report) = state {
                return report;
            }
        }
    }

    /// Waits `settle` for the page to finish rendering, then reads its HTML
    /// from `page_source` and runs a pass.
    pub async fn run_after<F>(
        &self,
        settle: Duration,
        url: &str,
        page_source: F,
    ) -> ExtractionReport
    where
        F: FnOnce() -> String,
    {
        tokio::time::sleep(settle).await;
        let html = page_source();
        let page = Page::parse(url, &html);
        self.run(&page)
    }
}

/// Builds the final record from an adapter's partial result.
#[must_use]
pub fn assemble_record(
    url: &str,
    platform: Platform,
    partial: PartialProductRecord,
) -> ProductRecord {
    ProductRecord {
        url: url.to_string(),
        title: partial.title,
        price: partial.price,
        original_price: partial.original_price,
        currency: DEFAULT_CURRENCY.to_string(),
        rating: partial.rating,
        review_count: partial.review_count,
        brand: partial.brand,
        availability: partial.availability.unwrap_or_default(),
        images: absolute_images(url, partial.images),
        category: infer_category(partial.breadcrumbs.as_deref(), url),
        platform,
    }
}

/// Resolves image references against the page URL, keeps only http(s)
/// results, and drops duplicates while preserving order.
fn absolute_images(page_url: &str, raw: Vec<String>) -> Vec<String> {
    let base = reqwest::Url::parse(page_url).ok();
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for candidate in raw {
        let resolved = match &base {
            Some(base) => base.join(&candidate),
            None => reqwest::Url::parse(&candidate),
        };
        let Ok(resolved) = resolved else {
            tracing::debug!(candidate = %candidate, "dropping unresolvable image url");
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        let resolved = resolved.to_string();
        if !out.contains(&resolved) {
            out.push(resolved);
        }
    }
    out
}
