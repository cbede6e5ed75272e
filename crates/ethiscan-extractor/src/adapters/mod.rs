//! Per-platform field adapters.
//!
//! Every adapter is a [`FieldChains`] table: for each product field an
//! ordered list of named strategies. Field resolution itself is shared
//! ([`extract_fields`]); adapters differ only in their tables.

mod amazon;
mod flipkart;
mod generic;
pub mod jsonld;
mod myntra;

use std::collections::HashMap;

use ethiscan_core::{Availability, Platform};
use rust_decimal::Decimal;

use crate::category::first_crumb;
use crate::error::ExtractError;
use crate::normalize::{
    clean_text, normalize_availability, normalize_brand, normalize_price, normalize_rating,
    normalize_review_count,
};
use crate::page::Page;
use crate::strategy::{first_list, first_success, Strategy};

pub use amazon::AmazonAdapter;
pub use flipkart::FlipkartAdapter;
pub use generic::GenericAdapter;
pub use myntra::MyntraAdapter;

/// Fallback chains for every field an adapter resolves.
#[derive(Debug)]
pub struct FieldChains {
    pub title: &'static [Strategy],
    pub price: &'static [Strategy],
    /// MRP / strike-through price.
    pub original_price: &'static [Strategy],
    pub rating: &'static [Strategy],
    pub review_count: &'static [Strategy],
    pub brand: &'static [Strategy],
    pub availability: &'static [Strategy],
    pub images: &'static [Strategy],
    pub breadcrumbs: &'static [Strategy],
}

/// What an adapter pulls off the page before record assembly.
///
/// `images` are raw and may be relative; `breadcrumbs` is the trail text the
/// category is inferred from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialProductRecord {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub rating: Option<f32>,
    pub review_count: Option<u64>,
    pub brand: Option<String>,
    pub availability: Option<Availability>,
    pub images: Vec<String>,
    pub breadcrumbs: Option<String>,
}

pub trait Adapter: Send + Sync {
    fn platform(&self) -> Platform;

    fn chains(&self) -> &'static FieldChains;

    /// Resolves every field independently; a missing field stays `None`.
    ///
    /// # Errors
    ///
    /// Any [`ExtractError`] raised by a strategy aborts the whole pass.
    fn extract(&self, page: &Page) -> Result<PartialProductRecord, ExtractError> {
        extract_fields(page, self.chains())
    }
}

/// Walks every chain in `chains` against `page`.
///
/// # Errors
///
/// Returns the first [`ExtractError`] raised by any strategy.
pub fn extract_fields(
    page: &Page,
    chains: &FieldChains,
) -> Result<PartialProductRecord, ExtractError> {
    Ok(PartialProductRecord {
        title: first_success(page, "title", chains.title, clean_text)?,
        price: first_success(page, "price", chains.price, normalize_price)?,
        original_price: first_success(
            page,
            "original_price",
            chains.original_price,
            normalize_price,
        )?,
        rating: first_success(page, "rating", chains.rating, normalize_rating)?,
        review_count: first_success(
            page,
            "review_count",
            chains.review_count,
            normalize_review_count,
        )?,
        brand: first_success(page, "brand", chains.brand, normalize_brand)?,
        availability: first_success(
            page,
            "availability",
            chains.availability,
            normalize_availability,
        )?,
        images: first_list(page, "images", chains.images)?,
        breadcrumbs: first_success(page, "breadcrumbs", chains.breadcrumbs, |raw| {
            first_crumb(raw).and_then(|_| clean_text(raw))
        })?,
    })
}

/// Adapters keyed by platform tag, with the generic adapter as fallback.
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Box<dyn Adapter>>,
    fallback: Box<dyn Adapter>,
}

impl AdapterRegistry {
    /// A registry holding only the generic adapter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: Box::new(GenericAdapter),
        }
    }

    /// A registry with every built-in adapter registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AmazonAdapter));
        registry.register(Box::new(FlipkartAdapter));
        registry.register(Box::new(MyntraAdapter));
        registry
    }

    /// Registers `adapter` under its own platform tag, replacing any previous
    /// entry. Registering a generic adapter replaces the fallback.
    pub fn register(&mut self, adapter: Box<dyn Adapter>) {
        match adapter.platform() {
            Platform::Generic => self.fallback = adapter,
            platform => {
                self.adapters.insert(platform, adapter);
            }
        }
    }

    /// The adapter for `platform`, or the generic fallback.
    #[must_use]
    pub fn resolve(&self, platform: Platform) -> &dyn Adapter {
        self.adapters
            .get(&platform)
            .map_or(self.fallback.as_ref(), Box::as_ref)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
