//! Named lookup strategies and the "first success wins" combinator.
//!
//! A field's fallback chain is a plain slice of [`Strategy`] values. Each
//! strategy yields zero or more raw candidates from the page; the combinator
//! walks strategies in order and returns the first candidate that the field's
//! normalizer accepts. Chains are data, so adapters declare them as statics
//! and tests can exercise a single chain against an HTML fragment.

use crate::error::ExtractError;
use crate::page::Page;

/// Custom lookup for sources that are not a single selector (JSON-LD,
/// inline style attributes, JSON-valued attributes).
pub type CustomLookup = fn(&Page) -> Result<Vec<String>, ExtractError>;

#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    /// Visible text of each element matching the selector.
    Text(&'static str),
    /// An attribute of each element matching the selector.
    Attr {
        selector: &'static str,
        attr: &'static str,
    },
    /// `content` of `<meta>` tags keyed by `property`/`name`/`itemprop`.
    Meta(&'static str),
    /// Texts of all matching crumb elements joined into one trail.
    Trail(&'static str),
    Custom(CustomLookup),
}

impl Lookup {
    /// Raw candidates for this lookup, in document order.
    ///
    /// # Errors
    ///
    /// Propagates [`ExtractError`] from the page (invalid selector or a
    /// failing custom reader).
    pub fn candidates(&self, page: &Page) -> Result<Vec<String>, ExtractError> {
        match *self {
            Lookup::Text(css) => page.texts(css),
            Lookup::Attr { selector, attr } => page.attrs(selector, attr),
            Lookup::Meta(key) => page.meta(key),
            Lookup::Trail(css) => page.trail(css),
            Lookup::Custom(read) => read(page),
        }
    }
}

/// One named entry in a field's fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub lookup: Lookup,
}

impl Strategy {
    #[must_use]
    pub const fn text(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            lookup: Lookup::Text(selector),
        }
    }

    #[must_use]
    pub const fn attr(name: &'static str, selector: &'static str, attr: &'static str) -> Self {
        Self {
            name,
            lookup: Lookup::Attr { selector, attr },
        }
    }

    #[must_use]
    pub const fn meta(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            lookup: Lookup::Meta(key),
        }
    }

    #[must_use]
    pub const fn trail(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            lookup: Lookup::Trail(selector),
        }
    }

    #[must_use]
    pub const fn custom(name: &'static str, read: CustomLookup) -> Self {
        Self {
            name,
            lookup: Lookup::Custom(read),
        }
    }
}

/// Walks `chain` and returns the first candidate `accept` maps to a value.
///
/// A strategy whose candidates are all rejected does not stop the walk.
/// Exhausting the chain yields `Ok(None)`.
///
/// # Errors
///
/// Returns the first [`ExtractError`] raised by a strategy; later strategies
/// are not tried.
pub fn first_success<T, F>(
    page: &Page,
    field: &'static str,
    chain: &[Strategy],
    accept: F,
) -> Result<Option<T>, ExtractError>
where
    F: Fn(&str) -> Option<T>,
{
    for strategy in chain {
        let candidates = strategy.lookup.candidates(page)?;
        if let Some(value) = candidates.iter().find_map(|raw| accept(raw)) {
            tracing::trace!(field, strategy = strategy.name, "field resolved");
            return Ok(Some(value));
        }
    }
    tracing::trace!(field, "fallback chain exhausted");
    Ok(None)
}

/// Returns the candidates of the first strategy that yields any, de-duplicated
/// in order. Used for multi-valued fields such as image galleries.
///
/// # Errors
///
/// Returns the first [`ExtractError`] raised by a strategy.
pub fn first_list(
    page: &Page,
    field: &'static str,
    chain: &[Strategy],
) -> Result<Vec<String>, ExtractError> {
    for strategy in chain {
        let candidates = strategy.lookup.candidates(page)?;
        if candidates.is_empty() {
            continue;
        }
        let mut seen = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !seen.contains(&candidate) {
                seen.push(candidate);
            }
        }
        tracing::trace!(field, strategy = strategy.name, count = seen.len(), "list resolved");
        return Ok(seen);
    }
    Ok(Vec::new())
}
