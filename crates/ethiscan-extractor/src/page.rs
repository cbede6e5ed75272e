//! Read-only view over one product page.
//!
//! Wraps a parsed [`scraper::Html`] document together with the URL it was
//! loaded from. All lookups return every matching candidate in document
//! order, already whitespace-collapsed and with empty values dropped, so the
//! strategy combinator can decide which candidate wins.
//!
//! `scraper::Html` is `!Send`; keep a `Page` inside one synchronous call and
//! never hold it across an `.await`.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::error::ExtractError;
use crate::normalize::clean_text;

/// Separator placed between crumbs when a breadcrumb trail is assembled from
/// separate elements.
pub const TRAIL_SEPARATOR: &str = " › ";

pub struct Page {
    url: String,
    document: Html,
}

impl Page {
    #[must_use]
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lowercased hostname of the page URL, if it parses.
    #[must_use]
    pub fn hostname(&self) -> Option<String> {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    }

    /// Visible text of every element matching `css`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] if `css` does not parse.
    pub fn texts(&self, css: &str) -> Result<Vec<String>, ExtractError> {
        let sel = selector(css)?;
        Ok(self
            .document
            .select(&sel)
            .filter_map(|el| clean_text(&element_text(&el)))
            .collect())
    }

    /// Value of `attr` on every element matching `css` that carries it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] if `css` does not parse.
    pub fn attrs(&self, css: &str, attr: &str) -> Result<Vec<String>, ExtractError> {
        let sel = selector(css)?;
        Ok(self
            .document
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .filter_map(clean_text)
            .collect())
    }

    /// `content` of `<meta>` tags whose `property`, `name`, or `itemprop`
    /// equals `key` (OpenGraph and product meta conventions).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] if `key` yields an unparseable selector.
    pub fn meta(&self, key: &str) -> Result<Vec<String>, ExtractError> {
        let css = format!(
            "meta[property=\"{key}\"], meta[name=\"{key}\"], meta[itemprop=\"{key}\"]"
        );
        self.attrs(&css, "content")
    }

    /// Texts of all elements matching `css` joined into one breadcrumb trail.
    ///
    /// Returns an empty vector when nothing matches, otherwise a single
    /// candidate such as `"Electronics › Mobiles › Smartphones"`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] if `css` does not parse.
    pub fn trail(&self, css: &str) -> Result<Vec<String>, ExtractError> {
        let crumbs = self.texts(css)?;
        if crumbs.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![crumbs.join(TRAIL_SEPARATOR)])
    }

    /// Every JSON-LD object on the page, with top-level arrays and `@graph`
    /// containers flattened. Blocks that are not valid JSON are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] only if the fixed script selector
    /// fails to parse.
    pub fn json_ld(&self) -> Result<Vec<Value>, ExtractError> {
        let sel = selector(r#"script[type="application/ld+json"]"#)?;
        let mut out = Vec::new();
        for el in self.document.select(&sel) {
            let raw: String = el.text().collect();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => flatten_json_ld(value, &mut out),
                Err(e) => {
                    tracing::debug!(url = %self.url, error = %e, "skipping malformed JSON-LD block");
                }
            }
        }
        Ok(out)
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_json_ld(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><head>
          <meta property="og:title" content="  Organic Cotton Tee ">
          <meta name="product:price:amount" content="799.00">
          <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
              {"@type":"Product","name":"Organic Cotton Tee"},
              {"@type":"BreadcrumbList","itemListElement":[]}
            ]}
          </script>
          <script type="application/ld+json">{not json</script>
        </head><body>
          <h1 id="title">
             Organic   Cotton
             Tee
          </h1>
          <ul class="crumbs"><li><a>Clothing</a></li><li><a>Men</a></li><li><a> </a></li></ul>
          <img class="hero" src="/img/1.jpg"><img class="hero" data-src="/img/2.jpg">
        </body></html>
    "#;

    #[test]
    fn texts_collapse_whitespace() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        assert_eq!(page.texts("#title").unwrap(), vec!["Organic Cotton Tee"]);
    }

    #[test]
    fn attrs_skip_elements_without_attribute() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        assert_eq!(page.attrs("img.hero", "src").unwrap(), vec!["/img/1.jpg"]);
    }

    #[test]
    fn meta_matches_property_and_name() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        assert_eq!(page.meta("og:title").unwrap(), vec!["Organic Cotton Tee"]);
        assert_eq!(page.meta("product:price:amount").unwrap(), vec!["799.00"]);
    }

    #[test]
    fn trail_joins_non_empty_crumbs() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        assert_eq!(page.trail(".crumbs a").unwrap(), vec!["Clothing › Men"]);
        assert!(page.trail(".missing a").unwrap().is_empty());
    }

    #[test]
    fn json_ld_flattens_graph_and_skips_bad_blocks() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        let blocks = page.json_ld().unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().any(|b| b["@type"] == "Product"));
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let page = Page::parse("https://shop.example.com/p/tee", HTML);
        let err = page.texts("div[").unwrap_err();
        assert!(matches!(err, ExtractError::Selector { ref selector, .. } if selector == "div["));
    }

    #[test]
    fn hostname_is_lowercased() {
        let page = Page::parse("https://WWW.Amazon.IN/dp/B0TEST", "");
        assert_eq!(page.hostname().as_deref(), Some("www.amazon.in"));
        assert!(Page::parse("not a url", "").hostname().is_none());
    }
}
