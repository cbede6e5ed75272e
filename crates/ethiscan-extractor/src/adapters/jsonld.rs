//! schema.org JSON-LD readers, usable as custom strategies.
//!
//! Each reader returns raw candidate strings from every `Product` (or
//! `BreadcrumbList`) block on the page; normalization happens in the chain.

use serde_json::Value;

use crate::error::ExtractError;
use crate::page::{Page, TRAIL_SEPARATOR};

fn is_type(block: &Value, ty: &str) -> bool {
    match block.get("@type") {
        Some(Value::String(s)) => s == ty,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(ty)),
        _ => false,
    }
}

fn blocks_of_type(page: &Page, ty: &str) -> Result<Vec<Value>, ExtractError> {
    Ok(page
        .json_ld()?
        .into_iter()
        .filter(|block| is_type(block, ty))
        .collect())
}

/// Strings and numbers under `value`, descending into arrays.
fn scalars(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|item| scalars(item, out)),
        _ => {}
    }
}

/// Collects `key` from each product, or from each object under `nested`
/// when given (offers may be a single object or a list).
fn product_values(
    page: &Page,
    nested: Option<&str>,
    keys: &[&str],
) -> Result<Vec<String>, ExtractError> {
    let mut out = Vec::new();
    for product in blocks_of_type(page, "Product")? {
        let holders: Vec<&Value> = match nested.map(|n| product.get(n)) {
            None => vec![&product],
            Some(Some(Value::Array(items))) => items.iter().collect(),
            Some(Some(obj @ Value::Object(_))) => vec![obj],
            Some(_) => Vec::new(),
        };
        for holder in holders {
            for key in keys {
                if let Some(value) = holder.get(key) {
                    scalars(value, &mut out);
                }
            }
        }
    }
    Ok(out)
}

/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_name(page: &Page) -> Result<Vec<String>, ExtractError> {
    product_values(page, None, &["name"])
}

/// `offers.price`, falling back to `offers.lowPrice` for aggregate offers.
///
/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_price(page: &Page) -> Result<Vec<String>, ExtractError> {
    product_values(page, Some("offers"), &["price", "lowPrice"])
}

/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_rating(page: &Page) -> Result<Vec<String>, ExtractError> {
    product_values(page, Some("aggregateRating"), &["ratingValue"])
}

/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_review_count(page: &Page) -> Result<Vec<String>, ExtractError> {
    product_values(page, Some("aggregateRating"), &["reviewCount", "ratingCount"])
}

/// `brand` as a plain string or as a `Brand`/`Organization` object's `name`.
///
/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_brand(page: &Page) -> Result<Vec<String>, ExtractError> {
    let mut out = product_values(page, None, &["brand"])?;
    out.extend(product_values(page, Some("brand"), &["name"])?);
    Ok(out)
}

/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_availability(page: &Page) -> Result<Vec<String>, ExtractError> {
    product_values(page, Some("offers"), &["availability"])
}

/// `image` as a URL, a list of URLs, or `ImageObject`s carrying `url`.
///
/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn product_images(page: &Page) -> Result<Vec<String>, ExtractError> {
    let mut out = product_values(page, None, &["image"])?;
    out.extend(product_values(page, Some("image"), &["url", "contentUrl"])?);
    Ok(out)
}

/// Names of a `BreadcrumbList` ordered by `position`, joined into one trail.
///
/// # Errors
///
/// Propagates [`ExtractError`] from the page.
pub fn breadcrumb_trail(page: &Page) -> Result<Vec<String>, ExtractError> {
    let mut trails = Vec::new();
    for list in blocks_of_type(page, "BreadcrumbList")? {
        let Some(Value::Array(items)) = list.get("itemListElement") else {
            continue;
        };
        let mut crumbs: Vec<(u64, String)> = items
            .iter()
            .filter_map(|item| {
                let name = item
                    .get("name")
                    .or_else(|| item.get("item").and_then(|i| i.get("name")))
                    .and_then(Value::as_str)?
                    .trim();
                let position = item.get("position").and_then(Value::as_u64).unwrap_or(0);
                (!name.is_empty()).then(|| (position, name.to_string()))
            })
            .collect();
        if crumbs.is_empty() {
            continue;
        }
        crumbs.sort_by_key(|(position, _)| *position);
        let names: Vec<String> = crumbs.into_iter().map(|(_, name)| name).collect();
        trails.push(names.join(TRAIL_SEPARATOR));
    }
    Ok(trails)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <script type="application/ld+json">
        [{
          "@context": "https://schema.org",
          "@type": ["Product", "Thing"],
          "name": "Steel Water Bottle",
          "brand": {"@type": "Brand", "name": "Milton"},
          "image": [{"@type": "ImageObject", "url": "https://cdn.test/1.jpg"}, "https://cdn.test/2.jpg"],
          "offers": [{"@type": "Offer", "price": 649, "availability": "https://schema.org/InStock"}],
          "aggregateRating": {"ratingValue": "4.4", "ratingCount": 2310}
        },
        {
          "@type": "BreadcrumbList",
          "itemListElement": [
            {"position": 2, "name": "Bottles"},
            {"position": 1, "item": {"name": "Kitchen"}}
          ]
        }]
        </script>
    "#;

    fn page() -> Page {
        Page::parse("https://shop.example.com/p/bottle", HTML)
    }

    #[test]
    fn reads_product_fields() {
        let page = page();
        assert_eq!(product_name(&page).unwrap(), vec!["Steel Water Bottle"]);
        assert_eq!(product_price(&page).unwrap(), vec!["649"]);
        assert_eq!(product_rating(&page).unwrap(), vec!["4.4"]);
        assert_eq!(product_review_count(&page).unwrap(), vec!["2310"]);
        assert_eq!(product_brand(&page).unwrap(), vec!["Milton"]);
        assert_eq!(
            product_availability(&page).unwrap(),
            vec!["https://schema.org/InStock"]
        );
    }

    #[test]
    fn images_accept_strings_and_image_objects() {
        let images = product_images(&page()).unwrap();
        assert!(images.contains(&"https://cdn.test/1.jpg".to_string()));
        assert!(images.contains(&"https://cdn.test/2.jpg".to_string()));
    }

    #[test]
    fn breadcrumbs_are_ordered_by_position() {
        assert_eq!(
            breadcrumb_trail(&page()).unwrap(),
            vec!["Kitchen › Bottles"]
        );
    }

    #[test]
    fn page_without_json_ld_yields_nothing() {
        let page = Page::parse("https://shop.example.com/", "<p>hi</p>");
        assert!(product_name(&page).unwrap().is_empty());
        assert!(breadcrumb_trail(&page).unwrap().is_empty());
    }
}
