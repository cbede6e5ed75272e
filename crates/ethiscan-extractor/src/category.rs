//! Coarse product category resolution.
//!
//! Resolution is tiered and always produces a value: breadcrumb trail, then
//! URL keywords, then [`DEFAULT_CATEGORY`].

use ethiscan_core::DEFAULT_CATEGORY;

/// Characters that separate crumbs in a breadcrumb trail. A category name
/// that itself contains one of these is split too.
const BREADCRUMB_DELIMITERS: &[char] = &['›', '>', '/', '\n'];

/// URL keywords in priority order, each mapped to the category it implies.
const URL_KEYWORDS: &[(&str, &str)] = &[
    ("electronics", "Electronics"),
    ("fashion", "Fashion"),
    ("clothing", "Fashion"),
    ("home", "Home"),
];

/// Resolves a category from an optional breadcrumb trail and the page URL.
#[must_use]
pub fn infer_category(breadcrumbs: Option<&str>, url: &str) -> String {
    if let Some(category) = breadcrumbs.and_then(first_crumb) {
        return category;
    }
    if let Some(category) = category_from_url(url) {
        return category.to_string();
    }
    DEFAULT_CATEGORY.to_string()
}

/// First non-empty crumb of a trail like `"Electronics › Mobiles"`.
#[must_use]
pub fn first_crumb(trail: &str) -> Option<String> {
    trail
        .split(BREADCRUMB_DELIMITERS)
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

fn category_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    URL_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_first_token_wins() {
        assert_eq!(
            infer_category(
                Some("Electronics › Mobiles & Accessories › Smartphones"),
                "https://www.amazon.in/dp/B0TEST"
            ),
            "Electronics"
        );
    }

    #[test]
    fn breadcrumb_mixed_delimiters_and_blanks() {
        assert_eq!(
            infer_category(Some("  › > Clothing / Men"), "https://x.test/"),
            "Clothing"
        );
    }

    #[test]
    fn breadcrumb_of_only_delimiters_falls_through_to_url() {
        assert_eq!(
            infer_category(Some(" › / > "), "https://x.test/home-decor/lamp"),
            "Home"
        );
    }

    #[test]
    fn url_keyword_priority() {
        assert_eq!(
            infer_category(None, "https://x.test/electronics/home-theatre"),
            "Electronics"
        );
        assert_eq!(
            infer_category(None, "https://x.test/Clothing/shirts"),
            "Fashion"
        );
    }

    #[test]
    fn no_breadcrumb_no_keyword_is_general() {
        assert_eq!(infer_category(None, "https://shop.example.com/p/42"), "General");
        assert_eq!(infer_category(Some(""), ""), "General");
    }

    #[test]
    fn delimiter_inside_category_name_splits() {
        assert_eq!(first_crumb("TV/Video › Projectors").as_deref(), Some("TV"));
    }
}
