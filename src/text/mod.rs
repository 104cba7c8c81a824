//! Markup stripping applied to every text before it is embedded.

use scraper::Html;


/// Returns the visible text of `raw` with markup removed and the result
/// trimmed.
///
/// Any input is accepted; text without markup passes through unchanged apart
/// from trimming, and character entities are decoded.
pub fn normalize_markup(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}
