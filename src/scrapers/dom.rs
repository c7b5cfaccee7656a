use scraper::{ElementRef, Selector};

/// Text content of the first element matching `selector`, trimmed.
///
/// Returns `None` when the selector matches nothing or only whitespace, so
/// callers can substitute the sentinel per field.
pub fn select_text(scope: ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    scope
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Attribute value of the first element matching `selector`.
pub fn select_attr(scope: ElementRef, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    scope
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}
