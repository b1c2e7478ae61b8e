use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Elements whose lowercase text contains any of these are treated as boilerplate.
const EXCLUDED_KEYWORDS: [&str; 3] = ["disclaimer", "cookie", "privacy policy"];

const CONTENT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6";

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

/// Extract readable text from an HTML page.
///
/// Paragraphs and headings are taken in document order, boilerplate elements are dropped, the
/// remainder is joined with single spaces, and runs of blank lines collapse into one newline.
pub fn page_text(html: &str) -> String {
    let Ok(selector) = Selector::parse(CONTENT_SELECTOR) else {
        return String::new();
    };
    let document = Html::parse_document(html);
    let kept: Vec<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .filter(|text| {
            let lowered = text.to_lowercase();
            !EXCLUDED_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .collect();

    BLANK_LINES.replace_all(&kept.join(" "), "\n").into_owned()
}
