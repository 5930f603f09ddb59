use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::{Image, Link, ScrapedRecord};

// ── Fallback sentinels ───────────────────────────────────────────────────────

const NO_TITLE: &str = "No title found";
const NO_ALT: &str = "No alt text";

// ── Lazy static selectors ────────────────────────────────────────────────────

static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

static HEADING_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

static PARAGRAPH_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

// Anchors without href and images without src are excluded by the selector.
static LINK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

static IMAGE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

// ── Public API ───────────────────────────────────────────────────────────────

/// Extract the fixed field set from an HTML document.
///
/// Deterministic over the parse tree: every pass walks the document in order,
/// keeps duplicates, and takes text content verbatim. The html5ever parser
/// behind `scraper` accepts arbitrary input, so there is no failure case.
pub fn extract_record(html: &str) -> ScrapedRecord {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SEL)
        .next()
        .map(text_content)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let headings = document
        .select(&HEADING_SEL)
        .map(text_content)
        .collect::<Vec<_>>();

    let paragraphs = document
        .select(&PARAGRAPH_SEL)
        .map(text_content)
        .collect::<Vec<_>>();

    let links = document
        .select(&LINK_SEL)
        .filter_map(|el| {
            // The selector guarantees href is present; emit it as written,
            // unresolved against any base URL.
            el.value().attr("href").map(|href| Link {
                text: text_content(el),
                href: href.to_string(),
            })
        })
        .collect::<Vec<_>>();

    let images = document
        .select(&IMAGE_SEL)
        .filter_map(|el| {
            let v = el.value();
            v.attr("src").map(|src| Image {
                src: src.to_string(),
                alt: v
                    .attr("alt")
                    .filter(|a| !a.is_empty())
                    .unwrap_or(NO_ALT)
                    .to_string(),
            })
        })
        .collect::<Vec<_>>();

    ScrapedRecord {
        title,
        headings,
        paragraphs,
        links,
        images,
    }
}

// ── DOM utility helpers ──────────────────────────────────────────────────────

/// Concatenate all descendant text nodes in document order, whitespace as
/// present in the source markup. Matches the DOM `textContent` property.
fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}
