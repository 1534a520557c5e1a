use scraper::{ElementRef, Html, Selector};

use crate::corpus::categorize::categorize;
use crate::corpus::CorpusError;
use crate::models::section::ReferenceSection;

const SECTION_SELECTOR: &str = ".section-container";
const HEADING_SELECTOR: &str = "h2, h3";
const PARAGRAPH_SELECTOR: &str = "p";

fn selector(css: &str) -> Result<Selector, CorpusError> {
    Selector::parse(css).map_err(|e| CorpusError::Parse(format!("bad selector {css}: {e}")))
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts every `.section-container` that has both an `id` and a heading.
///
/// `content` is the first paragraph only; sections are returned in page order.
pub fn parse_sections(html: &str, protocol_url: &str) -> Result<Vec<ReferenceSection>, CorpusError> {
    let document = Html::parse_document(html);
    let container = selector(SECTION_SELECTOR)?;
    let heading = selector(HEADING_SELECTOR)?;
    let paragraph = selector(PARAGRAPH_SELECTOR)?;
    let base = protocol_url.trim_end_matches('/');

    let sections = document
        .select(&container)
        .filter_map(|element| {
            let id = element.value().attr("id").unwrap_or("");
            let title = first_text(&element, &heading);
            if id.is_empty() || title.is_empty() {
                return None;
            }
            let content = first_text(&element, &paragraph);
            Some(ReferenceSection {
                section_id: id.to_string(),
                categories: categorize(&title, &content),
                url: format!("{base}#{id}"),
                title,
                content,
                created_at: None,
            })
        })
        .collect();

    Ok(sections)
}
