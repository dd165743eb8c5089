// LucidQuant - Content Extractor
//
// A page that yields readable text unlocks the tracked indicator list; a page
// that yields none does not. The text itself is never mined for numbers:
// values come from the generator. Whether real values were meant to be parsed
// out of the page is still undecided, so the stub stays explicit here.

use crate::catalog::TRACKED_INDICATORS;
use crate::generator;
use crate::models::NewIndicator;
use rand::Rng;
use scraper::{ElementRef, Html, Node, Selector};

/// Outcome of extraction. `Empty` is not an error: the orchestrator decides
/// what to store instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Extracted(Vec<NewIndicator>),
    Empty,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        match self {
            Extraction::Extracted(items) => items.is_empty(),
            Extraction::Empty => true,
        }
    }
}

const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Readable text of an HTML (or plain text) document, whitespace collapsed.
pub fn extract_text(raw_document: &str) -> String {
    let document = Html::parse_document(raw_document);
    let mut words: Vec<&str> = Vec::new();

    // `body` always exists after html5ever's tree building, but guard anyway
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    collect_text(root, &mut words);
    words.join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, words: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => words.extend(text.split_whitespace()),
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, words);
                }
            }
            _ => {}
        }
    }
}

/// Build the tracked indicator set when the document has readable text.
pub fn extract<R: Rng + ?Sized>(raw_document: &str, source_url: &str, rng: &mut R) -> Extraction {
    if extract_text(raw_document).is_empty() {
        return Extraction::Empty;
    }

    let indicators = TRACKED_INDICATORS
        .iter()
        .map(|descriptor| NewIndicator {
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            category: descriptor.category.into(),
            current_value: generator::value_for(descriptor.name, rng),
            trend: generator::trend(rng),
            source_url: source_url.to_string(),
        })
        .collect();

    Extraction::Extracted(indicators)
}
