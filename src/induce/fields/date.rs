use tracing::trace;

use super::{field_ref, text_len};
use crate::induce::document::Document;
use crate::induce::heuristics::Heuristics;
use crate::induce::schema::{AttributeSource, FieldRef};

const DATE_TAGS: &[&str] = &["span", "div", "time", "p"];
const MIN_KEYWORD_TEXT_LEN: usize = 5;

/// First element whose text looks like a date. Failing that, the first
/// element whose class names it as a date and carries some text.
pub fn extract<'a, D: Document>(doc: &'a D, item: D::Node<'a>, heuristics: &Heuristics) -> Option<FieldRef> {
    let elements = doc.find_all(item, DATE_TAGS);

    let by_text = elements.iter().copied().find(|el| {
        match heuristics.match_date(&doc.text(*el)) {
            Some(pattern) => {
                trace!(pattern, "date text matched");
                true
            }
            None => false,
        }
    });

    let found = by_text.or_else(|| {
        elements.iter().copied().find(|el| {
            let named = doc.classes(*el).iter().any(|c| {
                let c = c.to_lowercase();
                heuristics.date_keywords.iter().any(|kw| *kw == c)
            });
            named && text_len(doc, *el) > MIN_KEYWORD_TEXT_LEN
        })
    });

    found.map(|el| field_ref(doc, el, heuristics, AttributeSource::Text, None))
}
