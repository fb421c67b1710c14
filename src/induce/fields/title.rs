use super::{field_ref, text_len};
use crate::induce::document::Document;
use crate::induce::heuristics::Heuristics;
use crate::induce::schema::{AttributeSource, FieldRef};

const ANCHOR_LEN: std::ops::RangeInclusive<usize> = 20..=200;
const HEADING_LEN: std::ops::RangeInclusive<usize> = 10..=200;
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// First headline-sized anchor of `item`, else the first reasonable heading.
pub fn extract<'a, D: Document>(doc: &'a D, item: D::Node<'a>, heuristics: &Heuristics) -> Option<FieldRef> {
    let anchor = doc
        .find_all(item, &["a"])
        .into_iter()
        .find(|a| ANCHOR_LEN.contains(&text_len(doc, *a)));

    if let Some(a) = anchor {
        let source = match doc.attr(a, "title") {
            Some(t) if !t.trim().is_empty() => AttributeSource::Title,
            _ => AttributeSource::Text,
        };
        return Some(field_ref(doc, a, heuristics, source, Some("href")));
    }

    doc.find_all(item, HEADINGS)
        .into_iter()
        .find(|h| HEADING_LEN.contains(&text_len(doc, *h)))
        .map(|h| field_ref(doc, h, heuristics, AttributeSource::Text, None))
}
