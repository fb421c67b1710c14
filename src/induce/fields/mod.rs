pub mod date;
pub mod link;
pub mod title;

use super::document::Document;
use super::heuristics::Heuristics;
use super::schema::{AttributeSource, FieldRef};
use super::selector::css_selector;

fn field_ref<'a, D: Document>(
    doc: &'a D,
    node: D::Node<'a>,
    heuristics: &Heuristics,
    attribute_source: AttributeSource,
    href_attr: Option<&str>,
) -> FieldRef {
    FieldRef {
        tag: doc.tag_name(node).to_string(),
        selector: css_selector(doc, node, heuristics),
        attribute_source,
        href_attr: href_attr.map(str::to_string),
    }
}

fn text_len<'a, D: Document>(doc: &'a D, node: D::Node<'a>) -> usize {
    doc.text(node).chars().count()
}
