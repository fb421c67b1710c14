use super::document::Document;
use super::heuristics::Heuristics;

/// Build a short, human-meaningful CSS selector for `node`.
///
/// Preference order: `#id`, the first class token that is not a grid utility,
/// `tag.firstClass`, bare tag. Always non-empty.
pub fn css_selector<'a, D: Document>(doc: &'a D, node: D::Node<'a>, heuristics: &Heuristics) -> String {
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("#{}", id);
    }

    let classes = doc.classes(node);
    if let Some(cls) = classes
        .iter()
        .find(|c| c.chars().count() > 2 && !heuristics.is_utility_class(c))
    {
        return format!(".{}", cls);
    }

    let tag = doc.tag_name(node);
    match classes.first() {
        Some(first) => format!("{}.{}", tag, first),
        None => tag.to_string(),
    }
}
