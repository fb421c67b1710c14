use super::{field_ref, text_len};
use crate::induce::document::Document;
use crate::induce::heuristics::Heuristics;
use crate::induce::schema::{AttributeSource, FieldRef};

const MIN_LINK_TEXT: usize = 20;

pub fn extract<'a, D: Document>(doc: &'a D, item: D::Node<'a>, heuristics: &Heuristics) -> Option<FieldRef> {
    let anchors: Vec<_> = doc
        .find_all(item, &["a"])
        .into_iter()
        .filter(|a| doc.attr(*a, "href").is_some())
        .collect();

    anchors
        .iter()
        .copied()
        .find(|a| text_len(doc, *a) >= MIN_LINK_TEXT)
        .or_else(|| anchors.first().copied())
        .map(|a| field_ref(doc, a, heuristics, AttributeSource::Text, Some("href")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::induce::document::HtmlDocument;

    fn link_of(item: &str) -> Option<FieldRef> {
        let doc = HtmlDocument::parse("https://s.com/", item);
        let div = doc.find_all(doc.root(), &["div"])[0];
        extract(&doc, div, &Heuristics::default())
    }

    #[test]
    fn prefers_descriptive_anchor() {
        let f = link_of(
            "<div><a class='thumb' href='/s/1'>img</a><a class='story-link' href='/s/1'>Read the whole story here</a></div>",
        )
        .unwrap();
        assert_eq!(f.selector, ".story-link");
        assert_eq!(f.href_attr.as_deref(), Some("href"));
    }

    #[test]
    fn falls_back_to_first_href() {
        let f = link_of("<div><a name='top'>An anchor without any href at all</a><a id='go' href='/s/1'>go</a></div>").unwrap();
        assert_eq!(f.selector, "#go");
    }

    #[test]
    fn no_href_no_field() {
        assert!(link_of("<div><a>Just text, no destination here.</a></div>").is_none());
    }
}
