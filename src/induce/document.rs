use scraper::{ElementRef, Html};
use url::Url;

/// Read-only view over a parsed page. The induction passes only ever talk to
/// this trait, so any HTML tree that can answer these queries can be analyzed.
pub trait Document {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Address the page was loaded from.
    fn url(&self) -> &str;

    fn root(&self) -> Self::Node<'_>;

    /// Descendants of `scope` (not `scope` itself) whose tag is in `tags`, in document order.
    fn find_all<'a>(&'a self, scope: Self::Node<'a>, tags: &[&str]) -> Vec<Self::Node<'a>>;

    fn tag_name<'a>(&'a self, node: Self::Node<'a>) -> &'a str;

    fn attr<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<&'a str>;

    /// Concatenated text of the node and all its descendants, trimmed.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn parent<'a>(&'a self, node: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// Resolve a (possibly relative) href against the page's base URL.
    /// Unresolvable input is returned unchanged.
    fn resolve_url(&self, href: &str) -> String;

    /// Class tokens in the order they are listed in the markup.
    fn classes<'a>(&'a self, node: Self::Node<'a>) -> Vec<&'a str> {
        self.attr(node, "class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Text of the first `<title>` element, or empty.
    fn title(&self) -> String {
        let root = self.root();
        self.find_all(root, &["title"])
            .first()
            .map(|t| self.text(*t))
            .unwrap_or_default()
    }
}

/// `Document` backed by the `scraper` crate's html5ever tree.
pub struct HtmlDocument {
    url: String,
    base: Option<Url>,
    html: Html,
}

impl HtmlDocument {
    /// Parse `markup` as loaded from `url`. A `<base href>` in the page takes
    /// precedence over the page URL when resolving links.
    pub fn parse(url: &str, markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let page = Url::parse(url).ok();

        let declared = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "base")
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string);

        let base = match (declared, &page) {
            (Some(href), Some(page)) => page.join(&href).ok().or_else(|| Some(page.clone())),
            (Some(href), None) => Url::parse(&href).ok(),
            (None, page) => page.clone(),
        };

        HtmlDocument {
            url: url.to_string(),
            base,
            html,
        }
    }
}

impl Document for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn url(&self) -> &str {
        &self.url
    }

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    fn find_all<'a>(&'a self, scope: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
        scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| tags.contains(&el.value().name()))
            .collect()
    }

    fn tag_name<'a>(&'a self, node: ElementRef<'a>) -> &'a str {
        node.value().name()
    }

    fn attr<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<&'a str> {
        node.value().attr(name)
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect::<String>().trim().to_string()
    }

    fn parent<'a>(&'a self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        node.parent().and_then(ElementRef::wrap)
    }

    fn resolve_url(&self, href: &str) -> String {
        self.base
            .as_ref()
            .and_then(|base| base.join(href.trim()).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_in_document_order() {
        let doc = HtmlDocument::parse(
            "https://example.com/",
            "<div id='a'><p>x</p><div id='b'><span>y</span></div></div><div id='c'></div>",
        );
        let ids: Vec<_> = doc
            .find_all(doc.root(), &["div"])
            .into_iter()
            .filter_map(|n| doc.attr(n, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn scope_is_excluded() {
        let doc = HtmlDocument::parse("https://example.com/", "<div id='outer'><div id='inner'></div></div>");
        let outer = doc.find_all(doc.root(), &["div"])[0];
        let inner = doc.find_all(outer, &["div"]);
        assert_eq!(inner.len(), 1);
        assert_eq!(doc.attr(inner[0], "id"), Some("inner"));
    }

    #[test]
    fn text_is_trimmed_and_concatenated() {
        let doc = HtmlDocument::parse("https://example.com/", "<p>  Hello <b>world</b>  </p>");
        let p = doc.find_all(doc.root(), &["p"])[0];
        assert_eq!(doc.text(p), "Hello world");
    }

    #[test]
    fn parent_navigation_stops_at_root() {
        let doc = HtmlDocument::parse("https://example.com/", "<ul class='list'><li>x</li></ul>");
        let li = doc.find_all(doc.root(), &["li"])[0];
        let ul = doc.parent(li).unwrap();
        assert_eq!(doc.tag_name(ul), "ul");
        assert!(doc.parent(doc.root()).is_none());
    }

    #[test]
    fn classes_keep_markup_order() {
        let doc = HtmlDocument::parse("https://example.com/", "<div class=' zeta  alpha mid '></div>");
        let div = doc.find_all(doc.root(), &["div"])[0];
        assert_eq!(doc.classes(div), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn resolves_relative_and_base_href() {
        let doc = HtmlDocument::parse("https://s.com/news/", "<a href='p/2'>2</a>");
        assert_eq!(doc.resolve_url("p/2"), "https://s.com/news/p/2");
        assert_eq!(doc.resolve_url("/x?page=3"), "https://s.com/x?page=3");

        let based = HtmlDocument::parse(
            "https://s.com/news/",
            "<html><head><base href='https://cdn.s.com/archive/'></head><body></body></html>",
        );
        assert_eq!(based.resolve_url("p/2"), "https://cdn.s.com/archive/p/2");
    }

    #[test]
    fn unresolvable_href_passes_through() {
        let doc = HtmlDocument::parse("not a url", "<p></p>");
        assert_eq!(doc.resolve_url("page/2"), "page/2");
    }

    #[test]
    fn title_from_head() {
        let doc = HtmlDocument::parse(
            "https://example.com/",
            "<html><head><title> Daily News </title></head><body></body></html>",
        );
        assert_eq!(doc.title(), "Daily News");
    }
}
