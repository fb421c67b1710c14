pub mod container;
pub mod document;
pub mod fields;
pub mod filters;
pub mod heuristics;
pub mod items;
pub mod pagination;
pub mod schema;
pub mod selector;

use tracing::debug;

use document::{Document, HtmlDocument};
use heuristics::Heuristics;
use schema::{ItemPattern, SiteSchema};

/// One full induction pass: container, items (+ fields), pagination, filters.
pub fn analyze_page<D: Document>(doc: &D, heuristics: &Heuristics) -> SiteSchema {
    let container = container::find_main_container(doc, heuristics);

    let items = items::cluster_items(doc, heuristics).map(|cluster| {
        let sample = cluster.sample;
        ItemPattern {
            tag: doc.tag_name(sample).to_string(),
            selector: selector::css_selector(doc, sample, heuristics),
            class_signature: cluster.signature,
            sample_count: cluster.count,
            title_field: fields::title::extract(doc, sample, heuristics),
            date_field: fields::date::extract(doc, sample, heuristics),
            link_field: fields::link::extract(doc, sample, heuristics),
        }
    });

    let pagination = pagination::infer(doc);
    let filters = filters::infer(doc, heuristics);

    debug!(
        url = doc.url(),
        container = %container.selector,
        items = items.as_ref().map(|i| i.sample_count).unwrap_or(0),
        paginated = pagination.is_some(),
        "page analyzed"
    );

    SiteSchema {
        url: doc.url().to_string(),
        page_title: doc.title(),
        container,
        items,
        pagination,
        filters,
    }
}

/// Parse `markup` and analyze it. The parsed tree lives only for this call.
pub fn analyze_html(url: &str, markup: &str, heuristics: &Heuristics) -> SiteSchema {
    let doc = HtmlDocument::parse(url, markup);
    analyze_page(&doc, heuristics)
}
