use tracing::debug;

use super::document::Document;
use super::schema::{PaginationPattern, PAGE_PLACEHOLDER};

/// Derive a page-URL template from the numbered page links of `doc`.
///
/// Only anchors whose whole text is a page number above 1 count. The two
/// lowest distinct pages are resolved and diffed; the highest page seen anywhere is
/// reported alongside the template.
pub fn infer<D: Document>(doc: &D) -> Option<PaginationPattern> {
    let mut pages: Vec<(u32, &str)> = doc
        .find_all(doc.root(), &["a"])
        .into_iter()
        .filter_map(|a| {
            let page = parse_page_number(&doc.text(a))?;
            let href = doc.attr(a, "href")?;
            Some((page, href))
        })
        .collect();

    if pages.len() < 2 {
        return None;
    }

    let max_page_observed = pages.iter().map(|(n, _)| *n).max()?;
    pages.sort_by_key(|(n, _)| *n);
    // top and bottom pagers repeat the same numbers
    pages.dedup_by_key(|(n, _)| *n);
    if pages.len() < 2 {
        return None;
    }

    let first = doc.resolve_url(pages[0].1);
    let second = doc.resolve_url(pages[1].1);
    let template = diff_template(&first, &second)?;

    debug!(%template, max_page_observed, "pagination");
    Some(PaginationPattern {
        template,
        max_page_observed,
    })
}

fn parse_page_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().filter(|n| *n > 1)
}

/// Replace the span where two page URLs differ with the page placeholder.
///
/// The span starts at the first differing character and ends where the two
/// strings agree again at the same index (or where the shorter one ends).
/// Identical URLs yield `None`.
pub fn diff_template(first: &str, second: &str) -> Option<String> {
    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();
    let shorter = a.len().min(b.len());

    let start = (0..shorter).find(|&i| a[i] != b[i]).unwrap_or(shorter);
    if start == shorter && a.len() == b.len() {
        return None;
    }
    let end = (start..shorter).find(|&j| a[j] == b[j]).unwrap_or(shorter);

    let prefix: String = a[..start].iter().collect();
    let suffix: String = a[end..].iter().collect();
    Some(format!("{prefix}{PAGE_PLACEHOLDER}{suffix}"))
}
