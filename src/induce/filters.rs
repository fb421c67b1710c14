use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::document::Document;
use super::heuristics::Heuristics;
use super::schema::FilterSet;

static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

const TITLE_LEN: std::ops::RangeInclusive<usize> = 20..=200;
const MAX_INCLUDE: usize = 3;
const MIN_TAG_COUNT: usize = 2;

/// Anchor texts long enough to be item titles, in document order.
pub fn collect_titles<D: Document>(doc: &D) -> Vec<String> {
    doc.find_all(doc.root(), &["a"])
        .into_iter()
        .map(|a| doc.text(a))
        .filter(|t| TITLE_LEN.contains(&t.chars().count()))
        .collect()
}

pub fn infer<D: Document>(doc: &D, heuristics: &Heuristics) -> FilterSet {
    infer_from_titles(&collect_titles(doc), heuristics)
}

/// Recurring `[TAG]` markers become include patterns; banned words become
/// (upper-cased) exclude patterns, one per offending title.
pub fn infer_from_titles<S: AsRef<str>>(titles: &[S], heuristics: &Heuristics) -> FilterSet {
    let mut tag_counts: IndexMap<&str, usize> = IndexMap::new();
    for title in titles {
        for caps in BRACKET_RE.captures_iter(title.as_ref()) {
            if let Some(inner) = caps.get(1) {
                *tag_counts.entry(inner.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(&str, usize)> = tag_counts
        .into_iter()
        .filter(|(_, count)| *count >= MIN_TAG_COUNT)
        .collect();
    // stable: equal counts keep first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let include_patterns = ranked
        .into_iter()
        .take(MAX_INCLUDE)
        .map(|(tag, _)| format!("[{}]", tag))
        .collect();

    let exclude_patterns = titles
        .iter()
        .filter_map(|title| {
            heuristics
                .banned_words
                .iter()
                .find(|banned| banned.is_match(title.as_ref()))
                .map(|banned| banned.word.to_uppercase())
        })
        .collect();

    FilterSet {
        include_patterns,
        exclude_patterns,
    }
}
