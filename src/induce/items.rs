use indexmap::IndexMap;
use tracing::debug;

use super::document::Document;
use super::heuristics::Heuristics;

const CANDIDATE_TAGS: &[&str] = &["div", "article", "li", "section"];
const MIN_TEXT_LEN: usize = 50;
const MAX_TEXT_LEN: usize = 2000;
const MIN_TEXT_WITHOUT_KEYWORD: usize = 100;
const ANCESTOR_LEVELS: usize = 3;
const MIN_MEMBERS: usize = 3;

/// The winning group of structurally similar item nodes.
#[derive(Debug)]
pub struct Cluster<N> {
    pub signature: Vec<String>,
    /// First member in document order; field extraction runs against it alone.
    pub sample: N,
    pub count: usize,
}

/// Group item-looking nodes by class signature and return the largest group,
/// provided it has at least three members.
pub fn cluster_items<'a, D: Document>(doc: &'a D, heuristics: &Heuristics) -> Option<Cluster<D::Node<'a>>> {
    let mut groups: IndexMap<Vec<String>, Vec<D::Node<'a>>> = IndexMap::new();

    for node in doc.find_all(doc.root(), CANDIDATE_TAGS) {
        if looks_like_item(doc, node, heuristics) {
            groups.entry(class_signature(doc, node)).or_default().push(node);
        }
    }

    let mut winner: Option<(&Vec<String>, &Vec<D::Node<'a>>)> = None;
    for (signature, members) in &groups {
        if members.len() < MIN_MEMBERS {
            continue;
        }
        if winner.map_or(true, |(_, best)| members.len() > best.len()) {
            winner = Some((signature, members));
        }
    }

    let (signature, members) = winner?;
    debug!(signature = ?signature, count = members.len(), groups = groups.len(), "item cluster");
    Some(Cluster {
        signature: signature.clone(),
        sample: *members.first()?,
        count: members.len(),
    })
}

fn looks_like_item<'a, D: Document>(doc: &'a D, node: D::Node<'a>, heuristics: &Heuristics) -> bool {
    let text_len = doc.text(node).chars().count();
    if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&text_len) {
        return false;
    }
    if doc.find_all(node, &["a"]).is_empty() {
        return false;
    }

    let class = doc.classes(node).join(" ").to_lowercase();
    let id = doc.attr(node, "id").unwrap_or_default().to_lowercase();
    heuristics.has_news_keyword(&class, &id) || text_len > MIN_TEXT_WITHOUT_KEYWORD
}

/// Sorted, deduplicated class tokens of `node`, or of its nearest classed
/// ancestor within three levels, or empty.
pub fn class_signature<'a, D: Document>(doc: &'a D, node: D::Node<'a>) -> Vec<String> {
    let mut current = node;
    for level in 0..=ANCESTOR_LEVELS {
        if level > 0 {
            match doc.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        let mut tokens: Vec<String> = doc.classes(current).iter().map(|c| c.to_string()).collect();
        if !tokens.is_empty() {
            tokens.sort();
            tokens.dedup();
            return tokens;
        }
    }
    Vec::new()
}
