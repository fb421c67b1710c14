use tracing::debug;

use super::document::Document;
use super::heuristics::Heuristics;
use super::schema::MainContainer;
use super::selector::css_selector;

const CANDIDATE_TAGS: &[&str] = &["div", "section", "main", "article"];
const CHILD_TAGS: &[&str] = &["div", "article", "li"];
const KEYWORD_POINTS: i32 = 10;
const MIN_CHILDREN: usize = 5;
const MAX_CHILDREN: usize = 100;
const MIN_TEXT_LEN: usize = 500;
const MAX_TEXT_POINTS: i32 = 20;
const ACCEPT_ABOVE: i32 = 15;

struct Candidate<N> {
    node: N,
    score: i32,
}

/// Score every wrapper-like node and return the best one, or `body` when
/// nothing scores above the acceptance threshold.
pub fn find_main_container<D: Document>(doc: &D, heuristics: &Heuristics) -> MainContainer {
    let mut best: Option<Candidate<D::Node<'_>>> = None;

    for node in doc.find_all(doc.root(), CANDIDATE_TAGS) {
        let score = score_candidate(doc, node, heuristics);
        if score <= ACCEPT_ABOVE {
            continue;
        }
        // strict: earlier candidates keep ties
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Candidate { node, score });
        }
    }

    match best {
        Some(Candidate { node, score }) => {
            let container = MainContainer {
                selector: css_selector(doc, node, heuristics),
                class: doc.classes(node).join(" "),
                id: doc.attr(node, "id").unwrap_or_default().to_string(),
            };
            debug!(selector = %container.selector, score, "main container");
            container
        }
        None => {
            debug!("no container scored above {}, using body", ACCEPT_ABOVE);
            MainContainer::body()
        }
    }
}

pub(crate) fn score_candidate<'a, D: Document>(doc: &'a D, node: D::Node<'a>, heuristics: &Heuristics) -> i32 {
    let class = doc.classes(node).join(" ").to_lowercase();
    let id = doc.attr(node, "id").unwrap_or_default().to_lowercase();

    let mut score = KEYWORD_POINTS * heuristics.scoring_hits(&class, &id) as i32;

    let children = doc.find_all(node, CHILD_TAGS).len();
    if (MIN_CHILDREN..=MAX_CHILDREN).contains(&children) {
        score += children as i32;
    }

    let text_len = doc.text(node).chars().count();
    if text_len > MIN_TEXT_LEN {
        score += ((text_len / 100) as i32).min(MAX_TEXT_POINTS);
    }

    score
}
