use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub const NEWS_KEYWORDS: &[&str] = &[
    "news", "article", "post", "story", "item", "entry", "content", "feed", "list", "grid", "card",
    "tile", "block",
];

pub const CONTAINER_KEYWORDS: &[&str] = &[
    "container", "wrapper", "main", "content", "section", "area", "zone", "region", "panel", "box",
    "frame",
];

pub const DATE_KEYWORDS: &[&str] = &[
    "date", "time", "published", "created", "updated", "ago", "timestamp", "when", "day", "month",
    "year",
];

/// Bootstrap-style grid helpers; never stable enough to select on.
pub const UTILITY_CLASS_PREFIXES: &[&str] = &["col-", "row-", "pull-", "push-"];

pub const BANNED_WORDS: &[&str] = &["ad", "ads", "sponsored", "promo", "advertisement"];

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const WEEKDAY: &str = r"(?:mon|tue|wed|thu|fri|sat|sun)";
const WEEKDAY_NAME: &str = r"(?:(?:mon|tues|wednes|thurs|fri|satur|sun)day|mon|tue|wed|thu|fri|sat|sun)";
const UNIT: &str = r"(?:second|sec|minute|min|hour|hr|day|week|month|year)";

/// A single entry of the date library. `validate` is consulted after a regex
/// hit for patterns whose shape alone is not enough.
pub struct DatePattern {
    pub name: &'static str,
    re: Regex,
    validate: Option<fn(&Captures) -> bool>,
}

impl DatePattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        DatePattern {
            name,
            re: Regex::new(&format!("(?i){pattern}")).unwrap(),
            validate: None,
        }
    }

    fn validated(name: &'static str, pattern: &str, validate: fn(&Captures) -> bool) -> Self {
        DatePattern {
            validate: Some(validate),
            ..DatePattern::new(name, pattern)
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self.validate {
            None => self.re.is_match(text),
            Some(check) => self.re.captures_iter(text).any(|caps| check(&caps)),
        }
    }
}

fn is_calendar_date(caps: &Captures) -> bool {
    let num = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
    match (num("d"), num("m"), num("y")) {
        (Some(d), Some(m), Some(y)) => NaiveDate::from_ymd_opt(y as i32, m, d).is_some(),
        _ => false,
    }
}

static DATE_LIBRARY: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        DatePattern::new("numeric_day_first", r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b"),
        DatePattern::new("numeric_year_first", r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b"),
        DatePattern::validated(
            "calendar_dmy",
            r"\b(?P<d>\d{1,2})[./-](?P<m>\d{1,2})[./-](?P<y>\d{4})\b",
            is_calendar_date,
        ),
        DatePattern::new(
            "month_name_first",
            &format!(r"\b{MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b"),
        ),
        DatePattern::new(
            "day_first_month_name",
            &format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\.?(?:,?\s+\d{{4}})?\b"),
        ),
        DatePattern::new(
            "iso_8601",
            r"\b\d{4}-\d{2}-\d{2}(?:[t ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:z|[+-]\d{2}:?\d{2})?)?\b",
        ),
        DatePattern::new(
            "rfc_2822",
            &format!(
                r"\b{WEEKDAY},?\s+\d{{1,2}}\s+{MONTH}\s+\d{{4}}(?:\s+\d{{2}}:\d{{2}}(?::\d{{2}})?(?:\s+(?:[+-]\d{{4}}|gmt|utc|[a-z]{{3}}))?)?\b"
            ),
        ),
        DatePattern::new("relative_ago", &format!(r"\b\d+\s+{UNIT}s?\s+ago\b")),
        DatePattern::new("relative_day", r"\b(?:today|yesterday|tomorrow)\b"),
        DatePattern::new(
            "relative_last_next",
            &format!(r"\b(?:last|next)\s+(?:{UNIT}|{WEEKDAY_NAME})\b"),
        ),
    ]
});

/// Optional replacements for the keyword tables, typically read from settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicOverrides {
    pub news_keywords: Option<Vec<String>>,
    pub container_keywords: Option<Vec<String>>,
    pub date_keywords: Option<Vec<String>>,
    pub banned_words: Option<Vec<String>>,
    pub utility_class_prefixes: Option<Vec<String>>,
}

pub struct BannedWord {
    pub word: String,
    re: Regex,
}

impl BannedWord {
    fn new(word: &str) -> Self {
        let word = word.trim().to_lowercase();
        let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&word))).unwrap();
        BannedWord { word, re }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// Every table the induction passes consult, built once per run and shared
/// by reference across passes and worker threads.
pub struct Heuristics {
    pub news_keywords: Vec<String>,
    /// NEWS and CONTAINER keywords, deduplicated, NEWS order first.
    pub scoring_keywords: Vec<String>,
    pub date_keywords: Vec<String>,
    pub utility_class_prefixes: Vec<String>,
    pub banned_words: Vec<BannedWord>,
}

impl Default for Heuristics {
    fn default() -> Self {
        Heuristics::from_overrides(&HeuristicOverrides::default())
    }
}

impl Heuristics {
    pub fn from_overrides(overrides: &HeuristicOverrides) -> Self {
        let table = |given: &Option<Vec<String>>, fallback: &[&str]| -> Vec<String> {
            match given {
                Some(words) => words.iter().map(|w| w.trim().to_lowercase()).filter(|w| !w.is_empty()).collect(),
                None => fallback.iter().map(|w| w.to_string()).collect(),
            }
        };

        let news_keywords = table(&overrides.news_keywords, NEWS_KEYWORDS);
        let container_keywords = table(&overrides.container_keywords, CONTAINER_KEYWORDS);

        let mut scoring_keywords: Vec<String> = Vec::new();
        for kw in news_keywords.iter().chain(&container_keywords) {
            if !scoring_keywords.contains(kw) {
                scoring_keywords.push(kw.clone());
            }
        }

        Heuristics {
            news_keywords,
            scoring_keywords,
            date_keywords: table(&overrides.date_keywords, DATE_KEYWORDS),
            utility_class_prefixes: table(&overrides.utility_class_prefixes, UTILITY_CLASS_PREFIXES),
            banned_words: table(&overrides.banned_words, BANNED_WORDS)
                .iter()
                .map(|w| BannedWord::new(w))
                .collect(),
        }
    }

    pub fn date_patterns(&self) -> &'static [DatePattern] {
        &DATE_LIBRARY
    }

    /// Name of the first date pattern that matches anywhere in `text`.
    pub fn match_date(&self, text: &str) -> Option<&'static str> {
        self.date_patterns()
            .iter()
            .find(|p| p.matches(text))
            .map(|p| p.name)
    }

    pub fn is_utility_class(&self, token: &str) -> bool {
        self.utility_class_prefixes
            .iter()
            .any(|prefix| token.starts_with(prefix.as_str()))
    }

    /// Number of distinct scoring keywords contained in `class` or `id` (both lower-cased by the caller).
    pub fn scoring_hits(&self, class: &str, id: &str) -> usize {
        self.scoring_keywords
            .iter()
            .filter(|kw| class.contains(kw.as_str()) || id.contains(kw.as_str()))
            .count()
    }

    pub fn has_news_keyword(&self, class: &str, id: &str) -> bool {
        self.news_keywords
            .iter()
            .any(|kw| class.contains(kw.as_str()) || id.contains(kw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(text: &str) -> bool {
        Heuristics::default().match_date(text).is_some()
    }

    #[test]
    fn relative_dates() {
        assert!(dated("3 days ago"));
        assert!(dated("Posted 1 hour ago"));
        assert!(dated("Yesterday"));
        assert!(dated("last week"));
        assert!(dated("next Friday"));
    }

    #[test]
    fn iso_dates() {
        assert!(dated("2025-06-01"));
        assert!(dated("2025-06-01T10:15:30.123Z"));
        assert!(dated("2025-06-01 10:15+02:00"));
    }

    #[test]
    fn numeric_dates() {
        assert!(dated("12/31/2024"));
        assert!(dated("31-12-24"));
        assert!(dated("2024/1/5"));
    }

    #[test]
    fn month_names() {
        assert!(dated("Jun 5, 2025"));
        assert!(dated("5th of September 2024"));
        assert!(dated("December 1st"));
        assert!(dated("Tue, 10 Jun 2025 08:00:00 +0000"));
    }

    #[test]
    fn calendar_validation_honours_leap_years() {
        let calendar = library("calendar_dmy");
        assert!(calendar.matches("29.02.2024"));
        assert!(!calendar.matches("29.02.2023"));
        assert!(!calendar.matches("31.04.2024"));
        assert!(calendar.matches("01.03.2023"));
    }

    #[test]
    fn non_dates() {
        assert!(!dated("volume 12"));
        assert!(!dated("Read more"));
        assert!(!dated("Chapter 2024"));
        assert!(!dated("The last monster of the deep"));
        assert!(!dated("Next wedding season"));
        assert!(!dated("Our last friend"));
        assert!(!dated("Next sunset cruise"));
        assert!(!dated("next sector report"));
    }

    fn library(name: &str) -> &'static DatePattern {
        DATE_LIBRARY.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn each_pattern_on_its_own() {
        let cases: &[(&str, &str, &str)] = &[
            ("numeric_day_first", "31/12/2024", "2024/12/31"),
            ("numeric_year_first", "2024/1/5", "5/1/2024"),
            ("month_name_first", "Jun 5, 2025", "5 June 2025"),
            ("day_first_month_name", "5 June 2025", "June 5"),
            ("iso_8601", "2025-06-01T10:15:30Z", "20250601"),
            ("rfc_2822", "Tue, 10 Jun 2025 08:00:00 +0000", "10 Jun 2025"),
            ("relative_ago", "5 minutes ago", "long ago"),
            ("relative_day", "Yesterday", "todays"),
            ("relative_last_next", "last Tuesday", "last monster"),
        ];
        for (name, hit, miss) in cases {
            let pattern = library(name);
            assert!(pattern.matches(hit), "{} should match {:?}", name, hit);
            assert!(!pattern.matches(miss), "{} should not match {:?}", name, miss);
        }
        assert!(library("relative_last_next").matches("next mon"));
        assert!(library("relative_last_next").matches("Next Saturday"));
    }

    #[test]
    fn scoring_keywords_are_deduplicated() {
        let h = Heuristics::default();
        let content = h.scoring_keywords.iter().filter(|k| *k == "content").count();
        assert_eq!(content, 1);
        assert_eq!(h.scoring_keywords.len(), NEWS_KEYWORDS.len() + CONTAINER_KEYWORDS.len() - 1);
    }

    #[test]
    fn banned_words_match_whole_words() {
        let h = Heuristics::default();
        let ad = &h.banned_words[0];
        assert!(ad.is_match("Big AD inside"));
        assert!(!ad.is_match("Download the headline"));
    }

    #[test]
    fn overrides_replace_tables() {
        let h = Heuristics::from_overrides(&HeuristicOverrides {
            banned_words: Some(vec![" Promo ".into()]),
            news_keywords: Some(vec!["Teaser".into()]),
            ..Default::default()
        });
        assert_eq!(h.banned_words.len(), 1);
        assert_eq!(h.banned_words[0].word, "promo");
        assert_eq!(h.news_keywords, vec!["teaser"]);
        assert!(h.scoring_keywords.contains(&"wrapper".to_string()));
    }
}
