use serde::{Deserialize, Serialize};

/// Literal substituted for the page number in pagination templates.
pub const PAGE_PLACEHOLDER: &str = "| PAGENO |";

/// Everything inferred about one listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSchema {
    pub url: String,
    #[serde(rename = "title")]
    pub page_title: String,
    #[serde(rename = "main_container")]
    pub container: MainContainer,
    #[serde(rename = "news_items")]
    pub items: Option<ItemPattern>,
    pub pagination: Option<PaginationPattern>,
    pub filters: FilterSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainContainer {
    pub selector: String,
    pub class: String,
    pub id: String,
}

impl MainContainer {
    pub fn body() -> Self {
        MainContainer {
            selector: "body".to_string(),
            class: String::new(),
            id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPattern {
    pub tag: String,
    #[serde(rename = "class")]
    pub class_signature: Vec<String>,
    pub selector: String,
    #[serde(rename = "count")]
    pub sample_count: usize,
    #[serde(rename = "title_element")]
    pub title_field: Option<FieldRef>,
    #[serde(rename = "date_element")]
    pub date_field: Option<FieldRef>,
    #[serde(rename = "link_element")]
    pub link_field: Option<FieldRef>,
}

/// Where a field's value lives once the element is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeSource {
    Title,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub tag: String,
    pub selector: String,
    #[serde(rename = "attribute")]
    pub attribute_source: AttributeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href_attr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationPattern {
    #[serde(rename = "pattern")]
    pub template: String,
    #[serde(rename = "max_detected")]
    pub max_page_observed: u32,
}

impl PaginationPattern {
    /// URL of page `page`.
    pub fn page_url(&self, page: u32) -> String {
        self.template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_keys() {
        let schema = SiteSchema {
            url: "https://s.com/".into(),
            page_title: "S".into(),
            container: MainContainer::body(),
            items: None,
            pagination: Some(PaginationPattern {
                template: format!("https://s.com/p/{}", PAGE_PLACEHOLDER),
                max_page_observed: 9,
            }),
            filters: FilterSet::default(),
        };
        let value = serde_json::to_value(&schema).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        for key in ["url", "title", "main_container", "news_items", "pagination", "filters"] {
            assert!(keys.contains(&key.to_string()), "missing {}", key);
        }
        assert_eq!(keys.len(), 6);
        assert!(value["news_items"].is_null());
        assert_eq!(value["main_container"]["selector"], "body");
        assert_eq!(value["pagination"]["pattern"], "https://s.com/p/| PAGENO |");
        assert_eq!(value["pagination"]["max_detected"], 9);
        assert_eq!(value["filters"]["include_patterns"], serde_json::json!([]));
    }

    #[test]
    fn field_ref_shape() {
        let field = FieldRef {
            tag: "a".into(),
            selector: ".headline".into(),
            attribute_source: AttributeSource::Title,
            href_attr: Some("href".into()),
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["attribute"], "title");
        assert_eq!(value["href_attr"], "href");

        let plain = FieldRef { href_attr: None, attribute_source: AttributeSource::Text, ..field };
        let value = serde_json::to_value(&plain).unwrap();
        assert_eq!(value["attribute"], "text");
        assert!(value.get("href_attr").is_none());
    }

    #[test]
    fn page_url_substitutes_placeholder() {
        let p = PaginationPattern {
            template: format!("https://s.com/news?page={}&sort=new", PAGE_PLACEHOLDER),
            max_page_observed: 4,
        };
        assert_eq!(p.page_url(3), "https://s.com/news?page=3&sort=new");
    }
}
