pub mod error;
pub mod fetcher;
pub mod induce;
pub mod output;
pub mod settings;

pub use induce::heuristics::Heuristics;
pub use induce::schema::SiteSchema;
pub use induce::{analyze_html, analyze_page};
