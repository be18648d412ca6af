use crate::application::keywords::KeywordTables;
use crate::domain::values::match_strictness::MatchStrictness;
use std::sync::Arc;

/// Appends synonym phrases to a query before it is embedded.
///
/// Keywords are tested in table order against the text expanded so far, so a
/// phrase appended by one keyword can trigger a later one.
#[derive(Debug, Clone)]
pub struct QueryExpander {
    tables: Arc<KeywordTables>,
    strictness: MatchStrictness,
}

impl QueryExpander {
    pub fn new(tables: Arc<KeywordTables>, strictness: MatchStrictness) -> Self {
        Self { tables, strictness }
    }

    pub fn expand(&self, query: &str) -> String {
        let mut expanded = query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        for expansion in &self.tables.expansions {
            if self.strictness.contains(&expanded, &expansion.keyword) {
                expanded.push(' ');
                expanded.push_str(&expansion.phrase);
            }
        }
        expanded
    }
}
