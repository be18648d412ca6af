//! Static keyword tables for query expansion and match explanations.
//!
//! Built once at startup (defaults, or a JSON override) and shared read-only.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A keyword and the phrase appended to queries that contain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub keyword: String,
    pub phrase: String,
}

/// A named domain category and the query words that signal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainKeywords {
    pub domain: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentKeywords {
    pub hiring: Vec<String>,
    pub cofounder: Vec<String>,
    pub funding: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTables {
    /// Checked in order; every hit appends its phrase.
    pub expansions: Vec<Expansion>,
    pub domains: Vec<DomainKeywords>,
    pub intents: IntentKeywords,
}

impl KeywordTables {
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let tables: KeywordTables = serde_json::from_str(raw)
            .map_err(|e| DomainError::Config(format!("Invalid keyword tables: {e}")))?;
        Ok(tables.normalized())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("cannot read keyword tables {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Keywords are matched against lowercased text, so store them lowercased.
    fn normalized(mut self) -> Self {
        let lower = |v: &mut Vec<String>| v.iter_mut().for_each(|k| *k = k.to_lowercase());
        for e in &mut self.expansions {
            e.keyword = e.keyword.to_lowercase();
        }
        for d in &mut self.domains {
            d.domain = d.domain.to_lowercase();
            lower(&mut d.keywords);
        }
        lower(&mut self.intents.hiring);
        lower(&mut self.intents.cofounder);
        lower(&mut self.intents.funding);
        self
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordTables {
    fn default() -> Self {
        let expansions = [
            // domains
            ("fintech", "financial technology payments banking finance"),
            ("blockchain", "cryptocurrency crypto smart contracts DeFi"),
            ("ai", "artificial intelligence machine learning ML"),
            ("climate", "renewable energy sustainability green tech"),
            ("healthcare", "medical health biotech clinical"),
            ("marketing", "growth B2B advertising campaigns"),
            ("robotics", "automation engineering hardware"),
            ("venture", "capital VC investing funding investment"),
            // roles
            ("founder", "entrepreneur startup cofounder"),
            ("developer", "engineer programmer coding"),
            ("researcher", "scientist PhD academic"),
            ("manager", "executive director leadership"),
            ("designer", "UI UX product design"),
            ("analyst", "data business financial"),
            // seniority
            ("senior", "expert experienced professional"),
            ("junior", "entry level beginner graduate"),
            ("expert", "senior experienced specialist"),
            // technology
            ("react", "javascript frontend web development"),
            ("python", "programming data science ML"),
            ("solidity", "smart contracts blockchain ethereum"),
            // intent
            ("hiring", "recruit team building positions"),
            ("freelance", "contract consultant available"),
            ("cofounder", "partner founding startup"),
            ("funding", "investment capital seed series"),
            ("mentor", "guidance advice coaching"),
            ("collaborate", "partnership work together"),
        ]
        .into_iter()
        .map(|(keyword, phrase)| Expansion {
            keyword: keyword.to_string(),
            phrase: phrase.to_string(),
        })
        .collect();

        let domains = [
            ("ai", &["ai", "artificial intelligence", "machine learning", "ml", "neural", "deep learning"][..]),
            ("fintech", &["fintech", "financial", "payments", "banking", "finance", "payment", "money"][..]),
            ("blockchain", &["blockchain", "crypto", "cryptocurrency", "smart contracts", "defi", "web3"][..]),
            ("healthcare", &["healthcare", "medical", "health", "biotech", "clinical", "pharma"][..]),
            ("climate", &["climate", "renewable", "sustainability", "green", "environment", "carbon"][..]),
            ("startup", &["startup", "entrepreneur", "founding", "founder", "venture"][..]),
        ]
        .into_iter()
        .map(|(domain, keywords)| DomainKeywords {
            domain: domain.to_string(),
            keywords: words(keywords),
        })
        .collect();

        Self {
            expansions,
            domains,
            intents: IntentKeywords {
                hiring: words(&["hire", "hiring", "recruit", "position", "job", "team"]),
                cofounder: words(&["co-founder", "cofounder", "founding partner", "startup partner"]),
                funding: words(&["funding", "investment", "investor", "capital", "seed"]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_shape() {
        let t = KeywordTables::default();
        assert_eq!(t.expansions.len(), 26);
        assert_eq!(
            t.domains.iter().map(|d| d.domain.as_str()).collect::<Vec<_>>(),
            vec!["ai", "fintech", "blockchain", "healthcare", "climate", "startup"]
        );
    }

    #[test]
    fn test_json_override_is_lowercased() {
        let raw = r#"{
            "expansions": [{"keyword": "Rust", "phrase": "systems programming"}],
            "domains": [{"domain": "Infra", "keywords": ["Kubernetes"]}],
            "intents": {"hiring": ["HIRE"], "cofounder": [], "funding": []}
        }"#;
        let t = KeywordTables::from_json(raw).unwrap();
        assert_eq!(t.expansions[0].keyword, "rust");
        assert_eq!(t.domains[0].domain, "infra");
        assert_eq!(t.domains[0].keywords, vec!["kubernetes"]);
        assert_eq!(t.intents.hiring, vec!["hire"]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(KeywordTables::from_json("[]"), Err(DomainError::Config(_))));
    }
}
