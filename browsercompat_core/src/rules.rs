//! Feature detection rules
//!
//! A rule maps a dataset feature identifier to the regular expressions that
//! reveal its use in source text. Detection is existence-only.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

/// String with all rules from `rules` folder (prepared in build.rs) in YAML format.
const ALL_RULES: &str = include_str!(concat!(env!("OUT_DIR"), "/all-rules.yaml"));

/// Describe single detection rule
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Rule {
    /// Dataset feature identifier this rule detects
    pub id: String,
    /// Patterns to test the source against, any match detects the feature
    #[serde(with = "serde_regex")]
    pub tests: Vec<Regex>,
    /// Human-readable description of what the rule looks for
    #[serde(default)]
    pub description: String,
    /// The group this rule belongs to (e.g., "js-api", "dom", "canvas")
    #[serde(default)]
    pub from: String,
}

/// Detection patterns keyed by feature identifier.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    patterns: BTreeMap<String, Vec<Regex>>,
}

impl Rules {
    /// Build the mapping from rule definitions. Rules sharing an id add
    /// their patterns to the same feature.
    #[must_use]
    pub fn new(rules: &[Rule]) -> Self {
        let mut patterns: BTreeMap<String, Vec<Regex>> = BTreeMap::new();
        for rule in rules {
            patterns
                .entry(rule.id.clone())
                .or_default()
                .extend(rule.tests.iter().cloned());
        }
        Self { patterns }
    }

    /// Patterns registered for a feature, empty when the feature is unknown.
    #[must_use]
    pub fn patterns(&self, id: &str) -> &[Regex] {
        self.patterns.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Return all built-in detection rules
///
/// # Errors
/// Returns an error when there's a problem parsing the embedded YAML rules
pub fn get_all_rules() -> Result<Vec<Rule>> {
    Ok(serde_yaml::from_str(ALL_RULES)?)
}

/// Parse rule definitions from a YAML document.
///
/// # Errors
/// when the YAML is invalid or one of the patterns is not a valid regex
pub fn parse_rules(content: &str) -> Result<Vec<Rule>> {
    Ok(serde_yaml::from_str(content)?)
}

/// Return the identifiers of every feature with at least one matching pattern.
#[must_use]
pub fn detect_features<'a>(source: &str, rules: &'a Rules) -> BTreeSet<&'a str> {
    rules
        .patterns
        .iter()
        .filter(|(_, tests)| tests.iter().any(|test| test.is_match(source)))
        .map(|(id, _)| id.as_str())
        .collect()
}
