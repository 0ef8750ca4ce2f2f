//! Path-to-[`VName`] rewrite rules.
//!
//! Rules are kept in the JSON form used across indexer tooling:
//!
//! ```json
//! [
//!   {"pattern": "bazel-out/[^/]+/(.*)", "vname": {"corpus": "gen", "path": "@1@"}},
//!   {"pattern": "(.*)", "vname": {"corpus": "main", "path": "@1@"}}
//! ]
//! ```
//!
//! Patterns match the whole path. The first matching rule wins, and each
//! `@N@` in a template field is replaced by capture group `N`.

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::unit::VName;

/// Template side of a rule. Any field may reference capture groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VNameTemplate {
    #[serde(default)]
    pub corpus: String,
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRule {
    pattern: String,
    vname: VNameTemplate,
}

/// One compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    template: VNameTemplate,
}

impl Rule {
    pub fn new(pattern: &str, template: VNameTemplate) -> Result<Self, RulesError> {
        let anchored = format!("^(?:{pattern})$");
        let compiled = Regex::new(&anchored).map_err(|source| RulesError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            template,
        })
    }

    fn apply(&self, path: &str) -> Option<VName> {
        let caps = self.pattern.captures(path)?;
        Some(VName {
            corpus: expand(&self.template.corpus, &caps),
            root: expand(&self.template.root, &caps),
            path: expand(&self.template.path, &caps),
            ..Default::default()
        })
    }
}

fn group_ref() -> &'static Regex {
    static GROUP_REF: OnceLock<Regex> = OnceLock::new();
    GROUP_REF.get_or_init(|| Regex::new(r"@(\d+)@").expect("static group pattern"))
}

fn expand(template: &str, caps: &Captures<'_>) -> String {
    group_ref()
        .replace_all(template, |m: &Captures<'_>| {
            m[1].parse::<usize>()
                .ok()
                .and_then(|i| caps.get(i))
                .map(|g| g.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Ordered rule set.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse rules from their JSON form.
    pub fn from_json(data: &[u8]) -> Result<Self, RulesError> {
        let raw: Vec<RawRule> = serde_json::from_slice(data)?;
        let rules = raw
            .into_iter()
            .map(|r| Rule::new(&r.pattern, r.vname))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Read and parse a rules file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Rewrite `path` with the first matching rule.
    pub fn apply(&self, path: &str) -> Option<VName> {
        self.rules.iter().find_map(|r| r.apply(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
