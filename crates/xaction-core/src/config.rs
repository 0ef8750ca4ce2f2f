//! Extraction settings.

use std::fmt;
use std::sync::Arc;

use crate::fetch::{FileOpener, FsOpener};
use crate::unit::VName;
use crate::vname::Rules;

/// Prefix stripped from the first source path before looking up the unit's
/// corpus, for trees vendored under the Kubernetes import path.
pub const SOURCE_PATH_PREFIX: &str = "k8s.io/kubernetes/";

/// Settings that control extraction.
///
/// Cheap to clone and never modified by an extraction, so one config can be
/// shared by any number of concurrent calls.
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Default corpus label.
    pub corpus: String,
    /// Mnemonic to match; empty matches every action.
    pub mnemonic: String,
    /// Rules for rewriting file names.
    pub rules: Arc<Rules>,
    /// Source of file contents.
    pub opener: Arc<dyn FileOpener>,
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("corpus", &self.corpus)
            .field("mnemonic", &self.mnemonic)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl ExtractorConfig {
    /// Config for `corpus` that matches every mnemonic, has no rules and
    /// reads from the local filesystem.
    pub fn new(corpus: impl Into<String>) -> Self {
        Self {
            corpus: corpus.into(),
            mnemonic: String::new(),
            rules: Arc::new(Rules::default()),
            opener: Arc::new(FsOpener),
        }
    }

    pub fn with_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.mnemonic = mnemonic.into();
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn FileOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Whether actions with `mnemonic` should be extracted.
    pub fn matches_mnemonic(&self, mnemonic: &str) -> bool {
        self.mnemonic.is_empty() || self.mnemonic == mnemonic
    }

    /// Corpus for a unit compiling `sources`: the rule match for the first
    /// source, or the default corpus.
    pub fn unit_corpus(&self, sources: &[String]) -> String {
        sources
            .first()
            .map(|first| first.strip_prefix(SOURCE_PATH_PREFIX).unwrap_or(first.as_str()))
            .and_then(|path| self.rules.apply(path))
            .map(|v| v.corpus)
            .unwrap_or_else(|| self.corpus.clone())
    }

    /// Name for the file at `path`.
    pub fn file_vname(&self, path: &str) -> VName {
        self.rules
            .apply(path)
            .unwrap_or_else(|| VName::file(self.corpus.clone(), path))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new("")
    }
}
