//! Compilation-unit records consumed by the indexer.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Language tag recorded on every unit this crate produces.
pub const GO_LANGUAGE: &str = "go";

/// Structured name for an indexed artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VName {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub corpus: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
}

impl VName {
    /// A file name in `corpus` at `path`.
    pub fn file(corpus: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            corpus: corpus.into(),
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Path and digest of one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    pub digest: Digest,
    pub size: u64,
}

/// A file the compiler reads, with its contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredInput {
    pub v_name: VName,
    pub info: FileInfo,
    #[serde(with = "hex")]
    pub content: Vec<u8>,
}

/// Environment entry captured on the unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Env {
    pub name: String,
    pub value: String,
}

/// Build metadata attached to a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildDetails {
    pub build_target: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
}

/// Normalized record of one source-to-object compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilationUnit {
    pub v_name: VName,
    #[serde(default)]
    pub argument: Vec<String>,
    #[serde(default)]
    pub source_file: Vec<String>,
    #[serde(default)]
    pub working_directory: String,
    #[serde(default)]
    pub environment: Vec<Env>,
    #[serde(default)]
    pub required_input: Vec<RequiredInput>,
    #[serde(default)]
    pub output_key: String,
    #[serde(default)]
    pub details: Vec<BuildDetails>,
}

impl CompilationUnit {
    /// Look up a captured environment value by name (first match).
    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Declared paths of every required input, in order.
    pub fn input_paths(&self) -> Vec<&str> {
        self.required_input
            .iter()
            .map(|ri| ri.info.path.as_str())
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> RequiredInput {
        let content = b"package foo\n".to_vec();
        RequiredInput {
            v_name: VName::file("kythe", "foo/foo.go"),
            info: FileInfo {
                path: "foo/foo.go".to_string(),
                digest: Digest::compute(&content),
                size: content.len() as u64,
            },
            content,
        }
    }

    #[test]
    fn test_content_is_hex_in_json() {
        let json = serde_json::to_value(sample_input()).unwrap();
        assert_eq!(json["content"], hex::encode(b"package foo\n"));
        assert_eq!(json["v_name"]["corpus"], "kythe");
        assert!(json["v_name"].get("signature").is_none());
    }

    #[test]
    fn test_unit_json_reads_back() {
        let unit = CompilationUnit {
            v_name: VName {
                signature: "//foo:lib".to_string(),
                corpus: "kythe".to_string(),
                language: GO_LANGUAGE.to_string(),
                ..Default::default()
            },
            required_input: vec![sample_input()],
            output_key: "foo.a".to_string(),
            ..Default::default()
        };
        let text = unit.to_json_pretty().unwrap();
        let back: CompilationUnit = serde_json::from_str(&text).unwrap();
        assert_eq!(back, unit);
        assert_eq!(back.input_paths(), vec!["foo/foo.go"]);
    }

    #[test]
    fn test_env_lookup_returns_first() {
        let unit = CompilationUnit {
            environment: vec![
                Env { name: "GOOS".into(), value: "linux".into() },
                Env { name: "GOOS".into(), value: "darwin".into() },
            ],
            ..Default::default()
        };
        assert_eq!(unit.env("GOOS"), Some("linux"));
        assert_eq!(unit.env("GOARCH"), None);
    }
}
