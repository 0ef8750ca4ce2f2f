//! Expansion of the compile action's params file.
//!
//! The Go rules hand the compiler a single `.params` argument naming a small
//! shell script of the form
//!
//! ```text
//! export GOROOT=$(pwd)/external/go_sdk
//! cd bazel-out/k8-fastbuild && external/go_sdk/bin/go tool compile ...
//! ```
//!
//! Only two statement shapes are understood: the root export and `cd`. The
//! last statement in the script is taken to be the compiler invocation.
//! The script must be valid UTF-8; anything else is reported as an
//! unreadable params file.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::fetch::{read_all, FileOpener};
use crate::shell::split_words;

/// Extension that marks a single raw argument as a params file.
pub const PARAMS_EXTENSION: &str = "params";

/// Compiler settings recovered from the raw action arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    /// The params file, if the arguments came from one.
    pub params_file: Option<String>,
    /// Toolchain root as exported by the script.
    pub root_dir: String,
    /// Directory the script changes into before compiling.
    pub work_dir: String,
    /// The compiler argument list.
    pub compile: Vec<String>,
}

impl ParsedResponse {
    /// Arguments that were already flat.
    pub fn flat(args: &[String]) -> Self {
        Self {
            compile: args.to_vec(),
            ..Default::default()
        }
    }
}

fn root_export() -> &'static Regex {
    static ROOT_EXPORT: OnceLock<Regex> = OnceLock::new();
    ROOT_EXPORT.get_or_init(|| {
        Regex::new(r"^export +(?:GO)?ROOT=(?:\$\(pwd\)/)?(.+)$").expect("static export pattern")
    })
}

fn change_dir() -> &'static Regex {
    static CHANGE_DIR: OnceLock<Regex> = OnceLock::new();
    CHANGE_DIR.get_or_init(|| Regex::new(r"^cd +(.+)$").expect("static cd pattern"))
}

/// Whether `args` is a lone params-file reference.
pub fn is_params_file(args: &[String]) -> bool {
    match args {
        [only] => Path::new(only)
            .extension()
            .map(|ext| ext == PARAMS_EXTENSION)
            .unwrap_or(false),
        _ => false,
    }
}

/// Interpret the text of a params script.
pub fn parse_script(content: &str) -> ParsedResponse {
    let mut result = ParsedResponse::default();
    let mut last = Vec::new();
    for line in content.split('\n') {
        for statement in line.split("&&") {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                continue;
            }
            last = split_words(trimmed);
            if let Some(m) = root_export().captures(trimmed) {
                result.root_dir = m[1].to_string();
            } else if let Some(m) = change_dir().captures(trimmed) {
                result.work_dir = m[1].to_string();
            }
        }
    }
    result.compile = last;
    result
}

/// Expand the raw action arguments.
///
/// Anything other than a lone `.params` argument is returned unchanged.
pub async fn parse_response(opener: &dyn FileOpener, args: &[String]) -> Result<ParsedResponse> {
    if !is_params_file(args) {
        return Ok(ParsedResponse::flat(args));
    }

    let path = &args[0];
    let data = read_all(opener, path)
        .await
        .map_err(|source| ExtractError::ResponseFileRead {
            path: path.clone(),
            source,
        })?;
    let text = String::from_utf8(data).map_err(|e| ExtractError::ResponseFileRead {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    let mut parsed = parse_script(&text);
    debug!(
        params_file = %path,
        root_dir = %parsed.root_dir,
        work_dir = %parsed.work_dir,
        args = parsed.compile.len(),
        "expanded params file"
    );
    parsed.params_file = Some(path.clone());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ByteStream;
    use async_trait::async_trait;
    use std::io;

    struct OneFile(&'static str);

    #[async_trait]
    impl FileOpener for OneFile {
        async fn open(&self, path: &str) -> io::Result<ByteStream> {
            if path.ends_with(".params") {
                Ok(Box::new(io::Cursor::new(self.0.as_bytes().to_vec())))
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()))
            }
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_params_detection() {
        assert!(is_params_file(&strings(&["bazel-out/lib.a-0.params"])));
        assert!(!is_params_file(&strings(&["bazel-out/lib.a-0.txt"])));
        assert!(!is_params_file(&strings(&["a.params", "b.params"])));
        assert!(!is_params_file(&[]));
    }

    #[test]
    fn test_script_root_and_work_dir() {
        let parsed = parse_script(
            "export ROOT=/x/goroot\ncd /work && /work/bin/go tool compile -p main -o /tmp/out.a -I /inc foo.go bar.go",
        );
        assert_eq!(parsed.root_dir, "/x/goroot");
        assert_eq!(parsed.work_dir, "/work");
        assert_eq!(
            parsed.compile,
            strings(&[
                "/work/bin/go", "tool", "compile", "-p", "main", "-o", "/tmp/out.a", "-I", "/inc",
                "foo.go", "bar.go",
            ])
        );
        assert!(parsed.params_file.is_none());
    }

    #[test]
    fn test_pwd_prefix_is_stripped() {
        let parsed = parse_script("export GOROOT=$(pwd)/external/go_sdk && go tool compile x.go");
        assert_eq!(parsed.root_dir, "external/go_sdk");
    }

    #[test]
    fn test_last_match_wins() {
        let parsed = parse_script("cd /a\nexport GOROOT=/r1\ncd /b && export GOROOT=/r2\ngo build");
        assert_eq!(parsed.work_dir, "/b");
        assert_eq!(parsed.root_dir, "/r2");
        assert_eq!(parsed.compile, strings(&["go", "build"]));
    }

    #[test]
    fn test_blank_lines_are_not_statements() {
        let parsed = parse_script("cd /w && go tool compile a.go\n\n");
        assert_eq!(parsed.compile, strings(&["go", "tool", "compile", "a.go"]));
        assert_eq!(parsed.work_dir, "/w");
    }

    #[test]
    fn test_unrecognized_statements_are_ignored() {
        let parsed = parse_script("set -e && echo cd /nope && go tool compile a.go");
        assert!(parsed.work_dir.is_empty());
        assert_eq!(parsed.compile, strings(&["go", "tool", "compile", "a.go"]));
    }

    #[tokio::test]
    async fn test_flat_arguments_pass_through() {
        let args = strings(&["go", "tool", "compile", "a.go"]);
        let parsed = parse_response(&OneFile(""), &args).await.unwrap();
        assert_eq!(parsed, ParsedResponse::flat(&args));
        assert!(parsed.root_dir.is_empty());
        assert!(parsed.work_dir.is_empty());
    }

    #[tokio::test]
    async fn test_params_file_is_read_through_opener() {
        let opener = OneFile("cd /w && go tool compile a.go");
        let parsed = parse_response(&opener, &strings(&["x.params"])).await.unwrap();
        assert_eq!(parsed.params_file.as_deref(), Some("x.params"));
        assert_eq!(parsed.work_dir, "/w");
        assert_eq!(parsed.compile, strings(&["go", "tool", "compile", "a.go"]));
    }

    #[tokio::test]
    async fn test_unreadable_params_file_fails() {
        struct Denied;

        #[async_trait]
        impl FileOpener for Denied {
            async fn open(&self, _path: &str) -> io::Result<ByteStream> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }

        let err = parse_response(&Denied, &strings(&["x.params"])).await.unwrap_err();
        assert!(matches!(err, ExtractError::ResponseFileRead { ref path, .. } if path == "x.params"));
    }

    #[tokio::test]
    async fn test_non_utf8_params_file_fails() {
        struct Garbled;

        #[async_trait]
        impl FileOpener for Garbled {
            async fn open(&self, _path: &str) -> io::Result<ByteStream> {
                Ok(Box::new(io::Cursor::new(b"cd /w && go tool compile \xff.go".to_vec())))
            }
        }

        let err = parse_response(&Garbled, &strings(&["x.params"])).await.unwrap_err();
        match err {
            ExtractError::ResponseFileRead { path, source } => {
                assert_eq!(path, "x.params");
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected ResponseFileRead, got {other:?}"),
        }
    }
}
