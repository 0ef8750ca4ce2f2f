//! Classification of the Go compiler command line.

use std::path::Path;

use tracing::{debug, warn};

use crate::params::ParsedResponse;
use crate::paths::{ancestor, resolve};

/// Base name of the tool binary that starts the compiler invocation.
pub const TOOL_BINARY: &str = "go";

/// Suffix of Go source files.
pub const SOURCE_SUFFIX: &str = ".go";

/// Settings expressed by the Go compiler tool and its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Compiler argument list with path-valued flags resolved.
    pub compile: Vec<String>,
    /// The params file, if one was used.
    pub params_file: Option<String>,
    pub work_dir: String,
    pub root_dir: String,
    /// Import path being compiled (`-p`).
    pub import_path: String,
    /// Include path (`-I`).
    pub include_path: String,
    /// Compiler output (`-o`).
    pub output_path: String,
    /// Root directory for the compiler and its libraries.
    pub tool_root: String,
    /// Whether the race detector is enabled.
    pub use_race: bool,
    /// Source files in first-seen order.
    pub sources: Vec<String>,
}

#[derive(Clone, Copy)]
enum Capture {
    ImportPath,
    OutputPath,
    IncludePath,
}

impl ToolInvocation {
    fn slot(&mut self, capture: Capture) -> &mut String {
        match capture {
            Capture::ImportPath => &mut self.import_path,
            Capture::OutputPath => &mut self.output_path,
            Capture::IncludePath => &mut self.include_path,
        }
    }

    /// The toolchain root joined onto the working directory, as the compiler
    /// would see it.
    pub fn go_root(&self) -> String {
        resolve(&self.work_dir, &self.root_dir)
    }
}

/// Walk the compile arguments and pull out the fields the extractor needs.
///
/// Arguments before the tool binary are discarded. Unknown flags are kept
/// verbatim.
pub fn classify(parsed: &ParsedResponse) -> ToolInvocation {
    let mut result = ToolInvocation {
        params_file: parsed.params_file.clone(),
        work_dir: parsed.work_dir.clone(),
        root_dir: parsed.root_dir.clone(),
        ..Default::default()
    };

    let mut want: Option<Capture> = None;
    let mut in_tool = false;
    for arg in &parsed.compile {
        if !in_tool {
            if Path::new(arg).file_name().map(|n| n == TOOL_BINARY).unwrap_or(false) {
                let adjusted = resolve(&parsed.work_dir, arg);
                result.tool_root = ancestor(&adjusted, 2);
                debug!(tool = %adjusted, tool_root = %result.tool_root, "found compiler");
                result.compile.push(adjusted);
                in_tool = true;
            }
            continue;
        }

        if let Some(capture) = want.take() {
            let resolved = resolve(&parsed.work_dir, arg);
            *result.slot(capture) = resolved.clone();
            result.compile.push(resolved);
            continue;
        }

        result.compile.push(arg.clone());
        match arg.as_str() {
            "-p" => want = Some(Capture::ImportPath),
            "-o" => want = Some(Capture::OutputPath),
            "-I" => want = Some(Capture::IncludePath),
            "-race" => result.use_race = true,
            a if !a.starts_with('-') && a.ends_with(SOURCE_SUFFIX) => {
                result.sources.push(arg.clone());
            }
            _ => {}
        }
    }

    if !in_tool {
        warn!(args = parsed.compile.len(), "no go binary in compile arguments");
    }
    result
}
