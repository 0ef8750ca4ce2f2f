//! Selection of the declared inputs the indexer actually needs.

use crate::paths::{relative_to, split_prefix};
use crate::tool_args::ToolInvocation;

/// Inputs of the toolchain installation the indexer can skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFilter {
    params_file: Option<String>,
    tool_root: String,
    use_race: bool,
}

impl InputFilter {
    pub fn new(params_file: Option<String>, tool_root: impl Into<String>, use_race: bool) -> Self {
        Self {
            params_file,
            tool_root: tool_root.into(),
            use_race,
        }
    }

    pub fn for_invocation(inv: &ToolInvocation) -> Self {
        Self::new(inv.params_file.clone(), inv.tool_root.clone(), inv.use_race)
    }

    /// Reports whether `path` should be kept as a required input.
    pub fn wants(&self, path: &str) -> bool {
        // The params file drives the compiler; it is not an input to it.
        if self.params_file.as_deref() == Some(path) {
            return false;
        }

        // Anything outside the tool root is a real source or library input.
        let Some(trimmed) = relative_to(&self.tool_root, path) else {
            return true;
        };

        // Within the tool root, keep library archives and drop binaries.
        // Race-instrumented libraries only matter when building with -race.
        let (prefix, tail) = split_prefix(&trimmed);
        match prefix {
            "bin/" => false,
            "pkg/" => {
                let (sub, _) = split_prefix(tail);
                if sub.ends_with("_race/") && !self.use_race {
                    return false;
                }
                sub != "tool/"
            }
            // TODO: decide whether unknown toolchain directories (src/, misc/)
            // should be dropped too; they are kept until that is settled.
            _ => true,
        }
    }

    /// The subsequence of `paths` to keep, in declaration order.
    pub fn select<'a, I>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        paths.into_iter().filter(|p| self.wants(p)).cloned().collect()
    }
}
