//! End-to-end extraction of one compile action.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::action::{ExtraActionInfo, SpawnInfo};
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::fetch::{fetch_inputs, FileData};
use crate::filter::InputFilter;
use crate::params::parse_response;
use crate::tool_args::{classify, ToolInvocation};
use crate::unit::{BuildDetails, CompilationUnit, Env, RequiredInput, VName, GO_LANGUAGE};

/// Environment variable that is never copied onto a unit.
pub const SUPPRESSED_ENV: &str = "PATH";

/// Environment variable carrying the discovered tool root.
pub const GOROOT_ENV: &str = "GOROOT";

/// Rule type recorded in the build details of every unit.
pub const RULE_TYPE: &str = "go_compile";

impl ExtractorConfig {
    /// Extract a compilation unit from `info`.
    ///
    /// Returns [`ExtractError::MnemonicMismatch`] for actions this config does
    /// not handle; callers should treat that as a skip. Any other error means
    /// no unit could be produced.
    pub async fn extract(&self, info: &ExtraActionInfo) -> Result<CompilationUnit> {
        if !self.matches_mnemonic(&info.mnemonic) {
            return Err(ExtractError::MnemonicMismatch {
                actual: info.mnemonic.clone(),
                expected: self.mnemonic.clone(),
            });
        }
        let spawn = info
            .spawn_info
            .as_ref()
            .ok_or(ExtractError::MissingSpawnInfo)?;

        let parsed = parse_response(self.opener.as_ref(), &spawn.argument).await?;
        let inv = classify(&parsed);

        let filter = InputFilter::for_invocation(&inv);
        let wanted = filter.select(&spawn.input_file);
        debug!(
            declared = spawn.input_file.len(),
            kept = wanted.len(),
            "filtered required inputs"
        );

        let files = fetch_inputs(Arc::clone(&self.opener), &wanted).await?;
        let unit = self.assemble(info, spawn, &inv, files);

        info!(
            owner = %info.owner,
            corpus = %unit.v_name.corpus,
            sources = unit.source_file.len(),
            inputs = unit.required_input.len(),
            "extracted compilation"
        );
        Ok(unit)
    }

    /// Build the unit from the classified invocation and fetched inputs.
    pub fn assemble(
        &self,
        info: &ExtraActionInfo,
        spawn: &SpawnInfo,
        inv: &ToolInvocation,
        files: Vec<FileData>,
    ) -> CompilationUnit {
        let v_name = VName {
            signature: info.owner.clone(),
            corpus: self.unit_corpus(&inv.sources),
            language: GO_LANGUAGE.to_string(),
            ..Default::default()
        };

        let required_input = files
            .into_iter()
            .map(|fd| RequiredInput {
                v_name: self.file_vname(&fd.info.path),
                info: fd.info,
                content: fd.content,
            })
            .collect();

        // At most one output is meaningful for a compile; the rest are ignored.
        let output_key = spawn.output_file.first().cloned().unwrap_or_default();
        if spawn.output_file.len() > 1 {
            warn!(
                outputs = spawn.output_file.len(),
                kept = %output_key,
                "ignoring extra declared outputs"
            );
        }

        // A discovered tool root overrides any GOROOT the action declares.
        let computed_root = !inv.root_dir.is_empty();
        let mut environment = Vec::with_capacity(spawn.variable.len() + 1);
        if computed_root {
            environment.push(Env {
                name: GOROOT_ENV.to_string(),
                value: inv.go_root(),
            });
        }
        environment.extend(
            spawn
                .variable
                .iter()
                .filter(|v| v.name != SUPPRESSED_ENV)
                .filter(|v| !(computed_root && v.name == GOROOT_ENV))
                .map(|v| Env {
                    name: v.name.clone(),
                    value: v.value.clone(),
                }),
        );

        CompilationUnit {
            v_name,
            argument: inv.compile.clone(),
            source_file: inv.sources.clone(),
            working_directory: inv.work_dir.clone(),
            environment,
            required_input,
            output_key,
            details: vec![BuildDetails {
                build_target: info.owner.clone(),
                rule_type: RULE_TYPE.to_string(),
            }],
        }
    }
}
