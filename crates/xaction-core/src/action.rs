//! Extra-action records as handed over by the build orchestrator.

use serde::{Deserialize, Serialize};

/// One build action exposed to an extra-action listener.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtraActionInfo {
    /// Action mnemonic, e.g. `GoCompile`.
    #[serde(default)]
    pub mnemonic: String,

    /// Label of the target that owns the action.
    #[serde(default)]
    pub owner: String,

    /// Subprocess invocation details. Absent for actions that do not spawn.
    #[serde(default)]
    pub spawn_info: Option<SpawnInfo>,
}

/// The command line and declared I/O of one subprocess invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpawnInfo {
    #[serde(default)]
    pub argument: Vec<String>,

    #[serde(default)]
    pub variable: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub input_file: Vec<String>,

    #[serde(default)]
    pub output_file: Vec<String>,
}

/// A single `name=value` environment entry. Duplicates are allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl ExtraActionInfo {
    /// Parse an action record from JSON bytes.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
