//! xaction core library
//!
//! Turns a build orchestrator's extra-action record for one Go compile into
//! a compilation unit for the source indexer:
//!
//! - [`params`]: expand the `.params` script into the compiler command line
//! - [`tool_args`]: classify the compiler arguments
//! - [`filter`]: choose which declared inputs the indexer needs
//! - [`fetch`]: load those inputs concurrently, in order
//! - [`extract`]: assemble the [`CompilationUnit`]

pub mod action;
pub mod config;
pub mod digest;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod params;
pub mod paths;
pub mod shell;
pub mod telemetry;
pub mod tool_args;
pub mod unit;
pub mod vname;

pub use action::{EnvironmentVariable, ExtraActionInfo, SpawnInfo};
pub use config::ExtractorConfig;
pub use digest::Digest;
pub use error::{ExtractError, Result, RulesError};
pub use fetch::{fetch_inputs, ByteStream, FileData, FileOpener, FsOpener};
pub use filter::InputFilter;
pub use params::{parse_response, parse_script, ParsedResponse};
pub use telemetry::init_tracing;
pub use tool_args::{classify, ToolInvocation};
pub use unit::{BuildDetails, CompilationUnit, Env, FileInfo, RequiredInput, VName};
pub use vname::{Rule, Rules, VNameTemplate};
