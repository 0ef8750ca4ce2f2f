//! xaction - Go extra-action extractor
//!
//! Reads the JSON form of one extra-action record and writes the compilation
//! unit extracted from it.
//!
//! ## Commands
//!
//! - `extract`: extract a compilation unit from an action record

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use xaction_core::{init_tracing, CompilationUnit, ExtraActionInfo, ExtractorConfig, Rules};

#[derive(Parser)]
#[command(name = "xaction")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract indexer compilation units from Go compile extra actions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a compilation unit from an extra-action record
    Extract {
        /// Action record (JSON)
        #[arg(short, long)]
        action: PathBuf,

        /// Naming rules file (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Default corpus label
        #[arg(short, long, env = "XACTION_CORPUS", default_value = "")]
        corpus: String,

        /// Only extract actions with this mnemonic (empty matches all)
        #[arg(short, long, env = "XACTION_MNEMONIC", default_value = "")]
        mnemonic: String,

        /// Where to write the unit (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Extract {
            action,
            rules,
            corpus,
            mnemonic,
            output,
        } => {
            let config = build_config(rules.as_deref(), &corpus, &mnemonic)?;
            cmd_extract(&config, &action, output.as_deref()).await
        }
    }
}

/// Assemble the extractor config from command-line settings.
fn build_config(rules: Option<&Path>, corpus: &str, mnemonic: &str) -> Result<ExtractorConfig> {
    let mut config = ExtractorConfig::new(corpus).with_mnemonic(mnemonic);
    if let Some(path) = rules {
        let rules = Rules::from_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
        info!("Loaded {} naming rules", rules.len());
        config = config.with_rules(rules);
    }
    Ok(config)
}

/// Extract one action. Returns `None` when the action was skipped.
async fn run_extract(config: &ExtractorConfig, action: &Path) -> Result<Option<CompilationUnit>> {
    let data = tokio::fs::read(action)
        .await
        .with_context(|| format!("Failed to read action {}", action.display()))?;
    let info = ExtraActionInfo::from_json(&data)
        .with_context(|| format!("Failed to parse action {}", action.display()))?;

    match config.extract(&info).await {
        Ok(unit) => Ok(Some(unit)),
        Err(e) if e.is_skip() => {
            info!("Skipping action: {}", e);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Extracting {}", action.display())),
    }
}

async fn cmd_extract(config: &ExtractorConfig, action: &Path, output: Option<&Path>) -> Result<()> {
    let Some(unit) = run_extract(config, action).await? else {
        return Ok(());
    };

    let json = unit.to_json_pretty()?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote compilation unit to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_action(dir: &Path, mnemonic: &str) -> PathBuf {
        let src = dir.join("main.go");
        std::fs::write(&src, b"package main\n").unwrap();
        let action = serde_json::json!({
            "mnemonic": mnemonic,
            "owner": "//:main",
            "spawn_info": {
                "argument": ["go", "tool", "compile", "-o", "main.a", src.to_str().unwrap()],
                "variable": [{"name": "PATH", "value": "/bin"}],
                "input_file": [src.to_str().unwrap()],
                "output_file": ["main.a"]
            }
        });
        let path = dir.join("action.json");
        std::fs::write(&path, serde_json::to_vec(&action).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "xaction", "extract", "--action", "a.json", "--corpus", "kythe", "--mnemonic",
            "GoCompile",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                action,
                corpus,
                mnemonic,
                rules,
                output,
            } => {
                assert_eq!(action, PathBuf::from("a.json"));
                assert_eq!(corpus, "kythe");
                assert_eq!(mnemonic, "GoCompile");
                assert!(rules.is_none());
                assert!(output.is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_extract_writes_unit() {
        let dir = tempfile::tempdir().unwrap();
        let action = write_action(dir.path(), "GoCompile");
        let out = dir.path().join("unit.json");

        let config = build_config(None, "kythe", "GoCompile").unwrap();
        cmd_extract(&config, &action, Some(&out)).await.unwrap();

        let unit: CompilationUnit =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(unit.v_name.corpus, "kythe");
        assert_eq!(unit.required_input.len(), 1);
        assert_eq!(unit.output_key, "main.a");
        assert!(unit.env("PATH").is_none());
    }

    #[tokio::test]
    async fn test_mismatched_mnemonic_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let action = write_action(dir.path(), "CppCompile");

        let config = build_config(None, "kythe", "GoCompile").unwrap();
        let unit = run_extract(&config, &action).await.unwrap();
        assert!(unit.is_none());
    }

    #[test]
    fn test_bad_rules_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        std::fs::write(&rules, b"[{\"pattern\": \"(\"}]").unwrap();
        let err = build_config(Some(&rules), "", "").unwrap_err();
        assert!(err.to_string().contains("Failed to load rules"));
    }
}
