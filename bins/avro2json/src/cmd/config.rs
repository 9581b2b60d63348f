use std::path::{Path, PathBuf};

use avro_text::{OutputMode, OutputPolicy};
use clap::Args;
use serde::Deserialize;

use super::error::CliError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub prune: Option<bool>,
    pub logical_types: Option<bool>,
    pub guid: Option<bool>,
    pub csv: Option<bool>,
    pub columns: Option<Vec<usize>>,
}

pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let shown = path.display();
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read config {shown}: {e}")))?;
    toml::from_str(&content).map_err(|e| CliError::Config(format!("bad config {shown}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Avro object container file
    pub file: PathBuf,

    /// Drop fields whose value is null, [] or {}
    #[arg(long)]
    pub prune: bool,

    /// Render decimals, dates, times and timestamps as text
    #[arg(long)]
    pub logical_types: bool,

    /// Render 16-byte System.Guid fixeds as canonical GUID strings
    #[arg(long)]
    pub guid: bool,

    /// Print the writer schema as JSON and exit
    #[arg(long)]
    pub show_schema: bool,

    /// One CSV row per record instead of JSON
    #[arg(long)]
    pub csv: bool,

    /// 1-based top-level field positions to emit, in order (e.g. 3,1)
    #[arg(long, value_delimiter = ',', value_parser = parse_column)]
    pub columns: Option<Vec<usize>>,

    /// Path to a TOML file with defaults for the flags above
    #[arg(long, env = "AVRO2JSON_CONFIG")]
    pub config: Option<PathBuf>,
}

fn parse_column(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err("column positions start at 1".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("'{text}' is not a column position: {e}")),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings after merging: config file < env/CLI
#[derive(Debug)]
pub struct Effective {
    pub file: PathBuf,
    pub show_schema: bool,
    pub mode: OutputMode,
    pub policy: OutputPolicy,
}

impl Effective {
    pub fn new(args: &ConvertArgs) -> Result<Self, CliError> {
        let cfg = match &args.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        Ok(Self::merge(args, cfg))
    }

    fn merge(args: &ConvertArgs, cfg: Config) -> Self {
        let csv = args.csv || cfg.csv.unwrap_or(false);
        Self {
            file: args.file.clone(),
            show_schema: args.show_schema,
            mode: if csv { OutputMode::Csv } else { OutputMode::Json },
            policy: OutputPolicy {
                prune: args.prune || cfg.prune.unwrap_or(false),
                decode_logical_types: args.logical_types || cfg.logical_types.unwrap_or(false),
                decode_guid: args.guid || cfg.guid.unwrap_or(false),
                projected_columns: args.columns.clone().or(cfg.columns),
            },
        }
    }
}
