//! Command-line parsing for the `losm` tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! model code; `app` turns these structs into a `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ModelKind;
use crate::models::DEFAULT_MASS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "losm", version, about = "LO-SM Higgs coupling models (CV, CF, XG)")]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the model workspace, print its summary and optionally export it.
    Build(BuildArgs),
    /// Resolve and evaluate the yield scale of one production × decay pair.
    Scale(ScaleArgs),
    /// Print yield scales for a grid of productions × decays.
    Table(TableArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model variant.
    #[arg(short = 'm', long, value_enum, default_value_t = ModelKind::CvCf)]
    pub model: ModelKind,

    /// Physics option, repeatable (e.g. `higgsMassRange=120,130`).
    #[arg(long = "po", value_name = "OPTION")]
    pub physics_options: Vec<String>,

    /// Higgs mass (GeV) used when the mass does not float.
    #[arg(long, default_value_t = DEFAULT_MASS)]
    pub mass: f64,

    /// Reference data directory. Defaults to the lhc-hxswg data below $CMSSW_BASE.
    #[arg(long)]
    pub datadir: Option<PathBuf>,

    /// Parameter value applied before evaluation, repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, f64)>,
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Build all three variants into one workspace.
    #[arg(long)]
    pub all: bool,

    /// Export the workspace to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ScaleArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Production mode tag (ggH, ttH, qqH, VH, WH, ZH, ...).
    #[arg(short = 'p', long)]
    pub production: String,

    /// Decay channel tag (hgg, hww, hzz, hbb, htt, ...).
    #[arg(short = 'd', long)]
    pub decay: String,

    /// Collision energy tag.
    #[arg(short = 'e', long, default_value = "13TeV")]
    pub energy: String,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Production modes (comma-separated). Defaults to the standard set.
    #[arg(long, value_delimiter = ',')]
    pub productions: Vec<String>,

    /// Decay channels (comma-separated). Defaults to the standard set.
    #[arg(long, value_delimiter = ',')]
    pub decays: Vec<String>,

    /// Collision energy tag.
    #[arg(short = 'e', long, default_value = "13TeV")]
    pub energy: String,
}

/// Parse `NAME=VALUE`.
fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((name.to_string(), value))
}
