//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - configures logging
//! - locates the SM reference tables
//! - builds the requested coupling models into a workspace
//! - prints summaries or yield scales and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{BuildArgs, Command, ModelArgs, ScaleArgs, TableArgs};
use crate::domain::ModelKind;
use crate::error::AppError;
use crate::report::{STANDARD_DECAYS, STANDARD_PRODUCTIONS};

pub mod pipeline;

use pipeline::RunConfig;

/// Entry point for the `losm` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build(args) => handle_build(args),
        Command::Scale(args) => handle_scale(args),
        Command::Table(args) => handle_table(args),
    }
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let mut config = run_config_from_args(&args.model);
    if args.all {
        config.models = ModelKind::ALL.to_vec();
    }
    let run = pipeline::run_build(&config)?;

    println!("{}", crate::report::format_workspace(&run.workspace));

    if let Some(path) = &args.export {
        crate::io::write_workspace_json(path, &run.workspace)?;
        info!(path = %path.display(), "exported workspace");
    }
    Ok(())
}

fn handle_scale(args: ScaleArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.model);
    let mut run = pipeline::run_build(&config)?;
    let model = run.primary()?;

    let name = model.get_higgs_signal_yield_scale(&mut run.workspace, &args.production, &args.decay, &args.energy)?;
    let value = run.workspace.eval(&name)?;
    println!("{name} = {value:.6}");
    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.model);
    let mut run = pipeline::run_build(&config)?;
    let model = run.primary()?;

    let productions = with_default(&args.productions, &STANDARD_PRODUCTIONS);
    let decays = with_default(&args.decays, &STANDARD_DECAYS);
    let rows = crate::report::compute_yield_table(&model, &mut run.workspace, &productions, &decays, &args.energy)?;

    println!("{}", crate::report::format_yield_table(&rows));
    Ok(())
}

pub fn run_config_from_args(args: &ModelArgs) -> RunConfig {
    RunConfig {
        models: vec![args.model],
        physics_options: args.physics_options.clone(),
        mass: args.mass,
        datadir: args.datadir.clone(),
        assignments: args.assignments.clone(),
    }
}

fn with_default(given: &[String], fallback: &[&str]) -> Vec<String> {
    if given.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        given.to_vec()
    }
}
