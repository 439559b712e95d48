//! Shared "build pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! locate reference data -> declare parameters -> build expressions -> apply values

use std::path::PathBuf;

use tracing::{debug, info};

use crate::data::{SmBuilder, TableSmBuilder};
use crate::domain::ModelKind;
use crate::error::{ModelError, Result};
use crate::models::HiggsCouplingModel;
use crate::workspace::Workspace;

/// Workspace name used for CLI runs.
pub const WORKSPACE_NAME: &str = "w";

/// Inputs of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Variants to build, in order, into one shared workspace.
    pub models: Vec<ModelKind>,
    pub physics_options: Vec<String>,
    pub mass: f64,
    /// Reference data directory; `None` resolves it from the environment.
    pub datadir: Option<PathBuf>,
    /// Variable values applied after the build.
    pub assignments: Vec<(String, f64)>,
}

/// All outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub workspace: Workspace,
    pub models: Vec<HiggsCouplingModel>,
}

impl RunOutput {
    /// The first model built, which single-model commands operate on.
    pub fn primary(&self) -> Result<HiggsCouplingModel> {
        self.models
            .first()
            .cloned()
            .ok_or_else(|| ModelError::Config("no model was built".to_string()))
    }
}

/// Execute the build pipeline with reference data located from the config.
pub fn run_build(config: &RunConfig) -> Result<RunOutput> {
    let smh = match &config.datadir {
        Some(dir) => TableSmBuilder::new(dir),
        None => TableSmBuilder::from_env()?,
    };
    run_build_with(config, &smh)
}

/// Execute the build pipeline with a caller-supplied SM builder.
pub fn run_build_with(config: &RunConfig, smh: &dyn SmBuilder) -> Result<RunOutput> {
    let mut workspace = Workspace::new(WORKSPACE_NAME);
    let mut models = Vec::with_capacity(config.models.len());

    for &kind in &config.models {
        let mut model = HiggsCouplingModel::new(kind).with_mass(config.mass);
        model.set_physics_options(&config.physics_options)?;
        model.do_parameters_of_interest(&mut workspace, smh)?;
        info!(model = %kind, nodes = workspace.len(), "built model");
        models.push(model);
    }

    apply_assignments(&mut workspace, &config.assignments)?;
    Ok(RunOutput { workspace, models })
}

/// Set variable values, failing on unknown names or non-variables.
pub fn apply_assignments(ws: &mut Workspace, assignments: &[(String, f64)]) -> Result<()> {
    for (name, value) in assignments {
        ws.set_value(name, *value)?;
        debug!(name = %name, value, "applied assignment");
    }
    Ok(())
}
