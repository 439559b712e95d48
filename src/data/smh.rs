//! Standard Model Higgs reference quantities.
//!
//! The coupling models never compute SM branching ratios themselves; they ask an
//! [`SmBuilder`] to make sure the named quantities exist in the workspace. The
//! stock implementation, [`TableSmBuilder`], reads the tabulated values shipped
//! with the framework and turns each column into a spline of `MH`.
//!
//! Data layout below the data directory:
//!
//! - `running_constants.txt`: running couplings and quark masses vs `mH`
//! - `sm/br/BR.txt`: SM branching ratios vs `mH`, one column per decay tag

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::table::TextTable;
use crate::domain::{MH, sm_br_name};
use crate::error::{ModelError, Result};
use crate::math::CubicSpline;
use crate::workspace::{Expr, Function, Workspace};

/// Environment variable holding the framework installation root.
pub const ROOT_ENV: &str = "CMSSW_BASE";

/// Data directory relative to the installation root.
pub const DATA_SUBDIR: &str = "src/HiggsAnalysis/CombinedLimit/data/lhc-hxswg";

/// Running constants table, relative to the data directory.
pub const RUNNING_CONSTANTS: &str = "running_constants.txt";

/// Branching-ratio table, relative to the data directory.
pub const BR_TABLE: &str = "sm/br/BR.txt";

/// Supplier of SM reference quantities.
pub trait SmBuilder {
    /// Directory holding the reference tables.
    fn datadir(&self) -> &Path;

    /// Ensure `name` exists as an interpolated function of `xvar`, using column
    /// 0 of the table at `path` as abscissa and column `ycol` as ordinate.
    fn text_to_spline(&self, ws: &mut Workspace, name: &str, path: &Path, xvar: &str, ycol: usize) -> Result<()>;

    /// Ensure `SM_BR_<decay>` exists.
    fn make_br(&self, ws: &mut Workspace, decay: &str) -> Result<()>;
}

/// [`SmBuilder`] backed by the text tables of the data directory.
#[derive(Debug, Clone)]
pub struct TableSmBuilder {
    datadir: PathBuf,
    /// Parsed on first use; every BR column comes from the same file.
    br_table: OnceCell<TextTable>,
}

impl TableSmBuilder {
    pub fn new(datadir: impl Into<PathBuf>) -> Self {
        Self {
            datadir: datadir.into(),
            br_table: OnceCell::new(),
        }
    }

    /// Locate the data directory from `$CMSSW_BASE` (a `.env` file is honoured).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_root(std::env::var(ROOT_ENV).ok())
    }

    /// Data directory below an installation root, if one is known.
    pub fn from_root(root: Option<String>) -> Result<Self> {
        let root = root.ok_or_else(|| ModelError::Config(format!("Missing {ROOT_ENV} in environment (.env).")))?;
        let datadir = Path::new(&root).join(DATA_SUBDIR);
        info!(datadir = %datadir.display(), "using SM reference data");
        Ok(Self::new(datadir))
    }

    pub fn br_table_path(&self) -> PathBuf {
        self.datadir.join(BR_TABLE)
    }

    fn br_table(&self) -> Result<&TextTable> {
        if let Some(table) = self.br_table.get() {
            return Ok(table);
        }
        let table = TextTable::read(&self.br_table_path())?;
        Ok(self.br_table.get_or_init(|| table))
    }
}

fn spline_function(table: &TextTable, path: &Path, xvar: &str, ycol: usize) -> Result<Function> {
    let spline = CubicSpline::new(table.column(0)?, table.column(ycol)?)?;
    debug!(path = %path.display(), ycol, nodes = spline.x().len(), "built spline");
    Ok(Function::new(
        format!("file {}, x={xvar}, y={ycol}", path.display()),
        Expr::Spline {
            x: xvar.to_string(),
            spline,
        },
    ))
}

impl SmBuilder for TableSmBuilder {
    fn datadir(&self) -> &Path {
        &self.datadir
    }

    fn text_to_spline(&self, ws: &mut Workspace, name: &str, path: &Path, xvar: &str, ycol: usize) -> Result<()> {
        ws.get_or_create(name, |_| spline_function(&TextTable::read(path)?, path, xvar, ycol))?;
        Ok(())
    }

    fn make_br(&self, ws: &mut Workspace, decay: &str) -> Result<()> {
        let name = sm_br_name(decay);
        if ws.contains(&name) {
            return Ok(());
        }

        let path = self.br_table_path();
        let table = self.br_table()?;
        match table.column_index(decay) {
            Some(col) => {
                ws.get_or_create(&name, |_| spline_function(table, &path, MH, col))?;
                Ok(())
            }
            // H → tt̄ is closed for the masses tabulated.
            None if decay == "htoptop" => ws.do_var(&name, 0.0, None),
            None => Err(ModelError::Table(format!(
                "{}: no column for decay '{decay}'",
                path.display()
            ))),
        }
    }
}
