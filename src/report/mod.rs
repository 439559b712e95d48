//! Reporting utilities: yield-scale tables and workspace summaries.

use crate::error::Result;
use crate::models::HiggsCouplingModel;
use crate::workspace::Workspace;

pub mod format;

pub use format::*;

/// Production modes listed by default in yield tables.
pub const STANDARD_PRODUCTIONS: [&str; 6] = ["ggH", "ttH", "qqH", "VH", "WH", "ZH"];

/// Decay channels listed by default in yield tables.
pub const STANDARD_DECAYS: [&str; 5] = ["hgg", "hww", "hzz", "hbb", "htt"];

/// One resolved yield scale.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldRow {
    pub production: String,
    pub decay: String,
    pub name: String,
    pub value: f64,
}

/// Resolve and evaluate the yield scale of every production × decay pair.
pub fn compute_yield_table<P, D>(
    model: &HiggsCouplingModel,
    ws: &mut Workspace,
    productions: &[P],
    decays: &[D],
    energy: &str,
) -> Result<Vec<YieldRow>>
where
    P: AsRef<str>,
    D: AsRef<str>,
{
    let mut rows = Vec::with_capacity(productions.len() * decays.len());
    for production in productions {
        for decay in decays {
            let (production, decay) = (production.as_ref(), decay.as_ref());
            let name = model.get_higgs_signal_yield_scale(ws, production, decay, energy)?;
            let value = ws.eval(&name)?;
            rows.push(YieldRow {
                production: production.to_string(),
                decay: decay.to_string(),
                name,
                value,
            });
        }
    }
    Ok(rows)
}
