//! Model variants and tag classification.
//!
//! The three coupling models differ only in which parameters float and whether
//! an extra diphoton amplitude takes part. Everything variant-specific lives in
//! the [`ModelKind`] descriptor so the model code itself stays generic.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::workspace::ExternalFn;

/// Fermion coupling scale.
pub const CF: &str = "CF";
/// Vector-boson coupling scale.
pub const CV: &str = "CV";
/// Extra contribution to the diphoton loop amplitude.
pub const XG: &str = "XG";
/// Higgs boson mass.
pub const MH: &str = "MH";

/// Running b-quark mass as a function of `MH`.
pub const RUNNING_MB: &str = "mb";

/// Name of the parameters-of-interest set.
pub const POI_SET: &str = "POI";

/// Default coupling-parameter declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub value: f64,
    /// `None` means the parameter is fixed to `value`.
    pub range: Option<(f64, f64)>,
}

impl ParamSpec {
    const fn free(name: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            value,
            range: Some((min, max)),
        }
    }

    const fn fixed(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value,
            range: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.range.is_some()
    }
}

const CVCF_PARAMS: [ParamSpec; 2] = [
    ParamSpec::free(CV, 1.0, 0.0, 1.5),
    ParamSpec::free(CF, 1.0, -2.0, 2.0),
];

const CVCFXG_PARAMS: [ParamSpec; 3] = [
    ParamSpec::free(CV, 1.0, 0.0, 1.5),
    ParamSpec::free(CF, 1.0, -1.5, 1.5),
    ParamSpec::free(XG, 0.0, -4.0, 4.0),
];

const CFXG_PARAMS: [ParamSpec; 3] = [
    ParamSpec::fixed(CV, 1.0),
    ParamSpec::free(CF, 1.0, -1.5, 1.5),
    ParamSpec::free(XG, 0.0, -4.0, 4.0),
];

/// Coupling model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ModelKind {
    /// Free fermion and vector couplings.
    #[serde(rename = "cVcF")]
    #[value(name = "cVcF")]
    CvCf,
    /// Free fermion and vector couplings plus an extra diphoton amplitude.
    #[serde(rename = "cVcFxG")]
    #[value(name = "cVcFxG")]
    CvCfXg,
    /// Free fermion coupling plus an extra diphoton amplitude, vector coupling at SM.
    #[serde(rename = "cFxG")]
    #[value(name = "cFxG")]
    CfXg,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::CvCf, ModelKind::CvCfXg, ModelKind::CfXg];

    /// Name under which the framework registers the model instance.
    pub fn instance_name(self) -> &'static str {
        match self {
            ModelKind::CvCf => "cVcF",
            ModelKind::CvCfXg => "cVcFxG",
            ModelKind::CfXg => "cFxG",
        }
    }

    /// Namespace prefix for every derived name built by this variant.
    pub fn prefix(self) -> &'static str {
        match self {
            ModelKind::CvCf => "CvCf",
            ModelKind::CvCfXg => "CvCfXg",
            ModelKind::CfXg => "CfXg",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelKind::CvCf => "LO SM couplings scaled by CV and CF",
            ModelKind::CvCfXg => "LO SM couplings scaled by CV and CF, extra diphoton amplitude XG",
            ModelKind::CfXg => "LO SM couplings scaled by CF with CV=1, extra diphoton amplitude XG",
        }
    }

    /// Coupling parameters in declaration (and POI) order.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            ModelKind::CvCf => &CVCF_PARAMS,
            ModelKind::CvCfXg => &CVCFXG_PARAMS,
            ModelKind::CfXg => &CFXG_PARAMS,
        }
    }

    /// Names of the floating coupling parameters.
    pub fn free_params(self) -> Vec<&'static str> {
        self.params().iter().filter(|p| p.is_free()).map(|p| p.name).collect()
    }

    /// Whether `CV` floats; when it does not, the vector partial widths carry no
    /// coupling factor.
    pub fn vector_coupling_free(self) -> bool {
        self.params().iter().any(|p| p.name == CV && p.is_free())
    }

    /// Whether the extra diphoton amplitude `XG` takes part.
    pub fn has_extra_diphoton_term(self) -> bool {
        self.params().iter().any(|p| p.name == XG)
    }

    /// Diphoton special function used by this variant.
    pub fn diphoton_fn(self) -> ExternalFn {
        if self.has_extra_diphoton_term() {
            ExternalFn::ScaleHGamGamLoSmPlusX
        } else {
            ExternalFn::ScaleHGamGamLoSm
        }
    }

    /// Positional arguments of the diphoton special function.
    ///
    /// The fermion coupling appears twice: once for the top loop and once for
    /// the bottom loop.
    pub fn diphoton_args(self) -> Vec<String> {
        let mut args = vec![MH, CF, CV, RUNNING_MB, CF];
        if self.has_extra_diphoton_term() {
            args.push(XG);
        }
        args.into_iter().map(str::to_string).collect()
    }

    /// Namespaced derived-quantity name, e.g. `CvCf_Gscal_tot`.
    pub fn scoped(self, suffix: &str) -> String {
        format!("{}_{suffix}", self.prefix())
    }

    /// Name of the yield-scale expression for a production/decay pair.
    pub fn yield_scale_name(self, production: &str, decay: &str) -> String {
        format!("{}_XSBRscal_{production}_{decay}", self.prefix())
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.instance_name())
    }
}

/// Decay channels whose SM branching ratios the models need.
pub const SM_DECAYS: [&str; 11] = [
    "htt", "hbb", "hcc", "hww", "hzz", "hgluglu", "htoptop", "hgg", "hzg", "hmm", "hss",
];

/// Channels whose partial width scales with `CF²`.
pub const FERMION_WIDTH_DECAYS: [&str; 7] = ["hbb", "htt", "hcc", "htoptop", "hgluglu", "hmm", "hss"];

/// Channels whose partial width scales with `CV²`.
pub const VECTOR_WIDTH_DECAYS: [&str; 3] = ["hww", "hzz", "hzg"];

/// Name of the SM branching ratio for a decay channel.
pub fn sm_br_name(decay: &str) -> String {
    format!("SM_BR_{decay}")
}

/// Which coupling scales a production cross section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionClass {
    /// `ggH`, `ttH`: scales with `CF²`.
    Fermion,
    /// Everything else, including unrecognized tags: scales with `CV²`.
    Vector,
}

impl ProductionClass {
    pub fn of(production: &str) -> Self {
        match production {
            "ggH" | "ttH" => ProductionClass::Fermion,
            _ => ProductionClass::Vector,
        }
    }

    pub fn coupling(self) -> &'static str {
        match self {
            ProductionClass::Fermion => CF,
            ProductionClass::Vector => CV,
        }
    }
}

/// Which branching-ratio scale applies to a decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayClass {
    /// `hww`, `hzz`.
    Vector,
    /// `hbb`, `htt`.
    Fermion,
    /// `hgg`, and any decay not listed above (unknown channels never fail).
    Diphoton,
}

impl DecayClass {
    pub fn of(decay: &str) -> Self {
        match decay {
            "hww" | "hzz" => DecayClass::Vector,
            "hbb" | "htt" => DecayClass::Fermion,
            _ => DecayClass::Diphoton,
        }
    }

    /// Suffix of the matching `BRscal_*` expression.
    pub fn br_suffix(self) -> &'static str {
        match self {
            DecayClass::Vector => "hv",
            DecayClass::Fermion => "hf",
            DecayClass::Diphoton => "hgg",
        }
    }
}
