//! LO-SM Higgs coupling model.
//!
//! One type covers all three variants; the [`ModelKind`] descriptor supplies the
//! parameter table and the few formula differences. The framework drives a
//! model in a fixed order:
//!
//! 1. [`HiggsCouplingModel::set_physics_options`]
//! 2. [`HiggsCouplingModel::do_parameters_of_interest`] (which runs `setup`)
//! 3. [`HiggsCouplingModel::get_higgs_signal_yield_scale`], once per process
//!
//! Derived names are prefixed with [`ModelKind::prefix`], so several variants
//! can share a workspace.

use tracing::{debug, info};

use crate::data::{RUNNING_CONSTANTS, SmBuilder};
use crate::domain::{
    CF, CV, DecayClass, FERMION_WIDTH_DECAYS, MH, ModelKind, POI_SET, ProductionClass, RUNNING_MB, SM_DECAYS,
    VECTOR_WIDTH_DECAYS, sm_br_name,
};
use crate::error::Result;
use crate::models::options::PhysicsOptions;
use crate::report::format_workspace;
use crate::workspace::{Expr, Function, Workspace};

/// Higgs mass used when the run configuration does not supply one.
pub const DEFAULT_MASS: f64 = 125.0;

/// Column of the running-constants table holding the b-quark mass.
const MB_COLUMN: usize = 2;

#[derive(Debug, Clone)]
pub struct HiggsCouplingModel {
    kind: ModelKind,
    options: PhysicsOptions,
    /// Fixed Higgs mass when it does not float.
    mass: f64,
}

impl HiggsCouplingModel {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            options: PhysicsOptions::default(),
            mass: DEFAULT_MASS,
        }
    }

    /// Set the externally supplied Higgs mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// One model per variant, in [`ModelKind::ALL`] order.
    pub fn all() -> Vec<Self> {
        ModelKind::ALL.into_iter().map(Self::new).collect()
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn options(&self) -> &PhysicsOptions {
        &self.options
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_physics_options<S: AsRef<str>>(&mut self, options: &[S]) -> Result<()> {
        self.options = PhysicsOptions::parse(options)?;
        Ok(())
    }

    /// Declare couplings, the Higgs mass and the POI set, then build the
    /// derived expressions.
    pub fn do_parameters_of_interest(&self, ws: &mut Workspace, smh: &dyn SmBuilder) -> Result<()> {
        for p in self.kind.params() {
            ws.do_var(p.name, p.value, p.range)?;
        }

        let mut poi = self.kind.free_params();
        match self.options.mass_range {
            Some(range) => {
                ws.do_var(MH, range.midpoint(), Some((range.lo, range.hi)))?;
                poi.push(MH);
            }
            None => ws.do_var(MH, self.mass, None)?,
        }
        ws.define_set(POI_SET, poi.as_slice())?;
        info!(model = %self.kind, poi = ?poi, "declared parameters of interest");

        self.setup(ws, smh)
    }

    /// Build the derived-quantity chain. Safe to call repeatedly.
    pub fn setup(&self, ws: &mut Workspace, smh: &dyn SmBuilder) -> Result<()> {
        let k = self.kind;

        let running = smh.datadir().join(RUNNING_CONSTANTS);
        smh.text_to_spline(ws, RUNNING_MB, &running, MH, MB_COLUMN)?;
        for decay in SM_DECAYS {
            smh.make_br(ws, decay)?;
        }

        let cgamma_sq = k.scoped("cgammaSq");
        ws.get_or_create(&cgamma_sq, |_| {
            Ok(Function::new(
                "LO SM Hgamgam scaling",
                Expr::External {
                    func: k.diphoton_fn(),
                    args: k.diphoton_args(),
                },
            ))
        })?;

        // Partial widths normalized to the SM, grouped by the coupling they scale with.
        let sumf = k.scoped("Gscal_sumf");
        ws.get_or_create(&sumf, |_| {
            Ok(Function::new(
                "fermion partial widths",
                Expr::Product(vec![
                    Expr::square(CF),
                    Expr::sum_of(&FERMION_WIDTH_DECAYS.map(sm_br_name)),
                ]),
            ))
        })?;

        let sumv = k.scoped("Gscal_sumv");
        ws.get_or_create(&sumv, |_| {
            let brs = Expr::sum_of(&VECTOR_WIDTH_DECAYS.map(sm_br_name));
            let expr = if k.vector_coupling_free() {
                Expr::Product(vec![Expr::square(CV), brs])
            } else {
                brs
            };
            Ok(Function::new("vector partial widths", expr))
        })?;

        let gg = k.scoped("Gscal_gg");
        ws.get_or_create(&gg, |_| {
            Ok(Function::new(
                "diphoton partial width",
                Expr::Product(vec![Expr::var(&cgamma_sq), Expr::var(&sm_br_name("hgg"))]),
            ))
        })?;

        let tot = k.scoped("Gscal_tot");
        ws.get_or_create(&tot, |_| {
            Ok(Function::new("total width", Expr::sum_of(&[&sumf, &sumv, &gg])))
        })?;

        // Branching ratios normalized to the SM: coupling² / total width.
        ws.get_or_create(&k.scoped("BRscal_hgg"), |_| {
            Ok(Function::new(
                "diphoton BR scale",
                Expr::quotient(Expr::var(&cgamma_sq), Expr::var(&tot)),
            ))
        })?;
        ws.get_or_create(&k.scoped("BRscal_hf"), |_| {
            Ok(Function::new(
                "fermion BR scale",
                Expr::quotient(Expr::square(CF), Expr::var(&tot)),
            ))
        })?;
        ws.get_or_create(&k.scoped("BRscal_hv"), |_| {
            let num = if k.vector_coupling_free() {
                Expr::square(CV)
            } else {
                Expr::Const(1.0)
            };
            Ok(Function::new("vector BR scale", Expr::quotient(num, Expr::var(&tot))))
        })?;

        debug!("{}", format_workspace(ws));
        Ok(())
    }

    /// Name of the expression scaling the SM yield of `production` × `decay`.
    ///
    /// The expression is `X² × BRscal`, with `X = CF` for `ggH`/`ttH` and `CV`
    /// otherwise, and the branching-ratio scale chosen by [`DecayClass`].
    /// Unrecognized tags resolve to the `CV` and diphoton defaults. `energy` is
    /// accepted for interface compatibility and does not affect the result.
    pub fn get_higgs_signal_yield_scale(
        &self,
        ws: &mut Workspace,
        production: &str,
        decay: &str,
        energy: &str,
    ) -> Result<String> {
        let name = self.kind.yield_scale_name(production, decay);
        let created = ws.get_or_create(&name, |_| {
            let xs = ProductionClass::of(production).coupling();
            let br = self.kind.scoped(&format!("BRscal_{}", DecayClass::of(decay).br_suffix()));
            Ok(Function::new(
                format!("{production} x {decay} yield scale"),
                Expr::Product(vec![Expr::square(xs), Expr::var(&br)]),
            ))
        })?;
        if created {
            debug!(model = %self.kind, production, decay, energy, name = %name, "new yield scale");
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::domain::XG;
    use crate::error::ModelError;
    use crate::workspace::RealVar;

    /// SM branching ratios summing to exactly one.
    const BRS: [(&str, f64); 11] = [
        ("hbb", 0.53125),
        ("hww", 0.25),
        ("hgluglu", 0.0625),
        ("htt", 0.0625),
        ("hcc", 0.03125),
        ("hzz", 0.03125),
        ("hgg", 0.015625),
        ("hzg", 0.0078125),
        ("hmm", 0.00390625),
        ("hss", 0.00390625),
        ("htoptop", 0.0),
    ];

    /// Mass-independent reference values, no files involved.
    struct FixedSm {
        datadir: PathBuf,
    }

    impl FixedSm {
        fn new() -> Self {
            Self {
                datadir: PathBuf::from("/unused"),
            }
        }
    }

    impl SmBuilder for FixedSm {
        fn datadir(&self) -> &Path {
            &self.datadir
        }

        fn text_to_spline(&self, ws: &mut Workspace, name: &str, _path: &Path, _xvar: &str, _ycol: usize) -> Result<()> {
            ws.get_or_create(name, |_| Ok(Function::new("fixed", Expr::Const(2.79))))?;
            Ok(())
        }

        fn make_br(&self, ws: &mut Workspace, decay: &str) -> Result<()> {
            let value = BRS
                .iter()
                .find(|(d, _)| *d == decay)
                .map(|(_, v)| *v)
                .ok_or_else(|| ModelError::Table(decay.to_string()))?;
            if !ws.contains(&sm_br_name(decay)) {
                ws.declare_var(&sm_br_name(decay), RealVar::constant(value))?;
            }
            Ok(())
        }
    }

    fn built(kind: ModelKind, options: &[&str]) -> (HiggsCouplingModel, Workspace) {
        let mut model = HiggsCouplingModel::new(kind).with_mass(125.0);
        model.set_physics_options(options).unwrap();
        let mut ws = Workspace::default();
        model.do_parameters_of_interest(&mut ws, &FixedSm::new()).unwrap();
        (model, ws)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn declares_couplings_per_variant() {
        let (_, ws) = built(ModelKind::CvCf, &[]);
        assert_eq!(*ws.var(CV).unwrap(), RealVar::ranged(1.0, 0.0, 1.5));
        assert_eq!(*ws.var(CF).unwrap(), RealVar::ranged(1.0, -2.0, 2.0));
        assert!(ws.var(XG).is_none());

        let (_, ws) = built(ModelKind::CvCfXg, &[]);
        assert_eq!(*ws.var(CF).unwrap(), RealVar::ranged(1.0, -1.5, 1.5));
        assert_eq!(*ws.var(XG).unwrap(), RealVar::ranged(0.0, -4.0, 4.0));

        let (_, ws) = built(ModelKind::CfXg, &[]);
        assert_eq!(*ws.var(CV).unwrap(), RealVar::constant(1.0));
    }

    #[test]
    fn poi_set_without_floating_mass() {
        let expected: [(ModelKind, &[&str]); 3] = [
            (ModelKind::CvCf, &["CV", "CF"]),
            (ModelKind::CvCfXg, &["CV", "CF", "XG"]),
            (ModelKind::CfXg, &["CF", "XG"]),
        ];
        for (kind, poi) in expected {
            let (_, ws) = built(kind, &[]);
            assert_eq!(ws.set(POI_SET).unwrap(), poi, "{kind}");
            let mh = ws.var(MH).unwrap();
            assert!(mh.constant);
            assert_eq!(mh.value, 125.0);
        }
    }

    #[test]
    fn poi_set_with_floating_mass() {
        for kind in ModelKind::ALL {
            let (_, ws) = built(kind, &["higgsMassRange=120,130"]);
            let poi = ws.set(POI_SET).unwrap();
            assert_eq!(poi.last().map(String::as_str), Some(MH));
            assert_eq!(poi.len(), kind.free_params().len() + 1);
            let mh = ws.var(MH).unwrap();
            assert!(!mh.constant);
            assert_eq!((mh.min, mh.max), (120.0, 130.0));
        }
    }

    #[test]
    fn existing_mass_is_updated_not_redeclared() {
        let smh = FixedSm::new();
        let mut ws = Workspace::default();
        ws.declare_var(MH, RealVar::ranged(125.0, 100.0, 200.0)).unwrap();

        let model = HiggsCouplingModel::new(ModelKind::CvCf).with_mass(124.0);
        model.do_parameters_of_interest(&mut ws, &smh).unwrap();
        let mh = ws.var(MH).unwrap();
        assert!(mh.constant);
        assert_eq!(mh.value, 124.0);

        let mut floating = HiggsCouplingModel::new(ModelKind::CvCf);
        floating.set_physics_options(&["higgsMassRange=122,126"]).unwrap();
        floating.do_parameters_of_interest(&mut ws, &smh).unwrap();
        let mh = ws.var(MH).unwrap();
        assert!(!mh.constant);
        assert_eq!((mh.min, mh.max, mh.value), (122.0, 126.0, 124.0));
    }

    #[test]
    fn sm_point_recovers_unity() {
        for kind in ModelKind::ALL {
            let (_, ws) = built(kind, &[]);
            for suffix in ["Gscal_tot", "BRscal_hgg", "BRscal_hf", "BRscal_hv"] {
                assert_close(ws.eval(&kind.scoped(suffix)).unwrap(), 1.0);
            }
        }
    }

    #[test]
    fn setup_is_idempotent() {
        let smh = FixedSm::new();
        let (model, mut ws) = built(ModelKind::CvCfXg, &[]);
        let n = ws.len();
        model.setup(&mut ws, &smh).unwrap();
        assert_eq!(ws.len(), n);
    }

    #[test]
    fn all_variants_coexist_in_one_workspace() {
        let smh = FixedSm::new();
        let mut ws = Workspace::default();
        for model in HiggsCouplingModel::all() {
            model.do_parameters_of_interest(&mut ws, &smh).unwrap();
        }
        for kind in ModelKind::ALL {
            assert!(ws.function(&kind.scoped("Gscal_tot")).is_some());
        }
        // The last declaration fixed CV.
        assert!(ws.var(CV).unwrap().constant);
    }

    #[test]
    fn yield_scale_is_memoized() {
        let (model, mut ws) = built(ModelKind::CvCf, &[]);
        let first = model.get_higgs_signal_yield_scale(&mut ws, "ggH", "hgg", "13").unwrap();
        let n = ws.len();
        let second = model.get_higgs_signal_yield_scale(&mut ws, "ggH", "hgg", "13").unwrap();
        assert_eq!(first, second);
        assert_eq!(ws.len(), n);
        // Energy does not take part in the name.
        let other = model.get_higgs_signal_yield_scale(&mut ws, "ggH", "hgg", "8").unwrap();
        assert_eq!(other, first);
    }

    #[test]
    fn production_selects_the_coupling() {
        let (model, mut ws) = built(ModelKind::CvCf, &[]);
        ws.set_value(CF, 1.2).unwrap();
        ws.set_value(CV, 0.9).unwrap();
        let br = ws.eval("CvCf_BRscal_hgg").unwrap();

        for production in ["ggH", "ttH"] {
            let name = model.get_higgs_signal_yield_scale(&mut ws, production, "hgg", "13").unwrap();
            assert_close(ws.eval(&name).unwrap(), 1.2 * 1.2 * br);
        }
        for production in ["qqH", "VH", "WH", "ZH", "unknown"] {
            let name = model.get_higgs_signal_yield_scale(&mut ws, production, "hgg", "13").unwrap();
            assert_close(ws.eval(&name).unwrap(), 0.9 * 0.9 * br);
        }
    }

    #[test]
    fn fixed_vector_model_uses_unit_coupling() {
        let (model, mut ws) = built(ModelKind::CfXg, &[]);
        ws.set_value(CF, 0.8).unwrap();
        ws.set_value(XG, 0.5).unwrap();
        let name = model.get_higgs_signal_yield_scale(&mut ws, "VH", "hww", "13").unwrap();
        assert_close(ws.eval(&name).unwrap(), ws.eval("CfXg_BRscal_hv").unwrap());
        assert_close(
            ws.eval("CfXg_BRscal_hv").unwrap(),
            1.0 / ws.eval("CfXg_Gscal_tot").unwrap(),
        );
    }

    #[test]
    fn decay_selects_the_branching_ratio_scale() {
        let (model, mut ws) = built(ModelKind::CvCfXg, &[]);
        ws.set_value(CF, 1.1).unwrap();
        ws.set_value(CV, 0.95).unwrap();
        ws.set_value(XG, -0.3).unwrap();

        let cases = [
            ("hww", "hv"),
            ("hzz", "hv"),
            ("hbb", "hf"),
            ("htt", "hf"),
            ("hgg", "hgg"),
            ("hmm", "hgg"),
            ("hzg", "hgg"),
        ];
        for (decay, suffix) in cases {
            let name = model.get_higgs_signal_yield_scale(&mut ws, "qqH", decay, "13").unwrap();
            let br = ws.eval(&format!("CvCfXg_BRscal_{suffix}")).unwrap();
            assert_close(ws.eval(&name).unwrap(), 0.95 * 0.95 * br);
        }
    }

    #[test]
    fn yield_scale_before_setup_fails() {
        let model = HiggsCouplingModel::new(ModelKind::CvCf);
        let mut ws = Workspace::default();
        let err = model.get_higgs_signal_yield_scale(&mut ws, "ggH", "hgg", "13").unwrap_err();
        assert!(matches!(err, ModelError::UnknownName(_)));
    }
}
