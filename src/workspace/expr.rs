//! Typed expression nodes.
//!
//! Derived quantities are small trees over named workspace entries. Names are
//! resolved at evaluation time through the owning [`Workspace`]; the workspace
//! guarantees every referenced name was declared before the node using it.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::math::{CubicSpline, DiphotonCouplings, diphoton_scale};
use crate::workspace::Workspace;

/// Opaque special functions, evaluated from positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalFn {
    /// LO diphoton scaling, arguments `(mH, ct, cW, mb, cb)`.
    ScaleHGamGamLoSm,
    /// LO diphoton scaling plus an extra amplitude, arguments `(mH, ct, cW, mb, cb, X)`.
    ScaleHGamGamLoSmPlusX,
}

impl ExternalFn {
    /// Number of positional arguments.
    pub fn arity(self) -> usize {
        match self {
            ExternalFn::ScaleHGamGamLoSm => 5,
            ExternalFn::ScaleHGamGamLoSmPlusX => 6,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExternalFn::ScaleHGamGamLoSm => "ScaleHGamGamLOSM",
            ExternalFn::ScaleHGamGamLoSmPlusX => "ScaleHGamGamLOSMPlusX",
        }
    }

    fn eval(self, args: &[f64]) -> f64 {
        let (m_h, ct, cw, m_b, cb) = (args[0], args[1], args[2], args[3], args[4]);
        let x = match self {
            ExternalFn::ScaleHGamGamLoSm => 0.0,
            ExternalFn::ScaleHGamGamLoSmPlusX => args[5],
        };
        diphoton_scale(m_h, m_b, DiphotonCouplings { ct, cb, cw, x })
    }
}

/// A derived-quantity expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(f64),
    /// Reference to a named variable or function.
    Ref(String),
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Quotient(Box<Expr>, Box<Expr>),
    /// Interpolated function of the named variable.
    Spline { x: String, spline: CubicSpline },
    /// Special function of named positional arguments.
    External { func: ExternalFn, args: Vec<String> },
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Ref(name.to_string())
    }

    /// `name * name`
    pub fn square(name: &str) -> Self {
        Expr::Product(vec![Expr::var(name), Expr::var(name)])
    }

    /// Sum of named references.
    pub fn sum_of<S: AsRef<str>>(names: &[S]) -> Self {
        Expr::Sum(names.iter().map(|n| Expr::var(n.as_ref())).collect())
    }

    pub fn quotient(num: Expr, den: Expr) -> Self {
        Expr::Quotient(Box::new(num), Box::new(den))
    }

    /// Names this expression reads, in order of first appearance.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        fn push<'a>(out: &mut Vec<&'a str>, name: &'a str) {
            if !out.contains(&name) {
                out.push(name);
            }
        }

        match self {
            Expr::Const(_) => {}
            Expr::Ref(name) => push(out, name),
            Expr::Spline { x, .. } => push(out, x),
            Expr::External { args, .. } => {
                for a in args {
                    push(out, a);
                }
            }
            Expr::Sum(terms) | Expr::Product(terms) => {
                for t in terms {
                    t.collect_refs(out);
                }
            }
            Expr::Quotient(num, den) => {
                num.collect_refs(out);
                den.collect_refs(out);
            }
        }
    }

    /// Structural checks independent of the workspace.
    pub fn validate(&self) -> Result<()> {
        match self {
            Expr::External { func, args } if args.len() != func.arity() => Err(ModelError::Expression(format!(
                "{} takes {} arguments, got {}",
                func.display_name(),
                func.arity(),
                args.len()
            ))),
            Expr::Spline { spline, .. } => spline.validate(),
            Expr::Sum(terms) | Expr::Product(terms) => terms.iter().try_for_each(Expr::validate),
            Expr::Quotient(num, den) => {
                num.validate()?;
                den.validate()
            }
            _ => Ok(()),
        }
    }

    /// Evaluate against the current workspace values.
    pub fn eval(&self, ws: &Workspace) -> Result<f64> {
        match self {
            Expr::Const(v) => Ok(*v),
            Expr::Ref(name) => ws.eval(name),
            Expr::Sum(terms) => terms.iter().try_fold(0.0, |acc, t| Ok(acc + t.eval(ws)?)),
            Expr::Product(terms) => terms.iter().try_fold(1.0, |acc, t| Ok(acc * t.eval(ws)?)),
            Expr::Quotient(num, den) => Ok(num.eval(ws)? / den.eval(ws)?),
            Expr::Spline { x, spline } => Ok(spline.eval(ws.eval(x)?)),
            Expr::External { func, args } => {
                let values = args.iter().map(|a| ws.eval(a)).collect::<Result<Vec<_>>>()?;
                Ok(func.eval(&values))
            }
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, terms: &[Expr], sep: &str) -> std::fmt::Result {
            write!(f, "(")?;
            for (i, t) in terms.iter().enumerate() {
                if i > 0 {
                    write!(f, "{sep}")?;
                }
                write!(f, "{t}")?;
            }
            write!(f, ")")
        }

        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Ref(name) => write!(f, "{name}"),
            Expr::Sum(terms) => join(f, terms, " + "),
            Expr::Product(terms) => join(f, terms, " * "),
            Expr::Quotient(num, den) => write!(f, "{num} / {den}"),
            Expr::Spline { x, spline } => write!(f, "spline({x}; {} nodes)", spline.x().len()),
            Expr::External { func, args } => write!(f, "{}({})", func.display_name(), args.join(", ")),
        }
    }
}
