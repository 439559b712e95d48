//! Physics options (`--PO`-style `key=value` directives).

use tracing::info;

use crate::error::{ModelError, Result};

const MASS_RANGE_PREFIX: &str = "higgsMassRange=";

/// Validated floating-mass range, `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassRange {
    pub lo: f64,
    pub hi: f64,
}

impl MassRange {
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if !(lo < hi) {
            return Err(ModelError::PhysicsOption(format!(
                "Extrema for Higgs mass range defined with inverted order ({lo} >= {hi}). \
                 Second must be larger than the first."
            )));
        }
        Ok(Self { lo, hi })
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }
}

impl std::str::FromStr for MassRange {
    type Err = ModelError;

    /// Parse `"<lo>,<hi>"`.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split(',').collect();
        if tokens.len() != 2 {
            return Err(ModelError::PhysicsOption(format!(
                "Higgs mass range definition requires two extrema, got '{s}'."
            )));
        }
        let parse = |tok: &str| {
            tok.trim()
                .parse::<f64>()
                .map_err(|_| ModelError::PhysicsOption(format!("Higgs mass range extremum '{tok}' is not a number.")))
        };
        MassRange::new(parse(tokens[0])?, parse(tokens[1])?)
    }
}

/// Options understood by the coupling models.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsOptions {
    /// `Some` when the Higgs mass floats.
    pub mass_range: Option<MassRange>,
}

impl PhysicsOptions {
    /// Parse an ordered list of option strings.
    ///
    /// Only `higgsMassRange=<lo>,<hi>` is recognized; other options belong to
    /// other parts of the framework and are skipped. A later occurrence wins.
    pub fn parse<S: AsRef<str>>(options: &[S]) -> Result<Self> {
        let mut out = PhysicsOptions::default();
        for po in options {
            if let Some(value) = po.as_ref().strip_prefix(MASS_RANGE_PREFIX) {
                let range: MassRange = value.parse()?;
                info!(lo = range.lo, hi = range.hi, "Higgs mass range");
                out.mass_range = Some(range);
            }
        }
        Ok(out)
    }

    pub fn float_mass(&self) -> bool {
        self.mass_range.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range_enables_floating() {
        let opts = PhysicsOptions::parse(&["higgsMassRange=120,130"]).unwrap();
        assert!(opts.float_mass());
        assert_eq!(opts.mass_range, Some(MassRange { lo: 120.0, hi: 130.0 }));
    }

    #[test]
    fn no_options_means_fixed_mass() {
        let opts = PhysicsOptions::parse::<&str>(&[]).unwrap();
        assert!(!opts.float_mass());
    }

    #[test]
    fn inverted_range_is_fatal() {
        let err = PhysicsOptions::parse(&["higgsMassRange=130,120"]).unwrap_err();
        assert!(matches!(err, ModelError::PhysicsOption(_)));
        assert!(PhysicsOptions::parse(&["higgsMassRange=125,125"]).is_err());
    }

    #[test]
    fn wrong_token_count_is_fatal() {
        assert!(PhysicsOptions::parse(&["higgsMassRange=120,130,140"]).is_err());
        assert!(PhysicsOptions::parse(&["higgsMassRange=120"]).is_err());
    }

    #[test]
    fn non_numeric_extremum_is_fatal() {
        assert!(PhysicsOptions::parse(&["higgsMassRange=abc,130"]).is_err());
    }

    #[test]
    fn unrelated_options_are_ignored() {
        let opts = PhysicsOptions::parse(&["verbose", "someOtherKey=1,2,3"]).unwrap();
        assert!(!opts.float_mass());
    }

    #[test]
    fn later_range_wins() {
        let opts = PhysicsOptions::parse(&["higgsMassRange=110,140", "higgsMassRange=122,128"]).unwrap();
        assert_eq!(opts.mass_range.unwrap().midpoint(), 125.0);
    }
}
