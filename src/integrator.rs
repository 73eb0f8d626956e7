use crate::{
    distribution::{NumberCounts, SizeDistribution},
    integration::{self, Concentration},
    InvalidInputError, Result,
};
use itertools::Itertools;
use std::time::Instant;

/// Default cutoff diameter [nm]
pub const THRESHOLD: f64 = 100.;
/// Default upper diameter [nm] of the bin-center window
pub const UPPER_DIAMETER: f64 = 1000.;

/// Integration method
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Bins above the cutoff plus the fraction of the bin straddling the cutoff
    Fractional,
    /// Bins with a center diameter between the cutoff and `upper` [nm]
    BinCenters { upper: f64 },
}

/// Number concentrations integration pass
///
/// ```
/// use pnsd::{DiameterAxis, Integrator, SizeDistribution};
///
/// # fn main() -> pnsd::Result<()> {
/// let diameter = DiameterAxis::new(vec![10., 20., 40., 80., 160.])?;
/// let pnsd =
///     SizeDistribution::from_row_slice(vec![0.], diameter, &[100., 80., 50., 20., 5.])?;
/// let integration = Integrator::default()
///     .thresholds([50., 100.])
///     .integrate(&pnsd)?;
/// let n100 = integration.get("N100").unwrap();
/// assert!(n100.values()[0] > 0.);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Integrator {
    thresholds: Vec<f64>,
    method: Method,
}
impl Default for Integrator {
    fn default() -> Self {
        Self {
            thresholds: vec![THRESHOLD],
            method: Method::Fractional,
        }
    }
}
impl Integrator {
    pub fn threshold(self, x: f64) -> Self {
        Self {
            thresholds: vec![x],
            ..self
        }
    }
    pub fn thresholds<I: IntoIterator<Item = f64>>(self, thresholds: I) -> Self {
        Self {
            thresholds: thresholds.into_iter().collect(),
            ..self
        }
    }
    pub fn fractional(self) -> Self {
        Self {
            method: Method::Fractional,
            ..self
        }
    }
    pub fn bin_centers(self, upper: f64) -> Self {
        Self {
            method: Method::BinCenters { upper },
            ..self
        }
    }
    pub fn method(&self) -> Method {
        self.method
    }
    /// Converts the size distribution into number counts and integrates them above each threshold
    ///
    /// Thresholds sharing the same label, i.e. equal once rounded to 2 decimals, are rejected.
    pub fn integrate(&self, pnsd: &SizeDistribution) -> Result<Integration> {
        if self.thresholds.is_empty() {
            return Err(InvalidInputError::NoThreshold);
        }
        if let Some(label) = self
            .thresholds
            .iter()
            .map(|&x| integration::label(x))
            .duplicates()
            .next()
        {
            return Err(InvalidInputError::DuplicateThreshold(label));
        }
        log::info!(
            "Integrating {} time steps x {} bins above {:?}nm ({:?})...",
            pnsd.n_time(),
            pnsd.n_bin(),
            self.thresholds,
            self.method
        );
        let now = Instant::now();
        let counts = pnsd.number_counts()?;
        let concentrations = self
            .thresholds
            .iter()
            .map(|&x| match self.method {
                Method::Fractional => counts.above(x),
                Method::BinCenters { upper } => counts.within(x, upper),
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("... integrated in {:}ms", now.elapsed().as_millis());
        Ok(Integration {
            counts,
            concentrations,
        })
    }
}

/// Number counts and number concentrations of an integration pass
#[derive(Debug, Clone)]
pub struct Integration {
    pub counts: NumberCounts,
    pub concentrations: Vec<Concentration>,
}
impl Integration {
    /// Returns the concentration with the given label, e.g. `N100`
    pub fn get(&self, label: &str) -> Option<&Concentration> {
        self.concentrations.iter().find(|c| c.label() == label)
    }
}
