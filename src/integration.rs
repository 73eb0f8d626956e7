//! Number concentration above a cutoff diameter
//!
//! The number counts of the bins entirely above the cutoff are summed with the fraction,
//! in log10 space, of the bin straddling the cutoff.
//! Missing samples (`NaN`) are skipped by the sums.

use crate::{bins::BinBoundaries, InvalidInputError, Result};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Location of a cutoff diameter within the size bins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoff {
    /// index of the first bin with a lower limit strictly above the cutoff
    pub first_above: usize,
    /// the bin straddling the cutoff and the fraction of its log10 width above the cutoff
    pub straddling: Option<(usize, f64)>,
}
impl Cutoff {
    /// Locates the cutoff diameter `x` [nm]
    ///
    /// A bin with a lower limit equal to `x` is fully included and the bin below it fully excluded.
    pub fn locate(bins: &BinBoundaries, x: f64) -> Result<Self> {
        if !(x > 0f64) {
            return Err(InvalidInputError::NonPositiveThreshold(x));
        }
        let first_above = bins.first_above(x);
        let straddling = match first_above
            .checked_sub(1)
            .and_then(|j| bins.get(j).map(|limits| (j, limits)))
        {
            Some((j, (bottom, top))) if x < top => {
                let width = top.log10() - bottom.log10();
                if !width.is_finite() {
                    return Err(InvalidInputError::NonFiniteWidth {
                        index: j,
                        bottom,
                        top,
                    });
                }
                if !(width > 0f64) {
                    return Err(InvalidInputError::NonPositiveWidth {
                        index: j,
                        bottom,
                        top,
                    });
                }
                Some((j, ((top.log10() - x.log10()) / width).clamp(0f64, 1f64)))
            }
            _ => None,
        };
        if first_above == 0 {
            log::warn!(
                "cutoff {}nm is below the size range, starting at {:.3}nm",
                x,
                bins.lowest()
            );
        } else if first_above == bins.len() && straddling.is_none() {
            log::warn!(
                "cutoff {}nm is above the size range, ending at {:.3}nm",
                x,
                bins.highest()
            );
        }
        Ok(Self {
            first_above,
            straddling,
        })
    }
    /// Returns the (bin index,weight) pairs of the bins contributing to the integral
    pub fn weights(&self, n_bins: usize) -> Vec<(usize, f64)> {
        self.straddling
            .into_iter()
            .chain((self.first_above..n_bins).map(|i| (i, 1f64)))
            .collect()
    }
}

/// Weighted sums of the columns of `dn`, one per row
///
/// `NaN` entries are skipped; a row with only `NaN` among the weighted columns sums to `NaN`.
fn weighted_sum(dn: &DMatrix<f64>, weights: &[(usize, f64)]) -> Vec<f64> {
    (0..dn.nrows())
        .into_par_iter()
        .map(|t| {
            if weights.is_empty() {
                return 0f64;
            }
            let (sum, count) = weights
                .iter()
                .map(|&(i, w)| w * dn[(t, i)])
                .filter(|x| !x.is_nan())
                .fold((0f64, 0usize), |(s, n), x| (s + x, n + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum
            }
        })
        .collect()
}

fn check_columns(dn: &DMatrix<f64>, n_bins: usize) -> Result<()> {
    if dn.ncols() == n_bins {
        Ok(())
    } else {
        Err(InvalidInputError::ShapeMismatch {
            expected: (dn.nrows(), n_bins),
            found: dn.shape(),
        })
    }
}

/// Number counts summed over all the bins for each time step
pub fn total(dn: &DMatrix<f64>) -> Vec<f64> {
    let weights: Vec<_> = (0..dn.ncols()).map(|i| (i, 1f64)).collect();
    weighted_sum(dn, &weights)
}

/// Number concentration of particles larger than `x` [nm] for each time step
///
/// `dn` is the (time x bin) matrix of number counts per bin.
pub fn concentration_above(dn: &DMatrix<f64>, bins: &BinBoundaries, x: f64) -> Result<Vec<f64>> {
    check_columns(dn, bins.len())?;
    let cutoff = Cutoff::locate(bins, x)?;
    Ok(weighted_sum(dn, &cutoff.weights(bins.len())))
}

/// Number counts summed over the bins with a center diameter within `[lower,upper]` [nm]
pub fn concentration_within(
    dn: &DMatrix<f64>,
    diameters: &[f64],
    lower: f64,
    upper: f64,
) -> Result<Vec<f64>> {
    if !(lower > 0f64) {
        return Err(InvalidInputError::NonPositiveThreshold(lower));
    }
    if !(upper >= lower) {
        return Err(InvalidInputError::EmptyRange { lower, upper });
    }
    check_columns(dn, diameters.len())?;
    let weights: Vec<_> = diameters
        .iter()
        .enumerate()
        .filter(|&(_, &d)| lower <= d && d <= upper)
        .map(|(i, _)| (i, 1f64))
        .collect();
    Ok(weighted_sum(dn, &weights))
}

/// Name given to the concentration above `x` [nm], e.g. `N100` or `N2.5`
pub fn label(x: f64) -> String {
    let x = format!("{:.2}", x);
    format!("N{}", x.trim_end_matches('0').trim_end_matches('.'))
}

/// Time series of number concentration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    label: String,
    time: Vec<f64>,
    values: Vec<f64>,
}
impl Concentration {
    pub fn new<S: Into<String>>(label: S, time: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            time,
            values,
        }
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn time(&self) -> &[f64] {
        &self.time
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    /// Iterator over the (time,concentration) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
