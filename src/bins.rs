//! Size bins
//!
//! The bin boundaries are derived from the bin-center diameters as the midpoints, in log10
//! space, between adjacent centers. The first and last boundaries are extrapolated by the
//! half-gap of the nearest pair of centers.

use crate::{InvalidInputError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{iter, ops::Deref};

/// Bin-center diameters [nm]
///
/// The diameters are finite, strictly positive and strictly increasing, with at least 2 bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct DiameterAxis(Vec<f64>);
impl Deref for DiameterAxis {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DiameterAxis {
    /// Validates the bin-center diameters
    pub fn new(diameters: Vec<f64>) -> Result<Self> {
        if diameters.len() < 2 {
            return Err(InvalidInputError::TooFewBins(diameters.len()));
        }
        check_positive(&diameters)?;
        if let Some((index, (&previous, &value))) = diameters
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| b <= a)
        {
            return Err(InvalidInputError::NonMonotonicDiameters {
                index: index + 1,
                previous,
                value,
            });
        }
        Ok(Self(diameters))
    }
    /// Iterator over the log10 of the diameters
    pub fn log10(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|d| d.log10())
    }
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}
impl TryFrom<Vec<f64>> for DiameterAxis {
    type Error = InvalidInputError;

    fn try_from(diameters: Vec<f64>) -> Result<Self> {
        Self::new(diameters)
    }
}
impl TryFrom<&[f64]> for DiameterAxis {
    type Error = InvalidInputError;

    fn try_from(diameters: &[f64]) -> Result<Self> {
        Self::new(diameters.to_vec())
    }
}
impl From<DiameterAxis> for Vec<f64> {
    fn from(axis: DiameterAxis) -> Self {
        axis.0
    }
}

fn check_positive(values: &[f64]) -> Result<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, d)| !(d.is_finite() && **d > 0f64))
    {
        Some((index, &value)) => Err(InvalidInputError::NonPositiveDiameter { index, value }),
        None => Ok(()),
    }
}

#[derive(Deserialize)]
struct BinLimits {
    bottom: Vec<f64>,
    top: Vec<f64>,
}
impl TryFrom<BinLimits> for BinBoundaries {
    type Error = InvalidInputError;

    fn try_from(limits: BinLimits) -> Result<Self> {
        Self::new(limits.bottom, limits.top)
    }
}

/// Lower and upper diameter limits [nm] of the size bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BinLimits")]
pub struct BinBoundaries {
    bottom: Vec<f64>,
    top: Vec<f64>,
}
impl BinBoundaries {
    /// Builds the bins from arbitrary lower and upper limits
    ///
    /// The bins need not be contiguous but the lower limits must be strictly increasing,
    /// every bin must have a positive width and a bin must not extend past the next lower limit.
    pub fn new(bottom: Vec<f64>, top: Vec<f64>) -> Result<Self> {
        if bottom.len() != top.len() {
            return Err(InvalidInputError::ShapeMismatch {
                expected: (bottom.len(), 2),
                found: (top.len(), 2),
            });
        }
        if bottom.len() < 2 {
            return Err(InvalidInputError::TooFewBins(bottom.len()));
        }
        check_positive(&bottom)?;
        check_positive(&top)?;
        if let Some((index, (&b, &t))) = bottom
            .iter()
            .zip(top.iter())
            .enumerate()
            .find(|(_, (b, t))| t <= b)
        {
            return Err(InvalidInputError::NonPositiveWidth {
                index,
                bottom: b,
                top: t,
            });
        }
        if let Some((index, (&previous, &value))) = bottom
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| b <= a)
        {
            return Err(InvalidInputError::NonMonotonicDiameters {
                index: index + 1,
                previous,
                value,
            });
        }
        if let Some((index, (&t, &next_bottom))) = top
            .iter()
            .zip(bottom.iter().skip(1))
            .enumerate()
            .find(|(_, (t, b))| t > b)
        {
            return Err(InvalidInputError::OverlappingBins {
                index,
                top: t,
                next_bottom,
            });
        }
        Ok(Self { bottom, top })
    }
    /// Builds contiguous bins from the N+1 bin edges
    pub fn from_edges(edges: &[f64]) -> Result<Self> {
        if edges.len() < 3 {
            return Err(InvalidInputError::TooFewBins(edges.len().saturating_sub(1)));
        }
        let (bottom, top): (Vec<f64>, Vec<f64>) =
            edges.iter().tuple_windows().map(|(&b, &t)| (b, t)).unzip();
        Self::new(bottom, top)
    }
    /// Derives contiguous bins from the bin-center diameters
    pub fn from_centers(diameters: &DiameterAxis) -> Self {
        let log_d: Vec<f64> = diameters.log10().collect();
        let mid_points: Vec<f64> = log_d
            .iter()
            .tuple_windows()
            .map(|(a, b)| 0.5 * (a + b))
            .collect();
        let n = log_d.len();
        let lower = log_d[0] - (mid_points[0] - log_d[0]);
        let upper = log_d[n - 1] + (log_d[n - 1] - mid_points[n - 2]);
        let edges: Vec<f64> = iter::once(lower)
            .chain(mid_points)
            .chain(iter::once(upper))
            .map(|x| 10f64.powf(x))
            .collect();
        log::debug!(
            "{} bins from {:.3}nm to {:.3}nm",
            n,
            edges[0],
            edges[edges.len() - 1]
        );
        Self {
            bottom: edges[..n].to_vec(),
            top: edges[1..].to_vec(),
        }
    }
    /// Number of bins
    pub fn len(&self) -> usize {
        self.bottom.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bottom.is_empty()
    }
    /// Lower limits
    pub fn bottom(&self) -> &[f64] {
        &self.bottom
    }
    /// Upper limits
    pub fn top(&self) -> &[f64] {
        &self.top
    }
    /// Iterator over the (bottom,top) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bottom.iter().copied().zip(self.top.iter().copied())
    }
    /// Returns the (bottom,top) pair of the bin #`index`
    pub fn get(&self, index: usize) -> Option<(f64, f64)> {
        self.bottom
            .get(index)
            .copied()
            .zip(self.top.get(index).copied())
    }
    /// Returns the N+1 bin edges if the bins are contiguous
    pub fn edges(&self) -> Option<Vec<f64>> {
        if self.is_contiguous() {
            Some(
                self.bottom
                    .iter()
                    .copied()
                    .chain(self.top.last().copied())
                    .collect(),
            )
        } else {
            None
        }
    }
    pub fn is_contiguous(&self) -> bool {
        self.top
            .iter()
            .zip(self.bottom.iter().skip(1))
            .all(|(t, b)| t == b)
    }
    /// Lower limit of the first bin
    pub fn lowest(&self) -> f64 {
        self.bottom[0]
    }
    /// Upper limit of the last bin
    pub fn highest(&self) -> f64 {
        self.top[self.top.len() - 1]
    }
    /// Bins width in log10 space: log10(top) - log10(bottom)
    pub fn dlog10d(&self) -> Result<Vec<f64>> {
        self.iter()
            .enumerate()
            .map(|(index, (bottom, top))| {
                let width = top.log10() - bottom.log10();
                if !width.is_finite() {
                    Err(InvalidInputError::NonFiniteWidth { index, bottom, top })
                } else if width > 0f64 {
                    Ok(width)
                } else {
                    Err(InvalidInputError::NonPositiveWidth { index, bottom, top })
                }
            })
            .collect()
    }
    /// Index of the first bin with a lower limit strictly larger than `x`
    ///
    /// Returns the number of bins if there is none.
    pub fn first_above(&self, x: f64) -> usize {
        self.bottom.partition_point(|&b| b <= x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling() -> DiameterAxis {
        DiameterAxis::new(vec![10., 20., 40., 80., 160.]).unwrap()
    }

    #[test]
    fn log_midpoints() {
        let bins = BinBoundaries::from_centers(&doubling());
        let sqrt2 = 2f64.sqrt();
        let expected = [10. / sqrt2, 20. / sqrt2, 40. / sqrt2, 80. / sqrt2, 160. / sqrt2];
        for (b, e) in bins.bottom().iter().zip(expected) {
            assert!((b - e).abs() < 1e-9, "{b} != {e}");
        }
        assert!((bins.highest() - 160. * sqrt2).abs() < 1e-9);
    }

    #[test]
    fn contiguous_and_increasing() {
        let axis = DiameterAxis::new(vec![3., 4.5, 11., 12., 60., 61., 500.]).unwrap();
        let bins = BinBoundaries::from_centers(&axis);
        assert!(bins.is_contiguous());
        let edges = bins.edges().unwrap();
        assert_eq!(edges.len(), axis.len() + 1);
        assert!(edges.iter().tuple_windows().all(|(a, b)| b > a));
        for ((bottom, top), d) in bins.iter().zip(axis.iter()) {
            assert!(bottom < *d && *d < top);
        }
        assert!(bins.dlog10d().unwrap().iter().all(|w| *w > 0f64));
    }

    #[test]
    fn uniform_log_width() {
        let bins = BinBoundaries::from_centers(&doubling());
        for w in bins.dlog10d().unwrap() {
            assert!((w - 2f64.log10()).abs() < 1e-12);
        }
    }

    #[test]
    fn two_bins() {
        let axis = DiameterAxis::new(vec![10., 100.]).unwrap();
        let edges = BinBoundaries::from_centers(&axis).edges().unwrap();
        let expected = [10f64.powf(0.5), 10f64.powf(1.5), 10f64.powf(2.5)];
        for (e, x) in edges.iter().zip(expected) {
            assert!((e - x).abs() < 1e-9);
        }
    }

    #[test]
    fn axis_errors() {
        assert_eq!(
            DiameterAxis::new(vec![10.]),
            Err(InvalidInputError::TooFewBins(1))
        );
        assert_eq!(
            DiameterAxis::new(vec![10., 0., 30.]),
            Err(InvalidInputError::NonPositiveDiameter {
                index: 1,
                value: 0.
            })
        );
        assert!(matches!(
            DiameterAxis::new(vec![10., f64::NAN]),
            Err(InvalidInputError::NonPositiveDiameter { index: 1, .. })
        ));
        assert_eq!(
            DiameterAxis::new(vec![10., 20., 20.]),
            Err(InvalidInputError::NonMonotonicDiameters {
                index: 2,
                previous: 20.,
                value: 20.
            })
        );
    }

    #[test]
    fn pairs_errors() {
        assert_eq!(
            BinBoundaries::new(vec![1., 2.], vec![2., 2.]),
            Err(InvalidInputError::NonPositiveWidth {
                index: 1,
                bottom: 2.,
                top: 2.
            })
        );
        assert!(matches!(
            BinBoundaries::new(vec![1., 2., 3.], vec![2., 3.]),
            Err(InvalidInputError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            BinBoundaries::new(vec![2., 1.], vec![3., 2.5]),
            Err(InvalidInputError::NonMonotonicDiameters { index: 1, .. })
        ));
        assert_eq!(
            BinBoundaries::from_edges(&[1., 2.]),
            Err(InvalidInputError::TooFewBins(1))
        );
        assert_eq!(
            BinBoundaries::new(vec![1., 2.], vec![10., 3.]),
            Err(InvalidInputError::OverlappingBins {
                index: 0,
                top: 10.,
                next_bottom: 2.
            })
        );
    }

    #[test]
    fn extreme_axis() {
        let axis = DiameterAxis::new(vec![1e-200, 1e200]).unwrap();
        let bins = BinBoundaries::from_centers(&axis);
        assert!(matches!(
            bins.dlog10d(),
            Err(InvalidInputError::NonFiniteWidth { index: 0, .. })
        ));
    }

    #[test]
    fn deserialize_validates() {
        let bins: BinBoundaries =
            serde_json::from_str(r#"{"bottom":[1.0,2.0],"top":[2.0,4.0]}"#).unwrap();
        assert_eq!(bins, BinBoundaries::from_edges(&[1., 2., 4.]).unwrap());
        assert!(
            serde_json::from_str::<BinBoundaries>(r#"{"bottom":[1.0,2.0],"top":[10.0,3.0]}"#)
                .is_err()
        );
    }

    #[test]
    fn non_contiguous_pairs() {
        let bins = BinBoundaries::new(vec![1., 3.], vec![2., 4.]).unwrap();
        assert!(!bins.is_contiguous());
        assert_eq!(bins.edges(), None);
        assert_eq!(bins.get(1), Some((3., 4.)));
        assert_eq!(bins.get(2), None);
    }

    #[test]
    fn first_above_tie_break() {
        let bins = BinBoundaries::from_edges(&[1., 2., 4., 8.]).unwrap();
        assert_eq!(bins.first_above(0.5), 0);
        assert_eq!(bins.first_above(1.), 1);
        assert_eq!(bins.first_above(3.), 2);
        assert_eq!(bins.first_above(4.), 3);
        assert_eq!(bins.first_above(10.), 3);
    }
}
