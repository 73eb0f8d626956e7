//! Particle number size distribution
//!
//! Time series of number density dN/dlog10(Dp) sampled at the bin-center diameters and
//! stored as a (time x diameter) matrix. `NaN` marks a missing sample.

use crate::{
    bins::{BinBoundaries, DiameterAxis},
    integration::{self, Concentration},
    InvalidInputError, Result,
};
use nalgebra::DMatrix;

/// Converts the number densities dN/dlog10(Dp) into number counts per bin
///
/// Each column of `dndlogd` is scaled by the log10 width of the corresponding bin.
pub fn unlog(dndlogd: &DMatrix<f64>, dlog10d: &[f64]) -> Result<DMatrix<f64>> {
    if dndlogd.ncols() != dlog10d.len() {
        return Err(InvalidInputError::ShapeMismatch {
            expected: (dndlogd.nrows(), dlog10d.len()),
            found: dndlogd.shape(),
        });
    }
    Ok(DMatrix::from_fn(
        dndlogd.nrows(),
        dndlogd.ncols(),
        |t, i| dndlogd[(t, i)] * dlog10d[i],
    ))
}

/// Time series of particle number size distribution
#[derive(Debug, Clone)]
pub struct SizeDistribution {
    // sampling time
    time: Vec<f64>,
    // bin-center diameters [nm]
    diameter: DiameterAxis,
    // dN/dlog10(Dp), one row per time step
    dndlogd: DMatrix<f64>,
}
impl SizeDistribution {
    /// Creates a new size distribution
    ///
    /// `dndlogd` must have as many rows as time steps and as many columns as diameters.
    /// Negative or infinite densities are rejected.
    pub fn new(time: Vec<f64>, diameter: DiameterAxis, dndlogd: DMatrix<f64>) -> Result<Self> {
        let expected = (time.len(), diameter.len());
        if dndlogd.shape() != expected {
            return Err(InvalidInputError::ShapeMismatch {
                expected,
                found: dndlogd.shape(),
            });
        }
        for t in 0..dndlogd.nrows() {
            for bin in 0..dndlogd.ncols() {
                let value = dndlogd[(t, bin)];
                if value.is_infinite() {
                    return Err(InvalidInputError::NonFiniteDensity { time: t, bin });
                }
                if value < 0f64 {
                    return Err(InvalidInputError::NegativeDensity {
                        time: t,
                        bin,
                        value,
                    });
                }
            }
        }
        Ok(Self {
            time,
            diameter,
            dndlogd,
        })
    }
    /// Creates a new size distribution from the densities given row by row
    pub fn from_row_slice(time: Vec<f64>, diameter: DiameterAxis, data: &[f64]) -> Result<Self> {
        let (n_time, n_bin) = (time.len(), diameter.len());
        if data.len() != n_time * n_bin {
            return Err(InvalidInputError::ShapeMismatch {
                expected: (n_time * n_bin, 1),
                found: (data.len(), 1),
            });
        }
        let dndlogd = DMatrix::from_row_slice(n_time, n_bin, data);
        Self::new(time, diameter, dndlogd)
    }
    pub fn time(&self) -> &[f64] {
        &self.time
    }
    pub fn diameter(&self) -> &DiameterAxis {
        &self.diameter
    }
    pub fn dndlogd(&self) -> &DMatrix<f64> {
        &self.dndlogd
    }
    /// Number of time steps
    pub fn n_time(&self) -> usize {
        self.time.len()
    }
    /// Number of size bins
    pub fn n_bin(&self) -> usize {
        self.diameter.len()
    }
    /// Bin boundaries derived from the bin-center diameters
    pub fn bins(&self) -> BinBoundaries {
        BinBoundaries::from_centers(&self.diameter)
    }
    /// Converts the densities into number counts per bin
    pub fn number_counts(&self) -> Result<NumberCounts> {
        let bins = self.bins();
        let dlog10d = bins.dlog10d()?;
        let dn = unlog(&self.dndlogd, &dlog10d)?;
        Ok(NumberCounts {
            time: self.time.clone(),
            diameter: self.diameter.clone(),
            bins,
            dlog10d,
            dn,
        })
    }
}

/// Time series of number counts per size bin
#[derive(Debug, Clone)]
pub struct NumberCounts {
    time: Vec<f64>,
    diameter: DiameterAxis,
    bins: BinBoundaries,
    dlog10d: Vec<f64>,
    // dN, one row per time step
    dn: DMatrix<f64>,
}
impl NumberCounts {
    pub fn time(&self) -> &[f64] {
        &self.time
    }
    pub fn diameter(&self) -> &DiameterAxis {
        &self.diameter
    }
    pub fn bins(&self) -> &BinBoundaries {
        &self.bins
    }
    /// Bins width in log10 space
    pub fn dlog10d(&self) -> &[f64] {
        &self.dlog10d
    }
    pub fn dn(&self) -> &DMatrix<f64> {
        &self.dn
    }
    pub fn into_inner(self) -> DMatrix<f64> {
        self.dn
    }
    /// Number counts over all the bins for each time step
    pub fn total(&self) -> Vec<f64> {
        integration::total(&self.dn)
    }
    /// Number concentration of particles larger than `x` [nm]
    pub fn above(&self, x: f64) -> Result<Concentration> {
        let values = integration::concentration_above(&self.dn, &self.bins, x)?;
        Ok(Concentration::new(
            integration::label(x),
            self.time.clone(),
            values,
        ))
    }
    /// Number counts of the bins with a center diameter within `[lower,upper]` [nm]
    pub fn within(&self, lower: f64, upper: f64) -> Result<Concentration> {
        let values = integration::concentration_within(&self.dn, &self.diameter, lower, upper)?;
        Ok(Concentration::new(
            integration::label(lower),
            self.time.clone(),
            values,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> DiameterAxis {
        DiameterAxis::new(vec![10., 20., 40.]).unwrap()
    }

    #[test]
    fn unlog_scales_columns() {
        let dndlogd = DMatrix::from_row_slice(2, 2, &[1., 2., 3., 4.]);
        let dn = unlog(&dndlogd, &[0.5, 0.25]).unwrap();
        assert_eq!(dn, DMatrix::from_row_slice(2, 2, &[0.5, 0.5, 1.5, 1.]));
        assert!(matches!(
            unlog(&dndlogd, &[0.5]),
            Err(InvalidInputError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn number_counts() {
        let pnsd =
            SizeDistribution::from_row_slice(vec![0., 1.], axis(), &[1., 2., 3., 0., f64::NAN, 6.])
                .unwrap();
        let counts = pnsd.number_counts().unwrap();
        let w = 2f64.log10();
        assert_eq!(counts.dn().shape(), (2, 3));
        assert!((counts.dn()[(0, 2)] - 3. * w).abs() < 1e-12);
        assert!(counts.dn()[(1, 1)].is_nan());
        let total = counts.total();
        assert!((total[0] - 6. * w).abs() < 1e-12);
        assert!((total[1] - 6. * w).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch() {
        assert_eq!(
            SizeDistribution::new(vec![0.], axis(), DMatrix::zeros(2, 3)).unwrap_err(),
            InvalidInputError::ShapeMismatch {
                expected: (1, 3),
                found: (2, 3)
            }
        );
        assert!(SizeDistribution::from_row_slice(vec![0.], axis(), &[1., 2.]).is_err());
    }

    #[test]
    fn invalid_densities() {
        assert_eq!(
            SizeDistribution::from_row_slice(vec![0.], axis(), &[1., -2., 3.]).unwrap_err(),
            InvalidInputError::NegativeDensity {
                time: 0,
                bin: 1,
                value: -2.
            }
        );
        assert_eq!(
            SizeDistribution::from_row_slice(vec![0.], axis(), &[1., 2., f64::INFINITY])
                .unwrap_err(),
            InvalidInputError::NonFiniteDensity { time: 0, bin: 2 }
        );
    }

    #[test]
    fn extreme_axis() {
        let axis = DiameterAxis::new(vec![1e-200, 1e200]).unwrap();
        let pnsd = SizeDistribution::from_row_slice(vec![0.], axis, &[1., 1.]).unwrap();
        assert!(matches!(
            pnsd.number_counts(),
            Err(InvalidInputError::NonFiniteWidth { .. })
        ));
    }

    #[test]
    fn labelled_concentrations() {
        let pnsd = SizeDistribution::from_row_slice(vec![0.], axis(), &[1., 2., 3.]).unwrap();
        let counts = pnsd.number_counts().unwrap();
        assert_eq!(counts.above(25.).unwrap().label(), "N25");
        let within = counts.within(20., 1000.).unwrap();
        assert_eq!(within.label(), "N20");
        assert!((within.values()[0] - 5. * 2f64.log10()).abs() < 1e-12);
    }
}
