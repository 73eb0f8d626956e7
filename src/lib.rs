//! # PNSD
//!
//! Integrated particle number concentrations above a cutoff diameter from particle number
//! size distributions given as dN/dlog10(Dp) time series.
//!
//! The bin boundaries are derived from the bin-center diameters ([BinBoundaries]), the number
//! densities are converted into number counts per bin ([SizeDistribution::number_counts]) and
//! the number counts are summed above the cutoff, including the fraction of the bin straddling
//! the cutoff ([NumberCounts::above]).
//!
//! ```
//! use pnsd::{DiameterAxis, SizeDistribution};
//!
//! # fn main() -> pnsd::Result<()> {
//! let diameter = DiameterAxis::new(vec![10., 20., 40., 80., 160.])?;
//! let pnsd = SizeDistribution::from_row_slice(vec![0.], diameter, &[100., 80., 50., 20., 5.])?;
//! let counts = pnsd.number_counts()?;
//! let n100 = counts.above(100.)?;
//! assert!(n100.values()[0] > 0. && n100.values()[0] < counts.total()[0]);
//! # Ok(())
//! # }
//! ```

pub mod bins;
pub mod distribution;
mod error;
pub mod integration;
mod integrator;

pub use bins::{BinBoundaries, DiameterAxis};
pub use distribution::{NumberCounts, SizeDistribution};
pub use error::{InvalidInputError, Result};
pub use integration::{Concentration, Cutoff};
pub use integrator::{Integration, Integrator, Method, THRESHOLD, UPPER_DIAMETER};
