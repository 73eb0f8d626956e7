#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("at least 2 diameter bins are required, found {0}")]
    TooFewBins(usize),
    #[error("diameter #{index} is not a finite positive value: {value}")]
    NonPositiveDiameter { index: usize, value: f64 },
    #[error("diameters are not strictly increasing at #{index}: {previous} >= {value}")]
    NonMonotonicDiameters {
        index: usize,
        previous: f64,
        value: f64,
    },
    #[error("bin #{index} has a non-positive width: [{bottom},{top}]")]
    NonPositiveWidth { index: usize, bottom: f64, top: f64 },
    #[error("bin #{index} has a non-finite log10 width: [{bottom},{top}]")]
    NonFiniteWidth { index: usize, bottom: f64, top: f64 },
    #[error("bin #{index} overlaps the next bin: {top} > {next_bottom}")]
    OverlappingBins {
        index: usize,
        top: f64,
        next_bottom: f64,
    },
    #[error("threshold diameter must be strictly positive, found {0}")]
    NonPositiveThreshold(f64),
    #[error("empty integration range: [{lower},{upper}]")]
    EmptyRange { lower: f64, upper: f64 },
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("negative number density at (time #{time}, bin #{bin}): {value}")]
    NegativeDensity { time: usize, bin: usize, value: f64 },
    #[error("infinite number density at (time #{time}, bin #{bin})")]
    NonFiniteDensity { time: usize, bin: usize },
    #[error("several thresholds share the label {0}")]
    DuplicateThreshold(String),
    #[error("no threshold diameter to integrate from")]
    NoThreshold,
}
pub type Result<T> = std::result::Result<T, InvalidInputError>;
