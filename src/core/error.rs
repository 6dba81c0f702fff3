use thiserror::Error;

use crate::quantity::proportions::Efficiency;

/// Invalid or inconsistent scenario parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("`{name}` must be within `(0, 1]`, got {value:?}")]
    Efficiency { name: &'static str, value: Efficiency },

    #[error("`{name}` must be a finite non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("`{name}` must be a finite positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("the discount rate must be greater than -100%, got {0}")]
    DiscountRate(f64),

    #[error("the evaluation horizon must be at least one year")]
    Horizon,

    #[error("electricity tax bracket limits must be increasing: {lower} ≥ {upper}")]
    BracketLimits { lower: f64, upper: f64 },

    #[error("the wind power curve {0}")]
    PowerCurve(&'static str),

    /// A ratio was requested with a zero denominator, for example zero total electrical demand.
    #[error("{0} is undefined: its denominator is zero")]
    ZeroDenominator(&'static str),
}

/// The hourly inputs do not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataShapeError {
    #[error("the profile must contain exactly {expected} hourly records, got {actual}")]
    ProfileLength { expected: usize, actual: usize },

    #[error("the wind power series has {actual} hours, while the load profile has {expected}")]
    WindSeriesLength { expected: usize, actual: usize },

    #[error("record #{index}: {what} must be a finite non-negative number")]
    InvalidLoad { index: usize, what: &'static str },
}

/// Numerical failure of a single economic metric.
///
/// These never abort the evaluation: the metric is reported as undefined instead.
#[derive(Clone, Debug, Error, PartialEq, serde::Serialize)]
pub enum NumericalError {
    #[error("the annual saving is not positive")]
    NonPositiveSaving,

    #[error("the net present value does not change sign between {lower:.0}% and {upper:.0}%")]
    NoSignChange { lower: f64, upper: f64 },

    #[error("the root finder did not converge after {0} iterations")]
    NotConverged(usize),
}

/// Errors that abort the evaluation before any figure is produced.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("data shape error: {0}")]
    DataShape(#[from] DataShapeError),
}
