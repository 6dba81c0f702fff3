use std::fmt::{Debug, Display, Formatter};

use crate::core::error::NumericalError;

/// Proportion formatted as a percentage.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Metric that may be undefined, printed with the reason when it is.
pub struct FormattedMetric<'a, T>(pub &'a Result<T, NumericalError>);

impl<T: Display> Display for FormattedMetric<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Ok(value) => Display::fmt(value, f),
            Err(error) => write!(f, "undefined ({error})"),
        }
    }
}
