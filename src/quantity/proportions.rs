use std::ops::Div;

use crate::quantity::energy::KilowattHours;

quantity!(Percentage, via: f64, suffix: "%", precision: 2);

impl Percentage {
    /// Ratio of two like quantities expressed as a percentage.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        Self(numerator * 100.0 / denominator)
    }
}

quantity!(
    /// Conversion efficiency: useful output over primary input, `0.0..=1.0`.
    Efficiency, via: f64, suffix: "", precision: 3
);

impl Efficiency {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0 && self.0 <= 1.0
    }
}

impl Div<Efficiency> for KilowattHours {
    type Output = Self;

    /// Primary energy needed to deliver `self` with the given efficiency.
    fn div(self, efficiency: Efficiency) -> Self::Output {
        Self(self.0 / efficiency.0)
    }
}
