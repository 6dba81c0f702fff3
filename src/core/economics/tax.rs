use serde::{Deserialize, Serialize};

use crate::{
    core::error::ConfigurationError,
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        price::KilowattHourPrice,
        proportions::Percentage,
    },
};

/// Share of the facility electrical demand covered by the CHP unit.
pub fn cogeneration_share(
    chp_output: KilowattHours,
    total_demand: KilowattHours,
) -> Result<Percentage, ConfigurationError> {
    if total_demand == KilowattHours::ZERO {
        return Err(ConfigurationError::ZeroDenominator("cogeneration share"));
    }
    Ok(Percentage::of(chp_output.0, total_demand.0))
}

/// Natural gas excise regime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasTaxRegime {
    /// Default regime: every cubic metre is taxed at the civil rate.
    Civil,

    /// Regime for facilities where cogeneration covers a significant share of the demand:
    /// industrial rate with a tax-free allowance proportional to the CHP output.
    Industrial,
}

impl GasTaxRegime {
    /// The industrial regime applies strictly above the threshold.
    pub fn select(cogeneration_share: Percentage, threshold: Percentage) -> Self {
        if cogeneration_share > threshold { Self::Industrial } else { Self::Civil }
    }
}

impl std::fmt::Display for GasTaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Civil => write!(f, "civil"),
            Self::Industrial => write!(f, "industrial"),
        }
    }
}

/// Electricity excise bracket, selected by the average monthly consumption.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricityTaxBracket {
    Lower,
    Upper,
    Top,
}

impl std::fmt::Display for ElectricityTaxBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
            Self::Top => write!(f, "top"),
        }
    }
}

/// Tiered electricity excise.
///
/// The rate of the selected bracket applies to the whole monthly volume, and the top bracket
/// is a fixed amount which does not depend on the volume at all.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricityTaxBrackets {
    /// Monthly consumption below which the lower bracket applies.
    pub lower_limit: KilowattHours,

    /// Monthly consumption below which the upper bracket applies.
    pub upper_limit: KilowattHours,

    pub lower_rate: KilowattHourPrice,
    pub upper_rate: KilowattHourPrice,

    /// Flat allowance added to the first-bracket amount in the top bracket.
    pub top_allowance: Euros,
}

impl Default for ElectricityTaxBrackets {
    fn default() -> Self {
        Self {
            lower_limit: KilowattHours(200_000.0),
            upper_limit: KilowattHours(1_200_000.0),
            lower_rate: KilowattHourPrice(0.0125),
            upper_rate: KilowattHourPrice(0.0075),
            top_allowance: Euros(4800.0),
        }
    }
}

impl ElectricityTaxBrackets {
    pub fn select(&self, monthly_consumption: KilowattHours) -> ElectricityTaxBracket {
        if monthly_consumption < self.lower_limit {
            ElectricityTaxBracket::Lower
        } else if monthly_consumption < self.upper_limit {
            ElectricityTaxBracket::Upper
        } else {
            ElectricityTaxBracket::Top
        }
    }

    pub fn amount(&self, monthly_consumption: KilowattHours) -> Euros {
        match self.select(monthly_consumption) {
            ElectricityTaxBracket::Lower => monthly_consumption * self.lower_rate,
            ElectricityTaxBracket::Upper => monthly_consumption * self.upper_rate,
            ElectricityTaxBracket::Top => self.top_allowance + self.lower_limit * self.lower_rate,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("electricity_tax.lower_limit", self.lower_limit.0),
            ("electricity_tax.upper_limit", self.upper_limit.0),
            ("electricity_tax.lower_rate", self.lower_rate.0),
            ("electricity_tax.upper_rate", self.upper_rate.0),
            ("electricity_tax.top_allowance", self.top_allowance.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        if self.lower_limit >= self.upper_limit {
            return Err(ConfigurationError::BracketLimits {
                lower: self.lower_limit.0,
                upper: self.upper_limit.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_regime_boundary() {
        let threshold = Percentage(10.0);
        let at_threshold =
            cogeneration_share(KilowattHours(1000.0), KilowattHours(10000.0)).unwrap();
        assert_eq!(GasTaxRegime::select(at_threshold, threshold), GasTaxRegime::Civil);
        let above = cogeneration_share(KilowattHours(1000.01), KilowattHours(10000.0)).unwrap();
        assert_abs_diff_eq!(above.0, 10.0001, epsilon = 1e-9);
        assert_eq!(GasTaxRegime::select(above, threshold), GasTaxRegime::Industrial);
    }

    #[test]
    fn test_zero_demand() {
        assert_eq!(
            cogeneration_share(KilowattHours(1.0), KilowattHours::ZERO),
            Err(ConfigurationError::ZeroDenominator("cogeneration share")),
        );
    }

    #[test]
    fn test_lower_bracket() {
        let brackets = ElectricityTaxBrackets::default();
        assert_eq!(brackets.select(KilowattHours(150_000.0)), ElectricityTaxBracket::Lower);
        assert_abs_diff_eq!(brackets.amount(KilowattHours(150_000.0)).0, 1875.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(ElectricityTaxBracket::Lower.to_string(), "lower");
        assert_eq!(ElectricityTaxBracket::Top.to_string(), "top");
        assert_eq!(GasTaxRegime::Industrial.to_string(), "industrial");
    }

    #[test]
    fn test_upper_bracket() {
        let brackets = ElectricityTaxBrackets::default();
        assert_eq!(brackets.select(KilowattHours(600_000.0)), ElectricityTaxBracket::Upper);
        assert_abs_diff_eq!(brackets.amount(KilowattHours(600_000.0)).0, 4500.0, epsilon = 1e-9);
        assert_eq!(brackets.select(KilowattHours(200_000.0)), ElectricityTaxBracket::Upper);
    }

    #[test]
    fn test_top_bracket() {
        let brackets = ElectricityTaxBrackets::default();
        assert_eq!(brackets.select(KilowattHours(1_300_000.0)), ElectricityTaxBracket::Top);
        assert_abs_diff_eq!(brackets.amount(KilowattHours(1_300_000.0)).0, 7300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(brackets.amount(KilowattHours(9_000_000.0)).0, 7300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_limits() {
        let brackets = ElectricityTaxBrackets {
            upper_limit: KilowattHours(100_000.0),
            ..ElectricityTaxBrackets::default()
        };
        assert!(matches!(brackets.validate(), Err(ConfigurationError::BracketLimits { .. })));
    }
}
