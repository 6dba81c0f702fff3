use serde::{Deserialize, Serialize};

use crate::{
    core::{economics::tax::GasTaxRegime, error::ConfigurationError},
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        price::CubicMetrePrice,
        proportions::Percentage,
        volume::{CubicMetres, HeatingValue, SpecificVolume},
    },
};

/// Natural gas prices and excise.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasParameters {
    /// Lower heating value.
    pub heating_value: HeatingValue,

    /// Raw material and network use.
    pub price: CubicMetrePrice,

    pub civil_tax: CubicMetrePrice,
    pub industrial_tax: CubicMetrePrice,

    /// Tax-free volume per kilowatt-hour of CHP electricity, industrial regime only.
    pub exemption: SpecificVolume,

    /// Cogeneration share above which the industrial regime applies.
    pub cogeneration_threshold: Percentage,
}

impl Default for GasParameters {
    fn default() -> Self {
        Self {
            heating_value: HeatingValue(9.59),
            price: CubicMetrePrice(0.6),
            civil_tax: CubicMetrePrice(0.0181),
            industrial_tax: CubicMetrePrice(0.0187),
            exemption: SpecificVolume(0.22),
            cogeneration_threshold: Percentage(10.0),
        }
    }
}

impl GasParameters {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.heating_value.is_finite() || self.heating_value.0 <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                name: "gas.heating_value",
                value: self.heating_value.0,
            });
        }
        for (name, value) in [
            ("gas.price", self.price.0),
            ("gas.civil_tax", self.civil_tax.0),
            ("gas.industrial_tax", self.industrial_tax.0),
            ("gas.exemption", self.exemption.0),
            ("gas.cogeneration_threshold", self.cogeneration_threshold.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }

    /// Volume of natural gas holding the given primary energy.
    pub fn volume(&self, fuel: KilowattHours) -> CubicMetres {
        fuel / self.heating_value
    }
}

/// Annual natural gas bill.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct GasCost {
    pub regime: GasTaxRegime,
    pub volume: CubicMetres,
    pub tax_free_volume: CubicMetres,

    /// Raw material and network use.
    pub supply: Euros,

    pub taxes: Euros,
}

impl GasCost {
    /// Bill of a system burning `fuel`, where the CHP unit generated `chp_output`.
    pub fn new(
        fuel: KilowattHours,
        chp_output: KilowattHours,
        regime: GasTaxRegime,
        parameters: &GasParameters,
    ) -> Self {
        let volume = parameters.volume(fuel);
        let (tax_free_volume, tax) = match regime {
            GasTaxRegime::Civil => (CubicMetres::ZERO, parameters.civil_tax),
            GasTaxRegime::Industrial => {
                (chp_output * parameters.exemption, parameters.industrial_tax)
            }
        };
        let taxable_volume = (volume - tax_free_volume).max(CubicMetres::ZERO);
        Self {
            regime,
            volume,
            tax_free_volume,
            supply: volume * parameters.price,
            taxes: taxable_volume * tax,
        }
    }

    pub fn total(&self) -> Euros {
        self.supply + self.taxes
    }
}
