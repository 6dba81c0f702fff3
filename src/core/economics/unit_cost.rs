use bon::Builder;
use serde::Serialize;

use crate::{
    core::error::ConfigurationError,
    quantity::{
        price::{CubicMetrePrice, KilowattHourPrice},
        proportions::Efficiency,
        volume::HeatingValue,
    },
};

/// Net generation cost of one CHP kilowatt-hour.
///
/// The fuel cost is credited with the boiler fuel avoided by the recovered heat and charged
/// with the excise on the fuel share above the reference electrical efficiency.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Builder)]
pub struct UnitCost {
    #[builder(default = Efficiency(0.39))]
    pub electric_efficiency: Efficiency,

    #[builder(default = Efficiency(0.473))]
    pub thermal_efficiency: Efficiency,

    #[builder(default = CubicMetrePrice(0.6))]
    pub gas_price: CubicMetrePrice,

    #[builder(default = CubicMetrePrice(0.0187))]
    pub gas_tax: CubicMetrePrice,

    #[builder(default = HeatingValue(9.59))]
    pub heating_value: HeatingValue,

    /// Boiler efficiency of the reference system.
    #[builder(default = Efficiency(0.9))]
    pub reference_thermal_efficiency: Efficiency,

    /// Electrical efficiency above which the CHP fuel is tax-free.
    #[builder(default = Efficiency(0.474))]
    pub reference_electric_efficiency: Efficiency,

    #[builder(default = KilowattHourPrice(0.015))]
    pub maintenance: KilowattHourPrice,
}

impl UnitCost {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("electric_efficiency", self.electric_efficiency),
            ("thermal_efficiency", self.thermal_efficiency),
            ("reference_thermal_efficiency", self.reference_thermal_efficiency),
            ("reference_electric_efficiency", self.reference_electric_efficiency),
        ] {
            if !value.is_valid() {
                return Err(ConfigurationError::Efficiency { name, value });
            }
        }
        if !self.heating_value.is_finite() || self.heating_value.0 <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                name: "heating_value",
                value: self.heating_value.0,
            });
        }
        for (name, value) in [
            ("gas_price", self.gas_price.0),
            ("gas_tax", self.gas_tax.0),
            ("maintenance", self.maintenance.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }

    pub fn cost(&self) -> KilowattHourPrice {
        let gas_price = self.gas_price.0;
        let gas_tax = self.gas_tax.0;
        let taxed_share = 1.0 - self.electric_efficiency.0 / self.reference_electric_efficiency.0;
        let heat_credit = self.thermal_efficiency.0 / self.reference_thermal_efficiency.0;
        let per_cubic_metre =
            gas_price + taxed_share * gas_tax - heat_credit * (gas_price + gas_tax);
        KilowattHourPrice(per_cubic_metre / (self.electric_efficiency.0 * self.heating_value.0))
            + self.maintenance
    }
}
