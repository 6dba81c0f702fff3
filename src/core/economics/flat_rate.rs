use serde::{Deserialize, Serialize};

use crate::{
    core::{
        aggregate::Aggregates,
        baseline::Baseline,
        economics::gas::GasParameters,
        energy::EnergyComparison,
        error::ConfigurationError,
    },
    quantity::{currency::Euros, price::KilowattHourPrice, volume::CubicMetres},
};

/// Single-tariff electricity prices for the simplified operating cost comparison.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatRate {
    pub purchase: KilowattHourPrice,
    pub sale: KilowattHourPrice,

    /// Excise on the consumed electricity.
    pub tax: KilowattHourPrice,
}

impl Default for FlatRate {
    fn default() -> Self {
        Self {
            purchase: KilowattHourPrice(0.18),
            sale: KilowattHourPrice(0.135),
            tax: KilowattHourPrice(0.0095),
        }
    }
}

impl FlatRate {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("flat_rate.purchase", self.purchase.0),
            ("flat_rate.sale", self.sale.0),
            ("flat_rate.tax", self.tax.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }
}

/// Annual operating costs under a flat electricity rate.
///
/// The proposed system always pays the industrial gas excise on the CHP fuel net of the
/// exemption; the reference system pays the civil excise on the boiler fuel.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct FlatRateComparison {
    pub proposed: Euros,
    pub reference: Euros,
}

impl FlatRateComparison {
    pub fn new(
        aggregates: &Aggregates,
        baseline: &Baseline,
        energy: &EnergyComparison,
        gas: &GasParameters,
        maintenance: KilowattHourPrice,
        rate: &FlatRate,
    ) -> Self {
        let total = aggregates.total();

        let boiler_volume = gas.volume(energy.proposed.boiler_fuel);
        let chp_volume = gas.volume(energy.proposed.chp_fuel);
        let taxable_volume =
            (chp_volume - aggregates.chp_output * gas.exemption).max(CubicMetres::ZERO);
        let proposed = (boiler_volume + chp_volume) * gas.price
            + taxable_volume * gas.industrial_tax
            + total.integration * rate.purchase
            - total.surplus * rate.sale
            + aggregates.chp_output * maintenance
            + (total.integration + total.self_consumption) * rate.tax;

        let reference = gas.volume(energy.reference.boiler_fuel) * (gas.price + gas.civil_tax)
            + baseline.total_electric() * (rate.purchase + rate.tax);

        Self { proposed, reference }
    }

    /// Positive when the proposed system is cheaper to operate.
    pub fn saving(&self) -> Euros {
        self.reference - self.proposed
    }
}
