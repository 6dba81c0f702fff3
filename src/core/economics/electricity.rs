use serde::{Deserialize, Serialize};

use crate::{
    core::{
        aggregate::Aggregates,
        band::{Band, BandMap},
        baseline::Baseline,
        error::ConfigurationError,
    },
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        power::Kilowatts,
        price::{KilowattHourPrice, KilowattMonthPrice},
    },
};

/// Time-of-use electricity tariffs and the CHP maintenance rate.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tariffs {
    /// Purchase price of grid electricity.
    pub buy: BandMap<KilowattHourPrice>,

    /// Selling price of the surplus.
    pub sell: BandMap<KilowattHourPrice>,

    /// Demand charge on the committed power.
    pub committed_power: KilowattMonthPrice,

    /// Maintenance of the CHP unit per generated kilowatt-hour.
    pub maintenance: KilowattHourPrice,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            buy: BandMap {
                f1: KilowattHourPrice(0.169),
                f2: KilowattHourPrice(0.174),
                f3: KilowattHourPrice(0.163),
            },
            sell: BandMap {
                f1: KilowattHourPrice(0.137),
                f2: KilowattHourPrice(0.142),
                f3: KilowattHourPrice(0.131),
            },
            committed_power: KilowattMonthPrice(2.65),
            maintenance: KilowattHourPrice(0.015),
        }
    }
}

impl Tariffs {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        const BUY: [&str; 3] = ["tariffs.buy.f1", "tariffs.buy.f2", "tariffs.buy.f3"];
        const SELL: [&str; 3] = ["tariffs.sell.f1", "tariffs.sell.f2", "tariffs.sell.f3"];
        let prices = self
            .buy
            .iter()
            .zip(BUY)
            .chain(self.sell.iter().zip(SELL))
            .map(|((_, price), name)| (name, price.0))
            .chain([
                ("tariffs.committed_power", self.committed_power.0),
                ("tariffs.maintenance", self.maintenance.0),
            ]);
        for (name, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }

    /// Cost of buying the given per-band energy.
    pub fn purchase(&self, energy: &BandMap<KilowattHours>) -> Euros {
        Band::ALL.into_iter().map(|band| energy[band] * self.buy[band]).sum()
    }

    /// Revenue of selling the given per-band energy.
    pub fn sale(&self, energy: &BandMap<KilowattHours>) -> Euros {
        Band::ALL.into_iter().map(|band| energy[band] * self.sell[band]).sum()
    }
}

/// Annual electricity bill.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ElectricityCost {
    /// Excise on the consumption.
    pub tax: Euros,

    /// Energy bought from the grid.
    pub energy_charge: Euros,

    pub committed_power: Kilowatts,

    /// Demand charge on the committed power.
    pub power_charge: Euros,

    /// CHP maintenance, zero for the reference system.
    pub maintenance: Euros,

    /// Surplus sold to the grid.
    pub revenue: Euros,
}

impl ElectricityCost {
    pub fn proposed(aggregates: &Aggregates, tax: Euros, tariffs: &Tariffs) -> Self {
        Self {
            tax,
            energy_charge: tariffs.purchase(&aggregates.bands.map(|_, band| band.integration)),
            committed_power: aggregates.committed_power,
            power_charge: tariffs.committed_power.annual_charge(aggregates.committed_power),
            maintenance: aggregates.chp_output * tariffs.maintenance,
            revenue: tariffs.sale(&aggregates.bands.map(|_, band| band.sold_to_grid)),
        }
    }

    pub fn reference(baseline: &Baseline, tax: Euros, tariffs: &Tariffs) -> Self {
        Self {
            tax,
            energy_charge: tariffs.purchase(&baseline.electric),
            committed_power: baseline.peak_load,
            power_charge: tariffs.committed_power.annual_charge(baseline.peak_load),
            maintenance: Euros::ZERO,
            revenue: Euros::ZERO,
        }
    }

    pub fn costs(&self) -> Euros {
        self.tax + self.energy_charge + self.power_charge + self.maintenance
    }

    pub fn net(&self) -> Euros {
        self.costs() - self.revenue
    }
}
