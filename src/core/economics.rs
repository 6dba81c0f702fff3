pub mod electricity;
pub mod flat_rate;
pub mod gas;
pub mod investment;
pub mod tax;
pub mod unit_cost;

use bon::bon;
use serde::Serialize;

use crate::{
    core::{
        aggregate::Aggregates,
        baseline::Baseline,
        economics::{
            electricity::{ElectricityCost, Tariffs},
            gas::{GasCost, GasParameters},
            tax::{ElectricityTaxBracket, ElectricityTaxBrackets, GasTaxRegime, cogeneration_share},
        },
        energy::EnergyComparison,
        error::ConfigurationError,
    },
    prelude::*,
    quantity::{currency::Euros, energy::KilowattHours, proportions::Percentage},
};

/// Annual bill of a system.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SystemCost {
    pub electricity: ElectricityCost,
    pub gas: GasCost,
}

impl SystemCost {
    pub fn net(&self) -> Euros {
        self.electricity.net() + self.gas.total()
    }
}

/// Operating costs of the proposed and reference systems.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct CostComparison {
    pub cogeneration_share: Percentage,

    /// Average monthly electrical demand, the basis of the electricity excise.
    pub monthly_consumption: KilowattHours,

    pub tax_bracket: ElectricityTaxBracket,
    pub proposed: SystemCost,
    pub reference: SystemCost,
}

#[bon]
impl CostComparison {
    #[builder]
    pub fn try_new(
        aggregates: &Aggregates,
        baseline: &Baseline,
        energy: &EnergyComparison,
        tariffs: &Tariffs,
        gas: &GasParameters,
        electricity_tax: &ElectricityTaxBrackets,
    ) -> Result<Self, ConfigurationError> {
        let total_demand = baseline.total_electric();
        let cogeneration_share = cogeneration_share(aggregates.chp_output, total_demand)?;
        let regime = GasTaxRegime::select(cogeneration_share, gas.cogeneration_threshold);

        let monthly_consumption = total_demand / 12.0;
        let tax_bracket = electricity_tax.select(monthly_consumption);
        let tax = electricity_tax.amount(monthly_consumption);
        info!(%cogeneration_share, %regime, ?tax_bracket, %tax, "selected the tax regimes");

        let proposed = SystemCost {
            electricity: ElectricityCost::proposed(aggregates, tax, tariffs),
            gas: GasCost::new(energy.proposed.fuel(), aggregates.chp_output, regime, gas),
        };
        let reference = SystemCost {
            electricity: ElectricityCost::reference(baseline, tax, tariffs),
            gas: GasCost::new(
                energy.reference.boiler_fuel,
                KilowattHours::ZERO,
                GasTaxRegime::Civil,
                gas,
            ),
        };
        Ok(Self { cogeneration_share, monthly_consumption, tax_bracket, proposed, reference })
    }
}

impl CostComparison {
    /// Reduction of the annual net cost, positive when the proposed system is cheaper.
    pub fn saving(&self) -> Euros {
        self.reference.net() - self.proposed.net()
    }
}
