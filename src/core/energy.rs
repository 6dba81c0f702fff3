use serde::{Deserialize, Serialize};

use crate::{
    core::{aggregate::Aggregates, asset::Chp, baseline::Baseline, error::ConfigurationError},
    prelude::*,
    quantity::{
        emissions::{EmissionFactor, Kilograms},
        energy::KilowattHours,
        proportions::{Efficiency, Percentage},
    },
};

/// Conversion efficiencies of the reference system.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceEfficiencies {
    /// Boiler efficiency `η_t,ref`.
    pub thermal: Efficiency,

    /// Average efficiency of the national power system `η_e,ref`.
    pub electric: Efficiency,
}

impl Default for ReferenceEfficiencies {
    fn default() -> Self {
        Self { thermal: Efficiency(0.9), electric: Efficiency(0.46) }
    }
}

impl ReferenceEfficiencies {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in
            [("reference.thermal", self.thermal), ("reference.electric", self.electric)]
        {
            if !value.is_valid() {
                return Err(ConfigurationError::Efficiency { name, value });
            }
        }
        Ok(())
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionFactors {
    /// Per kilowatt-hour of natural gas primary energy.
    pub gas: EmissionFactor,

    /// Per kilowatt-hour of electricity drawn from the grid.
    pub grid: EmissionFactor,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self { gas: EmissionFactor(0.2), grid: EmissionFactor(0.48) }
    }
}

impl EmissionFactors {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [("emissions.gas", self.gas.0), ("emissions.grid", self.grid.0)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        Ok(())
    }
}

/// Primary energy and emissions of a system over the year.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SystemEnergy {
    /// Heat and electricity delivered to the facility.
    pub supplied: KilowattHours,

    /// Natural gas burnt by the boiler.
    pub boiler_fuel: KilowattHours,

    /// Natural gas burnt by the CHP unit.
    pub chp_fuel: KilowattHours,

    /// Electricity drawn from the grid.
    pub grid_import: KilowattHours,

    /// Primary energy behind the grid import.
    pub grid_primary: KilowattHours,

    pub emissions: Kilograms,
}

impl SystemEnergy {
    pub fn proposed(
        aggregates: &Aggregates,
        chp: &Chp,
        efficiencies: &ReferenceEfficiencies,
        factors: &EmissionFactors,
    ) -> Self {
        let total = aggregates.total();
        let boiler_fuel = aggregates.thermal.boiler / efficiencies.thermal;
        let chp_fuel = chp.fuel_input(aggregates.chp_output);
        Self {
            supplied: aggregates.thermal.supplied() + total.supplied_to_user(),
            boiler_fuel,
            chp_fuel,
            grid_import: total.integration,
            grid_primary: total.integration / efficiencies.electric,
            emissions: (boiler_fuel + chp_fuel) * factors.gas + total.integration * factors.grid,
        }
    }

    pub fn reference(
        baseline: &Baseline,
        efficiencies: &ReferenceEfficiencies,
        factors: &EmissionFactors,
    ) -> Self {
        let grid_import = baseline.total_electric();
        let boiler_fuel = baseline.thermal / efficiencies.thermal;
        Self {
            supplied: baseline.thermal + grid_import,
            boiler_fuel,
            chp_fuel: KilowattHours::ZERO,
            grid_import,
            grid_primary: grid_import / efficiencies.electric,
            emissions: boiler_fuel * factors.gas + grid_import * factors.grid,
        }
    }

    /// Natural gas burnt on site.
    pub fn fuel(&self) -> KilowattHours {
        self.boiler_fuel + self.chp_fuel
    }

    pub fn primary_energy(&self) -> KilowattHours {
        self.fuel() + self.grid_primary
    }

    /// Supplied energy over primary energy, undefined for an idle system.
    #[must_use]
    pub fn fuel_efficiency(&self) -> Option<f64> {
        self.fuel_efficiency_with_heat(KilowattHours::ZERO, Efficiency(1.0))
    }

    /// Fuel efficiency with additional `heat` supplied, its primary energy counted at the
    /// `electric` efficiency.
    #[must_use]
    pub fn fuel_efficiency_with_heat(
        &self,
        heat: KilowattHours,
        electric: Efficiency,
    ) -> Option<f64> {
        let primary_energy = self.primary_energy() + heat / electric;
        (primary_energy != KilowattHours::ZERO).then(|| (self.supplied + heat) / primary_energy)
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct EnergyComparison {
    pub proposed: SystemEnergy,
    pub reference: SystemEnergy,

    /// Positive when the proposed system saves primary energy. Not clamped.
    pub primary_energy_saving: Percentage,

    /// Reference fuel efficiency crediting the heat wasted by the CHP unit.
    pub reference_efficiency_with_waste_heat: Option<f64>,
}

impl EnergyComparison {
    #[instrument(skip_all)]
    pub fn try_new(
        proposed: SystemEnergy,
        reference: SystemEnergy,
        waste_heat: KilowattHours,
        efficiencies: &ReferenceEfficiencies,
    ) -> Result<Self, ConfigurationError> {
        let reference_primary = reference.primary_energy();
        if reference_primary == KilowattHours::ZERO {
            return Err(ConfigurationError::ZeroDenominator("primary energy saving"));
        }
        let primary_energy_saving = Percentage::of(
            (reference_primary - proposed.primary_energy()).0,
            reference_primary.0,
        );
        info!(%primary_energy_saving, "evaluated primary energy");
        Ok(Self {
            proposed,
            reference,
            primary_energy_saving,
            reference_efficiency_with_waste_heat: reference
                .fuel_efficiency_with_heat(waste_heat, efficiencies.electric),
        })
    }

    /// Emissions avoided by the proposed system.
    pub fn emission_saving(&self) -> Kilograms {
        self.reference.emissions - self.proposed.emissions
    }
}
