use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        asset::Chp,
        economics::{
            electricity::Tariffs,
            flat_rate::FlatRate,
            gas::GasParameters,
            investment::InvestmentParameters,
            tax::ElectricityTaxBrackets,
        },
        energy::{EmissionFactors, ReferenceEfficiencies},
        error::ConfigurationError,
    },
    prelude::*,
    wind::WindTurbine,
};

/// Every parameter of an evaluation. Missing sections and fields take the defaults.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub chp: Chp,
    pub wind: WindTurbine,
    pub reference: ReferenceEfficiencies,
    pub emissions: EmissionFactors,
    pub tariffs: Tariffs,
    pub gas: GasParameters,
    pub electricity_tax: ElectricityTaxBrackets,
    pub flat_rate: FlatRate,
    pub investment: InvestmentParameters,
}

impl Scenario {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read(path)
            .with_context(|| format!("failed to read the scenario `{}`", path.display()))?;
        let scenario = toml::from_slice(&contents)
            .with_context(|| format!("failed to parse the scenario `{}`", path.display()))?;
        debug!("loaded the scenario");
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.chp.validate()?;
        self.wind.validate()?;
        self.reference.validate()?;
        self.emissions.validate()?;
        self.tariffs.validate()?;
        self.gas.validate()?;
        self.electricity_tax.validate()?;
        self.flat_rate.validate()?;
        self.investment.validate()
    }
}
