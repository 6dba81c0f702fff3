use clap::Parser;

use crate::{
    core::economics::unit_cost::UnitCost,
    prelude::*,
    quantity::{
        price::{CubicMetrePrice, KilowattHourPrice},
        proportions::Efficiency,
        volume::HeatingValue,
    },
    tables::build_unit_cost_table,
};

#[derive(Copy, Clone, Parser)]
pub struct UnitCostArgs {
    #[clap(long, default_value = "0.39", env = "CHP_ELECTRIC_EFFICIENCY")]
    pub electric_efficiency: Efficiency,

    #[clap(long, default_value = "0.473", env = "CHP_THERMAL_EFFICIENCY")]
    pub thermal_efficiency: Efficiency,

    /// Natural gas price in euros per standard cubic metre.
    #[clap(long, default_value = "0.6", env = "GAS_PRICE")]
    pub gas_price: CubicMetrePrice,

    /// Natural gas excise in euros per standard cubic metre.
    #[clap(long, default_value = "0.0187", env = "GAS_TAX")]
    pub gas_tax: CubicMetrePrice,

    /// Lower heating value in kilowatt-hours per standard cubic metre.
    #[clap(long, default_value = "9.59", env = "GAS_HEATING_VALUE")]
    pub heating_value: HeatingValue,

    #[clap(long, default_value = "0.9", env = "REFERENCE_THERMAL_EFFICIENCY")]
    pub reference_thermal_efficiency: Efficiency,

    /// Electrical efficiency above which the CHP fuel is tax-free.
    #[clap(long, default_value = "0.474", env = "REFERENCE_ELECTRIC_EFFICIENCY")]
    pub reference_electric_efficiency: Efficiency,

    /// Maintenance cost in euros per generated kilowatt-hour.
    #[clap(long, default_value = "0.015", env = "CHP_MAINTENANCE")]
    pub maintenance: KilowattHourPrice,
}

#[instrument(skip_all)]
pub fn unit_cost(args: &UnitCostArgs) -> Result {
    let unit_cost = UnitCost::builder()
        .electric_efficiency(args.electric_efficiency)
        .thermal_efficiency(args.thermal_efficiency)
        .gas_price(args.gas_price)
        .gas_tax(args.gas_tax)
        .heating_value(args.heating_value)
        .reference_thermal_efficiency(args.reference_thermal_efficiency)
        .reference_electric_efficiency(args.reference_electric_efficiency)
        .maintenance(args.maintenance)
        .build();
    unit_cost.validate()?;
    info!(cost = %unit_cost.cost(), "evaluated the unit cost");
    println!("{}", build_unit_cost_table(&unit_cost));
    Ok(())
}
