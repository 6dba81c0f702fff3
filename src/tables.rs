use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        aggregate::BandAggregate,
        band::Band,
        economics::{SystemCost, investment::CapitalMetrics, unit_cost::UnitCost},
        energy::SystemEnergy,
        evaluation::{Evaluation, WindAppraisal},
    },
    fmt::{FormattedMetric, FormattedPercentage},
    quantity::{currency::Euros, energy::KilowattHours, price::KilowattHourPrice},
};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(header);
    table
}

fn megawatt_hours(energy: KilowattHours) -> Cell {
    Cell::new(format!("{:.1}", energy.megawatt_hours())).set_alignment(CellAlignment::Right)
}

fn euros(amount: Euros) -> Cell {
    Cell::new(amount).set_alignment(CellAlignment::Right)
}

/// Green when the proposed system does better, that is when `saving` is positive.
fn saving_color<T: PartialOrd + Default>(saving: T) -> Color {
    if saving > T::default() { Color::Green } else { Color::Red }
}

/// All report tables of an evaluation, in print order.
pub fn build_report(evaluation: &Evaluation) -> Vec<Table> {
    let mut tables = vec![
        build_electricity_table(evaluation),
        build_thermal_table(evaluation),
        build_energy_table(evaluation),
        build_costs_table(evaluation),
    ];
    if let Some(wind) = &evaluation.wind {
        tables.push(build_wind_table(wind));
    }
    if let Some(capital) = &evaluation.capital {
        tables.push(build_capital_table(capital));
    }
    tables
}

/// Electricity balance per band in megawatt-hours.
pub fn build_electricity_table(evaluation: &Evaluation) -> Table {
    let bands = &evaluation.aggregates.bands;
    let total = evaluation.aggregates.total();

    let mut table = new_table(vec!["MWh", "F1", "F2", "F3", "Total"]);
    let mut add_row = |title: &str, field: fn(&BandAggregate) -> KilowattHours| {
        let mut row = vec![Cell::new(title)];
        row.extend(Band::ALL.into_iter().map(|band| megawatt_hours(field(&bands[band]))));
        row.push(megawatt_hours(field(&total)).add_attribute(Attribute::Bold));
        table.add_row(row);
    };
    add_row("Provided by assets", |aggregate| aggregate.provided_by_asset);
    add_row("Self-consumption", |aggregate| aggregate.self_consumption);
    add_row("Surplus", |aggregate| aggregate.surplus);
    add_row("Sold to grid", |aggregate| aggregate.sold_to_grid);
    if evaluation.wind.is_some() {
        add_row("  by CHP", BandAggregate::chp_sold_to_grid);
        add_row("  by wind", |aggregate| aggregate.extra_sold_to_grid);
    }
    add_row("Integration", |aggregate| aggregate.integration);

    let baseline = &evaluation.baseline;
    let mut demand = vec![Cell::new("Demand").add_attribute(Attribute::Dim)];
    demand.extend(
        Band::ALL
            .into_iter()
            .map(|band| megawatt_hours(baseline.electric[band]).add_attribute(Attribute::Dim)),
    );
    demand.push(megawatt_hours(baseline.total_electric()).add_attribute(Attribute::Dim));
    table.add_row(demand);

    let mut values = vec![Cell::new("Equivalent value")];
    values.extend(Band::ALL.into_iter().map(|band| {
        evaluation.equivalent_values[band].map_or_else(
            || Cell::new("n/a").add_attribute(Attribute::Dim),
            |value: KilowattHourPrice| Cell::new(value).set_alignment(CellAlignment::Right),
        )
    }));
    values.push(Cell::new(""));
    table.add_row(values);
    table
}

pub fn build_thermal_table(evaluation: &Evaluation) -> Table {
    let thermal = &evaluation.aggregates.thermal;
    let mut table = new_table(vec!["Heat", "MWh"]);
    table.add_row(vec![Cell::new("Recovered from CHP"), megawatt_hours(thermal.recovered)]);
    table.add_row(vec![Cell::new("Boiler"), megawatt_hours(thermal.boiler)]);
    table.add_row(vec![
        Cell::new("Wasted"),
        megawatt_hours(thermal.waste).fg(if thermal.waste > KilowattHours::ZERO {
            Color::DarkYellow
        } else {
            Color::Green
        }),
    ]);
    table.add_row(vec![
        Cell::new("Supplied").add_attribute(Attribute::Bold),
        megawatt_hours(thermal.supplied()).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Primary energy and emissions of both systems.
pub fn build_energy_table(evaluation: &Evaluation) -> Table {
    let energy = &evaluation.energy;
    let mut table = new_table(vec!["", "Proposed", "Reference"]);
    let rows: [(&str, fn(&SystemEnergy) -> KilowattHours); 6] = [
        ("Supplied, MWh", |system| system.supplied),
        ("Boiler fuel, MWh", |system| system.boiler_fuel),
        ("CHP fuel, MWh", |system| system.chp_fuel),
        ("Grid import, MWh", |system| system.grid_import),
        ("Grid primary energy, MWh", |system| system.grid_primary),
        ("Primary energy, MWh", SystemEnergy::primary_energy),
    ];
    for (title, field) in rows {
        table.add_row(vec![
            Cell::new(title),
            megawatt_hours(field(&energy.proposed)),
            megawatt_hours(field(&energy.reference)),
        ]);
    }
    let fuel_efficiency = |system: &SystemEnergy| {
        system.fuel_efficiency().map_or_else(
            || Cell::new("n/a").add_attribute(Attribute::Dim),
            |efficiency| {
                Cell::new(FormattedPercentage(efficiency)).set_alignment(CellAlignment::Right)
            },
        )
    };
    table.add_row(vec![
        Cell::new("Fuel efficiency"),
        fuel_efficiency(&energy.proposed),
        fuel_efficiency(&energy.reference),
    ]);
    table.add_row(vec![
        Cell::new("Fuel efficiency with CHP waste heat").add_attribute(Attribute::Dim),
        Cell::new(""),
        energy.reference_efficiency_with_waste_heat.map_or_else(
            || Cell::new("n/a").add_attribute(Attribute::Dim),
            |efficiency| {
                Cell::new(FormattedPercentage(efficiency)).set_alignment(CellAlignment::Right)
            },
        ),
    ]);
    table.add_row(vec![
        Cell::new("CO₂, t"),
        Cell::new(format!("{:.1}", energy.proposed.emissions.tonnes()))
            .set_alignment(CellAlignment::Right)
            .fg(saving_color(energy.emission_saving())),
        Cell::new(format!("{:.1}", energy.reference.emissions.tonnes()))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Primary energy saving").add_attribute(Attribute::Bold),
        Cell::new(energy.primary_energy_saving)
            .set_alignment(CellAlignment::Right)
            .fg(saving_color(energy.primary_energy_saving)),
        Cell::new(""),
    ]);
    table
}

/// Annual operating costs of both systems, followed by the flat-rate check.
pub fn build_costs_table(evaluation: &Evaluation) -> Table {
    let costs = &evaluation.costs;
    let mut table = new_table(vec!["", "Proposed", "Reference"]);

    table.add_row(vec![
        Cell::new("Cogeneration share").add_attribute(Attribute::Dim),
        Cell::new(costs.cogeneration_share).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Gas tax regime").add_attribute(Attribute::Dim),
        Cell::new(costs.proposed.gas.regime),
        Cell::new(costs.reference.gas.regime),
    ]);
    table.add_row(vec![
        Cell::new("Electricity tax bracket").add_attribute(Attribute::Dim),
        Cell::new(costs.tax_bracket),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Committed power").add_attribute(Attribute::Dim),
        Cell::new(costs.proposed.electricity.committed_power).set_alignment(CellAlignment::Right),
        Cell::new(costs.reference.electricity.committed_power).set_alignment(CellAlignment::Right),
    ]);

    let rows: [(&str, fn(&SystemCost) -> Euros); 10] = [
        ("Electricity tax", |cost| cost.electricity.tax),
        ("Energy charge", |cost| cost.electricity.energy_charge),
        ("Power charge", |cost| cost.electricity.power_charge),
        ("Maintenance", |cost| cost.electricity.maintenance),
        ("Sales revenue", |cost| -cost.electricity.revenue),
        ("Electricity", |cost| cost.electricity.net()),
        ("Gas supply", |cost| cost.gas.supply),
        ("Gas taxes", |cost| cost.gas.taxes),
        ("Gas", |cost| cost.gas.total()),
        ("Net cost", SystemCost::net),
    ];
    for (title, field) in rows {
        table.add_row(vec![
            Cell::new(title),
            euros(field(&costs.proposed)),
            euros(field(&costs.reference)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Gas volume").add_attribute(Attribute::Dim),
        Cell::new(costs.proposed.gas.volume).set_alignment(CellAlignment::Right),
        Cell::new(costs.reference.gas.volume).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Saving").add_attribute(Attribute::Bold),
        euros(costs.saving()).fg(saving_color(costs.saving())),
        Cell::new(""),
    ]);

    let flat_rate = &evaluation.flat_rate;
    table.add_row(vec![
        Cell::new("Flat-rate net cost").add_attribute(Attribute::Dim),
        euros(flat_rate.proposed),
        euros(flat_rate.reference),
    ]);
    table.add_row(vec![
        Cell::new("Flat-rate saving").add_attribute(Attribute::Dim),
        euros(flat_rate.saving()).fg(saving_color(flat_rate.saving())),
        Cell::new(""),
    ]);
    table
}

pub fn build_wind_table(wind: &WindAppraisal) -> Table {
    let production = &wind.production;
    let mut table = new_table(vec!["Wind turbine", ""]);
    table.add_row(vec![Cell::new("Rated power"), Cell::new(production.rated_power)]);
    table.add_row(vec![Cell::new("Produced, MWh"), megawatt_hours(production.produced)]);
    table.add_row(vec![Cell::new("Available, MWh"), megawatt_hours(production.available)]);
    table.add_row(vec![Cell::new("Equivalent hours"), Cell::new(production.equivalent_hours)]);
    table.add_row(vec![Cell::new("Investment"), euros(wind.investment)]);
    table.add_row(vec![Cell::new("Annual maintenance"), euros(wind.maintenance)]);
    table.add_row(vec![
        Cell::new("Self-consumption, MWh"),
        megawatt_hours(wind.self_consumption),
    ]);
    table.add_row(vec![Cell::new("Sold to grid, MWh"), megawatt_hours(wind.energy_sold)]);
    table.add_row(vec![Cell::new("Annual revenue"), euros(wind.revenue)]);
    let payback = wind.payback.clone().map(|years| format!("{years:.1} years"));
    table.add_row(vec![
        Cell::new("Payback"),
        Cell::new(FormattedMetric(&payback)).fg(if payback.is_ok() {
            Color::Green
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("Unit cost").add_attribute(Attribute::Bold),
        wind.unit_cost.map_or_else(
            || Cell::new("n/a").add_attribute(Attribute::Dim),
            |unit_cost| Cell::new(unit_cost).set_alignment(CellAlignment::Right),
        ),
    ]);
    table
}

pub fn build_capital_table(capital: &CapitalMetrics) -> Table {
    let payback = capital.payback.clone().map(|years| format!("{years:.1} years"));
    let internal_rate_of_return = capital.internal_rate_of_return.clone().map(FormattedPercentage);

    let mut table = new_table(vec!["Investment", ""]);
    table.add_row(vec![Cell::new("Investment"), euros(capital.investment)]);
    table.add_row(vec![
        Cell::new("Annual saving"),
        euros(capital.annual_saving).fg(saving_color(capital.annual_saving)),
    ]);
    table.add_row(vec![
        Cell::new("Payback"),
        Cell::new(FormattedMetric(&payback)).fg(if payback.is_ok() {
            Color::Green
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("Net present value"),
        euros(capital.net_present_value).fg(saving_color(capital.net_present_value)),
    ]);
    table.add_row(vec![
        Cell::new("Profitability index"),
        Cell::new(format!("{:.2}", capital.profitability_index))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Internal rate of return").add_attribute(Attribute::Bold),
        Cell::new(FormattedMetric(&internal_rate_of_return)).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn build_unit_cost_table(unit_cost: &UnitCost) -> Table {
    let mut table = new_table(vec!["CHP unit cost", ""]);
    table.add_row(vec![
        Cell::new("Electric efficiency"),
        Cell::new(FormattedPercentage(unit_cost.electric_efficiency.0)),
    ]);
    table.add_row(vec![
        Cell::new("Thermal efficiency"),
        Cell::new(FormattedPercentage(unit_cost.thermal_efficiency.0)),
    ]);
    table.add_row(vec![Cell::new("Gas price"), Cell::new(unit_cost.gas_price)]);
    table.add_row(vec![Cell::new("Gas excise"), Cell::new(unit_cost.gas_tax)]);
    table.add_row(vec![Cell::new("Maintenance"), Cell::new(unit_cost.maintenance)]);
    table.add_row(vec![
        Cell::new("Net generation cost").add_attribute(Attribute::Bold),
        Cell::new(unit_cost.cost()).add_attribute(Attribute::Bold),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            dispatch::tests::{chp, profile},
            evaluation::Evaluator,
        },
        quantity::speed::MetresPerSecond,
        scenario::Scenario,
    };

    fn evaluate(wind_speeds: Option<&[MetresPerSecond]>) -> Evaluation {
        let records = profile(&[(500.0, 600.0, Band::F1); 24]);
        let scenario = Scenario { chp: chp(400.0, 500.0, 24), ..Scenario::default() };
        Evaluator::builder()
            .records(&records)
            .scenario(&scenario)
            .maybe_wind_speeds(wind_speeds)
            .evaluate()
            .unwrap()
    }

    #[test]
    fn test_tax_bracket_is_shown_once() {
        let evaluation = evaluate(None);
        let table = build_costs_table(&evaluation).to_string();
        assert_eq!(table.matches(&evaluation.costs.tax_bracket.to_string()).count(), 1);
    }

    #[test]
    fn test_sold_to_grid_by_source() {
        let table = build_electricity_table(&evaluate(None)).to_string();
        assert!(!table.contains("by wind"));

        let speeds = [MetresPerSecond(4.0); 24];
        let table = build_electricity_table(&evaluate(Some(&speeds))).to_string();
        assert!(table.contains("by CHP"));
        assert!(table.contains("by wind"));
    }
}
