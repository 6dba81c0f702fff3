use bon::Builder;
use serde::Serialize;

use crate::{
    core::{
        aggregate::Aggregates,
        asset::Chp,
        band::BandMap,
        baseline::Baseline,
        dispatch::Dispatcher,
        economics::{
            CostComparison,
            flat_rate::FlatRateComparison,
            investment::{CapitalMetrics, CapitalProject},
        },
        energy::{EnergyComparison, SystemEnergy},
        error::{ConfigurationError, DataShapeError, EvaluationError, NumericalError},
        record::HourlyRecord,
    },
    prelude::*,
    profile::validate_loads,
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        power::Kilowatts,
        price::KilowattHourPrice,
        speed::MetresPerSecond,
    },
    scenario::Scenario,
    wind::WindProduction,
};

/// Wind turbine figures, present when wind speeds are supplied.
///
/// The turbine is appraised on its own: its output is valued against the load left uncovered by
/// the CHP unit, self-consumed energy at the purchase price and the surplus at the selling price.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindAppraisal {
    pub production: WindProduction,
    pub investment: Euros,

    /// Annual maintenance.
    pub maintenance: Euros,

    /// Wind output consumed on site.
    pub self_consumption: KilowattHours,

    /// Wind output sold to the grid.
    pub energy_sold: KilowattHours,

    /// Annual revenue: avoided purchases, sales and the government aid.
    pub revenue: Euros,

    /// Simple payback period of the turbine alone, in years.
    pub payback: Result<f64, NumericalError>,

    /// Levelised cost of the wind energy.
    pub unit_cost: Option<KilowattHourPrice>,
}

impl WindAppraisal {
    #[instrument(skip_all)]
    fn new(scenario: &Scenario, power: &[Kilowatts], aggregates: &Aggregates) -> Self {
        let production = WindProduction::new(&scenario.wind, power);
        let parameters = &scenario.investment;
        let investment = parameters.wind_cost(scenario.wind.rated_power);
        let maintenance = parameters.wind_maintenance_cost(scenario.wind.rated_power);
        let bands = &aggregates.bands;
        let revenue = parameters.wind_government_aid
            + scenario.tariffs.purchase(&bands.map(|_, band| band.extra_self_consumption))
            + scenario.tariffs.sale(&bands.map(|_, band| band.extra_sold_to_grid));
        let payback = CapitalProject {
            investment,
            annual_saving: revenue - maintenance,
            discount_rate: parameters.discount_rate,
            horizon: parameters.horizon,
        }
        .payback();
        info!(produced = %production.produced, %revenue, ?payback, "appraised the wind turbine");
        Self {
            production,
            investment,
            maintenance,
            self_consumption: bands.total().extra_self_consumption,
            energy_sold: bands.total().extra_sold_to_grid,
            revenue,
            payback,
            unit_cost: production.unit_cost(investment, parameters.wind_maintenance),
        }
    }
}

/// Complete result of an evaluation.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub chp: Chp,

    /// Number of CHP operating hours, the profile length at most.
    pub window_len: usize,

    pub aggregates: Aggregates,
    pub baseline: Baseline,

    /// Value of one generated kilowatt-hour per band.
    pub equivalent_values: BandMap<Option<KilowattHourPrice>>,

    pub energy: EnergyComparison,
    pub costs: CostComparison,
    pub flat_rate: FlatRateComparison,
    pub wind: Option<WindAppraisal>,

    /// Investment metrics, absent when nothing is invested.
    pub capital: Option<CapitalMetrics>,
}

/// Evaluates the proposed system against the reference one: simulate, aggregate, evaluate.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Evaluator<'a> {
    records: &'a [HourlyRecord],
    scenario: &'a Scenario,

    /// Hourly 10-metre wind speeds aligned with the records, enabling the wind turbine.
    wind_speeds: Option<&'a [MetresPerSecond]>,
}

impl<S: evaluator_builder::IsComplete> EvaluatorBuilder<'_, S> {
    pub fn evaluate(self) -> Result<Evaluation, EvaluationError> {
        self.build().evaluate()
    }
}

impl Evaluator<'_> {
    #[instrument(skip_all, fields(n_records = self.records.len()))]
    fn evaluate(self) -> Result<Evaluation, EvaluationError> {
        let scenario = self.scenario;
        scenario.validate()?;
        validate_loads(self.records)?;
        if let Some(wind_speeds) = self.wind_speeds
            && wind_speeds.len() != self.records.len()
        {
            return Err(DataShapeError::WindSeriesLength {
                expected: self.records.len(),
                actual: wind_speeds.len(),
            }
            .into());
        }

        let baseline = Baseline::new(self.records);
        if baseline.total_electric() == KilowattHours::ZERO {
            return Err(ConfigurationError::ZeroDenominator("cogeneration share").into());
        }

        let wind_power = self.wind_speeds.map(|speeds| scenario.wind.power_series(speeds));
        let dispatcher = Dispatcher::try_new(self.records, &scenario.chp, wind_power.as_deref())?;
        let window_len = dispatcher.window_len();
        let aggregates: Aggregates = dispatcher.simulate().collect();
        info!(
            n_hours = aggregates.n_hours,
            chp_output = %aggregates.chp_output,
            committed_power = %aggregates.committed_power,
            "dispatched",
        );

        let energy = EnergyComparison::try_new(
            SystemEnergy::proposed(
                &aggregates,
                &scenario.chp,
                &scenario.reference,
                &scenario.emissions,
            ),
            SystemEnergy::reference(&baseline, &scenario.reference, &scenario.emissions),
            aggregates.thermal.waste,
            &scenario.reference,
        )?;
        let costs = CostComparison::try_new()
            .aggregates(&aggregates)
            .baseline(&baseline)
            .energy(&energy)
            .tariffs(&scenario.tariffs)
            .gas(&scenario.gas)
            .electricity_tax(&scenario.electricity_tax)
            .call()?;
        let flat_rate = FlatRateComparison::new(
            &aggregates,
            &baseline,
            &energy,
            &scenario.gas,
            scenario.tariffs.maintenance,
            &scenario.flat_rate,
        );

        let wind =
            wind_power.as_ref().map(|power| WindAppraisal::new(scenario, power, &aggregates));

        let investment = scenario.investment.chp_cost(scenario.chp.electric_power)
            + wind.as_ref().map_or(Euros::ZERO, |wind| wind.investment);
        let capital = (investment > Euros::ZERO).then(|| {
            let wind_maintenance = wind.as_ref().map_or(Euros::ZERO, |wind| wind.maintenance);
            CapitalMetrics::from(CapitalProject {
                investment,
                annual_saving: costs.saving() - wind_maintenance,
                discount_rate: scenario.investment.discount_rate,
                horizon: scenario.investment.horizon,
            })
        });

        let equivalent_values = aggregates.bands.map(|band, aggregate| {
            aggregate.equivalent_value(scenario.tariffs.buy[band], scenario.tariffs.sell[band])
        });

        Ok(Evaluation {
            chp: scenario.chp,
            window_len,
            aggregates,
            baseline,
            equivalent_values,
            energy,
            costs,
            flat_rate,
            wind,
            capital,
        })
    }
}
