use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{asset::Chp, band::Band, error::DataShapeError, flow::Flow, record::HourlyRecord},
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts, time::Hours},
};

/// Electricity balance of a single hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ElectricDispatch {
    /// Output of the CHP unit, always its nameplate power.
    pub chp: KilowattHours,

    /// Output of the additional generator, if any.
    pub extra: KilowattHours,

    /// Part of the generation consumed on site.
    pub self_consumption: KilowattHours,

    /// Grid integration (import) and surplus sold to the grid (export).
    pub flow: Flow<KilowattHours>,
}

impl ElectricDispatch {
    pub fn new(load: KilowattHours, chp: KilowattHours, extra: KilowattHours) -> Self {
        let generation = chp + extra;
        Self {
            chp,
            extra,
            self_consumption: load.min(generation),
            flow: Flow::net(load, generation),
        }
    }

    pub fn generation(&self) -> KilowattHours {
        self.chp + self.extra
    }

    /// Electrical demand of the facility over the hour.
    pub fn load(&self) -> KilowattHours {
        self.self_consumption + self.flow.import
    }

    /// Export of the CHP unit and of the additional generator.
    ///
    /// The CHP unit covers the load first, the additional generator takes what remains.
    pub fn export_by_source(&self) -> (KilowattHours, KilowattHours) {
        let chp = (self.chp - self.load()).max(KilowattHours::ZERO);
        (chp, self.flow.export - chp)
    }
}

/// Heat balance of a single hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ThermalDispatch {
    /// Heat recovered from the CHP unit and used on site.
    pub recovered: KilowattHours,

    /// Boiler integration (import) and wasted heat (export).
    pub flow: Flow<KilowattHours>,
}

impl ThermalDispatch {
    pub fn new(load: KilowattHours, capacity: KilowattHours) -> Self {
        Self { recovered: load.min(capacity), flow: Flow::net(load, capacity) }
    }
}

/// Outcome of dispatching one hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub band: Band,
    pub electric: ElectricDispatch,
    pub thermal: ThermalDispatch,
}

impl DispatchOutcome {
    /// Power drawn from the grid over the hour.
    pub fn grid_demand(&self) -> Kilowatts {
        self.electric.flow.import / Hours::ONE
    }
}

/// Hour-by-hour dispatch of fixed-capacity generation against the demand profile.
///
/// The CHP unit runs at nameplate output in each of its operating hours. Those are the `n_hours`
/// hours with the highest electrical load. Without additional generation the remaining hours are
/// not simulated at all; with it, they are dispatched with the CHP unit off and the boiler covering
/// the whole heat demand.
pub struct Dispatcher<'a> {
    records: &'a [HourlyRecord],
    chp: &'a Chp,

    /// Additional electrical generation aligned with `records`, such as a wind turbine.
    extra_generation: Option<&'a [Kilowatts]>,
}

impl<'a> Dispatcher<'a> {
    pub fn try_new(
        records: &'a [HourlyRecord],
        chp: &'a Chp,
        extra_generation: Option<&'a [Kilowatts]>,
    ) -> Result<Self, DataShapeError> {
        if let Some(extra_generation) = extra_generation
            && extra_generation.len() != records.len()
        {
            return Err(DataShapeError::WindSeriesLength {
                expected: records.len(),
                actual: extra_generation.len(),
            });
        }
        Ok(Self { records, chp, extra_generation })
    }

    /// Number of simulated hours, the operating hours clamped to the profile length.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.chp.n_hours.min(self.records.len())
    }

    /// Number of dispatched hours: the operating window, or every hour with additional generation.
    #[must_use]
    pub fn n_dispatched(&self) -> usize {
        if self.extra_generation.is_some() { self.records.len() } else { self.window_len() }
    }

    /// Lazily dispatch the hours, from the highest electrical load down.
    #[instrument(skip_all, fields(n_hours = self.chp.n_hours, n_records = self.records.len()))]
    pub fn simulate(&self) -> impl Iterator<Item = DispatchOutcome> + '_ {
        if self.chp.n_hours > self.records.len() {
            warn!(
                n_hours = self.chp.n_hours,
                n_records = self.records.len(),
                "operating hours exceed the profile length, clamping",
            );
        }
        let window_len = self.window_len();
        let chp_output = self.chp.electric_output(Hours::ONE);
        let heat_capacity = self.chp.thermal_power * Hours::ONE;
        self.records
            .iter()
            .enumerate()
            .sorted_by(|(_, lhs), (_, rhs)| rhs.electric_load.cmp(&lhs.electric_load))
            .take(self.n_dispatched())
            .enumerate()
            .map(move |(rank, (index, record))| {
                let (chp, heat_capacity) = if rank < window_len {
                    (chp_output, heat_capacity)
                } else {
                    (KilowattHours::ZERO, KilowattHours::ZERO)
                };
                let extra = self
                    .extra_generation
                    .map_or(KilowattHours::ZERO, |generation| generation[index] * Hours::ONE);
                DispatchOutcome {
                    band: record.band,
                    electric: ElectricDispatch::new(record.electric_load * Hours::ONE, chp, extra),
                    thermal: ThermalDispatch::new(record.thermal_load * Hours::ONE, heat_capacity),
                }
            })
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;

    /// Build a synthetic profile starting on Monday, January 1st, with explicit bands.
    pub fn profile(loads: &[(f64, f64, Band)]) -> Vec<HourlyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        loads
            .iter()
            .zip(0..)
            .map(|(&(electric, thermal, band), hour)| HourlyRecord {
                timestamp: start + TimeDelta::hours(hour),
                electric_load: Kilowatts(electric),
                thermal_load: Kilowatts(thermal),
                band,
            })
            .collect()
    }

    pub fn chp(electric_power: f64, thermal_power: f64, n_hours: usize) -> Chp {
        Chp {
            electric_power: Kilowatts(electric_power),
            thermal_power: Kilowatts(thermal_power),
            n_hours,
            ..Chp::default()
        }
    }

    #[test]
    fn test_deficit_hour() {
        let dispatch =
            ElectricDispatch::new(KilowattHours(500.0), KilowattHours(400.0), KilowattHours::ZERO);
        assert_eq!(dispatch.self_consumption, KilowattHours(400.0));
        assert_eq!(dispatch.flow.import, KilowattHours(100.0));
        assert_eq!(dispatch.flow.export, KilowattHours::ZERO);
        assert_eq!(dispatch.self_consumption + dispatch.flow.import, KilowattHours(500.0));
    }

    #[test]
    fn test_surplus_hour() {
        let dispatch =
            ElectricDispatch::new(KilowattHours(500.0), KilowattHours(600.0), KilowattHours::ZERO);
        assert_eq!(dispatch.self_consumption, KilowattHours(500.0));
        assert_eq!(dispatch.flow.import, KilowattHours::ZERO);
        assert_eq!(dispatch.flow.export, KilowattHours(100.0));
        assert_eq!(dispatch.self_consumption + dispatch.flow.export, dispatch.generation());
    }

    #[test]
    fn test_extra_generation_adds_up() {
        let dispatch =
            ElectricDispatch::new(KilowattHours(500.0), KilowattHours(400.0), KilowattHours(300.0));
        assert_eq!(dispatch.generation(), KilowattHours(700.0));
        assert_eq!(dispatch.flow.export, KilowattHours(200.0));
        assert_eq!(dispatch.export_by_source(), (KilowattHours::ZERO, KilowattHours(200.0)));
    }

    #[test]
    fn test_export_by_source() {
        let dispatch =
            ElectricDispatch::new(KilowattHours(300.0), KilowattHours(400.0), KilowattHours(250.0));
        assert_eq!(dispatch.load(), KilowattHours(300.0));
        assert_eq!(dispatch.export_by_source(), (KilowattHours(100.0), KilowattHours(250.0)));

        let idle =
            ElectricDispatch::new(KilowattHours(300.0), KilowattHours::ZERO, KilowattHours::ZERO);
        assert_eq!(idle.export_by_source(), (KilowattHours::ZERO, KilowattHours::ZERO));
    }

    #[test]
    fn test_thermal_hour() {
        let deficit = ThermalDispatch::new(KilowattHours(900.0), KilowattHours(700.0));
        assert_eq!(deficit.recovered, KilowattHours(700.0));
        assert_eq!(deficit.flow.import, KilowattHours(200.0));

        let surplus = ThermalDispatch::new(KilowattHours(500.0), KilowattHours(700.0));
        assert_eq!(surplus.recovered, KilowattHours(500.0));
        assert_eq!(surplus.flow.export, KilowattHours(200.0));
    }

    #[test]
    fn test_surplus_and_integration_are_exclusive() {
        let records = profile(
            &(0..48_u32).map(|hour| (f64::from(hour) * 25.0, 100.0, Band::F2)).collect_vec(),
        );
        let chp = chp(600.0, 100.0, 48);
        for outcome in Dispatcher::try_new(&records, &chp, None).unwrap().simulate() {
            let flow = outcome.electric.flow;
            assert!(flow.import == KilowattHours::ZERO || flow.export == KilowattHours::ZERO);
        }
    }

    #[test]
    fn test_window_takes_highest_loads() {
        let records = profile(&[
            (100.0, 0.0, Band::F1),
            (300.0, 0.0, Band::F2),
            (200.0, 0.0, Band::F3),
        ]);
        let chp = chp(0.0, 0.0, 2);
        let bands = Dispatcher::try_new(&records, &chp, None)
            .unwrap()
            .simulate()
            .map(|outcome| (outcome.band, outcome.electric.flow.import))
            .collect_vec();
        assert_eq!(bands, [(Band::F2, KilowattHours(300.0)), (Band::F3, KilowattHours(200.0))]);
    }

    #[test]
    fn test_zero_window() {
        let records = profile(&[(100.0, 10.0, Band::F1)]);
        let chp = chp(50.0, 5.0, 0);
        assert_eq!(Dispatcher::try_new(&records, &chp, None).unwrap().simulate().count(), 0);
    }

    #[test]
    fn test_window_is_clamped() {
        let records = profile(&[(100.0, 10.0, Band::F1), (50.0, 10.0, Band::F3)]);
        let chp = chp(50.0, 5.0, 8760);
        let dispatcher = Dispatcher::try_new(&records, &chp, None).unwrap();
        assert_eq!(dispatcher.window_len(), 2);
        assert_eq!(dispatcher.simulate().count(), 2);
    }

    #[test]
    fn test_extra_generation_follows_its_record() {
        let records = profile(&[(100.0, 0.0, Band::F1), (300.0, 0.0, Band::F2)]);
        let chp = chp(0.0, 0.0, 2);
        let wind = [Kilowatts(10.0), Kilowatts(20.0)];
        let extras = Dispatcher::try_new(&records, &chp, Some(&wind))
            .unwrap()
            .simulate()
            .map(|outcome| outcome.electric.extra)
            .collect_vec();
        assert_eq!(extras, [KilowattHours(20.0), KilowattHours(10.0)]);
    }

    #[test]
    fn test_mismatched_extra_generation() {
        let records = profile(&[(100.0, 0.0, Band::F1)]);
        let chp = chp(0.0, 0.0, 1);
        let wind = [Kilowatts(10.0), Kilowatts(20.0)];
        assert_eq!(
            Dispatcher::try_new(&records, &chp, Some(&wind)).err(),
            Some(DataShapeError::WindSeriesLength { expected: 1, actual: 2 }),
        );
    }

    #[test]
    fn test_extra_generation_outside_the_window() {
        let records = profile(&[
            (3000.0, 500.0, Band::F1),
            (2000.0, 500.0, Band::F1),
            (100.0, 500.0, Band::F3),
            (50.0, 500.0, Band::F3),
        ]);
        let chp = chp(800.0, 300.0, 2);
        let wind = [Kilowatts(1859.0); 4];
        let dispatcher = Dispatcher::try_new(&records, &chp, Some(&wind)).unwrap();
        assert_eq!(dispatcher.window_len(), 2);
        assert_eq!(dispatcher.n_dispatched(), 4);

        let outcomes = dispatcher.simulate().collect_vec();
        let chp_outputs = outcomes.iter().map(|outcome| outcome.electric.chp).collect_vec();
        assert_eq!(
            chp_outputs,
            [KilowattHours(800.0), KilowattHours(800.0), KilowattHours::ZERO, KilowattHours::ZERO],
        );
        let extra: KilowattHours = outcomes.iter().map(|outcome| outcome.electric.extra).sum();
        assert_eq!(extra, KilowattHours(4.0 * 1859.0));

        // Off the window, the wind alone covers the 100 kWh load and the rest is exported:
        assert_eq!(outcomes[2].electric.self_consumption, KilowattHours(100.0));
        assert_eq!(outcomes[2].electric.flow.export, KilowattHours(1759.0));
        assert_eq!(outcomes[2].thermal.recovered, KilowattHours::ZERO);
        assert_eq!(outcomes[2].thermal.flow.import, KilowattHours(500.0));
    }
}
