use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::{
    core::{
        band::BandMap,
        dispatch::{DispatchOutcome, ElectricDispatch, ThermalDispatch},
    },
    quantity::{Zero, energy::KilowattHours, power::Kilowatts, price::KilowattHourPrice},
};

/// Electricity sums of a single tariff band, or of all of them.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Serialize)]
pub struct BandAggregate {
    pub surplus: KilowattHours,
    pub integration: KilowattHours,
    pub self_consumption: KilowattHours,
    pub provided_by_asset: KilowattHours,
    pub sold_to_grid: KilowattHours,

    /// Output of the additional generator consumed on site.
    pub extra_self_consumption: KilowattHours,

    /// Part of [`Self::sold_to_grid`] generated by the additional generator.
    pub extra_sold_to_grid: KilowattHours,
}

impl Zero for BandAggregate {
    const ZERO: Self = Self {
        surplus: KilowattHours::ZERO,
        integration: KilowattHours::ZERO,
        self_consumption: KilowattHours::ZERO,
        provided_by_asset: KilowattHours::ZERO,
        sold_to_grid: KilowattHours::ZERO,
        extra_self_consumption: KilowattHours::ZERO,
        extra_sold_to_grid: KilowattHours::ZERO,
    };
}

impl std::iter::Sum for BandAggregate {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |sum, item| sum + item)
    }
}

impl From<&ElectricDispatch> for BandAggregate {
    fn from(dispatch: &ElectricDispatch) -> Self {
        let (_, extra_export) = dispatch.export_by_source();
        Self {
            surplus: dispatch.flow.export,
            integration: dispatch.flow.import,
            self_consumption: dispatch.self_consumption,
            provided_by_asset: dispatch.generation(),
            // The whole surplus is sold:
            sold_to_grid: dispatch.flow.export,
            extra_self_consumption: dispatch.extra - extra_export,
            extra_sold_to_grid: extra_export,
        }
    }
}

impl BandAggregate {
    /// Surplus sold to the grid by the CHP unit.
    pub fn chp_sold_to_grid(&self) -> KilowattHours {
        self.sold_to_grid - self.extra_sold_to_grid
    }

    /// Electricity delivered to the facility: own generation plus grid integration.
    pub fn supplied_to_user(&self) -> KilowattHours {
        self.provided_by_asset + self.integration
    }

    /// Value of one generated kilowatt-hour: the self-consumed share at the selling price,
    /// the rest at the purchase price.
    ///
    /// Undefined when the band received no generation.
    #[must_use]
    pub fn equivalent_value(
        &self,
        buy: KilowattHourPrice,
        sell: KilowattHourPrice,
    ) -> Option<KilowattHourPrice> {
        if self.provided_by_asset == KilowattHours::ZERO {
            return None;
        }
        let self_consumed_share = self.self_consumption / self.provided_by_asset;
        Some(sell * self_consumed_share + buy * (1.0 - self_consumed_share))
    }
}

/// Heat sums over the dispatched hours, not split by band.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Serialize)]
pub struct ThermalAggregate {
    /// Heat recovered from the CHP unit.
    pub recovered: KilowattHours,

    /// Heat wasted because the CHP output exceeded the demand.
    pub waste: KilowattHours,

    /// Heat supplied by the boiler.
    pub boiler: KilowattHours,
}

impl From<&ThermalDispatch> for ThermalAggregate {
    fn from(dispatch: &ThermalDispatch) -> Self {
        Self {
            recovered: dispatch.recovered,
            waste: dispatch.flow.export,
            boiler: dispatch.flow.import,
        }
    }
}

impl ThermalAggregate {
    pub fn supplied(&self) -> KilowattHours {
        self.recovered + self.boiler
    }
}

/// Accumulated dispatch results over the dispatched hours.
///
/// Built by folding [`DispatchOutcome`]s; partial aggregates can be [merged][Self::merge]
/// in any order.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub bands: BandMap<BandAggregate>,
    pub thermal: ThermalAggregate,

    /// Electricity generated by the CHP unit alone.
    pub chp_output: KilowattHours,

    /// Peak hourly grid integration, the basis of the demand charge.
    pub committed_power: Kilowatts,

    pub n_hours: usize,
}

impl Aggregates {
    pub fn push(&mut self, outcome: &DispatchOutcome) {
        self.bands[outcome.band] += BandAggregate::from(&outcome.electric);
        self.thermal += ThermalAggregate::from(&outcome.thermal);
        self.chp_output += outcome.electric.chp;
        self.committed_power = self.committed_power.max(outcome.grid_demand());
        self.n_hours += 1;
    }

    /// Combine two partial aggregates.
    pub fn merge(self, other: Self) -> Self {
        Self {
            bands: self.bands + other.bands,
            thermal: self.thermal + other.thermal,
            chp_output: self.chp_output + other.chp_output,
            committed_power: self.committed_power.max(other.committed_power),
            n_hours: self.n_hours + other.n_hours,
        }
    }

    /// Sums over all bands.
    pub fn total(&self) -> BandAggregate {
        self.bands.total()
    }
}

impl std::ops::Add for Aggregates {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.merge(rhs)
    }
}

impl<'a> Extend<&'a DispatchOutcome> for Aggregates {
    fn extend<T: IntoIterator<Item = &'a DispatchOutcome>>(&mut self, outcomes: T) {
        for outcome in outcomes {
            self.push(outcome);
        }
    }
}

impl Extend<DispatchOutcome> for Aggregates {
    fn extend<T: IntoIterator<Item = DispatchOutcome>>(&mut self, outcomes: T) {
        for outcome in outcomes {
            self.push(&outcome);
        }
    }
}

impl FromIterator<DispatchOutcome> for Aggregates {
    fn from_iter<T: IntoIterator<Item = DispatchOutcome>>(outcomes: T) -> Self {
        let mut aggregates = Self::default();
        aggregates.extend(outcomes);
        aggregates
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;
    use crate::core::{
        asset::Chp,
        band::Band,
        record::HourlyRecord,
        dispatch::{
            Dispatcher,
            tests::{chp, profile},
        },
    };

    fn aggregate(records: &[HourlyRecord], chp: &Chp) -> Aggregates {
        Dispatcher::try_new(records, chp, None).unwrap().simulate().collect()
    }

    #[test]
    fn test_flat_deficit_day() {
        let records = profile(&[(500.0, 0.0, Band::F1); 24]);
        let aggregates = aggregate(&records, &chp(400.0, 0.0, 24));
        let f1 = aggregates.bands[Band::F1];
        assert_abs_diff_eq!(f1.integration.0, 2400.0);
        assert_abs_diff_eq!(f1.surplus.0, 0.0);
        assert_abs_diff_eq!(f1.self_consumption.0, 9600.0);
        assert_abs_diff_eq!(f1.sold_to_grid.0, 0.0);
        assert_abs_diff_eq!(f1.provided_by_asset.0, 9600.0);
        assert_eq!(aggregates.bands[Band::F2], BandAggregate::ZERO);
        assert_eq!(aggregates.committed_power, Kilowatts(100.0));
    }

    #[test]
    fn test_flat_surplus_day() {
        let records = profile(&[(500.0, 0.0, Band::F1); 24]);
        let aggregates = aggregate(&records, &chp(600.0, 0.0, 24));
        let total = aggregates.total();
        assert_abs_diff_eq!(total.surplus.0, 2400.0);
        assert_abs_diff_eq!(total.sold_to_grid.0, 2400.0);
        assert_abs_diff_eq!(total.integration.0, 0.0);
        assert_abs_diff_eq!(total.self_consumption.0, 12000.0);
        assert_abs_diff_eq!(total.provided_by_asset.0, 14400.0);
        assert_eq!(aggregates.committed_power, Kilowatts::ZERO);
    }

    #[test]
    fn test_sold_to_grid_by_source() {
        let records = profile(&[(500.0, 0.0, Band::F1), (1500.0, 0.0, Band::F2)]);
        let chp = chp(600.0, 0.0, 2);
        let wind = [Kilowatts(300.0), Kilowatts(1000.0)];
        let aggregates: Aggregates =
            Dispatcher::try_new(&records, &chp, Some(&wind)).unwrap().simulate().collect();

        let f1 = aggregates.bands[Band::F1];
        assert_abs_diff_eq!(f1.sold_to_grid.0, 400.0);
        assert_abs_diff_eq!(f1.chp_sold_to_grid().0, 100.0);
        assert_abs_diff_eq!(f1.extra_sold_to_grid.0, 300.0);
        assert_abs_diff_eq!(f1.extra_self_consumption.0, 0.0);

        // The wind covers the 900 kWh left by the CHP unit and exports the rest:
        let f2 = aggregates.bands[Band::F2];
        assert_abs_diff_eq!(f2.chp_sold_to_grid().0, 0.0);
        assert_abs_diff_eq!(f2.extra_self_consumption.0, 900.0);
        assert_abs_diff_eq!(f2.extra_sold_to_grid.0, 100.0);
    }

    #[test]
    fn test_thermal_sums() {
        let records = profile(&[(0.0, 800.0, Band::F3), (0.0, 300.0, Band::F3)]);
        let thermal = aggregate(&records, &chp(0.0, 500.0, 2)).thermal;
        assert_abs_diff_eq!(thermal.recovered.0, 800.0);
        assert_abs_diff_eq!(thermal.boiler.0, 300.0);
        assert_abs_diff_eq!(thermal.waste.0, 200.0);
        assert_abs_diff_eq!(thermal.supplied().0, 1100.0);
    }

    #[test]
    fn test_order_independence() {
        let loads = (0..72)
            .map(|hour| {
                let band = Band::ALL[hour % 3];
                (f64::from(u32::try_from(hour * 37 % 101).unwrap()) * 10.0, 250.0, band)
            })
            .collect_vec();
        let records = profile(&loads);
        let chp = chp(500.0, 200.0, 72);
        let forward = aggregate(&records, &chp);
        let reversed = aggregate(&records.iter().rev().copied().collect_vec(), &chp);
        for band in Band::ALL {
            assert_abs_diff_eq!(
                forward.bands[band].surplus.0,
                reversed.bands[band].surplus.0,
                epsilon = 1e-6,
            );
            assert_abs_diff_eq!(
                forward.bands[band].integration.0,
                reversed.bands[band].integration.0,
                epsilon = 1e-6,
            );
        }
        assert_eq!(forward.committed_power, reversed.committed_power);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let loads = (0..48_u32)
            .map(|hour| (f64::from(hour) * 20.0, 100.0, Band::ALL[hour as usize % 3]))
            .collect_vec();
        let records = profile(&loads);
        let chp = chp(400.0, 150.0, 48);
        let outcomes = Dispatcher::try_new(&records, &chp, None).unwrap().simulate().collect_vec();
        let (left, right) = outcomes.split_at(17);
        let mut first = Aggregates::default();
        first.extend(left);
        let mut second = Aggregates::default();
        second.extend(right);
        let merged = second + first;
        let single: Aggregates = outcomes.into_iter().collect();
        assert_eq!(merged.n_hours, single.n_hours);
        assert_eq!(merged.committed_power, single.committed_power);
        assert_abs_diff_eq!(
            merged.total().integration.0,
            single.total().integration.0,
            epsilon = 1e-6,
        );
        assert_abs_diff_eq!(merged.thermal.boiler.0, single.thermal.boiler.0, epsilon = 1e-6);
    }

    #[test]
    fn test_committed_power_grows_with_window() {
        let loads =
            (0..24_u32).map(|hour| (100.0 + f64::from(hour) * 10.0, 0.0, Band::F2)).collect_vec();
        let records = profile(&loads);
        let mut previous = Kilowatts::ZERO;
        for n_hours in 0..=24 {
            let committed_power = aggregate(&records, &chp(150.0, 0.0, n_hours)).committed_power;
            assert!(committed_power >= previous);
            previous = committed_power;
        }
        // Peak load is 330 kW, minus 150 kW of own generation:
        assert_eq!(previous, Kilowatts(180.0));
    }

    #[test]
    fn test_equivalent_value() {
        let aggregate = BandAggregate {
            self_consumption: KilowattHours(75.0),
            provided_by_asset: KilowattHours(100.0),
            ..BandAggregate::ZERO
        };
        let value = aggregate
            .equivalent_value(KilowattHourPrice(0.2), KilowattHourPrice(0.1))
            .unwrap();
        assert_abs_diff_eq!(value.0, 0.125, epsilon = 1e-12);
        assert!(
            BandAggregate::ZERO
                .equivalent_value(KilowattHourPrice(0.2), KilowattHourPrice(0.1))
                .is_none()
        );
    }
}
