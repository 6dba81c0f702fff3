use serde::Serialize;

use crate::{
    core::{band::BandMap, record::HourlyRecord},
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts, time::Hours},
};

/// Demand of the reference system, which has no self-generation at all.
///
/// Always computed over the whole profile, regardless of the CHP operating window:
/// the reference system has to cover the entire year.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Baseline {
    /// Electricity bought from the grid, per band.
    pub electric: BandMap<KilowattHours>,

    /// Heat supplied by the boiler.
    pub thermal: KilowattHours,

    /// Peak electrical load, the reference committed power.
    pub peak_load: Kilowatts,

    pub n_hours: usize,
}

impl Baseline {
    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn new(records: &[HourlyRecord]) -> Self {
        let baseline = records.iter().fold(Self::default(), |mut baseline, record| {
            baseline.electric[record.band] += record.electric_load * Hours::ONE;
            baseline.thermal += record.thermal_load * Hours::ONE;
            baseline.peak_load = baseline.peak_load.max(record.electric_load);
            baseline.n_hours += 1;
            baseline
        });
        debug!(
            electric = %baseline.total_electric(),
            thermal = %baseline.thermal,
            peak_load = %baseline.peak_load,
            "reference demand",
        );
        baseline
    }

    /// Total electrical demand of the facility.
    pub fn total_electric(&self) -> KilowattHours {
        self.electric.total()
    }
}
