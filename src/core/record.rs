use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{core::band::Band, quantity::power::Kilowatts};

/// Hourly demand of the facility, one per hour of the year.
///
/// The load is the average power over the hour, hence also the energy in kilowatt-hours.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HourlyRecord {
    pub timestamp: NaiveDateTime,
    pub electric_load: Kilowatts,
    pub thermal_load: Kilowatts,
    pub band: Band,
}
