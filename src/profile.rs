use std::{fs::File, io::Read, ops::Deref, path::Path};

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::{
    core::{band::Band, error::DataShapeError, record::HourlyRecord},
    prelude::*,
    quantity::power::Kilowatts,
};

/// One year of hourly demand.
#[must_use]
#[derive(Clone, Debug)]
pub struct Profile(Vec<HourlyRecord>);

impl Profile {
    pub const N_HOURS: usize = 8760;

    pub fn try_new(records: Vec<HourlyRecord>) -> Result<Self, DataShapeError> {
        if records.len() != Self::N_HOURS {
            return Err(DataShapeError::ProfileLength {
                expected: Self::N_HOURS,
                actual: records.len(),
            });
        }
        validate_loads(&records)?;
        Ok(Self(records))
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open the profile `{}`", path.display()))?;
        let records = parse_records(file)
            .with_context(|| format!("failed to read the profile `{}`", path.display()))?;
        let profile = Self::try_new(records)?;
        info!(n_records = profile.len(), "loaded the profile");
        Ok(profile)
    }
}

impl Deref for Profile {
    type Target = [HourlyRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Loads must be finite and non-negative.
pub fn validate_loads(records: &[HourlyRecord]) -> Result<(), DataShapeError> {
    for (index, record) in records.iter().enumerate() {
        for (what, load) in
            [("electric load", record.electric_load), ("thermal load", record.thermal_load)]
        {
            if !load.is_finite() || load < Kilowatts::ZERO {
                return Err(DataShapeError::InvalidLoad { index, what });
            }
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct Row {
    #[serde(rename = "Tempo", alias = "time")]
    time: String,

    #[serde(rename = "Potenza Elettrica", alias = "electric_load")]
    electric_load: Kilowatts,

    #[serde(rename = "Potenza Termica", alias = "thermal_load")]
    thermal_load: Kilowatts,

    /// Derived from the timestamp when missing.
    #[serde(rename = "Fascia Oraria", alias = "band", default)]
    band: Option<Band>,
}

impl TryFrom<Row> for HourlyRecord {
    type Error = Error;

    fn try_from(row: Row) -> Result<Self> {
        let timestamp = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
            .into_iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&row.time, format).ok())
            .with_context(|| format!("invalid timestamp `{}`", row.time))?;
        Ok(Self {
            timestamp,
            electric_load: row.electric_load,
            thermal_load: row.thermal_load,
            band: row.band.unwrap_or_else(|| Band::from_datetime(timestamp)),
        })
    }
}

fn parse_records(reader: impl Read) -> Result<Vec<HourlyRecord>> {
    ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<Row>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(Error::from)
                .and_then(HourlyRecord::try_from)
                .with_context(|| format!("invalid row #{index}"))
        })
        .collect()
}
