use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::error::ConfigurationError,
    prelude::*,
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        power::Kilowatts,
        price::KilowattHourPrice,
        proportions::Efficiency,
        speed::MetresPerSecond,
        time::Hours,
    },
};

/// Turbine output over wind speed at hub height, linearly interpolated between the points.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerCurve(pub Vec<(MetresPerSecond, Kilowatts)>);

impl Default for PowerCurve {
    /// 4 MW class turbine.
    fn default() -> Self {
        Self(
            [
                (0.0, 0.0),
                (1.0, 0.0),
                (2.0, 0.0),
                (3.0, 25.0),
                (4.0, 159.0),
                (5.0, 356.0),
                (6.0, 645.0),
                (7.0, 1051.0),
                (8.0, 1859.0),
                (9.0, 2273.0),
                (10.0, 3016.0),
                (11.0, 3646.0),
                (12.0, 3971.0),
                (25.0, 4000.0),
            ]
            .into_iter()
            .map(|(speed, power)| (MetresPerSecond(speed), Kilowatts(power)))
            .collect(),
        )
    }
}

impl PowerCurve {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.0.is_empty() {
            return Err(ConfigurationError::PowerCurve("is empty"));
        }
        if self.0.iter().any(|(speed, power)| {
            !speed.is_finite() || !power.is_finite() || *power < Kilowatts::ZERO
        }) {
            return Err(ConfigurationError::PowerCurve("contains an invalid point"));
        }
        if self.0.iter().tuple_windows().any(|((lhs, _), (rhs, _))| lhs >= rhs) {
            return Err(ConfigurationError::PowerCurve("speeds must be strictly increasing"));
        }
        Ok(())
    }

    /// Output at the given speed, held constant outside the tabulated range.
    pub fn power_at(&self, speed: MetresPerSecond) -> Kilowatts {
        let Some(&(first_speed, first_power)) = self.0.first() else {
            return Kilowatts::ZERO;
        };
        if speed <= first_speed {
            return first_power;
        }
        self.0
            .iter()
            .tuple_windows()
            .find(|(_, (upper_speed, _))| speed <= *upper_speed)
            .map_or_else(
                || self.0.last().map_or(Kilowatts::ZERO, |(_, power)| *power),
                |(&(lower_speed, lower_power), &(upper_speed, upper_power))| {
                    let weight = (speed - lower_speed) / (upper_speed - lower_speed);
                    lower_power + (upper_power - lower_power) * weight
                },
            )
    }
}

/// Wind turbine and its site.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindTurbine {
    pub rated_power: Kilowatts,

    /// Hub height in metres.
    pub hub_height: f64,

    /// Wind shear exponent of the site, 0.34 above inhabited areas.
    pub shear_exponent: f64,

    /// Share of the time the turbine is available.
    pub availability: Efficiency,

    pub curve: PowerCurve,
}

impl Default for WindTurbine {
    fn default() -> Self {
        Self {
            rated_power: Kilowatts(4000.0),
            hub_height: 90.0,
            shear_exponent: 0.34,
            availability: Efficiency(0.85),
            curve: PowerCurve::default(),
        }
    }
}

impl WindTurbine {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.rated_power.is_finite() || self.rated_power <= Kilowatts::ZERO {
            return Err(ConfigurationError::NonPositive {
                name: "wind.rated_power",
                value: self.rated_power.0,
            });
        }
        if !self.hub_height.is_finite() || self.hub_height <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                name: "wind.hub_height",
                value: self.hub_height,
            });
        }
        if !self.shear_exponent.is_finite() || self.shear_exponent < 0.0 {
            return Err(ConfigurationError::Negative {
                name: "wind.shear_exponent",
                value: self.shear_exponent,
            });
        }
        if !self.availability.is_valid() {
            return Err(ConfigurationError::Efficiency {
                name: "wind.availability",
                value: self.availability,
            });
        }
        self.curve.validate()
    }

    /// Extrapolate the 10-metre speed to the hub height, rounded to whole metres per second.
    pub fn hub_speed(&self, speed_10m: MetresPerSecond) -> MetresPerSecond {
        MetresPerSecond((speed_10m.0 * (self.hub_height / 10.0).powf(self.shear_exponent)).round())
    }

    /// Hourly output for the 10-metre wind speeds.
    #[instrument(skip_all, fields(n_hours = speeds_10m.len()))]
    pub fn power_series(&self, speeds_10m: &[MetresPerSecond]) -> Vec<Kilowatts> {
        speeds_10m.iter().map(|speed| self.curve.power_at(self.hub_speed(*speed))).collect()
    }
}

/// Annuity factor of the levelised wind energy cost.
const ANNUITY_FACTOR: f64 = 12.5;

/// Annual yield of a wind turbine.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct WindProduction {
    pub rated_power: Kilowatts,

    /// Energy the turbine would produce when always available.
    pub produced: KilowattHours,

    /// Produced energy scaled by the availability.
    pub available: KilowattHours,

    /// Full-load equivalent hours.
    pub equivalent_hours: Hours,
}

impl WindProduction {
    pub fn new(turbine: &WindTurbine, power: &[Kilowatts]) -> Self {
        let produced: KilowattHours = power.iter().map(|power| *power * Hours::ONE).sum();
        let available = produced * turbine.availability.0;
        let production = Self {
            rated_power: turbine.rated_power,
            produced,
            available,
            equivalent_hours: available / turbine.rated_power,
        };
        info!(
            produced = %production.produced,
            equivalent_hours = %production.equivalent_hours,
            "evaluated the wind production",
        );
        production
    }

    /// Levelised cost of the wind energy, undefined without any production.
    #[must_use]
    pub fn unit_cost(&self, investment: Euros, maintenance: f64) -> Option<KilowattHourPrice> {
        (self.equivalent_hours > Hours::ZERO).then(|| {
            KilowattHourPrice(
                investment.0 * (1.0 + maintenance)
                    / self.rated_power.0
                    / (ANNUITY_FACTOR * self.equivalent_hours.0),
            )
        })
    }
}

#[derive(Deserialize)]
struct WindSpeedRow {
    #[serde(rename = "WS10m", alias = "wind_speed")]
    speed: MetresPerSecond,
}

/// Read the hourly 10-metre wind speeds.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_wind_speeds(path: &Path) -> Result<Vec<MetresPerSecond>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open the wind speeds `{}`", path.display()))?;
    let speeds = parse_wind_speeds(file)
        .with_context(|| format!("failed to read the wind speeds `{}`", path.display()))?;
    info!(n_hours = speeds.len(), "loaded the wind speeds");
    Ok(speeds)
}

fn parse_wind_speeds(reader: impl Read) -> Result<Vec<MetresPerSecond>> {
    ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<WindSpeedRow>()
        .enumerate()
        .map(|(index, row)| {
            let speed = row.with_context(|| format!("invalid row #{index}"))?.speed;
            ensure!(
                speed.is_finite() && speed >= MetresPerSecond::ZERO,
                "row #{index}: invalid wind speed {speed}",
            );
            Ok(speed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_interpolation() {
        let curve = PowerCurve::default();
        assert_eq!(curve.power_at(MetresPerSecond(0.0)), Kilowatts::ZERO);
        assert_eq!(curve.power_at(MetresPerSecond(4.0)), Kilowatts(159.0));
        assert_abs_diff_eq!(curve.power_at(MetresPerSecond(7.5)).0, 1455.0);
        assert_abs_diff_eq!(curve.power_at(MetresPerSecond(18.5)).0, 3985.5);
    }

    #[test]
    fn test_clamping() {
        let curve = PowerCurve::default();
        assert_eq!(curve.power_at(MetresPerSecond(-1.0)), Kilowatts::ZERO);
        assert_eq!(curve.power_at(MetresPerSecond(30.0)), Kilowatts(4000.0));
    }

    #[test]
    fn test_invalid_curve() {
        let curve = PowerCurve(vec![
            (MetresPerSecond(3.0), Kilowatts(10.0)),
            (MetresPerSecond(3.0), Kilowatts(20.0)),
        ]);
        assert_eq!(
            curve.validate(),
            Err(ConfigurationError::PowerCurve("speeds must be strictly increasing")),
        );
        assert!(PowerCurve(Vec::new()).validate().is_err());
        assert!(PowerCurve::default().validate().is_ok());
    }

    #[test]
    fn test_hub_speed() {
        let turbine = WindTurbine::default();
        // 5 × 9^0.34 ≈ 10.53:
        assert_eq!(turbine.hub_speed(MetresPerSecond(5.0)), MetresPerSecond(11.0));
        assert_eq!(turbine.hub_speed(MetresPerSecond(0.0)), MetresPerSecond(0.0));
    }

    #[test]
    fn test_production() {
        let turbine = WindTurbine::default();
        let power = [Kilowatts(4000.0), Kilowatts(2000.0), Kilowatts::ZERO, Kilowatts(2000.0)];
        let production = WindProduction::new(&turbine, &power);
        assert_abs_diff_eq!(production.produced.0, 8000.0);
        assert_abs_diff_eq!(production.available.0, 6800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(production.equivalent_hours.0, 1.7, epsilon = 1e-12);

        let unit_cost = production.unit_cost(Euros(4_000_000.0), 0.03).unwrap();
        let expected = 4_000_000.0 * 1.03 / 4000.0 / (12.5 * 1.7);
        assert_abs_diff_eq!(unit_cost.0, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_no_production() {
        let production = WindProduction::new(&WindTurbine::default(), &[Kilowatts::ZERO]);
        assert!(production.unit_cost(Euros(1.0), 0.03).is_none());
    }

    #[test]
    fn test_parse_wind_speeds() {
        let speeds = parse_wind_speeds("WS10m\n3.5\n 0.0\n12\n".as_bytes()).unwrap();
        assert_eq!(speeds, [MetresPerSecond(3.5), MetresPerSecond(0.0), MetresPerSecond(12.0)]);
        let speeds = parse_wind_speeds("wind_speed\n1.0\n".as_bytes()).unwrap();
        assert_eq!(speeds, [MetresPerSecond(1.0)]);
        assert!(parse_wind_speeds("WS10m\n-1.0\n".as_bytes()).is_err());
    }
}
