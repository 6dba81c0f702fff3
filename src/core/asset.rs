use serde::{Deserialize, Serialize};

use crate::{
    core::error::ConfigurationError,
    quantity::{
        energy::KilowattHours,
        power::Kilowatts,
        proportions::Efficiency,
        time::Hours,
    },
};

/// Combined heat and power unit running at constant nameplate output.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Chp {
    /// Nameplate electrical output `Pe`.
    pub electric_power: Kilowatts,

    /// Nameplate thermal output `Pt`.
    pub thermal_power: Kilowatts,

    pub electric_efficiency: Efficiency,
    pub thermal_efficiency: Efficiency,

    /// Number of operating hours, allocated to the hours with the highest electrical load.
    pub n_hours: usize,
}

impl Default for Chp {
    fn default() -> Self {
        Self {
            electric_power: Kilowatts(800.0),
            thermal_power: Kilowatts(970.0),
            electric_efficiency: Efficiency(0.39),
            thermal_efficiency: Efficiency(0.473),
            n_hours: 8760,
        }
    }
}

impl Chp {
    /// Electricity generated over the given operating time.
    pub fn electric_output(&self, operating_time: Hours) -> KilowattHours {
        self.electric_power * operating_time
    }

    /// Fuel primary energy needed to generate the given electricity.
    pub fn fuel_input(&self, electric_output: KilowattHours) -> KilowattHours {
        electric_output / self.electric_efficiency
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("chp.electric_power", self.electric_power.0),
            ("chp.thermal_power", self.thermal_power.0),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }
        for (name, value) in [
            ("chp.electric_efficiency", self.electric_efficiency),
            ("chp.thermal_efficiency", self.thermal_efficiency),
        ] {
            if !value.is_valid() {
                return Err(ConfigurationError::Efficiency { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_fuel_input() {
        let chp = Chp::default();
        let output = chp.electric_output(Hours(10.0));
        assert_abs_diff_eq!(output.0, 8000.0);
        assert_abs_diff_eq!(chp.fuel_input(output).0, 8000.0 / 0.39, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_efficiency() {
        let chp = Chp { electric_efficiency: Efficiency(1.5), ..Chp::default() };
        assert!(matches!(
            chp.validate(),
            Err(ConfigurationError::Efficiency { name: "chp.electric_efficiency", .. })
        ));
    }

    #[test]
    fn test_negative_power() {
        let chp = Chp { thermal_power: Kilowatts(-1.0), ..Chp::default() };
        assert!(chp.validate().is_err());
    }
}
