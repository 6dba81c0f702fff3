use clap::Parser;

use crate::{
    core::asset::Chp,
    quantity::{power::Kilowatts, proportions::Efficiency},
};

/// CHP sizing overrides, applied on top of the scenario file.
#[derive(Copy, Clone, Parser)]
pub struct ChpArgs {
    /// Nameplate electrical output in kilowatts.
    #[clap(long = "electric-power", env = "CHP_ELECTRIC_POWER")]
    pub electric_power: Option<Kilowatts>,

    /// Nameplate thermal output in kilowatts.
    #[clap(long = "thermal-power", env = "CHP_THERMAL_POWER")]
    pub thermal_power: Option<Kilowatts>,

    #[clap(long = "electric-efficiency", env = "CHP_ELECTRIC_EFFICIENCY")]
    pub electric_efficiency: Option<Efficiency>,

    #[clap(long = "thermal-efficiency", env = "CHP_THERMAL_EFFICIENCY")]
    pub thermal_efficiency: Option<Efficiency>,

    /// Number of operating hours per year.
    #[clap(long = "n-hours", env = "CHP_HOURS")]
    pub n_hours: Option<usize>,
}

impl ChpArgs {
    pub fn apply_to(self, chp: &mut Chp) {
        if let Some(electric_power) = self.electric_power {
            chp.electric_power = electric_power;
        }
        if let Some(thermal_power) = self.thermal_power {
            chp.thermal_power = thermal_power;
        }
        if let Some(electric_efficiency) = self.electric_efficiency {
            chp.electric_efficiency = electric_efficiency;
        }
        if let Some(thermal_efficiency) = self.thermal_efficiency {
            chp.thermal_efficiency = thermal_efficiency;
        }
        if let Some(n_hours) = self.n_hours {
            chp.n_hours = n_hours;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args =
            ChpArgs::try_parse_from(["cogen", "--electric-power", "1200", "--n-hours", "4000"])
                .unwrap();
        let mut chp = Chp::default();
        args.apply_to(&mut chp);
        assert_eq!(chp.electric_power, Kilowatts(1200.0));
        assert_eq!(chp.n_hours, 4000);
        assert_eq!(chp.thermal_power, Chp::default().thermal_power);
    }
}
