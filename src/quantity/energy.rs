quantity!(KilowattHours, via: f64, suffix: "kWh", precision: 0);

impl KilowattHours {
    /// Value in megawatt-hours, which is how the reports present annual energies.
    #[must_use]
    pub fn megawatt_hours(self) -> f64 {
        self.0 * 0.001
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::{power::Kilowatts, time::Hours};

    #[test]
    fn test_power_times_hours() {
        let energy = Kilowatts(400.0) * Hours(24.0);
        assert_abs_diff_eq!(energy.0, 9600.0);
        assert_abs_diff_eq!(energy.megawatt_hours(), 9.6);
    }

    #[test]
    fn test_ordering() {
        assert!(KilowattHours(1.0) < KilowattHours(2.0));
        assert_eq!(KilowattHours(1.0).max(KilowattHours(2.0)), KilowattHours(2.0));
    }

    #[test]
    fn test_sum() {
        let total: KilowattHours = [KilowattHours(1.0), KilowattHours(2.5)].into_iter().sum();
        assert_abs_diff_eq!(total.0, 3.5);
    }
}
