use crate::quantity::{
    currency::Euros,
    energy::KilowattHours,
    power::Kilowatts,
    volume::CubicMetres,
};

quantity!(
    /// Energy tariff in euros per kilowatt-hour.
    KilowattHourPrice, via: f64, suffix: "€/kWh", precision: 4
);

quantity!(
    /// Demand charge in euros per kilowatt of committed power per month.
    KilowattMonthPrice, via: f64, suffix: "€/kW/month", precision: 2
);

quantity!(
    /// Natural gas price or excise in euros per standard cubic metre.
    CubicMetrePrice, via: f64, suffix: "€/Sm³", precision: 4
);

quantity!(
    /// Capital cost per kilowatt of installed capacity.
    KilowattPrice, via: f64, suffix: "€/kW", precision: 0
);

implement_mul!(KilowattHours, KilowattHourPrice, Euros);
implement_mul!(CubicMetres, CubicMetrePrice, Euros);
implement_mul!(Kilowatts, KilowattPrice, Euros);

impl KilowattMonthPrice {
    /// Annual demand charge for the given committed power.
    pub fn annual_charge(self, committed_power: Kilowatts) -> Euros {
        Euros(committed_power.0 * self.0 * 12.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_energy_charge() {
        assert_abs_diff_eq!((KilowattHours(1000.0) * KilowattHourPrice(0.169)).0, 169.0);
    }

    #[test]
    fn test_annual_charge() {
        let charge = KilowattMonthPrice(2.65).annual_charge(Kilowatts(100.0));
        assert_abs_diff_eq!(charge.0, 3180.0, epsilon = 1e-9);
    }
}
