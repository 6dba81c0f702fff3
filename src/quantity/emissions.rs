use crate::quantity::energy::KilowattHours;

quantity!(
    /// Mass of emitted carbon dioxide.
    Kilograms, via: f64, suffix: "kg CO₂", precision: 0
);

quantity!(
    /// Carbon dioxide emitted per kilowatt-hour.
    EmissionFactor, via: f64, suffix: "kg/kWh", precision: 2
);

implement_mul!(KilowattHours, EmissionFactor, Kilograms);

impl Kilograms {
    #[must_use]
    pub fn tonnes(self) -> f64 {
        self.0 * 0.001
    }
}
