use crate::quantity::{energy::KilowattHours, power::Kilowatts};

quantity!(Hours, via: f64, suffix: "h", precision: 0);

impl Hours {
    /// Length of a single simulation step.
    pub const ONE: Self = Self(1.0);
}

implement_mul!(Kilowatts, Hours, KilowattHours);
implement_div!(KilowattHours, Hours, Kilowatts);
implement_div!(KilowattHours, Kilowatts, Hours);
