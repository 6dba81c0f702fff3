use crate::quantity::energy::KilowattHours;

quantity!(
    /// Natural gas volume in standard cubic metres.
    CubicMetres, via: f64, suffix: "Sm³", precision: 0
);

quantity!(
    /// Lower heating value of a fuel.
    HeatingValue, via: f64, suffix: "kWh/Sm³", precision: 2
);

quantity!(
    /// Volume of fuel per unit of energy, such as a tax exemption allowance.
    SpecificVolume, via: f64, suffix: "Sm³/kWh", precision: 2
);

implement_div!(KilowattHours, HeatingValue, CubicMetres);
implement_mul!(KilowattHours, SpecificVolume, CubicMetres);
