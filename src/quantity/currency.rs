quantity!(Euros, via: f64, suffix: "€", precision: 2);
