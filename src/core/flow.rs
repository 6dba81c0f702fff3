use derive_more::{Add, AddAssign, Sub};
use serde::Serialize;

use crate::quantity::Zero;

/// Energy exchanged with the outside of the site for a single carrier.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, Sub, AddAssign, Serialize)]
pub struct Flow<T> {
    /// Integration: demand exceeding self-generation, drawn from the grid or the boiler.
    pub import: T,

    /// Surplus: self-generation exceeding demand, sold to the grid or wasted as heat.
    pub export: T,
}

impl<T: Zero> Zero for Flow<T> {
    const ZERO: Self = Self { import: T::ZERO, export: T::ZERO };
}

impl<T: Copy + Zero + PartialOrd + std::ops::Sub<Output = T>> Flow<T> {
    /// Split the net balance of `demand` against `supply` into import and export.
    ///
    /// At most one side is non-zero; both are zero when demand exactly matches supply.
    pub fn net(demand: T, supply: T) -> Self {
        if demand > supply {
            Self { import: demand - supply, export: T::ZERO }
        } else {
            Self { import: T::ZERO, export: supply - demand }
        }
    }
}
