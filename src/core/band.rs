use std::{
    fmt::{Display, Formatter},
    ops::{Index, IndexMut},
};

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use derive_more::{Add, AddAssign};
use serde::{Deserialize, Serialize};

use crate::quantity::Zero;

/// Time-of-use tariff band.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// Peak hours: Monday to Friday, 07:00 to 19:00.
    F1,

    /// Shoulder hours: everything that is neither peak nor off-peak.
    F2,

    /// Off-peak hours: nights and Sundays.
    F3,
}

impl Band {
    pub const ALL: [Self; 3] = [Self::F1, Self::F2, Self::F3];

    /// Classify the hour starting at `timestamp` by the calendar rule.
    #[must_use]
    pub fn from_datetime(timestamp: NaiveDateTime) -> Self {
        let hour = timestamp.hour();
        match timestamp.weekday() {
            Weekday::Sun => Self::F3,
            _ if hour >= 23 || hour < 7 => Self::F3,
            Weekday::Sat => Self::F2,
            _ if hour < 19 => Self::F1,
            _ => Self::F2,
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::F1 => write!(f, "F1"),
            Self::F2 => write!(f, "F2"),
            Self::F3 => write!(f, "F3"),
        }
    }
}

/// One value per tariff band.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Serialize, Deserialize)]
pub struct BandMap<T> {
    pub f1: T,
    pub f2: T,
    pub f3: T,
}

impl<T: Zero> Zero for BandMap<T> {
    const ZERO: Self = Self { f1: T::ZERO, f2: T::ZERO, f3: T::ZERO };
}

impl<T> BandMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Band, &T)> {
        Band::ALL.into_iter().map(move |band| (band, &self[band]))
    }

    pub fn map<R>(&self, mut f: impl FnMut(Band, &T) -> R) -> BandMap<R> {
        BandMap { f1: f(Band::F1, &self.f1), f2: f(Band::F2, &self.f2), f3: f(Band::F3, &self.f3) }
    }
}

impl<T: Copy + std::iter::Sum> BandMap<T> {
    /// Sum over all bands.
    pub fn total(&self) -> T {
        [self.f1, self.f2, self.f3].into_iter().sum()
    }
}

impl<T> Index<Band> for BandMap<T> {
    type Output = T;

    fn index(&self, band: Band) -> &Self::Output {
        match band {
            Band::F1 => &self.f1,
            Band::F2 => &self.f2,
            Band::F3 => &self.f3,
        }
    }
}

impl<T> IndexMut<Band> for BandMap<T> {
    fn index_mut(&mut self, band: Band) -> &mut Self::Output {
        match band {
            Band::F1 => &mut self.f1,
            Band::F2 => &mut self.f2,
            Band::F3 => &mut self.f3,
        }
    }
}
