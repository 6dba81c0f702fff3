#[macro_use]
mod macros;

pub mod currency;
pub mod emissions;
pub mod energy;
pub mod power;
pub mod price;
pub mod proportions;
pub mod speed;
pub mod time;
pub mod volume;
mod zero;

pub use self::zero::Zero;
