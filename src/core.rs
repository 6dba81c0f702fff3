pub mod aggregate;
pub mod asset;
pub mod band;
pub mod baseline;
pub mod dispatch;
pub mod economics;
pub mod energy;
pub mod error;
pub mod evaluation;
pub mod flow;
pub mod record;
