mod chp;
mod evaluate;
mod unit_cost;

use clap::{Parser, Subcommand};

pub use self::{evaluate::evaluate, unit_cost::unit_cost};
use crate::cli::{evaluate::EvaluateArgs, unit_cost::UnitCostArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: simulate the year and compare the proposed system against the reference one.
    #[clap(name = "evaluate")]
    Evaluate(Box<EvaluateArgs>),

    /// Net generation cost of one CHP kilowatt-hour.
    #[clap(name = "unit-cost")]
    UnitCost(Box<UnitCostArgs>),
}
