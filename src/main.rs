#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod fmt;
mod prelude;
mod profile;
mod quantity;
mod scenario;
mod tables;
mod wind;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, evaluate, unit_cost},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Evaluate(args) => {
            evaluate(&args)?;
        }
        Command::UnitCost(args) => {
            unit_cost(&args)?;
        }
    }

    info!("done!");
    Ok(())
}
