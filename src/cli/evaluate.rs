use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::chp::ChpArgs,
    core::evaluation::Evaluator,
    prelude::*,
    profile::Profile,
    scenario::Scenario,
    tables::build_report,
    wind::read_wind_speeds,
};

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Hourly load profile CSV with exactly 8760 rows.
    #[clap(long = "profile", env = "PROFILE_PATH")]
    pub profile_path: PathBuf,

    /// Scenario TOML, every omitted parameter takes its default value.
    #[clap(long = "scenario", env = "SCENARIO_PATH")]
    pub scenario_path: Option<PathBuf>,

    /// Hourly 10-metre wind speed CSV, enables the wind turbine.
    #[clap(long = "wind-speeds", env = "WIND_SPEEDS_PATH")]
    pub wind_speeds_path: Option<PathBuf>,

    #[clap(flatten)]
    pub chp: ChpArgs,

    /// Print the evaluation as JSON instead of tables.
    #[clap(long)]
    pub json: bool,
}

#[instrument(skip_all)]
pub fn evaluate(args: &EvaluateArgs) -> Result {
    let mut scenario = match &args.scenario_path {
        Some(path) => Scenario::read_from(path)?,
        None => Scenario::default(),
    };
    args.chp.apply_to(&mut scenario.chp);

    let profile = Profile::read_from(&args.profile_path)?;
    let wind_speeds = args.wind_speeds_path.as_deref().map(read_wind_speeds).transpose()?;

    let evaluation = Evaluator::builder()
        .records(&profile)
        .scenario(&scenario)
        .maybe_wind_speeds(wind_speeds.as_deref())
        .evaluate()
        .context("failed to evaluate the scenario")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        for table in build_report(&evaluation) {
            println!("{table}");
        }
    }
    Ok(())
}
