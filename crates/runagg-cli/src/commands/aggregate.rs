use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use runagg_pipeline::{aggregate, AggregateLayout, SamplingMode, SamplingPolicy};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    Interval,
    Total,
}

impl From<Units> for SamplingMode {
    fn from(units: Units) -> Self {
        match units {
            Units::Interval => SamplingMode::Interval,
            Units::Total => SamplingMode::Total,
        }
    }
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Base output directories holding one folder per replicate.
    #[arg(long = "data-dir", value_name = "DIR", required = true, num_args = 1..)]
    pub data_dirs: Vec<PathBuf>,
    /// Directory receiving the aggregated tables; created if absent.
    #[arg(long, default_value = ".")]
    pub dump: PathBuf,
    /// Unit for the time-series resolution.
    #[arg(long, value_enum, default_value_t = Units::Interval)]
    pub units: Units,
    /// Time-series resolution; must be at least 1.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub resolution: i64,
    /// YAML layout overriding log locations and field allow-lists.
    #[arg(long)]
    pub layout: Option<PathBuf>,
}

pub fn run(args: &AggregateArgs) -> Result<(), Box<dyn Error>> {
    let policy = SamplingPolicy::new(args.units.into(), args.resolution)?;
    let layout = match &args.layout {
        Some(path) => AggregateLayout::from_yaml_path(path)?,
        None => AggregateLayout::default(),
    };
    aggregate(&args.data_dirs, &args.dump, layout, policy)?;
    Ok(())
}
