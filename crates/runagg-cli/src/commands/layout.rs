use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use runagg_pipeline::AggregateLayout;

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Write the layout to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &LayoutArgs) -> Result<(), Box<dyn Error>> {
    let yaml = serde_yaml::to_string(&AggregateLayout::default())?;
    match &args.out {
        Some(path) => {
            fs::write(path, yaml)?;
            info!("Wrote default layout to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
