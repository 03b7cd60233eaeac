mod report;
mod runner;

pub use runner::resolve_options;

use self::report::{coordinate_labels, report_result, write_report};
use crate::config::{Args, Config};
use crate::io::{load_archive, setup_output};
use aat::{compute_aat, GaussianOverlap};
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::fs;
use tracing::info;

pub struct AatApplication {
    args: Args,
    config: Config,
}

impl AatApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded:\n{:?}", self.config);

        let path = self
            .args
            .snapshots
            .as_ref()
            .or(self.config.snapshots.as_ref())
            .ok_or_else(|| eyre!("No snapshot archive given; use --snapshots or 'snapshots:' in the config"))?;
        let archive = load_archive(path)?;
        let snapshots = archive.to_snapshots()?;

        let options = resolve_options(&self.args, &self.config)?;
        let result = compute_aat(&snapshots, &GaussianOverlap, &options)?;

        let labels = coordinate_labels(&archive)?;
        report_result(&result, &labels);

        if let Some(report) = self.args.report.as_ref().or(self.config.report.as_ref()) {
            write_report(report, &result, &labels)?;
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let Some(config_file) = &args.config_file else {
        return Ok(Config::default().with_defaults());
    };
    let config_content = fs::read_to_string(config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
