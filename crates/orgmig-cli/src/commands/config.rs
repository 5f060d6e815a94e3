//! Configuration inspection command

use clap::Args;
use orgmig_core::MigrationConfig;

#[derive(Debug, Args)]
pub struct ConfigArgs {}

pub fn execute(_args: ConfigArgs, config: &MigrationConfig) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
