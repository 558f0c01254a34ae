//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use testhub_core::config::AppConfig;
use testhub_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => {
                println!("[store]");
                output::print_kv("seed_dir", &config.store.seed_dir);
                output::print_kv(
                    "simulated_latency_ms",
                    &config.store.simulated_latency_ms.to_string(),
                );
                println!("[state]");
                output::print_kv("provider", &config.state.provider);
                output::print_kv("file_path", &config.state.file_path);
                output::print_kv(
                    "memory.max_capacity",
                    &config.state.memory.max_capacity.to_string(),
                );
                println!("[logging]");
                output::print_kv("level", &config.logging.level);
                output::print_kv("format", &config.logging.format.to_string());
            }
        },
    }

    Ok(())
}
