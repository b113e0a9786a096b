use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `siteboard` binary.
#[derive(Debug, Parser)]
#[command(
    name = "siteboard",
    version,
    about = "Siteboard - construction site assignment dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw, csv
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API server root, overriding `client.base_url`
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API key, overriding `client.api_key`
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}
