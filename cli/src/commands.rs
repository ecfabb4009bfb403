pub mod check;
pub mod interfaces;
pub mod plan;

use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use linkcheck_common::config::{Config, DEFAULT_THRESHOLD, LocalProbeConfig};
use linkcheck_common::error::ConfigError;

use crate::source::Source;

#[derive(Parser)]
#[command(name = "linkcheck")]
#[command(version)]
#[command(about = "Checks that every point-to-point link answers from both ends.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Links at or below this success rate (percent) fail
    #[arg(short, long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Verify SSH host keys when connecting to devices
    #[arg(long, global = true)]
    pub strict_host_key_checking: bool,

    /// Log every device command and its answer
    #[arg(long, global = true)]
    pub log_session: bool,

    /// Probe attempts per peer for the local prober
    #[arg(long, global = true, default_value_t = LocalProbeConfig::default().attempts)]
    pub attempts: u32,

    /// Per-attempt timeout of the local prober, in milliseconds
    #[arg(long, global = true, default_value_t = 1_000)]
    pub timeout_ms: u64,

    /// TCP port the local prober knocks on
    #[arg(long, global = true, default_value_t = LocalProbeConfig::default().port)]
    pub port: u16,

    /// Less output. Repeat to only print failures
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Debug logging. RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Snapshot JSON file, or `local` / `local:<name>` for this machine
    pub source: Source,

    /// Only these devices. Repeatable
    #[arg(short, long = "device", value_name = "NAME")]
    pub devices: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping the far end of every /30 link and report PASS or FAIL
    #[command(alias = "c")]
    Check(Selection),
    /// Show the interface table of each device
    #[command(alias = "i")]
    Interfaces {
        #[command(flatten)]
        selection: Selection,
        /// Print the structured `show interfaces` result as JSON
        #[arg(long)]
        raw: bool,
    },
    /// List the peers a check would ping, without pinging them
    #[command(alias = "p")]
    Plan(Selection),
}

impl Commands {
    pub fn selection(&self) -> &Selection {
        match self {
            Commands::Check(selection) | Commands::Plan(selection) => selection,
            Commands::Interfaces { selection, .. } => selection,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let cfg = Config {
            threshold: self.threshold,
            strict_host_key_checking: self.strict_host_key_checking,
            log_session: self.log_session,
            devices: self.command.selection().devices.clone(),
            quiet: self.quiet,
            no_banner: self.no_banner,
            local_probe: LocalProbeConfig {
                attempts: self.attempts,
                timeout: Duration::from_millis(self.timeout_ms),
                port: self.port,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
