use std::time::Duration;

use crate::error::ConfigError;

/// Success rate (percent) a link must exceed to pass.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Settings of the TCP handshake prober used for the local machine.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalProbeConfig {
    /// Handshake attempts per target; the success rate is computed over these.
    pub attempts: u32,
    pub timeout: Duration,
    pub port: u16,
}

impl Default for LocalProbeConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            timeout: Duration::from_millis(1_000),
            port: 443,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Links with a success rate at or below this value fail.
    pub threshold: f64,
    /// Keeps host key verification on for SSH based connections.
    ///
    /// Disabled by default; lab devices are rebuilt too often for known_hosts to be useful.
    pub strict_host_key_checking: bool,
    /// Logs every command sent to a device together with its answer.
    pub log_session: bool,
    /// Restricts the sweep to these device names. Empty means every device.
    pub devices: Vec<String>,
    pub quiet: u8,
    pub no_banner: bool,
    pub local_probe: LocalProbeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strict_host_key_checking: false,
            log_session: false,
            devices: Vec::new(),
            quiet: 0,
            no_banner: false,
            local_probe: LocalProbeConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if self.local_probe.attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.local_probe.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
