//! # Probe models
//!
//! What gets probed ([`ProbeTarget`]), what a probe returns
//! ([`PingStatistics`]) and how the outcome is reported ([`LinkReport`]).

use std::fmt;
use std::net::Ipv4Addr;

use serde_json::Value;

use crate::error::ProbeError;
use crate::network::subnet::Subnet;

/// A peer address on a point-to-point link that must answer pings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Interface the link was found on.
    pub interface: String,
    /// Address bound locally on that interface.
    pub local: Ipv4Addr,
    pub subnet: Subnet,
    pub address: Ipv4Addr,
}

/// The statistics section of a structured ping result.
#[derive(Debug, Clone, PartialEq)]
pub struct PingStatistics {
    /// Percentage of answered packets, 0 to 100.
    pub success_rate: f64,
    pub sent: Option<u64>,
    pub received: Option<u64>,
}

impl PingStatistics {
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate,
            sent: None,
            received: None,
        }
    }

    /// Reads `ping.statistics` from a parsed ping command.
    pub fn from_parsed(value: &Value) -> Result<Self, ProbeError> {
        let statistics = value
            .get("ping")
            .and_then(|ping| ping.get("statistics"))
            .ok_or_else(|| ProbeError::MalformedResult("missing 'ping.statistics'".into()))?;

        let rate = statistics
            .get("success_rate_percent")
            .ok_or_else(|| ProbeError::MalformedResult("missing 'success_rate_percent'".into()))?;

        let success_rate = match rate {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
            _ => None,
        }
        .filter(|rate| (0.0..=100.0).contains(rate))
        .ok_or_else(|| ProbeError::MalformedResult(format!("invalid success rate {rate}")))?;

        Ok(Self {
            success_rate,
            sent: statistics.get("send").and_then(Value::as_u64),
            received: statistics.get("received").and_then(Value::as_u64),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Why a link failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailCause {
    BelowThreshold { success_rate: f64, threshold: f64 },
    Probe(ProbeError),
}

impl fmt::Display for FailCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailCause::BelowThreshold {
                success_rate,
                threshold,
            } => write!(
                f,
                "success rate {success_rate}% is not above threshold {threshold}%"
            ),
            FailCause::Probe(e) => write!(f, "General failure: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Pass { success_rate: f64 },
    Fail { cause: FailCause },
}

impl ProbeOutcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            ProbeOutcome::Pass { .. } => Verdict::Pass,
            ProbeOutcome::Fail { .. } => Verdict::Fail,
        }
    }
}

/// Result of checking one link: who, which interface, which peer and how it went.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkReport {
    pub device: String,
    pub interface: String,
    pub target: Ipv4Addr,
    pub outcome: ProbeOutcome,
}

impl LinkReport {
    pub fn verdict(&self) -> Verdict {
        self.outcome.verdict()
    }

    pub fn passed(&self) -> bool {
        self.verdict() == Verdict::Pass
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}: {}",
            self.device,
            self.interface,
            self.target,
            self.verdict()
        )?;
        match &self.outcome {
            ProbeOutcome::Pass { success_rate } => write!(f, " ({success_rate}%)"),
            ProbeOutcome::Fail { cause } => write!(f, " ({cause})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_success_rate() {
        let parsed = json!({
            "ping": {
                "address": "10.0.0.2",
                "statistics": { "send": 5, "received": 4, "success_rate_percent": 80.0 }
            }
        });
        let stats = PingStatistics::from_parsed(&parsed).unwrap();
        assert_eq!(stats.success_rate, 80.0);
        assert_eq!(stats.sent, Some(5));
        assert_eq!(stats.received, Some(4));
    }

    #[test]
    fn accepts_integer_and_string_rates() {
        let parsed = json!({ "ping": { "statistics": { "success_rate_percent": 100 } } });
        assert_eq!(PingStatistics::from_parsed(&parsed).unwrap().success_rate, 100.0);

        let parsed = json!({ "ping": { "statistics": { "success_rate_percent": "60%" } } });
        assert_eq!(PingStatistics::from_parsed(&parsed).unwrap().success_rate, 60.0);
    }

    #[test]
    fn rejects_missing_or_invalid_rate() {
        let missing = json!({ "ping": {} });
        assert!(matches!(
            PingStatistics::from_parsed(&missing),
            Err(ProbeError::MalformedResult(_))
        ));

        let out_of_range = json!({ "ping": { "statistics": { "success_rate_percent": 120 } } });
        assert!(matches!(
            PingStatistics::from_parsed(&out_of_range),
            Err(ProbeError::MalformedResult(_))
        ));
    }

    #[test]
    fn report_names_the_link() {
        let report = LinkReport {
            device: "R1".into(),
            interface: "Gi0/0".into(),
            target: Ipv4Addr::new(10, 0, 0, 2),
            outcome: ProbeOutcome::Fail {
                cause: FailCause::BelowThreshold {
                    success_rate: 30.0,
                    threshold: 50.0,
                },
            },
        };
        assert_eq!(
            report.to_string(),
            "R1 Gi0/0 -> 10.0.0.2: FAIL (success rate 30% is not above threshold 50%)"
        );
        assert_eq!(report.verdict(), Verdict::Fail);
    }

    #[test]
    fn probe_failures_read_as_general_failure() {
        let cause = FailCause::Probe(ProbeError::MalformedResult("empty".into()));
        assert_eq!(cause.to_string(), "General failure: malformed ping result: empty");
    }
}
