//! # Error kinds
//!
//! Every failure the link check can run into has its own type here, so that
//! recoverable conditions (a malformed interface, a failed probe) are never
//! confused with fatal ones (an inventory that cannot be loaded).

use thiserror::Error;

/// Structured interface data did not have the expected shape.
///
/// Recovered locally: the affected interface is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    #[error("interface table must be an object keyed by interface name")]
    NotATable,
    #[error("interface {interface}: '{field}' must be an object")]
    NotAnObject {
        interface: String,
        field: &'static str,
    },
    #[error("interface {interface}: missing '{field}'")]
    MissingField {
        interface: String,
        field: &'static str,
    },
    #[error("interface {interface}: invalid IPv4 address '{value}'")]
    InvalidAddress { interface: String, value: String },
    #[error("interface {interface}: invalid prefix length '{value}'")]
    InvalidPrefix { interface: String, value: String },
    #[error("interface {interface}: '{value}' is the network or broadcast address of its subnet")]
    NotAHostAddress { interface: String, value: String },
    #[error("prefix length {0} is not a valid IPv4 mask length")]
    PrefixOutOfRange(u32),
    #[error("{0} is the network or broadcast address of its subnet")]
    ReservedAddress(String),
}

/// A device (session + command parser) could not do what was asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{device} is not connected")]
    NotConnected { device: String },
    #[error("could not connect to {device}: {reason}")]
    ConnectFailed { device: String, reason: String },
    #[error("'{command}' is not supported by {device}")]
    Unsupported { device: String, command: String },
    #[error("'{command}' failed on {device}: {reason}")]
    Failed {
        device: String,
        command: String,
        reason: String,
    },
}

/// A single probe could not produce a success rate.
///
/// Recovered locally: the target is classified as failed and the sweep goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("malformed ping result: {0}")]
    MalformedResult(String),
}

/// One device could not be checked. The sweep reports it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Connect(CommandError),
    #[error("interface snapshot failed: {0}")]
    Snapshot(CommandError),
    #[error("interface snapshot unusable: {0}")]
    Shape(#[from] DataShapeError),
}

/// The inventory could not be produced. Always fatal to the run.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("could not read inventory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("inventory {path} is not valid: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("inventory {0} defines no devices")]
    Empty(String),
    #[error("device '{0}' is not in the inventory")]
    UnknownDevice(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold {0} must be between 0 and 100")]
    ThresholdOutOfRange(f64),
    #[error("at least one probe attempt is required")]
    NoAttempts,
    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,
}
