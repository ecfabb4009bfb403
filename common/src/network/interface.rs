//! # Interface table
//!
//! Converts the structured result of `show interfaces` into typed
//! [`InterfaceRecord`]s. The raw mapping stops here; nothing past this module
//! sees untyped data.
//!
//! Expected shape (one entry per interface, extra keys are ignored):
//!
//! ```json
//! {
//!   "GigabitEthernet0/0": {
//!     "ipv4": { "10.0.0.1/30": { "ip": "10.0.0.1", "prefix_length": "30" } }
//!   }
//! }
//! ```

use std::net::Ipv4Addr;

use serde_json::{Map, Value};

use crate::error::DataShapeError;
use crate::network::subnet::Ipv4Binding;

/// Key pyATS style parsers use for interfaces borrowing another interface's address.
const UNNUMBERED_KEY: &str = "unnumbered";

/// One interface of a device snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    pub name: String,
    pub ipv4: Option<Ipv4Binding>,
}

impl InterfaceRecord {
    pub fn new(name: impl Into<String>, ipv4: Option<Ipv4Binding>) -> Self {
        Self {
            name: name.into(),
            ipv4,
        }
    }

    /// Validates one interface entry of the parsed table.
    pub fn from_parsed(name: &str, details: &Value) -> Result<Self, DataShapeError> {
        let Some(details) = details.as_object() else {
            return Err(DataShapeError::NotAnObject {
                interface: name.to_string(),
                field: "interface",
            });
        };

        let ipv4 = match details.get("ipv4") {
            None | Some(Value::Null) => None,
            Some(ipv4) => binding_from_parsed(name, ipv4)?,
        };

        Ok(Self::new(name, ipv4))
    }
}

/// Interfaces of one device, in the order the parser listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    pub records: Vec<InterfaceRecord>,
    /// Interfaces whose IPv4 data could not be understood. They are skipped.
    pub rejected: Vec<DataShapeError>,
}

/// Validates a whole `show interfaces` result.
///
/// Only a top-level value that is not a table fails the call; problems with a
/// single interface land in [`InterfaceTable::rejected`].
pub fn parse_show_interfaces(value: &Value) -> Result<InterfaceTable, DataShapeError> {
    let Some(table) = value.as_object() else {
        return Err(DataShapeError::NotATable);
    };

    let mut interfaces = InterfaceTable::default();
    for (name, details) in table {
        match InterfaceRecord::from_parsed(name, details) {
            Ok(record) => interfaces.records.push(record),
            Err(e) => interfaces.rejected.push(e),
        }
    }
    Ok(interfaces)
}

fn binding_from_parsed(interface: &str, ipv4: &Value) -> Result<Option<Ipv4Binding>, DataShapeError> {
    let Some(entries) = ipv4.as_object() else {
        return Err(DataShapeError::NotAnObject {
            interface: interface.to_string(),
            field: "ipv4",
        });
    };

    // Secondary addresses follow the primary one; only the first entry counts.
    let Some((key, entry)) = entries.iter().next() else {
        return Ok(None);
    };

    if key == UNNUMBERED_KEY {
        return Ok(None);
    }

    if key.contains('/') {
        return binding_from_key(interface, key).map(Some);
    }

    let Some(entry) = entry.as_object() else {
        return Err(DataShapeError::NotAnObject {
            interface: interface.to_string(),
            field: "ipv4",
        });
    };
    binding_from_fields(interface, entry).map(Some)
}

fn binding_from_key(interface: &str, key: &str) -> Result<Ipv4Binding, DataShapeError> {
    let (ip_str, prefix_str) = key.split_once('/').unwrap_or((key, ""));
    let address = parse_address(interface, ip_str)?;
    let prefix_len = prefix_str
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid_prefix(interface, prefix_str))?;

    bind(interface, address, prefix_len, prefix_str)
}

fn binding_from_fields(interface: &str, entry: &Map<String, Value>) -> Result<Ipv4Binding, DataShapeError> {
    let ip = entry
        .get("ip")
        .ok_or_else(|| missing(interface, "ip"))?;
    let Some(ip_str) = ip.as_str() else {
        return Err(DataShapeError::InvalidAddress {
            interface: interface.to_string(),
            value: ip.to_string(),
        });
    };
    let address = parse_address(interface, ip_str)?;

    let prefix = entry
        .get("prefix_length")
        .ok_or_else(|| missing(interface, "prefix_length"))?;
    let prefix_len = prefix_len_from_value(prefix)
        .ok_or_else(|| invalid_prefix(interface, &prefix.to_string()))?;

    bind(interface, address, prefix_len, &prefix.to_string())
}

fn bind(interface: &str, address: Ipv4Addr, prefix_len: u32, raw_prefix: &str) -> Result<Ipv4Binding, DataShapeError> {
    Ipv4Binding::new(address, prefix_len).map_err(|e| match e {
        DataShapeError::ReservedAddress(value) => DataShapeError::NotAHostAddress {
            interface: interface.to_string(),
            value,
        },
        _ => invalid_prefix(interface, raw_prefix),
    })
}

/// Parsers disagree on whether prefix lengths are numbers or strings.
/// Integral floats such as `30.0` are accepted.
fn prefix_len_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(n) => u32::try_from(n).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
                .map(|f| f as u32),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_address(interface: &str, ip_str: &str) -> Result<Ipv4Addr, DataShapeError> {
    ip_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| DataShapeError::InvalidAddress {
            interface: interface.to_string(),
            value: ip_str.to_string(),
        })
}

fn missing(interface: &str, field: &'static str) -> DataShapeError {
    DataShapeError::MissingField {
        interface: interface.to_string(),
        field,
    }
}

fn invalid_prefix(interface: &str, value: &str) -> DataShapeError {
    DataShapeError::InvalidPrefix {
        interface: interface.to_string(),
        value: value.to_string(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
