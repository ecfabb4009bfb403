use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use linkcheck_common::config::Config;
use linkcheck_common::device::{Inventory, InventoryLoader};
use linkcheck_core::inventory::local::LocalLoader;
use linkcheck_core::inventory::snapshot::SnapshotLoader;

const LOCAL_KEYWORD: &str = "local";

/// Where the devices come from: a snapshot document or this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local { name: Option<String> },
    Snapshot(PathBuf),
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("inventory source cannot be empty".into());
        }
        if s == LOCAL_KEYWORD {
            return Ok(Source::Local { name: None });
        }
        if let Some(name) = s.strip_prefix("local:") {
            if name.trim().is_empty() {
                return Err(format!("'{s}' is missing a device name"));
            }
            return Ok(Source::Local {
                name: Some(name.trim().to_string()),
            });
        }
        Ok(Source::Snapshot(PathBuf::from(s)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local { name: None } => f.write_str(LOCAL_KEYWORD),
            Source::Local { name: Some(name) } => write!(f, "{LOCAL_KEYWORD}:{name}"),
            Source::Snapshot(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// Loads the inventory and narrows it to the devices asked for.
    pub fn load(&self, cfg: &Config) -> anyhow::Result<Inventory> {
        let mut inventory = match self {
            Source::Local { name } => {
                LocalLoader::new(cfg.local_probe.clone()).load(name.as_deref().unwrap_or(""))
            }
            Source::Snapshot(path) => SnapshotLoader.load(&path.to_string_lossy()),
        }
        .with_context(|| format!("failed to load inventory from {self}"))?;

        inventory
            .select(&cfg.devices)
            .with_context(|| format!("invalid device selection for {self}"))?;
        Ok(inventory)
    }
}
