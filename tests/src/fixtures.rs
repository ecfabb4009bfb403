use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use serde_json::{Value, json};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A snapshot document on disk, removed on drop.
pub struct InventoryFile {
    path: PathBuf,
}

impl InventoryFile {
    pub fn write(document: &Value) -> anyhow::Result<Self> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("linkcheck-{}-{id}.json", std::process::id()));
        let text = serde_json::to_string_pretty(document)?;
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for InventoryFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub fn ping(success_rate: f64) -> Value {
    json!({ "ping": { "statistics": { "send": 5, "success_rate_percent": success_rate } } })
}

/// Two routers joined by 10.0.0.0/30, plus a second link on each and a LAN.
///
/// * R1 Gi0/0 10.0.0.1/30 → 10.0.0.2 answers 100%
/// * R1 Gi0/1 10.0.0.5/30 → 10.0.0.6 has no route
/// * R1 Gi0/2 192.168.1.1/24 is not probed
/// * R2 Gi0/0 10.0.0.2/30 → 10.0.0.1 answers 30%
/// * R2 Gi0/1 10.0.0.9/30 → 10.0.0.10 answers exactly 50%
/// * R2 Gi0/3 has a broken address and is skipped
pub fn lab() -> Value {
    json!({
        "devices": {
            "R1": {
                "commands": {
                    "show interfaces": {
                        "Gi0/0": { "ipv4": { "10.0.0.1/30": { "ip": "10.0.0.1", "prefix_length": "30" } } },
                        "Gi0/1": { "ipv4": { "10.0.0.5/30": { "ip": "10.0.0.5", "prefix_length": "30" } } },
                        "Gi0/2": { "ipv4": { "192.168.1.1/24": {} } },
                        "Lo0": {}
                    },
                    "ping 10.0.0.2": ping(100.0)
                },
                "errors": {
                    "ping 10.0.0.6": "% No route to host"
                }
            },
            "R2": {
                "commands": {
                    "show interfaces": {
                        "Gi0/0": { "ipv4": { "10.0.0.2/30": {} } },
                        "Gi0/1": { "ipv4": { "10.0.0.9/30": {} } },
                        "Gi0/3": { "ipv4": { "10.0.0.300/30": {} } }
                    },
                    "ping 10.0.0.1": ping(30.0),
                    "ping 10.0.0.10": ping(50.0)
                }
            }
        }
    })
}
