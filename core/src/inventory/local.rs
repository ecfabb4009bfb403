//! # Local device
//!
//! Treats the machine running the tool as the only device of the inventory.
//! Interfaces come from the operating system; pings are TCP handshake
//! attempts, so no raw socket privileges are needed. A completed or refused
//! handshake both prove the peer answered.
//!
//! Handshakes run on the ambient tokio runtime, so `ping` must be issued from
//! a thread that may block on it (e.g. inside `spawn_blocking`).

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use linkcheck_common::config::LocalProbeConfig;
use linkcheck_common::device::{ConnectOptions, Device, Inventory, InventoryLoader};
use linkcheck_common::error::{CommandError, InventoryError};
use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use serde_json::{Map, Value, json};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tracing::debug;

use crate::inventory::log_command;
use crate::sweep::SHOW_INTERFACES;

pub const LOCAL_DEVICE_NAME: &str = "localhost";

pub struct LocalDevice {
    name: String,
    probe: LocalProbeConfig,
    connected: bool,
    log_session: bool,
}

impl LocalDevice {
    pub fn new(name: impl Into<String>, probe: LocalProbeConfig) -> Self {
        Self {
            name: name.into(),
            probe,
            connected: false,
            log_session: false,
        }
    }

    fn run(&self, command: &str) -> Result<Value, CommandError> {
        if command == SHOW_INTERFACES {
            return Ok(interfaces_to_parsed(&datalink::interfaces()));
        }

        if let Some(target) = command.strip_prefix("ping ") {
            let target = target.trim().parse::<Ipv4Addr>().map_err(|e| self.failed(command, e))?;
            return self.ping(command, target);
        }

        Err(CommandError::Unsupported {
            device: self.name.clone(),
            command: command.to_string(),
        })
    }

    fn ping(&self, command: &str, target: Ipv4Addr) -> Result<Value, CommandError> {
        let runtime = Handle::try_current().map_err(|e| self.failed(command, e))?;
        let addr = SocketAddr::new(IpAddr::V4(target), self.probe.port);
        let LocalProbeConfig { attempts, timeout, .. } = self.probe;

        let received = runtime.block_on(async move {
            let mut received: u32 = 0;
            for attempt in 1..=attempts {
                if handshake(addr, timeout).await {
                    received += 1;
                } else {
                    debug!("{target}: attempt {attempt} got no answer");
                }
            }
            received
        });

        Ok(ping_result(target, attempts, received))
    }

    fn failed(&self, command: &str, reason: impl ToString) -> CommandError {
        CommandError::Failed {
            device: self.name.clone(),
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// One TCP handshake. True when the peer accepted or refused it.
async fn handshake(addr: SocketAddr, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => true,
        Ok(Err(e)) => {
            debug!("{addr}: {e}");
            false
        }
        Err(_) => {
            debug!("{addr}: no handshake within {timeout:?}");
            false
        }
    }
}

impl Device for LocalDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self, options: &ConnectOptions) -> Result<(), CommandError> {
        self.log_session = options.log_stdout;
        self.connected = true;
        Ok(())
    }

    fn parse(&mut self, command: &str) -> Result<Value, CommandError> {
        if !self.connected {
            return Err(CommandError::NotConnected {
                device: self.name.clone(),
            });
        }

        let command = command.trim();
        let answer = self.run(command);
        if self.log_session {
            log_command(&self.name, command, &answer);
        }
        answer
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

/// Loads the local machine as a one-device inventory.
///
/// The source names the device; an empty source means [`LOCAL_DEVICE_NAME`].
#[derive(Debug, Default, Clone)]
pub struct LocalLoader {
    pub probe: LocalProbeConfig,
}

impl LocalLoader {
    pub fn new(probe: LocalProbeConfig) -> Self {
        Self { probe }
    }
}

impl InventoryLoader for LocalLoader {
    fn load(&self, source: &str) -> Result<Inventory, InventoryError> {
        let name = match source.trim() {
            "" => LOCAL_DEVICE_NAME,
            name => name,
        };
        let mut inventory = Inventory::new();
        inventory.insert(Box::new(LocalDevice::new(name, self.probe.clone())));
        Ok(inventory)
    }
}

/// Renders OS interfaces in the `show interfaces` shape.
pub fn interfaces_to_parsed(interfaces: &[NetworkInterface]) -> Value {
    let mut table = Map::new();

    for intf in interfaces {
        let mut ipv4 = Map::new();
        for net in &intf.ips {
            if let IpNetwork::V4(v4) = net {
                ipv4.insert(
                    format!("{}/{}", v4.ip(), v4.prefix()),
                    json!({ "ip": v4.ip().to_string(), "prefix_length": v4.prefix().to_string() }),
                );
            }
        }

        let mut entry = Map::new();
        entry.insert("enabled".into(), json!(intf.is_up()));
        if let Some(mac) = intf.mac {
            entry.insert("mac_address".into(), json!(mac.to_string()));
        }
        if !ipv4.is_empty() {
            entry.insert("ipv4".into(), Value::Object(ipv4));
        }
        table.insert(intf.name.clone(), Value::Object(entry));
    }

    Value::Object(table)
}

/// Renders handshake counts in the `ping` shape.
pub fn ping_result(target: Ipv4Addr, sent: u32, received: u32) -> Value {
    let success_rate = if sent == 0 {
        0.0
    } else {
        f64::from(received) * 100.0 / f64::from(sent)
    };

    json!({
        "ping": {
            "address": target.to_string(),
            "statistics": {
                "send": sent,
                "received": received,
                "success_rate_percent": success_rate,
            }
        }
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use linkcheck_common::network::interface::parse_show_interfaces;
    use linkcheck_common::probe::PingStatistics;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};
    use pnet::util::MacAddr;
    use std::net::Ipv6Addr;
    use tokio::net::TcpListener;

    fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.into(),
            description: "".into(),
            index,
            mac,
            ips: ips.to_vec(),
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
    }

    fn v6(s: &str, p: u8) -> IpNetwork {
        IpNetwork::V6(Ipv6Network::new(s.parse::<Ipv6Addr>().unwrap(), p).unwrap())
    }

    #[test]
    fn os_interfaces_render_as_interface_table() {
        let interfaces = vec![
            ni("lo", 1, Some(MacAddr::zero()), &[v4(127, 0, 0, 1, 8), v6("::1", 128)], 65609),
            ni(
                "eth0",
                2,
                Some(MacAddr::new(0x52, 0x54, 0x00, 0x12, 0x34, 0x56)),
                &[v4(10, 0, 0, 1, 30), v6("fe80::5054:ff:fe12:3456", 64)],
                69699,
            ),
            ni("veth1234", 3, None, &[v6("fe80::1a2b:3cff:fe4d:5e6f", 64)], 69699),
        ];

        let parsed = interfaces_to_parsed(&interfaces);
        assert_eq!(parsed["eth0"]["mac_address"], "52:54:00:12:34:56");

        let table = parse_show_interfaces(&parsed).unwrap();
        assert!(table.rejected.is_empty());
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[1].name, "eth0");
        assert_eq!(table.records[1].ipv4, Some("10.0.0.1/30".parse().unwrap()));
        assert_eq!(table.records[2].ipv4, None);
    }

    #[test]
    fn handshake_counts_render_as_ping_statistics() {
        let stats = PingStatistics::from_parsed(&ping_result(Ipv4Addr::new(10, 0, 0, 2), 5, 4)).unwrap();
        assert_eq!(stats.success_rate, 80.0);
        assert_eq!(stats.sent, Some(5));
        assert_eq!(stats.received, Some(4));

        let stats = PingStatistics::from_parsed(&ping_result(Ipv4Addr::new(10, 0, 0, 2), 0, 0)).unwrap();
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn loader_names_the_device() {
        let inventory = LocalLoader::default().load("").unwrap();
        assert_eq!(inventory.names().collect::<Vec<_>>(), [LOCAL_DEVICE_NAME]);

        let inventory = LocalLoader::default().load("edge-01").unwrap();
        assert_eq!(inventory.names().collect::<Vec<_>>(), ["edge-01"]);
    }

    #[test]
    fn rejects_unknown_commands_and_targets() {
        let mut device = LocalDevice::new("edge-01", LocalProbeConfig::default());
        assert!(matches!(
            device.parse("show interfaces"),
            Err(CommandError::NotConnected { .. })
        ));

        device.connect(&ConnectOptions::default()).unwrap();
        assert!(matches!(
            device.parse("show version"),
            Err(CommandError::Unsupported { .. })
        ));
        assert!(matches!(
            device.parse("ping not-an-ip"),
            Err(CommandError::Failed { .. })
        ));
    }

    fn loopback_device(port: u16) -> LocalDevice {
        let probe = LocalProbeConfig {
            attempts: 3,
            timeout: Duration::from_millis(500),
            port,
        };
        let mut device = LocalDevice::new("edge-01", probe);
        device.connect(&ConnectOptions::default()).unwrap();
        device
    }

    fn ping_loopback(port: u16) -> PingStatistics {
        let parsed = loopback_device(port).parse("ping 127.0.0.1").unwrap();
        PingStatistics::from_parsed(&parsed).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn listening_peer_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let stats = tokio::task::spawn_blocking(move || ping_loopback(port)).await.unwrap();
        assert_eq!(stats.success_rate, 100.0);
        assert_eq!(stats.sent, Some(3));
        assert_eq!(stats.received, Some(3));
        drop(listener);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn refusing_peer_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let stats = tokio::task::spawn_blocking(move || ping_loopback(port)).await.unwrap();
        assert_eq!(stats.success_rate, 100.0);
    }

    #[tokio::test]
    async fn silent_peer_does_not_answer() {
        // TEST-NET-1 is never routed.
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 443);
        assert!(!handshake(addr, Duration::from_millis(50)).await);
    }

    #[test]
    fn ping_needs_a_runtime() {
        let err = loopback_device(443).parse("ping 127.0.0.1").unwrap_err();
        assert!(matches!(err, CommandError::Failed { ref command, .. } if command == "ping 127.0.0.1"));
    }
}
