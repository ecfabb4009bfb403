use colored::*;
use linkcheck_common::network::interface::InterfaceRecord;
use linkcheck_common::network::subnet::Ipv4Binding;
use linkcheck_common::probe::{LinkReport, ProbeOutcome, ProbeTarget, Verdict};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn verdict(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Pass => "PASS".color(colors::PASS).bold(),
        Verdict::Fail => "FAIL".color(colors::FAIL).bold(),
    }
}

pub fn binding(binding: &Ipv4Binding) -> String {
    format!(
        "{}{}",
        binding.address().to_string().color(colors::IPV4_ADDR),
        format!("/{}", binding.prefix_len()).color(colors::IPV4_PREFIX)
    )
}

/// `FAIL R1 Gi0/1 → 10.0.0.6 General failure: ...`
pub fn report_line(report: &LinkReport) -> String {
    let detail: ColoredString = match &report.outcome {
        ProbeOutcome::Pass { success_rate } => format!("({success_rate}%)").color(colors::TEXT_DEFAULT),
        ProbeOutcome::Fail { cause } => cause.to_string().color(colors::FAIL),
    };

    format!(
        "{} {} {} {} {} {}",
        verdict(report.verdict()),
        report.device.color(colors::PRIMARY),
        report.interface.color(colors::ACCENT),
        "→".color(colors::SEPARATOR),
        report.target.to_string().color(colors::IPV4_ADDR),
        detail
    )
}

pub fn interface_to_detail(record: &InterfaceRecord) -> Detail {
    let value: ColoredString = match &record.ipv4 {
        Some(b) if b.subnet().is_point_to_point() => {
            format!("{} {}", binding(b), "point-to-point".color(colors::ACCENT)).normal()
        }
        Some(b) => binding(b).normal(),
        None => "no IPv4 address".dimmed(),
    };
    (record.name.clone(), value)
}

pub fn target_to_detail(target: &ProbeTarget) -> Detail {
    let value: String = format!(
        "{} {} {} {}",
        target.local.to_string().color(colors::IPV4_ADDR),
        "→".color(colors::SEPARATOR),
        target.address.to_string().color(colors::IPV4_ADDR),
        format!("({})", target.subnet).color(colors::SEPARATOR)
    );
    (target.interface.clone(), value.normal())
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
    use linkcheck_common::error::ProbeError;
    use linkcheck_common::probe::FailCause;
    use std::net::Ipv4Addr;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn report_line_names_device_interface_and_target() {
        colored::control::set_override(false);
        let report = LinkReport {
            device: "R1".into(),
            interface: "Gi0/0".into(),
            target: Ipv4Addr::new(10, 0, 0, 2),
            outcome: ProbeOutcome::Fail {
                cause: FailCause::Probe(ProbeError::MalformedResult("no reply".into())),
            },
        };

        assert_eq!(
            plain(&report_line(&report)),
            "FAIL R1 Gi0/0 → 10.0.0.2 General failure: malformed ping result: no reply"
        );
    }

    #[test]
    fn passing_line_shows_rate() {
        colored::control::set_override(false);
        let report = LinkReport {
            device: "R1".into(),
            interface: "Gi0/0".into(),
            target: Ipv4Addr::new(10, 0, 0, 2),
            outcome: ProbeOutcome::Pass { success_rate: 80.0 },
        };
        assert_eq!(plain(&report_line(&report)), "PASS R1 Gi0/0 → 10.0.0.2 (80%)");
    }

    #[test]
    fn interfaces_are_tagged() {
        colored::control::set_override(false);
        let p2p = InterfaceRecord::new("Gi0/0", Some("10.0.0.1/30".parse().unwrap()));
        let lan = InterfaceRecord::new("Gi0/1", Some("192.168.1.1/24".parse().unwrap()));
        let bare = InterfaceRecord::new("Lo0", None);

        assert_eq!(plain(&interface_to_detail(&p2p).1), "10.0.0.1/30 point-to-point");
        assert_eq!(plain(&interface_to_detail(&lan).1), "192.168.1.1/24");
        assert_eq!(plain(&interface_to_detail(&bare).1), "no IPv4 address");
    }
}
