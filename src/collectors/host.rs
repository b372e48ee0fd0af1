use crate::collectors::{round2, run_capture, CollectorError};
use crate::report::{HostSnapshot, MemoryLoad};
use std::net::IpAddr;
use sysinfo::{System, SystemExt};
use tracing::debug;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Reads static host facts. The kernel name comes from `uname -s`; if that
/// command cannot be run the whole inspection fails and the run aborts
/// without a report.
pub async fn inspect(system: &System) -> Result<HostSnapshot, CollectorError> {
    let kernel_name = run_capture("uname", &["-s"], false).await?.trim().to_string();

    Ok(HostSnapshot {
        hostname: system
            .host_name()
            .unwrap_or_else(|| "unknown".to_string()),
        ip_address: primary_ipv4(),
        os_type: system.name().unwrap_or_else(|| "unknown".to_string()),
        os_platform: std::env::consts::OS.to_string(),
        os_release: system
            .os_version()
            .unwrap_or_else(|| "unknown".to_string()),
        kernel_name,
        username: current_username(),
    })
}

/// Memory totals in GiB plus the 1-minute load average.
pub fn memory_load(system: &mut System) -> MemoryLoad {
    system.refresh_memory();
    let load = system.load_average();

    MemoryLoad {
        total_gb: round2(system.total_memory() as f64 / GIB),
        free_gb: round2(system.free_memory() as f64 / GIB),
        load_one: load.one,
    }
}

fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn primary_ipv4() -> String {
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => first_external_ipv4(interfaces.into_iter().map(|(_, addr)| addr)),
        Err(err) => {
            debug!(error = %err, "could not enumerate network interfaces");
            "N/A".to_string()
        }
    }
}

/// First non-loopback IPv4 address in enumeration order, or `"N/A"`.
fn first_external_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> String {
    addrs
        .into_iter()
        .find_map(|addr| match addr {
            IpAddr::V4(v4) if !v4.is_loopback() => Some(v4.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    #[test]
    fn no_interfaces_yields_na() {
        assert_eq!(first_external_ipv4(Vec::new()), "N/A");
    }

    #[test]
    fn loopback_only_yields_na() {
        let addrs = vec![
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
        ];
        assert_eq!(first_external_ipv4(addrs), "N/A");
    }

    #[test]
    fn first_external_address_wins() {
        let addrs = vec![
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
        ];
        assert_eq!(first_external_ipv4(addrs), "10.0.0.7");
    }

    #[test]
    fn ipv6_addresses_are_skipped() {
        let addrs = vec![IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1))];
        assert_eq!(first_external_ipv4(addrs), "N/A");
    }
}
