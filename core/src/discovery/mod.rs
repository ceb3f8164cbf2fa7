//! mDNS service discovery for finding the sender on the local network
//!
//! The sender advertises `_lancrypt._tcp` with the transfer code as the
//! instance name and the rendezvous port as the service port. The receiver
//! browses for that instance under a hard deadline and picks a usable IPv4
//! address out of the response.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio::time::Instant;

use crate::protocol::constants::{SERVICE_TYPE, TXT_RECORDS};
use crate::{Error, Result};

/// Handle to a published mDNS advertisement
pub struct DiscoveryPublisher {
    daemon: ServiceDaemon,
    fullname: String,
}

/// Advertise the transfer code on all interfaces.
///
/// `port` is the rendezvous port, not the data port; receivers learn the
/// data port from the rendezvous lookup.
pub fn publish(instance: &str, port: u16) -> Result<DiscoveryPublisher> {
    let daemon = ServiceDaemon::new().map_err(|e| Error::Discovery(e.to_string()))?;

    let host = format!(
        "{}.local.",
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "lancrypt".to_string())
    );

    let mut properties = HashMap::new();
    for (key, value) in TXT_RECORDS {
        properties.insert(key.to_string(), value.to_string());
    }

    let service = ServiceInfo::new(SERVICE_TYPE, instance, &host, (), port, properties)
        .map_err(|e| Error::Discovery(e.to_string()))?
        .enable_addr_auto();

    let fullname = service.get_fullname().to_string();
    daemon
        .register(service)
        .map_err(|e| Error::Discovery(e.to_string()))?;

    tracing::info!("published mDNS service {} on port {}", fullname, port);
    Ok(DiscoveryPublisher { daemon, fullname })
}

impl DiscoveryPublisher {
    /// Withdraw the advertisement and stop the responder.
    pub fn shutdown(self) {
        let _ = self.daemon.unregister(&self.fullname);
        let _ = self.daemon.shutdown();
    }
}

/// Browse for a sender advertising `instance`, for at most `timeout`.
///
/// Returns the chosen IPv4 address and the advertised (rendezvous) port.
pub async fn discover(instance: &str, timeout: Duration) -> Result<(Ipv4Addr, u16)> {
    let daemon = ServiceDaemon::new().map_err(|e| Error::Discovery(e.to_string()))?;
    let events = daemon
        .browse(SERVICE_TYPE)
        .map_err(|e| Error::Discovery(e.to_string()))?;

    let deadline = Instant::now() + timeout;
    let result = loop {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            break Err(timeout_error(instance));
        };

        match tokio::time::timeout(remaining, events.recv_async()).await {
            Err(_) => break Err(timeout_error(instance)),
            Ok(Err(e)) => break Err(Error::Discovery(format!("mDNS browse failed: {}", e))),
            Ok(Ok(ServiceEvent::ServiceResolved(info))) => {
                if !matches_instance(info.get_fullname(), instance) {
                    continue;
                }
                tracing::debug!("resolved {} at {:?}", info.get_fullname(), info.get_addresses());
                break pick_ipv4(info.get_addresses().iter().copied())
                    .map(|ip| (ip, info.get_port()));
            }
            Ok(Ok(_)) => continue,
        }
    };

    let _ = daemon.stop_browse(SERVICE_TYPE);
    let _ = daemon.shutdown();
    result
}

fn timeout_error(instance: &str) -> Error {
    Error::Discovery(format!(
        "could not find sender '{}' on the network (timeout)",
        instance
    ))
}

/// Fullnames look like `<instance>.<service type>`.
fn matches_instance(fullname: &str, instance: &str) -> bool {
    fullname
        .strip_prefix(instance)
        .and_then(|rest| rest.strip_prefix('.'))
        .map(|rest| rest == SERVICE_TYPE.trim_end_matches('.') || rest == SERVICE_TYPE)
        .unwrap_or(false)
}

/// Choose one IPv4 address from a response: prefer global unicast and
/// non-loopback, fall back to the first IPv4 seen.
fn pick_ipv4(addresses: impl Iterator<Item = IpAddr>) -> Result<Ipv4Addr> {
    let v4: Vec<Ipv4Addr> = addresses
        .filter_map(|addr| match addr {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .collect();

    v4.iter()
        .copied()
        .find(is_global_unicast)
        .or_else(|| v4.first().copied())
        .ok_or_else(|| Error::Discovery("found sender but it has no usable IPv4 address".to_string()))
}

fn is_global_unicast(ip: &Ipv4Addr) -> bool {
    !ip.is_unspecified()
        && !ip.is_loopback()
        && !ip.is_link_local()
        && !ip.is_multicast()
        && !ip.is_broadcast()
}
