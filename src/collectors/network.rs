//! Socket tables from procfs (`/proc/net/{tcp,tcp6,udp,udp6}`) via the `procfs` crate.
//! Linux only; other targets report unsupported.

use super::{Connection, ConnectionSource};
#[cfg(target_os = "linux")]
use super::{AddressFamily, TcpState, Transport};
use crate::error::EnumerationError;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
use procfs::net::{TcpNetEntries, TcpNetEntry, UdpNetEntries, UdpNetEntry, UdpState};
#[cfg(target_os = "linux")]
use procfs::FromReadSI;
#[cfg(target_os = "linux")]
use std::io;
#[cfg(target_os = "linux")]
use tracing::debug;

pub struct ProcNetSource {
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    proc_root: PathBuf,
}

impl Default for ProcNetSource {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcNetSource {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }
}

#[cfg(target_os = "linux")]
impl ProcNetSource {
    /// Open `<proc_root>/net/<name>` and parse it. `Ok(None)` when an IPv6 table is
    /// absent (kernel built without IPv6).
    fn read_table<T: FromReadSI>(&self, name: &str, family: AddressFamily) -> Result<Option<T>, EnumerationError> {
        let path = self.proc_root.join("net").join(name);
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound && family == AddressFamily::Inet6 => {
                debug!(path = %path.display(), "ipv6 table absent");
                return Ok(None);
            }
            Err(source) => return Err(EnumerationError::Io { path, source }),
        };
        T::from_read(file, procfs::current_system_info())
            .map(Some)
            .map_err(|e| EnumerationError::Parse {
                path,
                source: Box::new(e),
            })
    }

    fn read_tcp(&self, name: &str, family: AddressFamily, out: &mut Vec<Connection>) -> Result<(), EnumerationError> {
        if let Some(TcpNetEntries(entries)) = self.read_table::<TcpNetEntries>(name, family)? {
            debug!(table = name, count = entries.len(), "read socket table");
            out.extend(entries.iter().map(|e| tcp_connection(e, family)));
        }
        Ok(())
    }

    fn read_udp(&self, name: &str, family: AddressFamily, out: &mut Vec<Connection>) -> Result<(), EnumerationError> {
        if let Some(UdpNetEntries(entries)) = self.read_table::<UdpNetEntries>(name, family)? {
            debug!(table = name, count = entries.len(), "read socket table");
            out.extend(entries.iter().map(|e| udp_connection(e, family)));
        }
        Ok(())
    }
}

impl ConnectionSource for ProcNetSource {
    #[cfg(target_os = "linux")]
    fn connections(&self) -> Result<Vec<Connection>, EnumerationError> {
        let mut out = Vec::new();
        self.read_tcp("tcp", AddressFamily::Inet, &mut out)?;
        self.read_tcp("tcp6", AddressFamily::Inet6, &mut out)?;
        self.read_udp("udp", AddressFamily::Inet, &mut out)?;
        self.read_udp("udp6", AddressFamily::Inet6, &mut out)?;
        Ok(out)
    }

    #[cfg(not(target_os = "linux"))]
    fn connections(&self) -> Result<Vec<Connection>, EnumerationError> {
        Err(EnumerationError::Unsupported(format!(
            "no procfs socket tables on {}",
            std::env::consts::OS
        )))
    }
}

#[cfg(target_os = "linux")]
fn tcp_connection(entry: &TcpNetEntry, family: AddressFamily) -> Connection {
    Connection {
        transport: Transport::Tcp,
        family,
        state: map_tcp_state(&entry.state),
        local: Some(entry.local_address),
        remote: Some(entry.remote_address),
    }
}

#[cfg(target_os = "linux")]
fn udp_connection(entry: &UdpNetEntry, family: AddressFamily) -> Connection {
    let state = match entry.state {
        UdpState::Established => TcpState::Established,
        UdpState::Close => TcpState::Close,
        #[allow(unreachable_patterns)]
        _ => TcpState::Unknown(format!("{:?}", entry.state)),
    };
    Connection {
        transport: Transport::Udp,
        family,
        state,
        local: Some(entry.local_address),
        remote: Some(entry.remote_address),
    }
}

/// Kernel states outside the netstat set (e.g. `NewSynRecv`) keep their procfs name.
#[cfg(target_os = "linux")]
fn map_tcp_state(state: &procfs::net::TcpState) -> TcpState {
    match state {
        procfs::net::TcpState::Established => TcpState::Established,
        procfs::net::TcpState::SynSent => TcpState::SynSent,
        procfs::net::TcpState::SynRecv => TcpState::SynRecv,
        procfs::net::TcpState::FinWait1 => TcpState::FinWait1,
        procfs::net::TcpState::FinWait2 => TcpState::FinWait2,
        procfs::net::TcpState::TimeWait => TcpState::TimeWait,
        procfs::net::TcpState::Close => TcpState::Close,
        procfs::net::TcpState::CloseWait => TcpState::CloseWait,
        procfs::net::TcpState::LastAck => TcpState::LastAck,
        procfs::net::TcpState::Listen => TcpState::Listen,
        procfs::net::TcpState::Closing => TcpState::Closing,
        _ => TcpState::Unknown(format!("{:?}", state)),
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn maps_known_and_kernel_only_states() {
        assert_eq!(map_tcp_state(&procfs::net::TcpState::Listen), TcpState::Listen);
        assert_eq!(map_tcp_state(&procfs::net::TcpState::Close), TcpState::Close);
        assert_eq!(
            map_tcp_state(&procfs::net::TcpState::NewSynRecv),
            TcpState::Unknown("NewSynRecv".into())
        );
    }
}
