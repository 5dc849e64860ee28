//! Connection enumeration: OS-observed socket records and the sources that produce them.
//! Platform-specific implementations where needed; shared connection types.

mod network;

use crate::error::EnumerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

pub use network::ProcNetSource;

/// Transport protocol of an enumerated socket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Tcp,
    Udp,
    /// Anything else a source reports (raw, sctp, ...); never counted.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    Inet,
    Inet6,
}

/// TCP connection state as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcpState {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    None,
    /// State outside the known set, kept verbatim.
    Unknown(String),
}

impl TcpState {
    /// The twelve states that have a counter.
    pub const KNOWN: [TcpState; 12] = [
        TcpState::Established,
        TcpState::SynSent,
        TcpState::SynRecv,
        TcpState::FinWait1,
        TcpState::FinWait2,
        TcpState::TimeWait,
        TcpState::Close,
        TcpState::CloseWait,
        TcpState::LastAck,
        TcpState::Listen,
        TcpState::Closing,
        TcpState::None,
    ];

    /// Upper-case netstat name; `Unknown` returns the raw value.
    pub fn as_str(&self) -> &str {
        match self {
            TcpState::Established => "ESTABLISHED",
            TcpState::SynSent => "SYN_SENT",
            TcpState::SynRecv => "SYN_RECV",
            TcpState::FinWait1 => "FIN_WAIT1",
            TcpState::FinWait2 => "FIN_WAIT2",
            TcpState::TimeWait => "TIME_WAIT",
            TcpState::Close => "CLOSE",
            TcpState::CloseWait => "CLOSE_WAIT",
            TcpState::LastAck => "LAST_ACK",
            TcpState::Listen => "LISTEN",
            TcpState::Closing => "CLOSING",
            TcpState::None => "NONE",
            TcpState::Unknown(raw) => raw,
        }
    }

    /// Parse a netstat state name. Unrecognized names become `Unknown`.
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .unwrap_or_else(|| TcpState::Unknown(name.to_string()))
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One socket observed by a [`ConnectionSource`]. Not retained across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub transport: Transport,
    pub family: AddressFamily,
    /// Decoded for every transport; only meaningful for TCP.
    pub state: TcpState,
    pub local: Option<SocketAddr>,
    pub remote: Option<SocketAddr>,
}

impl Connection {
    pub fn tcp(state: TcpState) -> Self {
        Self {
            transport: Transport::Tcp,
            family: AddressFamily::Inet,
            state,
            local: None,
            remote: None,
        }
    }

    pub fn udp() -> Self {
        Self {
            transport: Transport::Udp,
            family: AddressFamily::Inet,
            state: TcpState::Close,
            local: None,
            remote: None,
        }
    }
}

/// Anything that can list the host's active sockets.
pub trait ConnectionSource {
    /// Full list of TCP and UDP sockets, all families and states. Order is insignificant.
    fn connections(&self) -> Result<Vec<Connection>, EnumerationError>;
}

impl<F> ConnectionSource for F
where
    F: Fn() -> Result<Vec<Connection>, EnumerationError>,
{
    fn connections(&self) -> Result<Vec<Connection>, EnumerationError> {
        self()
    }
}
