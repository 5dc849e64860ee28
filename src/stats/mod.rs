//! Connection-state statistics: the fixed 13-key catalog and per-request snapshots.

mod aggregate;

pub use aggregate::StatAggregator;

use crate::collectors::TcpState;
use crate::namespace::{MetricMap, MetricValue};
use std::fmt;

/// One counter in the closed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    TcpEstablished,
    TcpSynSent,
    TcpSynRecv,
    TcpFinWait1,
    TcpFinWait2,
    TcpTimeWait,
    TcpClose,
    TcpCloseWait,
    TcpLastAck,
    TcpListen,
    TcpClosing,
    TcpNone,
    UdpSocket,
}

impl StatKey {
    pub const ALL: [StatKey; 13] = [
        StatKey::TcpEstablished,
        StatKey::TcpSynSent,
        StatKey::TcpSynRecv,
        StatKey::TcpFinWait1,
        StatKey::TcpFinWait2,
        StatKey::TcpTimeWait,
        StatKey::TcpClose,
        StatKey::TcpCloseWait,
        StatKey::TcpLastAck,
        StatKey::TcpListen,
        StatKey::TcpClosing,
        StatKey::TcpNone,
        StatKey::UdpSocket,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::TcpEstablished => "tcp_established",
            StatKey::TcpSynSent => "tcp_syn_sent",
            StatKey::TcpSynRecv => "tcp_syn_recv",
            StatKey::TcpFinWait1 => "tcp_fin_wait1",
            StatKey::TcpFinWait2 => "tcp_fin_wait2",
            StatKey::TcpTimeWait => "tcp_time_wait",
            StatKey::TcpClose => "tcp_close",
            StatKey::TcpCloseWait => "tcp_close_wait",
            StatKey::TcpLastAck => "tcp_last_ack",
            StatKey::TcpListen => "tcp_listen",
            StatKey::TcpClosing => "tcp_closing",
            StatKey::TcpNone => "tcp_none",
            StatKey::UdpSocket => "udp_socket",
        }
    }

    /// Counter for a TCP state; `None` for states outside the catalog.
    pub fn for_tcp_state(state: &TcpState) -> Option<StatKey> {
        let key = match state {
            TcpState::Established => StatKey::TcpEstablished,
            TcpState::SynSent => StatKey::TcpSynSent,
            TcpState::SynRecv => StatKey::TcpSynRecv,
            TcpState::FinWait1 => StatKey::TcpFinWait1,
            TcpState::FinWait2 => StatKey::TcpFinWait2,
            TcpState::TimeWait => StatKey::TcpTimeWait,
            TcpState::Close => StatKey::TcpClose,
            TcpState::CloseWait => StatKey::TcpCloseWait,
            TcpState::LastAck => StatKey::TcpLastAck,
            TcpState::Listen => StatKey::TcpListen,
            TcpState::Closing => StatKey::TcpClosing,
            TcpState::None => StatKey::TcpNone,
            TcpState::Unknown(_) => return None,
        };
        Some(key)
    }

    pub fn is_tcp(self) -> bool {
        self != StatKey::UdpSocket
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for every catalog key, computed fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatSnapshot {
    counts: [u64; 13],
}

impl StatSnapshot {
    pub(crate) fn increment(&mut self, key: StatKey) {
        self.counts[key.index()] += 1;
    }

    pub fn get(&self, key: StatKey) -> u64 {
        self.counts[key.index()]
    }

    /// Catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, u64)> + '_ {
        StatKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn tcp_total(&self) -> u64 {
        self.iter().filter(|(k, _)| k.is_tcp()).map(|(_, v)| v).sum()
    }

    pub fn udp_total(&self) -> u64 {
        self.get(StatKey::UdpSocket)
    }

    /// Single-level map keyed by metric name, the shape the resolver walks.
    pub fn to_map(&self) -> MetricMap {
        self.iter()
            .map(|(k, v)| (k.as_str().to_string(), MetricValue::Count(v)))
            .collect()
    }
}
