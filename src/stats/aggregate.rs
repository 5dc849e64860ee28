//! Buckets enumerated connections into the closed stat catalog.

use super::{StatKey, StatSnapshot};
use crate::collectors::{Connection, Transport};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct StatAggregator;

impl StatAggregator {
    pub fn new() -> Self {
        Self
    }

    /// UDP sockets count once whatever state they carry. TCP sockets in a state
    /// outside the catalog, and other transports, are dropped without error.
    pub fn aggregate(&self, connections: &[Connection]) -> StatSnapshot {
        let mut snapshot = StatSnapshot::default();
        let mut dropped = 0usize;
        let mut ignored = 0usize;

        for conn in connections {
            match conn.transport {
                Transport::Udp => snapshot.increment(StatKey::UdpSocket),
                Transport::Tcp => match StatKey::for_tcp_state(&conn.state) {
                    Some(key) => snapshot.increment(key),
                    None => dropped += 1,
                },
                Transport::Other(_) => ignored += 1,
            }
        }

        debug!(
            total = connections.len(),
            tcp = snapshot.tcp_total(),
            udp = snapshot.udp_total(),
            dropped,
            ignored,
            "aggregated connections"
        );
        snapshot
    }
}
