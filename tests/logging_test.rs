//! Metric output lines as written by the agent binary.

use chrono::{TimeZone, Utc};
use netstat_agent::{
    logging::{MetricLine, StructuredLogger},
    namespace::Namespace,
    netstat::{Metric, HOST_TAG},
};
use std::collections::BTreeMap;

fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8(buf.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn metric_line_carries_namespace_value_and_host() {
    let mut tags = BTreeMap::new();
    tags.insert(HOST_TAG.to_string(), "node-1".to_string());
    let metric = Metric {
        namespace: Namespace::parse("staples/procfs/netstat/tcp_listen"),
        data: Some(4),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        tags,
    };

    let mut out = Vec::new();
    StructuredLogger::emit_json(&MetricLine::from_metric(&metric, 1), &mut out).unwrap();
    assert!(out.ends_with(b"\n"));

    let parsed = lines(&out);
    assert_eq!(parsed.len(), 1);
    let line = &parsed[0];
    assert_eq!(line["namespace"], "staples/procfs/netstat/tcp_listen");
    assert_eq!(line["value"], 4);
    assert_eq!(line["host"], "node-1");
    assert_eq!(line["version"], 1);
    assert_eq!(line["ts"], "2024-01-02T03:04:05+00:00");
    assert!(line.get("error").is_none());
}

#[test]
fn catalog_entry_without_data_or_host_omits_them() {
    let metric = Metric {
        namespace: Namespace::parse("staples/procfs/netstat/udp_socket"),
        data: None,
        timestamp: Utc::now(),
        tags: BTreeMap::new(),
    };

    let mut out = Vec::new();
    StructuredLogger::emit_json(&MetricLine::from_metric(&metric, 1), &mut out).unwrap();
    let line = &lines(&out)[0];
    assert_eq!(line["namespace"], "staples/procfs/netstat/udp_socket");
    assert!(line.get("value").is_none());
    assert!(line.get("host").is_none());
}

#[test]
fn failed_line_carries_error_only() {
    let mut out = Vec::new();
    let err = "Key does not exist in map {key bogus}";
    let line = MetricLine::failed("staples/procfs/netstat/bogus".into(), "2024-01-02T03:04:05+00:00".into(), err);
    StructuredLogger::emit_json(&line, &mut out).unwrap();
    StructuredLogger::emit_json(&line, &mut out).unwrap();

    let parsed = lines(&out);
    assert_eq!(parsed.len(), 2);
    let line = &parsed[0];
    assert_eq!(line["namespace"], "staples/procfs/netstat/bogus");
    assert_eq!(line["error"], err);
    for absent in ["value", "host", "version"] {
        assert!(line.get(absent).is_none(), "{} should be omitted", absent);
    }
}
