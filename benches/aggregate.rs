//! Aggregation and collection benchmark: synthetic connection tables of host-like size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netstat_agent::collectors::{Connection, TcpState};
use netstat_agent::config::NamespaceConfig;
use netstat_agent::error::EnumerationError;
use netstat_agent::namespace::resolve;
use netstat_agent::netstat::NetstatCollector;
use netstat_agent::stats::{StatAggregator, StatKey};

fn make_connections(n: usize) -> Vec<Connection> {
    (0..n)
        .map(|i| match i % 5 {
            0 => Connection::udp(),
            1 => Connection::tcp(TcpState::Listen),
            2 => Connection::tcp(TcpState::TimeWait),
            3 => Connection::tcp(TcpState::Unknown("0C".to_string())),
            _ => Connection::tcp(TcpState::Established),
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let aggregator = StatAggregator::new();
    let conns = make_connections(10_000);

    c.bench_function("aggregate_10k_connections", |b| {
        b.iter(|| black_box(aggregator.aggregate(black_box(&conns))))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let map = StatAggregator::new().aggregate(&make_connections(1_000)).to_map();

    c.bench_function("resolve_single_segment", |b| {
        b.iter(|| black_box(resolve(&map, &[black_box("tcp_time_wait")])).unwrap())
    });
}

fn bench_collect_catalog(c: &mut Criterion) {
    let conns = make_connections(10_000);
    let source = || -> Result<Vec<Connection>, EnumerationError> { Ok(conns.clone()) };
    let collector = NetstatCollector::new(source, &NamespaceConfig::default());
    let catalog: Vec<_> = StatKey::ALL.iter().map(|k| collector.namespace_for(*k)).collect();

    c.bench_function("collect_full_catalog_10k", |b| {
        b.iter(|| black_box(collector.collect(&catalog)).unwrap())
    });
}

criterion_group!(benches, bench_aggregate, bench_resolve, bench_collect_catalog);
criterion_main!(benches);
