//! Netstat agent entrypoint: stands in for the metrics host. Discovers the catalog once,
//! then runs a single collection cycle or a polling loop, writing one JSON line per metric to stdout.

use netstat_agent::{
    config::AgentConfig,
    collectors::ProcNetSource,
    logging::{MetricLine, StructuredLogger},
    namespace::Namespace,
    netstat::{NetstatCollector, PluginMeta},
};
use std::io::Write;
use std::time::Duration;
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn run_one_cycle(
    collector: &NetstatCollector<ProcNetSource>,
    catalog: &[Namespace],
    partial: bool,
    meta: &PluginMeta,
) -> Result<(), BoxError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if partial {
        let results = collector.collect_partial(catalog)?;
        for (ns, result) in catalog.iter().zip(&results) {
            match result {
                Ok(metric) => StructuredLogger::emit_json(&MetricLine::from_metric(metric, meta.version), &mut out)?,
                Err(e) => {
                    let msg = e.to_string();
                    let line = MetricLine::failed(ns.to_string(), chrono::Utc::now().to_rfc3339(), &msg);
                    StructuredLogger::emit_json(&line, &mut out)?;
                }
            }
        }
        info!(count = results.len(), "collected metrics");
    } else {
        let metrics = collector.collect(catalog)?;
        for metric in &metrics {
            StructuredLogger::emit_json(&MetricLine::from_metric(metric, meta.version), &mut out)?;
        }
        info!(count = metrics.len(), "collected metrics");
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let config_path = std::env::var("NETSTAT_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = AgentConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let meta = PluginMeta::default();
    info!(
        plugin = %meta.name,
        version = meta.version,
        proc_root = ?config.collection.proc_root,
        "netstat agent starting"
    );

    let source = ProcNetSource::new(config.collection.proc_root.clone());
    let collector = NetstatCollector::new(source, &config.namespace).with_host_tag();

    let catalog: Vec<Namespace> = collector
        .metric_types()?
        .into_iter()
        .map(|m| m.namespace)
        .collect();
    info!(metrics = catalog.len(), prefix = %collector.prefix(), "metric catalog discovered");

    let partial = config.collection.partial_results;
    let interval_secs = config.collection.interval_secs;

    if interval_secs > 0 {
        info!(interval_secs, "daemon mode (Ctrl+C to stop)");
        static STOP: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        let _ = ctrlc::set_handler(|| {
            STOP.store(true, std::sync::atomic::Ordering::Relaxed);
        });
        let mut cycle: u64 = 0;
        while !STOP.load(std::sync::atomic::Ordering::Relaxed) {
            cycle += 1;
            if let Err(e) = run_one_cycle(&collector, &catalog, partial, &meta) {
                tracing::warn!(cycle, error = %e, "cycle failed");
            }
            for _ in 0..interval_secs {
                if STOP.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        info!("netstat agent stopping");
    } else {
        run_one_cycle(&collector, &catalog, partial, &meta)?;
        info!("netstat agent cycle complete");
    }

    Ok(())
}
