use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use scanr_common::config::ScanConfig;
use scanr_common::network::report::ScanReport;
use scanr_common::network::target::load_host_file;
use scanr_core::network::icmp::PingProber;
use scanr_core::network::tcp::{HandshakeProber, TcpConnectProber};
use scanr_core::scanner::resolver::{DisabledResolver, ReverseDnsResolver};
use scanr_core::{LivenessProber, NameResolver, Orchestrator, StopSignal};
use tracing::{Instrument, info_span, warn};

use crate::commands::{Liveness, ScanArgs};
use crate::output;
use crate::terminal::{colors, format, print, progress};

pub async fn scan(args: ScanArgs, quiet: u8) -> anyhow::Result<()> {
    let hosts = load_host_file(&args.hosts_file)?;
    let cfg: ScanConfig = args.to_config(hosts, quiet);
    cfg.validate().context("invalid scan configuration")?;

    print_plan(&args, &cfg);

    let span = info_span!("scan", indicatif.pb_show = true);
    progress::start_host_progress(&span, cfg.hosts.len());

    let orchestrator = build_orchestrator(args.liveness, &cfg)
        .on_host_done(progress::host_done_callback(span.clone()));
    let stop: StopSignal = orchestrator.stop_signal().clone();
    let interrupt_watcher = tokio::spawn(interrupt_on_ctrl_c(stop.clone()));

    let start_time: Instant = Instant::now();
    let report: ScanReport = orchestrator.orchestrate(&cfg).instrument(span.clone()).await?;
    interrupt_watcher.abort();
    drop(span);

    scan_ends(&report, start_time.elapsed(), stop.is_triggered(), &cfg);

    if let Some(path) = &cfg.output {
        output::write_report(path, &report)?;
    }
    Ok(())
}

fn build_orchestrator(liveness: Liveness, cfg: &ScanConfig) -> Orchestrator {
    let liveness: Arc<dyn LivenessProber> = match liveness {
        Liveness::Icmp => Arc::new(PingProber::new(cfg.ping_timeout)),
        Liveness::Tcp => Arc::new(HandshakeProber::new(cfg.ping_timeout)),
    };
    let resolver: Arc<dyn NameResolver> = match cfg.no_dns {
        true => Arc::new(DisabledResolver),
        false => Arc::new(ReverseDnsResolver::new()),
    };
    Orchestrator::new(liveness, resolver, Arc::new(TcpConnectProber))
}

async fn interrupt_on_ctrl_c(stop: StopSignal) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, stopping after the probes in flight");
        stop.trigger();
    }
}

fn print_plan(args: &ScanArgs, cfg: &ScanConfig) {
    if cfg.quiet > 0 {
        return;
    }

    let mut rows: Vec<(&str, String)> = vec![
        ("Hosts", cfg.hosts.len().to_string()),
        ("Ports", cfg.port_range.to_string()),
        ("Workers", cfg.worker_budget.to_string()),
        ("Liveness", format!("{:?}", args.liveness).to_lowercase()),
    ];
    if let Some(path) = &cfg.output {
        rows.push(("Output", path.display().to_string()));
    }
    print::scan_plan(&rows);
}

fn scan_ends(report: &ScanReport, total_time: Duration, interrupted: bool, cfg: &ScanConfig) {
    if report.online_count() == 0 {
        no_hosts_online(cfg);
    } else {
        if cfg.quiet > 0 {
            print::blank();
        }
        print::header("scan results", cfg.quiet);
        print_hosts(report, cfg);
    }

    print_summary(report, total_time, interrupted, cfg);
}

fn no_hosts_online(cfg: &ScanConfig) {
    print::header("ZERO HOSTS ONLINE", cfg.quiet);
    if cfg.quiet < 2 {
        print::no_hosts_online();
    }
}

fn print_hosts(report: &ScanReport, cfg: &ScanConfig) {
    if cfg.quiet > 1 {
        return;
    }

    for (idx, (host, record)) in report.iter().enumerate() {
        print::host_tree(idx, host.as_str(), &format::record_to_details(record));
        if idx + 1 != report.len() {
            print::blank();
        }
    }
}

fn print_summary(report: &ScanReport, total_time: Duration, interrupted: bool, cfg: &ScanConfig) {
    let online: ColoredString =
        format!("{}/{} hosts online", report.online_count(), report.len()).bold().green();
    let ports: ColoredString = format!("{} open ports", report.open_port_count()).bold().cyan();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let verb: &str = match interrupted {
        true => "Scan Interrupted",
        false => "Scan Complete",
    };
    let output: ColoredString =
        format!("{verb}: {online}, {ports} in {total_time}").color(colors::TEXT_DEFAULT);
    print::summary(&output.to_string(), cfg.quiet);
}
