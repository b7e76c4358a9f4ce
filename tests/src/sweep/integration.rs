#![cfg(test)]
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use chrono::NaiveDate;
use pingr_common::config::Config;
use pingr_common::network::subnet::Subnet;
use pingr_common::network::target::{self, Target};
use pingr_common::probe::ReachabilityProbe;
use pingr_common::progress::ProgressEvent;
use pingr_common::scan::ScanSession;
use pingr_core::output::CsvResultSink;
use pingr_core::progress::SilentProgress;
use pingr_core::sweep::SweepService;
use tempfile::TempDir;

use crate::fakes::{
    FailingProbe, RecordingProgress, RefusingSink, ScriptedProbe, StopAfterFirstSubnet,
};

fn test_config(dir: &Path) -> Config {
    Config {
        workers: 4,
        pacing: Duration::ZERO,
        output_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

fn sink(dir: &Path) -> CsvResultSink {
    CsvResultSink::new(dir).with_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
}

fn subnet(cidr: &str) -> Subnet {
    cidr.parse().unwrap()
}

async fn sweep_with(
    probe: impl ReachabilityProbe + 'static,
    subnets: Vec<Subnet>,
    dir: &Path,
) -> ScanSession {
    let cfg = test_config(dir);
    let service = SweepService::new(
        Arc::new(probe),
        Box::new(SilentProgress),
        Box::new(sink(dir)),
        &cfg,
    );
    service.run(subnets, &AtomicBool::new(false)).await
}

/// A /30 with one answering host ends up as two ordered rows and a 1 of 2 summary.
#[tokio::test]
async fn sweep_single_subnet_writes_ordered_rows() {
    let dir = TempDir::new().unwrap();
    let probe = ScriptedProbe::new([Ipv4Addr::new(192, 168, 1, 1)]);

    let session = sweep_with(probe, vec![subnet("192.168.1.0/30")], dir.path()).await;

    assert_eq!(session.total_addresses(), 2);
    assert_eq!(session.total_reachable(), 1);
    assert!(!session.interrupted);

    let written: Vec<_> = session.written().collect();
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0],
        &dir.path().join("15JUN2025_ping results_192.168.1.0_30.csv")
    );

    let contents = fs::read_to_string(written[0]).unwrap();
    assert_eq!(
        contents,
        "IP Address,Reachable\n192.168.1.1,true\n192.168.1.2,false\n"
    );
}

#[tokio::test]
async fn failing_probe_still_produces_a_complete_file() {
    let dir = TempDir::new().unwrap();

    let session = sweep_with(FailingProbe, vec![subnet("10.0.0.0/29")], dir.path()).await;

    assert_eq!(session.total_addresses(), 6);
    assert_eq!(session.total_reachable(), 0);

    let path = session.written().next().expect("file for 10.0.0.0/29");
    let contents = fs::read_to_string(path).unwrap();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|row| row.ends_with(",false")));
    assert_eq!(rows.first(), Some(&"10.0.0.1,false"));
    assert_eq!(rows.last(), Some(&"10.0.0.6,false"));
}

/// Invalid entries in a subnet file are skipped and the valid ones are swept.
#[tokio::test]
async fn input_file_skips_invalid_entries() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("subnets.csv");
    fs::write(&input, "10.1.0.0/30\nnot-a-subnet\n\n10.1.0.0/30\n")?;

    let subnets = target::to_subnets(Target::File(input))?;
    assert_eq!(subnets, vec![subnet("10.1.0.0/30")]);

    let out = dir.path().join("results");
    let session = sweep_with(ScriptedProbe::silent(), subnets, &out).await;

    assert_eq!(session.results.len(), 1);
    assert_eq!(session.written().count(), 1);
    assert_eq!(fs::read_dir(&out)?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn same_day_rerun_replaces_the_file() {
    let dir = TempDir::new().unwrap();
    let net = subnet("172.16.0.0/30");

    let first = sweep_with(ScriptedProbe::silent(), vec![net], dir.path()).await;
    let second = sweep_with(
        ScriptedProbe::new([Ipv4Addr::new(172, 16, 0, 2)]),
        vec![net],
        dir.path(),
    )
    .await;

    let first_path = first.written().next().unwrap();
    let second_path = second.written().next().unwrap();
    assert_eq!(first_path, second_path);

    let contents = fs::read_to_string(second_path).unwrap();
    assert!(contents.contains("172.16.0.2,true"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn stop_before_start_scans_nothing() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(dir.path());
    let service = SweepService::new(
        Arc::new(ScriptedProbe::silent()),
        Box::new(SilentProgress),
        Box::new(sink(dir.path())),
        &cfg,
    );

    let stop = AtomicBool::new(true);
    let session = service
        .run(vec![subnet("10.0.0.0/30"), subnet("10.0.1.0/30")], &stop)
        .await;

    assert!(session.interrupted);
    assert!(session.results.is_empty());
    assert_eq!(session.written().count(), 0);
}

/// A stop raised while a subnet is in flight lets it finish and be saved, then skips the rest.
#[tokio::test]
async fn stop_during_scan_finishes_current_subnet() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(dir.path());
    let stop = Arc::new(AtomicBool::new(false));
    let service = SweepService::new(
        Arc::new(ScriptedProbe::new([Ipv4Addr::new(10, 0, 0, 2)])),
        Box::new(StopAfterFirstSubnet { stop: stop.clone() }),
        Box::new(sink(dir.path())),
        &cfg,
    );

    let session = service
        .run(
            vec![
                subnet("10.0.0.0/29"),
                subnet("10.0.1.0/29"),
                subnet("10.0.2.0/29"),
            ],
            &stop,
        )
        .await;

    assert!(session.interrupted);
    assert_eq!(session.results.len(), 1);
    assert_eq!(session.total_addresses(), 6);
    assert_eq!(session.total_reachable(), 1);

    let written: Vec<_> = session.written().collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("15JUN2025_ping results_10.0.0.0_29.csv"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn persist_failure_does_not_stop_later_subnets() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(dir.path());
    let refused = subnet("10.0.0.0/30");
    let service = SweepService::new(
        Arc::new(ScriptedProbe::new([Ipv4Addr::new(10, 0, 1, 1)])),
        Box::new(SilentProgress),
        Box::new(RefusingSink {
            inner: sink(dir.path()),
            refused,
        }),
        &cfg,
    );

    let session = service
        .run(vec![refused, subnet("10.0.1.0/30")], &AtomicBool::new(false))
        .await;

    assert_eq!(session.results.len(), 2);
    assert_eq!(session.total_reachable(), 1);

    let failures: Vec<_> = session.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].subnet, refused);

    let written: Vec<_> = session.written().collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("15JUN2025_ping results_10.0.1.0_30.csv"));
}

/// Progress for a multi-subnet run arrives subnet by subnet, each ending in a summary.
#[tokio::test]
async fn progress_is_reported_per_subnet() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(dir.path());
    let progress = RecordingProgress::default();

    let service = SweepService::new(
        Arc::new(ScriptedProbe::new([Ipv4Addr::new(10, 9, 0, 1)])),
        Box::new(progress.clone()),
        Box::new(sink(dir.path())),
        &cfg,
    );

    let first = subnet("10.9.0.0/30");
    let second = subnet("10.9.1.0/29");
    service
        .run(vec![first, second], &AtomicBool::new(false))
        .await;

    let events = progress.events();
    let split = events
        .iter()
        .position(|e| e.subnet() == second)
        .expect("events for the second subnet");

    assert!(events[..split].iter().all(|e| e.subnet() == first));
    assert!(events[split..].iter().all(|e| e.subnet() == second));

    assert!(matches!(
        events[split - 1],
        ProgressEvent::Finished { total: 2, reachable: 1, .. }
    ));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Finished { total: 6, reachable: 0, .. })
    ));
}
