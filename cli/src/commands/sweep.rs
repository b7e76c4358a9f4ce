use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio::signal;
use tracing::{error, info, warn};

use crate::pprint;
use crate::terminal::{colors, print, spinner};
use pingr_common::config::Config;
use pingr_common::network::subnet::Subnet;
use pingr_common::network::target::{self, Target};
use pingr_common::progress::{ProgressEvent, ProgressReporter};
use pingr_common::scan::ScanSession;
use pingr_core::output::CsvResultSink;
use pingr_core::probe;
use pingr_core::progress::{LogProgress, SilentProgress};
use pingr_core::sweep::SweepService;
use pingr_core::system::Platform;

/// Raised by the first Ctrl+C; checked between subnets.
static STOP_SIGNAL: AtomicBool = AtomicBool::new(false);

/// Prints checkpoints through the logger and mirrors them on the spinner.
struct TerminalProgress;

impl ProgressReporter for TerminalProgress {
    fn report(&self, event: &ProgressEvent) {
        spinner::report_sweep_progress(event);
        LogProgress.report(event);
    }
}

pub async fn sweep(target: Target, cfg: &Config) -> anyhow::Result<()> {
    let subnets: Vec<Subnet> = target::to_subnets(target).context("no subnets to sweep")?;
    let total_hosts: usize = subnets.iter().map(|s| s.hosts().len()).sum();
    info!("Total IP addresses to ping: {total_hosts}");

    let platform = Platform::detect();
    info!("Detected OS: {platform}");
    let probe = probe::select_probe(&platform)?;

    print_settings(probe.name(), cfg);
    listen_for_interrupt();

    let reporter: Box<dyn ProgressReporter> = if cfg.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(TerminalProgress)
    };
    let sink = Box::new(CsvResultSink::new(cfg.output_dir.clone()));
    let service = SweepService::new(probe, reporter, sink, cfg);

    if !cfg.quiet {
        spinner::announce(format!("Sweeping {} subnet(s)...", subnets.len()));
    }

    let start_time = Instant::now();
    let session = service.run(subnets, &STOP_SIGNAL).await;
    spinner::finish();

    sweep_ends(&session, start_time.elapsed())
}

fn print_settings(probe_name: &str, cfg: &Config) {
    print::header("sweep settings");
    print::aligned_line("Probe", probe_name);
    print::aligned_line("Timeout", format!("{} ms", cfg.budget.timeout.as_millis()));
    print::aligned_line("Attempts", cfg.budget.attempts.to_string());
    print::aligned_line("Workers", cfg.workers.to_string());
    print::aligned_line("Pacing", format!("{} ms", cfg.pacing.as_millis()));
    print::aligned_line("Output", cfg.output_dir.display().to_string());
}

fn listen_for_interrupt() {
    tokio::spawn(async {
        if signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, finishing the current subnet. Press Ctrl+C again to abort.");
        STOP_SIGNAL.store(true, Ordering::Relaxed);

        if signal::ctrl_c().await.is_ok() {
            spinner::finish();
            error!("Aborted");
            std::process::exit(130);
        }
    });
}

fn sweep_ends(session: &ScanSession, total_time: Duration) -> anyhow::Result<()> {
    pprint!();
    print::header("sweep results");

    for path in session.written() {
        print::aligned_line("Saved", path.display().to_string());
    }
    for failed in session.failures() {
        if let Err(e) = &failed.outcome {
            print::aligned_line("Failed", e.to_string().red());
        }
    }

    print_summary(session, total_time);

    if session.interrupted {
        warn!("Sweep was interrupted; remaining subnets were not scanned");
    }

    let failures = session.failures().count();
    if failures > 0 {
        anyhow::bail!("results for {failures} subnet(s) could not be written");
    }
    Ok(())
}

fn print_summary(session: &ScanSession, total_time: Duration) {
    let reachable: ColoredString = session.total_reachable().to_string().bold().green();
    let total: ColoredString = session.total_addresses().to_string().bold();
    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().color(colors::ACCENT);
    let output: ColoredString = format!(
        "Scan complete: {reachable} out of {total} hosts are reachable ({elapsed})"
    )
    .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
    print::end_of_program();
}
