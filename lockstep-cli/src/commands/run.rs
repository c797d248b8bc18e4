//! `lockstep run` — the polling agent loop.
//!
//! INIT → POLL → (REPUBLISH_IF_NEEDED) → REPORT → SLEEP → POLL …
//!
//! There is no terminal state: the loop runs until a scan or fetch error,
//! which is fatal — no retry, no backoff; the next scheduled poll is the only
//! recovery mechanism, and a dead agent is restarted by its operator.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use lockstep_core::config::DEFAULT_CONFIG_FILE;
use lockstep_core::types::Username;
use lockstep_core::Config;
use lockstep_sync::{run_cycle, scan, CycleContext, SyncState};

use crate::remote::HttpClipboard;
use crate::render::{self, ReportKind};

/// Arguments for `lockstep run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Seconds to sleep between polls.
    #[arg(long, default_value_t = 8)]
    pub interval: u64,

    /// Run a single poll cycle and exit (useful for cron and tests).
    #[arg(long)]
    pub once: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::load(&self.config)
            .with_context(|| format!("failed to load config {}", self.config.display()))?;
        let identity = Username::from(config.username.clone());
        let store = HttpClipboard::new(&config);
        let mut state = SyncState::new();

        tracing::info!(
            "lockstep agent started: user={} clipboard={} tracking {} file(s)",
            identity,
            config.server_address,
            config.files_to_track.len(),
        );

        loop {
            let observations = scan(Path::new("."), &config.files_to_track)
                .context("local scan failed")?;

            let now = Local::now();
            let ctx = CycleContext {
                identity: &identity,
                threshold_secs: config.seconds,
                utc_offset_secs: i64::from(now.offset().local_minus_utc()),
                now: now.naive_local(),
            };

            let outcome = run_cycle(&mut state, &store, &observations, &ctx)
                .context("remote fetch failed")?;

            if let Some(report) = &outcome.remote_report {
                render::print_report(ReportKind::Polled, ctx.now, report, &identity);
            }
            if let Some(report) = &outcome.publish_report {
                render::print_report(
                    ReportKind::Sent,
                    Local::now().naive_local(),
                    report,
                    &identity,
                );
            }
            render::print_locks(&state.locked);

            if self.once {
                return Ok(());
            }
            thread::sleep(Duration::from_secs(self.interval));
        }
    }
}
