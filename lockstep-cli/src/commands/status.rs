//! `lockstep status` — read-only view of the shared snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use lockstep_core::config::DEFAULT_CONFIG_FILE;
use lockstep_core::types::Username;
use lockstep_core::{codec, Config};
use lockstep_sync::{annotate, RemoteStore};

use crate::remote::HttpClipboard;
use crate::render::{self, ReportKind};

/// Arguments for `lockstep status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the YAML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::load(&self.config)
            .with_context(|| format!("failed to load config {}", self.config.display()))?;
        let identity = Username::from(config.username.clone());
        let store = HttpClipboard::new(&config);

        let content = store.fetch().context("remote fetch failed")?;
        let now = Local::now();
        let report = annotate(
            &codec::parse(&content),
            now.naive_local(),
            i64::from(now.offset().local_minus_utc()),
            &identity,
        );

        render::print_report(ReportKind::Polled, now.naive_local(), &report, &identity);
        render::print_locks(&report.locked);
        Ok(())
    }
}
