//! `lockstep init` — seed the shared snapshot from the local tree.
//!
//! Publishes the current modification times of the tracked files, without
//! owner annotations, so a fresh clipboard record starts from real data
//! instead of an empty blob. Running it against a live record overwrites
//! whatever the collaborators have published — it is an explicit operator
//! action, not part of the poll loop.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use lockstep_core::config::DEFAULT_CONFIG_FILE;
use lockstep_core::types::{absorb, FileRecord, RecordSet};
use lockstep_core::{codec, Config};
use lockstep_sync::{scan, RemoteStore};

use crate::remote::HttpClipboard;

/// Arguments for `lockstep init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the YAML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::load(&self.config)
            .with_context(|| format!("failed to load config {}", self.config.display()))?;
        let store = HttpClipboard::new(&config);

        let observations =
            scan(Path::new("."), &config.files_to_track).context("local scan failed")?;

        let mut set = RecordSet::new();
        for observation in &observations {
            absorb(
                &mut set,
                FileRecord {
                    name: observation.name.clone(),
                    timestamp: observation.modified,
                    trailing: String::new(),
                },
            );
        }

        let content = codec::serialize(&set);
        store
            .publish(&content)
            .context("failed to publish initial snapshot")?;

        println!(
            "Published initial snapshot with {} record(s) to '{}'.",
            set.len(),
            config.server_address
        );
        Ok(())
    }
}
