pub mod config;
pub mod explain;
pub mod items;
pub mod rules;

use adflow_core::dates::parse_instant;
use adflow_core::feed::{assemble_snapshot, DirSource};
use adflow_core::Snapshot;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Where a command reads its orders from, and as of when.
pub struct Input<'a> {
    pub publication: Option<&'a str>,
    pub snapshot: Option<&'a Path>,
    pub now: Option<&'a str>,
}

impl<'a> Input<'a> {
    pub fn now(&self) -> anyhow::Result<DateTime<Utc>> {
        match self.now {
            Some(s) => parse_instant(s).with_context(|| format!("invalid --now '{s}'")),
            None => Ok(Utc::now()),
        }
    }

    pub fn publication(&self) -> anyhow::Result<&'a str> {
        self.publication.ok_or_else(|| {
            anyhow!("--publication is required when reading the data directory (or pass --snapshot FILE)")
        })
    }
}

pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}

/// Load from `--snapshot` (narrowed to `--publication` if given), otherwise
/// assemble the publication's orders from `.adflow/data/`.
pub fn load_snapshot(root: &Path, input: &Input) -> anyhow::Result<Snapshot> {
    if let Some(path) = input.snapshot {
        let snapshot = Snapshot::load(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?;
        return Ok(match input.publication {
            Some(p) => snapshot.for_publication(p),
            None => snapshot,
        });
    }

    let publication = input.publication()?;
    let source = DirSource::new(root);
    runtime()?
        .block_on(assemble_snapshot(&source, publication))
        .context("failed to read order data")
}
