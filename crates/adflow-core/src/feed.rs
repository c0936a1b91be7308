use crate::aggregate::ActionItem;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{AdflowError, Result};
use crate::paths;
use crate::snapshot::{Order, PerformanceEntry, ProofRecord, Snapshot};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// OrderSource
// ---------------------------------------------------------------------------

/// The fetch layer the engine's inputs come from.
pub trait OrderSource {
    fn list_orders_for_publication(
        &self,
        publication_id: &str,
    ) -> impl Future<Output = Result<Vec<Order>>> + Send;

    fn list_performance_entries(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<Vec<PerformanceEntry>>> + Send;

    fn list_proof_records(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<Vec<ProofRecord>>> + Send;
}

// ---------------------------------------------------------------------------
// Snapshot assembly
// ---------------------------------------------------------------------------

/// List the publication's orders, then fetch every order's entries and proofs
/// concurrently.
///
/// Failing to list orders fails the whole assembly. A failed fetch for one
/// order is logged and replaced by an empty list so the other orders proceed.
pub async fn assemble_snapshot<S: OrderSource>(source: &S, publication_id: &str) -> Result<Snapshot> {
    let orders = source.list_orders_for_publication(publication_id).await?;

    let fetches = orders.iter().map(|order| async move {
        let id = order.id.as_str();
        let (entries, proofs) = tokio::join!(
            source.list_performance_entries(id),
            source.list_proof_records(id)
        );
        (
            id.to_string(),
            or_empty(id, "performance entries", entries),
            or_empty(id, "proof records", proofs),
        )
    });
    let fetched = futures::future::join_all(fetches).await;

    let mut performance_by_order = BTreeMap::new();
    let mut proofs_by_order = BTreeMap::new();
    for (id, entries, proofs) in fetched {
        performance_by_order.insert(id.clone(), entries);
        proofs_by_order.insert(id, proofs);
    }

    tracing::debug!(publication = publication_id, orders = orders.len(), "assembled snapshot");
    Ok(Snapshot {
        orders,
        performance_by_order,
        proofs_by_order,
    })
}

fn or_empty<T>(order_id: &str, what: &str, fetched: Result<Vec<T>>) -> Vec<T> {
    match fetched {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(order = order_id, error = %e, "failed to fetch {what}; continuing without them");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Refresher
// ---------------------------------------------------------------------------

/// The latest published result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Published {
    pub generation: u64,
    pub publication_id: String,
    pub items: Vec<ActionItem>,
    /// The last refresh failed; `items` are from an earlier generation.
    pub stale: bool,
}

/// Re-derives action items on demand. A newer `refresh` supersedes any still
/// in flight: only the latest generation publishes, older ones return `None`.
pub struct Refresher<S> {
    source: S,
    engine: Engine,
    generation: AtomicU64,
    tx: watch::Sender<Published>,
}

impl<S: OrderSource> Refresher<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        let (tx, _) = watch::channel(Published::default());
        Self {
            source,
            engine: Engine::new(config),
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Published {
        self.tx.borrow().clone()
    }

    pub async fn refresh(
        &self,
        publication_id: &str,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Option<Vec<ActionItem>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let assembled = assemble_snapshot(&self.source, publication_id).await;

        let snapshot = match assembled {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let current = self.tx.send_if_modified(|p| {
                    if self.is_current(generation) {
                        p.stale = true;
                        true
                    } else {
                        false
                    }
                });
                if !current {
                    tracing::debug!(generation, "superseded refresh failed; ignoring");
                    return Ok(None);
                }
                tracing::warn!(generation, publication = publication_id, error = %e, "refresh failed; previous items are stale");
                return Err(e);
            }
        };

        let items = self.engine.derive(&snapshot, now, limit);
        let published = self.tx.send_if_modified(|p| {
            if !self.is_current(generation) {
                return false;
            }
            *p = Published {
                generation,
                publication_id: publication_id.to_string(),
                items: items.clone(),
                stale: false,
            };
            true
        });

        if published {
            tracing::info!(generation, publication = publication_id, items = items.len(), "published action items");
            Ok(Some(items))
        } else {
            tracing::debug!(generation, "refresh superseded; discarding result");
            Ok(None)
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

// ---------------------------------------------------------------------------
// DirSource
// ---------------------------------------------------------------------------

/// Reads orders and evidence from `<root>/.adflow/data/`.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OrderSource for DirSource {
    async fn list_orders_for_publication(&self, publication_id: &str) -> Result<Vec<Order>> {
        let path = paths::orders_path(&self.root);
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AdflowError::NotInitialized(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let orders: Vec<Order> = serde_json::from_str(&data)?;
        Ok(orders
            .into_iter()
            .filter(|o| o.publication_id == publication_id)
            .collect())
    }

    async fn list_performance_entries(&self, order_id: &str) -> Result<Vec<PerformanceEntry>> {
        read_records(&paths::performance_path(&self.root, order_id)).await
    }

    async fn list_proof_records(&self, order_id: &str) -> Result<Vec<ProofRecord>> {
        read_records(&paths::proofs_path(&self.root, order_id)).await
    }
}

/// A missing file means the order has no records yet.
async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
