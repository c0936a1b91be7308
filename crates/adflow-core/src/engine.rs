use crate::aggregate::{aggregate, ActionItem, Finding, OrderRef, Scope};
use crate::classifier::{Classification, Classifier, EvalContext, OrderContext, OrderVerdict};
use crate::config::EngineConfig;
use crate::error::{AdflowError, Result};
use crate::evidence::{check_evidence, Evidence};
use crate::matching::resolve_placement_status;
use crate::placement::{resolve_placements, Placement};
use crate::rules::{default_order_rules, default_rules};
use crate::snapshot::{Order, Snapshot};
use crate::types::{PlacementStatus, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Snapshot in, ordered action items out. Holds no state between calls.
pub struct Engine {
    classifier: Classifier,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_classifier(
            config,
            Classifier::new(default_order_rules(), default_rules()),
        )
    }

    pub fn with_classifier(config: EngineConfig, classifier: Classifier) -> Self {
        Self { classifier, config }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every verdict for the snapshot, in discovery order: orders in snapshot
    /// order, each order's own finding before its placements.
    pub fn findings(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for order in &snapshot.orders {
            let placements = resolve_placements(order, &self.config);
            let order_ref = OrderRef::from(order);

            if let Some(ov) = self.classify_order(order, now) {
                let skip = ov.skip_placements;
                findings.push(Finding {
                    order: order_ref.clone(),
                    scope: Scope::Order {
                        placements: placements.clone(),
                    },
                    verdict: ov.verdict,
                });
                if skip {
                    continue;
                }
            }

            for placement in &placements {
                let (_, _, classification) = self.classify_placement(snapshot, order, placement, now);
                if let Some(verdict) = classification.verdict {
                    findings.push(Finding {
                        order: order_ref.clone(),
                        scope: Scope::Placement(placement.clone()),
                        verdict,
                    });
                }
            }
        }

        findings
    }

    /// Derive, sort by priority (stable), then truncate to `limit`.
    pub fn derive(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Vec<ActionItem> {
        let findings = self.findings(snapshot, now);
        let mut items = aggregate(&findings, now);
        sort_by_priority(&mut items);
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        tracing::debug!(
            orders = snapshot.orders.len(),
            findings = findings.len(),
            items = items.len(),
            "derived action items"
        );
        items
    }

    /// Show how one placement was classified.
    pub fn explain(
        &self,
        snapshot: &Snapshot,
        order_id: &str,
        placement_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Explanation> {
        let order = snapshot.order(order_id)?;
        let placement = resolve_placements(order, &self.config)
            .into_iter()
            .find(|p| p.id == placement_id)
            .ok_or_else(|| AdflowError::PlacementNotFound {
                order: order_id.to_string(),
                placement: placement_id.to_string(),
            })?;

        let order_verdict = self.classify_order(order, now);
        let (status, evidence, classification) =
            self.classify_placement(snapshot, order, &placement, now);
        let skipped = order_verdict.as_ref().is_some_and(|v| v.skip_placements);

        Ok(Explanation {
            order_id: order_id.to_string(),
            placement,
            status,
            evidence,
            order_verdict,
            classification: if skipped { None } else { Some(classification) },
        })
    }

    fn classify_order(&self, order: &Order, now: DateTime<Utc>) -> Option<OrderVerdict> {
        let ctx = OrderContext {
            order,
            now,
            config: &self.config,
        };
        self.classifier.classify_order(&ctx)
    }

    fn classify_placement(
        &self,
        snapshot: &Snapshot,
        order: &Order,
        placement: &Placement,
        now: DateTime<Utc>,
    ) -> (PlacementStatus, Evidence, Classification) {
        let status = resolve_placement_status(&placement.id, &order.placement_statuses);
        let evidence = check_evidence(
            &placement.id,
            snapshot.entries_for(&order.id),
            snapshot.proofs_for(&order.id),
            &order.creative_assets,
        );
        let ctx = EvalContext {
            order,
            placement,
            status,
            evidence,
            now,
            config: &self.config,
        };
        let classification = self.classifier.classify(&ctx);
        (status, evidence, classification)
    }
}

/// One-shot convenience over [`Engine::derive`].
pub fn derive_action_items(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    limit: Option<usize>,
    config: &EngineConfig,
) -> Vec<ActionItem> {
    Engine::new(config.clone()).derive(snapshot, now, limit)
}

/// Stable: items within a tier keep their relative order.
pub fn sort_by_priority(items: &mut [ActionItem]) {
    items.sort_by_key(|item| item.priority);
}

// ---------------------------------------------------------------------------
// Explanation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub order_id: String,
    pub placement: Placement,
    pub status: PlacementStatus,
    pub evidence: Evidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_verdict: Option<OrderVerdict>,
    /// Absent when an order rule skipped placement evaluation.
    pub classification: Option<Classification>,
}

// ---------------------------------------------------------------------------
// ActionSections
// ---------------------------------------------------------------------------

/// Sorted items split into display sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSections {
    pub urgent: Vec<ActionItem>,
    pub soon: Vec<ActionItem>,
    pub info: Vec<ActionItem>,
    pub done: Vec<ActionItem>,
}

impl ActionSections {
    pub fn from_items(items: Vec<ActionItem>) -> Self {
        let mut sections = Self::default();
        for item in items {
            match item.priority {
                Priority::Urgent => sections.urgent.push(item),
                Priority::Soon => sections.soon.push(item),
                Priority::Info => sections.info.push(item),
                Priority::Done => sections.done.push(item),
            }
        }
        sections
    }

    pub fn get(&self, priority: Priority) -> &[ActionItem] {
        match priority {
            Priority::Urgent => &self.urgent,
            Priority::Soon => &self.soon,
            Priority::Info => &self.info,
            Priority::Done => &self.done,
        }
    }

    pub fn len(&self) -> usize {
        self.urgent.len() + self.soon.len() + self.info.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
