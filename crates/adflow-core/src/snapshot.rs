use crate::dates;
use crate::error::{AdflowError, Result};
use crate::ident::Ident;
use crate::types::{Channel, OrderStatus, PlacementStatus};
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Campaign snapshot embedded in an order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default, deserialize_with = "dates::lenient")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPlacement {
    #[serde(default)]
    pub item_path: Option<String>,
    #[serde(default)]
    pub source_path: Option<String>,
    #[serde(default, alias = "itemName")]
    pub name: Option<String>,
    #[serde(default)]
    pub channel: Option<Channel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPublication {
    pub publication_id: Ident,
    #[serde(default)]
    pub publication_name: Option<String>,
    #[serde(default, alias = "inventoryItems")]
    pub placements: Vec<InventoryPlacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    #[serde(default)]
    pub publications: Vec<InventoryPublication>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub selected_inventory: Option<InventorySnapshot>,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Ident,
    pub campaign_id: Ident,
    #[serde(default)]
    pub campaign_name: Option<String>,
    pub publication_id: Ident,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient_statuses")]
    pub placement_statuses: BTreeMap<String, PlacementStatus>,
    #[serde(default)]
    pub campaign: Option<CampaignSnapshot>,
    /// Creative received from the advertiser. A record without a placement id
    /// covers every placement in the order.
    #[serde(default)]
    pub creative_assets: Vec<AssetRecord>,
}

impl Order {
    pub fn new(
        id: impl Into<Ident>,
        campaign_id: impl Into<Ident>,
        publication_id: impl Into<Ident>,
        status: OrderStatus,
    ) -> Self {
        Self {
            id: id.into(),
            campaign_id: campaign_id.into(),
            campaign_name: None,
            publication_id: publication_id.into(),
            status,
            placement_statuses: BTreeMap::new(),
            campaign: None,
            creative_assets: Vec::new(),
        }
    }

    /// Campaign name for display: order field, then snapshot name, then id.
    pub fn campaign_display_name(&self) -> &str {
        self.campaign_name
            .as_deref()
            .or_else(|| self.campaign.as_ref().and_then(|c| c.name.as_deref()))
            .unwrap_or(self.campaign_id.as_str())
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.timeline().and_then(|t| t.start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.timeline().and_then(|t| t.end_date)
    }

    fn timeline(&self) -> Option<&Timeline> {
        self.campaign.as_ref().and_then(|c| c.timeline.as_ref())
    }
}

/// Status values that are not strings (`null`, numbers, objects) read as
/// `Pending`; unrecognized strings read as `Unknown`.
fn lenient_statuses<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, PlacementStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStatus {
        Known(PlacementStatus),
        Other(IgnoredAny),
    }

    let raw: Option<BTreeMap<String, RawStatus>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, status)| match status {
            RawStatus::Known(s) => (key, s),
            RawStatus::Other(_) => (key, PlacementStatus::Pending),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Evidence records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    #[serde(default)]
    pub order_id: Option<Ident>,
    #[serde(default, alias = "itemPath")]
    pub placement_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    #[serde(default)]
    pub order_id: Option<Ident>,
    /// Absent means the proof covers the whole order.
    #[serde(default, alias = "itemPath")]
    pub placement_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(default, alias = "itemPath")]
    pub placement_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything one derivation pass reads: orders plus the evidence fetched for
/// each of them, keyed by order id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, alias = "performance")]
    pub performance_by_order: BTreeMap<String, Vec<PerformanceEntry>>,
    #[serde(default, alias = "proofs")]
    pub proofs_by_order: BTreeMap<String, Vec<ProofRecord>>,
}

impl Snapshot {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders,
            ..Default::default()
        }
    }

    /// Load a snapshot from a JSON or YAML file (chosen by extension).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AdflowError::NotInitialized(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let snapshot = if is_yaml {
            serde_yaml::from_str(&data)?
        } else {
            serde_json::from_str(&data)?
        };
        Ok(snapshot)
    }

    pub fn entries_for(&self, order_id: &Ident) -> &[PerformanceEntry] {
        self.performance_by_order
            .get(order_id.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn proofs_for(&self, order_id: &Ident) -> &[ProofRecord] {
        self.proofs_by_order
            .get(order_id.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn order(&self, order_id: &str) -> Result<&Order> {
        self.orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| AdflowError::OrderNotFound(order_id.to_string()))
    }

    /// Keep only the orders placed with `publication_id`, and their evidence.
    pub fn for_publication(mut self, publication_id: &str) -> Self {
        self.orders.retain(|o| o.publication_id == publication_id);
        let kept: Vec<String> = self.orders.iter().map(|o| o.id.to_string()).collect();
        self.performance_by_order.retain(|k, _| kept.contains(k));
        self.proofs_by_order.retain(|k, _| kept.contains(k));
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
