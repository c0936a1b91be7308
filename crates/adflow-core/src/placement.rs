use crate::config::EngineConfig;
use crate::snapshot::{InventoryPlacement, Order};
use crate::types::Channel;
use serde::{Deserialize, Serialize};

/// One sellable slot of an order, as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub name: String,
    pub channel: Channel,
    pub is_digital: bool,
}

impl Placement {
    fn from_inventory(item: &InventoryPlacement, config: &EngineConfig) -> Option<Self> {
        let id = non_empty(&item.item_path)
            .or_else(|| non_empty(&item.source_path))?
            .to_string();
        let channel = item.channel.unwrap_or(Channel::Other);
        Some(Self {
            name: item.name.clone().unwrap_or_else(|| id.clone()),
            id,
            channel,
            is_digital: config.is_digital(channel),
        })
    }
}

/// Empty identifiers count as absent.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// The placements this order's publication sold, in inventory order.
///
/// Orders whose snapshot lacks an inventory section, or whose inventory has no
/// entry for the order's publication, have no placements yet. Inventory rows
/// without an `itemPath` or `sourcePath` cannot be matched to statuses or
/// evidence and are skipped.
pub fn resolve_placements(order: &Order, config: &EngineConfig) -> Vec<Placement> {
    let Some(inventory) = order
        .campaign
        .as_ref()
        .and_then(|c| c.selected_inventory.as_ref())
    else {
        return Vec::new();
    };

    let Some(publication) = inventory
        .publications
        .iter()
        .find(|p| p.publication_id == order.publication_id)
    else {
        return Vec::new();
    };

    publication
        .placements
        .iter()
        .filter_map(|item| {
            let placement = Placement::from_inventory(item, config);
            if placement.is_none() {
                tracing::debug!(order = %order.id, "skipping inventory item without an identifier");
            }
            placement
        })
        .collect()
}
