use crate::types::PlacementStatus;
use std::collections::BTreeMap;

/// Tie-break table for placements tracked under several variant keys.
/// Earlier entries win: the most progressed status is reported.
pub const STATUS_PRIORITY: [PlacementStatus; 5] = [
    PlacementStatus::Delivered,
    PlacementStatus::InProduction,
    PlacementStatus::Accepted,
    PlacementStatus::Rejected,
    PlacementStatus::Pending,
];

/// True if `stored` refers to placement `id` or to one of its tier/dimension
/// variants (`id-…` or `id_…`).
pub fn matches_placement(stored: &str, id: &str) -> bool {
    match stored.strip_prefix(id) {
        Some("") => true,
        Some(rest) => rest.starts_with('-') || rest.starts_with('_'),
        None => false,
    }
}

/// Resolve the single status of placement `id` from an order's status map.
///
/// An exact key wins outright. Otherwise every variant key is collected and
/// reduced through [`STATUS_PRIORITY`]. No match, or only statuses outside the
/// table, resolves to `Pending`.
pub fn resolve_placement_status(
    id: &str,
    statuses: &BTreeMap<String, PlacementStatus>,
) -> PlacementStatus {
    if let Some(status) = statuses.get(id) {
        return *status;
    }

    let variants: Vec<PlacementStatus> = statuses
        .iter()
        .filter(|(key, _)| matches_placement(key, id))
        .map(|(_, status)| *status)
        .collect();

    STATUS_PRIORITY
        .iter()
        .find(|candidate| variants.contains(*candidate))
        .copied()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
