use crate::matching::matches_placement;
use crate::snapshot::{AssetRecord, PerformanceEntry, ProofRecord};
use serde::{Deserialize, Serialize};

/// What has been submitted for one placement so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub has_entry: bool,
    pub has_proof: bool,
    pub has_assets: bool,
}

/// Check the order's records against placement `id`.
///
/// Performance entries must name the placement (or a variant of it). Proofs
/// and creative assets without a placement id apply to the whole order.
pub fn check_evidence(
    id: &str,
    entries: &[PerformanceEntry],
    proofs: &[ProofRecord],
    assets: &[AssetRecord],
) -> Evidence {
    let has_entry = entries.iter().any(|e| {
        e.placement_id
            .as_deref()
            .is_some_and(|stored| matches_placement(stored, id))
    });
    let has_proof = proofs
        .iter()
        .any(|p| covers(p.placement_id.as_deref(), id));
    let has_assets = assets
        .iter()
        .any(|a| covers(a.placement_id.as_deref(), id));

    Evidence {
        has_entry,
        has_proof,
        has_assets,
    }
}

fn covers(stored: Option<&str>, id: &str) -> bool {
    match stored {
        None | Some("") => true,
        Some(stored) => matches_placement(stored, id),
    }
}
