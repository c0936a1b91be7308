use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ADFLOW_DIR: &str = ".adflow";
pub const PERFORMANCE_DIR: &str = ".adflow/data/performance";
pub const PROOFS_DIR: &str = ".adflow/data/proofs";

pub const CONFIG_FILE: &str = ".adflow/config.yaml";
pub const ORDERS_FILE: &str = ".adflow/data/orders.json";

// ---------------------------------------------------------------------------
// Path builders
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn orders_path(root: &Path) -> PathBuf {
    root.join(ORDERS_FILE)
}

/// Per-order file name; path separators in ids are flattened.
fn order_file(order_id: &str) -> String {
    format!("{}.json", order_id.replace(['/', '\\'], "_"))
}

pub fn performance_path(root: &Path, order_id: &str) -> PathBuf {
    root.join(PERFORMANCE_DIR).join(order_file(order_id))
}

pub fn proofs_path(root: &Path, order_id: &str) -> PathBuf {
    root.join(PROOFS_DIR).join(order_file(order_id))
}
