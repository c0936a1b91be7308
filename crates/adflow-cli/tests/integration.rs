#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOW: &str = "2026-10-19";

const ORDERS: &str = r#"[
  {
    "id": "o-100",
    "campaignId": "c-1",
    "publicationId": 7,
    "status": "in_production",
    "placementStatuses": {
      "print/full": "in_production",
      "radio/spot-30s": "delivered"
    },
    "campaign": {
      "name": "Harvest Fest",
      "timeline": { "startDate": "2026-09-01", "endDate": "2026-10-09T23:00:00Z" },
      "selectedInventory": {
        "publications": [
          {
            "publicationId": "7",
            "inventoryItems": [
              { "itemPath": "print/full", "itemName": "Full page", "channel": "print" },
              { "itemPath": "radio/spot", "name": "Drive-time spot", "channel": "radio" }
            ]
          }
        ]
      }
    }
  },
  {
    "id": "o-200",
    "campaignId": "c-2",
    "campaignName": "Winter Gala",
    "publicationId": "7",
    "status": "sent"
  },
  {
    "id": "o-300",
    "campaignId": "c-3",
    "publicationId": "8",
    "status": "sent"
  }
]"#;

fn adflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("adflow").unwrap();
    cmd.current_dir(dir.path()).env("ADFLOW_ROOT", dir.path());
    cmd
}

fn seed_data(dir: &TempDir) {
    let data = dir.path().join(".adflow/data");
    std::fs::create_dir_all(data.join("performance")).unwrap();
    std::fs::write(data.join("orders.json"), ORDERS).unwrap();
    std::fs::write(
        data.join("performance/o-100.json"),
        r#"[{ "orderId": "o-100", "placementId": "radio/spot" }]"#,
    )
    .unwrap();
}

fn items_json(dir: &TempDir, extra: &[&str]) -> Vec<serde_json::Value> {
    let out = adflow(dir)
        .args(["items", "--publication", "7", "--now", NOW, "--json"])
        .args(extra)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// adflow items
// ---------------------------------------------------------------------------

#[test]
fn items_prints_sections() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    adflow(&dir)
        .args(["items", "--publication", "7", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs attention (3)"))
        .stdout(predicate::str::contains("Report results for Full page"))
        .stdout(predicate::str::contains("Harvest Fest · 10 days overdue"))
        .stdout(predicate::str::contains("Add proof of performance for Drive-time spot"))
        .stdout(predicate::str::contains("New order awaiting acceptance"))
        .stdout(predicate::str::contains("/campaigns/c-1/publications/7#performance"))
        .stdout(predicate::str::contains("Coming up").not());
}

#[test]
fn items_json_is_sorted_and_scoped_to_publication() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    let items = items_json(&dir, &[]);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["id"], "o-100-overdue_report-print/full");
    assert_eq!(items[0]["priority"], "urgent");
    assert_eq!(items[0]["due_date"], "2026-10-09");
    assert_eq!(items[0]["target"]["section"], "performance");
    assert_eq!(items[1]["type"], "missing_proof");
    assert_eq!(items[2]["type"], "needs_acceptance");
    assert_eq!(items[2]["campaign_name"], "Winter Gala");
    assert!(items.iter().all(|i| i["order_id"] != "o-300"));
}

#[test]
fn items_limit_truncates_after_sorting() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    let items = items_json(&dir, &["--limit", "1"]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "overdue_report");
}

#[test]
fn items_from_snapshot_file() {
    let dir = TempDir::new().unwrap();
    let orders: serde_json::Value = serde_json::from_str(ORDERS).unwrap();
    let snapshot = serde_json::json!({
        "orders": orders,
        "performance": { "o-100": [{ "placementId": "radio/spot" }] },
        "proofs": { "o-100": [{ "orderId": "o-100" }] },
    });
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, snapshot.to_string()).unwrap();

    let out = adflow(&dir)
        .args(["items", "--snapshot"])
        .arg(&path)
        .args(["--now", NOW, "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let items: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();

    let kinds: Vec<&str> = items.iter().map(|i| i["type"].as_str().unwrap()).collect();
    // o-300 is included without --publication; the order-wide proof completes the radio spot.
    assert_eq!(
        kinds,
        vec!["overdue_report", "needs_acceptance", "needs_acceptance", "completed"]
    );
}

#[test]
fn items_requires_publication_without_snapshot() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    adflow(&dir)
        .args(["items"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--publication is required"));
}

#[test]
fn items_without_data_reports_missing_orders() {
    let dir = TempDir::new().unwrap();

    adflow(&dir)
        .args(["items", "--publication", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no order data found"));
}

#[test]
fn items_rejects_bad_now() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    adflow(&dir)
        .args(["items", "--publication", "7", "--now", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now 'someday'"));
}

// ---------------------------------------------------------------------------
// adflow explain
// ---------------------------------------------------------------------------

#[test]
fn explain_shows_status_evidence_and_rule() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    adflow(&dir)
        .args(["explain", "o-100", "radio/spot", "--publication", "7", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:     delivered"))
        .stdout(predicate::str::contains("report=yes proof=no"))
        .stdout(predicate::str::contains("missing_proof -> missing_proof [urgent]"));
}

#[test]
fn explain_json_reports_classification() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    let out = adflow(&dir)
        .args(["explain", "o-100", "print/full", "--publication", "7", "--now", NOW, "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["status"], "in_production");
    assert_eq!(v["classification"]["rule"], "overdue_report");
    assert!(v.get("order_verdict").is_none());
}

#[test]
fn explain_narrows_snapshot_to_publication() {
    let dir = TempDir::new().unwrap();
    let orders: serde_json::Value = serde_json::from_str(ORDERS).unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::json!({ "orders": orders }).to_string()).unwrap();

    adflow(&dir)
        .args(["explain", "o-100", "print/full", "--publication", "7", "--now", NOW, "--snapshot"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("overdue_report -> overdue_report [urgent]"));

    adflow(&dir)
        .args(["explain", "o-100", "print/full", "--publication", "8", "--snapshot"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("order not found: o-100"));
}

#[test]
fn explain_unknown_placement_fails() {
    let dir = TempDir::new().unwrap();
    seed_data(&dir);

    adflow(&dir)
        .args(["explain", "o-100", "nope", "--publication", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placement 'nope' not found in order 'o-100'"));
}

// ---------------------------------------------------------------------------
// adflow rules / config
// ---------------------------------------------------------------------------

#[test]
fn rules_lists_both_tables_in_order() {
    let dir = TempDir::new().unwrap();

    let out = adflow(&dir).args(["rules"]).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let acceptance = stdout.find("needs_acceptance").unwrap();
    let tracked = stdout.find("digital_tracked").unwrap();
    let completed = stdout.find("completed [done]").unwrap();
    assert!(acceptance < tracked && tracked < completed);
    assert!(stdout.contains("halt"));
}

#[test]
fn config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();

    adflow(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("window_days: 7"))
        .stdout(predicate::str::contains("podcast"));
}

#[test]
fn config_validate_flags_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".adflow")).unwrap();
    std::fs::write(dir.path().join(".adflow/config.yaml"), "window_days: -1\n").unwrap();

    adflow(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_validate_clean_defaults() {
    let dir = TempDir::new().unwrap();

    adflow(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}
