use crate::output::{print_json, print_table, yes_no};
use adflow_core::classifier::Outcome;
use adflow_core::{Engine, EngineConfig};
use serde::Serialize;

#[derive(Serialize)]
struct RuleRow {
    scope: &'static str,
    id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<String>,
    halts: bool,
    skips_placements: bool,
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let engine = Engine::new(EngineConfig::default());
    let classifier = engine.classifier();

    let order_rows = classifier.order_rules().iter().map(|r| RuleRow {
        scope: "order",
        id: r.id,
        action: Some(r.action.to_string()),
        priority: Some(r.priority.to_string()),
        halts: false,
        skips_placements: r.skip_placements,
    });
    let placement_rows = classifier.rules().iter().map(|r| {
        let (action, priority) = match r.outcome {
            Outcome::Emit { action, priority } => {
                (Some(action.to_string()), Some(priority.to_string()))
            }
            Outcome::Halt => (None, None),
        };
        RuleRow {
            scope: "placement",
            id: r.id,
            action,
            priority,
            halts: matches!(r.outcome, Outcome::Halt),
            skips_placements: false,
        }
    });
    let rows: Vec<RuleRow> = order_rows.chain(placement_rows).collect();

    if json {
        return print_json(&rows);
    }

    let table = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let outcome = match (&r.action, &r.priority) {
                (Some(a), Some(p)) => format!("{a} [{p}]"),
                _ => "halt".to_string(),
            };
            vec![
                (i + 1).to_string(),
                r.scope.to_string(),
                r.id.to_string(),
                outcome,
                yes_no(r.skips_placements).to_string(),
            ]
        })
        .collect();
    print_table(&["#", "SCOPE", "RULE", "OUTCOME", "SKIPS PLACEMENTS"], table);
    Ok(())
}
