use super::{load_snapshot, Input};
use crate::output::{print_json, yes_no};
use adflow_core::classifier::Verdict;
use adflow_core::{Engine, EngineConfig};
use anyhow::Context;
use std::path::Path;

pub fn run(
    root: &Path,
    input: Input,
    order_id: &str,
    placement_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let now = input.now()?;
    let config = EngineConfig::load(root).context("failed to load config")?;
    let snapshot = load_snapshot(root, &input)?;

    let engine = Engine::new(config);
    let explanation = engine.explain(&snapshot, order_id, placement_id, now)?;

    if json {
        return print_json(&explanation);
    }

    let p = &explanation.placement;
    println!("Order:      {}", explanation.order_id);
    println!("Placement:  {} ({})", p.name, p.id);
    println!(
        "Channel:    {}{}",
        p.channel,
        if p.is_digital { " (digital)" } else { "" }
    );
    println!("Status:     {}", explanation.status);
    println!(
        "Evidence:   report={} proof={} assets={}",
        yes_no(explanation.evidence.has_entry),
        yes_no(explanation.evidence.has_proof),
        yes_no(explanation.evidence.has_assets),
    );

    if let Some(ov) = &explanation.order_verdict {
        println!("Order rule: {}", describe(&ov.verdict));
    }
    match &explanation.classification {
        Some(c) => match &c.verdict {
            Some(v) => println!("Rule:       {}", describe(v)),
            None => println!("Rule:       {} (no item)", c.rule),
        },
        None => println!("Rule:       (placements skipped by the order rule)"),
    }
    Ok(())
}

fn describe(v: &Verdict) -> String {
    let due = v
        .due_date
        .map(|d| format!(" due {d}"))
        .unwrap_or_default();
    format!("{} -> {} [{}]{due}", v.rule, v.action, v.priority)
}
