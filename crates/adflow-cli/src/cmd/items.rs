use super::{load_snapshot, runtime, Input};
use crate::output::{print_json, print_table};
use adflow_core::feed::{DirSource, Refresher};
use adflow_core::types::Priority;
use adflow_core::{derive_action_items, ActionItem, ActionSections, EngineConfig};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, input: Input, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let now = input.now()?;
    let config = EngineConfig::load(root).context("failed to load config")?;

    let items = match input.snapshot {
        Some(_) => {
            let snapshot = load_snapshot(root, &input)?;
            derive_action_items(&snapshot, now, limit, &config)
        }
        None => {
            let publication = input.publication()?;
            let refresher = Refresher::new(DirSource::new(root), config);
            runtime()?
                .block_on(refresher.refresh(publication, now, limit))
                .context("failed to derive action items")?
                .unwrap_or_default()
        }
    };

    if json {
        return print_json(&items);
    }
    print_sections(items);
    Ok(())
}

fn print_sections(items: Vec<ActionItem>) {
    if items.is_empty() {
        println!("No action items.");
        return;
    }

    let sections = ActionSections::from_items(items);
    let mut first = true;
    for &priority in Priority::all() {
        let section = sections.get(priority);
        if section.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;

        println!("{} ({})", priority.heading(), section.len());
        let rows = section
            .iter()
            .map(|item| {
                vec![
                    item.kind.to_string(),
                    item.title.clone(),
                    item.subtitle.clone(),
                    item.action_label.clone(),
                    item.target.path(),
                ]
            })
            .collect();
        print_table(&["TYPE", "TITLE", "DETAIL", "ACTION", "OPEN"], rows);
    }
}
