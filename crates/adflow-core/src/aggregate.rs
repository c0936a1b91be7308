use crate::classifier::Verdict;
use crate::dates::{days_until, format_date, plural_days};
use crate::placement::Placement;
use crate::snapshot::Order;
use crate::types::{ActionType, Priority, TargetSection};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// ActionItem (output)
// ---------------------------------------------------------------------------

/// Where the rendering layer should navigate to act on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTarget {
    pub campaign_id: String,
    pub publication_id: String,
    pub section: TargetSection,
}

impl ActionTarget {
    pub fn path(&self) -> String {
        format!(
            "/campaigns/{}/publications/{}#{}",
            self.campaign_id,
            self.publication_id,
            self.section.as_str()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub priority: Priority,
    pub title: String,
    pub subtitle: String,
    pub order_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub publication_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub action_label: String,
    pub target: ActionTarget,
    pub placement_ids: Vec<String>,
    pub placement_names: Vec<String>,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Finding (input)
// ---------------------------------------------------------------------------

/// The order fields an item needs, detached from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRef {
    pub order_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub publication_id: String,
    pub start_date: Option<NaiveDate>,
}

impl From<&Order> for OrderRef {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.to_string(),
            campaign_id: order.campaign_id.to_string(),
            campaign_name: order.campaign_display_name().to_string(),
            publication_id: order.publication_id.to_string(),
            start_date: order.start_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Emitted once for the whole order; never merged with other findings.
    Order { placements: Vec<Placement> },
    Placement(Placement),
}

/// One classifier verdict awaiting aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub order: OrderRef,
    pub scope: Scope,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

struct Draft<'a> {
    order: &'a OrderRef,
    action: ActionType,
    priority: Priority,
    due_date: Option<NaiveDate>,
    order_level: bool,
    placement_ids: Vec<String>,
    placement_names: Vec<String>,
}

/// Fold findings into action items.
///
/// Placement findings sharing `(order, type, priority)` become one item whose
/// names keep first-seen order. Order-level findings stay singletons. Items
/// come out in the order their first finding was seen.
pub fn aggregate(findings: &[Finding], now: DateTime<Utc>) -> Vec<ActionItem> {
    let mut drafts: Vec<Draft> = Vec::new();
    let mut groups: HashMap<(&str, ActionType, Priority), usize> = HashMap::new();

    for finding in findings {
        let verdict = &finding.verdict;
        match &finding.scope {
            Scope::Order { placements } => drafts.push(Draft {
                order: &finding.order,
                action: verdict.action,
                priority: verdict.priority,
                due_date: verdict.due_date,
                order_level: true,
                placement_ids: placements.iter().map(|p| p.id.clone()).collect(),
                placement_names: placements.iter().map(|p| p.name.clone()).collect(),
            }),
            Scope::Placement(placement) => {
                let key = (
                    finding.order.order_id.as_str(),
                    verdict.action,
                    verdict.priority,
                );
                let idx = *groups.entry(key).or_insert_with(|| {
                    drafts.push(Draft {
                        order: &finding.order,
                        action: verdict.action,
                        priority: verdict.priority,
                        due_date: verdict.due_date,
                        order_level: false,
                        placement_ids: Vec::new(),
                        placement_names: Vec::new(),
                    });
                    drafts.len() - 1
                });
                let draft = &mut drafts[idx];
                draft.placement_ids.push(placement.id.clone());
                draft.placement_names.push(placement.name.clone());
            }
        }
    }

    drafts.into_iter().map(|d| d.into_item(now)).collect()
}

impl Draft<'_> {
    fn into_item(self, now: DateTime<Utc>) -> ActionItem {
        let order = self.order;
        let count = self.placement_names.len();
        let id = match (self.order_level, self.placement_ids.as_slice()) {
            (false, [only]) => format!("{}-{}-{}", order.order_id, self.action, only),
            _ => format!("{}-{}", order.order_id, self.action),
        };
        let (title, subtitle) = self.describe(now);

        ActionItem {
            id,
            kind: self.action,
            priority: self.priority,
            title,
            subtitle,
            order_id: order.order_id.clone(),
            campaign_id: order.campaign_id.clone(),
            campaign_name: order.campaign_name.clone(),
            publication_id: order.publication_id.clone(),
            due_date: self.due_date,
            action_label: self.action.action_label().to_string(),
            target: ActionTarget {
                campaign_id: order.campaign_id.clone(),
                publication_id: order.publication_id.clone(),
                section: self.action.target_section(),
            },
            placement_ids: self.placement_ids,
            placement_names: self.placement_names,
            count,
        }
    }

    /// Title and subtitle, phrased for one placement or for several.
    fn describe(&self, now: DateTime<Utc>) -> (String, String) {
        let campaign = &self.order.campaign_name;
        let n = self.placement_names.len();
        let one = match self.placement_names.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        };
        let due_in = self.due_date.map(|d| days_until(d, now));

        match self.action {
            ActionType::NeedsAcceptance => (
                "New order awaiting acceptance".to_string(),
                match n {
                    0 => format!("{campaign} · review and respond"),
                    1 => format!("{campaign} · 1 placement requested"),
                    _ => format!("{campaign} · {n} placements requested"),
                },
            ),
            ActionType::StartingSoon => (
                match due_in {
                    Some(d) => format!("Campaign starts {}", relative(d)),
                    None => "Campaign starts soon".to_string(),
                },
                with_date(campaign, "starts", self.due_date),
            ),
            ActionType::AwaitingAssets => (
                match one {
                    Some(name) => format!("Waiting on creative for {name}"),
                    None => format!("{n} placements waiting on creative"),
                },
                format!("{campaign} · creative assets not received yet"),
            ),
            ActionType::ReadyToGoLive => {
                let title = match one {
                    Some(name) => format!("{name} is ready to go live"),
                    None => format!("{n} placements ready to go live"),
                };
                let subtitle = match self.priority {
                    Priority::Urgent => match self.order.start_date.map(|d| -days_until(d, now)) {
                        Some(ago) => format!("{campaign} · started {} ago", plural_days(ago)),
                        None => format!("{campaign} · campaign has started"),
                    },
                    Priority::Soon => match (self.due_date, due_in) {
                        (Some(date), Some(d)) => {
                            format!("{campaign} · starts {} ({})", format_date(date), relative(d))
                        }
                        _ => format!("{campaign} · starts soon"),
                    },
                    _ => match self.due_date {
                        Some(date) => format!("{campaign} · starts {}", format_date(date)),
                        None => format!("{campaign} · start date not set"),
                    },
                };
                (title, subtitle)
            }
            ActionType::OverdueReport => (
                match one {
                    Some(name) => format!("Report results for {name}"),
                    None => format!("{n} placements need reports"),
                },
                match due_in {
                    Some(d) => format!("{campaign} · {} overdue", plural_days(-d)),
                    None => format!("{campaign} · report overdue"),
                },
            ),
            ActionType::MissingProof => (
                match one {
                    Some(name) => format!("Add proof of performance for {name}"),
                    None => format!("{n} placements need proof of performance"),
                },
                format!("{campaign} · results reported, proof missing"),
            ),
            ActionType::EndingSoon => (
                match one {
                    Some(name) => format!("{name} ends soon"),
                    None => format!("{n} placements ending soon"),
                },
                match (self.due_date, due_in) {
                    (Some(date), Some(d)) => {
                        format!("{campaign} · ends {} ({})", format_date(date), relative(d))
                    }
                    _ => format!("{campaign} · ends soon"),
                },
            ),
            ActionType::Completed => (
                match one {
                    Some(name) => format!("{name} is complete"),
                    None => format!("{n} placements complete"),
                },
                format!("{campaign} · results submitted"),
            ),
        }
    }
}

fn relative(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d => format!("in {}", plural_days(d)),
    }
}

fn with_date(campaign: &str, verb: &str, date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{campaign} · {verb} {}", format_date(d)),
        None => format!("{campaign} · {verb} soon"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
