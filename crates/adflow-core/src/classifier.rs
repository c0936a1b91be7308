use crate::config::EngineConfig;
use crate::dates::days_until;
use crate::evidence::Evidence;
use crate::placement::Placement;
use crate::snapshot::Order;
use crate::types::{ActionType, PlacementStatus, Priority};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

pub struct OrderContext<'a> {
    pub order: &'a Order,
    pub now: DateTime<Utc>,
    pub config: &'a EngineConfig,
}

impl OrderContext<'_> {
    pub fn days_to_start(&self) -> Option<i64> {
        self.order.start_date().map(|d| days_until(d, self.now))
    }

    pub fn within_window(&self, days: Option<i64>) -> bool {
        within_window(days, self.config)
    }
}

pub struct EvalContext<'a> {
    pub order: &'a Order,
    pub placement: &'a Placement,
    pub status: PlacementStatus,
    pub evidence: Evidence,
    pub now: DateTime<Utc>,
    pub config: &'a EngineConfig,
}

impl EvalContext<'_> {
    pub fn days_to_start(&self) -> Option<i64> {
        self.order.start_date().map(|d| days_until(d, self.now))
    }

    pub fn days_to_end(&self) -> Option<i64> {
        self.order.end_date().map(|d| days_until(d, self.now))
    }

    pub fn within_window(&self, days: Option<i64>) -> bool {
        within_window(days, self.config)
    }
}

/// `0..=window_days`, both ends inclusive. Absent dates are never in window.
fn within_window(days: Option<i64>, config: &EngineConfig) -> bool {
    days.is_some_and(|d| (0..=config.window_days).contains(&d))
}

// ---------------------------------------------------------------------------
// Verdict (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub rule: String,
    pub action: ActionType,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Result of running the placement rules: the rule that decided, and the
/// verdict it produced (none for halting rules and the fallthrough).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub rule: String,
    pub verdict: Option<Verdict>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderVerdict {
    pub verdict: Verdict,
    /// Placement rules are not evaluated for this order.
    pub skip_placements: bool,
}

pub const NO_ACTION_RULE: &str = "no_action";

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Emit { action: ActionType, priority: Priority },
    /// Stop evaluating; the placement produces nothing.
    Halt,
}

/// A fn-pointer placement rule.
pub struct Rule {
    pub id: &'static str,
    pub condition: fn(&EvalContext) -> bool,
    pub outcome: Outcome,
    pub due_date: Option<fn(&EvalContext) -> Option<NaiveDate>>,
}

/// A fn-pointer order rule, evaluated once per order before its placements.
pub struct OrderRule {
    pub id: &'static str,
    pub condition: fn(&OrderContext) -> bool,
    pub action: ActionType,
    pub priority: Priority,
    pub due_date: Option<fn(&OrderContext) -> Option<NaiveDate>>,
    pub skip_placements: bool,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

pub struct Classifier {
    order_rules: Vec<OrderRule>,
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(order_rules: Vec<OrderRule>, rules: Vec<Rule>) -> Self {
        Self { order_rules, rules }
    }

    pub fn order_rules(&self) -> &[OrderRule] {
        &self.order_rules
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First matching order rule, if any.
    pub fn classify_order(&self, ctx: &OrderContext) -> Option<OrderVerdict> {
        let rule = self.order_rules.iter().find(|r| (r.condition)(ctx))?;
        Some(OrderVerdict {
            verdict: Verdict {
                rule: rule.id.to_string(),
                action: rule.action,
                priority: rule.priority,
                due_date: rule.due_date.and_then(|f| f(ctx)),
            },
            skip_placements: rule.skip_placements,
        })
    }

    /// First matching placement rule decides; later rules are not consulted.
    pub fn classify(&self, ctx: &EvalContext) -> Classification {
        for rule in &self.rules {
            if (rule.condition)(ctx) {
                let verdict = match rule.outcome {
                    Outcome::Emit { action, priority } => Some(Verdict {
                        rule: rule.id.to_string(),
                        action,
                        priority,
                        due_date: rule.due_date.and_then(|f| f(ctx)),
                    }),
                    Outcome::Halt => None,
                };
                return Classification {
                    rule: rule.id.to_string(),
                    verdict,
                };
            }
        }

        Classification {
            rule: NO_ACTION_RULE.to_string(),
            verdict: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
