use crate::classifier::{EvalContext, OrderContext, OrderRule, Outcome, Rule};
use crate::types::{ActionType, OrderStatus, PlacementStatus, Priority};
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Helper macros for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (
        id: $id:expr,
        condition: $cond:expr,
        action: $action:expr,
        priority: $priority:expr
        $(, due_date: $due:expr)?
    ) => {
        Rule {
            id: $id,
            condition: $cond,
            outcome: Outcome::Emit {
                action: $action,
                priority: $priority,
            },
            due_date: {
                #[allow(unused_assignments, unused_mut)]
                let mut v: Option<fn(&EvalContext) -> Option<NaiveDate>> = None;
                $(v = Some($due);)?
                v
            },
        }
    };
}

macro_rules! halt {
    (id: $id:expr, condition: $cond:expr) => {
        Rule {
            id: $id,
            condition: $cond,
            outcome: Outcome::Halt,
            due_date: None,
        }
    };
}

// ---------------------------------------------------------------------------
// Condition helpers
// ---------------------------------------------------------------------------

fn is_accepted(ctx: &EvalContext) -> bool {
    ctx.status == PlacementStatus::Accepted
}

fn start_date(ctx: &EvalContext) -> Option<NaiveDate> {
    ctx.order.start_date()
}

fn end_date(ctx: &EvalContext) -> Option<NaiveDate> {
    ctx.order.end_date()
}

fn started(ctx: &EvalContext) -> bool {
    ctx.days_to_start().is_some_and(|d| d < 0)
}

fn ended(ctx: &EvalContext) -> bool {
    ctx.days_to_end().is_some_and(|d| d < 0)
}

fn has_entry(ctx: &EvalContext) -> bool {
    ctx.evidence.has_entry
}

fn has_proof(ctx: &EvalContext) -> bool {
    ctx.evidence.has_proof
}

fn order_start_date(ctx: &OrderContext) -> Option<NaiveDate> {
    ctx.order.start_date()
}

// ---------------------------------------------------------------------------
// Order rules
// ---------------------------------------------------------------------------

pub fn default_order_rules() -> Vec<OrderRule> {
    vec![
        // Not yet accepted: nothing else about the order is actionable
        OrderRule {
            id: "needs_acceptance",
            condition: |ctx| ctx.order.status == OrderStatus::Sent,
            action: ActionType::NeedsAcceptance,
            priority: Priority::Urgent,
            due_date: None,
            skip_placements: true,
        },
        // Confirmed campaign about to start
        OrderRule {
            id: "starting_soon",
            condition: |ctx| {
                ctx.order.status == OrderStatus::Confirmed
                    && ctx.within_window(ctx.days_to_start())
            },
            action: ActionType::StartingSoon,
            priority: Priority::Soon,
            due_date: Some(order_start_date),
            skip_placements: false,
        },
    ]
}

// ---------------------------------------------------------------------------
// Placement rules (priority-ordered, first match wins)
// ---------------------------------------------------------------------------

pub fn default_rules() -> Vec<Rule> {
    vec![
        // 1. Accepted digital placement without creative
        rule! {
            id: "awaiting_assets",
            condition: |ctx| is_accepted(ctx)
                && ctx.placement.is_digital
                && !ctx.evidence.has_assets,
            action: ActionType::AwaitingAssets,
            priority: Priority::Info
        },
        // 2. Accepted, campaign already started
        rule! {
            id: "go_live_overdue",
            condition: |ctx| is_accepted(ctx) && started(ctx),
            action: ActionType::ReadyToGoLive,
            priority: Priority::Urgent
        },
        // 3. Accepted, campaign starts inside the window
        rule! {
            id: "go_live_soon",
            condition: |ctx| is_accepted(ctx) && ctx.within_window(ctx.days_to_start()),
            action: ActionType::ReadyToGoLive,
            priority: Priority::Soon,
            due_date: start_date
        },
        // 4. Accepted, start is further out or not scheduled
        rule! {
            id: "go_live_later",
            condition: is_accepted,
            action: ActionType::ReadyToGoLive,
            priority: Priority::Info,
            due_date: start_date
        },
        // 5. Digital delivery is tracked automatically
        halt! {
            id: "digital_tracked",
            condition: |ctx| ctx.placement.is_digital
        },
        // 6. Nothing to report until the placement runs
        halt! {
            id: "not_running",
            condition: |ctx| !ctx.status.is_running()
        },
        // 7. Campaign over, no results
        rule! {
            id: "overdue_report",
            condition: |ctx| ended(ctx) && !has_entry(ctx),
            action: ActionType::OverdueReport,
            priority: Priority::Urgent,
            due_date: end_date
        },
        // 8. Results in, proof outstanding
        rule! {
            id: "missing_proof",
            condition: |ctx| has_entry(ctx)
                && !has_proof(ctx)
                && ctx.config.requires_proof(ctx.placement.channel),
            action: ActionType::MissingProof,
            priority: Priority::Urgent
        },
        // 9. Campaign ends inside the window, no results yet
        rule! {
            id: "ending_soon",
            condition: |ctx| ctx.within_window(ctx.days_to_end()) && !has_entry(ctx),
            action: ActionType::EndingSoon,
            priority: Priority::Soon,
            due_date: end_date
        },
        // 10. Results (and proof where required) submitted
        rule! {
            id: "completed",
            condition: |ctx| has_entry(ctx)
                && (has_proof(ctx) || ctx.config.proof_exempt(ctx.placement.channel)),
            action: ActionType::Completed,
            priority: Priority::Done
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, EvalContext, OrderContext};
    use crate::config::EngineConfig;
    use crate::dates::parse_instant;
    use crate::evidence::Evidence;
    use crate::placement::Placement;
    use crate::snapshot::{CampaignSnapshot, Order, Timeline};
    use crate::types::Channel;
    use chrono::{DateTime, Duration, Utc};

    fn now() -> DateTime<Utc> {
        parse_instant("2026-10-19T12:00:00Z").unwrap()
    }

    fn day(offset: i64) -> NaiveDate {
        now().date_naive() + Duration::days(offset)
    }

    fn order(status: OrderStatus, start: Option<i64>, end: Option<i64>) -> Order {
        let mut o = Order::new("o1", "c1", "pub", status);
        o.campaign = Some(CampaignSnapshot {
            name: Some("Fall Push".into()),
            timeline: Some(Timeline {
                start_date: start.map(day),
                end_date: end.map(day),
            }),
            selected_inventory: None,
        });
        o
    }

    fn placement(channel: Channel) -> Placement {
        let config = EngineConfig::default();
        Placement {
            id: "p1".into(),
            name: "Placement One".into(),
            channel,
            is_digital: config.is_digital(channel),
        }
    }

    fn evidence(has_entry: bool, has_proof: bool) -> Evidence {
        Evidence {
            has_entry,
            has_proof,
            has_assets: false,
        }
    }

    /// Classify one placement; returns (rule id, action, priority, due date).
    fn run(
        order: &Order,
        channel: Channel,
        status: PlacementStatus,
        evidence: Evidence,
    ) -> (String, Option<(ActionType, Priority, Option<NaiveDate>)>) {
        let config = EngineConfig::default();
        let p = placement(channel);
        let ctx = EvalContext {
            order,
            placement: &p,
            status,
            evidence,
            now: now(),
            config: &config,
        };
        let c = Classifier::new(default_order_rules(), default_rules()).classify(&ctx);
        (
            c.rule,
            c.verdict.map(|v| (v.action, v.priority, v.due_date)),
        )
    }

    fn run_order(order: &Order) -> Option<(ActionType, Priority, bool)> {
        let config = EngineConfig::default();
        let ctx = OrderContext {
            order,
            now: now(),
            config: &config,
        };
        Classifier::new(default_order_rules(), default_rules())
            .classify_order(&ctx)
            .map(|v| (v.verdict.action, v.verdict.priority, v.skip_placements))
    }

    // -- order rules -------------------------------------------------------

    #[test]
    fn sent_order_needs_acceptance_and_skips_placements() {
        let o = order(OrderStatus::Sent, Some(-30), Some(-1));
        assert_eq!(
            run_order(&o),
            Some((ActionType::NeedsAcceptance, Priority::Urgent, true))
        );
    }

    #[test]
    fn confirmed_order_starting_within_window() {
        for offset in [0, 3, 7] {
            let o = order(OrderStatus::Confirmed, Some(offset), None);
            assert_eq!(
                run_order(&o),
                Some((ActionType::StartingSoon, Priority::Soon, false)),
                "offset {offset}"
            );
        }
        assert_eq!(run_order(&order(OrderStatus::Confirmed, Some(8), None)), None);
        assert_eq!(run_order(&order(OrderStatus::Confirmed, Some(-1), None)), None);
        assert_eq!(run_order(&order(OrderStatus::Confirmed, None, None)), None);
        assert_eq!(run_order(&order(OrderStatus::Accepted, Some(2), None)), None);
    }

    // -- accepted placements -----------------------------------------------

    #[test]
    fn accepted_digital_without_assets_awaits_assets() {
        let o = order(OrderStatus::Accepted, Some(-2), None);
        let (rule, v) = run(&o, Channel::Website, PlacementStatus::Accepted, evidence(false, false));
        assert_eq!(rule, "awaiting_assets");
        assert_eq!(v, Some((ActionType::AwaitingAssets, Priority::Info, None)));
    }

    #[test]
    fn accepted_digital_with_assets_goes_live() {
        let o = order(OrderStatus::Accepted, Some(-2), None);
        let ev = Evidence {
            has_assets: true,
            ..Default::default()
        };
        let (_, v) = run(&o, Channel::Newsletter, PlacementStatus::Accepted, ev);
        assert_eq!(v, Some((ActionType::ReadyToGoLive, Priority::Urgent, None)));
    }

    #[test]
    fn accepted_go_live_tiers() {
        let past = order(OrderStatus::Accepted, Some(-1), None);
        assert_eq!(
            run(&past, Channel::Print, PlacementStatus::Accepted, evidence(false, false)).1,
            Some((ActionType::ReadyToGoLive, Priority::Urgent, None))
        );

        let today = order(OrderStatus::Accepted, Some(0), None);
        assert_eq!(
            run(&today, Channel::Print, PlacementStatus::Accepted, evidence(false, false)).1,
            Some((ActionType::ReadyToGoLive, Priority::Soon, Some(day(0))))
        );

        let week = order(OrderStatus::Accepted, Some(7), None);
        assert_eq!(
            run(&week, Channel::Print, PlacementStatus::Accepted, evidence(false, false)).1,
            Some((ActionType::ReadyToGoLive, Priority::Soon, Some(day(7))))
        );

        let later = order(OrderStatus::Accepted, Some(8), None);
        let (rule, v) = run(&later, Channel::Print, PlacementStatus::Accepted, evidence(false, false));
        assert_eq!(rule, "go_live_later");
        assert_eq!(v, Some((ActionType::ReadyToGoLive, Priority::Info, Some(day(8)))));

        let unscheduled = order(OrderStatus::Accepted, None, None);
        assert_eq!(
            run(&unscheduled, Channel::Print, PlacementStatus::Accepted, evidence(false, false)).1,
            Some((ActionType::ReadyToGoLive, Priority::Info, None))
        );
    }

    // -- running placements ------------------------------------------------

    #[test]
    fn digital_running_placement_is_never_reported() {
        let o = order(OrderStatus::InProduction, Some(-30), Some(-5));
        let (rule, v) = run(&o, Channel::Website, PlacementStatus::InProduction, evidence(false, false));
        assert_eq!(rule, "digital_tracked");
        assert!(v.is_none());
    }

    #[test]
    fn pending_or_rejected_placements_halt() {
        let o = order(OrderStatus::InProduction, Some(-30), Some(-5));
        for status in [PlacementStatus::Pending, PlacementStatus::Rejected, PlacementStatus::Unknown] {
            let (rule, v) = run(&o, Channel::Print, status, evidence(false, false));
            assert_eq!(rule, "not_running");
            assert!(v.is_none());
        }
    }

    #[test]
    fn ended_without_results_is_overdue() {
        let o = order(OrderStatus::InProduction, Some(-30), Some(-10));
        let (rule, v) = run(&o, Channel::Print, PlacementStatus::InProduction, evidence(false, false));
        assert_eq!(rule, "overdue_report");
        assert_eq!(v, Some((ActionType::OverdueReport, Priority::Urgent, Some(day(-10)))));
    }

    #[test]
    fn results_without_proof_for_print_and_radio() {
        let o = order(OrderStatus::Delivered, Some(-30), Some(-10));
        for channel in [Channel::Print, Channel::Radio] {
            let (_, v) = run(&o, channel, PlacementStatus::Delivered, evidence(true, false));
            assert_eq!(v, Some((ActionType::MissingProof, Priority::Urgent, None)));
        }
    }

    #[test]
    fn podcast_completes_without_proof() {
        let o = order(OrderStatus::Delivered, Some(-30), Some(-10));
        let (_, v) = run(&o, Channel::Podcast, PlacementStatus::Delivered, evidence(true, false));
        assert_eq!(v, Some((ActionType::Completed, Priority::Done, None)));
    }

    #[test]
    fn results_and_proof_complete() {
        let o = order(OrderStatus::Delivered, Some(-30), Some(-10));
        let (rule, v) = run(&o, Channel::Radio, PlacementStatus::Delivered, evidence(true, true));
        assert_eq!(rule, "completed");
        assert_eq!(v, Some((ActionType::Completed, Priority::Done, None)));
    }

    #[test]
    fn ending_inside_window_without_results() {
        for offset in [0, 3, 7] {
            let o = order(OrderStatus::InProduction, Some(-30), Some(offset));
            let (_, v) = run(&o, Channel::Radio, PlacementStatus::InProduction, evidence(false, false));
            assert_eq!(
                v,
                Some((ActionType::EndingSoon, Priority::Soon, Some(day(offset)))),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn running_far_from_end_has_no_action() {
        let o = order(OrderStatus::InProduction, Some(-30), Some(20));
        let (rule, v) = run(&o, Channel::Print, PlacementStatus::InProduction, evidence(false, false));
        assert_eq!(rule, crate::classifier::NO_ACTION_RULE);
        assert!(v.is_none());
    }

    #[test]
    fn events_channel_with_results_but_no_proof_has_no_action() {
        let o = order(OrderStatus::Delivered, Some(-30), Some(-3));
        let (_, v) = run(&o, Channel::Events, PlacementStatus::Delivered, evidence(true, false));
        assert!(v.is_none());
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut ids: Vec<&str> = default_rules().iter().map(|r| r.id).collect();
        ids.extend(default_order_rules().iter().map(|r| r.id));
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }
}
