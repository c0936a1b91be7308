use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Sent,
    Confirmed,
    Accepted,
    Rejected,
    InProduction,
    Delivered,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Sent => "sent",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Other => "other",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PlacementStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    InProduction,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl PlacementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementStatus::Pending => "pending",
            PlacementStatus::Accepted => "accepted",
            PlacementStatus::Rejected => "rejected",
            PlacementStatus::InProduction => "in_production",
            PlacementStatus::Delivered => "delivered",
            PlacementStatus::Unknown => "unknown",
        }
    }

    /// True once the placement is running or has run.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            PlacementStatus::InProduction | PlacementStatus::Delivered
        )
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Website,
    Newsletter,
    Social,
    Streaming,
    Print,
    Radio,
    Podcast,
    Events,
    #[serde(other)]
    Other,
}

impl Channel {
    pub fn all() -> &'static [Channel] {
        &[
            Channel::Website,
            Channel::Newsletter,
            Channel::Social,
            Channel::Streaming,
            Channel::Print,
            Channel::Radio,
            Channel::Podcast,
            Channel::Events,
            Channel::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Website => "website",
            Channel::Newsletter => "newsletter",
            Channel::Social => "social",
            Channel::Streaming => "streaming",
            Channel::Print => "print",
            Channel::Radio => "radio",
            Channel::Podcast => "podcast",
            Channel::Events => "events",
            Channel::Other => "other",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Display tier of an action item. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    Soon,
    Info,
    Done,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Urgent,
            Priority::Soon,
            Priority::Info,
            Priority::Done,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Soon => "soon",
            Priority::Info => "info",
            Priority::Done => "done",
        }
    }

    /// Section heading used by list renderers.
    pub fn heading(self) -> &'static str {
        match self {
            Priority::Urgent => "Needs attention",
            Priority::Soon => "Coming up",
            Priority::Info => "For your information",
            Priority::Done => "Completed",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    NeedsAcceptance,
    StartingSoon,
    AwaitingAssets,
    ReadyToGoLive,
    OverdueReport,
    MissingProof,
    EndingSoon,
    Completed,
}

impl ActionType {
    pub fn all() -> &'static [ActionType] {
        &[
            ActionType::NeedsAcceptance,
            ActionType::StartingSoon,
            ActionType::AwaitingAssets,
            ActionType::ReadyToGoLive,
            ActionType::OverdueReport,
            ActionType::MissingProof,
            ActionType::EndingSoon,
            ActionType::Completed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::NeedsAcceptance => "needs_acceptance",
            ActionType::StartingSoon => "starting_soon",
            ActionType::AwaitingAssets => "awaiting_assets",
            ActionType::ReadyToGoLive => "ready_to_go_live",
            ActionType::OverdueReport => "overdue_report",
            ActionType::MissingProof => "missing_proof",
            ActionType::EndingSoon => "ending_soon",
            ActionType::Completed => "completed",
        }
    }

    /// Order-level actions are emitted once per order and never grouped.
    pub fn is_order_level(self) -> bool {
        matches!(self, ActionType::NeedsAcceptance | ActionType::StartingSoon)
    }

    pub fn action_label(self) -> &'static str {
        match self {
            ActionType::NeedsAcceptance => "Review order",
            ActionType::StartingSoon => "View campaign",
            ActionType::AwaitingAssets => "Check assets",
            ActionType::ReadyToGoLive => "Mark as live",
            ActionType::OverdueReport => "Report results",
            ActionType::MissingProof => "Add proof",
            ActionType::EndingSoon => "Report results",
            ActionType::Completed => "View results",
        }
    }

    /// Which part of the order screen the action lands on.
    pub fn target_section(self) -> TargetSection {
        match self {
            ActionType::NeedsAcceptance | ActionType::StartingSoon => TargetSection::Order,
            ActionType::AwaitingAssets => TargetSection::Assets,
            ActionType::ReadyToGoLive => TargetSection::Placements,
            ActionType::OverdueReport | ActionType::EndingSoon | ActionType::Completed => {
                TargetSection::Performance
            }
            ActionType::MissingProof => TargetSection::Proofs,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TargetSection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSection {
    Order,
    Assets,
    Placements,
    Performance,
    Proofs,
}

impl TargetSection {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetSection::Order => "order",
            TargetSection::Assets => "assets",
            TargetSection::Placements => "placements",
            TargetSection::Performance => "performance",
            TargetSection::Proofs => "proofs",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
