//! Event types emitted by the FundChain contract, as seen by the indexer.
//!
//! These mirror the topics published in `contracts/fundchain/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the FundChain contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A campaign was registered (`created` topic).
    CampaignCreated,
    /// An admin verified a campaign (`verified` topic).
    CampaignVerified,
    /// A donation was received (`donated` topic).
    DonationReceived,
    /// A campaign reached its target (`closed` topic).
    CampaignClosed,
    /// An admin completed a milestone (`milestone` topic).
    MilestoneCompleted,
    /// The owner withdrew unlocked funds (`withdrawn` topic).
    FundsWithdrawn,
    /// An admin was added (`adm_add` topic).
    AdminAdded,
    /// An admin was removed (`adm_del` topic).
    AdminRemoved,
    /// Protocol was paused (`paused` topic).
    ProtocolPaused,
    /// Protocol was unpaused (`unpaused` topic).
    ProtocolUnpaused,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "verified" => Self::CampaignVerified,
            "donated" => Self::DonationReceived,
            "closed" => Self::CampaignClosed,
            "milestone" => Self::MilestoneCompleted,
            "withdrawn" => Self::FundsWithdrawn,
            "adm_add" => Self::AdminAdded,
            "adm_del" => Self::AdminRemoved,
            "paused" => Self::ProtocolPaused,
            "unpaused" => Self::ProtocolUnpaused,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::CampaignVerified => "campaign_verified",
            Self::DonationReceived => "donation_received",
            Self::CampaignClosed => "campaign_closed",
            Self::MilestoneCompleted => "milestone_completed",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::AdminAdded => "admin_added",
            Self::AdminRemoved => "admin_removed",
            Self::ProtocolPaused => "protocol_paused",
            Self::ProtocolUnpaused => "protocol_unpaused",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`]; unrecognised strings map to `Unknown`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "campaign_created" => Self::CampaignCreated,
            "campaign_verified" => Self::CampaignVerified,
            "donation_received" => Self::DonationReceived,
            "campaign_closed" => Self::CampaignClosed,
            "milestone_completed" => Self::MilestoneCompleted,
            "funds_withdrawn" => Self::FundsWithdrawn,
            "admin_added" => Self::AdminAdded,
            "admin_removed" => Self::AdminRemoved,
            "protocol_paused" => Self::ProtocolPaused,
            "protocol_unpaused" => Self::ProtocolUnpaused,
            _ => Self::Unknown,
        }
    }
}

/// A decoded FundChain event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundChainEvent {
    /// RPC event id; the idempotency key.
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event row as read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_db(&self.event_type)
    }

    /// Parse the stored amount; i128 values are kept as strings.
    pub fn amount_i128(&self) -> Option<i128> {
        self.amount.as_deref().and_then(|a| a.parse().ok())
    }
}
