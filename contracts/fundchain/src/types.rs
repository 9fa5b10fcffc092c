//! # Types
//!
//! Shared data structures used across all modules of the FundChain contract.
//!
//! ## Config / State split
//!
//! A `Campaign` is internally stored as three ledger entries:
//!
//! - [`CampaignConfig`] — written once at creation; never mutated.
//! - [`CampaignState`] — written on every donation and withdrawal.
//! - the milestone list — written when an admin completes a milestone.
//!
//! The public API exposes the reconstructed [`Campaign`] struct.
//!
//! ## Status lifecycle
//!
//! ```text
//! Open ──► Verified ──► Closed
//! ```
//!
//! `Open → Verified` is an admin action; `Verified → Closed` happens
//! automatically once `raised >= target`. Nothing moves backwards.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Lifecycle status of a campaign.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Created, waiting for an admin to verify it.
    Open,
    /// Verified by an admin; accepting donations.
    Verified,
    /// Target reached; no further donations.
    Closed,
}

/// Milestone as supplied by the campaign owner at creation time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneInput {
    pub title: String,
    pub description: String,
    pub amount: i128,
}

/// A named sub-goal gating partial withdrawal of raised funds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    /// Amount unlocked for withdrawal once completed.
    pub amount: i128,
    pub completed: bool,
}

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub owner: Address,
    pub token: Address,
    pub title: String,
    pub description: String,
    pub image_uri: String,
    pub target: i128,
    pub created_at: u64,
}

/// Mutable campaign state, updated on donations, verification and withdrawals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub raised: i128,
    pub withdrawn: i128,
    pub donor_count: u32,
    pub donation_count: u32,
    pub status: CampaignStatus,
    pub updated_at: u64,
}

/// Full on-chain representation of a campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Sequential identifier, starting at 0.
    pub id: u64,
    /// Address that created the campaign and receives withdrawals.
    pub owner: Address,
    /// Token contract in which donations are made.
    pub token: Address,
    pub title: String,
    pub description: String,
    /// Content URI of the campaign image (e.g. an IPFS CID).
    pub image_uri: String,
    /// Funding target; equals the sum of all milestone amounts.
    pub target: i128,
    /// Total donated so far.
    pub raised: i128,
    /// Total withdrawn by the owner so far.
    pub withdrawn: i128,
    /// Number of distinct donors.
    pub donor_count: u32,
    /// Number of individual donations.
    pub donation_count: u32,
    pub status: CampaignStatus,
    pub created_at: u64,
    pub updated_at: u64,
    pub milestones: Vec<Milestone>,
}

/// A single donation record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donation {
    pub campaign_id: u64,
    pub donor: Address,
    pub amount: i128,
    pub timestamp: u64,
}
