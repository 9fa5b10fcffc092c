//! Campaign summaries folded from indexed events.
//!
//! Dashboards want the same numbers the contract keeps (raised, withdrawn,
//! donors, status) without one RPC round-trip per campaign, so they are
//! rebuilt here from the event stream.

use std::collections::HashSet;

use serde::Serialize;

use crate::events::{EventKind, EventRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    Open,
    Verified,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub owner: Option<String>,
    /// Amounts are decimal strings; JSON numbers cannot hold every i128.
    pub target: Option<String>,
    pub raised: String,
    pub withdrawn: String,
    pub donor_count: usize,
    pub donation_count: usize,
    pub milestones_completed: usize,
    pub status: DerivedStatus,
    pub last_ledger: i64,
}

/// Fold `events` (all belonging to `campaign_id`, in ledger order) into a summary.
///
/// Returns `None` when there are no events for the campaign.
pub fn summarize(campaign_id: &str, events: &[EventRecord]) -> Option<CampaignSummary> {
    if events.is_empty() {
        return None;
    }

    let mut owner = None;
    let mut target = None;
    let mut raised: i128 = 0;
    let mut withdrawn: i128 = 0;
    let mut donors = HashSet::new();
    let mut donation_count = 0;
    let mut milestones_completed = 0;
    let mut status = DerivedStatus::Open;
    let mut last_ledger = 0;

    for ev in events {
        last_ledger = last_ledger.max(ev.ledger);
        match ev.kind() {
            EventKind::CampaignCreated => {
                owner = ev.actor.clone();
                target = ev.amount.clone();
            }
            EventKind::CampaignVerified => {
                if status == DerivedStatus::Open {
                    status = DerivedStatus::Verified;
                }
            }
            EventKind::DonationReceived => {
                raised = raised.saturating_add(ev.amount_i128().unwrap_or(0));
                donation_count += 1;
                if let Some(donor) = &ev.actor {
                    donors.insert(donor.as_str());
                }
            }
            EventKind::CampaignClosed => status = DerivedStatus::Closed,
            EventKind::MilestoneCompleted => milestones_completed += 1,
            EventKind::FundsWithdrawn => {
                withdrawn = withdrawn.saturating_add(ev.amount_i128().unwrap_or(0));
            }
            _ => {}
        }
    }

    Some(CampaignSummary {
        campaign_id: campaign_id.to_string(),
        owner,
        target,
        raised: raised.to_string(),
        withdrawn: withdrawn.to_string(),
        donor_count: donors.len(),
        donation_count,
        milestones_completed,
        status,
        last_ledger,
    })
}
