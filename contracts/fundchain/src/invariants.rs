#![allow(dead_code)]

extern crate std;

use crate::ledger;
use crate::types::{Campaign, CampaignStatus};

/// INV-1: Withdrawals never exceed the sum of completed milestone amounts.
pub fn assert_withdrawn_within_completed(campaign: &Campaign) {
    let completed = ledger::completed_total(&campaign.milestones).expect("overflow");
    assert!(
        campaign.withdrawn <= completed,
        "INV-1 violated: campaign {} withdrew {} with only {} unlocked",
        campaign.id,
        campaign.withdrawn,
        completed
    );
}

/// INV-2: Withdrawals never exceed the amount raised.
pub fn assert_withdrawn_within_raised(campaign: &Campaign) {
    assert!(
        campaign.withdrawn <= campaign.raised,
        "INV-2 violated: campaign {} withdrew {} of {} raised",
        campaign.id,
        campaign.withdrawn,
        campaign.raised
    );
}

/// INV-3: Raised never exceeds target, and reaching the target means Closed.
pub fn assert_raised_within_target(campaign: &Campaign) {
    assert!(
        campaign.raised <= campaign.target,
        "INV-3 violated: campaign {} raised {} over target {}",
        campaign.id,
        campaign.raised,
        campaign.target
    );
    if campaign.raised == campaign.target {
        assert_eq!(
            campaign.status,
            CampaignStatus::Closed,
            "INV-3 violated: campaign {} reached target but is not closed",
            campaign.id
        );
    }
}

/// INV-4: Milestone amounts sum to the target.
pub fn assert_milestones_sum_to_target(campaign: &Campaign) {
    let total: i128 = campaign.milestones.iter().map(|m| m.amount).sum();
    assert_eq!(
        total, campaign.target,
        "INV-4 violated: campaign {} milestones sum to {}",
        campaign.id, total
    );
}

/// INV-5: Distinct donors never outnumber individual donations.
pub fn assert_donor_count_bounded(campaign: &Campaign) {
    assert!(
        campaign.donor_count <= campaign.donation_count,
        "INV-5 violated: campaign {} has {} donors but {} donations",
        campaign.id,
        campaign.donor_count,
        campaign.donation_count
    );
}

/// INV-6: Only forward status transitions.
pub fn assert_valid_status_transition(from: &CampaignStatus, to: &CampaignStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (CampaignStatus::Open, CampaignStatus::Verified)
                | (CampaignStatus::Verified, CampaignStatus::Closed)
        );
    assert!(
        valid,
        "INV-6 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(campaign: &Campaign) {
    assert_withdrawn_within_completed(campaign);
    assert_withdrawn_within_raised(campaign);
    assert_raised_within_target(campaign);
    assert_milestones_sum_to_target(campaign);
    assert_donor_count_bounded(campaign);
}
