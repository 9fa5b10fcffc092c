//! # Ledger
//!
//! Accounting rules shared by `create_campaign`, `donate` and `withdraw`.
//! Everything here is pure: callers load state, apply a rule, and persist.
//!
//! The central rule is the withdrawal cap:
//!
//! ```text
//! withdrawn + amount <= Σ amount(m) for every completed milestone m
//! withdrawn + amount <= raised
//! ```

use soroban_sdk::{Env, Vec};

use crate::types::{CampaignState, CampaignStatus, Milestone, MilestoneInput};
use crate::Error;

/// Upper bound on milestones per campaign.
pub const MAX_MILESTONES: u32 = 20;

/// Validate owner-supplied milestones against the campaign target and turn
/// them into stored milestones (all incomplete).
pub fn build_milestones(
    env: &Env,
    inputs: &Vec<MilestoneInput>,
    target: i128,
) -> Result<Vec<Milestone>, Error> {
    if inputs.is_empty() || inputs.len() > MAX_MILESTONES {
        return Err(Error::InvalidMilestones);
    }

    let mut total: i128 = 0;
    let mut milestones = Vec::new(env);
    for input in inputs.iter() {
        if input.amount <= 0 {
            return Err(Error::InvalidMilestones);
        }
        total = total.checked_add(input.amount).ok_or(Error::Overflow)?;
        milestones.push_back(Milestone {
            title: input.title,
            description: input.description,
            amount: input.amount,
            completed: false,
        });
    }

    if total != target {
        return Err(Error::GoalMismatch);
    }
    Ok(milestones)
}

/// Sum of the amounts of every completed milestone.
pub fn completed_total(milestones: &Vec<Milestone>) -> Result<i128, Error> {
    milestones
        .iter()
        .filter(|m| m.completed)
        .try_fold(0i128, |acc, m| acc.checked_add(m.amount).ok_or(Error::Overflow))
}

/// Amount the owner may still withdraw right now.
pub fn withdrawable(state: &CampaignState, milestones: &Vec<Milestone>) -> Result<i128, Error> {
    let unlocked = completed_total(milestones)?.min(state.raised);
    Ok((unlocked - state.withdrawn).max(0))
}

/// Apply a donation of `amount` to `state`.
///
/// `first_from_donor` is true when this donor has never given to the campaign
/// before. Returns `true` when the donation reached the target and closed the
/// campaign.
pub fn apply_donation(
    state: &mut CampaignState,
    target: i128,
    amount: i128,
    first_from_donor: bool,
) -> Result<bool, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    match state.status {
        CampaignStatus::Verified => {}
        CampaignStatus::Open => return Err(Error::CampaignNotVerified),
        CampaignStatus::Closed => return Err(Error::CampaignClosed),
    }

    let raised = state.raised.checked_add(amount).ok_or(Error::Overflow)?;
    if raised > target {
        return Err(Error::ExceedsTarget);
    }

    state.raised = raised;
    state.donation_count = state.donation_count.checked_add(1).ok_or(Error::Overflow)?;
    if first_from_donor {
        state.donor_count = state.donor_count.checked_add(1).ok_or(Error::Overflow)?;
    }

    if state.raised >= target {
        state.status = CampaignStatus::Closed;
        return Ok(true);
    }
    Ok(false)
}

/// Apply a withdrawal of `amount` to `state`, enforcing the milestone cap.
pub fn apply_withdrawal(
    state: &mut CampaignState,
    milestones: &Vec<Milestone>,
    amount: i128,
) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let after = state.withdrawn.checked_add(amount).ok_or(Error::Overflow)?;
    if after > completed_total(milestones)? {
        return Err(Error::ExceedsCompletedMilestones);
    }
    if after > state.raised {
        return Err(Error::InsufficientBalance);
    }

    state.withdrawn = after;
    Ok(())
}

/// Mark milestone `index` complete.
pub fn complete_milestone(milestones: &mut Vec<Milestone>, index: u32) -> Result<Milestone, Error> {
    let mut milestone = milestones.get(index).ok_or(Error::MilestoneNotFound)?;
    if milestone.completed {
        return Err(Error::MilestoneAlreadyCompleted);
    }
    milestone.completed = true;
    milestones.set(index, milestone.clone());
    Ok(milestone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{vec, String};

    fn input(env: &Env, amount: i128) -> MilestoneInput {
        MilestoneInput {
            title: String::from_str(env, "phase"),
            description: String::from_str(env, "deliverable"),
            amount,
        }
    }

    fn verified_state() -> CampaignState {
        CampaignState {
            raised: 0,
            withdrawn: 0,
            donor_count: 0,
            donation_count: 0,
            status: CampaignStatus::Verified,
            updated_at: 0,
        }
    }

    #[test]
    fn milestones_must_sum_to_target() {
        let env = Env::default();
        let inputs = vec![&env, input(&env, 300), input(&env, 700)];
        assert_eq!(build_milestones(&env, &inputs, 1_000).unwrap().len(), 2);
        assert_eq!(
            build_milestones(&env, &inputs, 1_200),
            Err(Error::GoalMismatch)
        );
    }

    #[test]
    fn empty_or_non_positive_milestones_rejected() {
        let env = Env::default();
        let empty: Vec<MilestoneInput> = Vec::new(&env);
        assert_eq!(
            build_milestones(&env, &empty, 100),
            Err(Error::InvalidMilestones)
        );
        let zero = vec![&env, input(&env, 100), input(&env, 0)];
        assert_eq!(
            build_milestones(&env, &zero, 100),
            Err(Error::InvalidMilestones)
        );
    }

    #[test]
    fn too_many_milestones_rejected() {
        let env = Env::default();
        let mut inputs = Vec::new(&env);
        for _ in 0..=MAX_MILESTONES {
            inputs.push_back(input(&env, 1));
        }
        assert_eq!(
            build_milestones(&env, &inputs, (MAX_MILESTONES + 1) as i128),
            Err(Error::InvalidMilestones)
        );
    }

    #[test]
    fn withdrawal_capped_by_completed_milestones() {
        let env = Env::default();
        let mut milestones =
            build_milestones(&env, &vec![&env, input(&env, 400), input(&env, 600)], 1_000)
                .unwrap();
        let mut state = verified_state();
        state.raised = 1_000;

        assert_eq!(
            apply_withdrawal(&mut state, &milestones, 1),
            Err(Error::ExceedsCompletedMilestones)
        );

        complete_milestone(&mut milestones, 0).unwrap();
        assert_eq!(withdrawable(&state, &milestones), Ok(400));
        apply_withdrawal(&mut state, &milestones, 250).unwrap();
        assert_eq!(
            apply_withdrawal(&mut state, &milestones, 151),
            Err(Error::ExceedsCompletedMilestones)
        );
        apply_withdrawal(&mut state, &milestones, 150).unwrap();
        assert_eq!(state.withdrawn, 400);
        assert_eq!(withdrawable(&state, &milestones), Ok(0));
    }

    #[test]
    fn withdrawal_capped_by_raised() {
        let env = Env::default();
        let mut milestones =
            build_milestones(&env, &vec![&env, input(&env, 1_000)], 1_000).unwrap();
        complete_milestone(&mut milestones, 0).unwrap();

        let mut state = verified_state();
        state.raised = 300;
        assert_eq!(withdrawable(&state, &milestones), Ok(300));
        assert_eq!(
            apply_withdrawal(&mut state, &milestones, 301),
            Err(Error::InsufficientBalance)
        );
    }

    #[test]
    fn donation_reaching_target_closes() {
        let mut state = verified_state();
        assert_eq!(apply_donation(&mut state, 1_000, 400, true), Ok(false));
        assert_eq!(state.status, CampaignStatus::Verified);
        assert_eq!(apply_donation(&mut state, 1_000, 600, false), Ok(true));
        assert_eq!(state.status, CampaignStatus::Closed);
        assert_eq!(state.donor_count, 1);
        assert_eq!(state.donation_count, 2);
    }

    #[test]
    fn donation_rules() {
        let mut state = verified_state();
        assert_eq!(
            apply_donation(&mut state, 1_000, 0, true),
            Err(Error::InvalidAmount)
        );
        assert_eq!(
            apply_donation(&mut state, 1_000, 1_001, true),
            Err(Error::ExceedsTarget)
        );

        state.status = CampaignStatus::Open;
        assert_eq!(
            apply_donation(&mut state, 1_000, 10, true),
            Err(Error::CampaignNotVerified)
        );
        state.status = CampaignStatus::Closed;
        assert_eq!(
            apply_donation(&mut state, 1_000, 10, true),
            Err(Error::CampaignClosed)
        );
        assert_eq!(state.raised, 0);
    }

    #[test]
    fn milestone_completes_once() {
        let env = Env::default();
        let mut milestones =
            build_milestones(&env, &vec![&env, input(&env, 10)], 10).unwrap();
        assert!(complete_milestone(&mut milestones, 0).unwrap().completed);
        assert_eq!(
            complete_milestone(&mut milestones, 0),
            Err(Error::MilestoneAlreadyCompleted)
        );
        assert_eq!(
            complete_milestone(&mut milestones, 1),
            Err(Error::MilestoneNotFound)
        );
    }
}
