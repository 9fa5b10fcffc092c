//! # FundChain Contract
//!
//! Milestone-gated crowdfunding escrow. A single Soroban contract,
//! `FundChain`, acts as both the campaign factory (admin set, registry,
//! verification) and the per-campaign ledger (donations, milestones,
//! withdrawals).
//!
//! | Phase        | Entry Point(s)                                      |
//! |--------------|-----------------------------------------------------|
//! | Bootstrap    | [`FundChain::init`]                                 |
//! | Admin set    | `add_admin`, `remove_admin`, `pause`, `unpause`     |
//! | Registration | [`FundChain::create_campaign`]                      |
//! | Verification | [`FundChain::verify_campaign`]                      |
//! | Funding      | [`FundChain::donate`]                               |
//! | Milestones   | [`FundChain::complete_milestone`]                   |
//! | Payout       | [`FundChain::withdraw`]                             |
//! | Queries      | `get_campaign`, `get_campaigns`, `get_withdrawable`, … |
//!
//! Authorization lives in [`admin`], accounting rules in [`ledger`], and
//! storage layout in `storage`. This file wires them together and emits
//! events.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

pub mod admin;
pub mod events;
pub mod ledger;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::{
    Campaign, CampaignConfig, CampaignState, CampaignStatus, Donation, Milestone, MilestoneInput,
};

/// Maximum number of records returned by a paged query.
pub const MAX_PAGE: u32 = 50;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAuthorized = 3,
    CampaignNotFound = 4,
    InvalidTarget = 5,
    InvalidTitle = 6,
    InvalidMilestones = 7,
    GoalMismatch = 8,
    InvalidStateTransition = 9,
    CampaignNotVerified = 10,
    CampaignClosed = 11,
    InvalidAmount = 12,
    ExceedsTarget = 13,
    MilestoneNotFound = 14,
    MilestoneAlreadyCompleted = 15,
    ExceedsCompletedMilestones = 16,
    InsufficientBalance = 17,
    AdminAlreadyExists = 18,
    AdminNotFound = 19,
    LastAdmin = 20,
    ProtocolPaused = 21,
    Overflow = 22,
}

#[contract]
pub struct FundChain;

#[contractimpl]
impl FundChain {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract with its first admin.
    ///
    /// Must be called exactly once after deployment; later calls fail with
    /// `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        admin.require_auth();
        admin::init(&env, &admin)
    }

    // ─────────────────────────────────────────────────────────
    // Admin set
    // ─────────────────────────────────────────────────────────

    /// Add `new_admin` to the admin set. `caller` must be an admin.
    pub fn add_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        admin::add_admin(&env, &caller, &new_admin)
    }

    /// Remove `target` from the admin set. The last admin cannot be removed.
    pub fn remove_admin(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        admin::remove_admin(&env, &caller, &target)
    }

    pub fn is_admin(env: Env, address: Address) -> bool {
        admin::is_admin(&env, &address)
    }

    pub fn get_admins(env: Env) -> Vec<Address> {
        storage::get_admins(&env)
    }

    /// Halt every campaign operation. Admin management stays available.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        admin::require_admin(&env, &caller)?;
        storage::set_paused(&env, true);
        events::emit_protocol_paused(&env, caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        admin::require_admin(&env, &caller)?;
        storage::set_paused(&env, false);
        events::emit_protocol_unpaused(&env, caller);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Campaign lifecycle
    // ─────────────────────────────────────────────────────────

    /// Register a new campaign in `Open` status.
    ///
    /// Milestone amounts must sum exactly to `target`; funds are released to
    /// the owner only as milestones are completed.
    pub fn create_campaign(
        env: Env,
        owner: Address,
        token: Address,
        title: String,
        description: String,
        image_uri: String,
        target: i128,
        milestones: Vec<MilestoneInput>,
    ) -> Result<Campaign, Error> {
        Self::require_not_paused(&env)?;
        owner.require_auth();
        if !storage::has_admins(&env) {
            return Err(Error::NotInitialized);
        }

        if target <= 0 {
            return Err(Error::InvalidTarget);
        }
        if title.is_empty() {
            return Err(Error::InvalidTitle);
        }
        let milestones = ledger::build_milestones(&env, &milestones, target)?;

        let id = storage::get_and_increment_campaign_id(&env)?;
        let now = env.ledger().timestamp();

        let campaign = Campaign {
            id,
            owner: owner.clone(),
            token: token.clone(),
            title,
            description,
            image_uri,
            target,
            raised: 0,
            withdrawn: 0,
            donor_count: 0,
            donation_count: 0,
            status: CampaignStatus::Open,
            created_at: now,
            updated_at: now,
            milestones,
        };

        storage::save_campaign(&env, &campaign);
        events::emit_campaign_created(&env, id, owner, token, target);

        Ok(campaign)
    }

    /// Move a campaign from `Open` to `Verified`. Admin only.
    pub fn verify_campaign(env: Env, admin: Address, campaign_id: u64) -> Result<(), Error> {
        Self::require_not_paused(&env)?;
        admin.require_auth();
        admin::require_admin(&env, &admin)?;

        let mut state = storage::load_campaign_state(&env, campaign_id)?;
        if state.status != CampaignStatus::Open {
            return Err(Error::InvalidStateTransition);
        }

        state.status = CampaignStatus::Verified;
        state.updated_at = env.ledger().timestamp();
        storage::save_campaign_state(&env, campaign_id, &state);

        events::emit_campaign_verified(&env, campaign_id, admin);
        Ok(())
    }

    /// Donate `amount` of the campaign token.
    ///
    /// The campaign closes once `raised` reaches `target`; a donation that
    /// would overshoot the target is rejected.
    pub fn donate(env: Env, campaign_id: u64, donor: Address, amount: i128) -> Result<(), Error> {
        Self::require_not_paused(&env)?;
        donor.require_auth();

        let (config, mut state) = storage::load_campaign_pair(&env, campaign_id)?;
        let previous = storage::get_contribution(&env, campaign_id, &donor);
        let index = state.donation_count;

        let closed = ledger::apply_donation(&mut state, config.target, amount, previous == 0)?;
        let contribution = previous.checked_add(amount).ok_or(Error::Overflow)?;
        let now = env.ledger().timestamp();
        state.updated_at = now;

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        storage::set_contribution(&env, campaign_id, &donor, contribution);
        storage::save_donation(
            &env,
            index,
            &Donation {
                campaign_id,
                donor: donor.clone(),
                amount,
                timestamp: now,
            },
        );
        storage::save_campaign_state(&env, campaign_id, &state);

        events::emit_donation_received(&env, campaign_id, donor, amount);
        if closed {
            events::emit_campaign_closed(&env, campaign_id, state.raised);
        }
        Ok(())
    }

    /// Mark milestone `index` complete, unlocking its amount. Admin only.
    pub fn complete_milestone(
        env: Env,
        admin: Address,
        campaign_id: u64,
        index: u32,
    ) -> Result<(), Error> {
        Self::require_not_paused(&env)?;
        admin.require_auth();
        admin::require_admin(&env, &admin)?;

        let mut state = storage::load_campaign_state(&env, campaign_id)?;
        if state.status == CampaignStatus::Open {
            return Err(Error::CampaignNotVerified);
        }

        let mut milestones = storage::load_milestones(&env, campaign_id)?;
        let milestone = ledger::complete_milestone(&mut milestones, index)?;
        storage::save_milestones(&env, campaign_id, &milestones);

        state.updated_at = env.ledger().timestamp();
        storage::save_campaign_state(&env, campaign_id, &state);

        events::emit_milestone_completed(&env, campaign_id, index, milestone.amount, admin);
        Ok(())
    }

    /// Withdraw `amount` to the campaign owner.
    ///
    /// Cumulative withdrawals may not exceed the sum of completed milestone
    /// amounts, nor the amount raised.
    pub fn withdraw(env: Env, campaign_id: u64, amount: i128) -> Result<(), Error> {
        Self::require_not_paused(&env)?;

        let (config, mut state) = storage::load_campaign_pair(&env, campaign_id)?;
        config.owner.require_auth();

        let milestones = storage::load_milestones(&env, campaign_id)?;
        ledger::apply_withdrawal(&mut state, &milestones, amount)?;
        state.updated_at = env.ledger().timestamp();

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &config.owner, &amount);

        storage::save_campaign_state(&env, campaign_id, &state);
        events::emit_funds_withdrawn(&env, campaign_id, config.owner, amount);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env, campaign_id: u64) -> Result<Campaign, Error> {
        storage::load_campaign(&env, campaign_id)
    }

    pub fn get_campaign_count(env: Env) -> u64 {
        storage::get_campaign_count(&env)
    }

    /// Return up to `limit` campaigns (capped at [`MAX_PAGE`]) starting at ID `start`.
    pub fn get_campaigns(env: Env, start: u64, limit: u32) -> Result<Vec<Campaign>, Error> {
        let count = storage::get_campaign_count(&env);
        let end = start
            .saturating_add(limit.min(MAX_PAGE) as u64)
            .min(count);

        let mut campaigns = Vec::new(&env);
        for id in start..end {
            campaigns.push_back(storage::load_campaign(&env, id)?);
        }
        Ok(campaigns)
    }

    /// IDs of every campaign created by `owner`, in creation order.
    pub fn get_owner_campaigns(env: Env, owner: Address) -> Vec<u64> {
        storage::get_owner_campaigns(&env, &owner)
    }

    pub fn get_milestones(env: Env, campaign_id: u64) -> Result<Vec<Milestone>, Error> {
        storage::load_milestones(&env, campaign_id)
    }

    /// Amount the owner could withdraw right now.
    pub fn get_withdrawable(env: Env, campaign_id: u64) -> Result<i128, Error> {
        let state = storage::load_campaign_state(&env, campaign_id)?;
        let milestones = storage::load_milestones(&env, campaign_id)?;
        ledger::withdrawable(&state, &milestones)
    }

    /// Total donated by `donor` to the campaign.
    pub fn get_contribution(env: Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        Ok(storage::get_contribution(&env, campaign_id, &donor))
    }

    /// Return up to `limit` donations (capped at [`MAX_PAGE`]) starting at index `start`.
    pub fn get_donations(
        env: Env,
        campaign_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Donation>, Error> {
        let state = storage::load_campaign_state(&env, campaign_id)?;
        let end = start
            .saturating_add(limit.min(MAX_PAGE))
            .min(state.donation_count);

        let mut donations = Vec::new(&env);
        for index in start..end {
            if let Some(donation) = storage::load_donation(&env, campaign_id, index) {
                donations.push_back(donation);
            }
        }
        Ok(donations)
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn require_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::ProtocolPaused);
        }
        Ok(())
    }
}
