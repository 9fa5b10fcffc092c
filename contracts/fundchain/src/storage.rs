//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by FundChain.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type           | Description                        |
//! |-----------------|----------------|------------------------------------|
//! | `Admins`        | `Vec<Address>` | Addresses allowed to verify        |
//! | `CampaignCount` | `u64`          | Auto-increment campaign ID counter |
//! | `Paused`        | `bool`         | Emergency halt flag                |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                        | Type             | Description                     |
//! |----------------------------|------------------|---------------------------------|
//! | `CampConfig(id)`           | `CampaignConfig` | Immutable campaign config       |
//! | `CampState(id)`            | `CampaignState`  | Mutable accounting + status     |
//! | `Milestones(id)`           | `Vec<Milestone>` | Milestones and completion flags |
//! | `Contribution(id, donor)`  | `i128`           | Running total per donor         |
//! | `Donation(id, index)`      | `Donation`       | Individual donation record      |
//! | `OwnerCampaigns(owner)`    | `Vec<u64>`       | Campaign IDs created by owner   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Campaign, CampaignConfig, CampaignState, Donation, Milestone};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Admin address list (Instance).
    Admins,
    /// Global auto-increment counter for campaign IDs (Instance).
    CampaignCount,
    /// Emergency pause flag (Instance).
    Paused,
    CampConfig(u64),
    CampState(u64),
    Milestones(u64),
    Contribution(u64, Address),
    Donation(u64, u32),
    OwnerCampaigns(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_admins(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admins)
}

/// Return the admin list (empty before `init`).
pub fn get_admins(env: &Env) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admins)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_admins(env: &Env, admins: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Admins, admins);
    bump_instance(env);
}

/// Reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> Result<u64, Error> {
    let current = get_campaign_count(env);
    let next = current.checked_add(1).ok_or(Error::Overflow)?;
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &next);
    Ok(current)
}

pub fn get_campaign_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

fn write_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

/// Save config, initial state and milestones for a new campaign, and index
/// it under its owner.
pub fn save_campaign(env: &Env, campaign: &Campaign) {
    let config = CampaignConfig {
        id: campaign.id,
        owner: campaign.owner.clone(),
        token: campaign.token.clone(),
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        image_uri: campaign.image_uri.clone(),
        target: campaign.target,
        created_at: campaign.created_at,
    };

    let state = CampaignState {
        raised: campaign.raised,
        withdrawn: campaign.withdrawn,
        donor_count: campaign.donor_count,
        donation_count: campaign.donation_count,
        status: campaign.status,
        updated_at: campaign.updated_at,
    };

    write_persistent(env, &DataKey::CampConfig(campaign.id), &config);
    write_persistent(env, &DataKey::CampState(campaign.id), &state);
    write_persistent(env, &DataKey::Milestones(campaign.id), &campaign.milestones);

    let owner_key = DataKey::OwnerCampaigns(campaign.owner.clone());
    let mut owned: Vec<u64> = read_persistent(env, &owner_key).unwrap_or_else(|| Vec::new(env));
    owned.push_back(campaign.id);
    write_persistent(env, &owner_key, &owned);
}

/// Load the full `Campaign` by combining config, state and milestones.
pub fn load_campaign(env: &Env, id: u64) -> Result<Campaign, Error> {
    let config = load_campaign_config(env, id)?;
    let state = load_campaign_state(env, id)?;
    let milestones = load_milestones(env, id)?;
    Ok(Campaign {
        id: config.id,
        owner: config.owner,
        token: config.token,
        title: config.title,
        description: config.description,
        image_uri: config.image_uri,
        target: config.target,
        raised: state.raised,
        withdrawn: state.withdrawn,
        donor_count: state.donor_count,
        donation_count: state.donation_count,
        status: state.status,
        created_at: config.created_at,
        updated_at: state.updated_at,
        milestones,
    })
}

pub fn load_campaign_config(env: &Env, id: u64) -> Result<CampaignConfig, Error> {
    read_persistent(env, &DataKey::CampConfig(id)).ok_or(Error::CampaignNotFound)
}

pub fn load_campaign_state(env: &Env, id: u64) -> Result<CampaignState, Error> {
    read_persistent(env, &DataKey::CampState(id)).ok_or(Error::CampaignNotFound)
}

/// Read config and state in one go; both are needed by every mutating call.
pub fn load_campaign_pair(env: &Env, id: u64) -> Result<(CampaignConfig, CampaignState), Error> {
    Ok((load_campaign_config(env, id)?, load_campaign_state(env, id)?))
}

pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    write_persistent(env, &DataKey::CampState(id), state);
}

pub fn load_milestones(env: &Env, id: u64) -> Result<Vec<Milestone>, Error> {
    read_persistent(env, &DataKey::Milestones(id)).ok_or(Error::CampaignNotFound)
}

pub fn save_milestones(env: &Env, id: u64, milestones: &Vec<Milestone>) {
    write_persistent(env, &DataKey::Milestones(id), milestones);
}

pub fn get_owner_campaigns(env: &Env, owner: &Address) -> Vec<u64> {
    read_persistent(env, &DataKey::OwnerCampaigns(owner.clone())).unwrap_or_else(|| Vec::new(env))
}

// ── Donation accounting ──────────────────────────────────────────────

/// Running total donated by `donor` to campaign `id` (0 if none).
pub fn get_contribution(env: &Env, id: u64, donor: &Address) -> i128 {
    read_persistent(env, &DataKey::Contribution(id, donor.clone())).unwrap_or(0)
}

pub fn set_contribution(env: &Env, id: u64, donor: &Address, total: i128) {
    write_persistent(env, &DataKey::Contribution(id, donor.clone()), &total);
}

pub fn save_donation(env: &Env, index: u32, donation: &Donation) {
    write_persistent(env, &DataKey::Donation(donation.campaign_id, index), donation);
}

pub fn load_donation(env: &Env, id: u64, index: u32) -> Option<Donation> {
    read_persistent(env, &DataKey::Donation(id, index))
}
