//! # Events
//!
//! Every state change publishes one event. Campaign events carry the
//! campaign ID as their second topic so indexers can filter by campaign.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub owner: Address,
    pub token: Address,
    pub target: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignVerified {
    pub campaign_id: u64,
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub campaign_id: u64,
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignClosed {
    pub campaign_id: u64,
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneCompleted {
    pub campaign_id: u64,
    pub index: u32,
    pub amount: i128,
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub campaign_id: u64,
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChanged {
    pub admin: Address,
    pub by: Address,
}

pub fn emit_campaign_created(env: &Env, campaign_id: u64, owner: Address, token: Address, target: i128) {
    env.events().publish(
        (symbol_short!("created"), campaign_id),
        CampaignCreated {
            campaign_id,
            owner,
            token,
            target,
        },
    );
}

pub fn emit_campaign_verified(env: &Env, campaign_id: u64, admin: Address) {
    env.events().publish(
        (symbol_short!("verified"), campaign_id),
        CampaignVerified { campaign_id, admin },
    );
}

pub fn emit_donation_received(env: &Env, campaign_id: u64, donor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("donated"), campaign_id),
        DonationReceived {
            campaign_id,
            donor,
            amount,
        },
    );
}

pub fn emit_campaign_closed(env: &Env, campaign_id: u64, raised: i128) {
    env.events().publish(
        (symbol_short!("closed"), campaign_id),
        CampaignClosed {
            campaign_id,
            raised,
        },
    );
}

pub fn emit_milestone_completed(
    env: &Env,
    campaign_id: u64,
    index: u32,
    amount: i128,
    admin: Address,
) {
    env.events().publish(
        (symbol_short!("milestone"), campaign_id),
        MilestoneCompleted {
            campaign_id,
            index,
            amount,
            admin,
        },
    );
}

pub fn emit_funds_withdrawn(env: &Env, campaign_id: u64, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("withdrawn"), campaign_id),
        FundsWithdrawn {
            campaign_id,
            owner,
            amount,
        },
    );
}

pub fn emit_admin_added(env: &Env, admin: Address, by: Address) {
    env.events()
        .publish((symbol_short!("adm_add"),), AdminChanged { admin, by });
}

pub fn emit_admin_removed(env: &Env, admin: Address, by: Address) {
    env.events()
        .publish((symbol_short!("adm_del"),), AdminChanged { admin, by });
}

pub fn emit_protocol_paused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("paused"),), by);
}

pub fn emit_protocol_unpaused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("unpaused"),), by);
}
