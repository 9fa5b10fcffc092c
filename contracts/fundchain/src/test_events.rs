extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, Symbol, TryIntoVal, Val,
};

use crate::events::{
    AdminChanged, CampaignClosed, CampaignCreated, CampaignVerified, DonationReceived,
    FundsWithdrawn, MilestoneCompleted,
};
use crate::{Campaign, FundChain, FundChainClient, MilestoneInput};

fn setup_with_init() -> (Env, FundChainClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(FundChain, ());
    let client = FundChainClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.init(&admin);
    (env, client, admin)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn create_campaign(
    env: &Env,
    client: &FundChainClient,
    owner: &Address,
    token: &Address,
) -> Campaign {
    let milestones = vec![
        env,
        MilestoneInput {
            title: String::from_str(env, "Seeds"),
            description: String::from_str(env, "Buy seed stock"),
            amount: 500,
        },
        MilestoneInput {
            title: String::from_str(env, "Irrigation"),
            description: String::from_str(env, "Install drip lines"),
            amount: 500,
        },
    ];
    client.create_campaign(
        owner,
        token,
        &String::from_str(env, "Community farm"),
        &String::from_str(env, "Start a cooperative farm"),
        &String::from_str(env, "ipfs://bafkreifarm"),
        &1_000i128,
        &milestones,
    )
}

/// Return `(topics, data)` of the most recent event published by the contract.
fn last_event(env: &Env, client: &FundChainClient) -> (soroban_sdk::Vec<Val>, Val) {
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    (last_event.1, last_event.2)
}

fn campaign_topics(env: &Env, name: Symbol, campaign_id: u64) -> soroban_sdk::Vec<Val> {
    vec![env, name.into_val(env), campaign_id.into_val(env)]
}

#[test]
fn test_campaign_created_event() {
    let (env, client, _admin) = setup_with_init();
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);

    let campaign = create_campaign(&env, &client, &owner, &token.address);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("created"), campaign.id)
    );
    let event_data: CampaignCreated = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            campaign_id: campaign.id,
            owner,
            token: token.address.clone(),
            target: 1_000,
        }
    );
}

#[test]
fn test_campaign_verified_event() {
    let (env, client, admin) = setup_with_init();
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    let campaign = create_campaign(&env, &client, &owner, &token.address);

    client.verify_campaign(&admin, &campaign.id);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("verified"), campaign.id)
    );
    let event_data: CampaignVerified = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignVerified {
            campaign_id: campaign.id,
            admin,
        }
    );
}

#[test]
fn test_donation_and_closed_events() {
    let (env, client, admin) = setup_with_init();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    token::StellarAssetClient::new(&env, &token.address).mint(&donor, &1_000);

    let campaign = create_campaign(&env, &client, &owner, &token.address);
    client.verify_campaign(&admin, &campaign.id);

    client.donate(&campaign.id, &donor, &400);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("donated"), campaign.id)
    );
    let event_data: DonationReceived = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        DonationReceived {
            campaign_id: campaign.id,
            donor: donor.clone(),
            amount: 400,
        }
    );

    // Reaching the target publishes `closed` after `donated`.
    client.donate(&campaign.id, &donor, &600);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("closed"), campaign.id)
    );
    let event_data: CampaignClosed = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignClosed {
            campaign_id: campaign.id,
            raised: 1_000,
        }
    );
}

#[test]
fn test_milestone_and_withdrawal_events() {
    let (env, client, admin) = setup_with_init();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    token::StellarAssetClient::new(&env, &token.address).mint(&donor, &1_000);

    let campaign = create_campaign(&env, &client, &owner, &token.address);
    client.verify_campaign(&admin, &campaign.id);
    client.donate(&campaign.id, &donor, &1_000);

    client.complete_milestone(&admin, &campaign.id, &0);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("milestone"), campaign.id)
    );
    let event_data: MilestoneCompleted = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        MilestoneCompleted {
            campaign_id: campaign.id,
            index: 0,
            amount: 500,
            admin: admin.clone(),
        }
    );

    client.withdraw(&campaign.id, &500);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        campaign_topics(&env, symbol_short!("withdrawn"), campaign.id)
    );
    let event_data: FundsWithdrawn = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            campaign_id: campaign.id,
            owner,
            amount: 500,
        }
    );
}

#[test]
fn test_admin_added_event() {
    let (env, client, admin) = setup_with_init();
    let new_admin = Address::generate(&env);

    client.add_admin(&admin, &new_admin);

    let (topics, data) = last_event(&env, &client);
    let expected: soroban_sdk::Vec<Val> = vec![&env, symbol_short!("adm_add").into_val(&env)];
    assert_eq!(topics, expected);
    let event_data: AdminChanged = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AdminChanged {
            admin: new_admin,
            by: admin,
        }
    );
}
