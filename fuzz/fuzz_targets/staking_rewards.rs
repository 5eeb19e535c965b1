#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking_rewards::{StakingRewardsContract, StakingRewardsContractClient};

const MINTED: i128 = 1_000_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { who: u8, amount: u64 },
    Withdraw { who: u8, amount: u64 },
    ClaimRewards { who: u8 },
    Exit { who: u8 },
    Advance { seconds: u16 },
    Fund { amount: u64 },
    SetDuration { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingRewardsContract, ());
    let client = StakingRewardsContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &stake_token, &reward_token);

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &MINTED);
        TokenClient::new(&env, &stake_token).approve(&user, &contract_id, &MINTED, &10_000);
        users.push(user);
    }

    // Every call is allowed to fail; the ledger invariants must hold regardless.
    let mut last_rpt = 0i128;
    for action in actions.into_iter().take(32) {
        match action {
            FuzzAction::Stake { who, amount } => {
                let _ = client.try_stake(&users[who as usize % users.len()], &(amount as i128));
            }
            FuzzAction::Withdraw { who, amount } => {
                let _ = client.try_withdraw(&users[who as usize % users.len()], &(amount as i128));
            }
            FuzzAction::ClaimRewards { who } => {
                let _ = client.try_get_reward(&users[who as usize % users.len()]);
            }
            FuzzAction::Exit { who } => {
                let _ = client.try_exit(&users[who as usize % users.len()]);
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(seconds));
            }
            FuzzAction::Fund { amount } => {
                let amount = amount as i128;
                if amount > 0 {
                    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &amount);
                }
                let _ = client.try_notify_reward_amount(&admin, &amount);
            }
            FuzzAction::SetDuration { seconds } => {
                let _ = client.try_set_rewards_duration(&admin, &u64::from(seconds));
            }
        }

        let sum: i128 = users.iter().map(|u| client.balance_of(u)).sum();
        assert_eq!(client.total_supply(), sum);

        let rpt = client.reward_per_token_stored();
        assert!(rpt >= last_rpt);
        last_rpt = rpt;

        assert!(client.finish_at() >= client.updated_at());
    }
});
