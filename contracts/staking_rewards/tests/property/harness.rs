#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Shared environment for the property suites.

use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking_rewards::{StakingRewardsContract, StakingRewardsContractClient};

pub const T0: u64 = 1_000;

pub struct Pool {
    pub env: Env,
    pub client: StakingRewardsContractClient<'static>,
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
}

impl Pool {
    /// Deploys the contract with fresh SAC tokens, clock at `T0`.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(T0);

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

        Pool {
            env,
            client,
            admin,
            stake_token,
            reward_token,
        }
    }

    /// A participant holding `amount` stake tokens, all approved for the pool.
    pub fn staker(&self, amount: i128) -> Address {
        let staker = Address::generate(&self.env);
        StellarAssetClient::new(&self.env, &self.stake_token).mint(&staker, &amount);
        let expiration = self.env.ledger().sequence() + 10_000;
        TokenClient::new(&self.env, &self.stake_token).approve(
            &staker,
            &self.client.address,
            &amount,
            &expiration,
        );
        staker
    }

    /// Transfer `amount` reward tokens in and fund a period with them.
    pub fn fund(&self, amount: i128) {
        StellarAssetClient::new(&self.env, &self.reward_token).mint(&self.client.address, &amount);
        self.client.notify_reward_amount(&self.admin, &amount);
    }

    pub fn start_period(&self, duration: u64, amount: i128) {
        self.client.set_rewards_duration(&self.admin, &duration);
        self.fund(amount);
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().set_timestamp(self.now() + seconds);
    }

    pub fn reward_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.reward_token).balance(who)
    }
}
