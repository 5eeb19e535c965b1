#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub staking_token: Address,
    pub rewards_token: Address,
    pub timestamp: u64,
}

/// Fired when a participant deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_supply: i128,
    pub timestamp: u64,
}

/// Fired when a participant takes stake back out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_supply: i128,
    pub timestamp: u64,
}

/// Fired when accrued rewards are paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when the authority funds a reward period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub amount: i128,
    pub reward_rate: i128,
    pub finish_at: u64,
    pub timestamp: u64,
}

/// Fired when the period length changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDurationSetEvent {
    pub duration: u64,
    pub timestamp: u64,
}

/// Fired when a stray token is swept out by the authority.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRecoveredEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    staking_token: Address,
    rewards_token: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            staking_token,
            rewards_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_supply: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128, new_total_supply: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            new_total_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone()),
        RewardPaidEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_added(env: &Env, amount: i128, reward_rate: i128, finish_at: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADDED"),),
        RewardAddedEvent {
            amount,
            reward_rate,
            finish_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_duration_set(env: &Env, duration: u64) {
    env.events().publish(
        (symbol_short!("DUR_SET"),),
        RewardsDurationSetEvent {
            duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token_recovered(env: &Env, token: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECOVERED"), token.clone()),
        TokenRecoveredEvent {
            token,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
