#![no_std]

pub mod events;
pub mod ledger;
pub mod rewards;
pub mod schedule;
mod storage;

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol,
};

use rewards::RewardPerToken;
use schedule::RewardSchedule;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAuthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    PeriodActive = 6,
    ZeroRewardRate = 7,
    InsufficientRewardBalance = 8,
    TransferFailed = 9,
    InsufficientAllowance = 10,
    TokensIdentical = 11,
    InvalidDuration = 12,
    ArithmeticOverflow = 13,
    CannotRecoverPoolToken = 14,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of a participant's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub earned: i128,
    pub reward_per_token_paid: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingRewardsContract;

#[contractimpl]
impl StakingRewardsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `admin`         – the single authority allowed to configure and fund
    ///                     reward periods. Cannot be changed afterwards.
    /// * `staking_token` – SAC address of the token participants stake.
    /// * `rewards_token` – SAC address of the token distributed as rewards.
    pub fn initialize(
        env: Env,
        admin: Address,
        staking_token: Address,
        rewards_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if staking_token == rewards_token {
            return Err(ContractError::TokensIdentical);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &staking_token);
        env.storage().instance().set(&REWARD_TOKEN, &rewards_token);
        // The schedule, accumulator and totals start at zero; absent keys
        // read back as defaults, so no explicit init is needed.
        storage::extend_instance(&env);

        events::publish_initialized(&env, admin, staking_token, rewards_token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens.
    ///
    /// The staker must have approved this contract as spender for at least
    /// `amount` beforehand. The accumulator is synced first so the deposit
    /// does not earn retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let stake_token = Self::token(&env, &STAKE_TOKEN)?;
        let this = env.current_contract_address();
        if stake_token.allowance(&staker, &this) < amount {
            return Err(ContractError::InsufficientAllowance);
        }
        if stake_token.balance(&staker) < amount {
            return Err(ContractError::TransferFailed);
        }

        // 1. Flush global accumulator then snapshot for this user.
        let mut schedule = schedule::load(&env);
        Self::sync(&env, &mut schedule, Some(&staker))?;

        // 2. Record the deposit before handing control to the token.
        let new_total = ledger::credit(&env, &staker, amount)?;

        // 3. Pull tokens from the staker into the contract.
        stake_token.transfer_from(&this, &staker, &this, &amount);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Take `amount` staking tokens back out.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // 1. Flush rewards before reducing stake.
        let mut schedule = schedule::load(&env);
        Self::sync(&env, &mut schedule, Some(&staker))?;

        // 2. Reduce staked balance and total; fails if over-withdrawing.
        let new_total = ledger::debit(&env, &staker, amount)?;

        // 3. Return tokens to staker.
        let stake_token = Self::token(&env, &STAKE_TOKEN)?;
        Self::pay_out(&env, &stake_token, &staker, amount)?;

        events::publish_withdrawn(&env, staker, amount, new_total);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim all accumulated rewards for `staker`.
    ///
    /// Returns the amount paid. Claiming with nothing pending is a no-op that
    /// returns zero.
    pub fn get_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut schedule = schedule::load(&env);
        Self::sync(&env, &mut schedule, Some(&staker))?;

        Self::pay_reward(&env, &staker)
    }

    /// Withdraw the whole stake and claim rewards in one call.
    ///
    /// Returns the reward amount paid.
    pub fn exit(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut schedule = schedule::load(&env);
        Self::sync(&env, &mut schedule, Some(&staker))?;

        let amount = ledger::balance_of(&env, &staker);
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let new_total = ledger::debit(&env, &staker, amount)?;

        let stake_token = Self::token(&env, &STAKE_TOKEN)?;
        Self::pay_out(&env, &stake_token, &staker, amount)?;
        events::publish_withdrawn(&env, staker.clone(), amount, new_total);

        Self::pay_reward(&env, &staker)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Set the length of the next reward period.
    ///
    /// Only allowed once the current period has fully vested.
    pub fn set_rewards_duration(
        env: Env,
        caller: Address,
        duration: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut schedule = schedule::load(&env);
        schedule.set_duration(env.ledger().timestamp(), duration)?;
        schedule::store(&env, &schedule);

        events::publish_rewards_duration_set(&env, duration);

        Ok(())
    }

    /// Fund a reward period with `amount` reward tokens.
    ///
    /// The tokens must already have been transferred to the contract. If a
    /// period is still running, its unvested remainder is rolled into the new
    /// budget and the countdown restarts from now.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        // Flush accumulator at the old rate before changing it.
        let mut schedule = schedule::load(&env);
        Self::sync(&env, &mut schedule, None)?;

        let reward_token = Self::token(&env, &REWARD_TOKEN)?;
        let available = reward_token.balance(&env.current_contract_address());

        let reward_rate = schedule.fund(env.ledger().timestamp(), amount, available)?;
        // The accumulator must absorb the whole new period even if a single
        // unit is staked throughout.
        rewards::stored(&env).accrue(reward_rate, schedule.duration, 1)?;
        schedule::store(&env, &schedule);

        events::publish_reward_added(&env, amount, reward_rate, schedule.finish_at);

        Ok(())
    }

    /// Sweep tokens sent to the contract by mistake to the authority.
    ///
    /// The staking and rewards tokens back participants' balances and can
    /// never be recovered.
    pub fn recover_token(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if token == Self::staking_token(env.clone())? || token == Self::rewards_token(env.clone())? {
            return Err(ContractError::CannotRecoverPoolToken);
        }

        let client = token::Client::new(&env, &token);
        Self::pay_out(&env, &client, &caller, amount)?;

        events::publish_token_recovered(&env, token, caller, amount);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Sum of all staked balances.
    pub fn total_supply(env: Env) -> i128 {
        ledger::total_supply(&env)
    }

    /// Staked balance of `account`.
    pub fn balance_of(env: Env, account: Address) -> i128 {
        ledger::balance_of(&env, &account)
    }

    /// Real-time reward-per-token without mutating state.
    pub fn reward_per_token(env: Env) -> Result<i128, ContractError> {
        let schedule = schedule::load(&env);
        Ok(Self::current_reward_per_token(&env, &schedule)?.scaled())
    }

    /// Real-time claimable rewards for `account` without mutating state.
    pub fn earned(env: Env, account: Address) -> Result<i128, ContractError> {
        let schedule = schedule::load(&env);
        let current = Self::current_reward_per_token(&env, &schedule)?;
        Self::earned_at(&env, &account, current)
    }

    pub fn last_time_reward_applicable(env: Env) -> u64 {
        schedule::load(&env).last_time_reward_applicable(env.ledger().timestamp())
    }

    pub fn reward_rate(env: Env) -> i128 {
        schedule::load(&env).reward_rate
    }

    pub fn finish_at(env: Env) -> u64 {
        schedule::load(&env).finish_at
    }

    pub fn duration(env: Env) -> u64 {
        schedule::load(&env).duration
    }

    pub fn updated_at(env: Env) -> u64 {
        schedule::load(&env).updated_at
    }

    /// Reward tokens one full period emits at the current rate.
    pub fn reward_for_duration(env: Env) -> Result<i128, ContractError> {
        schedule::load(&env).reward_for_duration()
    }

    /// Accumulator value as of the last sync.
    pub fn reward_per_token_stored(env: Env) -> i128 {
        rewards::stored(&env).scaled()
    }

    /// Rewards recorded for `account` at its last sync, not yet claimed.
    pub fn rewards(env: Env, account: Address) -> i128 {
        rewards::user_rewards(&env, &account)
    }

    pub fn user_reward_per_token_paid(env: Env, account: Address) -> i128 {
        rewards::user_paid(&env, &account).scaled()
    }

    /// Return the combined staking position for a participant.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let schedule = schedule::load(&env);
        let current = Self::current_reward_per_token(&env, &schedule)?;

        Ok(StakerInfo {
            staked: ledger::balance_of(&env, &staker),
            earned: Self::earned_at(&env, &staker, current)?,
            reward_per_token_paid: rewards::user_paid(&env, &staker).scaled(),
        })
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn staking_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn rewards_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored authority.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::NotAuthorized);
        }
        Ok(())
    }

    fn token(env: &Env, key: &Symbol) -> Result<token::Client<'static>, ContractError> {
        let address: Address = env
            .storage()
            .instance()
            .get(key)
            .ok_or(ContractError::NotInitialized)?;
        Ok(token::Client::new(env, &address))
    }

    /// Send `amount` of `token` held by the contract to `to`.
    fn pay_out(
        env: &Env,
        token: &token::Client,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let this = env.current_contract_address();
        if token.balance(&this) < amount {
            return Err(ContractError::TransferFailed);
        }
        token.transfer(&this, to, &amount);
        Ok(())
    }

    /// Pay out whatever `staker` has recorded as owed. Expects a fresh sync.
    fn pay_reward(env: &Env, staker: &Address) -> Result<i128, ContractError> {
        let reward = rewards::user_rewards(env, staker);
        if reward <= 0 {
            // Nothing to claim; return without reverting.
            return Ok(0);
        }

        // Zero the balance before the transfer (checks-effects-interactions).
        rewards::set_user_rewards(env, staker, 0);

        let reward_token = Self::token(env, &REWARD_TOKEN)?;
        Self::pay_out(env, &reward_token, staker, reward)?;

        events::publish_reward_paid(env, staker.clone(), reward);

        Ok(reward)
    }

    fn current_reward_per_token(
        env: &Env,
        schedule: &RewardSchedule,
    ) -> Result<RewardPerToken, ContractError> {
        rewards::stored(env).accrue(
            schedule.reward_rate,
            schedule.pending_seconds(env.ledger().timestamp()),
            ledger::total_supply(env),
        )
    }

    fn earned_at(
        env: &Env,
        account: &Address,
        current: RewardPerToken,
    ) -> Result<i128, ContractError> {
        rewards::earned(
            env,
            ledger::balance_of(env, account),
            current,
            rewards::user_paid(env, account),
            rewards::user_rewards(env, account),
        )
    }

    /// Bring the accumulator up to date. Runs first in every mutating call.
    ///
    /// 1. Advance `reward_per_token_stored` to now.
    /// 2. Move `updated_at` to `min(now, finish_at)`.
    /// 3. If `account` is given, fold what it earned since its last snapshot
    ///    into its unclaimed rewards and re-snapshot.
    fn sync(
        env: &Env,
        schedule: &mut RewardSchedule,
        account: Option<&Address>,
    ) -> Result<(), ContractError> {
        let current = Self::current_reward_per_token(env, schedule)?;

        rewards::set_stored(env, current);
        schedule.updated_at = schedule.last_time_reward_applicable(env.ledger().timestamp());
        schedule::store(env, schedule);
        storage::extend_instance(env);

        if let Some(account) = account {
            let earned = Self::earned_at(env, account, current)?;
            rewards::set_user_snapshot(env, account, earned, current);
        }

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
