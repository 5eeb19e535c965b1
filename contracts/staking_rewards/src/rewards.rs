use soroban_sdk::{symbol_short, Address, Env, Symbol, I256};

use crate::{storage, ContractError};

/// Fixed-point scaling factor for reward-per-token values.
///
/// Reward-per-token is a ratio of reward units to staked units and is almost
/// always fractional, so it is carried as an integer multiplied by 10^18.
/// All divisions truncate towards zero; every operand is non-negative, so this
/// is floor division.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

// ── Storage keys ────────────────────────────────────────────────────────────

const REWARD_PER_TOKEN: Symbol = symbol_short!("RPT");

// Keyed by (prefix, user) in persistent storage.
const USER_RPT_PAID: Symbol = symbol_short!("RPT_PAID");
const USER_REWARDS: Symbol = symbol_short!("RWD");

// ── Fixed-point accumulator ─────────────────────────────────────────────────

/// Cumulative reward units earned per staked unit since inception, scaled by
/// [`SCALE`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct RewardPerToken(i128);

impl RewardPerToken {
    pub const ZERO: Self = Self(0);

    pub const fn from_scaled(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn scaled(self) -> i128 {
        self.0
    }

    /// Advance the accumulator by `elapsed` seconds of emission.
    ///
    /// ```text
    /// Δrpt = reward_rate × elapsed × SCALE / total_supply
    /// ```
    ///
    /// With nothing staked the accumulator does not move: there is nobody to
    /// attribute the emission to, and the division would be undefined.
    pub fn accrue(
        self,
        reward_rate: i128,
        elapsed: u64,
        total_supply: i128,
    ) -> Result<Self, ContractError> {
        if total_supply <= 0 || elapsed == 0 {
            return Ok(self);
        }

        let delta = reward_rate
            .checked_mul(i128::from(elapsed))
            .and_then(|v| v.checked_mul(SCALE))
            .ok_or(ContractError::ArithmeticOverflow)?
            / total_supply;

        self.0
            .checked_add(delta)
            .map(Self)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Reward units owed to `balance` staked units for the accumulation that
    /// happened between `paid` and `self`.
    ///
    /// `balance × delta` is carried in 256 bits; only a quotient that does
    /// not fit an `i128` is an overflow.
    pub fn reward_since(
        self,
        env: &Env,
        paid: Self,
        balance: i128,
    ) -> Result<i128, ContractError> {
        let delta = self
            .0
            .checked_sub(paid.0)
            .ok_or(ContractError::ArithmeticOverflow)?;

        I256::from_i128(env, balance)
            .mul(&I256::from_i128(env, delta))
            .div(&I256::from_i128(env, SCALE))
            .to_i128()
            .ok_or(ContractError::ArithmeticOverflow)
    }
}

/// Total reward a participant may claim right now.
///
/// ```text
/// earned = balance × (current − paid) / SCALE + rewards
/// ```
///
/// `paid` is the accumulator value at the participant's last sync, so only
/// accrual since then is counted and earlier snapshots are never
/// double-counted.
pub fn earned(
    env: &Env,
    balance: i128,
    current: RewardPerToken,
    paid: RewardPerToken,
    rewards: i128,
) -> Result<i128, ContractError> {
    current
        .reward_since(env, paid, balance)?
        .checked_add(rewards)
        .ok_or(ContractError::ArithmeticOverflow)
}

// ── Storage helpers ─────────────────────────────────────────────────────────

pub fn stored(env: &Env) -> RewardPerToken {
    RewardPerToken(env.storage().instance().get(&REWARD_PER_TOKEN).unwrap_or(0))
}

pub fn set_stored(env: &Env, value: RewardPerToken) {
    env.storage().instance().set(&REWARD_PER_TOKEN, &value.0);
}

/// Accumulator snapshot taken at `user`'s last sync.
pub fn user_paid(env: &Env, user: &Address) -> RewardPerToken {
    RewardPerToken(
        env.storage()
            .persistent()
            .get(&(USER_RPT_PAID, user.clone()))
            .unwrap_or(0),
    )
}

/// Reward units owed to `user` and not yet claimed.
pub fn user_rewards(env: &Env, user: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&(USER_REWARDS, user.clone()))
        .unwrap_or(0)
}

pub fn set_user_rewards(env: &Env, user: &Address, amount: i128) {
    let key = (USER_REWARDS, user.clone());
    env.storage().persistent().set(&key, &amount);
    storage::extend_persistent(env, &key);
}

/// Record what `user` is owed as of `paid`.
pub fn set_user_snapshot(env: &Env, user: &Address, rewards: i128, paid: RewardPerToken) {
    set_user_rewards(env, user, rewards);

    let key = (USER_RPT_PAID, user.clone());
    env.storage().persistent().set(&key, &paid.0);
    storage::extend_persistent(env, &key);
}

// ── Unit tests ──────────────────────────────────────────────────────────────
