use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{rewards::SCALE, ContractError};

const SCHEDULE: Symbol = symbol_short!("SCHEDULE");

/// Emission schedule of the current reward period.
///
/// Rewards vest linearly at `reward_rate` units per second from the moment a
/// budget is funded until `finish_at`. `updated_at` is the point in time up to
/// which the global accumulator has already been advanced.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardSchedule {
    /// Length in seconds of the next funded period.
    pub duration: u64,
    /// Ledger timestamp at which the current period stops accruing.
    pub finish_at: u64,
    /// Reward units emitted per second across all stakers.
    pub reward_rate: i128,
    /// Timestamp of the last accumulator sync, never past `finish_at`.
    pub updated_at: u64,
}

impl RewardSchedule {
    /// Accrual stops at `finish_at` even if nobody calls in until much later.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.finish_at)
    }

    /// Seconds of emission not yet folded into the accumulator.
    pub fn pending_seconds(&self, now: u64) -> u64 {
        self.last_time_reward_applicable(now)
            .saturating_sub(self.updated_at)
    }

    /// Rewards are still vesting up to and including `finish_at`.
    pub fn is_vesting(&self, now: u64) -> bool {
        now <= self.finish_at
    }

    /// Total reward units one full period emits at the current rate.
    pub fn reward_for_duration(&self) -> Result<i128, ContractError> {
        self.reward_rate
            .checked_mul(i128::from(self.duration))
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Change the period length. Only allowed between periods.
    pub fn set_duration(&mut self, now: u64, duration: u64) -> Result<(), ContractError> {
        if duration == 0 {
            return Err(ContractError::InvalidDuration);
        }
        if self.is_vesting(now) {
            return Err(ContractError::PeriodActive);
        }
        self.duration = duration;
        Ok(())
    }

    /// Start a new period funded with `amount` reward units.
    ///
    /// A budget that arrives mid-period is merged with whatever the old rate
    /// had not yet emitted, and the sum is spread over a fresh full
    /// `duration`:
    ///
    /// ```text
    /// fresh:  rate = amount / duration
    /// top-up: rate = (amount + (finish_at − now) × rate) / duration
    /// ```
    ///
    /// `available` is the reward-asset balance held by the contract; the new
    /// period must be fully backed by it. The caller is expected to have
    /// synced the accumulator up to `now` already.
    pub fn fund(&mut self, now: u64, amount: i128, available: i128) -> Result<i128, ContractError> {
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        if self.duration == 0 {
            return Err(ContractError::InvalidDuration);
        }

        let budget = if now >= self.finish_at {
            amount
        } else {
            let remaining = i128::from(self.finish_at - now)
                .checked_mul(self.reward_rate)
                .ok_or(ContractError::ArithmeticOverflow)?;
            amount
                .checked_add(remaining)
                .ok_or(ContractError::ArithmeticOverflow)?
        };

        // Floor division; the remainder is never distributed.
        let reward_rate = budget / i128::from(self.duration);
        if reward_rate == 0 {
            return Err(ContractError::ZeroRewardRate);
        }

        let required = reward_rate
            .checked_mul(i128::from(self.duration))
            .ok_or(ContractError::ArithmeticOverflow)?;
        // A full period against a single staked unit must still fit the
        // scaled accumulator, or every later sync would overflow.
        required
            .checked_mul(SCALE)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if required > available {
            return Err(ContractError::InsufficientRewardBalance);
        }

        self.reward_rate = reward_rate;
        self.updated_at = now;
        self.finish_at = now
            .checked_add(self.duration)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Ok(reward_rate)
    }
}

pub fn load(env: &Env) -> RewardSchedule {
    env.storage().instance().get(&SCHEDULE).unwrap_or_default()
}

pub fn store(env: &Env, schedule: &RewardSchedule) {
    env.storage().instance().set(&SCHEDULE, schedule);
}
