#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the StakingRewards contract.
//!
//! Random sequences of stake / withdraw / claim / top-up / clock moves are
//! replayed against the contract and a plain model of the stake ledger.
//!
//! Invariants tested after every step:
//! - `total_supply` equals the sum of all `balance_of`
//! - `reward_per_token_stored` never decreases
//! - `finish_at >= updated_at` and `reward_rate >= 0`
//! - Rewards paid plus rewards still claimable never exceed rewards deposited
//! - Every rejected call fails with the error the model predicts

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::Address;
use soroban_sdk::token::StellarAssetClient;
use staking_rewards::ContractError;

use crate::harness::Pool;

const STAKERS: usize = 3;
const MINTED: i128 = 10_000;

#[derive(Arbitrary, Clone, Debug)]
enum Action {
    Stake {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "-10i128..=5_000")]
        amount: i128,
    },
    Withdraw {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "-10i128..=5_000")]
        amount: i128,
    },
    Claim {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
    },
    Advance {
        #[proptest(strategy = "0u64..=400")]
        seconds: u64,
    },
    TopUp {
        #[proptest(strategy = "0i128..=2_000_000")]
        amount: i128,
    },
}

/// Model-side view of one participant.
#[derive(Clone, Copy, Default)]
struct Account {
    staked: i128,
    allowance: i128,
}

fn contract_error<T, I>(result: Result<T, Result<ContractError, I>>) -> Option<ContractError> {
    match result {
        Err(Ok(e)) => Some(e),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_ledger_invariants_hold(actions in prop::collection::vec(any::<Action>(), 1..20)) {
        let pool = Pool::new();
        pool.start_period(1_000, 1_000_000);
        let mut deposited = 1_000_000i128;
        let mut paid_out = 0i128;

        let stakers: Vec<Address> = (0..STAKERS).map(|_| pool.staker(MINTED)).collect();
        let mut model = [Account { staked: 0, allowance: MINTED }; STAKERS];
        let mut last_rpt = pool.client.reward_per_token_stored();

        for action in actions {
            match action {
                Action::Stake { who, amount } => {
                    let result = pool.client.try_stake(&stakers[who], &amount);
                    let account = &mut model[who];
                    let held = MINTED - account.staked;
                    if amount <= 0 {
                        prop_assert_eq!(contract_error(result), Some(ContractError::InvalidAmount));
                    } else if amount > account.allowance {
                        prop_assert_eq!(contract_error(result), Some(ContractError::InsufficientAllowance));
                    } else if amount > held {
                        prop_assert_eq!(contract_error(result), Some(ContractError::TransferFailed));
                    } else {
                        prop_assert!(result.is_ok());
                        account.staked += amount;
                        account.allowance -= amount;
                    }
                }
                Action::Withdraw { who, amount } => {
                    let result = pool.client.try_withdraw(&stakers[who], &amount);
                    let account = &mut model[who];
                    if amount <= 0 {
                        prop_assert_eq!(contract_error(result), Some(ContractError::InvalidAmount));
                    } else if amount > account.staked {
                        prop_assert_eq!(contract_error(result), Some(ContractError::InsufficientBalance));
                    } else {
                        prop_assert!(result.is_ok());
                        account.staked -= amount;
                    }
                }
                Action::Claim { who } => {
                    let expected = pool.client.earned(&stakers[who]);
                    let paid = pool.client.get_reward(&stakers[who]);
                    prop_assert_eq!(paid, expected);
                    prop_assert_eq!(pool.client.earned(&stakers[who]), 0);
                    paid_out += paid;
                }
                Action::Advance { seconds } => pool.advance(seconds),
                Action::TopUp { amount } => {
                    if amount > 0 {
                        StellarAssetClient::new(&pool.env, &pool.reward_token)
                            .mint(&pool.client.address, &amount);
                        deposited += amount;
                    }
                    let result = pool.client.try_notify_reward_amount(&pool.admin, &amount);
                    match contract_error(result) {
                        None => {}
                        Some(e) => prop_assert_eq!(e, ContractError::ZeroRewardRate),
                    }
                }
            }

            let mut sum = 0i128;
            let mut claimable = 0i128;
            for (i, staker) in stakers.iter().enumerate() {
                let balance = pool.client.balance_of(staker);
                prop_assert_eq!(balance, model[i].staked);
                sum += balance;
                claimable += pool.client.earned(staker);
            }
            prop_assert_eq!(pool.client.total_supply(), sum);

            let rpt = pool.client.reward_per_token_stored();
            prop_assert!(rpt >= last_rpt, "accumulator decreased: {} < {}", rpt, last_rpt);
            last_rpt = rpt;

            prop_assert!(pool.client.finish_at() >= pool.client.updated_at());
            prop_assert!(pool.client.reward_rate() >= 0);
            prop_assert!(paid_out + claimable <= deposited);
            prop_assert_eq!(pool.reward_balance(&pool.client.address), deposited - paid_out);
        }
    }

    /// A second `initialize` call must always fail with `AlreadyInitialized`.
    #[test]
    fn prop_double_initialize_always_fails(_seed in 0u8..=255u8) {
        let pool = Pool::new();
        let result = pool
            .client
            .try_initialize(&pool.admin, &pool.stake_token, &pool.reward_token);
        prop_assert_eq!(contract_error(result), Some(ContractError::AlreadyInitialized));
    }
}
