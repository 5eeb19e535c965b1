use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{storage, ContractError};

const TOTAL_SUPPLY: Symbol = symbol_short!("TOT_SUP");

const USER_BALANCE: Symbol = symbol_short!("BAL");

/// Sum of every participant's staked balance.
pub fn total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_SUPPLY).unwrap_or(0)
}

pub fn balance_of(env: &Env, user: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&(USER_BALANCE, user.clone()))
        .unwrap_or(0)
}

/// Add `amount` to `user`'s stake and the total. Returns the new total.
pub fn credit(env: &Env, user: &Address, amount: i128) -> Result<i128, ContractError> {
    let balance = balance_of(env, user)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let total = total_supply(env)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    write(env, user, balance, total);
    Ok(total)
}

/// Remove `amount` from `user`'s stake and the total. Returns the new total.
pub fn debit(env: &Env, user: &Address, amount: i128) -> Result<i128, ContractError> {
    let balance = balance_of(env, user);
    if amount > balance {
        return Err(ContractError::InsufficientBalance);
    }

    // total >= balance >= amount, so neither subtraction can go negative.
    let total = total_supply(env) - amount;
    write(env, user, balance - amount, total);
    Ok(total)
}

fn write(env: &Env, user: &Address, balance: i128, total: i128) {
    let key = (USER_BALANCE, user.clone());
    env.storage().persistent().set(&key, &balance);
    storage::extend_persistent(env, &key);

    env.storage().instance().set(&TOTAL_SUPPLY, &total);
}
