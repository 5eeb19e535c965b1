use soroban_sdk::{Env, IntoVal, Val};

// Ledgers close roughly every 5 seconds.
const DAY_IN_LEDGERS: u32 = 17_280;

pub const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
pub const TTL_EXTEND_TO: u32 = 120 * DAY_IN_LEDGERS;

/// Keep the contract instance (configuration, schedule, totals) alive.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Keep a per-participant entry alive. Must only be called after the key
/// has been written.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
