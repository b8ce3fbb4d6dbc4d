//! Linear price decay and the derived expiry guard.
//!
//! Everything here is a pure function of the auction terms and a tick, so the
//! contract can evaluate price and expiry against the live ledger sequence on
//! every call without caching anything.

/// Price at `tick` for an auction started at `start_tick`.
///
/// `starting_price - decay_rate_per_tick * elapsed`, saturating at zero. Reads
/// past expiry (or a discount that overflows `i128`) return 0, never a negative
/// or wrapped price. A tick before the start is treated as the start.
pub fn price_at(starting_price: i128, decay_rate_per_tick: i128, start_tick: u32, tick: u32) -> i128 {
    let elapsed = tick.saturating_sub(start_tick) as i128;
    match decay_rate_per_tick.checked_mul(elapsed) {
        Some(discount) => starting_price.saturating_sub(discount).max(0),
        None => 0,
    }
}

/// Whether the auction window has closed. `duration` is an exclusive bound:
/// the tick `start_tick + duration` itself is already expired.
pub fn is_expired(start_tick: u32, duration: u32, tick: u32) -> bool {
    tick.saturating_sub(start_tick) >= duration
}

pub fn expiry_tick(start_tick: u32, duration: u32) -> u32 {
    start_tick.saturating_add(duration)
}

/// Ticks until the price reaches zero: `starting_price / decay_rate_per_tick`,
/// rounded down. `None` when the rate is not positive or the result does not
/// fit a ledger sequence.
pub fn derive_duration(starting_price: i128, decay_rate_per_tick: i128) -> Option<u32> {
    if decay_rate_per_tick <= 0 || starting_price < 0 {
        return None;
    }
    u32::try_from(starting_price / decay_rate_per_tick).ok()
}
