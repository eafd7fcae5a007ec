//! Exponential backoff with jitter between retry attempts.

use std::time::Duration;

use rand::Rng;

/// Delay before the given retry attempt (attempt 0 is the initial try and
/// never waits). Doubles per attempt, capped, with up to 10% jitter.
pub fn retry_delay(attempt: u32, base_ms: u64, cap_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponent = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponent).min(cap_ms);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}
