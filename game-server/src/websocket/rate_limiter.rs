use std::time::{Duration, Instant};

/// Token bucket guarding a single socket against message floods.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_rate: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new_with_limits(max_tokens: u32, refill_rate: Duration) -> Self {
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens(Instant::now());

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self, now: Instant) {
        let time_passed = now.saturating_duration_since(self.last_refill);
        if time_passed < self.refill_rate {
            return;
        }

        let refill_millis = self.refill_rate.as_millis().max(1);
        let tokens_to_add = (time_passed.as_millis() / refill_millis).min(u32::MAX as u128) as u32;
        self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.max_tokens);

        // Keep the partial interval so slow, steady senders still earn tokens
        if self.tokens == self.max_tokens {
            self.last_refill = now;
        } else {
            self.last_refill += self.refill_rate * tokens_to_add;
        }
    }
}
