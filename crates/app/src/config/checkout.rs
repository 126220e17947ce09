//! Checkout Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Checkout and coupon settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Give up on order submission after this many seconds (0 waits forever)
    #[arg(long, env = "CHECKOUT_SUBMIT_TIMEOUT_SECS", default_value_t = 30u64)]
    pub submit_timeout_secs: u64,

    /// YAML coupon catalog replacing the built-in offers
    #[arg(long, env = "PLATTER_COUPONS")]
    pub coupons: Option<PathBuf>,
}

impl CheckoutConfig {
    /// Submission timeout, if one is set.
    #[must_use]
    pub fn submit_timeout(&self) -> Option<Duration> {
        (self.submit_timeout_secs > 0).then(|| Duration::from_secs(self.submit_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_disables_the_timeout() {
        let config = CheckoutConfig {
            submit_timeout_secs: 0,
            coupons: None,
        };

        assert_eq!(config.submit_timeout(), None);
    }

    #[test]
    fn seconds_become_a_duration() {
        let config = CheckoutConfig {
            submit_timeout_secs: 12,
            coupons: None,
        };

        assert_eq!(config.submit_timeout(), Some(Duration::from_secs(12)));
    }
}
