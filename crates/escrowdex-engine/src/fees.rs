//! Trading fees.
//!
//! `fee = floor(amount × fee_percent / 100)` at ledger precision. The fee is
//! carved out of one leg of each trade, chosen by [`FeePolicy`], and paid to
//! the fee account as an ordinary balance.

use escrowdex_types::constants::{AMOUNT_PRECISION, FEE_PERCENT_SCALE};
use escrowdex_types::{ExchangeConfig, ExchangeError, FeePolicy, Result, UserId};
use rust_decimal::Decimal;

/// Fee charged on one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub fee: Decimal,
    /// `amount − fee`.
    pub net: Decimal,
    /// A positive amount at a positive rate rounded down to no fee at all.
    pub truncated_to_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCalculator {
    percent: Decimal,
    policy: FeePolicy,
    recipient: UserId,
}

impl FeeCalculator {
    #[must_use]
    pub fn new(percent: Decimal, policy: FeePolicy, recipient: UserId) -> Self {
        Self {
            percent: percent.normalize(),
            policy,
            recipient,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.fee_percent, config.fee_policy, config.fee_account)
    }

    #[must_use]
    pub fn percent(&self) -> Decimal {
        self.percent
    }

    #[must_use]
    pub fn policy(&self) -> FeePolicy {
        self.policy
    }

    #[must_use]
    pub fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Fee on `amount`, rounded toward zero.
    ///
    /// Computed on the raw mantissas, so the only rounding is the final
    /// truncation to [`AMOUNT_PRECISION`] decimals.
    ///
    /// # Errors
    /// `Overflow` if the fee cannot be represented.
    pub fn quote(&self, amount: Decimal) -> Result<FeeQuote> {
        let product = amount
            .mantissa()
            .checked_mul(self.percent.mantissa())
            .ok_or(ExchangeError::Overflow)?;
        let scale = amount.scale() + self.percent.scale();
        let fee_mantissa = if scale >= AMOUNT_PRECISION {
            let divisor = 10_i128
                .checked_pow(scale - AMOUNT_PRECISION)
                .and_then(|d| d.checked_mul(FEE_PERCENT_SCALE.mantissa()))
                .ok_or(ExchangeError::Overflow)?;
            product / divisor
        } else {
            product
                .checked_mul(10_i128.pow(AMOUNT_PRECISION - scale))
                .ok_or(ExchangeError::Overflow)?
                / FEE_PERCENT_SCALE.mantissa()
        };
        let fee = Decimal::try_from_i128_with_scale(fee_mantissa, AMOUNT_PRECISION)
            .map_err(|_| ExchangeError::Overflow)?
            .normalize();
        let truncated_to_zero = fee.is_zero() && product != 0;
        if truncated_to_zero {
            tracing::debug!(%amount, percent = %self.percent, "Fee truncated to zero");
        }
        Ok(FeeQuote {
            fee,
            net: amount - fee,
            truncated_to_zero,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(percent: Decimal) -> FeeCalculator {
        FeeCalculator::new(percent, FeePolicy::TakerPayment, UserId::new())
    }

    #[test]
    fn ten_percent_of_one() {
        let q = calc(Decimal::TEN).quote(Decimal::ONE).unwrap();
        assert_eq!(q.fee, Decimal::new(1, 1));
        assert_eq!(q.net, Decimal::new(9, 1));
        assert!(!q.truncated_to_zero);
    }

    #[test]
    fn fractional_percent_rounds_down() {
        // 0.25% of 0.0000000000000333 = 0.00000000000000008325 -> 16 dp
        let q = calc(Decimal::new(25, 2))
            .quote(Decimal::new(333, 16))
            .unwrap();
        assert_eq!(q.fee, Decimal::ZERO);
        assert!(q.truncated_to_zero);

        // 0.25% of 3 = 0.0075
        let q = calc(Decimal::new(25, 2)).quote(Decimal::new(3, 0)).unwrap();
        assert_eq!(q.fee, Decimal::new(75, 4));
    }

    #[test]
    fn truncation_keeps_precision_digits() {
        // 10% of 0.1234567890123457 = 0.01234567890123457 -> 0.0123456789012345
        let q = calc(Decimal::TEN)
            .quote(Decimal::new(1_234_567_890_123_457, 16))
            .unwrap();
        assert_eq!(q.fee, Decimal::new(123_456_789_012_345, 16));
        assert_eq!(q.fee + q.net, Decimal::new(1_234_567_890_123_457, 16));
    }

    #[test]
    fn full_precision_amount_at_ceiling() {
        // 99.9999% of 999999999999.9999999999999999: the intermediate product
        // needs 34 digits, the floored fee fits in 28.
        let amount = Decimal::from_i128_with_scale(9_999_999_999_999_999_999_999_999_999, 16);
        let q = calc(Decimal::new(999_999, 4)).quote(amount).unwrap();
        assert_eq!(
            q.fee,
            Decimal::from_i128_with_scale(9_999_989_999_999_999_999_999_999_999, 16)
        );
        assert_eq!(q.fee + q.net, amount);
    }

    #[test]
    fn zero_rate_is_not_truncation() {
        let q = calc(Decimal::ZERO).quote(Decimal::ONE).unwrap();
        assert_eq!(q.fee, Decimal::ZERO);
        assert_eq!(q.net, Decimal::ONE);
        assert!(!q.truncated_to_zero);
    }

    #[test]
    fn from_config_copies_fields() {
        let cfg = ExchangeConfig::new(UserId::new(), UserId::new(), UserId::new(), Decimal::TEN)
            .with_fee_policy(FeePolicy::TakerProceeds);
        let calc = FeeCalculator::from_config(&cfg);
        assert_eq!(calc.recipient(), cfg.fee_account);
        assert_eq!(calc.policy(), FeePolicy::TakerProceeds);
        assert_eq!(calc.percent(), Decimal::TEN);
    }
}
