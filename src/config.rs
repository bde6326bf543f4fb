//! Netting configuration.

use crate::error::{Result, SettleError};
use crate::money::Money;

/// Tolerance and currency label used by a netting run.
///
/// Balances and transfers whose magnitude is at or below `tolerance` are
/// treated as zero. Emitted transfer amounts are rounded to the number of
/// decimal places of `tolerance`, so the default of `0.01` yields cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementConfig {
    pub tolerance: Money,
    pub currency: String,
}

impl SettlementConfig {
    /// Default tolerance: one cent.
    pub const DEFAULT_TOLERANCE_CENTS: i64 = 1;

    /// Default currency label, used when no expense carries one.
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Creates a config, rejecting a zero or negative tolerance.
    pub fn new(tolerance: Money, currency: impl Into<String>) -> Result<Self> {
        if !tolerance.is_positive() {
            return Err(SettleError::InvalidTolerance(tolerance));
        }
        Ok(SettlementConfig {
            tolerance,
            currency: currency.into(),
        })
    }

    /// Decimal places of the currency's minor unit, derived from the tolerance.
    pub fn minor_unit_dp(&self) -> u32 {
        self.tolerance.decimal_places()
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig {
            tolerance: Money::from_cents(Self::DEFAULT_TOLERANCE_CENTS),
            currency: Self::DEFAULT_CURRENCY.to_string(),
        }
    }
}
