//! Core debt-netting engine.
//!
//! Turns a group's expenses into net balances and a short list of suggested
//! transfers that bring every balance back to zero. The computation is pure:
//! no I/O, no shared state, inputs are only borrowed.

use crate::config::SettlementConfig;
use crate::expense::{Expense, MemberId};
use crate::ledger::{BalanceSheet, Classification};
use crate::money::Money;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    pub currency: String,
}

impl Settlement {
    /// Builds the expense that records this settlement as paid.
    ///
    /// The debtor is the payer and the creditor holds the only split, so the
    /// next netting run sees both balances move toward zero.
    pub fn to_expense(&self, id: impl Into<String>) -> Expense {
        Expense::new(id, self.amount, self.from.clone(), self.currency.clone())
            .with_split(self.to.clone(), self.amount)
    }
}

/// Output of one netting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementResult {
    /// Currency label attached to every settlement.
    pub currency: String,

    /// Net balance per member, before any settlement is applied.
    pub balances: BalanceSheet,

    /// Suggested transfers, debtors with the largest debt first.
    pub settlements: Vec<Settlement>,

    /// Sum of all settlement amounts.
    pub total_network_debt: Money,
}

impl SettlementResult {
    /// Balances after every suggested settlement has been paid.
    pub fn balances_after_settlement(&self) -> BalanceSheet {
        let mut sheet = self.balances.clone();
        for settlement in &self.settlements {
            sheet.apply_settlement(settlement);
        }
        sheet
    }
}

/// The settlement engine.
///
/// Stateless apart from its configuration; a single instance can serve any
/// number of groups, concurrently if needed.
///
/// # Algorithm
///
/// 1. Accumulate balances: payer credited, split members debited.
/// 2. Classify members as debtors, creditors or settled using the tolerance.
/// 3. Greedily match the largest debt with the largest credit, transferring
///    the smaller of the two, until one side runs out.
///
/// The greedy matching keeps the transfer count at or below
/// `debtors + creditors - 1` but is not guaranteed to find the global minimum.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: SettlementConfig,
}

impl SettlementEngine {
    pub fn new(config: SettlementConfig) -> Self {
        SettlementEngine { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Computes balances and suggested settlements for one group.
    ///
    /// Expects a single currency. Mixed input is netted as if it were one
    /// currency and logged; use [`SettlementEngine::compute_by_currency`] to
    /// partition first.
    pub fn compute(&self, expenses: &[Expense]) -> SettlementResult {
        let currency = self.currency_label(expenses);
        let balances = BalanceSheet::from_expenses(expenses);
        self.check_zero_sum(&balances);

        let classes = balances.classify(self.config.tolerance);
        let settlements = self.match_transfers(classes, &currency);
        let total_network_debt = settlements.iter().map(|s| s.amount).sum();

        debug!(
            "Netted {} expenses across {} members into {} settlements totalling {} {}",
            expenses.len(),
            balances.len(),
            settlements.len(),
            total_network_debt,
            currency
        );

        SettlementResult {
            currency,
            balances,
            settlements,
            total_network_debt,
        }
    }

    /// Partitions expenses by currency and nets each partition separately.
    ///
    /// Keys are currency codes in ascending order. Empty input yields an
    /// empty map.
    pub fn compute_by_currency(
        &self,
        expenses: &[Expense],
    ) -> BTreeMap<String, SettlementResult> {
        let mut partitions: BTreeMap<&str, Vec<Expense>> = BTreeMap::new();
        for expense in expenses {
            partitions
                .entry(expense.currency.as_str())
                .or_default()
                .push(expense.clone());
        }

        partitions
            .into_iter()
            .map(|(currency, group)| (currency.to_string(), self.compute(&group)))
            .collect()
    }

    /// Walks debtors and creditors with two cursors, emitting one transfer per step.
    fn match_transfers(&self, classes: Classification, currency: &str) -> Vec<Settlement> {
        let tolerance = self.config.tolerance;
        let dp = self.config.minor_unit_dp();
        let Classification {
            mut debtors,
            mut creditors,
            ..
        } = classes;

        let mut settlements = Vec::new();
        let mut i = 0;
        let mut j = 0;

        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let owed = debtor.balance.abs().min(creditor.balance);
            let amount = owed.round_to(dp);

            if owed > tolerance && amount.is_positive() {
                debug!(
                    "Settlement: {} pays {} {} {}",
                    debtor.member, creditor.member, amount, currency
                );
                settlements.push(Settlement {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                    currency: currency.to_string(),
                });

                // Move both by the emitted amount so the working balances match
                // what paying the settlements would leave behind.
                debtor.balance += amount;
                creditor.balance -= amount;
            }

            let debtor_done = debtor.balance.is_within(tolerance);
            let creditor_done = creditor.balance.is_within(tolerance);
            if !debtor_done && !creditor_done {
                // Keeps the loop finite if rounding ever leaves both sides open.
                warn!(
                    "Rounding left {} and {} unsettled, advancing past {}",
                    debtor.balance, creditor.balance, debtor.member
                );
                i += 1;
                continue;
            }
            if debtor_done {
                i += 1;
            }
            if creditor_done {
                j += 1;
            }
        }

        settlements
    }

    fn currency_label(&self, expenses: &[Expense]) -> String {
        let mut currencies = expenses.iter().map(|e| e.currency.as_str());
        let Some(first) = currencies.next() else {
            return self.config.currency.clone();
        };
        if currencies.any(|c| c != first) {
            warn!(
                "Expenses mix currencies; netting them together and labelling as {}",
                first
            );
        }
        first.to_string()
    }

    /// Logs when balances do not sum to zero within `members * tolerance`.
    fn check_zero_sum(&self, balances: &BalanceSheet) {
        let total = balances.total();
        let allowed = self.config.tolerance.times(balances.len());
        if !total.is_within(allowed) {
            warn!(
                "Balances sum to {} instead of zero; some expense splits do not match their amounts",
                total
            );
        }
    }
}

/// Nets `expenses` with the default configuration (one-cent tolerance, USD).
pub fn compute_settlements(expenses: &[Expense]) -> SettlementResult {
    SettlementEngine::default().compute(expenses)
}
