//! Per-member balance accumulation and classification.
//!
//! Sign convention: a positive balance is owed to the member by the group, a
//! negative balance is owed by the member to the group.

use crate::engine::Settlement;
use crate::expense::{Expense, MemberId};
use crate::money::Money;
use serde::Serialize;
use std::collections::BTreeMap;

/// Net balance of every member that appears in a set of expenses.
///
/// # Invariants
///
/// - Built fresh for every netting run, never shared between runs
/// - Iteration order is ascending by member id, independent of input order
/// - For well-formed expenses (splits sum to amount) the balances sum to zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: BTreeMap<MemberId, Money>,
}

impl BalanceSheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        BalanceSheet {
            balances: BTreeMap::new(),
        }
    }

    /// Accumulates every expense into a new sheet.
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut sheet = BalanceSheet::new();
        for expense in expenses {
            sheet.apply_expense(expense);
        }
        sheet
    }

    /// Credits the payer with the full amount, then debits each split member.
    ///
    /// A payer who is also a split member nets out on the same key.
    pub fn apply_expense(&mut self, expense: &Expense) {
        self.credit(&expense.paid_by, expense.amount);
        for split in &expense.splits {
            self.debit(&split.member, split.amount);
        }
    }

    /// Records a paid settlement: the payer's debt shrinks, the payee's credit shrinks.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.credit(&settlement.from, settlement.amount);
        self.debit(&settlement.to, settlement.amount);
    }

    pub fn credit(&mut self, member: &MemberId, amount: Money) {
        *self.balances.entry(member.clone()).or_default() += amount;
    }

    pub fn debit(&mut self, member: &MemberId, amount: Money) {
        *self.balances.entry(member.clone()).or_default() -= amount;
    }

    /// Balance of `member`, zero if the member never appeared.
    pub fn get(&self, member: &MemberId) -> Money {
        self.balances.get(member).copied().unwrap_or(Money::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &Money)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances. Zero for well-formed input.
    pub fn total(&self) -> Money {
        self.balances.values().sum()
    }

    /// Returns `true` if every balance is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Money) -> bool {
        self.balances.values().all(|b| b.is_within(tolerance))
    }

    /// Splits members into debtors, creditors and settled members.
    ///
    /// Debtors are sorted most negative first, creditors largest first. Ties
    /// are broken by member id so the order never depends on input order.
    pub fn classify(&self, tolerance: Money) -> Classification {
        let mut classification = Classification::default();

        for (member, &balance) in &self.balances {
            let position = Position {
                member: member.clone(),
                balance,
            };
            if balance < -tolerance {
                classification.debtors.push(position);
            } else if balance > tolerance {
                classification.creditors.push(position);
            } else {
                classification.settled.push(member.clone());
            }
        }

        classification
            .debtors
            .sort_by(|a, b| a.balance.cmp(&b.balance).then_with(|| a.member.cmp(&b.member)));
        classification
            .creditors
            .sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.member.cmp(&b.member)));

        classification
    }
}

impl FromIterator<(MemberId, Money)> for BalanceSheet {
    fn from_iter<T: IntoIterator<Item = (MemberId, Money)>>(iter: T) -> Self {
        let mut sheet = BalanceSheet::new();
        for (member, amount) in iter {
            sheet.credit(&member, amount);
        }
        sheet
    }
}

/// A member with a non-negligible remaining balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub member: MemberId,
    pub balance: Money,
}

/// Result of [`BalanceSheet::classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub debtors: Vec<Position>,
    pub creditors: Vec<Position>,
    pub settled: Vec<MemberId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MemberId {
        MemberId::from(s)
    }

    #[test]
    fn test_payer_credited_and_splits_debited() {
        let expense = Expense::new("e1", Money::from_cents(9000), "alice", "USD")
            .with_split("alice", Money::from_cents(3000))
            .with_split("bob", Money::from_cents(3000))
            .with_split("carol", Money::from_cents(3000));

        let sheet = BalanceSheet::from_expenses([&expense]);
        assert_eq!(sheet.get(&id("alice")), Money::from_cents(6000));
        assert_eq!(sheet.get(&id("bob")), Money::from_cents(-3000));
        assert_eq!(sheet.get(&id("carol")), Money::from_cents(-3000));
        assert!(sheet.total().is_zero());
    }

    #[test]
    fn test_unknown_member_is_zero() {
        let sheet = BalanceSheet::new();
        assert!(sheet.get(&id("nobody")).is_zero());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_classify_partitions_and_sorts() {
        let sheet: BalanceSheet = [
            (id("a"), Money::from_cents(-1000)),
            (id("b"), Money::from_cents(-5000)),
            (id("c"), Money::from_cents(2000)),
            (id("d"), Money::from_cents(4000)),
            (id("e"), Money::from_cents(1)),
            (id("f"), Money::from_cents(-1)),
        ]
        .into_iter()
        .collect();

        let classes = sheet.classify(Money::from_cents(1));
        let debtors: Vec<_> = classes.debtors.iter().map(|p| p.member.as_str()).collect();
        let creditors: Vec<_> = classes.creditors.iter().map(|p| p.member.as_str()).collect();

        assert_eq!(debtors, vec!["b", "a"]);
        assert_eq!(creditors, vec!["d", "c"]);
        assert_eq!(classes.settled, vec![id("e"), id("f")]);
    }

    #[test]
    fn test_classify_breaks_ties_by_member_id() {
        let sheet: BalanceSheet = [
            (id("zed"), Money::from_cents(-500)),
            (id("amy"), Money::from_cents(-500)),
            (id("kim"), Money::from_cents(1000)),
        ]
        .into_iter()
        .collect();

        let classes = sheet.classify(Money::from_cents(1));
        assert_eq!(classes.debtors[0].member, id("amy"));
        assert_eq!(classes.debtors[1].member, id("zed"));
    }

    #[test]
    fn test_apply_settlement_moves_both_toward_zero() {
        let mut sheet: BalanceSheet = [
            (id("alice"), Money::from_cents(1000)),
            (id("bob"), Money::from_cents(-1000)),
        ]
        .into_iter()
        .collect();

        sheet.apply_settlement(&Settlement {
            from: id("bob"),
            to: id("alice"),
            amount: Money::from_cents(1000),
            currency: "USD".to_string(),
        });

        assert!(sheet.is_settled(Money::from_cents(1)));
        assert!(sheet.get(&id("bob")).is_zero());
    }
}
