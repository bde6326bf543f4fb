//! Expense models and the CSV row format they are loaded from.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a group member, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        MemberId(id.to_string())
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        MemberId(id)
    }
}

/// One member's share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub member: MemberId,
    pub amount: Money,
}

impl Split {
    pub fn new(member: impl Into<MemberId>, amount: Money) -> Self {
        Split {
            member: member.into(),
            amount,
        }
    }
}

/// An expense paid by one member and owed by the members in `splits`.
///
/// The splits are expected to add up to `amount`, but nothing here enforces
/// it. Callers that accept writes should check [`Expense::is_balanced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Money,
    pub paid_by: MemberId,
    pub currency: String,
    pub splits: Vec<Split>,
}

impl Expense {
    /// Creates an expense with no splits yet.
    pub fn new(
        id: impl Into<String>,
        amount: Money,
        paid_by: impl Into<MemberId>,
        currency: impl Into<String>,
    ) -> Self {
        Expense {
            id: id.into(),
            amount,
            paid_by: paid_by.into(),
            currency: currency.into(),
            splits: Vec::new(),
        }
    }

    /// Builder-style split addition.
    pub fn with_split(mut self, member: impl Into<MemberId>, amount: Money) -> Self {
        self.splits.push(Split::new(member, amount));
        self
    }

    /// Sum of all split amounts.
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Returns `true` if the splits sum to the amount within `tolerance`.
    pub fn is_balanced(&self, tolerance: Money) -> bool {
        (self.amount - self.split_total()).is_within(tolerance)
    }
}

/// Raw row as read from a group CSV file.
///
/// Columns are `type,expense,member,amount,currency`. An `expense` row names
/// the payer in `member`; a `split` row names the member who owes a share.
/// `currency` is only read on `expense` rows and may be empty.
#[derive(Debug, Deserialize)]
pub struct ExpenseRecord {
    /// Row type: expense or split
    #[serde(rename = "type")]
    pub row_type: String,

    /// Expense identifier, unique within the group
    pub expense: String,

    /// Payer (expense rows) or owing member (split rows)
    pub member: String,

    /// Amount paid or owed
    pub amount: Option<String>,

    /// Currency code, expense rows only
    #[serde(default)]
    pub currency: Option<String>,
}

impl ExpenseRecord {
    /// Parses the raw record into a typed row.
    ///
    /// Returns `None` for unknown types, blank identifiers and bad amounts.
    pub fn parse(&self) -> Option<ParsedRecord> {
        let expense = self.expense.trim();
        let member = self.member.trim();
        if expense.is_empty() || member.is_empty() {
            return None;
        }
        let amount = self.parse_amount()?;

        let kind = match self.row_type.trim().to_lowercase().as_str() {
            "expense" => RecordKind::Expense {
                currency: self
                    .currency
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_uppercase),
            },
            "split" => RecordKind::Split,
            _ => return None,
        };

        Some(ParsedRecord {
            expense: expense.to_string(),
            member: MemberId::new(member),
            amount,
            kind,
        })
    }

    fn parse_amount(&self) -> Option<Money> {
        let raw = self.amount.as_ref()?.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse().ok()
    }
}

/// A parsed row ready to be folded into an [`Expense`].
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub expense: String,
    pub member: MemberId,
    pub amount: Money,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// Declares an expense paid by `member`.
    Expense { currency: Option<String> },

    /// Adds `member`'s share to a declared expense.
    Split,
}
