//! One member's position across every group they belong to.

use crate::engine::SettlementResult;
use crate::expense::MemberId;
use crate::money::Money;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether the member pays or receives in a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The member owes the counterparty.
    Owe,
    /// The counterparty owes the member.
    Owed,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Owe => "owe",
            Direction::Owed => "owed",
        }
    }
}

/// A settlement seen from one member's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub group: String,
    pub direction: Direction,
    pub counterparty: MemberId,
    pub amount: Money,
    pub currency: String,
}

/// Totals per currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub owed: Money,
    pub owed_to_you: Money,
}

/// Every settlement involving `member`, collected from many groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub member: MemberId,
    pub views: Vec<MemberView>,
    pub totals: BTreeMap<String, Totals>,
}

impl MemberSummary {
    pub fn new(member: MemberId) -> Self {
        MemberSummary {
            member,
            views: Vec::new(),
            totals: BTreeMap::new(),
        }
    }

    /// Builds a summary from `(group name, result)` pairs.
    pub fn collect<'a, I>(member: MemberId, groups: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a SettlementResult)>,
    {
        let mut summary = MemberSummary::new(member);
        for (group, result) in groups {
            summary.add_group(group, result);
        }
        summary
    }

    /// Adds the settlements of one group that involve this member.
    pub fn add_group(&mut self, group: &str, result: &SettlementResult) {
        for settlement in &result.settlements {
            let (direction, counterparty) = if settlement.from == self.member {
                (Direction::Owe, &settlement.to)
            } else if settlement.to == self.member {
                (Direction::Owed, &settlement.from)
            } else {
                continue;
            };

            let totals = self.totals.entry(settlement.currency.clone()).or_default();
            match direction {
                Direction::Owe => totals.owed += settlement.amount,
                Direction::Owed => totals.owed_to_you += settlement.amount,
            }

            self.views.push(MemberView {
                group: group.to_string(),
                direction,
                counterparty: counterparty.clone(),
                amount: settlement.amount,
                currency: settlement.currency.clone(),
            });
        }
    }
}
