//! CSV output for settlements, balances and member views.
//!
//! Amounts are written with the number of decimal places of the currency's
//! minor unit. Rows come out in the order the engine produced them, which is
//! deterministic for a given input.

use crate::directory::MemberDirectory;
use crate::engine::SettlementResult;
use crate::error::Result;
use crate::expense::MemberId;
use crate::summary::MemberSummary;
use std::io::Write;

/// A netting result tagged with the group it belongs to.
pub struct GroupReport<'a> {
    pub group: &'a str,
    pub result: &'a SettlementResult,
}

/// Formats member ids for output, with or without a directory.
pub struct Names<'a> {
    directory: Option<&'a MemberDirectory>,
}

impl<'a> Names<'a> {
    pub fn new(directory: Option<&'a MemberDirectory>) -> Self {
        Names { directory }
    }

    /// Directory name when a directory is loaded, otherwise the raw id.
    pub fn get<'m>(&self, member: &'m MemberId) -> &'m str
    where
        'a: 'm,
    {
        match self.directory {
            Some(directory) => directory.display_name(member),
            None => member.as_str(),
        }
    }
}

/// Writes `group,from,from_name,to,to_name,amount,currency` rows.
pub fn write_settlements<W: Write>(
    writer: W,
    groups: &[GroupReport<'_>],
    names: &Names<'_>,
    dp: u32,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["group", "from", "from_name", "to", "to_name", "amount", "currency"])?;

    for report in groups {
        for s in &report.result.settlements {
            csv_writer.write_record([
                report.group,
                s.from.as_str(),
                names.get(&s.from),
                s.to.as_str(),
                names.get(&s.to),
                s.amount.format_dp(dp).as_str(),
                s.currency.as_str(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `group,member,name,balance,currency` rows, members in id order.
pub fn write_balances<W: Write>(
    writer: W,
    groups: &[GroupReport<'_>],
    names: &Names<'_>,
    dp: u32,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["group", "member", "name", "balance", "currency"])?;

    for report in groups {
        for (member, balance) in report.result.balances.iter() {
            csv_writer.write_record([
                report.group,
                member.as_str(),
                names.get(member),
                balance.format_dp(dp).as_str(),
                report.result.currency.as_str(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `group,direction,counterparty,counterparty_name,amount,currency` rows.
pub fn write_member_view<W: Write>(
    writer: W,
    summary: &MemberSummary,
    names: &Names<'_>,
    dp: u32,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "group",
        "direction",
        "counterparty",
        "counterparty_name",
        "amount",
        "currency",
    ])?;

    for view in &summary.views {
        csv_writer.write_record([
            view.group.as_str(),
            view.direction.as_str(),
            view.counterparty.as_str(),
            names.get(&view.counterparty),
            view.amount.format_dp(dp).as_str(),
            view.currency.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemberRecord;
    use crate::engine::compute_settlements;
    use crate::expense::Expense;
    use crate::money::Money;

    fn sample() -> SettlementResult {
        compute_settlements(&[Expense::new("e1", Money::from_cents(9000), "u1", "USD")
            .with_split("u1", Money::from_cents(3000))
            .with_split("u2", Money::from_cents(3000))
            .with_split("u3", Money::from_cents(3000))])
    }

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_settlements_without_directory_use_ids() {
        let result = sample();
        let mut out = Vec::new();
        write_settlements(
            &mut out,
            &[GroupReport { group: "trip", result: &result }],
            &Names::new(None),
            2,
        )
        .unwrap();

        let out = to_string(out);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "group,from,from_name,to,to_name,amount,currency");
        assert_eq!(lines[1], "trip,u2,u2,u1,u1,30.00,USD");
        assert_eq!(lines[2], "trip,u3,u3,u1,u1,30.00,USD");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_settlements_with_directory_use_names() {
        let mut directory = MemberDirectory::new();
        directory.insert(&MemberRecord {
            id: "u1".to_string(),
            name: Some("Alice".to_string()),
            email: None,
        });
        let result = sample();
        let mut out = Vec::new();
        write_settlements(
            &mut out,
            &[GroupReport { group: "trip", result: &result }],
            &Names::new(Some(&directory)),
            2,
        )
        .unwrap();

        let out = to_string(out);
        assert!(out.contains("trip,u2,Unknown,u1,Alice,30.00,USD"));
    }

    #[test]
    fn test_balances_in_member_order() {
        let result = sample();
        let mut out = Vec::new();
        write_balances(
            &mut out,
            &[GroupReport { group: "trip", result: &result }],
            &Names::new(None),
            2,
        )
        .unwrap();

        let out = to_string(out);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "group,member,name,balance,currency");
        assert_eq!(lines[1], "trip,u1,u1,60.00,USD");
        assert_eq!(lines[2], "trip,u2,u2,-30.00,USD");
        assert_eq!(lines[3], "trip,u3,u3,-30.00,USD");
    }

    #[test]
    fn test_member_view() {
        let result = sample();
        let summary = MemberSummary::collect(MemberId::from("u2"), [("trip", &result)]);
        let mut out = Vec::new();
        write_member_view(&mut out, &summary, &Names::new(None), 2).unwrap();

        let out = to_string(out);
        assert!(out.starts_with("group,direction,counterparty,counterparty_name,amount,currency"));
        assert!(out.contains("trip,owe,u1,u1,30.00,USD"));
    }
}
