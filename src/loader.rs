//! Streaming CSV loader for one group's expenses.

use crate::config::SettlementConfig;
use crate::error::{Result, SettleError};
use crate::expense::{Expense, ExpenseRecord, ParsedRecord, RecordKind, Split};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;

/// Folds `expense` and `split` rows into [`Expense`] values.
///
/// Expenses keep the order in which they were declared. Rows that cannot be
/// used are logged at warn level and skipped.
pub struct ExpenseLoader {
    config: SettlementConfig,
    strict: bool,
    expenses: Vec<Expense>,
    index: HashMap<String, usize>,
}

impl ExpenseLoader {
    pub fn new(config: SettlementConfig) -> Self {
        ExpenseLoader {
            config,
            strict: false,
            expenses: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// In strict mode [`ExpenseLoader::finish`] rejects expenses whose splits
    /// do not add up to their amount.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reads rows from a CSV reader one at a time.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<ExpenseRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let outcome = parse_row(&record, row_num)
                        .and_then(|parsed| self.process_record(parsed, row_num));
                    if let Err(e) = outcome {
                        warn!("{}", e);
                    }
                }
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(())
    }

    fn process_record(&mut self, record: ParsedRecord, row: usize) -> Result<()> {
        match record.kind {
            RecordKind::Expense { currency } => {
                if self.index.contains_key(&record.expense) {
                    return Err(SettleError::DuplicateExpense {
                        expense: record.expense,
                        row,
                    });
                }
                let currency = currency.unwrap_or_else(|| self.config.currency.clone());
                debug!(
                    "Row {}: Expense {} of {} {} paid by {}",
                    row, record.expense, record.amount, currency, record.member
                );
                self.index.insert(record.expense.clone(), self.expenses.len());
                self.expenses.push(Expense::new(
                    record.expense,
                    record.amount,
                    record.member,
                    currency,
                ));
            }
            RecordKind::Split => {
                let Some(&idx) = self.index.get(&record.expense) else {
                    return Err(SettleError::UnknownExpense {
                        expense: record.expense,
                        row,
                    });
                };
                debug!(
                    "Row {}: {} owes {} of expense {}",
                    row, record.member, record.amount, record.expense
                );
                self.expenses[idx]
                    .splits
                    .push(Split::new(record.member, record.amount));
            }
        }

        Ok(())
    }

    /// Returns the loaded expenses, checking split totals along the way.
    pub fn finish(self) -> Result<Vec<Expense>> {
        let tolerance = self.config.tolerance;
        for expense in &self.expenses {
            if expense.is_balanced(tolerance) {
                continue;
            }
            if self.strict {
                return Err(SettleError::UnbalancedExpense {
                    expense: expense.id.clone(),
                    amount: expense.amount,
                    split_total: expense.split_total(),
                });
            }
            warn!(
                "Expense {}: splits total {} but amount is {}",
                expense.id,
                expense.split_total(),
                expense.amount
            );
        }
        Ok(self.expenses)
    }
}

/// Parses a raw row, describing what was wrong with it on failure.
fn parse_row(record: &ExpenseRecord, row: usize) -> Result<ParsedRecord> {
    record.parse().ok_or_else(|| SettleError::InvalidRecord {
        row,
        message: format!(
            "expected an expense or split row with member and amount, got type '{}' for expense '{}'",
            record.row_type.trim(),
            record.expense.trim()
        ),
    })
}

/// Loads a whole group from a CSV reader.
pub fn load_expenses<R: Read>(
    reader: R,
    config: &SettlementConfig,
    strict: bool,
) -> Result<Vec<Expense>> {
    let mut loader = ExpenseLoader::new(config.clone()).strict(strict);
    loader.process_csv(reader)?;
    loader.finish()
}
