//! # SmartSplit Settle
//!
//! Debt netting for shared group expenses: accumulates what each member paid
//! and owes, then suggests a short list of transfers that settles everyone.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 4 decimal places via `rust_decimal`, transfers
//!   rounded to the currency's minor unit
//! - **Pure netting**: [`SettlementEngine::compute`] does no I/O and keeps no
//!   state between calls
//! - **Tolerance, not magic numbers**: balances within [`SettlementConfig::tolerance`]
//!   of zero count as settled
//! - **Deterministic output**: members ordered by id, ties broken by id
//!
//! ## Example
//!
//! ```
//! use smartsplit_settle::{compute_settlements, Expense, Money};
//!
//! let dinner = Expense::new("e1", Money::from_cents(9000), "alice", "USD")
//!     .with_split("alice", Money::from_cents(3000))
//!     .with_split("bob", Money::from_cents(3000))
//!     .with_split("carol", Money::from_cents(3000));
//!
//! let result = compute_settlements(&[dinner]);
//! assert_eq!(result.settlements.len(), 2);
//! assert_eq!(result.total_network_debt, Money::from_cents(6000));
//! ```

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod loader;
pub mod money;
pub mod report;
pub mod summary;

pub use config::SettlementConfig;
pub use directory::MemberDirectory;
pub use engine::{compute_settlements, Settlement, SettlementEngine, SettlementResult};
pub use error::{Result, SettleError};
pub use expense::{Expense, ExpenseRecord, MemberId, Split};
pub use ledger::{BalanceSheet, Classification, Position};
pub use loader::{load_expenses, ExpenseLoader};
pub use money::Money;
pub use summary::{Direction, MemberSummary, MemberView};
