//! Loan lifecycle and overdue-fine bookkeeping for a small library.
//!
//! The [`Library`] owns the catalog, the members and the loan ledger. Items
//! move between `Available` and `OnLoan` only through
//! [`Library::borrow_item`] and [`Library::return_item`], which keep the
//! item state, the member's held set and the transaction ledger in step.
//! Every time-sensitive operation takes the current date explicitly.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod item;
pub mod library;
pub mod member;
pub mod observers;
pub mod report;
pub mod transaction;

pub use config::{FinePolicy, LibraryConfig};
pub use error::{ErrorKind, LibraryError};
pub use events::LoanEvent;
pub use ids::{ItemId, MemberId, TransactionId};
pub use item::{Category, Item, ItemKind, LoanState};
pub use library::{Library, MemberFines, OverdueItem};
pub use member::Member;
pub use observers::{LoanLogger, LoanObserver, OverdueNotice};
pub use report::{LibraryReport, Snapshot};
pub use transaction::Transaction;
