//! Read-only renderings of a [`Library`] for the console and for export.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::{LibraryError, Result},
    ids::{ItemId, MemberId},
    item::Item,
    library::{Library, MemberFines},
    transaction::Transaction,
};

/// Separator printed between report entries
const RULE: &str = "-------------------------------";

/// Text reports over a library
#[derive(Debug)]
pub struct LibraryReport;

impl LibraryReport {
    /// Every item with its details and loan status
    #[must_use]
    pub fn catalog(library: &Library) -> String {
        let mut out = String::new();
        for (_, item) in library.items() {
            out.push_str(&format!("{}\nStatus: {}\n{RULE}\n", item.detail(), item.state().label()));
        }
        out
    }

    /// One line describing a transaction with member and item names resolved
    #[must_use]
    pub fn describe_transaction(library: &Library, tx: &Transaction) -> String {
        let member =
            library.member(tx.member()).map_or_else(|| tx.member().to_string(), ToString::to_string);
        let item = library.item(tx.item()).map_or_else(|| tx.item().to_string(), Item::detail);
        let returned = tx
            .return_date()
            .map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d").to_string());
        format!(
            "Transaction {}: {member} borrowed {item}, Loaned: {}, Returned: {returned}, Fine: Rp{}",
            tx.id(),
            tx.loan_date(),
            tx.fine()
        )
    }

    /// The whole loan ledger in borrowing order
    #[must_use]
    pub fn loan_activity(library: &Library) -> String {
        if library.transactions().is_empty() {
            return "No loans recorded yet.\n".to_string();
        }

        let mut out = String::new();
        for tx in library.transactions() {
            out.push_str(&format!("{}\n{RULE}\n", Self::describe_transaction(library, tx)));
        }
        out
    }

    /// Live overdue fines per member as of `today`
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Library::current_overdue_fines`]
    pub fn member_fines(library: &Library, today: NaiveDate) -> Result<String> {
        let mut out = String::new();
        for MemberFines { member, overdue, total } in library.current_overdue_fines(today)? {
            let holder = library.member(member).ok_or(LibraryError::UnknownMember(member))?;
            out.push_str(&format!("Member: {holder}\n"));
            for entry in overdue {
                let title = library.item(entry.item).map_or("?", Item::title);
                out.push_str(&format!("  {title}: Rp{}\n", entry.fine));
            }
            out.push_str(&format!("Total fine: Rp{total}\n"));
        }
        Ok(out)
    }

    /// Loan history of one member
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownMember` if `member` is not registered
    pub fn member_transactions(library: &Library, member: MemberId) -> Result<String> {
        let holder = library.member(member).ok_or(LibraryError::UnknownMember(member))?;

        let mut out = format!("Transactions of {holder}\n");
        for tx in library.transactions_for_member(member) {
            out.push_str(&format!("{}\n{RULE}\n", Self::describe_transaction(library, tx)));
        }
        Ok(out)
    }

    /// Item count per category, ordered by category label
    #[must_use]
    pub fn category_statistics(library: &Library) -> String {
        let mut out = String::new();
        for (category, count) in library.category_counts() {
            out.push_str(&format!("{category}: {count}\n"));
        }
        out
    }
}

/// One catalog row of a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    /// Catalog handle
    pub id: ItemId,
    /// Item title
    pub title: String,
    /// Category label
    pub category: &'static str,
    /// Year of publication
    pub year: u32,
    /// Loan status label
    pub status: &'static str,
    /// Current holder, if on loan
    pub borrower: Option<MemberId>,
}

/// Serializable picture of a library on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Day fines were assessed on
    pub as_of: NaiveDate,
    /// Catalog in registration order
    pub items: Vec<ItemRow>,
    /// Full ledger in borrowing order
    pub transactions: Vec<Transaction>,
    /// Live fines per member
    pub fines: Vec<MemberFines>,
    /// Item count per category label
    pub categories: BTreeMap<&'static str, usize>,
}

impl Snapshot {
    /// Capture the current state of `library`, assessing fines on `as_of`
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Library::current_overdue_fines`]
    pub fn capture(library: &Library, as_of: NaiveDate) -> Result<Self> {
        let items = library
            .items()
            .map(|(id, item)| ItemRow {
                id,
                title: item.title().to_owned(),
                category: item.category().label(),
                year: item.year(),
                status: item.state().label(),
                borrower: item.borrower(),
            })
            .collect();
        let categories = library
            .category_counts()
            .into_iter()
            .map(|(category, count)| (category.label(), count))
            .collect();

        Ok(Self {
            as_of,
            items,
            transactions: library.transactions().to_vec(),
            fines: library.current_overdue_fines(as_of)?,
            categories,
        })
    }

    /// Render as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
