use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::FinePolicy,
    error::{LibraryError, Result},
    ids::{ItemId, MemberId, TransactionId},
    item::Item,
};

/// Ledger entry for one loan of one item to one member.
///
/// Open until [`close`](Self::close) records the return date and the fine;
/// a closed transaction never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position in the library ledger
    id: TransactionId,
    /// Borrowing member
    member: MemberId,
    /// Borrowed item
    item: ItemId,
    /// Day the loan started
    loan_date: NaiveDate,
    /// Day the item came back, `None` while open
    return_date: Option<NaiveDate>,
    /// Fine settled at close, zero while open
    fine: u64,
}

impl Transaction {
    /// Open a transaction for a loan that starts on `loan_date`
    #[must_use]
    pub const fn open(
        id: TransactionId,
        member: MemberId,
        item: ItemId,
        loan_date: NaiveDate,
    ) -> Self {
        Self { id, member, item, loan_date, return_date: None, fine: 0 }
    }

    /// Position in the ledger
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Borrowing member
    #[must_use]
    pub const fn member(&self) -> MemberId {
        self.member
    }

    /// Borrowed item
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// Day the loan started
    #[must_use]
    pub const fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    /// Day the item came back, `None` while open
    #[must_use]
    pub const fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Settled fine, zero while open
    #[must_use]
    pub const fn fine(&self) -> u64 {
        self.fine
    }

    /// Whether the item has not come back yet
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Whether this transaction is the loan of `item` to `member`
    #[must_use]
    pub fn pairs(&self, member: MemberId, item: ItemId) -> bool {
        self.member == member && self.item == item
    }

    /// Record the return and settle the fine from the borrowed item.
    ///
    /// `item` must be the item this transaction was opened for, i.e. its last
    /// loan started on this transaction's loan date.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::TransactionClosed` if the transaction was already
    /// closed and `LibraryError::ItemMismatch` if `item` belongs to another
    /// loan; nothing is modified in either case
    pub fn close(
        &mut self,
        return_date: NaiveDate,
        item: &Item,
        policy: &FinePolicy,
    ) -> Result<u64> {
        if !self.is_open() {
            return Err(LibraryError::TransactionClosed { transaction: self.id });
        }
        if item.loan_start() != Some(self.loan_date) {
            return Err(LibraryError::ItemMismatch {
                transaction: self.id,
                title: item.title().to_owned(),
            });
        }
        let fine = item.compute_fine(return_date, policy)?;
        self.return_date = Some(return_date);
        self.fine = fine;
        Ok(fine)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} borrowed {} on {}", self.id, self.member, self.item, self.loan_date)?;
        match self.return_date {
            Some(returned) => write!(f, ", returned {returned}, fine Rp{}", self.fine),
            None => f.write_str(", not yet returned"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use chrono::Days;

    use super::*;
    use crate::item::ItemKind;

    /// Day the test loans start
    #[allow(clippy::expect_used)]
    fn loan_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    /// An item already lent to member 0 on `loan_day`
    fn lent_magazine() -> Result<Item> {
        let mut item = Item::new(
            "National Geographic",
            "Gramedia",
            2023,
            ItemKind::Magazine { edition: "July".to_string(), frequency: "Monthly".to_string() },
        );
        item.borrow(MemberId::new(0), loan_day())?;
        Ok(item)
    }

    #[test]
    fn new_transaction_is_open() {
        let tx =
            Transaction::open(TransactionId::new(0), MemberId::new(0), ItemId::new(1), loan_day());

        assert!(tx.is_open());
        assert_eq!(tx.return_date(), None);
        assert_eq!(tx.fine(), 0);
    }

    #[test]
    fn close_records_return_and_fine() -> Result<()> {
        let item = lent_magazine()?;
        let policy = FinePolicy::default();
        let mut tx =
            Transaction::open(TransactionId::new(0), MemberId::new(0), ItemId::new(1), loan_day());

        let returned = loan_day() + Days::new(10);
        let fine = tx.close(returned, &item, &policy)?;

        assert_eq!(fine, item.compute_fine(returned, &policy)?);
        assert_eq!(tx.fine(), 3000);
        assert_eq!(tx.return_date(), Some(returned));
        assert!(!tx.is_open());
        Ok(())
    }

    #[test]
    fn closing_twice_is_rejected_without_changes() -> Result<()> {
        let item = lent_magazine()?;
        let policy = FinePolicy::default();
        let mut tx =
            Transaction::open(TransactionId::new(4), MemberId::new(0), ItemId::new(1), loan_day());
        tx.close(loan_day() + Days::new(2), &item, &policy)?;
        let before = tx.clone();

        let second = tx.close(loan_day() + Days::new(30), &item, &policy);

        assert_eq!(
            second,
            Err(LibraryError::TransactionClosed { transaction: TransactionId::new(4) })
        );
        assert_eq!(tx, before);
        Ok(())
    }

    #[test]
    fn closing_with_item_from_another_loan_is_rejected() -> Result<()> {
        let mut other = lent_magazine()?;
        other.return_item()?;
        other.borrow(MemberId::new(1), loan_day() - Days::new(30))?;
        let mut tx =
            Transaction::open(TransactionId::new(2), MemberId::new(0), ItemId::new(1), loan_day());
        let before = tx.clone();

        let result = tx.close(loan_day() + Days::new(2), &other, &FinePolicy::default());

        assert!(matches!(
            result,
            Err(LibraryError::ItemMismatch { transaction, .. }) if transaction == TransactionId::new(2)
        ));
        assert_eq!(result.map_err(|err| err.kind()), Err(crate::error::ErrorKind::Misuse));
        assert_eq!(tx, before);
        Ok(())
    }

    #[test]
    fn display_reflects_open_and_closed() -> Result<()> {
        let item = lent_magazine()?;
        let mut tx =
            Transaction::open(TransactionId::new(0), MemberId::new(1), ItemId::new(2), loan_day());
        assert_eq!(
            tx.to_string(),
            "tx-0: member-1 borrowed item-2 on 2024-01-15, not yet returned"
        );

        tx.close(loan_day() + Days::new(8), &item, &FinePolicy::default())?;
        assert_eq!(
            tx.to_string(),
            "tx-0: member-1 borrowed item-2 on 2024-01-15, returned 2024-01-23, fine Rp1000"
        );
        Ok(())
    }
}
