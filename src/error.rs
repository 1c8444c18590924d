use chrono::NaiveDate;
use thiserror::Error;

use crate::ids::{ItemId, MemberId, TransactionId};

/// Broad class of a [`LibraryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An ordinary refusal the caller can recover from (e.g. item already on loan)
    Refused,
    /// Item, member and ledger disagree with each other
    Inconsistent,
    /// The caller broke a precondition of the operation
    Misuse,
    /// A handle did not resolve to a registered entity
    NotFound,
}

/// Errors raised by the lending core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// Borrow attempted while the item is checked out
    #[error("'{title}' is already on loan")]
    AlreadyOnLoan {
        /// Title of the item
        title: String,
    },

    /// Return attempted while the item is on the shelf
    #[error("'{title}' is not on loan")]
    NotOnLoan {
        /// Title of the item
        title: String,
    },

    /// Return attempted by a member who does not hold the item
    #[error("member {member} does not hold '{title}'")]
    NotHeld {
        /// Title of the item
        title: String,
        /// Membership number of the caller
        member: String,
    },

    /// Return dated before the loan it would close
    #[error("'{title}' cannot be returned on {returned}, it was lent on {loaned}")]
    ReturnBeforeLoan {
        /// Title of the item
        title: String,
        /// Start of the running loan
        loaned: NaiveDate,
        /// Requested return day
        returned: NaiveDate,
    },

    /// Item and member agreed on the return but the ledger has no open loan for them
    #[error("no open transaction for '{title}' borrowed by member {member}")]
    NoOpenTransaction {
        /// Title of the item
        title: String,
        /// Membership number of the holder
        member: String,
    },

    /// A fine was requested for an item that has never been lent out
    #[error("'{title}' has never been borrowed, no fine can be computed")]
    NeverBorrowed {
        /// Title of the item
        title: String,
    },

    /// A transaction was closed a second time
    #[error("transaction {transaction} is already closed")]
    TransactionClosed {
        /// The closed transaction
        transaction: TransactionId,
    },

    /// A transaction was settled against an item from a different loan
    #[error("transaction {transaction} was not opened for '{title}'")]
    ItemMismatch {
        /// The transaction being closed
        transaction: TransactionId,
        /// Title of the item passed in
        title: String,
    },

    /// No item is registered under the handle
    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    /// No member is registered under the handle
    #[error("unknown member {0}")]
    UnknownMember(MemberId),
}

impl LibraryError {
    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyOnLoan { .. }
            | Self::NotOnLoan { .. }
            | Self::NotHeld { .. }
            | Self::ReturnBeforeLoan { .. } => ErrorKind::Refused,
            Self::NoOpenTransaction { .. } => ErrorKind::Inconsistent,
            Self::NeverBorrowed { .. }
            | Self::TransactionClosed { .. }
            | Self::ItemMismatch { .. } => ErrorKind::Misuse,
            Self::UnknownItem(_) | Self::UnknownMember(_) => ErrorKind::NotFound,
        }
    }
}

/// Result alias for lending operations
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_and_misuse_are_distinct() {
        let refused = LibraryError::AlreadyOnLoan { title: "Dune".to_string() };
        let misuse = LibraryError::TransactionClosed { transaction: TransactionId::new(3) };

        assert_eq!(refused.kind(), ErrorKind::Refused);
        assert_eq!(misuse.kind(), ErrorKind::Misuse);
        assert_eq!(misuse.to_string(), "transaction tx-3 is already closed");
    }

    #[test]
    fn early_return_is_refused_and_foreign_item_is_misuse() {
        let loaned = NaiveDate::from_ymd_opt(2024, 2, 10);
        let returned = NaiveDate::from_ymd_opt(2024, 2, 8);
        if let (Some(loaned), Some(returned)) = (loaned, returned) {
            let early =
                LibraryError::ReturnBeforeLoan { title: "Dune".to_string(), loaned, returned };
            assert_eq!(early.kind(), ErrorKind::Refused);
            assert_eq!(
                early.to_string(),
                "'Dune' cannot be returned on 2024-02-08, it was lent on 2024-02-10"
            );
        }
        let foreign = LibraryError::ItemMismatch {
            transaction: TransactionId::new(1),
            title: "Dune".to_string(),
        };
        assert_eq!(foreign.kind(), ErrorKind::Misuse);
    }

    #[test]
    fn unknown_handles_are_not_found() {
        assert_eq!(LibraryError::UnknownItem(ItemId::new(9)).kind(), ErrorKind::NotFound);
        assert_eq!(LibraryError::UnknownMember(MemberId::new(1)).kind(), ErrorKind::NotFound);
    }
}
