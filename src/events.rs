use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, MemberId};

/// Loan lifecycle events published by the library after a state change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LoanEvent {
    /// An item was lent to a member
    Borrowed {
        /// Borrowing member
        member: MemberId,
        /// Lent item
        item: ItemId,
        /// First day of the loan
        on: NaiveDate,
    },
    /// An item came back and its transaction was settled
    Returned {
        /// Returning member
        member: MemberId,
        /// Returned item
        item: ItemId,
        /// Day of the return
        on: NaiveDate,
        /// Fine settled on the transaction
        fine: u64,
    },
}
