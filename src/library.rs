use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::{
    config::{FinePolicy, LibraryConfig},
    error::{LibraryError, Result},
    events::LoanEvent,
    ids::{ItemId, MemberId, TransactionId},
    item::{Category, Item},
    member::Member,
    observers::LoanObserver,
    transaction::Transaction,
};

/// Live fine of one overdue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueItem {
    /// The overdue item
    pub item: ItemId,
    /// Fine owed if it were returned today
    pub fine: u64,
}

/// Live fines of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFines {
    /// The member the fines belong to
    pub member: MemberId,
    /// Held items with a positive fine, in borrowing order
    pub overdue: Vec<OverdueItem>,
    /// Sum of `overdue`, zero when nothing is late
    pub total: u64,
}

/// Catalog, membership and loan ledger of one library.
///
/// Items, members and transactions live in insertion-ordered arenas and refer
/// to each other only through [`ItemId`], [`MemberId`] and [`TransactionId`].
/// Borrowing and returning are the only operations that change loan state.
pub struct Library {
    /// Catalog, in registration order
    items: Vec<Item>,
    /// Members, in registration order
    members: Vec<Member>,
    /// Loan ledger, in borrowing order
    transactions: Vec<Transaction>,
    /// Overdue fine rules
    policy: FinePolicy,
    /// Registered loan event observers
    observers: Vec<Box<dyn LoanObserver>>,
}

// Manual implementation of Debug for Library
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("items", &self.items)
            .field("members", &self.members)
            .field("transactions", &self.transactions)
            .field("policy", &self.policy)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new(FinePolicy::default())
    }
}

impl Library {
    /// Create an empty library applying `policy` to overdue loans
    #[must_use]
    pub fn new(policy: FinePolicy) -> Self {
        Self {
            items: Vec::new(),
            members: Vec::new(),
            transactions: Vec::new(),
            policy,
            observers: Vec::new(),
        }
    }

    /// Create an empty library from a loaded configuration
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.fines)
    }

    /// Fine rules applied by this library
    #[must_use]
    pub const fn policy(&self) -> &FinePolicy {
        &self.policy
    }

    /// Register an observer to be notified of loan events
    pub fn register_observer(&mut self, observer: Box<dyn LoanObserver>) {
        self.observers.push(observer);
    }

    /// Add an item to the catalog
    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = ItemId::new(self.items.len());
        debug!(%id, title = item.title(), "item added");
        self.items.push(item);
        id
    }

    /// Register a member
    pub fn add_member(&mut self, member: Member) -> MemberId {
        let id = MemberId::new(self.members.len());
        debug!(%id, number = member.number(), "member added");
        self.members.push(member);
        id
    }

    /// Look up an item
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    /// Look up a member
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.index())
    }

    /// Look up a ledger entry
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(id.index())
    }

    /// All items in catalog order
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter().enumerate().map(|(idx, item)| (ItemId::new(idx), item))
    }

    /// All members in registration order
    pub fn members(&self) -> impl Iterator<Item = (MemberId, &Member)> {
        self.members.iter().enumerate().map(|(idx, member)| (MemberId::new(idx), member))
    }

    /// Full loan ledger in borrowing order
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions whose item has not come back yet
    pub fn open_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.is_open())
    }

    /// Lend `item` to `member` starting `today` and open a transaction for it.
    ///
    /// A refused borrow changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownMember` / `LibraryError::UnknownItem` for
    /// unregistered handles and `LibraryError::AlreadyOnLoan` if the item is
    /// checked out
    pub fn borrow_item(
        &mut self,
        member: MemberId,
        item: ItemId,
        today: NaiveDate,
    ) -> Result<TransactionId> {
        let borrower =
            self.members.get_mut(member.index()).ok_or(LibraryError::UnknownMember(member))?;
        let lent = self.items.get_mut(item.index()).ok_or(LibraryError::UnknownItem(item))?;

        if let Err(err) = lent.borrow(member, today) {
            warn!(%member, %item, %err, "borrow refused");
            return Err(err);
        }
        borrower.record_borrow(item);

        let id = TransactionId::new(self.transactions.len());
        self.transactions.push(Transaction::open(id, member, item, today));

        self.notify(&LoanEvent::Borrowed { member, item, on: today });
        Ok(id)
    }

    /// Take `item` back from `member` on `today` and settle the open transaction.
    ///
    /// The item must be on loan, held by `member` and lent no later than
    /// `today`; otherwise nothing changes. The transaction closed is the most recent open one for this
    /// exact member and item.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotOnLoan`, `LibraryError::ReturnBeforeLoan` or
    /// `LibraryError::NotHeld` for refused returns, `LibraryError::NoOpenTransaction` if the item and member were
    /// updated but the ledger has nothing to close, and the lookup errors of
    /// [`borrow_item`](Self::borrow_item)
    pub fn return_item(
        &mut self,
        member: MemberId,
        item: ItemId,
        today: NaiveDate,
    ) -> Result<TransactionId> {
        let holder =
            self.members.get_mut(member.index()).ok_or(LibraryError::UnknownMember(member))?;
        let returned = self.items.get_mut(item.index()).ok_or(LibraryError::UnknownItem(item))?;

        if !returned.is_on_loan() {
            let err = LibraryError::NotOnLoan { title: returned.title().to_owned() };
            warn!(%member, %item, %err, "return refused");
            return Err(err);
        }
        if let Some(loaned) = returned.loan_start().filter(|loaned| today < *loaned) {
            let err = LibraryError::ReturnBeforeLoan {
                title: returned.title().to_owned(),
                loaned,
                returned: today,
            };
            warn!(%member, %item, %err, "return refused");
            return Err(err);
        }
        if !holder.record_return(item) {
            let err = LibraryError::NotHeld {
                title: returned.title().to_owned(),
                member: holder.number().to_owned(),
            };
            warn!(%member, %item, %err, "return refused");
            return Err(err);
        }
        returned.return_item()?;

        let open_loan =
            self.transactions.iter_mut().rev().find(|tx| tx.is_open() && tx.pairs(member, item));
        let Some(tx) = open_loan else {
            let err = LibraryError::NoOpenTransaction {
                title: returned.title().to_owned(),
                member: holder.number().to_owned(),
            };
            error!(%member, %item, %err, "loan state and ledger disagree");
            return Err(err);
        };
        let fine = tx.close(today, returned, &self.policy)?;
        let id = tx.id();

        self.notify(&LoanEvent::Returned { member, item, on: today, fine });
        Ok(id)
    }

    /// Items whose title contains `needle`, ignoring case, in catalog order
    pub fn find_items_by_title(&self, needle: &str) -> impl Iterator<Item = (ItemId, &Item)> {
        let needle = needle.to_lowercase();
        self.items().filter(move |(_, item)| item.title().to_lowercase().contains(&needle))
    }

    /// Items ordered by publication year; equal years keep catalog order
    #[must_use]
    pub fn items_sorted_by_year(&self) -> Vec<(ItemId, &Item)> {
        let mut sorted: Vec<_> = self.items().collect();
        sorted.sort_by_key(|(_, item)| item.year());
        sorted
    }

    /// Number of items per category
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            let count = counts.entry(item.category()).or_insert(0_usize);
            *count = count.saturating_add(1);
        }
        counts
    }

    /// Fines every member would owe if their held items came back `today`.
    ///
    /// Every member gets an entry, with a zero total when nothing is late.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownItem` if a held-set refers to an item that
    /// is not in the catalog
    pub fn current_overdue_fines(&self, today: NaiveDate) -> Result<Vec<MemberFines>> {
        self.members()
            .map(|(id, member)| -> Result<MemberFines> {
                let mut overdue = Vec::new();
                let mut total = 0_u64;
                for &item_id in member.held() {
                    let item = self.item(item_id).ok_or(LibraryError::UnknownItem(item_id))?;
                    if !item.is_on_loan() {
                        continue;
                    }
                    let fine = item.compute_fine(today, &self.policy)?;
                    if fine > 0 {
                        overdue.push(OverdueItem { item: item_id, fine });
                        total = total.saturating_add(fine);
                    }
                }
                Ok(MemberFines { member: id, overdue, total })
            })
            .collect()
    }

    /// Transactions recorded for `member`, in borrowing order
    pub fn transactions_for_member(&self, member: MemberId) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |tx| tx.member() == member)
    }

    /// Tell every observer about an applied event
    fn notify(&self, event: &LoanEvent) {
        for observer in &self.observers {
            observer.on_loan_event(event);
        }
    }
}
