use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::FinePolicy,
    error::{LibraryError, Result},
    ids::MemberId,
};

/// Catalog category of an item, ordered by label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Printed book
    Book,
    /// Downloadable resource
    DigitalItem,
    /// Scholarly journal
    Journal,
    /// Periodical magazine
    Magazine,
}

impl Category {
    /// Human-readable label used in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::DigitalItem => "Digital Item",
            Self::Journal => "Journal",
            Self::Magazine => "Magazine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category-specific descriptive fields of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A book with its author and page count
    Book {
        /// Author name
        author: String,
        /// Page count
        pages: u32,
    },
    /// A magazine issue
    Magazine {
        /// Issue label
        edition: String,
        /// Publication frequency
        frequency: String,
    },
    /// A journal volume
    Journal {
        /// Field of study
        field: String,
        /// Journal impact factor
        impact_factor: f64,
    },
    /// A digital file, size in kilobytes
    Digital {
        /// File format
        format: String,
        /// File size in kilobytes
        size_kb: u64,
    },
}

impl ItemKind {
    /// The category this payload belongs to
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Book { .. } => Category::Book,
            Self::Magazine { .. } => Category::Magazine,
            Self::Journal { .. } => Category::Journal,
            Self::Digital { .. } => Category::DigitalItem,
        }
    }
}

/// Loan state of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanState {
    /// On the shelf
    #[default]
    Available,
    /// Checked out to `borrower` since `since`
    OnLoan {
        /// Member holding the item
        borrower: MemberId,
        /// First day of the loan
        since: NaiveDate,
    },
}

impl LoanState {
    /// Short status shown next to an item in reports
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OnLoan { .. } => "On loan",
        }
    }
}

/// One lendable unit of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Title as shown in the catalog
    title: String,
    /// Publishing house
    publisher: String,
    /// Year of publication
    year: u32,
    /// Category payload
    kind: ItemKind,
    /// Current loan state
    state: LoanState,
    /// Start of the most recent loan, kept after the item comes back
    last_loan_start: Option<NaiveDate>,
}

impl Item {
    /// Create an item that is available for loan
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        publisher: impl Into<String>,
        year: u32,
        kind: ItemKind,
    ) -> Self {
        Self {
            title: title.into(),
            publisher: publisher.into(),
            year,
            kind,
            state: LoanState::Available,
            last_loan_start: None,
        }
    }

    /// Title as shown in the catalog
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publishing house
    #[must_use]
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Year of publication
    #[must_use]
    pub const fn year(&self) -> u32 {
        self.year
    }

    /// Category payload
    #[must_use]
    pub const fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Current loan state
    #[must_use]
    pub const fn state(&self) -> &LoanState {
        &self.state
    }

    /// Catalog category derived from the payload
    #[must_use]
    pub const fn category(&self) -> Category {
        self.kind.category()
    }

    /// Whether the item is checked out
    #[must_use]
    pub const fn is_on_loan(&self) -> bool {
        matches!(self.state, LoanState::OnLoan { .. })
    }

    /// Member currently holding the item
    #[must_use]
    pub const fn borrower(&self) -> Option<MemberId> {
        match self.state {
            LoanState::OnLoan { borrower, .. } => Some(borrower),
            LoanState::Available => None,
        }
    }

    /// Start of the running loan, or of the last one if the item is back on the shelf
    #[must_use]
    pub const fn loan_start(&self) -> Option<NaiveDate> {
        match self.state {
            LoanState::OnLoan { since, .. } => Some(since),
            LoanState::Available => self.last_loan_start,
        }
    }

    /// Lend the item to `borrower` starting `today`.
    ///
    /// Only the item's own state changes; the caller records the loan on the
    /// member side.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::AlreadyOnLoan` if the item is checked out
    pub fn borrow(&mut self, borrower: MemberId, today: NaiveDate) -> Result<()> {
        if self.is_on_loan() {
            return Err(LibraryError::AlreadyOnLoan { title: self.title.clone() });
        }
        self.state = LoanState::OnLoan { borrower, since: today };
        self.last_loan_start = Some(today);
        Ok(())
    }

    /// Put the item back on the shelf
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotOnLoan` if the item is not checked out
    pub fn return_item(&mut self) -> Result<()> {
        if !self.is_on_loan() {
            return Err(LibraryError::NotOnLoan { title: self.title.clone() });
        }
        self.state = LoanState::Available;
        Ok(())
    }

    /// Fine owed on the running (or last) loan if it were settled on `as_of`
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NeverBorrowed` if the item has no loan to assess
    pub fn compute_fine(&self, as_of: NaiveDate, policy: &FinePolicy) -> Result<u64> {
        let start = self
            .loan_start()
            .ok_or_else(|| LibraryError::NeverBorrowed { title: self.title.clone() })?;
        Ok(policy.fine_for(start, as_of))
    }

    /// One-line description including the category fields
    #[must_use]
    pub fn detail(&self) -> String {
        let Self { title, publisher, year, .. } = self;
        match &self.kind {
            ItemKind::Book { author, pages } => {
                format!("Book: {title} by {author} ({year}), Publisher: {publisher}, Pages: {pages}")
            }
            ItemKind::Magazine { edition, frequency } => {
                format!(
                    "Magazine: {title}, Edition: {edition}, Publisher: {publisher}, Frequency: {frequency}"
                )
            }
            ItemKind::Journal { field, impact_factor } => {
                format!(
                    "Journal: {title}, Field: {field} ({year}), Publisher: {publisher}, Impact Factor: {impact_factor:.2}"
                )
            }
            ItemKind::Digital { format, size_kb } => {
                format!("Digital Item: {title} ({year}), Format: {format}, Size: {size_kb} KB")
            }
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.state.label())
    }
}
