//! Catalog seeding: validated registration of items and members, plus the
//! demonstration catalog used by the binary.

use thiserror::Error;
use tracing::info;

use crate::{
    config::LibraryConfig,
    ids::{ItemId, MemberId},
    item::{Item, ItemKind},
    library::Library,
    member::Member,
};

/// Reasons a seed record is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// Blank item title
    #[error("item title must not be empty")]
    EmptyTitle,

    /// Publication year zero
    #[error("'{title}' has invalid publication year {year}")]
    InvalidYear {
        /// Title of the rejected item
        title: String,
        /// The rejected year
        year: u32,
    },

    /// Blank membership number
    #[error("member number must not be empty")]
    EmptyMemberNumber,

    /// Blank member name
    #[error("member {number} has no name")]
    EmptyMemberName {
        /// Membership number of the rejected record
        number: String,
    },

    /// Membership number already registered in the library
    #[error("member number {0} is already registered")]
    DuplicateMember(String),
}

/// Item record supplied by a seeding source
#[derive(Debug, Clone, PartialEq)]
pub struct SeedItem {
    /// Title, must not be blank
    pub title: String,
    /// Publishing house
    pub publisher: String,
    /// Year of publication, must be positive
    pub year: u32,
    /// Category payload
    pub kind: ItemKind,
}

impl SeedItem {
    /// Build a record from borrowed fields
    #[must_use]
    pub fn new(title: &str, publisher: &str, year: u32, kind: ItemKind) -> Self {
        Self { title: title.to_string(), publisher: publisher.to_string(), year, kind }
    }

    /// Check the record and turn it into a catalog item
    ///
    /// # Errors
    ///
    /// Returns `SeedError::EmptyTitle` for a blank title and
    /// `SeedError::InvalidYear` for year zero
    pub fn into_item(self) -> Result<Item, SeedError> {
        if self.title.trim().is_empty() {
            return Err(SeedError::EmptyTitle);
        }
        if self.year == 0 {
            return Err(SeedError::InvalidYear { title: self.title, year: self.year });
        }
        Ok(Item::new(self.title, self.publisher, self.year, self.kind))
    }
}

/// Member record supplied by a seeding source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMember {
    /// Membership number, unique per library
    pub number: String,
    /// Display name
    pub name: String,
}

impl SeedMember {
    /// Build a record from borrowed fields
    #[must_use]
    pub fn new(number: &str, name: &str) -> Self {
        Self { number: number.to_string(), name: name.to_string() }
    }
}

/// Validate and add one item
///
/// # Errors
///
/// See [`SeedItem::into_item`]
pub fn add_item(library: &mut Library, seed: SeedItem) -> Result<ItemId, SeedError> {
    Ok(library.add_item(seed.into_item()?))
}

/// Validate and register one member; member numbers must be unique
///
/// # Errors
///
/// Returns `SeedError::EmptyMemberNumber`, `SeedError::EmptyMemberName` or
/// `SeedError::DuplicateMember`
pub fn add_member(library: &mut Library, seed: SeedMember) -> Result<MemberId, SeedError> {
    let SeedMember { number, name } = seed;
    if number.trim().is_empty() {
        return Err(SeedError::EmptyMemberNumber);
    }
    if name.trim().is_empty() {
        return Err(SeedError::EmptyMemberName { number });
    }
    if library.members().any(|(_, member)| member.number() == number) {
        return Err(SeedError::DuplicateMember(number));
    }
    Ok(library.add_member(Member::new(number, name)))
}

/// Handles of everything a seeding run registered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeded {
    /// Registered items, in input order
    pub items: Vec<ItemId>,
    /// Registered members, in input order
    pub members: Vec<MemberId>,
}

/// Register a batch of items and members, stopping at the first invalid record
///
/// # Errors
///
/// Returns the first [`SeedError`]; records before it stay registered
pub fn seed(
    library: &mut Library,
    items: impl IntoIterator<Item = SeedItem>,
    members: impl IntoIterator<Item = SeedMember>,
) -> Result<Seeded, SeedError> {
    let mut seeded = Seeded::default();
    for item in items {
        seeded.items.push(add_item(library, item)?);
    }
    for member in members {
        seeded.members.push(add_member(library, member)?);
    }
    info!(items = seeded.items.len(), members = seeded.members.len(), "catalog seeded");
    Ok(seeded)
}

/// The demonstration catalog: four items of every category and two members
#[derive(Debug)]
pub struct DemoCatalog {
    /// The seeded library
    pub library: Library,
    /// "Laskar Pelangi" (Book, 2005)
    pub laskar_pelangi: ItemId,
    /// "National Geographic" (Magazine, 2023)
    pub national_geographic: ItemId,
    /// "Jurnal Teknologi Informasi" (Journal, 2022)
    pub it_journal: ItemId,
    /// "Ebook Pemrograman Java" (Digital, 2023)
    pub java_ebook: ItemId,
    /// Member 42623002, Raffi Fadlika
    pub raffi: MemberId,
    /// Member 42623024, Asti Hafsari
    pub asti: MemberId,
}

impl DemoCatalog {
    /// Build the demonstration catalog under `config`
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] if a built-in record fails validation
    pub fn build(config: &LibraryConfig) -> Result<Self, SeedError> {
        let mut library = Library::from_config(config);

        let laskar_pelangi = add_item(
            &mut library,
            SeedItem::new(
                "Laskar Pelangi",
                "Bentang Pustaka",
                2005,
                ItemKind::Book { author: "Andrea Hirata".to_string(), pages: 372 },
            ),
        )?;
        let national_geographic = add_item(
            &mut library,
            SeedItem::new(
                "National Geographic",
                "Gramedia",
                2023,
                ItemKind::Magazine {
                    edition: "July".to_string(),
                    frequency: "Monthly".to_string(),
                },
            ),
        )?;
        let it_journal = add_item(
            &mut library,
            SeedItem::new(
                "Jurnal Teknologi Informasi",
                "ITB Press",
                2022,
                ItemKind::Journal { field: "Informatics".to_string(), impact_factor: 4.5 },
            ),
        )?;
        let java_ebook = add_item(
            &mut library,
            SeedItem::new(
                "Ebook Pemrograman Java",
                "Penerbit Online",
                2023,
                ItemKind::Digital { format: "PDF".to_string(), size_kb: 5210 },
            ),
        )?;

        let raffi = add_member(&mut library, SeedMember::new("42623002", "Raffi Fadlika"))?;
        let asti = add_member(&mut library, SeedMember::new("42623024", "Asti Hafsari"))?;

        Ok(Self {
            library,
            laskar_pelangi,
            national_geographic,
            it_journal,
            java_ebook,
            raffi,
            asti,
        })
    }
}
