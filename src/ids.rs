use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a typed index into one of the library's arenas.
macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a position in the owning arena
            pub(crate) const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position in the owning arena
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle of an item registered in a [`Library`](crate::Library)
    ItemId,
    "item"
);

arena_id!(
    /// Handle of a member registered in a [`Library`](crate::Library)
    MemberId,
    "member"
);

arena_id!(
    /// Handle of a loan transaction recorded by a [`Library`](crate::Library)
    TransactionId,
    "tx"
);
