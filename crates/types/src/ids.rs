//! Newtype wrappers for record identifiers.
//!
//! These prevent mixing up the different kinds of numeric ids (datasets,
//! templates, generation jobs, owners) at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// An ingested dataset.
    DatasetId
);
id_type!(
    /// A label template.
    TemplateId
);
id_type!(
    /// A generation job.
    JobId
);
id_type!(
    /// The owner of a record. Always explicit; the core never substitutes an
    /// administrative fallback account.
    OwnerId
);
