use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Declares a string-backed identifier newtype.
///
/// Ids are opaque: fresh ones come from a v4 UUID, but any non-blank string
/// parses, so hand-picked ids like `todo` and ids written by older clients
/// load unchanged.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = crate::error::TasklaneError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(crate::error::TasklaneError::InvalidId(s.to_string()));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a task
    TaskId
);

string_id!(
    /// Unique identifier for a board column; doubles as the task status value
    ColumnId
);

string_id!(
    /// Unique identifier for a tag
    TagId
);
