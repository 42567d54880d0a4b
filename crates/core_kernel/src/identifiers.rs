//! Strongly-typed identifiers for domain entities
//!
//! Identifiers are assigned by the store as 64-bit integers. Wrapping them in
//! newtypes prevents passing an event id where a user id is expected, while
//! ownership checks still compare the inner integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned identifier
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer
            pub const fn value(self) -> i64 {
                self.0
            }

            /// Returns the entity label used in error messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(UserId, "User");
define_id!(EventId, "Event");
define_id!(RegistrationId, "Registration");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_integer() {
        assert_eq!(EventId::new(42).to_string(), "42");
    }

    #[test]
    fn test_parsing() {
        let parsed: UserId = " 7 ".parse().unwrap();
        assert_eq!(parsed, UserId::new(7));
        assert!("seven".parse::<UserId>().is_err());
    }

    #[test]
    fn test_integer_conversion() {
        let id = RegistrationId::from(9);
        let back: i64 = id.into();
        assert_eq!(back, 9);
        assert_eq!(RegistrationId::label(), "Registration");
    }
}
