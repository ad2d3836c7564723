//! Strongly-typed wrappers for names
//!
//! Card names and player names are both strings, but they are never
//! interchangeable, so each gets its own newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

name_type!(
    /// Card name (e.g. "Llanowar Elves")
    CardName
);

name_type!(
    /// Player name (e.g. "Alice")
    PlayerName
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name() {
        let name = CardName::new("Lightning Bolt");
        assert_eq!(name.as_str(), "Lightning Bolt");
        assert_eq!(name.to_string(), "Lightning Bolt");
    }

    #[test]
    fn test_player_name_serializes_as_string() {
        let name = PlayerName::from("Alice");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Alice\"");
    }
}
