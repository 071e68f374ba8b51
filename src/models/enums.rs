use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// The original user model was an abstract base with one subclass per
// role; behavior never differed beyond the tag, so a plain enum carries
// the whole distinction.
str_enum!(UserRole {
    Doctor => "doctor",
    Assistant => "assistant",
});

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(UserRole::from_str("doctor").unwrap(), UserRole::Doctor);
        assert_eq!(UserRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::from_str("nurse").is_err());
    }
}
