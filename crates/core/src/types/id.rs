//! Short opaque entity identifiers.
//!
//! Every persisted entity is keyed by a [`ShortId`]: a fixed-length random
//! string drawn from an alphabet with the visually ambiguous characters
//! (`0 O 1 I l`) removed, safe to expose in URLs and API payloads without
//! leaking row counts the way serial keys do.
//!
//! Use the `define_id!` macro to create type-safe per-entity wrappers that
//! prevent accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShortId`] from untrusted input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortIdError {
    /// The input is not exactly [`ShortId::LENGTH`] characters.
    #[error("identifier must be exactly {expected} characters")]
    WrongLength {
        /// Required identifier length.
        expected: usize,
    },
    /// The input contains a character outside the identifier alphabet.
    #[error("identifier contains invalid character '{0}'")]
    InvalidChar(char),
}

/// A short opaque entity identifier.
///
/// Generated identifiers are random, non-sequential, and immutable once an
/// entity is persisted under them. Uniqueness is not guaranteed by
/// generation alone; the persistence layer enforces it and callers retry on
/// collision (see the backend's allocator).
///
/// ## Examples
///
/// ```
/// use bazaar_core::ShortId;
///
/// let id = ShortId::generate();
/// assert_eq!(id.as_str().len(), ShortId::LENGTH);
///
/// let parsed = ShortId::parse(id.as_str()).unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    /// Fixed length of every identifier.
    pub const LENGTH: usize = 12;

    /// Identifier alphabet: alphanumerics minus `0 O 1 I l`.
    pub const ALPHABET: &'static [u8] =
        b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    /// Generate a fresh random identifier.
    ///
    /// Collision-resistant but not collision-proof: 57^12 values make
    /// collisions rare, and the persistence layer is the authority on
    /// uniqueness.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // indexes are bounded by ALPHABET.len()
    pub fn generate() -> Self {
        use rand::Rng;

        let mut rng = rand::rng();
        let id = (0..Self::LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..Self::ALPHABET.len());
                char::from(Self::ALPHABET[idx])
            })
            .collect();
        Self(id)
    }

    /// Parse a `ShortId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly [`Self::LENGTH`]
    /// characters or contains a character outside [`Self::ALPHABET`].
    pub fn parse(s: &str) -> Result<Self, ShortIdError> {
        if s.len() != Self::LENGTH {
            return Err(ShortIdError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !c.is_ascii() || !Self::ALPHABET.contains(&(*c as u8)))
        {
            return Err(ShortIdError::InvalidChar(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShortId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShortId {
    type Err = ShortIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShortId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShortId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShortId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// Macro to define a type-safe entity ID wrapper.
///
/// Creates a newtype wrapper around [`ShortId`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `generate()`, `parse()`, `new()`, `as_str()`, `into_inner()`
/// - `From<ShortId>` and `From<$name> for ShortId` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShipmentId);
///
/// let warehouse_id = WarehouseId::generate();
/// let shipment_id = ShipmentId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shipment_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::types::id::ShortId);

        impl $name {
            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::ShortId::generate())
            }

            /// Parse an ID from untrusted input.
            ///
            /// # Errors
            ///
            /// Returns `ShortIdError` if the input has the wrong length or
            /// an invalid character.
            pub fn parse(s: &str) -> Result<Self, $crate::types::id::ShortIdError> {
                $crate::types::id::ShortId::parse(s).map(Self)
            }

            /// Wrap an existing identifier.
            #[must_use]
            pub const fn new(id: $crate::types::id::ShortId) -> Self {
                Self(id)
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Consumes the ID and returns the underlying `ShortId`.
            #[must_use]
            pub fn into_inner(self) -> $crate::types::id::ShortId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::id::ShortIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::types::id::ShortId> for $name {
            fn from(id: $crate::types::id::ShortId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::types::id::ShortId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <$crate::types::id::ShortId as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <$crate::types::id::ShortId as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id =
                    <$crate::types::id::ShortId as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <$crate::types::id::ShortId as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(
                    &self.0, buf,
                )
            }
        }
    };
}

// Define standard entity IDs
define_id!(AccountId);
define_id!(StoreId);
define_id!(CategoryId);
define_id!(ProductId);
define_id!(ImageId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_has_fixed_length() {
        let id = ShortId::generate();
        assert_eq!(id.as_str().len(), ShortId::LENGTH);
    }

    #[test]
    fn test_generate_stays_in_alphabet() {
        for _ in 0..50 {
            let id = ShortId::generate();
            assert!(
                id.as_str()
                    .bytes()
                    .all(|b| ShortId::ALPHABET.contains(&b)),
                "unexpected character in {id}"
            );
        }
    }

    #[test]
    fn test_generate_is_not_constant() {
        let a = ShortId::generate();
        let b = ShortId::generate();
        // 57^12 values; a repeat here means the generator is broken.
        assert_ne!(a, b);
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_chars() {
        for ambiguous in b"0O1Il" {
            assert!(!ShortId::ALPHABET.contains(ambiguous));
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = ShortId::generate();
        let parsed = ShortId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            ShortId::parse("abc"),
            Err(ShortIdError::WrongLength { expected: 12 })
        ));
        assert!(matches!(
            ShortId::parse("abcdefghjkmnp"),
            Err(ShortIdError::WrongLength { expected: 12 })
        ));
    }

    #[test]
    fn test_parse_invalid_char() {
        assert!(matches!(
            ShortId::parse("abcdefghjkm0"),
            Err(ShortIdError::InvalidChar('0'))
        ));
        assert!(matches!(
            ShortId::parse("abcdefghjkm!"),
            Err(ShortIdError::InvalidChar('!'))
        ));
    }

    #[test]
    fn test_display() {
        let id = ShortId::parse("abcdefghjkmn").unwrap();
        assert_eq!(format!("{id}"), "abcdefghjkmn");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = ShortId::parse("abcdefghjkmn").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abcdefghjkmn\"");

        let parsed: ShortId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_entity_ids_are_distinct_types() {
        let account_id = AccountId::parse("abcdefghjkmn").unwrap();
        let product_id = ProductId::parse("abcdefghjkmn").unwrap();
        // Same string value, different types; only the strings compare equal.
        assert_eq!(account_id.as_str(), product_id.as_str());
    }

    #[test]
    fn test_entity_id_generate() {
        let id = OrderId::generate();
        assert_eq!(id.as_str().len(), ShortId::LENGTH);
    }
}
