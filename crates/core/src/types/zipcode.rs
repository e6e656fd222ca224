//! Postal (ZIP) code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input string is empty.
    #[error("zip code cannot be empty")]
    Empty,
    /// The input is not a 5-digit or ZIP+4 code.
    #[error("zip code must be 5 digits, optionally followed by a 4-digit extension")]
    InvalidFormat,
}

/// A US-style postal code: `12345` or `12345-6789`.
///
/// ## Examples
///
/// ```
/// use bazaar_core::ZipCode;
///
/// assert!(ZipCode::parse("12345").is_ok());
/// assert!(ZipCode::parse("12345-6789").is_ok());
/// assert!(ZipCode::parse("1234").is_err());
/// assert!(ZipCode::parse("12345-67").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Parse a `ZipCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not `NNNNN` /
    /// `NNNNN-NNNN`.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        if s.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        let (base, ext) = match s.split_once('-') {
            Some((base, ext)) => (base, Some(ext)),
            None => (s, None),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if base.len() != 5 || !all_digits(base) {
            return Err(ZipCodeError::InvalidFormat);
        }

        if let Some(ext) = ext
            && (ext.len() != 4 || !all_digits(ext))
        {
            return Err(ZipCodeError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the zip code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the 5-digit base portion.
    #[must_use]
    pub fn base(&self) -> &str {
        self.0.split('-').next().unwrap_or("")
    }

    /// Consumes the `ZipCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ZipCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ZipCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ZipCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_five_digit() {
        let zip = ZipCode::parse("12345").unwrap();
        assert_eq!(zip.as_str(), "12345");
        assert_eq!(zip.base(), "12345");
    }

    #[test]
    fn test_parse_zip_plus_four() {
        let zip = ZipCode::parse("12345-6789").unwrap();
        assert_eq!(zip.as_str(), "12345-6789");
        assert_eq!(zip.base(), "12345");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(ZipCode::parse(""), Err(ZipCodeError::Empty)));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["1234", "123456", "12a45", "12345-67", "12345-67890", "12345-abcd"] {
            assert!(
                matches!(ZipCode::parse(bad), Err(ZipCodeError::InvalidFormat)),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let zip = ZipCode::parse("12345-6789").unwrap();
        let json = serde_json::to_string(&zip).unwrap();
        assert_eq!(json, "\"12345-6789\"");

        let parsed: ZipCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, zip);
    }
}
