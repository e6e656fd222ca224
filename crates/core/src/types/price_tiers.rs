//! Bulk price tiers: purchase quantity mapped to unit price.
//!
//! A product's pricing is a set of `(units, price)` tiers. Externally the
//! set travels as an ordered list of `{"price": <number>, "units": <integer>}`
//! objects, ascending by units; internally it is a map keyed by units. In
//! storage the map is a JSON object whose keys are strings, so decoding must
//! compare units numerically, never lexically.
//!
//! Validation reports as many problems as one pass can find; the duplicate
//! check in particular is exhaustive and merges duplicate units and
//! duplicate prices into a single message when both occur.

use core::fmt;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A single pricing tier on the external wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceTier {
    /// Unit price at this tier, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Purchase quantity this tier applies to.
    pub units: u32,
}

/// Duplicate values found while validating a tier list.
///
/// Holds every duplicated units value and every duplicated price value, each
/// reported once, in order of first duplicated appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Units values that appear more than once.
    pub units: Vec<u32>,
    /// Price values that appear more than once.
    pub prices: Vec<Decimal>,
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = join(&self.units);
        let prices = join(&self.prices);
        match (self.units.is_empty(), self.prices.is_empty()) {
            (false, false) => write!(
                f,
                "Duplicate units found: {units} and duplicate prices found: {prices}"
            ),
            (false, true) => write!(f, "Duplicate units found: {units}"),
            (true, false) => write!(f, "Duplicate prices found: {prices}"),
            (true, true) => Ok(()),
        }
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors produced while decoding an external tier list.
///
/// These are user-facing input errors; the messages are part of the API
/// contract and are surfaced verbatim in validation responses.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PriceTierError {
    /// The input is not a JSON array.
    #[error("Prices must be a list of objects with price and units keys")]
    NotAList,
    /// A list element is not a JSON object.
    #[error("Each price must be an object with 'price' and 'units' keys")]
    NotAnObject,
    /// A list element is missing the price or units key.
    #[error("Each price object must contain 'price' and 'units' keys")]
    MissingKeys,
    /// A price value could not be parsed as a number.
    #[error("Price must be a valid float")]
    InvalidPrice,
    /// A units value could not be parsed as an integer.
    #[error("Units must be a valid integer")]
    InvalidUnits,
    /// Duplicate units and/or prices across the list.
    #[error("{0}")]
    Duplicates(DuplicateReport),
}

/// A validated set of pricing tiers, ordered by ascending units.
///
/// An empty set is valid and means "no pricing set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTierSet(BTreeMap<u32, Decimal>);

impl PriceTierSet {
    /// Create an empty tier set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Decode the external representation into a tier set.
    ///
    /// `None` (or JSON `null`) decodes to the empty set. Otherwise the input
    /// must be an array of objects, each carrying a `price` that parses as a
    /// float and a `units` that parses as an integer. After all elements
    /// parse, units and prices must each be pairwise distinct; every
    /// duplicate is collected before the error is raised.
    ///
    /// # Errors
    ///
    /// Returns the first structural or parse error encountered, or a
    /// [`PriceTierError::Duplicates`] naming every duplicated value.
    pub fn decode(input: Option<&Value>) -> Result<Self, PriceTierError> {
        let Some(value) = input else {
            return Ok(Self::new());
        };
        if value.is_null() {
            return Ok(Self::new());
        }

        let list = value.as_array().ok_or(PriceTierError::NotAList)?;

        let mut entries = Vec::with_capacity(list.len());
        for element in list {
            let object = element.as_object().ok_or(PriceTierError::NotAnObject)?;
            let (Some(price_raw), Some(units_raw)) = (object.get("price"), object.get("units"))
            else {
                return Err(PriceTierError::MissingKeys);
            };
            let price = parse_price(price_raw)?;
            let units = parse_units(units_raw)?;
            entries.push((units, price));
        }

        let dup_units = duplicates(entries.iter().map(|(units, _)| *units));
        let dup_prices = duplicates(entries.iter().map(|(_, price)| *price));
        if !dup_units.is_empty() || !dup_prices.is_empty() {
            return Err(PriceTierError::Duplicates(DuplicateReport {
                units: dup_units,
                prices: dup_prices,
            }));
        }

        Ok(Self(entries.into_iter().collect()))
    }

    /// Encode the tier set as the external ordered list, ascending by units.
    #[must_use]
    pub fn encode(&self) -> Vec<PriceTier> {
        self.0
            .iter()
            .map(|(&units, &price)| PriceTier { price, units })
            .collect()
    }

    /// Unit price for an exact tier, if one exists.
    #[must_use]
    pub fn price_for(&self, units: u32) -> Option<Decimal> {
        self.0.get(&units).copied()
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pricing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tiers in ascending units order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Decimal)> + '_ {
        self.0.iter().map(|(&units, &price)| (units, price))
    }
}

/// Storage shape: a JSON object with *string* keys (`{"5": "10.50"}`).
/// Keys are parsed back as integers on load so ordering stays numeric.
impl Serialize for PriceTierSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (units, price) in &self.0 {
            map.serialize_entry(&units.to_string(), &price.to_string())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PriceTierSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut tiers = BTreeMap::new();
        for (key, value) in raw {
            let units: u32 = key
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid units key: {key:?}")))?;
            let price = parse_price(&value)
                .map_err(|_| D::Error::custom(format!("invalid price for units {units}")))?;
            tiers.insert(units, price);
        }
        Ok(Self(tiers))
    }
}

fn parse_price(value: &Value) -> Result<Decimal, PriceTierError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Decimal::from(i))
            } else if let Some(f) = n.as_f64() {
                Decimal::try_from(f).map_err(|_| PriceTierError::InvalidPrice)
            } else {
                Err(PriceTierError::InvalidPrice)
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| PriceTierError::InvalidPrice),
        _ => Err(PriceTierError::InvalidPrice),
    }
}

fn parse_units(value: &Value) -> Result<u32, PriceTierError> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).map_err(|_| PriceTierError::InvalidUnits)
            } else if let Some(f) = n.as_f64() {
                // Exact integral floats (5.0) pass; fractional quantities do not.
                if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let units = f as u32; // bounds checked above
                    Ok(units)
                } else {
                    Err(PriceTierError::InvalidUnits)
                }
            } else {
                Err(PriceTierError::InvalidUnits)
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| PriceTierError::InvalidUnits),
        _ => Err(PriceTierError::InvalidUnits),
    }
}

/// Values appearing more than once, each reported once, in order of first
/// duplicated appearance.
fn duplicates<T: Copy + Eq + Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for value in values {
        if !seen.insert(value) && !dups.contains(&value) {
            dups.push(value);
        }
    }
    dups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_none_is_empty() {
        let tiers = PriceTierSet::decode(None).unwrap();
        assert!(tiers.is_empty());
        assert_eq!(tiers.encode(), vec![]);
    }

    #[test]
    fn test_decode_null_is_empty() {
        let tiers = PriceTierSet::decode(Some(&Value::Null)).unwrap();
        assert!(tiers.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let input = json!([
            {"price": 10.0, "units": 5},
            {"price": 20.5, "units": 10},
        ]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();
        let encoded = serde_json::to_value(tiers.encode()).unwrap();
        assert_eq!(encoded, input);
    }

    #[test]
    fn test_encode_sorts_numerically() {
        let input = json!([
            {"price": 5.0, "units": 100},
            {"price": 9.0, "units": 2},
            {"price": 7.0, "units": 30},
        ]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();
        let units: Vec<u32> = tiers.encode().iter().map(|t| t.units).collect();
        assert_eq!(units, vec![2, 30, 100]);
    }

    #[test]
    fn test_decode_rejects_non_list() {
        let err = PriceTierSet::decode(Some(&json!("invalid_data"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Prices must be a list of objects with price and units keys"
        );
    }

    #[test]
    fn test_decode_rejects_non_object_element() {
        let input = json!([{"price": 125.0, "units": 1}, [1, 125.0]]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Each price must be an object with 'price' and 'units' keys"
        );
    }

    #[test]
    fn test_decode_rejects_missing_keys() {
        let input = json!([{"price": 125.0}]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Each price object must contain 'price' and 'units' keys"
        );

        let input = json!([{"units": 1}]);
        assert_eq!(
            PriceTierSet::decode(Some(&input)).unwrap_err(),
            PriceTierError::MissingKeys
        );
    }

    #[test]
    fn test_decode_rejects_bad_price() {
        let input = json!([{"price": "hello", "units": 1}]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(err.to_string(), "Price must be a valid float");
    }

    #[test]
    fn test_decode_rejects_bad_units() {
        let input = json!([{"price": 1, "units": "hello"}]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(err.to_string(), "Units must be a valid integer");

        let input = json!([{"price": 1, "units": 2.5}]);
        assert_eq!(
            PriceTierSet::decode(Some(&input)).unwrap_err(),
            PriceTierError::InvalidUnits
        );

        let input = json!([{"price": 1, "units": -3}]);
        assert_eq!(
            PriceTierSet::decode(Some(&input)).unwrap_err(),
            PriceTierError::InvalidUnits
        );
    }

    #[test]
    fn test_decode_accepts_numeric_strings() {
        let input = json!([{"price": "12.50", "units": "4"}]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();
        assert_eq!(tiers.price_for(4), Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_duplicate_units_and_prices_combined_message() {
        let input = json!([
            {"price": 125, "units": 1},
            {"price": 130, "units": 1},
            {"price": 150, "units": 2},
            {"price": 150, "units": 4},
        ]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate units found: 1 and duplicate prices found: 150"
        );
    }

    #[test]
    fn test_duplicate_units_only_message() {
        let input = json!([
            {"price": 10, "units": 3},
            {"price": 20, "units": 3},
            {"price": 30, "units": 7},
            {"price": 40, "units": 7},
        ]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate units found: 3, 7");
    }

    #[test]
    fn test_duplicate_prices_only_message() {
        let input = json!([
            {"price": 150, "units": 2},
            {"price": 150, "units": 4},
        ]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate prices found: 150");
    }

    #[test]
    fn test_duplicates_each_reported_once() {
        let input = json!([
            {"price": 1, "units": 5},
            {"price": 2, "units": 5},
            {"price": 3, "units": 5},
        ]);
        let err = PriceTierSet::decode(Some(&input)).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate units found: 5");
    }

    #[test]
    fn test_price_for_exact_tier() {
        let input = json!([
            {"price": 10.0, "units": 5},
            {"price": 9.0, "units": 20},
        ]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();
        assert_eq!(tiers.price_for(5), Some(Decimal::new(100, 1)));
        assert_eq!(tiers.price_for(6), None);
    }

    #[test]
    fn test_storage_round_trip_with_string_keys() {
        let input = json!([
            {"price": 2.5, "units": 10},
            {"price": 100.0, "units": 2},
        ]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();

        let stored = serde_json::to_value(&tiers).unwrap();
        assert_eq!(stored, json!({"2": "100", "10": "2.5"}));

        let loaded: PriceTierSet = serde_json::from_value(stored).unwrap();
        assert_eq!(loaded, tiers);
    }

    #[test]
    fn test_storage_keys_compared_numerically() {
        // "10" sorts before "2" lexically; decoding must not.
        let loaded: PriceTierSet =
            serde_json::from_value(json!({"10": "2.5", "2": "100"})).unwrap();
        let units: Vec<u32> = loaded.encode().iter().map(|t| t.units).collect();
        assert_eq!(units, vec![2, 10]);
    }

    #[test]
    fn test_storage_rejects_bad_keys() {
        let result: Result<PriceTierSet, _> = serde_json::from_value(json!({"ten": "2.5"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_price_is_a_number() {
        let input = json!([{"price": 19.99, "units": 1}]);
        let tiers = PriceTierSet::decode(Some(&input)).unwrap();
        let encoded = serde_json::to_string(&tiers.encode()).unwrap();
        assert_eq!(encoded, r#"[{"price":19.99,"units":1}]"#);
    }
}
