//! Fixed-point money helpers
//!
//! Amounts are `Decimal` in memory, integer cents at rest, and JSON numbers
//! rounded to two places on the wire. Use with `#[serde(with = "crate::money")]`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Number of decimal places carried by every stored amount
pub const CENT_SCALE: u32 = 2;

/// Validate a user-supplied amount: strictly positive, at most cent precision,
/// and small enough that its cent value fits the storage column.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation(field, "must be greater than zero"));
    }
    if amount.round_dp(CENT_SCALE) != amount {
        return Err(Error::validation(
            field,
            "must not have more than two decimal places",
        ));
    }
    if checked_cents(amount).is_none() {
        return Err(Error::validation(field, "is too large"));
    }
    Ok(amount.round_dp(CENT_SCALE))
}

fn checked_cents(amount: Decimal) -> Option<i64> {
    amount
        .round_dp(CENT_SCALE)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Convert a cent-precision amount to integer cents for storage
pub fn to_cents(amount: Decimal) -> Result<i64> {
    checked_cents(amount)
        .ok_or_else(|| Error::InvalidData(format!("Amount out of range: {}", amount)))
}

/// Convert stored integer cents back to a Decimal
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CENT_SCALE)
}

/// Round to cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100`, rounded to two places; zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_cents(part / whole * Decimal::ONE_HUNDRED)
}

pub fn serialize<S>(amount: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round_cents(*amount).to_f64().unwrap_or_default())
}

/// An amount that serializes like a `#[serde(with = "money")]` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(pub Decimal);

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

/// Serialize a map of amounts, keeping the map's key order
pub fn serialize_map<K, S>(
    map: &BTreeMap<K, Decimal>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    K: Serialize,
    S: Serializer,
{
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, amount) in map {
        out.serialize_entry(key, &Amount(*amount))?;
    }
    out.end()
}

pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("amount", dec!(12.50)).unwrap(), dec!(12.50));
        assert!(validate_amount("amount", Decimal::ZERO).is_err());
        assert!(validate_amount("amount", dec!(-3)).is_err());

        let err = validate_amount("amount", dec!(1.005)).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_validate_amount_rejects_unstorable_values() {
        // Cents would overflow the Decimal multiplication itself
        let err = validate_amount("amount", Decimal::from_i128_with_scale(10_i128.pow(28), 0))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "amount"));

        // Cents exceed i64
        let err = validate_amount("amount", Decimal::from_i128_with_scale(10_i128.pow(20), 0))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "amount"));

        let max = Decimal::new(i64::MAX, CENT_SCALE);
        assert_eq!(validate_amount("amount", max).unwrap(), max);
    }

    #[test]
    fn test_to_cents_out_of_range_is_an_error() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        assert!(matches!(to_cents(huge), Err(Error::InvalidData(_))));
        assert_eq!(to_cents(Decimal::new(i64::MAX, CENT_SCALE)).unwrap(), i64::MAX);
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "crate::money")]
            amount: Decimal,
        }

        let w: Wrapper = serde_json::from_str(r#"{"amount": 19.99}"#).unwrap();
        assert_eq!(w.amount, dec!(19.99));
        let w: Wrapper = serde_json::from_str(r#"{"amount": "250"}"#).unwrap();
        assert_eq!(w.amount, dec!(250));
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(to_cents(dec!(19.99)).unwrap(), 1999);
        assert_eq!(to_cents(dec!(350)).unwrap(), 35000);
        assert_eq!(from_cents(1999), dec!(19.99));
        assert_eq!(from_cents(0), Decimal::ZERO);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(350), dec!(300)), dec!(116.67));
        assert_eq!(percentage(dec!(300), dec!(300)), dec!(100));
        assert_eq!(percentage(dec!(10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn test_serialize_two_places() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(with = "crate::money")]
            amount: Decimal,
        }

        let json = serde_json::to_value(Wrapper {
            amount: dec!(116.666),
        })
        .unwrap();
        assert_eq!(json["amount"], 116.67);
    }
}
