//! Decoders for the payload shapes WebUntis repeats across methods.
//!
//! Dates travel as `yyyyMMdd` integers and times as `HHmm` integers
//! without zero padding, so `800` is eight o'clock. Lesson references
//! arrive as arrays of `{"id": ..}` objects. All functions here are pure.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// An enumeration with a fixed set of wire literals.
pub trait WireEnum: Sized + Copy + 'static {
    /// Used in error messages.
    const KIND: &'static str;
    const VARIANTS: &'static [(&'static str, Self)];

    /// Case-insensitive lookup of a wire literal.
    fn from_wire(literal: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(literal))
            .map(|(_, variant)| *variant)
    }
}

/// Digits of a non-negative integer or of a numeric string.
fn digits(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Some(s.clone()),
        _ => None,
    }
}

/// Decode a `yyyyMMdd` date.
pub fn decode_date(value: &Value) -> Result<NaiveDate, DecodeError> {
    let text = digits(value).ok_or_else(|| DecodeError::InvalidDate(value.to_string()))?;
    if text.len() != 8 {
        return Err(DecodeError::InvalidDate(text));
    }
    let n: u32 = text
        .parse()
        .map_err(|_| DecodeError::InvalidDate(text.clone()))?;
    let (year, month, day) = (n / 10_000, n / 100 % 100, n % 100);
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(DecodeError::InvalidDate(text))
}

/// Encode a date the way the server expects it in request params.
pub fn encode_date(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Decode a 24-hour time sent as a 3 or 4 digit integer.
///
/// The four digit `HHmm` reading is tried first, then `Hmm`.
pub fn decode_ambiguous_time(value: &Value) -> Result<NaiveTime, DecodeError> {
    let text = digits(value).ok_or_else(|| DecodeError::InvalidTime(value.to_string()))?;
    parse_hhmm(&text)
        .or_else(|| parse_hmm(&text))
        .ok_or(DecodeError::InvalidTime(text))
}

fn parse_hhmm(text: &str) -> Option<NaiveTime> {
    if text.len() != 4 {
        return None;
    }
    hour_minute(&text[..2], &text[2..])
}

fn parse_hmm(text: &str) -> Option<NaiveTime> {
    if text.len() != 3 {
        return None;
    }
    hour_minute(&text[..1], &text[1..])
}

fn hour_minute(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// Decode an optional enum-coded field.
///
/// A missing (or `null`) field is `None`; it is never replaced by a
/// default variant.
pub fn decode_optional_enum<E: WireEnum>(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<E>, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(literal)) => E::from_wire(literal)
            .map(Some)
            .ok_or_else(|| DecodeError::UnknownVariant {
                kind: E::KIND,
                value: literal.clone(),
            }),
        Some(_) => Err(DecodeError::WrongType {
            field: field.to_string(),
            expected: "string",
        }),
    }
}

/// Collect the `id` of every object in an array, dropping duplicates.
pub fn collapse_id_array(value: &Value, field: &str) -> Result<HashSet<i64>, DecodeError> {
    let elements = value.as_array().ok_or_else(|| DecodeError::WrongType {
        field: field.to_string(),
        expected: "array",
    })?;
    elements
        .iter()
        .map(|element| {
            element
                .get("id")
                .ok_or_else(|| DecodeError::MissingField(format!("{field}[].id")))?
                .as_i64()
                .ok_or_else(|| DecodeError::WrongType {
                    field: format!("{field}[].id"),
                    expected: "integer",
                })
        })
        .collect()
}

pub fn as_object<'a>(value: &'a Value, what: &'static str) -> Result<&'a Map<String, Value>, DecodeError> {
    value.as_object().ok_or(DecodeError::NotAnObject(what))
}

pub fn as_array<'a>(value: &'a Value, what: &'static str) -> Result<&'a Vec<Value>, DecodeError> {
    value.as_array().ok_or_else(|| DecodeError::WrongType {
        field: what.to_string(),
        expected: "array",
    })
}

pub fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, DecodeError> {
    object
        .get(field)
        .ok_or_else(|| DecodeError::MissingField(field.to_string()))
}

fn wrong_type(field: &str, expected: &'static str) -> DecodeError {
    DecodeError::WrongType {
        field: field.to_string(),
        expected,
    }
}

pub fn required_str(object: &Map<String, Value>, field: &str) -> Result<String, DecodeError> {
    required(object, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(field, "string"))
}

pub fn required_i64(object: &Map<String, Value>, field: &str) -> Result<i64, DecodeError> {
    required(object, field)?
        .as_i64()
        .ok_or_else(|| wrong_type(field, "integer"))
}

pub fn required_bool(object: &Map<String, Value>, field: &str) -> Result<bool, DecodeError> {
    required(object, field)?
        .as_bool()
        .ok_or_else(|| wrong_type(field, "boolean"))
}

pub fn required_array<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, DecodeError> {
    required(object, field)?
        .as_array()
        .ok_or_else(|| wrong_type(field, "array"))
}

pub fn required_date(object: &Map<String, Value>, field: &str) -> Result<NaiveDate, DecodeError> {
    decode_date(required(object, field)?)
}

pub fn required_time(object: &Map<String, Value>, field: &str) -> Result<NaiveTime, DecodeError> {
    decode_ambiguous_time(required(object, field)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Shade {
        Light,
        Dark,
    }

    impl WireEnum for Shade {
        const KIND: &'static str = "shade";
        const VARIANTS: &'static [(&'static str, Self)] = &[("light", Shade::Light), ("dark", Shade::Dark)];
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn date_from_integer_and_string() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(decode_date(&json!(20240131)).unwrap(), expected);
        assert_eq!(decode_date(&json!("20240131")).unwrap(), expected);
    }

    #[test]
    fn date_rejects_wrong_length_and_impossible_days() {
        assert!(matches!(decode_date(&json!(2024131)), Err(DecodeError::InvalidDate(_))));
        assert!(matches!(decode_date(&json!(20240230)), Err(DecodeError::InvalidDate(_))));
        assert!(matches!(decode_date(&json!(20241301)), Err(DecodeError::InvalidDate(_))));
        assert!(matches!(decode_date(&json!(-20240101)), Err(DecodeError::InvalidDate(_))));
        assert!(matches!(decode_date(&json!("2024-01-31")), Err(DecodeError::InvalidDate(_))));
    }

    #[test]
    fn date_range_endpoints() {
        let first = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(decode_date(&json!(19000101)).unwrap(), first);
        assert_eq!(decode_date(&json!(99991231)).unwrap(), last);
        assert_eq!(encode_date(last), 99991231);
    }

    #[test]
    fn encode_date_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        assert_eq!(encode_date(date), 20230904);
    }

    #[test]
    fn ambiguous_time_readings() {
        assert_eq!(decode_ambiguous_time(&json!(800)).unwrap(), time(8, 0));
        assert_eq!(decode_ambiguous_time(&json!(745)).unwrap(), time(7, 45));
        assert_eq!(decode_ambiguous_time(&json!(1330)).unwrap(), time(13, 30));
        assert_eq!(decode_ambiguous_time(&json!(2359)).unwrap(), time(23, 59));
        assert_eq!(decode_ambiguous_time(&json!("0800")).unwrap(), time(8, 0));
    }

    #[test]
    fn ambiguous_time_failures() {
        assert!(matches!(decode_ambiguous_time(&json!(960)), Err(DecodeError::InvalidTime(_))));
        assert!(matches!(decode_ambiguous_time(&json!(2460)), Err(DecodeError::InvalidTime(_))));
        assert!(matches!(decode_ambiguous_time(&json!(2500)), Err(DecodeError::InvalidTime(_))));
        assert!(matches!(decode_ambiguous_time(&json!(45)), Err(DecodeError::InvalidTime(_))));
        assert!(matches!(decode_ambiguous_time(&json!(12345)), Err(DecodeError::InvalidTime(_))));
        assert!(matches!(decode_ambiguous_time(&json!(8.5)), Err(DecodeError::InvalidTime(_))));
    }

    #[test]
    fn optional_enum_absent_is_none() {
        let object = json!({"other": 1});
        let decoded: Option<Shade> = decode_optional_enum(object.as_object().unwrap(), "shade").unwrap();
        assert_eq!(decoded, None);

        let object = json!({"shade": null});
        let decoded: Option<Shade> = decode_optional_enum(object.as_object().unwrap(), "shade").unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn optional_enum_matches_case_insensitively() {
        for literal in ["dark", "DARK", "Dark"] {
            let object = json!({ "shade": literal });
            let decoded: Option<Shade> = decode_optional_enum(object.as_object().unwrap(), "shade").unwrap();
            assert_eq!(decoded, Some(Shade::Dark));
        }
    }

    #[test]
    fn optional_enum_unknown_literal_fails() {
        let object = json!({"shade": "grey"});
        let err = decode_optional_enum::<Shade>(object.as_object().unwrap(), "shade").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownVariant {
                kind: "shade",
                value: "grey".to_string()
            }
        );
    }

    #[test]
    fn optional_enum_non_string_fails() {
        let object = json!({"shade": 3});
        let err = decode_optional_enum::<Shade>(object.as_object().unwrap(), "shade").unwrap_err();
        assert!(matches!(err, DecodeError::WrongType { .. }));
    }

    #[test]
    fn id_array_is_deduplicated() {
        let ids = collapse_id_array(&json!([{"id": 1}, {"id": 2}, {"id": 1}]), "kl").unwrap();
        assert_eq!(ids, HashSet::from([1, 2]));
    }

    #[test]
    fn id_array_ignores_extra_fields() {
        let ids = collapse_id_array(&json!([{"id": 7, "name": "R101", "orgid": 3}]), "ro").unwrap();
        assert_eq!(ids, HashSet::from([7]));
        assert!(collapse_id_array(&json!([]), "ro").unwrap().is_empty());
    }

    #[test]
    fn id_array_shape_errors() {
        assert!(matches!(collapse_id_array(&json!({"id": 1}), "te"), Err(DecodeError::WrongType { .. })));
        assert!(matches!(collapse_id_array(&json!([{"name": "x"}]), "te"), Err(DecodeError::MissingField(f)) if f == "te[].id"));
        assert!(matches!(collapse_id_array(&json!([{"id": "1"}]), "te"), Err(DecodeError::WrongType { .. })));
    }

    #[test]
    fn required_accessors_name_the_field() {
        let object = json!({"name": "5a", "active": "yes"});
        let object = object.as_object().unwrap();
        assert_eq!(required_str(object, "name").unwrap(), "5a");
        assert_eq!(required_i64(object, "id").unwrap_err(), DecodeError::MissingField("id".to_string()));
        assert_eq!(
            required_bool(object, "active").unwrap_err(),
            DecodeError::WrongType {
                field: "active".to_string(),
                expected: "boolean"
            }
        );
    }

    proptest! {
        #[test]
        // 1900-01-01 through 9999-12-31.
        fn date_round_trips(days in 0u64..=2_958_463) {
            let start = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
            let date = start.checked_add_days(chrono::Days::new(days)).unwrap();
            let encoded = encode_date(date);
            prop_assert_eq!(decode_date(&json!(encoded)).unwrap(), date);
            prop_assert_eq!(encoded.to_string().len(), 8);
        }

        #[test]
        fn every_minute_decodes(h in 0u32..24, m in 0u32..60) {
            let encoded = h * 100 + m;
            prop_assume!(encoded >= 100);
            prop_assert_eq!(decode_ambiguous_time(&json!(encoded)).unwrap(), time(h, m));
        }
    }
}
