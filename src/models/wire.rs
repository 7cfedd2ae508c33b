//! Lenient decoders for the backend's JSON encoding.
//!
//! Dates may arrive as Parse date objects (`{"__type": "Date", "iso": ...}`)
//! or bare ISO-8601 strings. Amounts may be numbers or numeric strings.
//! Absent, `null` or malformed values decode to defaults instead of failing,
//! so one bad record never costs the rest of a payload.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse an ISO-8601 timestamp, accepting a bare date as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn decimal_from_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn amount_from_value(value: Value) -> Option<Decimal> {
    let parsed = match &value {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(value = %value, "Ignoring malformed amount");
    }
    parsed
}

/// Malformed amounts decode as zero.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(value).unwrap_or_default())
}

pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(value))
}

/// `null` counts as `false`; so does anything that is not a boolean or a
/// `"true"`/`"false"` string.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => true,
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => false,
        other => {
            tracing::warn!(value = %other, "Ignoring malformed flag");
            false
        }
    };
    Ok(flag)
}

fn quantity_from_value(value: Value) -> Option<i64> {
    let parsed = match &value {
        Value::Null => return None,
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64().filter(|f| f.is_finite())?;
            if f.fract() != 0.0 {
                tracing::warn!(value = %n, "Truncating fractional quantity");
            }
            Some(f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(value = %value, "Ignoring malformed quantity");
    }
    parsed
}

/// `null` counts as zero. Fractional quantities truncate toward zero;
/// anything unreadable counts as zero.
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(value).unwrap_or(0))
}

pub fn deserialize_optional_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(value))
}

/// Unreadable dates decode as `None`, which keeps the sale out of every
/// date window instead of failing the whole payload.
pub fn deserialize_parse_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let iso = match &value {
        Value::Null => return Ok(None),
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => match map.get("iso") {
            None | Some(Value::Null) => return Ok(None),
            Some(iso) => iso.as_str(),
        },
        _ => None,
    };
    let parsed = iso.and_then(parse_timestamp);
    if parsed.is_none() {
        tracing::warn!(value = %value, "Ignoring malformed date");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "deserialize_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "deserialize_parse_date")]
        date: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        flag: bool,
        #[serde(default, deserialize_with = "deserialize_quantity")]
        qty: i64,
    }

    #[test]
    fn parse_date_object_and_plain_string() {
        let obj: Fields = serde_json::from_str(
            r#"{"date": {"__type": "Date", "iso": "2024-01-15T13:45:00.000Z"}}"#,
        )
        .unwrap();
        let plain: Fields = serde_json::from_str(r#"{"date": "2024-01-15T13:45:00Z"}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 0).unwrap();
        assert_eq!(obj.date, Some(expected));
        assert_eq!(plain.date, Some(expected));
    }

    #[test]
    fn missing_and_null_fields_use_defaults() {
        let p: Fields =
            serde_json::from_str(r#"{"amount": null, "date": null, "flag": null}"#).unwrap();
        assert_eq!(p.amount, Decimal::ZERO);
        assert_eq!(p.date, None);
        assert!(!p.flag);
        assert_eq!(p.qty, 0);
    }

    #[test]
    fn amounts_from_numbers_and_strings() {
        let num: Fields = serde_json::from_str(r#"{"amount": 19.9}"#).unwrap();
        let text: Fields = serde_json::from_str(r#"{"amount": "19.90"}"#).unwrap();
        assert_eq!(num.amount, Decimal::new(199, 1));
        assert_eq!(text.amount, Decimal::new(1990, 2));
    }

    #[test]
    fn float_quantities_truncate() {
        let whole: Fields = serde_json::from_str(r#"{"qty": 3.0}"#).unwrap();
        let fractional: Fields = serde_json::from_str(r#"{"qty": 2.5}"#).unwrap();
        let text: Fields = serde_json::from_str(r#"{"qty": " 4 "}"#).unwrap();
        assert_eq!(whole.qty, 3);
        assert_eq!(fractional.qty, 2);
        assert_eq!(text.qty, 4);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let p: Fields = serde_json::from_str(
            r#"{"amount": "abc", "date": {"__type": "Date", "iso": "invalid"},
                "flag": 3, "qty": "many"}"#,
        )
        .unwrap();
        assert_eq!(p.amount, Decimal::ZERO);
        assert_eq!(p.date, None);
        assert!(!p.flag);
        assert_eq!(p.qty, 0);

        let odd: Fields = serde_json::from_str(r#"{"amount": [1], "date": 17, "flag": "true"}"#)
            .unwrap();
        assert_eq!(odd.amount, Decimal::ZERO);
        assert_eq!(odd.date, None);
        assert!(odd.flag);
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let ts = parse_timestamp("2024-02-29").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert!(parse_timestamp("not a date").is_none());
    }
}
