//! Pre-validation pass that canonicalizes timestamp-like fields.
//!
//! Clients send timestamps in whatever ISO-8601 shape their tooling emits
//! (`...Z`, `...+00:00`, naive date-times, bare dates) and sometimes send an
//! empty string where they mean "no value". Before a payload is deserialized
//! into a typed record, [`normalize_record`] rewrites every temporal field:
//!
//! - parseable ISO-8601 text becomes canonical RFC 3339 UTC text (`...Z`),
//! - an empty string becomes `null`,
//! - anything else is left alone so typed deserialization reports it.
//!
//! Which fields are temporal is decided by a static per-record table
//! ([`TemporalSchema`]) plus a naming rule: names containing `date` or ending
//! in `_at`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::types::Timestamp;

/// Declares the temporal fields of a record type.
///
/// Optional timestamp fields are listed exactly like required ones; the
/// normalizer does not care about nullability.
pub trait TemporalSchema {
    const TEMPORAL_FIELDS: &'static [&'static str];
}

/// Offset-carrying layouts tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Layouts without an offset. These are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Returns `true` if `name` should be treated as a timestamp field.
pub fn is_temporal_field(name: &str, declared: &[&str]) -> bool {
    if declared.contains(&name) {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    lower.contains("date") || lower.ends_with("_at")
}

/// Parse an ISO-8601 timestamp. A trailing `Z` is equivalent to `+00:00`.
pub fn parse_iso8601(raw: &str) -> Option<Timestamp> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let text = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Canonical text form of a timestamp: RFC 3339, UTC, `Z` suffix.
pub fn format_canonical(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Normalize one raw value of a temporal field.
fn normalize_value(value: &mut Value) {
    let Value::String(raw) = value else {
        return;
    };
    if raw.is_empty() {
        *value = Value::Null;
        return;
    }
    if let Some(ts) = parse_iso8601(raw) {
        *value = Value::String(format_canonical(&ts));
    }
}

/// Normalize every temporal field of a raw record in place.
pub fn normalize_record(record: &mut Map<String, Value>, declared: &[&str]) {
    for (name, value) in record.iter_mut() {
        if is_temporal_field(name, declared) {
            normalize_value(value);
        }
    }
}

/// Normalize a raw JSON payload against the schema of `T`.
///
/// Non-object payloads are returned untouched; typed deserialization will
/// reject them.
pub fn normalize_for<T: TemporalSchema>(mut payload: Value) -> Value {
    if let Value::Object(record) = &mut payload {
        normalize_record(record, T::TEMPORAL_FIELDS);
    }
    payload
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    struct Sample;

    impl TemporalSchema for Sample {
        const TEMPORAL_FIELDS: &'static [&'static str] = &["last_activity"];
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn trailing_z_equals_utc_offset() {
        assert_eq!(
            parse_iso8601("2024-05-01T10:20:30Z"),
            parse_iso8601("2024-05-01T10:20:30+00:00"),
        );
        assert_eq!(
            parse_iso8601("2024-05-01T10:20:30Z"),
            Some(utc(2024, 5, 1, 10, 20, 30))
        );
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        assert_eq!(
            parse_iso8601("2024-05-01T12:20:30+02:00"),
            Some(utc(2024, 5, 1, 10, 20, 30))
        );
    }

    #[test]
    fn naive_and_date_only_forms_are_utc() {
        assert_eq!(
            parse_iso8601("2024-05-01 10:20:30"),
            Some(utc(2024, 5, 1, 10, 20, 30))
        );
        assert_eq!(
            parse_iso8601("2024-05-01T10:20:30.250"),
            Some(utc(2024, 5, 1, 10, 20, 30) + chrono::Duration::milliseconds(250))
        );
        assert_eq!(parse_iso8601("2024-05-01"), Some(utc(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_iso8601("yesterday"), None);
        assert_eq!(parse_iso8601("2024-13-45"), None);
        assert_eq!(parse_iso8601(""), None);
    }

    #[test]
    fn field_selection_uses_table_and_naming_rule() {
        let declared = ["last_activity"];
        assert!(is_temporal_field("last_activity", &declared));
        assert!(is_temporal_field("date_joined", &declared));
        assert!(is_temporal_field("dive_datetime", &declared));
        assert!(is_temporal_field("updated_at", &declared));
        assert!(is_temporal_field("DateCreated", &declared));
        assert!(!is_temporal_field("name", &declared));
        assert!(!is_temporal_field("attempts", &declared));
    }

    #[test]
    fn record_is_rewritten_in_place() {
        let payload = json!({
            "email": "diver@example.org",
            "last_activity": "2024-05-01T10:20:30Z",
            "date_joined": "",
            "updated_at": "not a date",
            "label_studio_id": 7,
        });

        let normalized = normalize_for::<Sample>(payload);

        assert_eq!(normalized["email"], "diver@example.org");
        assert_eq!(normalized["last_activity"], "2024-05-01T10:20:30Z");
        assert!(normalized["date_joined"].is_null());
        assert_eq!(normalized["updated_at"], "not a date");
        assert_eq!(normalized["label_studio_id"], 7);
    }

    #[test]
    fn non_string_temporal_values_are_untouched() {
        let normalized = normalize_for::<Sample>(json!({
            "last_activity": null,
            "updated_at": 1714558830,
        }));
        assert!(normalized["last_activity"].is_null());
        assert_eq!(normalized["updated_at"], 1714558830);
    }

    #[test]
    fn non_object_payload_passes_through() {
        assert_eq!(normalize_for::<Sample>(json!([1, 2])), json!([1, 2]));
    }
}
