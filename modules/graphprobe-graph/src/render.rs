//! Display text for arbitrary property values.
//!
//! Node properties are schemaless, so a field the report prints may hold a
//! string on one node and a date, a number or a list on the next. Values are
//! decoded once as `BoltType` and rendered by variant; Cypher `null` renders
//! as absent.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::{BoltType, Row};
use tracing::debug;

use graphprobe_common::MISSING_VALUE;

/// Render `row[key]` as display text, or `None` for null.
pub fn row_text(row: &Row, key: &str) -> Option<String> {
    let value = match row.get::<BoltType>(key) {
        Ok(value) => value,
        Err(e) => {
            debug!(key, error = %e, "Property could not be decoded");
            return Some(format!("<{e}>"));
        }
    };
    match value {
        BoltType::Date(_)
        | BoltType::Time(_)
        | BoltType::LocalTime(_)
        | BoltType::DateTime(_)
        | BoltType::LocalDateTime(_)
        | BoltType::DateTimeZoneId(_) => temporal_text(row, key).or_else(|| bolt_text(&value)),
        _ => bolt_text(&value),
    }
}

/// Render a decoded value. Lists and maps recurse; map keys are sorted.
pub fn bolt_text(value: &BoltType) -> Option<String> {
    let text = match value {
        BoltType::Null(_) => return None,
        BoltType::String(s) => s.value.clone(),
        BoltType::Integer(i) => i.value.to_string(),
        BoltType::Float(f) => float_text(f.value),
        BoltType::Boolean(b) => b.value.to_string(),
        BoltType::List(list) => {
            let items: Vec<String> = list.value.iter().map(nested_text).collect();
            format!("[{}]", items.join(", "))
        }
        BoltType::Map(map) => {
            let mut entries: Vec<(&str, String)> = map
                .value
                .iter()
                .map(|(k, v)| (k.value.as_str(), nested_text(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        other => format!("{other:?}"),
    };
    Some(text)
}

fn nested_text(value: &BoltType) -> String {
    bolt_text(value).unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Floats keep their decimal point: `1.0`, not `1`.
fn float_text(f: f64) -> String {
    format!("{f:?}")
}

fn temporal_text(row: &Row, key: &str) -> Option<String> {
    // DateTime before NaiveDateTime before NaiveDate
    if let Ok(dt) = row.get::<DateTime<FixedOffset>>(key) {
        return Some(dt.to_rfc3339());
    }
    if let Ok(ndt) = row.get::<NaiveDateTime>(key) {
        return Some(ndt.to_string());
    }
    if let Ok(date) = row.get::<NaiveDate>(key) {
        return Some(date.to_string());
    }
    row.get::<NaiveTime>(key).ok().map(|t| t.to_string())
}
