//! Normalization of facility API responses.
//!
//! The API wraps the same payload in different envelopes depending on the
//! endpoint (`{"data": ...}`, a paginated `{"data": {"data": [...]}}`, or the
//! bare value) and is loose about field names and numeric types. Everything
//! here turns those shapes into the typed models once, at the boundary.

use chrono::{DateTime, Utc};
use geogate_core::error::{GeogateError, Result};
use geogate_core::models::{AttendanceState, Coordinate, Target, TaskScanState};
use serde_json::Value;
use tracing::debug;

/// Strip `data` envelopes until the payload is reached
pub fn unwrap_envelope(mut value: &Value) -> &Value {
    while let Some(inner) = value.get("data") {
        if inner.is_object() || inner.is_array() || inner.is_null() {
            value = inner;
        } else {
            break;
        }
    }
    value
}

/// First present, non-null field among `keys`
fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| value.get(*key)).find(|v| !v.is_null())
}

/// Number that may arrive as a JSON number or a numeric string
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Identifier that may arrive as a number or a string
fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Coordinate stored as latitude/longitude fields on `value`
fn coordinate(value: &Value) -> Option<Coordinate> {
    let latitude = field(value, &["latitude", "lat"]).and_then(as_f64)?;
    let longitude = field(value, &["longitude", "lng", "lon", "long"]).and_then(as_f64)?;
    Some(Coordinate::new(latitude, longitude))
}

/// Coordinate on `value` itself or on a nested `location` object
fn located(value: &Value) -> Option<Coordinate> {
    coordinate(value).or_else(|| value.get("location").and_then(coordinate))
}

/// Parse an asset listing into targets
///
/// Assets without both coordinates are dropped. Out-of-range coordinates are
/// kept; proximity evaluation skips them.
pub fn parse_targets(body: &Value) -> Result<Vec<Target>> {
    let items = unwrap_envelope(body)
        .as_array()
        .ok_or_else(|| invalid("assets", "expected a list of assets"))?;

    let mut targets = Vec::with_capacity(items.len());
    for item in items {
        let Some(id) = field(item, &["id", "asset_id"]).and_then(as_id) else {
            debug!("Skipping asset without an id");
            continue;
        };
        let Some(coordinate) = located(item) else {
            debug!(asset_id = %id, "Skipping asset without coordinates");
            continue;
        };
        let label = field(item, &["name", "label", "title"])
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Asset {}", id));

        targets.push(Target::new(id, label, coordinate));
    }

    Ok(targets)
}

/// Parse today's attendance
///
/// A null payload means no attendance record today. Check-in and check-out
/// are recognized from explicit flags or from their timestamps.
pub fn parse_attendance(body: &Value) -> Result<AttendanceState> {
    let mut record = unwrap_envelope(body);
    if let Some(inner) = record.get("attendance") {
        record = inner;
    }

    if record.is_null() {
        return Ok(AttendanceState::not_checked_in());
    }
    if !record.is_object() {
        return Err(invalid("attendance", "expected an attendance record"));
    }

    let checked_in_raw = field(record, &["check_in_time", "check_in", "checked_in_at"]);
    let checked_out_raw = field(record, &["check_out_time", "check_out", "checked_out_at"]);

    let has_checked_in = field(record, &["has_checked_in", "checked_in"])
        .and_then(as_flag)
        .unwrap_or(checked_in_raw.is_some());
    let has_checked_out = field(record, &["has_checked_out", "checked_out"])
        .and_then(as_flag)
        .unwrap_or(checked_out_raw.is_some());

    let checked_in_target_id = field(record, &["asset_id", "checked_in_asset_id"])
        .and_then(as_id)
        .or_else(|| record.get("asset").and_then(|asset| asset.get("id")).and_then(as_id));

    Ok(AttendanceState {
        has_checked_in,
        has_checked_out,
        checked_in_at: checked_in_raw.and_then(as_timestamp),
        checked_out_at: checked_out_raw.and_then(as_timestamp),
        checked_in_target_id,
    })
}

/// Parse a settings value into the raw string the radius policy expects
pub fn parse_setting(body: &Value) -> Option<String> {
    let value = unwrap_envelope(body);
    let value = value.get("value").unwrap_or(value);
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a task's scan requirements
pub fn parse_task_scan(body: &Value) -> Result<TaskScanState> {
    let task = unwrap_envelope(body);
    if !task.is_object() {
        return Err(invalid("task", "expected a task record"));
    }

    let scan_code_expected = field(task, &["scan_code", "qr_code", "scan_code_expected"])
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TaskScanState {
        scan_code_expected,
        scan_code_observed: None,
        declared_location: located(task),
    })
}

fn invalid(what: &str, reason: &str) -> GeogateError {
    GeogateError::Serialization(format!("Unexpected {} response: {}", what, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        let bare = json!([1, 2]);
        assert_eq!(unwrap_envelope(&bare), &json!([1, 2]));

        let wrapped = json!({"data": [1, 2]});
        assert_eq!(unwrap_envelope(&wrapped), &json!([1, 2]));

        let paginated = json!({"data": {"data": [1, 2], "current_page": 1}});
        assert_eq!(unwrap_envelope(&paginated), &json!([1, 2]));

        // A scalar `data` field is payload, not an envelope
        let scalar = json!({"data": "x", "id": 3});
        assert_eq!(unwrap_envelope(&scalar), &scalar);
    }

    #[test]
    fn test_parse_targets_across_shapes() {
        let body = json!({"data": {"data": [
            {"id": 12, "name": "Pump room", "latitude": "-8.6705", "longitude": "115.2126"},
            {"id": "a-7", "label": "Roof", "lat": -8.6710, "lng": 115.2130},
            {"id": 13, "name": "Unmapped"},
            {"id": 14, "location": {"latitude": -8.6, "longitude": 115.1}},
        ]}});

        let targets = parse_targets(&body).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], Target::new("12", "Pump room", Coordinate::new(-8.6705, 115.2126)));
        assert_eq!(targets[1].id, "a-7");
        assert_eq!(targets[1].label, "Roof");
        assert_eq!(targets[2].label, "Asset 14");
    }

    #[test]
    fn test_parse_targets_rejects_non_list() {
        assert!(parse_targets(&json!({"data": {"id": 1}})).is_err());
    }

    #[test]
    fn test_parse_attendance_from_timestamps() {
        let body = json!({"data": {"attendance": {
            "check_in_time": "2026-10-18T01:15:00Z",
            "check_out_time": null,
            "asset_id": 12
        }}});

        let state = parse_attendance(&body).unwrap();

        assert!(state.has_checked_in);
        assert!(!state.has_checked_out);
        assert_eq!(state.checked_in_target_id.as_deref(), Some("12"));
        assert!(state.checked_in_at.is_some());
    }

    #[test]
    fn test_parse_attendance_from_flags() {
        let body = json!({"has_checked_in": true, "has_checked_out": true});
        let state = parse_attendance(&body).unwrap();
        assert!(state.has_checked_in);
        assert!(state.has_checked_out);
        assert_eq!(state.checked_in_target_id, None);
    }

    #[test]
    fn test_parse_attendance_null_record() {
        let state = parse_attendance(&json!({"data": null})).unwrap();
        assert_eq!(state, AttendanceState::not_checked_in());
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(parse_setting(&json!({"data": {"value": "50"}})), Some("50".to_string()));
        assert_eq!(parse_setting(&json!({"value": 25})), Some("25".to_string()));
        assert_eq!(parse_setting(&json!("10")), Some("10".to_string()));
        assert_eq!(parse_setting(&json!({"data": {"value": null}})), None);
    }

    #[test]
    fn test_parse_task_scan() {
        let body = json!({"data": {
            "id": 7,
            "scan_code": "ABC123",
            "location": {"lat": "-8.6705", "lng": "115.2126"}
        }});

        let scan = parse_task_scan(&body).unwrap();

        assert_eq!(scan.scan_code_expected, "ABC123");
        assert_eq!(scan.declared_location, Some(Coordinate::new(-8.6705, 115.2126)));
        assert_eq!(scan.scan_code_observed, None);
    }

    #[test]
    fn test_parse_task_without_scan_code() {
        let scan = parse_task_scan(&json!({"id": 7})).unwrap();
        assert!(!scan.scan_required());
        assert_eq!(scan.declared_location, None);
    }
}
