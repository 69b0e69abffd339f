//! Info-field value resolution
//!
//! Template generations disagreed on info-field ids (`serialNo` vs
//! `serial` vs `SerialNo`, ...), so a direct lookup falls back to a fixed
//! alias table before giving up with the `"-"` sentinel the sheets print
//! for an empty cell.

use auditkit_model::AuditDocument;

/// Sentinel printed when no value resolves.
pub const MISSING_VALUE: &str = "-";

/// Canonical field id → historical aliases, tried in order.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("serialNo", &["serial", "serialNumber", "Serial", "SerialNo"]),
    ("modelName", &["model", "modelVariant", "Model"]),
    ("date", &["auditDate", "reportDate"]),
    ("shift", &["shiftName", "Shift"]),
    ("eid", &["employeeId", "auditorId", "EID"]),
];

/// Resolve an info value, following aliases.
///
/// A stored `null` or empty string does not count as present — the lookup
/// keeps trying aliases past it. Returns `None` when nothing usable
/// matches.
pub fn lookup<'a>(audit: &'a AuditDocument, field_id: &str) -> Option<&'a serde_json::Value> {
    let candidate = |id: &str| audit.info_data.get(id).filter(|v| has_content(v));
    if let Some(value) = candidate(field_id) {
        return Some(value);
    }
    let aliases = FIELD_ALIASES
        .iter()
        .find(|(id, _)| *id == field_id)
        .map(|(_, aliases)| *aliases)?;
    aliases.iter().find_map(|alias| candidate(alias))
}

/// Resolve an info value for display.
///
/// Strings render bare, other JSON scalars via their JSON form, and a miss
/// renders as [`MISSING_VALUE`].
#[must_use]
pub fn info_value(audit: &AuditDocument, field_id: &str) -> String {
    match lookup(audit, field_id) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => MISSING_VALUE.to_string(),
    }
}

fn has_content(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
