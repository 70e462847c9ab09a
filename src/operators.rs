//! Mobile operator codes (MCC + MNC) and their display names.

/// Name reported for codes missing from the catalog.
pub const UNKNOWN_OPERATOR: &str = "Unknown";

const OPERATORS: &[(i64, &str)] = &[
    (20801, "Orange"),
    (20803, "MobiquiThings"),
    (20804, "NetGroup"),
    (20805, "Globalstar Europe"),
    (20808, "Completel"),
    (20810, "SFR"),
    (20815, "Free"),
    (20820, "Bouygues"),
];

/// Resolve an operator code to its display name.
pub fn lookup(code: i64) -> &'static str {
    OPERATORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_OPERATOR)
}

/// All known `(code, name)` pairs.
pub fn all() -> &'static [(i64, &'static str)] {
    OPERATORS
}
