use serde::{Deserialize, Serialize};

/// A weather station as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    identifier: String,
    city: String,
}

impl StationRecord {
    pub fn new(identifier: impl Into<String>, city: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), city: city.into() }
    }

    /// Dataset identifier, e.g. `"42-station-meteo-toulouse-valade"`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Strip a leading `<digits>-` token, e.g. `"42-meteo-blagnac"` → `"meteo-blagnac"`.
pub fn strip_numeric_prefix(identifier: &str) -> &str {
    let rest = identifier.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == identifier.len() {
        return identifier;
    }

    rest.strip_prefix('-').unwrap_or(identifier)
}
