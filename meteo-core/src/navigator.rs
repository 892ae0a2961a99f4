//! Bidirectional cursor over the stations of one city.

use crate::station::{StationRecord, strip_numeric_prefix};

/// Cursor over a fixed, ordered list of stations.
///
/// The list never changes after construction. When it is non-empty the
/// cursor always points at one station; moving past either end leaves it
/// where it is.
#[derive(Debug, Clone, Default)]
pub struct StationNavigator {
    stations: Vec<StationRecord>,
    cursor: Option<usize>,
}

impl StationNavigator {
    pub fn new(stations: Vec<StationRecord>) -> Self {
        let cursor = if stations.is_empty() { None } else { Some(0) };
        Self { stations, cursor }
    }

    /// Move forward; `None` (and no movement) at the last station.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&StationRecord> {
        let i = self.cursor?;
        if i + 1 >= self.stations.len() {
            return None;
        }

        self.cursor = Some(i + 1);
        self.stations.get(i + 1)
    }

    /// Move backward; `None` (and no movement) at the first station.
    pub fn previous(&mut self) -> Option<&StationRecord> {
        let i = self.cursor?.checked_sub(1)?;

        self.cursor = Some(i);
        self.stations.get(i)
    }

    pub fn reset(&mut self) {
        self.cursor = if self.stations.is_empty() { None } else { Some(0) };
    }

    pub fn current(&self) -> Option<&StationRecord> {
        self.cursor.and_then(|i| self.stations.get(i))
    }

    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.stations.len())
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    /// 1-based position of the cursor, 0 when there are no stations.
    pub fn position(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }

    pub fn total(&self) -> usize {
        self.stations.len()
    }

    /// Stations in navigation order. Does not move the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, StationRecord> {
        self.stations.iter()
    }
}

/// Sort stations by identifier, ignoring a numeric prefix and case, and wrap
/// them in a navigator. Ties keep their input order.
pub fn build_navigator(mut stations: Vec<StationRecord>) -> StationNavigator {
    stations.sort_by_cached_key(|s| sort_key(s.identifier()));
    StationNavigator::new(stations)
}

fn sort_key(identifier: &str) -> String {
    strip_numeric_prefix(identifier).to_lowercase()
}
