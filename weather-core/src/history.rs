use serde::{Deserialize, Serialize};

/// Longest history kept.
pub const MAX_HISTORY: usize = 5;

/// Recently searched place names, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `place` at the front, dropping any entry equal to it ignoring case.
    /// The new spelling wins.
    pub fn push(&mut self, place: &str) {
        let needle = place.to_lowercase();
        self.0.retain(|p| p.to_lowercase() != needle);
        self.0.insert(0, place.to_string());
        self.0.truncate(MAX_HISTORY);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn latest(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for SearchHistory {
    /// Normalizes a loaded list through `push` so stored files can't break the rules.
    fn from(places: Vec<String>) -> Self {
        let mut history = Self::new();
        for place in places.iter().rev() {
            history.push(place);
        }
        history
    }
}

impl From<SearchHistory> for Vec<String> {
    fn from(history: SearchHistory) -> Self {
        history.0
    }
}
