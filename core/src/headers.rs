//! Ordered header map with Proper-Case name normalization.
//!
//! # Design
//! Headers keep their insertion order (some servers care), setting an
//! existing name replaces its value in place, and `append` allows repeated
//! names for headers that legitimately occur more than once. Names are
//! normalized to `Proper-Case-With-Hyphens` on the way in unless the caller
//! asks for the raw spelling.

/// Normalize a header name to Proper-Case-with-hyphens.
///
/// Each `-`-separated segment gets an uppercase first ASCII letter and
/// lowercase remainder, so `content-type` and `CONTENT-TYPE` both become
/// `Content-Type`. Idempotent.
pub fn normalize_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Insertion-ordered header collection.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, normalizing the name. Replaces the first existing
    /// entry with the same normalized name; otherwise appends.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.set_entry(normalize_name(name), value.into());
    }

    /// Set a header without normalizing the name.
    pub fn set_raw(&mut self, name: &str, value: impl Into<String>) {
        self.set_entry(name.to_string(), value.into());
    }

    /// Append a repeated header under the normalized name, keeping any
    /// existing entries with that name.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries.push((normalize_name(name), value.into()));
    }

    fn set_entry(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// First value set for `name` (matched against the normalized form).
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_name(name);
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}
