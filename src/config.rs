// Global constants for the analyzer
// Parsed from a key=value file and seeded into every file's root scope

use std::collections::HashMap;

/// Named constants visible to every analyzed file.
///
/// Values are stored unquoted. Absolute URLs are truncated to their
/// `/api/` suffix so they line up with the route-constant table.
#[derive(Debug, Clone, Default)]
pub struct GlobalEnv {
    values: HashMap<String, String>,
}

impl GlobalEnv {
    /// Parse `key=value` lines. Blank lines, `#` comments and lines
    /// without `=` are skipped. Later entries override earlier ones.
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            values.insert(key.to_string(), normalize_value(value));
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn normalize_value(raw: &str) -> String {
    let value = raw.trim().trim_matches('"');
    match value.find("/api/") {
        Some(idx) => value[idx..].to_string(),
        None => value.to_string(),
    }
}
