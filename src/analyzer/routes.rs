// Route-constant table and concrete-path matching.

use std::collections::HashMap;

/// Named route constants split into exact paths and templates with
/// `{placeholder}` segments. Lookup is case-insensitive; template
/// order follows the source text, first match wins.
#[derive(Debug, Default)]
pub struct RouteTable {
    exact: HashMap<String, String>,
    templated: Vec<TemplateRoute>,
}

#[derive(Debug)]
struct TemplateRoute {
    name: String,
    template: String,
}

impl RouteTable {
    /// Parse `public const string Name = "path";` lines. Anything else
    /// is ignored.
    pub fn parse(text: &str) -> Self {
        let mut table = RouteTable::default();
        for line in text.lines() {
            let Some((name, path)) = parse_const_line(line) else {
                continue;
            };
            let key = path.to_ascii_lowercase();
            if key.contains('{') {
                table.templated.push(TemplateRoute {
                    name,
                    template: key,
                });
            } else {
                table.exact.insert(key, name);
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.templated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.templated.is_empty()
    }

    /// Resolve a concrete request path to a route-constant name.
    /// Scheme and host are stripped down to the first `/api` segment,
    /// query suffixes are dropped, comparison is lowercase. The exact
    /// table is consulted before the templates.
    pub fn get_var_for_path(&self, path: &str) -> Option<&str> {
        let normalized = normalize_request_path(path);
        if normalized.is_empty() {
            return None;
        }
        if let Some(name) = self.exact.get(&normalized) {
            return Some(name.as_str());
        }
        self.templated
            .iter()
            .find(|route| template_matches(&route.template, &normalized))
            .map(|route| route.name.as_str())
    }
}

fn parse_const_line(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix("public const string ")?;
    let (name, value) = rest.split_once('=')?;
    let name = name.trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return None;
    }
    let value = value.trim().trim_end_matches(';').trim();
    let path = value.strip_prefix('"')?.strip_suffix('"')?;
    if path.is_empty() {
        return None;
    }
    Some((name.to_string(), path.to_string()))
}

fn normalize_request_path(path: &str) -> String {
    let mut value = path.trim().to_ascii_lowercase();
    if value.starts_with("http://") || value.starts_with("https://") {
        if let Some(idx) = value.find("/api") {
            value = value[idx..].to_string();
        }
    }
    if let Some(idx) = value.find('?') {
        value.truncate(idx);
    }
    value
}

/// Full-path match, segment by segment. A `{placeholder}` consumes one
/// or more characters within a single segment.
fn template_matches(template: &str, path: &str) -> bool {
    let mut template_segments = template.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (template_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) => {
                if !segment_matches(t, p) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn segment_matches(template: &str, segment: &str) -> bool {
    if !template.contains('{') {
        return template == segment;
    }
    segment_matches_from(template.as_bytes(), segment.as_bytes())
}

fn segment_matches_from(template: &[u8], segment: &[u8]) -> bool {
    let Some(&head) = template.first() else {
        return segment.is_empty();
    };
    if head == b'{' {
        let Some(close) = template.iter().position(|b| *b == b'}') else {
            return template == segment;
        };
        let rest = &template[close + 1..];
        // placeholder consumes at least one byte
        for consumed in 1..=segment.len() {
            if segment_matches_from(rest, &segment[consumed..]) {
                return true;
            }
        }
        return false;
    }
    match segment.first() {
        Some(&b) if b == head => segment_matches_from(&template[1..], &segment[1..]),
        _ => false,
    }
}
