/// The request-builder call every recognized call site goes through.
pub const SEND_FUNCTION: &str = "Send";

/// Substring that marks one assertion on a line.
pub const VERIFY_MARKER: &str = "Verify(";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// Probe order for the leading builder call.
pub const VERB_PRIORITY: &[Verb] = &[Verb::Post, Verb::Put, Verb::Get, Verb::Delete, Verb::Patch];

impl Verb {
    /// Builder method name as written in test source.
    pub fn call_name(&self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::Post => "Post",
            Verb::Put => "Put",
            Verb::Delete => "Delete",
            Verb::Patch => "Patch",
        }
    }

    /// Uppercase form used in rendered attributes and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
        }
    }

    pub fn from_name(raw: &str) -> Option<Verb> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Verb::Get),
            "POST" => Some(Verb::Post),
            "PUT" => Some(Verb::Put),
            "DELETE" => Some(Verb::Delete),
            "PATCH" => Some(Verb::Patch),
            _ => None,
        }
    }
}

/// Status symbols as they appear inside `.Is(...)` assertions.
const STATUS_SYMBOLS: &[(&str, &str)] = &[
    ("OK", "200"),
    ("Created", "201"),
    ("NoContent", "204"),
    ("BadRequest", "400"),
    ("Unauthorized", "401"),
    ("Forbidden", "403"),
    ("NotFound", "404"),
    ("Gone", "410"),
    ("InternalServerError", "500"),
];

/// Status fragments as they appear in snake_case test-method names.
const NAME_SEGMENT_CODES: &[(&str, &str)] = &[
    ("OK", "200"),
    ("CREATED", "201"),
    ("BADREQUEST", "400"),
    ("UNAUTHORIZED", "401"),
    ("FORBIDDEN", "403"),
    ("NOTFOUND", "404"),
    ("GONE", "410"),
];

/// Numeric status code for an assertion symbol. Three-digit literals
/// pass through unchanged; unknown symbols map to None.
pub fn status_code(symbol: &str) -> Option<&str> {
    let trimmed = symbol.trim();
    if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Some(trimmed);
    }
    STATUS_SYMBOLS
        .iter()
        .find(|(name, _)| *name == trimmed)
        .map(|(_, code)| *code)
}

/// Numeric status code for a method-name segment such as `NotFound`
/// in `GET_Share_NotFound_141460`. Case-insensitive.
pub fn status_code_for_name_segment(segment: &str) -> Option<&'static str> {
    let upper = segment.to_ascii_uppercase();
    NAME_SEGMENT_CODES
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, code)| *code)
}
