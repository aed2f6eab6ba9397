// Balanced-delimiter scanning over C# expression text.
// All scanners track quote state so delimiters inside string or char
// literals never count, and a backslash escapes the next byte inside
// a regular string.

/// Index of the `)` matching the `(` at `open`, or None if unbalanced.
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    matching_delim(text, open, b'(', b')')
}

/// Index of the `}` matching the `{` at `open`, or None if unbalanced.
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    matching_delim(text, open, b'{', b'}')
}

fn matching_delim(text: &str, open: usize, open_byte: u8, close_byte: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&open_byte) {
        return None;
    }
    let mut depth = 0i32;
    let mut quote = 0u8;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if quote != 0 {
            if b == b'\\' && quote == b'"' {
                i += 2;
                continue;
            }
            if b == quote {
                quote = 0;
            }
            i += 1;
            continue;
        }
        if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == open_byte {
            depth += 1;
        } else if b == close_byte {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Split on `sep` at delimiter depth zero. Separators inside parens,
/// braces, brackets or quoted literals do not split.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let sep = sep as u8;
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote = 0u8;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if quote != 0 {
            if b == b'\\' && quote == b'"' {
                i += 2;
                continue;
            }
            if b == quote {
                quote = 0;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = b,
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            _ => {
                if b == sep && depth == 0 {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
            }
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

pub fn has_top_level(text: &str, sep: char) -> bool {
    split_top_level(text, sep).len() > 1
}

/// Argument text of a chained `.name(...)` call at depth zero, e.g. the
/// `x` of `Post(body).To(x)`. Longer identifiers such as `.ToString()`
/// do not match `name = "To"`.
pub fn chained_call_argument<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut quote = 0u8;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if quote != 0 {
            if b == b'\\' && quote == b'"' {
                i += 2;
                continue;
            }
            if b == quote {
                quote = 0;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = b,
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            b'.' if depth == 0 => {
                if let Some(open) = chain_open_paren(text, i + 1, name) {
                    let close = matching_paren(text, open)?;
                    return Some(text[open + 1..close].trim());
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn chain_open_paren(text: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if !text[i..].starts_with(name) {
        return None;
    }
    i += name.len();
    if bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        return None;
    }
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) == Some(&b'(') { Some(i) } else { None }
}

/// Drop a trailing record-mutation clause: `Post(x) with { Name = y }`
/// becomes `Post(x)`. Only a depth-zero, word-bounded `with` followed
/// by `{` counts.
pub fn strip_with_clause(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut quote = 0u8;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if quote != 0 {
            if b == b'\\' && quote == b'"' {
                i += 2;
                continue;
            }
            if b == quote {
                quote = 0;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = b,
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            b'w' if depth == 0 && is_with_clause(text, i) => {
                return text[..i].trim_end();
            }
            _ => {}
        }
        i += 1;
    }
    text
}

fn is_with_clause(text: &str, at: usize) -> bool {
    let bytes = text.as_bytes();
    if !text[at..].starts_with("with") {
        return false;
    }
    if at > 0 {
        let prev = bytes[at - 1];
        if prev.is_ascii_alphanumeric() || prev == b'_' {
            return false;
        }
    }
    let mut i = at + 4;
    if bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        return false;
    }
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    bytes.get(i) == Some(&b'{')
}

/// `name(args)` decomposition when the whole text is a single call:
/// leading identifier, `(` directly after it, and the matching `)` as
/// the final character.
pub fn call_expression(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    let close = matching_paren(text, i)?;
    if close + 1 != text.len() {
        return None;
    }
    Some((&text[..i], &text[i + 1..close]))
}

pub fn is_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

/// Strip one pair of wrapping double quotes, if present.
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
