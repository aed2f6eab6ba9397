// Partial evaluation of C# string expressions against a scope chain.
// Total: every input produces a value, unresolvable expressions fall
// back to their own text.

use super::scope::{Callable, ScopeArena, ScopeId};
use super::text;

/// Evaluate `expression` in `scope`. Results that represent string
/// values come back wrapped in double quotes; callers splice with
/// [`text::unquote`].
///
/// Dispatch, first match wins: empty, interpolated string, single
/// call, top-level `+` concatenation, identifier, then literals and
/// anything else verbatim. Identifiers are checked before literals,
/// so `true` resolves as a variable like any other name.
pub fn evaluate(expression: &str, scopes: &mut ScopeArena, scope: ScopeId) -> String {
    let expression = expression.trim();
    if expression.is_empty() {
        return String::new();
    }
    if let Some(inner) = interpolated_inner(expression) {
        return resolve_interpolation(inner, scopes, scope);
    }
    if let Some((name, args)) = text::call_expression(expression) {
        return resolve_call(expression, name, args, scopes, scope);
    }
    if text::has_top_level(expression, '+') {
        return resolve_concatenation(expression, scopes, scope);
    }
    if text::is_identifier(expression) {
        return resolve_variable(expression, scopes, scope);
    }
    expression.to_string()
}

fn interpolated_inner(expression: &str) -> Option<&str> {
    expression.strip_prefix("$\"")?.strip_suffix('"')
}

/// Replace each balanced `{...}` placeholder with its evaluated value,
/// unquoted before splicing. Literal text passes through.
fn resolve_interpolation(inner: &str, scopes: &mut ScopeArena, scope: ScopeId) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        let Some(ch) = inner[i..].chars().next() else {
            break;
        };
        if ch == '{' {
            if let Some(close) = text::matching_brace(inner, i) {
                let value = evaluate(&inner[i + 1..close], scopes, scope);
                out.push_str(text::unquote(&value));
                i = close + 1;
                continue;
            }
        }
        out.push(ch);
        i += ch.len_utf8();
    }
    format!("\"{out}\"")
}

fn resolve_call(
    original: &str,
    name: &str,
    args_text: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
) -> String {
    let args: Vec<String> = text::split_top_level(args_text, ',')
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| evaluate(part, scopes, scope))
        .collect();
    let callable = match scopes.callable(scope, name) {
        Ok(found) => found.clone(),
        Err(_) => return original.to_string(),
    };
    match callable {
        Callable::Expression(body) => {
            let call_scope = scopes.push(Some(scope));
            for (param, value) in body.params.iter().zip(&args) {
                scopes.define_variable(call_scope, param, value);
            }
            evaluate(&body.body, scopes, call_scope)
        }
        // block bodies are never evaluated; synthesize a readable
        // placeholder from the resolved arguments
        Callable::Block(body) => format!("\"{}({})\"", body.name, args.join(", ")),
    }
}

fn resolve_concatenation(expression: &str, scopes: &mut ScopeArena, scope: ScopeId) -> String {
    let mut out = String::new();
    for part in text::split_top_level(expression, '+') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value = evaluate(part, scopes, scope);
        out.push_str(text::unquote(&value));
    }
    format!("\"{out}\"")
}

fn resolve_variable(name: &str, scopes: &ScopeArena, scope: ScopeId) -> String {
    match scopes.variable(scope, name) {
        Ok(value) => value.to_string(),
        // unknown identifiers become their own quoted name
        Err(_) => format!("\"{name}\""),
    }
}
