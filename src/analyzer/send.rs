// Send call-site discovery and status attribution.

use super::compile::{line, node_text};
use super::eval;
use super::http::{self, Verb};
use super::scope::{ScopeArena, ScopeId};
use super::text;
use super::trace::{TraceEvent, TraceSink};
use crate::util;
use tree_sitter::Node;

/// One outbound request found in a method body. Every field except
/// `line` may legitimately stay unresolved.
#[derive(Debug, Clone)]
pub struct SendSite {
    pub line: i64,
    pub verb: Option<Verb>,
    pub raw_path: Option<String>,
    pub resolved_path: Option<String>,
    pub verify_count: usize,
    pub expected_status: Option<String>,
}

/// Recursively scan a method body for invocations of the send
/// function. Overlapping tree nodes for the same source text are
/// deduplicated by line number.
pub fn collect_sends(
    body: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    sink: &mut dyn TraceSink,
) -> Vec<SendSite> {
    let mut sites = Vec::new();
    collect_in_node(body, source, scopes, scope, sink, &mut sites);
    sites
}

fn collect_in_node(
    node: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    sink: &mut dyn TraceSink,
    sites: &mut Vec<SendSite>,
) {
    if node.kind() == "invocation_expression" && callee_is_send(node, source) {
        let site_line = line(node);
        if !sites.iter().any(|site| site.line == site_line) {
            let site = parse_send(node, source, scopes, scope);
            sink.record(TraceEvent::CallSiteFound {
                line: site.line,
                verb: site.verb.map(|verb| verb.as_str().to_string()),
                path: site.resolved_path.clone(),
            });
            sites.push(site);
        }
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_in_node(child, source, scopes, scope, sink, sites);
    }
}

fn callee_is_send(node: Node<'_>, source: &str) -> bool {
    node.child_by_field_name("function")
        .map(|function| node_text(function, source) == http::SEND_FUNCTION)
        .unwrap_or(false)
}

/// Extract verb and path from one send invocation. A trailing
/// `with { ... }` clause is dropped first; the path comes from a
/// chained `.To(...)` when present, otherwise from the verb call's
/// own argument.
fn parse_send(node: Node<'_>, source: &str, scopes: &mut ScopeArena, scope: ScopeId) -> SendSite {
    let mut site = SendSite {
        line: line(node),
        verb: None,
        raw_path: None,
        resolved_path: None,
        verify_count: 0,
        expected_status: None,
    };
    let raw = node_text(node, source);
    let Some(argument) = send_argument(&raw) else {
        return site;
    };
    let argument = text::strip_with_clause(argument).trim();
    let Some((verb, verb_argument)) = leading_verb(argument) else {
        return site;
    };
    site.verb = Some(verb);
    let path_text = text::chained_call_argument(argument, "To").unwrap_or(verb_argument);
    let path_text = util::collapse_ws(path_text);
    if path_text.is_empty() {
        return site;
    }
    let resolved = eval::evaluate(&path_text, scopes, scope);
    site.resolved_path = Some(text::unquote(&resolved).to_string());
    site.raw_path = Some(path_text);
    site
}

fn send_argument(raw: &str) -> Option<&str> {
    let open = raw.find('(')?;
    let close = text::matching_paren(raw, open)?;
    Some(raw[open + 1..close].trim())
}

/// Match a verb builder call anchored at the start of the argument,
/// in priority order, and return its balanced argument text.
fn leading_verb(argument: &str) -> Option<(Verb, &str)> {
    let bytes = argument.as_bytes();
    for verb in http::VERB_PRIORITY {
        let name = verb.call_name();
        if !argument.starts_with(name) {
            continue;
        }
        let mut idx = name.len();
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        if bytes.get(idx) != Some(&b'(') {
            continue;
        }
        let close = text::matching_paren(argument, idx)?;
        return Some((*verb, argument[idx + 1..close].trim()));
    }
    None
}

/// Second pass over a method's call sites, ordered by line. Site *i*
/// owns source lines `[line(i), line(i+1))`, the last site owns lines
/// through the end of the method. Within the window, lines containing
/// the verification marker are counted, and the first status assertion
/// decides the expected status; an unknown symbol leaves it unset.
pub fn attribute_statuses(
    sites: &mut [SendSite],
    source: &str,
    method_end_line: i64,
    sink: &mut dyn TraceSink,
) {
    if sites.is_empty() {
        return;
    }
    sites.sort_by_key(|site| site.line);
    let lines: Vec<&str> = source.lines().collect();
    for index in 0..sites.len() {
        let window_start = sites[index].line;
        let window_end = match sites.get(index + 1) {
            Some(next) => next.line - 1,
            None => method_end_line,
        };
        let mut verify_count = 0usize;
        let mut symbol = None;
        for line_number in window_start..=window_end {
            let Some(&line) = lines.get((line_number - 1) as usize) else {
                break;
            };
            if line.contains(http::VERIFY_MARKER) {
                verify_count += 1;
            }
            if symbol.is_none() {
                symbol = verify_status_symbol(line);
            }
        }
        sites[index].verify_count = verify_count;
        sites[index].expected_status = symbol.and_then(http::status_code).map(str::to_string);
        if let Some(status) = &sites[index].expected_status {
            sink.record(TraceEvent::StatusInferred {
                line: sites[index].line,
                status: status.clone(),
            });
        }
    }
}

/// Symbol of the first `Verify(Response.StatusCode).Is(SYMBOL)` on the
/// line, if any.
fn verify_status_symbol(line: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(found) = line[search_from..].find(http::VERIFY_MARKER) {
        let after = search_from + found + http::VERIFY_MARKER.len();
        if let Some(symbol) = status_pattern_tail(&line[after..]) {
            return Some(symbol);
        }
        search_from = after;
    }
    None
}

fn status_pattern_tail(text: &str) -> Option<&str> {
    let rest = text.trim_start();
    let rest = rest.strip_prefix("Response.StatusCode")?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(')')?;
    let rest = rest.strip_prefix(".Is(")?;
    let close = rest.find(')')?;
    let symbol = rest[..close].trim();
    if symbol.is_empty() { None } else { Some(symbol) }
}
