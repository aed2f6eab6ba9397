// Swagger attribute rendering and insertion.

use crate::analyzer::FileAnalysis;
use crate::analyzer::http::{self, Verb};
use crate::analyzer::routes::RouteTable;
use crate::analyzer::scope::{BlockBody, Callable};
use crate::analyzer::send::SendSite;
use crate::model::MethodChange;

/// Insert a Swagger attribute above every annotatable test method and
/// return the updated text plus one record per inserted attribute.
/// Methods that already carry a Swagger attribute, or whose best call
/// site is missing a verb, status, or route, are left untouched.
pub fn annotate_source(
    analysis: &FileAnalysis,
    routes: &RouteTable,
    source: &str,
) -> (String, Vec<MethodChange>) {
    let mut text = source.to_string();
    let mut changes = Vec::new();
    for class in analysis.classes() {
        if !class.base_type.contains("APITest") {
            continue;
        }
        for member in &class.members {
            let Ok(Callable::Block(method)) = analysis.scopes.callable(class.scope, member) else {
                continue;
            };
            if !is_test_method(method) || has_swagger_attribute(method) {
                continue;
            }
            let Some(site) = select_send(&method.sends, &method.name) else {
                continue;
            };
            let Some(attribute) = render_attribute(site, routes) else {
                continue;
            };
            let Some(updated) = insert_above_declaration(&text, &method.name, &attribute) else {
                continue;
            };
            text = updated;
            changes.push(MethodChange {
                method: method.name.clone(),
                attribute,
            });
        }
    }
    (text, changes)
}

fn is_test_method(method: &BlockBody) -> bool {
    method.attributes.iter().any(|attr| attr.contains("[Test]"))
}

fn has_swagger_attribute(method: &BlockBody) -> bool {
    method.attributes.iter().any(|attr| attr.contains("Swagger("))
}

/// Pick the call site that best matches the hints in the method name.
/// Sites matching both hints beat sites matching one, which beat the
/// rest; ties go to the most verifications, then the highest line.
fn select_send<'a>(sends: &'a [SendSite], method_name: &str) -> Option<&'a SendSite> {
    let (verb, status) = name_filters(method_name);
    let verb_matches = |site: &SendSite| verb.is_some() && site.verb == verb;
    let status_matches =
        |site: &SendSite| status.is_some() && site.expected_status.as_deref() == status.as_deref();
    let mut pool: Vec<&SendSite> = sends
        .iter()
        .filter(|site| verb_matches(site) && status_matches(site))
        .collect();
    if pool.is_empty() {
        pool = sends
            .iter()
            .filter(|site| verb_matches(site) || status_matches(site))
            .collect();
    }
    if pool.is_empty() {
        pool = sends.iter().collect();
    }
    pool.into_iter()
        .max_by_key(|site| (site.verify_count, site.line))
}

/// Verb and status hints carried by a name such as
/// `POST_AdminBlacklist_NoAuth_401_106508`. The leading segment names
/// the verb; a three-digit segment or a known status word sets the
/// status, later segments overriding earlier ones.
fn name_filters(method_name: &str) -> (Option<Verb>, Option<String>) {
    let verb = method_name.split('_').next().and_then(Verb::from_name);
    let mut status = None;
    for segment in method_name.split('_') {
        if segment.len() == 3 && segment.bytes().all(|b| b.is_ascii_digit()) {
            status = Some(segment.to_string());
        } else if let Some(code) = http::status_code_for_name_segment(segment) {
            status = Some(code.to_string());
        }
    }
    (verb, status)
}

/// Attribute text for a chosen call site, or None when the site is
/// missing the verb, the status, or a route name for its path.
fn render_attribute(site: &SendSite, routes: &RouteTable) -> Option<String> {
    let verb = site.verb?;
    let status = site.expected_status.as_deref()?;
    let path = site.resolved_path.as_deref()?;
    let route = routes.get_var_for_path(path)?;
    Some(format!(
        "[Swagger(Path = Paths.{route}, Operation = OperationType.{}, ResponseCode = {status})]",
        verb.as_str()
    ))
}

/// Insert `attribute` on its own line directly above the method's
/// declaration, reusing the declaration line's indentation and line
/// ending. The declaration is found by substring, so the method body
/// may sit anywhere in the file.
fn insert_above_declaration(source: &str, method_name: &str, attribute: &str) -> Option<String> {
    let void_needle = format!("public void {method_name}(");
    let task_needle = format!("public async Task {method_name}(");
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        if line.contains(&void_needle) || line.contains(&task_needle) {
            let indent = &line[..line.len() - line.trim_start().len()];
            let newline = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
            let mut out = String::with_capacity(source.len() + indent.len() + attribute.len() + 2);
            out.push_str(&source[..offset]);
            out.push_str(indent);
            out.push_str(attribute);
            out.push_str(newline);
            out.push_str(&source[offset..]);
            return Some(out);
        }
        offset += line.len();
    }
    None
}
