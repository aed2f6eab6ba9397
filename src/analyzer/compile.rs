// C# declaration walking. One pass per file: fields, properties and
// methods compile into parent-chained scopes in declaration order, so
// later members see everything declared before them.

use super::eval;
use super::scope::{BlockBody, Callable, ExpressionBody, ScopeArena, ScopeId, TypeDecl};
use super::send;
use super::trace::{TraceEvent, TraceSink};
use thiserror::Error;
use tree_sitter::Node;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("class declaration without a name at line {line}")]
    MissingClassName { line: i64 },
    #[error("source could not be parsed")]
    Parse,
}

/// Compiled view of one source file. Class declarations are reachable
/// through `scope` under the names in `classes`, in declaration order.
#[derive(Debug)]
pub struct CompiledFile {
    pub scope: ScopeId,
    pub usings: Vec<String>,
    pub classes: Vec<String>,
}

/// Walk immediate children of the compilation root. Field declarations
/// become file-scope variables, class declarations compile recursively.
pub fn compile_file(
    root: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    globals: ScopeId,
    sink: &mut dyn TraceSink,
) -> Result<CompiledFile, CompileError> {
    let file_scope = scopes.push(Some(globals));
    let mut file = CompiledFile {
        scope: file_scope,
        usings: Vec::new(),
        classes: Vec::new(),
    };
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "using_directive" => {
                let text = node_text(child, source);
                if !text.is_empty() {
                    file.usings.push(text);
                }
            }
            "field_declaration" => handle_field(child, source, scopes, file_scope, sink),
            "class_declaration" => {
                let decl = compile_class(child, source, scopes, file_scope, sink)?;
                file.classes.push(decl.name.clone());
                scopes.define_type(file_scope, decl);
            }
            _ => {}
        }
    }
    Ok(file)
}

fn compile_class(
    node: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    parent: ScopeId,
    sink: &mut dyn TraceSink,
) -> Result<TypeDecl, CompileError> {
    let name = node
        .child_by_field_name("name")
        .map(|name_node| node_text(name_node, source))
        .filter(|name| !name.is_empty())
        .ok_or(CompileError::MissingClassName { line: line(node) })?;
    let class_scope = scopes.push(Some(parent));
    let mut members = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "field_declaration" => handle_field(child, source, scopes, class_scope, sink),
                "property_declaration" => {
                    handle_property(child, source, scopes, class_scope, &mut members, sink)
                }
                "method_declaration" => {
                    handle_method(child, source, scopes, class_scope, &mut members, sink)
                }
                "class_declaration" => {
                    let nested = compile_class(child, source, scopes, class_scope, sink)?;
                    scopes.define_type(class_scope, nested);
                }
                _ => {}
            }
        }
    }
    Ok(TypeDecl {
        name,
        attributes: attribute_texts(node, source),
        base_type: super_type_name(node, source).unwrap_or_default(),
        scope: class_scope,
        members,
    })
}

/// `private string Name = expr;` defines a variable with the evaluated
/// initializer. Declarators without an initializer define the empty
/// string, matching an unassigned field.
fn handle_field(
    node: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    sink: &mut dyn TraceSink,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "variable_declaration" {
            continue;
        }
        let mut declarators = child.walk();
        for declarator in child.named_children(&mut declarators) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = field_name(declarator, source) else {
                sink.record(TraceEvent::DeclarationSkipped {
                    line: line(declarator),
                    reason: "field declarator without a name".to_string(),
                });
                continue;
            };
            let value_text = initializer_text(declarator, source).unwrap_or_default();
            let value = eval::evaluate(&value_text, scopes, scope);
            scopes.define_variable(scope, &name, &value);
        }
    }
}

fn handle_property(
    node: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    members: &mut Vec<String>,
    sink: &mut dyn TraceSink,
) {
    let Some(name) = field_name(node, source) else {
        sink.record(TraceEvent::DeclarationSkipped {
            line: line(node),
            reason: "property without a name".to_string(),
        });
        return;
    };
    if let Some(arrow) = child_of_kind(node, "arrow_expression_clause") {
        let body = arrow_body_text(arrow, source);
        define_expression_member(name, body, Vec::new(), scopes, scope, members);
        return;
    }
    if let Some(initializer) = child_of_kind(node, "equals_value_clause") {
        let value_text = equals_value_text(initializer, source);
        let value = eval::evaluate(&value_text, scopes, scope);
        scopes.define_variable(scope, &name, &value);
    }
    // accessor-only properties carry no resolvable value
}

fn handle_method(
    node: Node<'_>,
    source: &str,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    members: &mut Vec<String>,
    sink: &mut dyn TraceSink,
) {
    let Some(name) = field_name(node, source) else {
        sink.record(TraceEvent::DeclarationSkipped {
            line: line(node),
            reason: "method without a name".to_string(),
        });
        return;
    };
    let params = parameter_names(node, source);
    if let Some(arrow) = child_of_kind(node, "arrow_expression_clause") {
        let body = arrow_body_text(arrow, source);
        define_expression_member(name, body, params, scopes, scope, members);
        return;
    }
    let Some(body) = node.child_by_field_name("body") else {
        // abstract or interface shape, nothing to compile
        return;
    };
    let method_scope = scopes.push(Some(scope));
    compile_locals(body, source, scopes, method_scope);
    let mut sends = send::collect_sends(body, source, scopes, method_scope, sink);
    send::attribute_statuses(&mut sends, source, end_line(node), sink);
    scopes.define_callable(
        scope,
        Callable::Block(BlockBody {
            name: name.clone(),
            arity: params.len(),
            attributes: attribute_texts(node, source),
            scope: method_scope,
            sends,
            start_line: line(node),
            end_line: end_line(node),
        }),
    );
    members.push(name);
}

/// Define an expression-bodied member. Zero-arity members are also
/// materialized as variables immediately, with the callable already
/// visible so the body may reference itself through earlier members.
fn define_expression_member(
    name: String,
    body: String,
    params: Vec<String>,
    scopes: &mut ScopeArena,
    scope: ScopeId,
    members: &mut Vec<String>,
) {
    let materialize = params.is_empty();
    scopes.define_callable(
        scope,
        Callable::Expression(ExpressionBody {
            name: name.clone(),
            body: body.clone(),
            params,
        }),
    );
    if materialize {
        let value = eval::evaluate(&body, scopes, scope);
        scopes.define_variable(scope, &name, &value);
    }
    members.push(name);
}

/// Top-level local declarations only, no descent into nested blocks.
/// Locals whose initializer resolves to nothing are skipped.
fn compile_locals(body: Node<'_>, source: &str, scopes: &mut ScopeArena, scope: ScopeId) {
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() != "local_declaration_statement" {
            continue;
        }
        let Some(declaration) = child_of_kind(statement, "variable_declaration") else {
            continue;
        };
        let mut declarators = declaration.walk();
        for declarator in declaration.named_children(&mut declarators) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = field_name(declarator, source) else {
                continue;
            };
            let Some(value_text) = initializer_text(declarator, source) else {
                continue;
            };
            let value = eval::evaluate(&value_text, scopes, scope);
            if !value.is_empty() {
                scopes.define_variable(scope, &name, &value);
            }
        }
    }
}

fn field_name(node: Node<'_>, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|name_node| node_text(name_node, source))
        .filter(|name| !name.is_empty())
}

/// Expression text after the `=` token of a declarator.
fn initializer_text(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let mut seen_eq = false;
    for child in node.children(&mut cursor) {
        if seen_eq {
            let text = node_text(child, source);
            if !text.is_empty() {
                return Some(text);
            }
        }
        if child.kind() == "=" {
            seen_eq = true;
        }
    }
    None
}

fn arrow_body_text(node: Node<'_>, source: &str) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .next()
        .map(|child| node_text(child, source))
        .unwrap_or_default()
}

fn equals_value_text(node: Node<'_>, source: &str) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .last()
        .map(|child| node_text(child, source))
        .unwrap_or_default()
}

fn parameter_names(node: Node<'_>, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let Some(params) = node.child_by_field_name("parameters") else {
        return out;
    };
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        if child.kind() != "parameter" {
            continue;
        }
        if let Some(name) = field_name(child, source) {
            out.push(name);
        }
    }
    out
}

fn attribute_texts(node: Node<'_>, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "attribute_list" {
            let text = node_text(child, source);
            if !text.is_empty() {
                out.push(text);
            }
        }
    }
    out
}

/// First identifier under the base list: `class Foo : APITest` gives
/// `APITest`; a qualified base gives its leading identifier.
fn super_type_name(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "base_list" {
            continue;
        }
        let mut bases = child.walk();
        for base in child.named_children(&mut bases) {
            if base.kind() == "identifier" {
                return Some(node_text(base, source));
            }
            if let Some(ident) = first_identifier(base) {
                return Some(node_text(ident, source));
            }
        }
    }
    None
}

fn first_identifier(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == "identifier")
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

pub(crate) fn node_text(node: Node<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or("")
        .trim()
        .to_string()
}

pub(crate) fn line(node: Node<'_>) -> i64 {
    node.start_position().row as i64 + 1
}

pub(crate) fn end_line(node: Node<'_>) -> i64 {
    node.end_position().row as i64 + 1
}
