use std::collections::HashMap;
use thiserror::Error;

use super::send::SendSite;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("unknown identifier {0}")]
    UnknownIdentifier(String),
}

/// Handle into a [`ScopeArena`]. Scopes are never removed, so a handle
/// stays valid for the lifetime of its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A callable class member. Expression-bodied members keep their body
/// text for lazy evaluation at call time; block-bodied members are
/// never evaluated and carry the facts recovered from their body.
#[derive(Debug, Clone)]
pub enum Callable {
    Expression(ExpressionBody),
    Block(BlockBody),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Expression(body) => &body.name,
            Callable::Block(body) => &body.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionBody {
    pub name: String,
    pub body: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BlockBody {
    pub name: String,
    pub arity: usize,
    pub attributes: Vec<String>,
    pub scope: ScopeId,
    pub sends: Vec<SendSite>,
    pub start_line: i64,
    pub end_line: i64,
}

/// A class declaration. `members` lists callable names in declaration
/// order; the callables themselves live in `scope`.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub attributes: Vec<String>,
    pub base_type: String,
    pub scope: ScopeId,
    pub members: Vec<String>,
}

#[derive(Debug, Default)]
struct ScopeRecord {
    parent: Option<ScopeId>,
    variables: HashMap<String, String>,
    callables: HashMap<String, Callable>,
    types: HashMap<String, TypeDecl>,
}

/// Arena of parent-chained scopes. One arena per analyzed file; lookups
/// walk the parent chain, definitions always land in the named scope.
#[derive(Debug, Default)]
pub struct ScopeArena {
    records: Vec<ScopeRecord>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.records.len());
        self.records.push(ScopeRecord {
            parent,
            ..Default::default()
        });
        id
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.records[scope.0].parent
    }

    pub fn define_variable(&mut self, scope: ScopeId, name: &str, value: &str) {
        self.records[scope.0]
            .variables
            .insert(name.to_string(), value.to_string());
    }

    /// Overwrite in the nearest scope that already defines `name`.
    pub fn assign_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: &str,
    ) -> Result<(), ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.records[id.0].variables.contains_key(name) {
                self.records[id.0]
                    .variables
                    .insert(name.to_string(), value.to_string());
                return Ok(());
            }
            current = self.records[id.0].parent;
        }
        Err(ScopeError::UnknownIdentifier(name.to_string()))
    }

    pub fn variable(&self, scope: ScopeId, name: &str) -> Result<&str, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(value) = self.records[id.0].variables.get(name) {
                return Ok(value.as_str());
            }
            current = self.records[id.0].parent;
        }
        Err(ScopeError::UnknownIdentifier(name.to_string()))
    }

    pub fn define_callable(&mut self, scope: ScopeId, callable: Callable) {
        self.records[scope.0]
            .callables
            .insert(callable.name().to_string(), callable);
    }

    pub fn callable(&self, scope: ScopeId, name: &str) -> Result<&Callable, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(callable) = self.records[id.0].callables.get(name) {
                return Ok(callable);
            }
            current = self.records[id.0].parent;
        }
        Err(ScopeError::UnknownIdentifier(name.to_string()))
    }

    pub fn define_type(&mut self, scope: ScopeId, decl: TypeDecl) {
        self.records[scope.0].types.insert(decl.name.clone(), decl);
    }

    pub fn type_decl(&self, scope: ScopeId, name: &str) -> Result<&TypeDecl, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(decl) = self.records[id.0].types.get(name) {
                return Ok(decl);
            }
            current = self.records[id.0].parent;
        }
        Err(ScopeError::UnknownIdentifier(name.to_string()))
    }
}
