pub mod compile;
pub mod eval;
pub mod http;
pub mod routes;
pub mod scope;
pub mod send;
pub mod text;
pub mod trace;

use crate::config::GlobalEnv;
use crate::model::{ClassReport, FileReport, MethodReport, SendReport};
use anyhow::Result;
use tree_sitter::Parser;

use compile::{CompileError, CompiledFile};
use routes::RouteTable;
use scope::{Callable, ScopeArena, TypeDecl};
use trace::TraceSink;

/// Per-file static analyzer. Owns the parser and the global constants
/// seeded into every file's root scope.
pub struct Analyzer {
    parser: Parser,
    globals: GlobalEnv,
}

impl Analyzer {
    pub fn new(globals: GlobalEnv) -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser, globals })
    }

    /// Parse and compile one source file. Each call builds a fresh
    /// scope arena, so files never leak state into each other.
    pub fn analyze(&mut self, source: &str, sink: &mut dyn TraceSink) -> Result<FileAnalysis> {
        let tree = self.parser.parse(source, None).ok_or(CompileError::Parse)?;
        let mut scopes = ScopeArena::new();
        let root_scope = scopes.push(None);
        for (name, value) in self.globals.entries() {
            scopes.define_variable(root_scope, name, value);
        }
        let file = compile::compile_file(tree.root_node(), source, &mut scopes, root_scope, sink)?;
        Ok(FileAnalysis { scopes, file })
    }
}

/// Everything recovered from one file: the compiled declarations plus
/// the arena their scopes live in.
pub struct FileAnalysis {
    pub scopes: ScopeArena,
    pub file: CompiledFile,
}

impl FileAnalysis {
    /// File-level class declarations in source order.
    pub fn classes(&self) -> impl Iterator<Item = &TypeDecl> + '_ {
        self.file
            .classes
            .iter()
            .filter_map(|name| self.scopes.type_decl(self.file.scope, name).ok())
    }

    /// Flatten the recovered facts into a serializable report.
    pub fn report(&self, path: &str, routes: &RouteTable) -> FileReport {
        let mut classes = Vec::new();
        for decl in self.classes() {
            let mut methods = Vec::new();
            for name in &decl.members {
                let Ok(Callable::Block(method)) = self.scopes.callable(decl.scope, name) else {
                    continue;
                };
                let sends = method
                    .sends
                    .iter()
                    .map(|site| SendReport {
                        line: site.line,
                        verb: site.verb.map(|verb| verb.as_str().to_string()),
                        raw_path: site.raw_path.clone(),
                        path: site.resolved_path.clone(),
                        route: site
                            .resolved_path
                            .as_deref()
                            .and_then(|path| routes.get_var_for_path(path))
                            .map(str::to_string),
                        verify_count: site.verify_count,
                        expected_status: site.expected_status.clone(),
                    })
                    .collect();
                methods.push(MethodReport {
                    name: method.name.clone(),
                    line: method.start_line,
                    sends,
                });
            }
            classes.push(ClassReport {
                name: decl.name.clone(),
                base: (!decl.base_type.is_empty()).then(|| decl.base_type.clone()),
                attributes: decl.attributes.clone(),
                methods,
            });
        }
        FileReport {
            path: path.to_string(),
            usings: self.file.usings.clone(),
            classes,
        }
    }
}
