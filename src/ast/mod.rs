//! Abstract Syntax Tree (AST) for Java-shaped programs
//!
//! The tree is produced by a parser collaborator, annotated in place by the
//! traversal (resolved types, binary class names) and consumed by the code
//! generator. Children are owned; a node's parent is the node whose field or
//! list holds it.

mod nodes;
pub mod mutate;

pub use nodes::*;

use std::fmt;

/// Source location information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// Span of source code (start and end locations)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn from_to(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location::new(start_line, start_col, 0),
            end: Location::new(end_line, end_col, 0),
        }
    }

    /// Span of a node synthesized by a rewrite rather than parsed
    pub fn synthetic() -> Self {
        Self::default()
    }
}

/// Implemented by every node that carries a source span
pub trait AstNode {
    fn span(&self) -> Span;

    fn location(&self) -> Location {
        self.span().start
    }
}

/// Root of one parsed file
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub header_comments: Vec<Comment>,
    pub package_decl: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub type_decls: Vec<ClassDecl>,
    pub span: Span,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared package, empty for the default package
    pub fn package_name(&self) -> &str {
        self.package_decl.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn with_package(mut self, name: impl Into<String>) -> Self {
        self.package_decl = Some(PackageDecl::new(name));
        self
    }

    pub fn with_import(mut self, import: ImportDecl) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_type(mut self, class: ClassDecl) -> Self {
        self.type_decls.push(class);
        self
    }

    /// Find a top-level type by simple name
    pub fn find_type(&self, name: &str) -> Option<&ClassDecl> {
        self.type_decls.iter().find(|t| t.name == name)
    }
}

impl AstNode for CompilationUnit {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref package) = self.package_decl {
            writeln!(f, "{}", package)?;
        }

        for import in &self.imports {
            writeln!(f, "{}", import)?;
        }

        for type_decl in &self.type_decls {
            writeln!(f, "{}", type_decl)?;
        }

        Ok(())
    }
}
