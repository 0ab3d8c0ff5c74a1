// Common test utilities
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use recast::ast::*;
use recast::{Error, Result, SourceParser};

/// Parser collaborator backed by a table of known sources
#[derive(Default)]
pub struct TableParser {
    units: HashMap<String, CompilationUnit>,
}

impl TableParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<String>, unit: CompilationUnit) -> Self {
        self.units.insert(source.into(), unit);
        self
    }
}

impl SourceParser for TableParser {
    fn parse(&self, source: &str) -> Result<CompilationUnit> {
        self.units
            .get(source)
            .cloned()
            .ok_or_else(|| Error::malformed(1, 1, "unknown source"))
    }
}

/// `import java.util.*; class A { Hashtable t; }` in package `p`
pub fn hashtable_unit() -> CompilationUnit {
    CompilationUnit::new()
        .with_package("p")
        .with_import(ImportDecl::wildcard("java.util"))
        .with_type(ClassDecl::class("A").with_member(ClassMember::Field(FieldDecl::new(
            TypeRef::named("Hashtable"),
            "t",
            None,
        ))))
}

/// Two methods with one anonymous `Runnable` each, `first` declared first
pub fn two_anonymous_unit() -> CompilationUnit {
    let anonymous = |label: &str| {
        let run = MethodDecl::new(
            "run",
            Some(TypeRef::named("void")),
            Some(Block::new(vec![Stmt::expr(Expr::call(
                None,
                "log",
                vec![Expr::string(label)],
            ))])),
        )
        .with_modifiers(vec![Modifier::Public]);
        Stmt::var(
            TypeRef::named("Runnable"),
            "r",
            Some(Expr::new_object(
                TypeRef::named("Runnable"),
                Vec::new(),
                Some(ClassDecl::anonymous(vec![ClassMember::Method(run)])),
            )),
        )
    };
    let method = |name: &str| {
        ClassMember::Method(MethodDecl::new(
            name,
            Some(TypeRef::named("void")),
            Some(Block::new(vec![anonymous(name)])),
        ))
    };
    let log = MethodDecl::new("log", Some(TypeRef::named("void")), Some(Block::new(Vec::new())))
        .with_modifiers(vec![Modifier::Static])
        .with_param(Parameter::new(TypeRef::named("String"), "s"));

    CompilationUnit::new().with_package("p").with_type(
        ClassDecl::class("A")
            .with_member(method("first"))
            .with_member(method("second"))
            .with_member(ClassMember::Method(log)),
    )
}

/// Minimal class file: magic, version, constant pool, access, this, super, interfaces
pub fn class_file_bytes(this: &str, superclass: &str, interfaces: &[&str], access: u16) -> Vec<u8> {
    let mut names = vec![this, superclass];
    names.extend_from_slice(interfaces);

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&[0, 0, 0, 52]);
    out.extend_from_slice(&((names.len() * 2 + 1) as u16).to_be_bytes());
    for (i, name) in names.iter().enumerate() {
        let internal = name.replace('.', "/");
        out.push(1);
        out.extend_from_slice(&(internal.len() as u16).to_be_bytes());
        out.extend_from_slice(internal.as_bytes());
        out.push(7);
        out.extend_from_slice(&((i * 2 + 1) as u16).to_be_bytes());
    }
    out.extend_from_slice(&access.to_be_bytes());
    out.extend_from_slice(&2u16.to_be_bytes());
    out.extend_from_slice(&4u16.to_be_bytes());
    out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
    for i in 0..interfaces.len() {
        out.extend_from_slice(&((i * 2 + 6) as u16).to_be_bytes());
    }
    out
}

/// Write `bytes` to `root/<binary name as path>.class`
pub fn write_class(root: &Path, name: &str, bytes: &[u8]) {
    let path = root.join(format!("{}.class", name.replace('.', "/")));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}
