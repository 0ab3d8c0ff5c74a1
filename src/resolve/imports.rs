//! Per-unit import table

use crate::ast::{CompilationUnit, ImportDecl};
use crate::consts::IMPLICIT_PACKAGE;

/// `import owner.SimpleName;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleImport {
    pub simple_name: String,
    pub owner: String,
}

impl SingleImport {
    pub fn full_name(&self) -> String {
        if self.owner.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.owner, self.simple_name)
        }
    }
}

/// Imports of one unit in declaration order, plus the implicit package
#[derive(Debug, Clone)]
pub struct ImportTable {
    singles: Vec<SingleImport>,
    wildcards: Vec<String>,
    statics: Vec<ImportDecl>,
    implicit_package: String,
}

impl Default for ImportTable {
    fn default() -> Self {
        Self::new(IMPLICIT_PACKAGE)
    }
}

impl ImportTable {
    pub fn new(implicit_package: impl Into<String>) -> Self {
        Self {
            singles: Vec::new(),
            wildcards: Vec::new(),
            statics: Vec::new(),
            implicit_package: implicit_package.into(),
        }
    }

    pub fn from_unit(unit: &CompilationUnit, implicit_package: &str) -> Self {
        let mut table = Self::new(implicit_package);
        for import in &unit.imports {
            table.add(import);
        }
        table
    }

    /// Static imports name members, not types; they are kept for reference only
    pub fn add(&mut self, import: &ImportDecl) {
        if import.is_static {
            self.statics.push(import.clone());
        } else if import.is_wildcard {
            self.add_wildcard(&import.name);
        } else {
            self.add_single(import.owner(), import.simple_name());
        }
    }

    pub fn add_single(&mut self, owner: &str, simple_name: &str) {
        let import = SingleImport {
            simple_name: simple_name.to_string(),
            owner: owner.to_string(),
        };
        if !self.singles.contains(&import) {
            self.singles.push(import);
        }
    }

    pub fn add_wildcard(&mut self, package: &str) {
        if !self.wildcards.iter().any(|p| p == package) {
            self.wildcards.push(package.to_string());
        }
    }

    /// Single-type imports whose simple name is `leading`
    pub fn singles_named<'a>(&'a self, leading: &'a str) -> impl Iterator<Item = &'a SingleImport> + 'a {
        self.singles.iter().filter(move |import| import.simple_name == leading)
    }

    pub fn singles(&self) -> &[SingleImport] {
        &self.singles
    }

    pub fn wildcards(&self) -> &[String] {
        &self.wildcards
    }

    pub fn statics(&self) -> &[ImportDecl] {
        &self.statics
    }

    pub fn implicit_package(&self) -> &str {
        &self.implicit_package
    }
}
