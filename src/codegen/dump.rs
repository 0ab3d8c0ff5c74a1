//! Indented tree dump for debugging
//!
//! One line per node: `Kind [: resolved-type] [= name or literal]`, two
//! spaces of indentation per level.

use std::fmt::Write as _;
use std::io;

use crate::ast::*;
use crate::error::Result;
use crate::types::Type;

use super::generator::CodeGenerator;

#[derive(Debug, Default)]
pub struct TreeDump {
    depth: usize,
    output: String,
    literals: CodeGenerator,
}

impl TreeDump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dump<W: io::Write>(mut self, unit: &CompilationUnit, sink: &mut W) -> Result<()> {
        self.unit(unit);
        sink.write_all(self.output.as_bytes())?;
        Ok(())
    }

    pub fn dump_to_string(mut self, unit: &CompilationUnit) -> String {
        self.unit(unit);
        self.output
    }

    fn line(&mut self, kind: &str, resolved: Option<&Type>, value: Option<&str>) {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
        self.output.push_str(kind);
        if let Some(ty) = resolved {
            let _ = write!(self.output, " : {}", ty);
        }
        if let Some(value) = value {
            let _ = write!(self.output, " = {}", value);
        }
        self.output.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn unit(&mut self, unit: &CompilationUnit) {
        self.line("CompilationUnit", None, None);
        self.nested(|d| {
            if let Some(package) = &unit.package_decl {
                d.line("PackageDecl", None, Some(&package.name));
            }
            for import in &unit.imports {
                let name = if import.is_wildcard {
                    format!("{}.*", import.name)
                } else {
                    import.name.clone()
                };
                d.line(if import.is_static { "StaticImport" } else { "ImportDecl" }, None, Some(&name));
            }
            for class in &unit.type_decls {
                d.class(class);
            }
        });
    }

    fn class(&mut self, class: &ClassDecl) {
        let kind = if class.is_interface() { "InterfaceDecl" } else { "ClassDecl" };
        let value = class.binary_name.as_deref().or(Some(class.name.as_str())).filter(|v| !v.is_empty());
        self.line(kind, None, value);
        self.nested(|d| {
            for annotation in &class.annotations {
                d.line("Annotation", annotation.resolved.as_ref(), Some(&annotation.name));
            }
            if let Some(superclass) = &class.superclass {
                d.type_ref("Extends", superclass);
            }
            for interface in &class.interfaces {
                d.type_ref("Implements", interface);
            }
            for member in &class.body {
                d.member(member);
            }
        });
    }

    fn type_ref(&mut self, kind: &str, type_ref: &TypeRef) {
        self.line(kind, type_ref.resolved.as_ref(), Some(&type_ref.to_string()));
    }

    fn member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Field(field) => {
                self.line("FieldDecl", None, None);
                self.nested(|d| {
                    d.type_ref("TypeRef", &field.type_ref);
                    d.declarators(&field.variables);
                });
            }
            ClassMember::Method(method) => {
                self.line("MethodDecl", None, Some(&method.name));
                self.nested(|d| {
                    if let Some(return_type) = &method.return_type {
                        d.type_ref("ReturnType", return_type);
                    }
                    for parameter in &method.parameters {
                        d.parameter(parameter);
                    }
                    if let Some(body) = &method.body {
                        d.block(body);
                    }
                });
            }
            ClassMember::Constructor(ctor) => {
                self.line("ConstructorDecl", None, Some(&ctor.name));
                self.nested(|d| {
                    for parameter in &ctor.parameters {
                        d.parameter(parameter);
                    }
                    d.block(&ctor.body);
                });
            }
            ClassMember::Initializer(init) => {
                self.line(if init.is_static { "StaticInitializer" } else { "Initializer" }, None, None);
                self.nested(|d| d.block(&init.body));
            }
            ClassMember::Class(class) => self.class(class),
            ClassMember::Comment(comment) => self.line("Comment", None, Some(&comment.text)),
        }
    }

    fn parameter(&mut self, parameter: &Parameter) {
        self.line("Parameter", None, Some(&parameter.name));
        self.nested(|d| d.type_ref("TypeRef", &parameter.type_ref));
    }

    fn declarators(&mut self, variables: &[VariableDeclarator]) {
        for var in variables {
            self.line("VariableDeclarator", None, Some(&var.name));
            if let Some(init) = &var.initializer {
                self.nested(|d| d.expr(init));
            }
        }
    }

    fn block(&mut self, block: &Block) {
        self.line("Block", None, None);
        self.nested(|d| {
            for stmt in &block.statements {
                d.stmt(stmt);
            }
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => return self.block(block),
            Stmt::LocalClass(class) => return self.class(class),
            Stmt::Labeled(s) => self.line(stmt.kind_name(), None, Some(&s.label)),
            Stmt::Break(BreakStmt { label, .. }) | Stmt::Continue(ContinueStmt { label, .. }) => {
                self.line(stmt.kind_name(), None, label.as_deref())
            }
            Stmt::Comment(comment) => self.line(stmt.kind_name(), None, Some(&comment.text)),
            _ => self.line(stmt.kind_name(), None, None),
        }

        self.nested(|d| match stmt {
            Stmt::Expression(s) => d.expr(&s.expr),
            Stmt::Declaration(decl) => {
                d.type_ref("TypeRef", &decl.type_ref);
                d.declarators(&decl.variables);
            }
            Stmt::If(s) => {
                d.expr(&s.condition);
                d.stmt(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    d.stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                d.expr(&s.condition);
                d.stmt(&s.body);
            }
            Stmt::DoWhile(s) => {
                d.stmt(&s.body);
                d.expr(&s.condition);
            }
            Stmt::For(s) => {
                for init in &s.init {
                    d.stmt(init);
                }
                if let Some(condition) = &s.condition {
                    d.expr(condition);
                }
                for update in &s.update {
                    d.expr(&update.expr);
                }
                d.stmt(&s.body);
            }
            Stmt::Switch(s) => {
                d.expr(&s.expression);
                for case in &s.cases {
                    d.line(if case.labels.is_empty() { "Default" } else { "Case" }, None, None);
                    d.nested(|d| {
                        for label in &case.labels {
                            d.expr(label);
                        }
                        for stmt in &case.statements {
                            d.stmt(stmt);
                        }
                    });
                }
            }
            Stmt::Return(s) => {
                if let Some(value) = &s.value {
                    d.expr(value);
                }
            }
            Stmt::Try(s) => {
                d.block(&s.try_block);
                for catch in &s.catch_clauses {
                    d.line("Catch", None, None);
                    d.nested(|d| {
                        d.parameter(&catch.parameter);
                        d.block(&catch.block);
                    });
                }
                if let Some(finally) = &s.finally_block {
                    d.block(finally);
                }
            }
            Stmt::Throw(s) => d.expr(&s.expr),
            Stmt::Assert(s) => {
                d.expr(&s.condition);
                if let Some(message) = &s.message {
                    d.expr(message);
                }
            }
            Stmt::Synchronized(s) => {
                d.expr(&s.lock);
                d.block(&s.body);
            }
            Stmt::Labeled(s) => d.stmt(&s.statement),
            Stmt::Block(_)
            | Stmt::LocalClass(_)
            | Stmt::Break(_)
            | Stmt::Continue(_)
            | Stmt::Comment(_)
            | Stmt::Empty => {}
        });
    }

    fn expr(&mut self, expr: &Expr) {
        let kind = expr.kind_name();
        match expr {
            Expr::Literal(_) => {
                let text = self.literals.expression(expr);
                self.line(kind, None, Some(&text));
            }
            Expr::Identifier(e) => self.line(kind, e.resolved.as_ref(), Some(&e.name)),
            Expr::Binary(e) => self.line(kind, None, Some(e.operator.symbol())),
            Expr::Unary(e) => self.line(kind, None, Some(e.operator.symbol())),
            Expr::Assignment(e) => self.line(kind, None, Some(e.operator.symbol())),
            Expr::MethodCall(e) => self.line(kind, None, Some(&e.name)),
            Expr::FieldAccess(e) => self.line(kind, None, Some(&e.name)),
            _ => self.line(kind, None, None),
        }

        self.nested(|d| match expr {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::Binary(e) => {
                d.expr(&e.left);
                d.expr(&e.right);
            }
            Expr::Unary(e) => d.expr(&e.operand),
            Expr::Assignment(e) => {
                d.expr(&e.target);
                d.expr(&e.value);
            }
            Expr::MethodCall(e) => {
                if let Some(target) = &e.target {
                    d.expr(target);
                }
                for argument in &e.arguments {
                    d.expr(argument);
                }
            }
            Expr::FieldAccess(e) => d.expr(&e.target),
            Expr::ArrayAccess(e) => {
                d.expr(&e.array);
                d.expr(&e.index);
            }
            Expr::Cast(e) => {
                d.type_ref("TypeRef", &e.target_type);
                d.expr(&e.expr);
            }
            Expr::InstanceOf(e) => {
                d.expr(&e.expr);
                d.type_ref("TypeRef", &e.target_type);
            }
            Expr::Conditional(e) => {
                d.expr(&e.condition);
                d.expr(&e.then_expr);
                d.expr(&e.else_expr);
            }
            Expr::New(e) => {
                d.type_ref("TypeRef", &e.target_type);
                for argument in &e.arguments {
                    d.expr(argument);
                }
                if let Some(body) = &e.anonymous_body {
                    d.class(body);
                }
            }
            Expr::NewArray(e) => {
                d.type_ref("TypeRef", &e.element_type);
                for dimension in &e.dimensions {
                    d.expr(dimension);
                }
                if let Some(init) = &e.initializer {
                    for value in &init.values {
                        d.expr(value);
                    }
                }
            }
            Expr::ArrayInitializer(e) => {
                for value in &e.values {
                    d.expr(value);
                }
            }
            Expr::Parenthesized(e) => d.expr(&e.expr),
        });
    }
}
