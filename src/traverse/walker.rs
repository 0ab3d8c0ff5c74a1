//! Depth-first traversal of a compilation unit
//!
//! The walker resolves every type name it meets, keeps the scope and class
//! stacks in step with the tree, and offers each assignment site to the
//! handler registry. Children of a site are visited before the site itself;
//! a replacement is spliced in and not visited again.

use crate::ast::*;
use crate::consts::OBJECT_CLASS;
use crate::error::{Error, Result};
use crate::resolve::{ImportTable, NameResolver, ResolutionScope};
use crate::summary::Numbering;
use crate::types::Type;

use super::handlers::{incompatible, AssignmentSite, HandlerContext, HandlerRegistry, Replacement};
use super::scope::Tracker;

pub struct Walker<'a> {
    resolver: &'a NameResolver,
    registry: &'a mut HandlerRegistry,
    numbering: &'a Numbering,
    imports: &'a ImportTable,
    unit_package: String,
    tracker: Tracker,
}

impl<'a> Walker<'a> {
    pub fn new(
        resolver: &'a NameResolver,
        registry: &'a mut HandlerRegistry,
        numbering: &'a Numbering,
        imports: &'a ImportTable,
        unit_package: &str,
    ) -> Self {
        Self {
            resolver,
            registry,
            numbering,
            imports,
            unit_package: unit_package.to_string(),
            tracker: Tracker::new(),
        }
    }

    /// Walk every top-level class of `unit`
    pub fn traverse(mut self, unit: &mut CompilationUnit) -> Result<()> {
        for class in &mut unit.type_decls {
            self.class(class)?;
        }
        debug_assert_eq!(self.tracker.scopes.depth(), 1);
        debug_assert_eq!(self.tracker.classes.depth(), 0);
        Ok(())
    }

    fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.tracker.scopes.push_frame();
        let result = f(self);
        self.tracker.scopes.pop_frame();
        result
    }

    fn in_class<R>(&mut self, class: Type, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.tracker.classes.push(class);
        let result = f(self);
        self.tracker.classes.leave_class();
        result
    }

    fn scope(&self) -> ResolutionScope<'_> {
        let package = self.tracker.classes.current_package(&self.unit_package);
        ResolutionScope::new(self.imports, package).in_class(self.tracker.current_class())
    }

    fn dispatch(&mut self, site: &AssignmentSite<'_>) -> Result<Option<(String, Replacement)>> {
        let cx = HandlerContext {
            tracker: &self.tracker,
            resolver: self.resolver,
            imports: self.imports,
            unit_package: &self.unit_package,
        };
        self.registry.dispatch(site, &cx)
    }

    fn object(&self) -> Result<Type> {
        self.resolver
            .lookup_canonical(OBJECT_CLASS)
            .ok_or_else(|| Error::class_not_found(OBJECT_CLASS))
    }

    // Types

    fn resolve_type_ref(&mut self, type_ref: &mut TypeRef) -> Result<()> {
        for arg in &mut type_ref.type_args {
            match arg {
                TypeArg::Type(inner) => self.resolve_type_ref(inner)?,
                TypeArg::Wildcard(wildcard) => {
                    if let Some((_, bound)) = wildcard.bound.as_mut() {
                        self.resolve_type_ref(bound)?;
                    }
                }
            }
        }

        // type variables and local classes shadow everything else
        let ty = match self.tracker.scopes.lookup_type_variable(&type_ref.name) {
            Some(bound) => self.resolver.cache().intern_array(bound, type_ref.array_dims),
            None => self.resolver.resolve_type_ref(type_ref, &self.scope())?,
        };
        type_ref.resolved = Some(ty);
        Ok(())
    }

    /// Declared type of a variable, counting dimensions written after its name
    fn declared_type(&self, type_ref: &TypeRef, extra_dims: usize) -> Option<Type> {
        let base = type_ref.resolved.as_ref()?;
        Some(self.resolver.cache().intern_array(base, extra_dims))
    }

    fn type_params(&mut self, params: &mut [TypeParam]) -> Result<()> {
        if params.is_empty() {
            return Ok(());
        }
        // bounds may mention any parameter of the same list
        let object = self.object()?;
        for param in params.iter() {
            self.tracker.scopes.bind_type_variable(param.name.clone(), object.clone());
        }
        for param in params.iter_mut() {
            for bound in &mut param.bounds {
                self.resolve_type_ref(bound)?;
            }
            if let Some(erasure) = param.bounds.first().and_then(|bound| bound.resolved.clone()) {
                self.tracker.scopes.bind_type_variable(param.name.clone(), erasure);
            }
        }
        Ok(())
    }

    fn annotations(&mut self, annotations: &mut [Annotation]) -> Result<()> {
        for annotation in annotations {
            let ty = self
                .resolver
                .resolve(&annotation.name, &self.scope())
                .map_err(|err| err.at(annotation.location()))?;
            annotation.resolved = Some(ty);
            for argument in &mut annotation.arguments {
                match argument {
                    AnnotationArg::Value(value) | AnnotationArg::Named(_, value) => self.expr(value)?,
                }
            }
        }
        Ok(())
    }

    // Declarations

    fn class(&mut self, decl: &mut ClassDecl) -> Result<()> {
        let location = decl.location();
        let numbering = self.numbering;
        let binary = decl
            .summary_id
            .and_then(|id| numbering.binary_name(id))
            .ok_or_else(|| Error::transform(format!("{} was not summarized", decl)).at(location))?;
        let ty = self
            .resolver
            .lookup_canonical(binary)
            .ok_or_else(|| Error::class_not_found(binary).at(location))?;
        log::trace!("entering {} as {}", decl, binary);
        decl.binary_name = Some(binary.to_string());

        self.annotations(&mut decl.annotations)?;
        self.scoped(|w| {
            w.type_params(&mut decl.type_params)?;
            if let Some(superclass) = decl.superclass.as_mut() {
                w.resolve_type_ref(superclass)?;
            }
            for interface in &mut decl.interfaces {
                w.resolve_type_ref(interface)?;
            }
            w.in_class(ty, |w| w.class_body(&mut decl.body))
        })
    }

    fn class_body(&mut self, members: &mut [ClassMember]) -> Result<()> {
        self.scoped(|w| {
            // fields are visible to every member, whatever the declaration order
            for member in members.iter_mut() {
                if let ClassMember::Field(field) = member {
                    w.resolve_type_ref(&mut field.type_ref)?;
                    for var in &field.variables {
                        if let Some(ty) = w.declared_type(&field.type_ref, var.array_dims) {
                            w.tracker.scopes.bind_variable(var.name.clone(), ty);
                        }
                    }
                }
            }

            for member in members.iter_mut() {
                match member {
                    ClassMember::Field(field) => {
                        w.annotations(&mut field.annotations)?;
                        for var in &mut field.variables {
                            w.declarator(&field.modifiers, &field.type_ref, var)?;
                        }
                    }
                    ClassMember::Method(method) => w.method(method)?,
                    ClassMember::Constructor(ctor) => {
                        w.annotations(&mut ctor.annotations)?;
                        w.scoped(|w| {
                            w.parameters(&mut ctor.parameters)?;
                            for thrown in &mut ctor.throws {
                                w.resolve_type_ref(thrown)?;
                            }
                            w.block(&mut ctor.body)
                        })?;
                    }
                    ClassMember::Initializer(init) => w.block(&mut init.body)?,
                    ClassMember::Class(nested) => w.class(nested)?,
                    ClassMember::Comment(_) => {}
                }
            }
            Ok(())
        })
    }

    fn method(&mut self, method: &mut MethodDecl) -> Result<()> {
        self.annotations(&mut method.annotations)?;
        self.scoped(|w| {
            w.type_params(&mut method.type_params)?;
            if let Some(return_type) = method.return_type.as_mut() {
                w.resolve_type_ref(return_type)?;
            }
            w.parameters(&mut method.parameters)?;
            for thrown in &mut method.throws {
                w.resolve_type_ref(thrown)?;
            }
            match method.body.as_mut() {
                Some(body) => w.block(body),
                None => Ok(()),
            }
        })
    }

    fn parameters(&mut self, parameters: &mut [Parameter]) -> Result<()> {
        for parameter in parameters {
            self.parameter(parameter)?;
        }
        Ok(())
    }

    fn parameter(&mut self, parameter: &mut Parameter) -> Result<()> {
        self.annotations(&mut parameter.annotations)?;
        self.resolve_type_ref(&mut parameter.type_ref)?;
        let extra = usize::from(parameter.varargs);
        if let Some(ty) = self.declared_type(&parameter.type_ref, extra) {
            self.tracker.scopes.bind_variable(parameter.name.clone(), ty);
        }
        Ok(())
    }

    /// Offer `Type name = value` to the handlers
    fn declarator(&mut self, modifiers: &[Modifier], type_ref: &TypeRef, var: &mut VariableDeclarator) -> Result<()> {
        let location = var.location();
        let outcome = match var.initializer.as_mut() {
            None => return Ok(()),
            Some(value) => {
                self.expr(value)?;
                let declared = self.declared_type(type_ref, var.array_dims);
                let site = AssignmentSite::Declarator {
                    modifiers,
                    type_ref,
                    declared: declared.as_ref(),
                    name: &var.name,
                    value,
                    location,
                };
                self.dispatch(&site)?
            }
        };

        match outcome {
            None => Ok(()),
            Some((_, Replacement::Declarator(replacement))) => {
                *var = replacement;
                Ok(())
            }
            Some((_, Replacement::Expr(value))) => {
                var.initializer = Some(value);
                Ok(())
            }
            Some((handler, other)) => Err(incompatible(handler, "declarator", &other).at(location)),
        }
    }

    fn local_declaration(&mut self, decl: &mut VarDeclStmt) -> Result<()> {
        self.resolve_type_ref(&mut decl.type_ref)?;
        for var in &mut decl.variables {
            self.declarator(&decl.modifiers, &decl.type_ref, var)?;
            if let Some(ty) = self.declared_type(&decl.type_ref, var.array_dims) {
                self.tracker.scopes.bind_variable(var.name.clone(), ty);
            }
        }
        Ok(())
    }

    // Statements

    fn block(&mut self, block: &mut Block) -> Result<()> {
        self.scoped(|w| w.statements(&mut block.statements))
    }

    fn statements(&mut self, statements: &mut Vec<Stmt>) -> Result<()> {
        let mut i = 0;
        while i < statements.len() {
            match self.statement(&mut statements[i])? {
                Some(replacement) => {
                    let count = replacement.len();
                    statements.splice(i..=i, replacement);
                    i += count;
                }
                None => i += 1,
            }
        }
        Ok(())
    }

    /// A statement that is the whole body of an `if`, loop or label
    fn nested_statement(&mut self, stmt: &mut Stmt) -> Result<()> {
        if let Some(mut replacement) = self.statement(stmt)? {
            *stmt = if replacement.len() == 1 {
                replacement.remove(0)
            } else {
                Stmt::Block(Block::new(replacement))
            };
        }
        Ok(())
    }

    /// Visit `stmt`; `Some` carries the statements that replace it
    fn statement(&mut self, stmt: &mut Stmt) -> Result<Option<Vec<Stmt>>> {
        match stmt {
            Stmt::Expression(s) => {
                if let Expr::Assignment(_) = s.expr {
                    return self.assignment_statement(s);
                }
                self.expr(&mut s.expr)?;
            }
            Stmt::Declaration(decl) => self.local_declaration(decl)?,
            Stmt::LocalClass(class) => {
                let numbering = self.numbering;
                let local = class
                    .summary_id
                    .and_then(|id| numbering.binary_name(id))
                    .and_then(|binary| self.resolver.lookup_canonical(binary));
                if let Some(ty) = local {
                    self.tracker.scopes.bind_type_variable(class.name.clone(), ty);
                }
                self.class(class)?;
            }
            Stmt::If(s) => {
                self.expr(&mut s.condition)?;
                self.nested_statement(&mut s.then_branch)?;
                if let Some(else_branch) = s.else_branch.as_mut() {
                    self.nested_statement(else_branch)?;
                }
            }
            Stmt::While(s) => {
                self.expr(&mut s.condition)?;
                self.nested_statement(&mut s.body)?;
            }
            Stmt::DoWhile(s) => {
                self.nested_statement(&mut s.body)?;
                self.expr(&mut s.condition)?;
            }
            Stmt::For(s) => self.scoped(|w| {
                for init in &mut s.init {
                    w.for_init(init)?;
                }
                if let Some(condition) = s.condition.as_mut() {
                    w.expr(condition)?;
                }
                for update in &mut s.update {
                    w.expr(&mut update.expr)?;
                }
                w.nested_statement(&mut s.body)
            })?,
            Stmt::Switch(s) => {
                self.expr(&mut s.expression)?;
                self.scoped(|w| {
                    for case in &mut s.cases {
                        for label in &mut case.labels {
                            w.expr(label)?;
                        }
                        w.statements(&mut case.statements)?;
                    }
                    Ok(())
                })?;
            }
            Stmt::Return(s) => {
                if let Some(value) = s.value.as_mut() {
                    self.expr(value)?;
                }
            }
            Stmt::Try(s) => {
                self.block(&mut s.try_block)?;
                for catch in &mut s.catch_clauses {
                    self.scoped(|w| {
                        w.parameter(&mut catch.parameter)?;
                        w.block(&mut catch.block)
                    })?;
                }
                if let Some(finally) = s.finally_block.as_mut() {
                    self.block(finally)?;
                }
            }
            Stmt::Throw(s) => self.expr(&mut s.expr)?,
            Stmt::Assert(s) => {
                self.expr(&mut s.condition)?;
                if let Some(message) = s.message.as_mut() {
                    self.expr(message)?;
                }
            }
            Stmt::Synchronized(s) => {
                self.expr(&mut s.lock)?;
                self.block(&mut s.body)?;
            }
            Stmt::Labeled(s) => self.nested_statement(&mut s.statement)?,
            Stmt::Block(block) => self.block(block)?,
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Comment(_) | Stmt::Empty => {}
        }
        Ok(None)
    }

    fn assignment_statement(&mut self, stmt: &mut ExprStmt) -> Result<Option<Vec<Stmt>>> {
        let location = stmt.span.start;
        let outcome = match &mut stmt.expr {
            Expr::Assignment(assign) => {
                self.expr(&mut assign.target)?;
                self.expr(&mut assign.value)?;
                let site = AssignmentSite::Statement {
                    target: &assign.target,
                    operator: assign.operator,
                    value: &assign.value,
                    location,
                };
                self.dispatch(&site)?
            }
            other => {
                self.expr(other)?;
                None
            }
        };

        match outcome {
            None => Ok(None),
            Some((_, Replacement::Statements(statements))) => Ok(Some(statements)),
            Some((_, Replacement::Expr(expr))) => {
                stmt.expr = expr;
                Ok(None)
            }
            Some((handler, other)) => Err(incompatible(handler, "statement", &other).at(location)),
        }
    }

    /// A variable's declared type, or the class a name like `Math` in
    /// `Math.abs(x)` refers to
    fn identifier_type(&self, name: &str) -> Option<Type> {
        if let Some(ty) = self.tracker.lookup_variable(name) {
            return Some(ty.clone());
        }
        if let Some(local) = self.tracker.scopes.lookup_type_variable(name) {
            return Some(local.clone());
        }
        match self.resolver.resolve(name, &self.scope()) {
            Ok(ty) => Some(ty),
            Err(err) => {
                // not a type: an inherited field or a name the unit never declares
                log::trace!("identifier '{}' left untyped: {}", name, err);
                None
            }
        }
    }

    fn for_init(&mut self, init: &mut Stmt) -> Result<()> {
        match init {
            Stmt::Expression(s) => self.expr(&mut s.expr),
            Stmt::Declaration(decl) => self.local_declaration(decl),
            other => Err(Error::transform(format!("{} in a for header", other.kind_name())).at(other.location())),
        }
    }

    // Expressions

    fn expr(&mut self, expr: &mut Expr) -> Result<()> {
        match expr {
            Expr::Literal(_) => {}
            Expr::Identifier(id) => id.resolved = self.identifier_type(&id.name),
            Expr::Binary(e) => {
                self.expr(&mut e.left)?;
                self.expr(&mut e.right)?;
            }
            Expr::Unary(e) => self.expr(&mut e.operand)?,
            Expr::Assignment(_) => return self.assignment_expression(expr),
            Expr::MethodCall(e) => {
                if let Some(target) = e.target.as_mut() {
                    self.expr(target)?;
                }
                for argument in &mut e.arguments {
                    self.expr(argument)?;
                }
            }
            Expr::FieldAccess(e) => self.expr(&mut e.target)?,
            Expr::ArrayAccess(e) => {
                self.expr(&mut e.array)?;
                self.expr(&mut e.index)?;
            }
            Expr::Cast(e) => {
                self.resolve_type_ref(&mut e.target_type)?;
                self.expr(&mut e.expr)?;
            }
            Expr::InstanceOf(e) => {
                self.expr(&mut e.expr)?;
                self.resolve_type_ref(&mut e.target_type)?;
            }
            Expr::Conditional(e) => {
                self.expr(&mut e.condition)?;
                self.expr(&mut e.then_expr)?;
                self.expr(&mut e.else_expr)?;
            }
            Expr::New(e) => {
                self.resolve_type_ref(&mut e.target_type)?;
                for argument in &mut e.arguments {
                    self.expr(argument)?;
                }
                if let Some(body) = e.anonymous_body.as_mut() {
                    self.class(body)?;
                }
            }
            Expr::NewArray(e) => {
                self.resolve_type_ref(&mut e.element_type)?;
                for dimension in &mut e.dimensions {
                    self.expr(dimension)?;
                }
                if let Some(init) = e.initializer.as_mut() {
                    for value in &mut init.values {
                        self.expr(value)?;
                    }
                }
            }
            Expr::ArrayInitializer(e) => {
                for value in &mut e.values {
                    self.expr(value)?;
                }
            }
            Expr::Parenthesized(e) => self.expr(&mut e.expr)?,
        }
        Ok(())
    }

    /// An assignment used as a value or in a `for` header
    fn assignment_expression(&mut self, expr: &mut Expr) -> Result<()> {
        let location = expr.location();
        let outcome = match expr {
            Expr::Assignment(assign) => {
                self.expr(&mut assign.target)?;
                self.expr(&mut assign.value)?;
                let site = AssignmentSite::Expression {
                    target: &assign.target,
                    operator: assign.operator,
                    value: &assign.value,
                    location,
                };
                self.dispatch(&site)?
            }
            _ => None,
        };

        match outcome {
            None => Ok(()),
            Some((_, Replacement::Expr(replacement))) => {
                *expr = replacement;
                Ok(())
            }
            Some((handler, other)) => Err(incompatible(handler, "expression", &other).at(location)),
        }
    }
}
