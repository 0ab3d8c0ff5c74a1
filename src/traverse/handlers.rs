//! Assignment handlers and traversal rules

use crate::ast::{AssignmentOp, CompilationUnit, Expr, Location, Modifier, Stmt, TypeRef, VariableDeclarator};
use crate::error::{Error, Result};
use crate::resolve::{ImportTable, NameResolver, ResolutionScope};
use crate::types::Type;

use super::scope::Tracker;

/// An assignment-shaped construct met by the traversal
#[derive(Debug, Clone, Copy)]
pub enum AssignmentSite<'a> {
    /// `target op value;` as a statement of its own
    Statement {
        target: &'a Expr,
        operator: AssignmentOp,
        value: &'a Expr,
        location: Location,
    },
    /// An assignment nested in a larger expression, or in a `for` header
    Expression {
        target: &'a Expr,
        operator: AssignmentOp,
        value: &'a Expr,
        location: Location,
    },
    /// `Type name = value` in a field or local declaration
    Declarator {
        modifiers: &'a [Modifier],
        type_ref: &'a TypeRef,
        declared: Option<&'a Type>,
        name: &'a str,
        value: &'a Expr,
        location: Location,
    },
}

impl AssignmentSite<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AssignmentSite::Statement { .. } => "statement",
            AssignmentSite::Expression { .. } => "expression",
            AssignmentSite::Declarator { .. } => "declarator",
        }
    }

    pub fn location(&self) -> Location {
        match self {
            AssignmentSite::Statement { location, .. }
            | AssignmentSite::Expression { location, .. }
            | AssignmentSite::Declarator { location, .. } => *location,
        }
    }

    /// Right-hand side of the assignment
    pub fn value(&self) -> &Expr {
        match self {
            AssignmentSite::Statement { value, .. }
            | AssignmentSite::Expression { value, .. }
            | AssignmentSite::Declarator { value, .. } => value,
        }
    }
}

/// Subtree a handler wants spliced in place of the site
#[derive(Debug, Clone)]
pub enum Replacement {
    Statements(Vec<Stmt>),
    Expr(Expr),
    Declarator(VariableDeclarator),
}

impl Replacement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Replacement::Statements(_) => "statements",
            Replacement::Expr(_) => "expression",
            Replacement::Declarator(_) => "declarator",
        }
    }
}

/// What a handler may ask about the position of a site
pub struct HandlerContext<'a> {
    pub(crate) tracker: &'a Tracker,
    pub(crate) resolver: &'a NameResolver,
    pub(crate) imports: &'a ImportTable,
    pub(crate) unit_package: &'a str,
}

impl<'a> HandlerContext<'a> {
    pub fn lookup_variable(&self, name: &str) -> Option<&Type> {
        self.tracker.lookup_variable(name)
    }

    pub fn current_class(&self) -> Option<&Type> {
        self.tracker.current_class()
    }

    pub fn current_package(&self) -> &str {
        self.tracker.classes.current_package(self.unit_package)
    }

    /// Resolve a type name as if it were written at the site
    pub fn resolve(&self, name: &str) -> Result<Type> {
        if let Some(ty) = self.tracker.scopes.lookup_type_variable(name) {
            return Ok(ty.clone());
        }
        let scope = ResolutionScope::new(self.imports, self.current_package())
            .in_class(self.current_class());
        self.resolver.resolve(name, &scope)
    }
}

/// Intercepts assignment sites during the traversal
pub trait AssignmentHandler {
    fn name(&self) -> &str;

    /// `Ok(None)` leaves the site alone
    fn on_assignment(
        &mut self,
        site: &AssignmentSite<'_>,
        cx: &HandlerContext<'_>,
    ) -> Result<Option<Replacement>>;
}

/// Setup and teardown around one traversal
pub trait Rule {
    fn name(&self) -> &str;

    fn before_traversal(&mut self, _registry: &mut HandlerRegistry, _unit: &mut CompilationUnit) -> Result<()> {
        Ok(())
    }

    fn after_traversal(&mut self, _unit: &mut CompilationUnit) -> Result<()> {
        Ok(())
    }
}

/// Handle for removing a registered handler or rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u32);

/// Ordered handlers and rules
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<(RegistrationId, Box<dyn AssignmentHandler>)>,
    rules: Vec<(RegistrationId, Box<dyn Rule>)>,
    next_id: u32,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> RegistrationId {
        self.next_id += 1;
        RegistrationId(self.next_id)
    }

    pub fn add_handler(&mut self, handler: Box<dyn AssignmentHandler>) -> RegistrationId {
        let id = self.next_id();
        log::debug!("registered handler '{}'", handler.name());
        self.handlers.push((id, handler));
        id
    }

    pub fn remove_handler(&mut self, id: RegistrationId) -> Option<Box<dyn AssignmentHandler>> {
        let index = self.handlers.iter().position(|(handler_id, _)| *handler_id == id)?;
        Some(self.handlers.remove(index).1)
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>) -> RegistrationId {
        let id = self.next_id();
        log::debug!("registered rule '{}'", rule.name());
        self.rules.push((id, rule));
        id
    }

    pub fn remove_rule(&mut self, id: RegistrationId) -> Option<Box<dyn Rule>> {
        let index = self.rules.iter().position(|(rule_id, _)| *rule_id == id)?;
        Some(self.rules.remove(index).1)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|(_, handler)| handler.name()).collect()
    }

    /// Offer a site to each handler in order; the first replacement wins
    pub fn dispatch(
        &mut self,
        site: &AssignmentSite<'_>,
        cx: &HandlerContext<'_>,
    ) -> Result<Option<(String, Replacement)>> {
        for (_, handler) in &mut self.handlers {
            let outcome = handler.on_assignment(site, cx).map_err(|source| Error::Handler {
                handler: handler.name().to_string(),
                location: site.location(),
                source: Box::new(source),
            })?;
            if let Some(replacement) = outcome {
                log::trace!(
                    "handler '{}' replaced {} site at line {}",
                    handler.name(),
                    site.kind_name(),
                    site.location().line
                );
                return Ok(Some((handler.name().to_string(), replacement)));
            }
        }
        Ok(None)
    }

    /// Run every rule's setup in registration order.
    ///
    /// Rules may register handlers and further rules; rules added here do
    /// not get a setup call of their own in this pass.
    pub fn run_before(&mut self, unit: &mut CompilationUnit) -> Result<()> {
        let mut rules = std::mem::take(&mut self.rules);
        let mut outcome = Ok(());
        for (_, rule) in rules.iter_mut() {
            log::trace!("before traversal: {}", rule.name());
            outcome = rule.before_traversal(self, unit);
            if outcome.is_err() {
                break;
            }
        }
        rules.append(&mut self.rules);
        self.rules = rules;
        outcome
    }

    /// Run every rule's teardown in registration order
    pub fn run_after(&mut self, unit: &mut CompilationUnit) -> Result<()> {
        self.rules
            .iter_mut()
            .try_for_each(|(_, rule)| rule.after_traversal(unit))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handler_names())
            .field("rules", &self.rules.iter().map(|(_, r)| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Error for a replacement that does not fit its site
pub(crate) fn incompatible(handler: String, site: &'static str, replacement: &Replacement) -> Error {
    Error::IncompatibleReplacement {
        handler,
        site,
        found: replacement.kind_name(),
    }
}
