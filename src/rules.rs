//! Ready-made rules
//!
//! [`AssignmentTraceRule`] reports every traced assignment to a recorder
//! class:
//!
//! ```text
//! x = e;        =>   x = e; Recorder.assigned("x", x);
//! T x = e;      =>   T x = Recorder.assigned("x", e);
//! ```
//!
//! The recorder's method must return its second argument. Only names and
//! field-access chains are traced, so no target expression is evaluated twice.
//! `final` declarators keep their initializer, as do array initializers
//! (`int[] a = {1, 2};`), which are not expressions outside a declarator.

use crate::ast::{mutate, CompilationUnit, Expr, ExprStmt, Modifier, Span, Stmt};
use crate::error::{Error, Result};
use crate::traverse::{
    AssignmentHandler, AssignmentSite, HandlerContext, HandlerRegistry, RegistrationId, Replacement, Rule,
};

const RULE_NAME: &str = "assignment-trace";
const DEFAULT_METHOD: &str = "assigned";

pub struct AssignmentTraceRule {
    /// Qualified name of the recorder class
    recorder: String,
    method: String,
    handler: Option<RegistrationId>,
}

impl AssignmentTraceRule {
    pub fn new(recorder: impl Into<String>) -> Self {
        Self {
            recorder: recorder.into(),
            method: DEFAULT_METHOD.to_string(),
            handler: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    fn split_recorder(&self) -> (&str, &str) {
        match self.recorder.rfind('.') {
            Some(dot) => (&self.recorder[..dot], &self.recorder[dot + 1..]),
            None => ("", self.recorder.as_str()),
        }
    }
}

impl Rule for AssignmentTraceRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn before_traversal(&mut self, registry: &mut HandlerRegistry, unit: &mut CompilationUnit) -> Result<()> {
        let (package, simple_name) = self.split_recorder();
        if simple_name.is_empty() || self.method.is_empty() {
            return Err(Error::transform(format!(
                "invalid recorder '{}.{}'",
                self.recorder, self.method
            )));
        }
        if !package.is_empty() && package != unit.package_name() {
            mutate::insert_import(unit, package, Some(simple_name));
        }

        // one handler serves every unit of a pipeline
        if self.handler.is_none() {
            let handler = TraceHandler {
                recorder: self.recorder.clone(),
                simple_name: simple_name.to_string(),
                method: self.method.clone(),
            };
            self.handler = Some(registry.add_handler(Box::new(handler)));
        }
        Ok(())
    }
}

struct TraceHandler {
    recorder: String,
    simple_name: String,
    method: String,
}

impl TraceHandler {
    fn record(&self, label: String, value: Expr) -> Expr {
        Expr::call(
            Some(Expr::name(self.simple_name.as_str())),
            self.method.as_str(),
            vec![Expr::string(label), value],
        )
    }
}

impl AssignmentHandler for TraceHandler {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn on_assignment(&mut self, site: &AssignmentSite<'_>, cx: &HandlerContext<'_>) -> Result<Option<Replacement>> {
        // the recorder does not trace itself
        if cx.current_class().is_some_and(|class| class.source_name() == self.recorder) {
            return Ok(None);
        }

        match *site {
            AssignmentSite::Statement {
                target,
                operator,
                value,
                location,
            } => {
                let label = match traced_name(target) {
                    Some(label) => label,
                    None => return Ok(None),
                };
                let assignment = Stmt::Expression(ExprStmt {
                    expr: Expr::assign(target.clone(), operator, value.clone()),
                    span: Span::new(location, location),
                });
                let record = Stmt::expr(self.record(label, target.clone()));
                Ok(Some(Replacement::Statements(vec![assignment, record])))
            }
            AssignmentSite::Declarator { modifiers, .. } if modifiers.contains(&Modifier::Final) => Ok(None),
            AssignmentSite::Declarator {
                value: Expr::ArrayInitializer(_),
                ..
            } => Ok(None),
            AssignmentSite::Declarator { name, value, .. } => {
                Ok(Some(Replacement::Expr(self.record(name.to_string(), value.clone()))))
            }
            AssignmentSite::Expression { .. } => Ok(None),
        }
    }
}

/// Source spelling of a side-effect free assignment target
fn traced_name(target: &Expr) -> Option<String> {
    match target {
        Expr::Identifier(id) => Some(id.name.clone()),
        Expr::FieldAccess(access) => traced_name(&access.target).map(|owner| format!("{}.{}", owner, access.name)),
        Expr::Parenthesized(paren) => traced_name(&paren.expr),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArrayInitializerExpr, AssignmentOp, ImportDecl, Location, TypeRef};
    use crate::config::Config;
    use crate::codegen::CodeGenerator;
    use crate::resolve::{ClassCache, ClassRegistry, ImportTable, NameResolver};
    use crate::traverse::Tracker;
    use std::sync::Arc;

    fn on_site(site: AssignmentSite<'_>) -> Option<Replacement> {
        let mut handler = TraceHandler {
            recorder: "trace.Recorder".into(),
            simple_name: "Recorder".into(),
            method: "assigned".into(),
        };
        let tracker = Tracker::new();
        let resolver = NameResolver::from_config(&Config::default(), Arc::new(ClassRegistry::new()), Arc::new(ClassCache::new()));
        let imports = ImportTable::new(crate::consts::IMPLICIT_PACKAGE);
        let cx = HandlerContext { tracker: &tracker, resolver: &resolver, imports: &imports, unit_package: "" };
        handler.on_assignment(&site, &cx).unwrap()
    }

    #[test]
    fn setup_imports_recorder_once() {
        let mut rule = AssignmentTraceRule::new("trace.Recorder");
        let mut registry = HandlerRegistry::new();
        let mut unit = CompilationUnit::new().with_package("p");
        rule.before_traversal(&mut registry, &mut unit).unwrap();
        rule.before_traversal(&mut registry, &mut unit).unwrap();

        assert_eq!(unit.imports.len(), 1);
        assert_eq!(unit.imports[0].to_string(), ImportDecl::single("trace.Recorder").to_string());
        assert_eq!(registry.handler_names(), vec![RULE_NAME]);
    }

    #[test]
    fn statement_sites_record_after_assigning() {
        let target = Expr::field(Expr::name("this"), "count");
        let value = Expr::int(3);
        let replacement = on_site(AssignmentSite::Statement {
            target: &target,
            operator: AssignmentOp::AddAssign,
            value: &value,
            location: Location::new(4, 9, 0),
        });
        let statements = match replacement {
            Some(Replacement::Statements(statements)) => statements,
            other => panic!("unexpected {other:?}"),
        };
        let generator = CodeGenerator::default();
        let text: Vec<String> = statements.iter().map(|s| generator.statement(s)).collect();
        assert_eq!(text, vec!["this.count += 3;\n", "Recorder.assigned(\"this.count\", this.count);\n"]);
    }

    #[test]
    fn declarators_wrap_the_initializer() {
        let type_ref = TypeRef::named("int");
        let value = Expr::int(1);
        let replacement = on_site(AssignmentSite::Declarator {
            modifiers: &[],
            type_ref: &type_ref,
            declared: None,
            name: "x",
            value: &value,
            location: Location::default(),
        });
        match replacement {
            Some(Replacement::Expr(expr)) => {
                assert_eq!(CodeGenerator::default().expression(&expr), "Recorder.assigned(\"x\", 1)")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn final_and_array_initializer_declarators_are_left_alone() {
        let int = TypeRef::named("int");
        let one = Expr::int(1);
        let constant = on_site(AssignmentSite::Declarator {
            modifiers: &[Modifier::Static, Modifier::Final],
            type_ref: &int,
            declared: None,
            name: "LIMIT",
            value: &one,
            location: Location::default(),
        });
        assert!(constant.is_none());

        let mut ints = TypeRef::named("int");
        ints.array_dims = 1;
        let elements = Expr::ArrayInitializer(ArrayInitializerExpr {
            values: vec![Expr::int(1), Expr::int(2)],
            span: Span::synthetic(),
        });
        let array = on_site(AssignmentSite::Declarator {
            modifiers: &[],
            type_ref: &ints,
            declared: None,
            name: "a",
            value: &elements,
            location: Location::default(),
        });
        assert!(array.is_none());
    }

    #[test]
    fn array_element_targets_are_left_alone() {
        let target = Expr::ArrayAccess(crate::ast::ArrayAccessExpr {
            array: Box::new(Expr::name("a")),
            index: Box::new(Expr::call(None, "next", vec![])),
            span: Span::synthetic(),
        });
        let value = Expr::int(0);
        let replacement = on_site(AssignmentSite::Statement {
            target: &target,
            operator: AssignmentOp::Assign,
            value: &value,
            location: Location::default(),
        });
        assert!(replacement.is_none());
    }
}
