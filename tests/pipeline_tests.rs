//! End-to-end transformations through `Pipeline`

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use recast::ast::*;
use recast::resolve::ClassCache;
use recast::{
    AssignmentHandler, AssignmentSite, AssignmentTraceRule, CodeGenerator, Config, Error, HandlerContext, Pipeline,
    Replacement, Result,
};
use tempfile::TempDir;

use common::TableParser;

/// Never replaces anything; remembers what it saw
#[derive(Default)]
struct Observer {
    seen: Rc<RefCell<Vec<String>>>,
}

impl AssignmentHandler for Observer {
    fn name(&self) -> &str {
        "observer"
    }

    fn on_assignment(&mut self, site: &AssignmentSite<'_>, cx: &HandlerContext<'_>) -> Result<Option<Replacement>> {
        let class = cx.current_class().map(|c| c.name()).unwrap_or_default();
        self.seen.borrow_mut().push(format!("{} in {}", site.kind_name(), class));
        Ok(None)
    }
}

struct Failing;

impl AssignmentHandler for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_assignment(&mut self, _: &AssignmentSite<'_>, _: &HandlerContext<'_>) -> Result<Option<Replacement>> {
        Err(Error::transform("refused"))
    }
}

/// Replaces expression sites with a statement list, which they cannot take
struct WrongShape;

impl AssignmentHandler for WrongShape {
    fn name(&self) -> &str {
        "wrong-shape"
    }

    fn on_assignment(&mut self, site: &AssignmentSite<'_>, _: &HandlerContext<'_>) -> Result<Option<Replacement>> {
        match site {
            AssignmentSite::Expression { .. } => Ok(Some(Replacement::Statements(Vec::new()))),
            _ => Ok(None),
        }
    }
}

fn counter_unit() -> CompilationUnit {
    let body = Block::new(vec![
        Stmt::expr(Expr::assign(
            Expr::field(Expr::name("this"), "count"),
            AssignmentOp::AddAssign,
            Expr::name("step"),
        )),
        Stmt::if_else(
            Expr::binary(Expr::name("count"), BinaryOp::Gt, Expr::int(10)),
            Stmt::expr(Expr::assign(Expr::name("count"), AssignmentOp::Assign, Expr::int(0))),
            None,
        ),
    ]);
    let bump = MethodDecl::new("bump", Some(TypeRef::named("void")), Some(body))
        .with_param(Parameter::new(TypeRef::named("int"), "step"));
    CompilationUnit::new().with_package("p").with_type(
        ClassDecl::class("Counter")
            .with_member(ClassMember::Field(FieldDecl::new(TypeRef::named("int"), "count", Some(Expr::int(1)))))
            .with_member(ClassMember::Method(bump)),
    )
}

#[test]
fn hashtable_field_resolves_through_wildcard_import() {
    let mut pipeline = Pipeline::new(Config::default());
    let mut unit = common::hashtable_unit();
    pipeline.process(&mut unit).unwrap();

    let field = match &unit.type_decls[0].body[0] {
        ClassMember::Field(field) => field,
        other => panic!("unexpected {other:?}"),
    };
    let resolved = field.type_ref.resolved.as_ref().unwrap();
    assert_eq!(resolved.name(), "java.util.Hashtable");
    assert_eq!(
        Some(resolved),
        pipeline.resolver().lookup_canonical("java.util.Hashtable").as_ref()
    );
}

#[test]
fn anonymous_classes_are_numbered_in_method_order() {
    let mut pipeline = Pipeline::new(Config::default());
    let mut unit = common::two_anonymous_unit();
    let numbering = pipeline.process(&mut unit).unwrap();

    let anonymous: Vec<(String, u32)> = numbering
        .anonymous()
        .into_iter()
        .map(|(id, n)| (numbering.binary_name(id).unwrap().to_string(), n))
        .collect();
    assert_eq!(anonymous, vec![("p.A$1".to_string(), 1), ("p.A$2".to_string(), 2)]);

    // the class in `first` carries number 1 in the tree as well
    let first = match &unit.type_decls[0].body[0] {
        ClassMember::Method(method) => method,
        other => panic!("unexpected {other:?}"),
    };
    let body = match &first.body.as_ref().unwrap().statements[0] {
        Stmt::Declaration(decl) => match decl.variables[0].initializer.as_ref() {
            Some(Expr::New(new)) => new.anonymous_body.as_ref().unwrap(),
            other => panic!("unexpected {other:?}"),
        },
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(body.binary_name.as_deref(), Some("p.A$1"));
    assert_eq!(numbering.lookup("A$2").and_then(|id| numbering.number(id)), Some(2));

    let registered = pipeline.resolver().class_info("p.A$1").unwrap();
    assert_eq!(registered.superclass.as_deref(), Some("java.lang.Object"));
    assert_eq!(registered.interfaces, vec!["java.lang.Runnable".to_string()]);
}

#[test]
fn observing_handler_changes_nothing() {
    let direct = CodeGenerator::default().generate_to_string(&counter_unit());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_handler(Observer { seen: seen.clone() });
    let transformed = pipeline.transform_unit(counter_unit()).unwrap();

    assert_eq!(transformed, direct);
    assert_eq!(
        *seen.borrow(),
        vec!["declarator in p.Counter", "statement in p.Counter", "statement in p.Counter"]
    );
}

#[test]
fn trace_rule_records_assignments() {
    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_rule(AssignmentTraceRule::new("trace.Recorder"));
    let out = pipeline.transform_unit(counter_unit()).unwrap();

    let expected = "\
package p;

import trace.Recorder;

class Counter {
    int count = Recorder.assigned(\"count\", 1);

    void bump(int step) {
        this.count += step;
        Recorder.assigned(\"this.count\", this.count);
        if (count > 10) {
            count = 0;
            Recorder.assigned(\"count\", count);
        }
    }
}
";
    assert_eq!(out, expected);
}

#[test]
fn trace_rule_skips_the_recorder_itself() {
    let assign = Stmt::expr(Expr::assign(Expr::name("last"), AssignmentOp::Assign, Expr::name("v")));
    let method = MethodDecl::new("assigned", Some(TypeRef::named("Object")), Some(Block::new(vec![
        assign,
        Stmt::ret(Some(Expr::name("v"))),
    ])))
    .with_modifiers(vec![Modifier::Static])
    .with_param(Parameter::new(TypeRef::named("String"), "name"))
    .with_param(Parameter::new(TypeRef::named("Object"), "v"));
    let unit = CompilationUnit::new().with_package("trace").with_type(
        ClassDecl::class("Recorder")
            .with_member(ClassMember::Field(
                FieldDecl::new(TypeRef::named("Object"), "last", None).with_modifiers(vec![Modifier::Static]),
            ))
            .with_member(ClassMember::Method(method)),
    );
    let direct = CodeGenerator::default().generate_to_string(&unit);

    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_rule(AssignmentTraceRule::new("trace.Recorder"));
    assert_eq!(pipeline.transform_unit(unit).unwrap(), direct);
}

#[test]
fn trace_rule_keeps_constants_and_array_initializers() {
    let mut ints = TypeRef::named("int");
    ints.array_dims = 1;
    let elements = Expr::ArrayInitializer(ArrayInitializerExpr {
        values: vec![Expr::int(1), Expr::int(2)],
        span: Span::synthetic(),
    });
    let unit = CompilationUnit::new().with_package("p").with_type(
        ClassDecl::class("Limits")
            .with_member(ClassMember::Field(
                FieldDecl::new(TypeRef::named("int"), "MAX", Some(Expr::int(3)))
                    .with_modifiers(vec![Modifier::Static, Modifier::Final]),
            ))
            .with_member(ClassMember::Field(FieldDecl::new(ints, "a", Some(elements)))),
    );

    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_rule(AssignmentTraceRule::new("trace.Recorder"));
    let out = pipeline.transform_unit(unit).unwrap();
    assert!(out.contains("\n    static final int MAX = 3;\n"), "{out}");
    assert!(out.contains("\n    int[] a = {1, 2};\n"), "{out}");
    assert!(!out.contains("Recorder.assigned"), "{out}");
}

#[test]
fn handler_failures_name_the_handler() {
    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_handler(Failing);
    let err = pipeline.transform_unit(counter_unit()).unwrap_err();
    match err {
        Error::Handler { handler, source, .. } => {
            assert_eq!(handler, "failing");
            assert!(matches!(*source, Error::Transform { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn replacements_must_fit_their_site() {
    let update = ExprStmt {
        expr: Expr::assign(Expr::name("i"), AssignmentOp::AddAssign, Expr::int(1)),
        span: Span::from_to(3, 30, 3, 36),
    };
    let for_loop = Stmt::For(ForStmt {
        init: vec![Stmt::var(TypeRef::named("int"), "i", Some(Expr::int(0)))],
        condition: Some(Expr::binary(Expr::name("i"), BinaryOp::Lt, Expr::int(3))),
        update: vec![update],
        body: Box::new(Stmt::Empty),
        span: Span::from_to(3, 9, 3, 40),
    });
    let method = MethodDecl::new("loop", Some(TypeRef::named("void")), Some(Block::new(vec![for_loop])));
    let unit = CompilationUnit::new().with_type(ClassDecl::class("L").with_member(ClassMember::Method(method)));

    let mut pipeline = Pipeline::new(Config::default());
    pipeline.add_handler(WrongShape);
    match pipeline.transform_unit(unit).unwrap_err().root() {
        Error::IncompatibleReplacement { handler, site, found } => {
            assert_eq!(handler, "wrong-shape");
            assert_eq!(*site, "expression");
            assert_eq!(*found, "statements");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_types_fail_with_their_location() {
    let mut field = FieldDecl::new(TypeRef::named("Missing"), "m", None);
    field.type_ref.span = Span::from_to(2, 5, 2, 12);
    let unit = CompilationUnit::new().with_package("p").with_type(ClassDecl::class("A").with_member(ClassMember::Field(field)));

    let mut pipeline = Pipeline::new(Config::default());
    match pipeline.transform_unit(unit).unwrap_err() {
        Error::At { location, source } => {
            assert_eq!((location.line, location.column), (2, 5));
            assert!(matches!(*source, Error::ClassNotFound { ref name } if name == "Missing"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn formatting_is_a_fixed_point() {
    let unit = counter_unit();
    let first = CodeGenerator::default().generate_to_string(&unit);
    let parser = TableParser::new().with(first.clone(), unit);

    let second = recast::transform_text(&parser, &first, &Config::default()).unwrap();
    assert_eq!(second, first);
    let third = recast::transform_text(&parser, &second, &Config::default()).unwrap();
    assert_eq!(third, second);
}

#[test]
fn parser_failures_pass_through() {
    let parser = TableParser::new();
    let err = recast::transform_text(&parser, "class {", &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Malformed { line: 1, .. }));
}

#[test]
fn file_errors_carry_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Broken.java");
    std::fs::write(&path, "class Broken {").unwrap();

    let err = recast::transform_file(&TableParser::new(), &path, &Config::default()).unwrap_err();
    match &err {
        Error::InFile { path: reported, source } => {
            assert_eq!(reported, &path);
            assert!(matches!(**source, Error::Malformed { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(err.to_string().contains("Broken.java"));
}

#[test]
fn files_are_transformed_with_the_configured_indent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Counter.java");
    std::fs::write(&path, "source of Counter").unwrap();
    let parser = TableParser::new().with("source of Counter", counter_unit());

    let out = recast::transform_file(&parser, &path, &Config::default().with_indent_width(2)).unwrap();
    assert!(out.contains("\n  int count = 1;\n"));
    assert!(out.contains("\n    this.count += step;\n"));
}

#[test]
fn pipelines_can_share_a_cache() {
    let cache = ClassCache::global();
    let mut first = Pipeline::with_cache(Config::default(), cache.clone());
    let mut second = Pipeline::with_cache(Config::default(), cache);
    let mut a = common::hashtable_unit();
    let mut b = common::hashtable_unit();
    first.process(&mut a).unwrap();
    second.process(&mut b).unwrap();

    let resolved = |unit: &CompilationUnit| match &unit.type_decls[0].body[0] {
        ClassMember::Field(field) => field.type_ref.resolved.clone(),
        _ => None,
    };
    assert_eq!(resolved(&a), resolved(&b));
}
