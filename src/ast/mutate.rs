//! Structural edits on a compilation unit
//!
//! These are simplifications and bookkeeping edits, never semantic rewrites:
//! evaluation order and every retained comment survive unchanged.

use super::*;

/// Add an import. `type_name == None` imports the whole package.
///
/// Position is irrelevant because the generator sorts imports. Returns
/// `false` when an identical import is already present.
pub fn insert_import(unit: &mut CompilationUnit, package: &str, type_name: Option<&str>) -> bool {
    let import = match type_name {
        Some(name) if package.is_empty() => ImportDecl::single(name),
        Some(name) => ImportDecl::single(format!("{}.{}", package, name)),
        None => ImportDecl::wildcard(package),
    };

    let exists = unit.imports.iter().any(|existing| {
        existing.name == import.name
            && existing.is_wildcard == import.is_wildcard
            && !existing.is_static
    });
    if exists {
        return false;
    }

    log::trace!("inserting {}", import);
    unit.imports.push(import);
    true
}

/// Create the package declaration, or rename the existing one in place
pub fn set_package(unit: &mut CompilationUnit, name: &str) {
    match unit.package_decl.as_mut() {
        Some(package) => package.name = name.to_string(),
        None => unit.package_decl = Some(PackageDecl::new(name)),
    }
}

/// Remove pass-through wrappers throughout the unit and return how many were removed.
///
/// Two wrapper kinds are collapsed:
/// - a parenthesized expression without comments around a primary expression
/// - a block without comments that is the only statement of its enclosing block
pub fn collapse_redundant_wrappers(unit: &mut CompilationUnit) -> usize {
    let mut collapser = Collapser { removed: 0 };
    for class in &mut unit.type_decls {
        collapser.class(class);
    }
    collapser.removed
}

struct Collapser {
    removed: usize,
}

impl Collapser {
    fn class(&mut self, class: &mut ClassDecl) {
        for member in &mut class.body {
            match member {
                ClassMember::Field(field) => {
                    for var in &mut field.variables {
                        if let Some(init) = var.initializer.as_mut() {
                            self.expr(init);
                        }
                    }
                }
                ClassMember::Method(method) => {
                    if let Some(body) = method.body.as_mut() {
                        self.block(body);
                    }
                }
                ClassMember::Constructor(ctor) => self.block(&mut ctor.body),
                ClassMember::Initializer(init) => self.block(&mut init.body),
                ClassMember::Class(nested) => self.class(nested),
                ClassMember::Comment(_) => {}
            }
        }
    }

    fn block(&mut self, block: &mut Block) {
        loop {
            let collapsible = matches!(
                block.statements.as_slice(),
                [Stmt::Block(inner)] if inner.comments.is_empty()
            );
            if !collapsible {
                break;
            }
            if let Some(Stmt::Block(inner)) = block.statements.pop() {
                block.statements = inner.statements;
                self.removed += 1;
            }
        }

        for stmt in &mut block.statements {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expression(s) => self.expr(&mut s.expr),
            Stmt::Declaration(decl) => {
                for var in &mut decl.variables {
                    if let Some(init) = var.initializer.as_mut() {
                        self.expr(init);
                    }
                }
            }
            Stmt::LocalClass(class) => self.class(class),
            Stmt::If(s) => {
                self.expr(&mut s.condition);
                self.stmt(&mut s.then_branch);
                if let Some(else_branch) = s.else_branch.as_mut() {
                    self.stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.expr(&mut s.condition);
                self.stmt(&mut s.body);
            }
            Stmt::DoWhile(s) => {
                self.stmt(&mut s.body);
                self.expr(&mut s.condition);
            }
            Stmt::For(s) => {
                for init in &mut s.init {
                    self.stmt(init);
                }
                if let Some(cond) = s.condition.as_mut() {
                    self.expr(cond);
                }
                for update in &mut s.update {
                    self.expr(&mut update.expr);
                }
                self.stmt(&mut s.body);
            }
            Stmt::Switch(s) => {
                self.expr(&mut s.expression);
                for case in &mut s.cases {
                    for label in &mut case.labels {
                        self.expr(label);
                    }
                    for stmt in &mut case.statements {
                        self.stmt(stmt);
                    }
                }
            }
            Stmt::Return(s) => {
                if let Some(value) = s.value.as_mut() {
                    self.expr(value);
                }
            }
            Stmt::Try(s) => {
                self.block(&mut s.try_block);
                for catch in &mut s.catch_clauses {
                    self.block(&mut catch.block);
                }
                if let Some(finally) = s.finally_block.as_mut() {
                    self.block(finally);
                }
            }
            Stmt::Throw(s) => self.expr(&mut s.expr),
            Stmt::Assert(s) => {
                self.expr(&mut s.condition);
                if let Some(message) = s.message.as_mut() {
                    self.expr(message);
                }
            }
            Stmt::Synchronized(s) => {
                self.expr(&mut s.lock);
                self.block(&mut s.body);
            }
            Stmt::Labeled(s) => self.stmt(&mut s.statement),
            Stmt::Block(block) => self.block(block),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Comment(_) | Stmt::Empty => {}
        }
    }

    fn expr(&mut self, expr: &mut Expr) {
        while let Expr::Parenthesized(paren) = expr {
            if !paren.comments.is_empty() || !paren.expr.is_primary() {
                break;
            }
            let inner = std::mem::replace(paren.expr.as_mut(), Expr::literal(Literal::Null));
            *expr = inner;
            self.removed += 1;
        }

        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::Binary(e) => {
                self.expr(&mut e.left);
                self.expr(&mut e.right);
            }
            Expr::Unary(e) => self.expr(&mut e.operand),
            Expr::Assignment(e) => {
                self.expr(&mut e.target);
                self.expr(&mut e.value);
            }
            Expr::MethodCall(e) => {
                if let Some(target) = e.target.as_mut() {
                    self.expr(target);
                }
                for arg in &mut e.arguments {
                    self.expr(arg);
                }
            }
            Expr::FieldAccess(e) => self.expr(&mut e.target),
            Expr::ArrayAccess(e) => {
                self.expr(&mut e.array);
                self.expr(&mut e.index);
            }
            Expr::Cast(e) => self.expr(&mut e.expr),
            Expr::InstanceOf(e) => self.expr(&mut e.expr),
            Expr::Conditional(e) => {
                self.expr(&mut e.condition);
                self.expr(&mut e.then_expr);
                self.expr(&mut e.else_expr);
            }
            Expr::New(e) => {
                for arg in &mut e.arguments {
                    self.expr(arg);
                }
                if let Some(body) = e.anonymous_body.as_mut() {
                    self.class(body);
                }
            }
            Expr::NewArray(e) => {
                for dim in &mut e.dimensions {
                    self.expr(dim);
                }
                if let Some(init) = e.initializer.as_mut() {
                    for value in &mut init.values {
                        self.expr(value);
                    }
                }
            }
            Expr::ArrayInitializer(e) => {
                for value in &mut e.values {
                    self.expr(value);
                }
            }
            Expr::Parenthesized(e) => self.expr(&mut e.expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_with_body(statements: Vec<Stmt>) -> CompilationUnit {
        let method = MethodDecl::new("run", None, Some(Block::new(statements)));
        CompilationUnit::new().with_type(ClassDecl::class("A").with_member(ClassMember::Method(method)))
    }

    fn body(unit: &CompilationUnit) -> &Block {
        match &unit.type_decls[0].body[0] {
            ClassMember::Method(m) => m.body.as_ref().unwrap(),
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn insert_import_skips_duplicates() {
        let mut unit = CompilationUnit::new();
        assert!(insert_import(&mut unit, "java.util", Some("List")));
        assert!(!insert_import(&mut unit, "java.util", Some("List")));
        assert!(insert_import(&mut unit, "java.util", None));
        assert_eq!(unit.imports.len(), 2);
        assert_eq!(unit.imports[0].name, "java.util.List");
        assert!(unit.imports[1].is_wildcard);
    }

    #[test]
    fn set_package_creates_then_renames() {
        let mut unit = CompilationUnit::new();
        set_package(&mut unit, "a.b");
        assert_eq!(unit.package_name(), "a.b");
        set_package(&mut unit, "c");
        assert_eq!(unit.package_name(), "c");
    }

    #[test]
    fn parentheses_around_primary_are_removed() {
        let stmt = Stmt::expr(Expr::assign(
            Expr::name("x"),
            AssignmentOp::Assign,
            Expr::paren(Expr::paren(Expr::name("y"))),
        ));
        let mut unit = unit_with_body(vec![stmt]);
        assert_eq!(collapse_redundant_wrappers(&mut unit), 2);
        match &body(&unit).statements[0] {
            Stmt::Expression(ExprStmt { expr: Expr::Assignment(a), .. }) => {
                assert!(matches!(a.value.as_ref(), Expr::Identifier(id) if id.name == "y"));
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn parentheses_with_comments_or_operators_are_kept() {
        let grouped = Expr::binary(
            Expr::paren(Expr::binary(Expr::int(1), BinaryOp::Add, Expr::int(2))),
            BinaryOp::Mul,
            Expr::int(3),
        );
        let mut commented = ParenExpr {
            expr: Box::new(Expr::name("z")),
            comments: vec![Comment::block("keep")],
            span: Span::synthetic(),
        };
        commented.span = Span::from_to(1, 1, 1, 5);
        let mut unit = unit_with_body(vec![
            Stmt::expr(grouped),
            Stmt::expr(Expr::Parenthesized(commented)),
        ]);
        assert_eq!(collapse_redundant_wrappers(&mut unit), 0);
    }

    #[test]
    fn sole_nested_block_is_flattened() {
        let inner = Stmt::block(vec![Stmt::block(vec![Stmt::ret(None)])]);
        let mut unit = unit_with_body(vec![inner]);
        assert_eq!(collapse_redundant_wrappers(&mut unit), 2);
        assert!(matches!(body(&unit).statements.as_slice(), [Stmt::Return(_)]));
    }

    #[test]
    fn block_with_comment_is_kept() {
        let mut inner = Block::new(vec![Stmt::ret(None)]);
        inner.comments.push(Comment::line("scope"));
        let mut unit = unit_with_body(vec![Stmt::Block(inner)]);
        assert_eq!(collapse_redundant_wrappers(&mut unit), 0);
        assert!(matches!(body(&unit).statements.as_slice(), [Stmt::Block(_)]));
    }
}
