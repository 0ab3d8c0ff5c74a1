//! Class summary tree and anonymous-class numbering
//!
//! The summary keeps only classes and method-like containers. Anonymous and
//! local classes hang under the method that declares them; field
//! initializers and initializer blocks are collected into pseudo-methods
//! whose names start with [`INITIALIZER_PREFIX`].
//!
//! Numbering uses one counter per top-level class, starting at 1. Within a
//! class the order is: the class itself if anonymous, then classes in
//! initializer pseudo-methods, then nested member classes in declaration
//! order, then classes in the remaining methods in declaration order.

use std::collections::HashMap;

use crate::ast::*;
use crate::consts::{CONSTRUCTOR_NAME, INITIALIZER_PREFIX, INSTANCE_INITIALIZER, NESTED_SEPARATOR, STATIC_INITIALIZER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryParent {
    Unit,
    Class(ClassId),
    Method(MethodId),
}

#[derive(Debug, Clone)]
pub struct SummaryClass {
    pub id: ClassId,
    /// Empty for anonymous classes
    pub name: String,
    pub kind: ClassKind,
    pub parent: SummaryParent,
    pub nested: Vec<ClassId>,
    pub methods: Vec<MethodId>,
    /// `extends` as written; for anonymous classes the instantiated type
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub location: Location,
}

impl SummaryClass {
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Named class declared inside a method body
    pub fn is_local(&self) -> bool {
        !self.is_anonymous() && matches!(self.parent, SummaryParent::Method(_))
    }
}

#[derive(Debug, Clone)]
pub struct SummaryMethod {
    pub id: MethodId,
    pub name: String,
    pub owner: ClassId,
    /// Anonymous and local classes in declaration order
    pub classes: Vec<ClassId>,
}

impl SummaryMethod {
    pub fn is_initializer(&self) -> bool {
        self.name.starts_with(INITIALIZER_PREFIX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryTree {
    package: String,
    classes: Vec<SummaryClass>,
    methods: Vec<SummaryMethod>,
    roots: Vec<ClassId>,
}

impl SummaryTree {
    /// Summarize `unit`, tagging every class declaration with its summary id
    pub fn build(unit: &mut CompilationUnit) -> SummaryTree {
        let mut builder = Builder {
            tree: SummaryTree {
                package: unit.package_name().to_string(),
                ..Default::default()
            },
        };
        for class in &mut unit.type_decls {
            let id = builder.class(class, SummaryParent::Unit);
            builder.tree.roots.push(id);
        }
        log::debug!(
            "summary: {} classes, {} methods",
            builder.tree.classes.len(),
            builder.tree.methods.len()
        );
        builder.tree
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn roots(&self) -> &[ClassId] {
        &self.roots
    }

    pub fn classes(&self) -> &[SummaryClass] {
        &self.classes
    }

    pub fn class(&self, id: ClassId) -> &SummaryClass {
        &self.classes[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &SummaryMethod {
        &self.methods[id.0 as usize]
    }

    /// Class whose body contains `id`, directly or through a method
    pub fn enclosing_class(&self, id: ClassId) -> Option<ClassId> {
        match self.class(id).parent {
            SummaryParent::Unit => None,
            SummaryParent::Class(parent) => Some(parent),
            SummaryParent::Method(method) => Some(self.method(method).owner),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number every anonymous class and name every class
    pub fn renumber(&self) -> Numbering {
        let mut numbering = Numbering {
            package: self.package.clone(),
            ..Default::default()
        };

        for &root in &self.roots {
            let top = self.class(root);
            let top_name = if self.package.is_empty() {
                top.name.clone()
            } else {
                format!("{}.{}", self.package, top.name)
            };
            let mut state = TopLevel {
                binary: top_name,
                counter: 0,
                locals: HashMap::new(),
            };
            self.number_class(root, &mut state, &mut numbering);
        }

        numbering
    }

    fn number_class(&self, id: ClassId, state: &mut TopLevel, numbering: &mut Numbering) {
        let class = self.class(id);

        let binary = if class.is_anonymous() {
            state.counter += 1;
            numbering.numbers.insert(id, state.counter);
            format!("{}{}{}", state.binary, NESTED_SEPARATOR, state.counter)
        } else {
            match class.parent {
                SummaryParent::Unit => state.binary.clone(),
                SummaryParent::Class(parent) => {
                    let owner = numbering.binary_name(parent).unwrap_or(&state.binary);
                    format!("{}{}{}", owner, NESTED_SEPARATOR, class.name)
                }
                SummaryParent::Method(_) => {
                    let k = state.locals.entry(class.name.clone()).or_insert(0);
                    *k += 1;
                    format!("{}{}{}{}", state.binary, NESTED_SEPARATOR, k, class.name)
                }
            }
        };
        numbering.insert_name(id, binary);

        let (initializers, methods): (Vec<&SummaryMethod>, Vec<&SummaryMethod>) = class
            .methods
            .iter()
            .map(|m| self.method(*m))
            .partition(|m| m.is_initializer());

        for method in &initializers {
            for &child in &method.classes {
                self.number_class(child, state, numbering);
            }
        }
        for &nested in &class.nested {
            self.number_class(nested, state, numbering);
        }
        for method in &methods {
            for &child in &method.classes {
                self.number_class(child, state, numbering);
            }
        }
    }
}

struct TopLevel {
    binary: String,
    counter: u32,
    locals: HashMap<String, u32>,
}

/// Result of renumbering: anonymous numbers and binary names of every class
#[derive(Debug, Clone, Default)]
pub struct Numbering {
    package: String,
    numbers: HashMap<ClassId, u32>,
    binary_names: HashMap<ClassId, String>,
    by_binary_name: HashMap<String, ClassId>,
}

impl Numbering {
    fn insert_name(&mut self, id: ClassId, binary: String) {
        self.by_binary_name.insert(binary.clone(), id);
        self.binary_names.insert(id, binary);
    }

    /// Number of an anonymous class, `None` for named classes
    pub fn number(&self, id: ClassId) -> Option<u32> {
        self.numbers.get(&id).copied()
    }

    pub fn binary_name(&self, id: ClassId) -> Option<&str> {
        self.binary_names.get(&id).map(String::as_str)
    }

    /// Summary class behind a binary spelling such as `p.Outer$3`.
    /// Spellings without a package are taken relative to the unit's package.
    pub fn lookup(&self, spelling: &str) -> Option<ClassId> {
        self.by_binary_name.get(spelling).copied().or_else(|| {
            if self.package.is_empty() || spelling.contains('.') {
                None
            } else {
                self.by_binary_name
                    .get(&format!("{}.{}", self.package, spelling))
                    .copied()
            }
        })
    }

    /// Anonymous classes ordered by number
    pub fn anonymous(&self) -> Vec<(ClassId, u32)> {
        let mut numbered: Vec<(ClassId, u32)> = self.numbers.iter().map(|(id, n)| (*id, *n)).collect();
        numbered.sort_by_key(|(id, n)| (*n, *id));
        numbered
    }

    pub fn len(&self) -> usize {
        self.binary_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binary_names.is_empty()
    }
}

struct Builder {
    tree: SummaryTree,
}

impl Builder {
    fn class(&mut self, decl: &mut ClassDecl, parent: SummaryParent) -> ClassId {
        let id = ClassId(self.tree.classes.len() as u32);
        decl.summary_id = Some(id);
        self.tree.classes.push(SummaryClass {
            id,
            name: decl.name.clone(),
            kind: decl.kind,
            parent,
            nested: Vec::new(),
            methods: Vec::new(),
            superclass: decl.superclass.clone(),
            interfaces: decl.interfaces.clone(),
            location: decl.location(),
        });

        for member in &mut decl.body {
            match member {
                ClassMember::Field(field) => {
                    let is_static = is_static(&field.modifiers);
                    for var in &mut field.variables {
                        if let Some(init) = var.initializer.as_mut() {
                            let method = self.initializer(id, is_static);
                            self.expr(init, method);
                        }
                    }
                }
                ClassMember::Initializer(init) => {
                    let method = self.initializer(id, init.is_static);
                    self.block(&mut init.body, method);
                }
                ClassMember::Method(method) => {
                    let summary = self.method(id, &method.name);
                    if let Some(body) = method.body.as_mut() {
                        self.block(body, summary);
                    }
                }
                ClassMember::Constructor(ctor) => {
                    let summary = self.method(id, CONSTRUCTOR_NAME);
                    self.block(&mut ctor.body, summary);
                }
                ClassMember::Class(nested) => {
                    let nested_id = self.class(nested, SummaryParent::Class(id));
                    self.tree.classes[id.0 as usize].nested.push(nested_id);
                }
                ClassMember::Comment(_) => {}
            }
        }
        id
    }

    fn method(&mut self, owner: ClassId, name: &str) -> MethodId {
        let id = MethodId(self.tree.methods.len() as u32);
        self.tree.methods.push(SummaryMethod {
            id,
            name: name.to_string(),
            owner,
            classes: Vec::new(),
        });
        self.tree.classes[owner.0 as usize].methods.push(id);
        id
    }

    /// The class's initializer pseudo-method of the given kind, created on first use
    fn initializer(&mut self, owner: ClassId, is_static: bool) -> MethodId {
        let name = if is_static { STATIC_INITIALIZER } else { INSTANCE_INITIALIZER };
        let existing = self.tree.classes[owner.0 as usize]
            .methods
            .iter()
            .copied()
            .find(|m| self.tree.methods[m.0 as usize].name == name);
        match existing {
            Some(id) => id,
            None => self.method(owner, name),
        }
    }

    fn local_class(&mut self, decl: &mut ClassDecl, method: MethodId) -> ClassId {
        let id = self.class(decl, SummaryParent::Method(method));
        self.tree.methods[method.0 as usize].classes.push(id);
        id
    }

    fn block(&mut self, block: &mut Block, method: MethodId) {
        for stmt in &mut block.statements {
            self.stmt(stmt, method);
        }
    }

    fn stmt(&mut self, stmt: &mut Stmt, m: MethodId) {
        match stmt {
            Stmt::Expression(s) => self.expr(&mut s.expr, m),
            Stmt::Declaration(decl) => {
                for var in &mut decl.variables {
                    if let Some(init) = var.initializer.as_mut() {
                        self.expr(init, m);
                    }
                }
            }
            Stmt::LocalClass(class) => {
                self.local_class(class, m);
            }
            Stmt::If(s) => {
                self.expr(&mut s.condition, m);
                self.stmt(&mut s.then_branch, m);
                if let Some(else_branch) = s.else_branch.as_mut() {
                    self.stmt(else_branch, m);
                }
            }
            Stmt::While(s) => {
                self.expr(&mut s.condition, m);
                self.stmt(&mut s.body, m);
            }
            Stmt::DoWhile(s) => {
                self.stmt(&mut s.body, m);
                self.expr(&mut s.condition, m);
            }
            Stmt::For(s) => {
                for init in &mut s.init {
                    self.stmt(init, m);
                }
                if let Some(cond) = s.condition.as_mut() {
                    self.expr(cond, m);
                }
                for update in &mut s.update {
                    self.expr(&mut update.expr, m);
                }
                self.stmt(&mut s.body, m);
            }
            Stmt::Switch(s) => {
                self.expr(&mut s.expression, m);
                for case in &mut s.cases {
                    for label in &mut case.labels {
                        self.expr(label, m);
                    }
                    for stmt in &mut case.statements {
                        self.stmt(stmt, m);
                    }
                }
            }
            Stmt::Return(s) => {
                if let Some(value) = s.value.as_mut() {
                    self.expr(value, m);
                }
            }
            Stmt::Try(s) => {
                self.block(&mut s.try_block, m);
                for catch in &mut s.catch_clauses {
                    self.block(&mut catch.block, m);
                }
                if let Some(finally) = s.finally_block.as_mut() {
                    self.block(finally, m);
                }
            }
            Stmt::Throw(s) => self.expr(&mut s.expr, m),
            Stmt::Assert(s) => {
                self.expr(&mut s.condition, m);
                if let Some(message) = s.message.as_mut() {
                    self.expr(message, m);
                }
            }
            Stmt::Synchronized(s) => {
                self.expr(&mut s.lock, m);
                self.block(&mut s.body, m);
            }
            Stmt::Labeled(s) => self.stmt(&mut s.statement, m),
            Stmt::Block(block) => self.block(block, m),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Comment(_) | Stmt::Empty => {}
        }
    }

    fn expr(&mut self, expr: &mut Expr, m: MethodId) {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::Binary(e) => {
                self.expr(&mut e.left, m);
                self.expr(&mut e.right, m);
            }
            Expr::Unary(e) => self.expr(&mut e.operand, m),
            Expr::Assignment(e) => {
                self.expr(&mut e.target, m);
                self.expr(&mut e.value, m);
            }
            Expr::MethodCall(e) => {
                if let Some(target) = e.target.as_mut() {
                    self.expr(target, m);
                }
                for arg in &mut e.arguments {
                    self.expr(arg, m);
                }
            }
            Expr::FieldAccess(e) => self.expr(&mut e.target, m),
            Expr::ArrayAccess(e) => {
                self.expr(&mut e.array, m);
                self.expr(&mut e.index, m);
            }
            Expr::Cast(e) => self.expr(&mut e.expr, m),
            Expr::InstanceOf(e) => self.expr(&mut e.expr, m),
            Expr::Conditional(e) => {
                self.expr(&mut e.condition, m);
                self.expr(&mut e.then_expr, m);
                self.expr(&mut e.else_expr, m);
            }
            Expr::New(e) => {
                for arg in &mut e.arguments {
                    self.expr(arg, m);
                }
                if let Some(body) = e.anonymous_body.as_mut() {
                    let id = self.local_class(body, m);
                    self.tree.classes[id.0 as usize].superclass = Some(e.target_type.clone());
                }
            }
            Expr::NewArray(e) => {
                for dim in &mut e.dimensions {
                    self.expr(dim, m);
                }
                if let Some(init) = e.initializer.as_mut() {
                    for value in &mut init.values {
                        self.expr(value, m);
                    }
                }
            }
            Expr::ArrayInitializer(e) => {
                for value in &mut e.values {
                    self.expr(value, m);
                }
            }
            Expr::Parenthesized(e) => self.expr(&mut e.expr, m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous_runnable() -> Expr {
        let run = MethodDecl::new("run", None, Some(Block::new(vec![])));
        Expr::new_object(
            TypeRef::named("Runnable"),
            vec![],
            Some(ClassDecl::anonymous(vec![ClassMember::Method(run)])),
        )
    }

    fn method_with(name: &str, statements: Vec<Stmt>) -> ClassMember {
        ClassMember::Method(MethodDecl::new(name, None, Some(Block::new(statements))))
    }

    fn anonymous_ids(unit: &CompilationUnit) -> Vec<ClassId> {
        fn collect(expr: &Expr, out: &mut Vec<ClassId>) {
            if let Expr::New(NewExpr { anonymous_body: Some(body), .. }) = expr {
                out.extend(body.summary_id);
            }
        }
        let mut ids = Vec::new();
        for member in &unit.type_decls[0].body {
            match member {
                ClassMember::Method(m) => {
                    for stmt in &m.body.as_ref().unwrap().statements {
                        if let Stmt::Expression(s) = stmt {
                            collect(&s.expr, &mut ids);
                        }
                    }
                }
                ClassMember::Field(f) => {
                    if let Some(init) = &f.variables[0].initializer {
                        collect(init, &mut ids);
                    }
                }
                _ => {}
            }
        }
        ids
    }

    #[test]
    fn methods_number_in_declaration_order() {
        let mut unit = CompilationUnit::new().with_package("p").with_type(
            ClassDecl::class("A")
                .with_member(method_with("m1", vec![Stmt::expr(anonymous_runnable())]))
                .with_member(method_with("m2", vec![Stmt::expr(anonymous_runnable())])),
        );
        let tree = SummaryTree::build(&mut unit);
        let numbering = tree.renumber();

        let ids = anonymous_ids(&unit);
        assert_eq!(ids.len(), 2);
        assert_eq!(numbering.number(ids[0]), Some(1));
        assert_eq!(numbering.number(ids[1]), Some(2));
        assert_eq!(numbering.binary_name(ids[1]), Some("p.A$2"));
        assert_eq!(numbering.lookup("A$1"), Some(ids[0]));
        assert_eq!(numbering.lookup("p.A$2"), Some(ids[1]));
    }

    #[test]
    fn initializers_then_nested_then_methods() {
        let nested = ClassDecl::class("Inner").with_member(method_with("go", vec![Stmt::expr(anonymous_runnable())]));
        let field = FieldDecl::new(TypeRef::named("Runnable"), "r", Some(anonymous_runnable()));
        let mut unit = CompilationUnit::new().with_type(
            ClassDecl::class("A")
                .with_member(method_with("m1", vec![Stmt::expr(anonymous_runnable())]))
                .with_member(ClassMember::Class(nested))
                .with_member(ClassMember::Field(field)),
        );
        let tree = SummaryTree::build(&mut unit);
        let numbering = tree.renumber();

        // method m1's class and the field's class, in member order
        let ids = anonymous_ids(&unit);
        assert_eq!(numbering.number(ids[1]), Some(1), "field initializer first");
        assert_eq!(numbering.number(ids[0]), Some(3), "method last");
        let inner = tree.class(tree.class(tree.roots()[0]).nested[0]);
        assert_eq!(numbering.binary_name(inner.id), Some("A$Inner"));
        assert_eq!(numbering.lookup("A$2").map(|id| tree.enclosing_class(id)), Some(Some(inner.id)));
    }

    #[test]
    fn anonymous_inside_anonymous_counts_before_later_methods() {
        let inner_run = method_with("run", vec![Stmt::expr(anonymous_runnable())]);
        let outer = Expr::new_object(TypeRef::named("Runnable"), vec![], Some(ClassDecl::anonymous(vec![inner_run])));
        let mut unit = CompilationUnit::new().with_type(
            ClassDecl::class("A")
                .with_member(method_with("m1", vec![Stmt::expr(outer)]))
                .with_member(method_with("m2", vec![Stmt::expr(anonymous_runnable())])),
        );
        let tree = SummaryTree::build(&mut unit);
        let numbering = tree.renumber();
        let ids = anonymous_ids(&unit);
        assert_eq!(numbering.number(ids[0]), Some(1));
        assert_eq!(numbering.number(ids[1]), Some(3));
        assert_eq!(numbering.anonymous().len(), 3);
        assert!(tree.class(ids[0]).superclass.is_some());
    }

    #[test]
    fn local_classes_get_prefixed_names() {
        let mut unit = CompilationUnit::new().with_package("p").with_type(
            ClassDecl::class("A")
                .with_member(method_with("m1", vec![Stmt::LocalClass(ClassDecl::class("Helper"))]))
                .with_member(method_with("m2", vec![Stmt::LocalClass(ClassDecl::class("Helper"))])),
        );
        let tree = SummaryTree::build(&mut unit);
        let numbering = tree.renumber();
        let locals: Vec<_> = tree.classes().iter().filter(|c| c.is_local()).collect();
        assert_eq!(locals.len(), 2);
        assert_eq!(numbering.binary_name(locals[0].id), Some("p.A$1Helper"));
        assert_eq!(numbering.binary_name(locals[1].id), Some("p.A$2Helper"));
        assert_eq!(numbering.number(locals[0].id), None);
    }

    #[test]
    fn constructors_are_ordinary_methods() {
        let ctor = ConstructorDecl::new("A", Block::new(vec![Stmt::expr(anonymous_runnable())]));
        let mut unit = CompilationUnit::new().with_type(
            ClassDecl::class("A")
                .with_member(method_with("m1", vec![Stmt::expr(anonymous_runnable())]))
                .with_member(ClassMember::Constructor(ctor)),
        );
        let tree = SummaryTree::build(&mut unit);
        let numbering = tree.renumber();
        let root = tree.class(tree.roots()[0]);
        let ctor_method = tree.method(root.methods[1]);
        assert_eq!(ctor_method.name, CONSTRUCTOR_NAME);
        assert_eq!(numbering.number(ctor_method.classes[0]), Some(2));
    }
}
