use super::{AstNode, Span};
use crate::types::Type;
use std::fmt;

macro_rules! impl_ast_node {
    ($($node:ty),* $(,)?) => {
        $(
            impl AstNode for $node {
                fn span(&self) -> Span {
                    self.span
                }
            }
        )*
    };
}

impl_ast_node!(
    PackageDecl,
    ImportDecl,
    ClassDecl,
    Annotation,
    TypeRef,
    TypeParam,
    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Parameter,
    InitializerBlock,
    Block,
    Comment,
    ExprStmt,
    VarDeclStmt,
    VariableDeclarator,
    IfStmt,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    SwitchStmt,
    SwitchCase,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    TryStmt,
    CatchClause,
    ThrowStmt,
    AssertStmt,
    SynchronizedStmt,
    LabeledStmt,
    LiteralExpr,
    IdentifierExpr,
    BinaryExpr,
    UnaryExpr,
    AssignmentExpr,
    MethodCallExpr,
    FieldAccessExpr,
    ArrayAccessExpr,
    CastExpr,
    InstanceOfExpr,
    ConditionalExpr,
    NewExpr,
    NewArrayExpr,
    ArrayInitializerExpr,
    ParenExpr,
);

// Package and Import Declarations
#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub name: String,
    pub span: Span,
}

impl PackageDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), span: Span::synthetic() }
    }
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

/// `import a.b.C;`, `import a.b.*;` or their static forms.
/// For wildcard imports `name` is the package (or class) before `.*`.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl ImportDecl {
    pub fn single(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_static: false, is_wildcard: false, span: Span::synthetic() }
    }

    pub fn wildcard(package: impl Into<String>) -> Self {
        Self { name: package.into(), is_static: false, is_wildcard: true, span: Span::synthetic() }
    }

    /// Last segment of a single-type import
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Everything before the last segment, empty when there is none
    pub fn owner(&self) -> &str {
        self.name.rfind('.').map(|dot| &self.name[..dot]).unwrap_or("")
    }

    /// Key used to order imports in generated output
    pub fn sort_key(&self) -> (bool, &str, bool) {
        (self.is_static, self.name.as_str(), self.is_wildcard)
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }

        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}

/// Stable handle of a class declaration inside one summary tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Class or interface declaration. Anonymous class bodies are class
/// declarations with an empty name.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub kind: ClassKind,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeRef>,
    /// `implements` for classes, `extends` for interfaces
    pub interfaces: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub comments: Vec<Comment>,
    /// Set by the summary builder
    pub summary_id: Option<ClassId>,
    /// Binary name (`p.Outer$Inner`, `p.Outer$1`) set once the class is entered
    pub binary_name: Option<String>,
    pub span: Span,
}

impl ClassDecl {
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(ClassKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(ClassKind::Interface, name)
    }

    /// Body of an anonymous class instance creation
    pub fn anonymous(body: Vec<ClassMember>) -> Self {
        let mut class = Self::with_kind(ClassKind::Class, "");
        class.body = body;
        class
    }

    fn with_kind(kind: ClassKind, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            kind,
            name: name.into(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            body: Vec::new(),
            comments: Vec::new(),
            summary_id: None,
            binary_name: None,
            span: Span::synthetic(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_member(mut self, member: ClassMember) -> Self {
        self.body.push(member);
        self
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.body.iter().filter_map(|m| match m {
            ClassMember::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn nested_classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.body.iter().filter_map(|m| match m {
            ClassMember::Class(class) => Some(class),
            _ => None,
        })
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        };
        if self.is_anonymous() {
            write!(f, "anonymous {}", keyword)
        } else {
            write!(f, "{} {}", keyword, self.name)
        }
    }
}

// Modifiers and Annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Native => "native",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
        }
    }
}

pub fn is_static(modifiers: &[Modifier]) -> bool {
    modifiers.contains(&Modifier::Static)
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArg>,
    pub resolved: Option<Type>,
    pub span: Span,
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self { name: name.into(), arguments: Vec::new(), resolved: None, span: Span::synthetic() }
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationArg {
    Value(Expr),
    Named(String, Expr),
}

// Type References
#[derive(Debug, Clone)]
pub struct TypeRef {
    /// Name as written: simple (`Hashtable`), qualified (`java.util.Map.Entry`)
    /// or primitive (`int`)
    pub name: String,
    pub type_args: Vec<TypeArg>,
    pub array_dims: usize,
    /// Canonical identity filled in by the traversal
    pub resolved: Option<Type>,
    pub span: Span,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            array_dims: 0,
            resolved: None,
            span: Span::synthetic(),
        }
    }

    pub fn array(name: impl Into<String>, dims: usize) -> Self {
        let mut type_ref = Self::named(name);
        type_ref.array_dims = dims;
        type_ref
    }

    pub fn with_args(mut self, args: Vec<TypeArg>) -> Self {
        self.type_args = args;
        self
    }

    /// Spelling handed to the resolver: the name followed by `[]` per dimension
    pub fn spelling(&self) -> String {
        let mut name = self.name.clone();
        for _ in 0..self.array_dims {
            name.push_str("[]");
        }
        name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match arg {
                    TypeArg::Type(t) => write!(f, "{}", t)?,
                    TypeArg::Wildcard(w) => {
                        write!(f, "?")?;
                        if let Some((kind, bound)) = &w.bound {
                            let keyword = match kind {
                                BoundKind::Extends => "extends",
                                BoundKind::Super => "super",
                            };
                            write!(f, " {} {}", keyword, bound)?;
                        }
                    }
                }
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(WildcardType),
}

#[derive(Debug, Clone)]
pub struct WildcardType {
    pub bound: Option<(BoundKind, TypeRef)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub span: Span,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), bounds: Vec::new(), span: Span::synthetic() }
    }
}

// Class Members
#[derive(Debug, Clone)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Initializer(InitializerBlock),
    Class(ClassDecl),
    Comment(Comment),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub span: Span,
}

impl FieldDecl {
    pub fn new(type_ref: TypeRef, name: impl Into<String>, initializer: Option<Expr>) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_ref,
            variables: vec![VariableDeclarator::new(name, initializer)],
            span: Span::synthetic(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    /// `None` means `void`
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    pub span: Span,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: Option<TypeRef>, body: Option<Block>) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type,
            name: name.into(),
            parameters: Vec::new(),
            throws: Vec::new(),
            body,
            span: Span::synthetic(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Block,
    pub span: Span,
}

impl ConstructorDecl {
    pub fn new(name: impl Into<String>, body: Block) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            name: name.into(),
            parameters: Vec::new(),
            throws: Vec::new(),
            body,
            span: Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

impl Parameter {
    pub fn new(type_ref: TypeRef, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_ref,
            name: name.into(),
            varargs: false,
            span: Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// text`
    Line,
    /// `/* text */`
    Block,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
    pub span: Span,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self { style: CommentStyle::Line, text: text.into(), span: Span::synthetic() }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self { style: CommentStyle::Block, text: text.into(), span: Span::synthetic() }
    }
}

// Statements
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    /// Comments attached to the block itself
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements, comments: Vec::new(), span: Span::synthetic() }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExprStmt),
    Declaration(VarDeclStmt),
    LocalClass(ClassDecl),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Assert(AssertStmt),
    Synchronized(SynchronizedStmt),
    Labeled(LabeledStmt),
    Block(Block),
    Comment(Comment),
    Empty,
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expression(ExprStmt { expr, span: Span::synthetic() })
    }

    pub fn var(type_ref: TypeRef, name: impl Into<String>, initializer: Option<Expr>) -> Self {
        Stmt::Declaration(VarDeclStmt {
            modifiers: Vec::new(),
            type_ref,
            variables: vec![VariableDeclarator::new(name, initializer)],
            span: Span::synthetic(),
        })
    }

    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block(Block::new(statements))
    }

    pub fn if_else(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {
        Stmt::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            span: Span::synthetic(),
        })
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::Return(ReturnStmt { value, span: Span::synthetic() })
    }

    /// Statement kind as shown by the tree dump
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Expression(_) => "ExprStmt",
            Stmt::Declaration(_) => "VarDeclStmt",
            Stmt::LocalClass(_) => "LocalClass",
            Stmt::If(_) => "IfStmt",
            Stmt::While(_) => "WhileStmt",
            Stmt::DoWhile(_) => "DoWhileStmt",
            Stmt::For(_) => "ForStmt",
            Stmt::Switch(_) => "SwitchStmt",
            Stmt::Return(_) => "ReturnStmt",
            Stmt::Break(_) => "BreakStmt",
            Stmt::Continue(_) => "ContinueStmt",
            Stmt::Try(_) => "TryStmt",
            Stmt::Throw(_) => "ThrowStmt",
            Stmt::Assert(_) => "AssertStmt",
            Stmt::Synchronized(_) => "SynchronizedStmt",
            Stmt::Labeled(_) => "LabeledStmt",
            Stmt::Block(_) => "Block",
            Stmt::Comment(_) => "Comment",
            Stmt::Empty => "EmptyStmt",
        }
    }
}

impl AstNode for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Expression(s) => s.span,
            Stmt::Declaration(s) => s.span,
            Stmt::LocalClass(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Assert(s) => s.span,
            Stmt::Synchronized(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Comment(s) => s.span,
            Stmt::Empty => Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub modifiers: Vec<Modifier>,
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: String,
    /// Extra dimensions written after the name: `int a[]`
    pub array_dims: usize,
    pub initializer: Option<Expr>,
    pub span: Span,
}

impl VariableDeclarator {
    pub fn new(name: impl Into<String>, initializer: Option<Expr>) -> Self {
        Self { name: name.into(), array_dims: 0, initializer, span: Span::synthetic() }
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Vec<Stmt>,
    pub condition: Option<Expr>,
    pub update: Vec<ExprStmt>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub expression: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub labels: Vec<Expr>, // empty labels indicates default
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TryStmt {
    pub try_block: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub parameter: Parameter,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssertStmt {
    pub condition: Expr,
    pub message: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SynchronizedStmt {
    pub lock: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: String,
    pub statement: Box<Stmt>,
    pub span: Span,
}

// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Assignment(AssignmentExpr),
    MethodCall(MethodCallExpr),
    FieldAccess(FieldAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Cast(CastExpr),
    InstanceOf(InstanceOfExpr),
    Conditional(ConditionalExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    ArrayInitializer(ArrayInitializerExpr),
    Parenthesized(ParenExpr),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Identifier(IdentifierExpr { name: name.into(), resolved: None, span: Span::synthetic() })
    }

    pub fn literal(value: Literal) -> Self {
        Expr::Literal(LiteralExpr { value, span: Span::synthetic() })
    }

    pub fn int(value: i64) -> Self {
        Self::literal(Literal::Integer(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::String(value.into()))
    }

    pub fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: Span::synthetic(),
        })
    }

    pub fn assign(target: Expr, operator: AssignmentOp, value: Expr) -> Self {
        Expr::Assignment(AssignmentExpr {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            span: Span::synthetic(),
        })
    }

    pub fn call(target: Option<Expr>, name: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::MethodCall(MethodCallExpr {
            target: target.map(Box::new),
            name: name.into(),
            arguments,
            span: Span::synthetic(),
        })
    }

    pub fn field(target: Expr, name: impl Into<String>) -> Self {
        Expr::FieldAccess(FieldAccessExpr {
            target: Box::new(target),
            name: name.into(),
            span: Span::synthetic(),
        })
    }

    pub fn new_object(target_type: TypeRef, arguments: Vec<Expr>, anonymous_body: Option<ClassDecl>) -> Self {
        Expr::New(NewExpr { target_type, arguments, anonymous_body, span: Span::synthetic() })
    }

    pub fn paren(expr: Expr) -> Self {
        Expr::Parenthesized(ParenExpr { expr: Box::new(expr), comments: Vec::new(), span: Span::synthetic() })
    }

    /// Primary expressions never need parentheses of their own
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_)
                | Expr::Identifier(_)
                | Expr::MethodCall(_)
                | Expr::FieldAccess(_)
                | Expr::ArrayAccess(_)
                | Expr::New(_)
                | Expr::NewArray(_)
                | Expr::Parenthesized(_)
        )
    }

    /// Expression kind as shown by the tree dump
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "Literal",
            Expr::Identifier(_) => "Name",
            Expr::Binary(_) => "Binary",
            Expr::Unary(_) => "Unary",
            Expr::Assignment(_) => "Assignment",
            Expr::MethodCall(_) => "MethodCall",
            Expr::FieldAccess(_) => "FieldAccess",
            Expr::ArrayAccess(_) => "ArrayAccess",
            Expr::Cast(_) => "Cast",
            Expr::InstanceOf(_) => "InstanceOf",
            Expr::Conditional(_) => "Conditional",
            Expr::New(_) => "New",
            Expr::NewArray(_) => "NewArray",
            Expr::ArrayInitializer(_) => "ArrayInitializer",
            Expr::Parenthesized(_) => "Parenthesized",
        }
    }
}

impl AstNode for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::FieldAccess(e) => e.span,
            Expr::ArrayAccess(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::InstanceOf(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::New(e) => e.span,
            Expr::NewArray(e) => e.span,
            Expr::ArrayInitializer(e) => e.span,
            Expr::Parenthesized(e) => e.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Null,
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub name: String,
    /// Type of the variable this name is bound to, when it is one
    pub resolved: Option<Type>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, Sub, Mul, Div, Mod,
    Lt, Le, Gt, Ge, Eq, Ne,
    And, Or, Xor, LShift, RShift, URShift,
    LogicalAnd, LogicalOr,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::URShift => ">>>",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::LogicalOr => 3,
            BinaryOp::LogicalAnd => 4,
            BinaryOp::Or => 5,
            BinaryOp::Xor => 6,
            BinaryOp::And => 7,
            BinaryOp::Eq | BinaryOp::Ne => 8,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 9,
            BinaryOp::LShift | BinaryOp::RShift | BinaryOp::URShift => 10,
            BinaryOp::Add | BinaryOp::Sub => 11,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 12,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus, Minus, Not, BitNot, PreInc, PreDec, PostInc, PostDec,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug, Clone, PartialEq, Copy, Eq)]
pub enum AssignmentOp {
    Assign, AddAssign, SubAssign, MulAssign, DivAssign, ModAssign,
    AndAssign, OrAssign, XorAssign, LShiftAssign, RShiftAssign, URShiftAssign,
}

impl AssignmentOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubAssign => "-=",
            AssignmentOp::MulAssign => "*=",
            AssignmentOp::DivAssign => "/=",
            AssignmentOp::ModAssign => "%=",
            AssignmentOp::AndAssign => "&=",
            AssignmentOp::OrAssign => "|=",
            AssignmentOp::XorAssign => "^=",
            AssignmentOp::LShiftAssign => "<<=",
            AssignmentOp::RShiftAssign => ">>=",
            AssignmentOp::URShiftAssign => ">>>=",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub target: Box<Expr>,
    pub operator: AssignmentOp,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub target: Option<Box<Expr>>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldAccessExpr {
    pub target: Box<Expr>,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub target_type: TypeRef,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InstanceOfExpr {
    pub expr: Box<Expr>,
    pub target_type: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    pub target_type: TypeRef,
    pub arguments: Vec<Expr>,
    pub anonymous_body: Option<ClassDecl>,
    pub span: Span,
}

/// `new T[n][]` or `new T[] { ... }`
#[derive(Debug, Clone)]
pub struct NewArrayExpr {
    /// Element type without dimensions
    pub element_type: TypeRef,
    pub dimensions: Vec<Expr>,
    /// Trailing `[]` pairs after the sized dimensions
    pub extra_dims: usize,
    pub initializer: Option<ArrayInitializerExpr>,
    pub span: Span,
}

impl NewArrayExpr {
    pub fn total_dims(&self) -> usize {
        self.dimensions.len() + self.extra_dims
    }
}

#[derive(Debug, Clone)]
pub struct ArrayInitializerExpr {
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub expr: Box<Expr>,
    /// Comments written inside the parentheses
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_parts() {
        let import = ImportDecl::single("java.util.Map.Entry");
        assert_eq!(import.simple_name(), "Entry");
        assert_eq!(import.owner(), "java.util.Map");
        assert_eq!(import.to_string(), "import java.util.Map.Entry;");
        assert_eq!(ImportDecl::wildcard("java.util").to_string(), "import java.util.*;");
    }

    #[test]
    fn type_ref_spelling_includes_dimensions() {
        let t = TypeRef::array("String", 2);
        assert_eq!(t.spelling(), "String[][]");
        let generic = TypeRef::named("Map").with_args(vec![
            TypeArg::Type(TypeRef::named("String")),
            TypeArg::Wildcard(WildcardType {
                bound: Some((BoundKind::Extends, TypeRef::named("Number"))),
                span: Span::synthetic(),
            }),
        ]);
        assert_eq!(generic.to_string(), "Map<String, ? extends Number>");
    }

    #[test]
    fn anonymous_class_has_no_name() {
        let anon = ClassDecl::anonymous(vec![]);
        assert!(anon.is_anonymous());
        assert_eq!(anon.to_string(), "anonymous class");
        assert_eq!(ClassDecl::interface("I").to_string(), "interface I");
    }

    #[test]
    fn operator_precedence_orders_multiplicative_above_additive() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::LogicalAnd.precedence() > BinaryOp::LogicalOr.precedence());
        assert_eq!(AssignmentOp::URShiftAssign.symbol(), ">>>=");
    }
}
