use std::fmt::Write as _;
use std::io;

use crate::ast::*;
use crate::config::Config;
use crate::error::Result;

// Expression binding strengths; binary operators use `BinaryOp::precedence`
const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const RELATIONAL: u8 = 9;
const PREFIX: u8 = 13;
const POSTFIX: u8 = 14;
/// Array creation: a valid member-access target but not an array operand
const NEW_ARRAY: u8 = 15;
const PRIMARY: u8 = 16;

/// Regenerates source text from a compilation unit.
///
/// The generator only reads the tree: no resolution happens here, and the
/// output depends on nothing but the tree and the indentation width.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    indent_width: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl CodeGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            indent_width: config.indent_width,
        }
    }

    /// Write the source of `unit` to `sink`
    pub fn generate<W: io::Write>(&self, unit: &CompilationUnit, sink: &mut W) -> Result<()> {
        let source = self.generate_to_string(unit);
        sink.write_all(source.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    pub fn generate_to_string(&self, unit: &CompilationUnit) -> String {
        let mut printer = SourcePrinter::new(self.indent_width);
        printer.unit(unit);
        log::debug!("generated {} bytes", printer.output.len());
        printer.output
    }

    /// Source of a single expression
    pub fn expression(&self, expr: &Expr) -> String {
        let mut printer = SourcePrinter::new(self.indent_width);
        printer.expr(expr);
        printer.output
    }

    /// Source of a single statement at indentation level zero
    pub fn statement(&self, stmt: &Stmt) -> String {
        let mut printer = SourcePrinter::new(self.indent_width);
        printer.statement(stmt);
        printer.output
    }
}

struct SourcePrinter {
    indent_level: usize,
    indent_width: usize,
    output: String,
}

impl SourcePrinter {
    fn new(indent_width: usize) -> Self {
        Self {
            indent_level: 0,
            indent_width,
            output: String::new(),
        }
    }

    fn indent(&mut self) {
        self.indent_level += self.indent_width;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(self.indent_width);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn push(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }

    fn comma_separated<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            each(self, item);
        }
    }

    // Declarations

    fn unit(&mut self, unit: &CompilationUnit) {
        for comment in &unit.header_comments {
            self.comment_line(comment);
        }
        if let Some(package) = &unit.package_decl {
            self.writeln(&package.to_string());
            self.newline();
        }

        let mut imports: Vec<&ImportDecl> = unit.imports.iter().collect();
        imports.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        for import in &imports {
            self.writeln(&import.to_string());
        }
        if !imports.is_empty() {
            self.newline();
        }

        for (i, class) in unit.type_decls.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.class_decl(class);
        }
    }

    fn comment_line(&mut self, comment: &Comment) {
        self.write_indent();
        self.comment(comment);
        self.newline();
    }

    fn comment(&mut self, comment: &Comment) {
        match comment.style {
            CommentStyle::Line => {
                let _ = write!(self.output, "// {}", comment.text);
            }
            CommentStyle::Block => {
                let _ = write!(self.output, "/* {} */", comment.text);
            }
        }
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.push(modifier.keyword());
            self.push(" ");
        }
    }

    fn annotation(&mut self, annotation: &Annotation) {
        self.push("@");
        self.push(&annotation.name);
        if annotation.arguments.is_empty() {
            return;
        }
        self.push("(");
        self.comma_separated(&annotation.arguments, |p, argument| match argument {
            AnnotationArg::Value(value) => p.expr(value),
            AnnotationArg::Named(name, value) => {
                p.push(name);
                p.push(" = ");
                p.expr(value);
            }
        });
        self.push(")");
    }

    /// Annotations of a declaration, one per line
    fn annotation_lines(&mut self, annotations: &[Annotation]) {
        for annotation in annotations {
            self.write_indent();
            self.annotation(annotation);
            self.newline();
        }
    }

    fn type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.push("<");
        self.comma_separated(params, |p, param| {
            p.push(&param.name);
            for (i, bound) in param.bounds.iter().enumerate() {
                p.push(if i == 0 { " extends " } else { " & " });
                p.push(&bound.to_string());
            }
        });
        self.push(">");
    }

    fn type_list(&mut self, keyword: &str, types: &[TypeRef]) {
        if types.is_empty() {
            return;
        }
        self.push(keyword);
        self.comma_separated(types, |p, ty| p.push(&ty.to_string()));
    }

    fn class_decl(&mut self, class: &ClassDecl) {
        for comment in &class.comments {
            self.comment_line(comment);
        }
        self.annotation_lines(&class.annotations);
        self.write_indent();
        self.modifiers(&class.modifiers);
        self.push(if class.is_interface() { "interface " } else { "class " });
        self.push(&class.name);
        self.type_params(&class.type_params);
        if let Some(superclass) = &class.superclass {
            self.push(" extends ");
            self.push(&superclass.to_string());
        }
        if class.is_interface() {
            self.type_list(" extends ", &class.interfaces);
        } else {
            self.type_list(" implements ", &class.interfaces);
        }
        self.push(" ");
        self.class_body(&class.body);
        self.newline();
    }

    /// `{ members }`, ending at the closing brace
    fn class_body(&mut self, members: &[ClassMember]) {
        self.push("{\n");
        self.indent();
        let mut previous: Option<&ClassMember> = None;
        for member in members {
            let packed = matches!(
                (previous, member),
                (Some(ClassMember::Field(_)), ClassMember::Field(_))
                    | (Some(ClassMember::Comment(_)), _)
            );
            if previous.is_some() && !packed {
                self.newline();
            }
            self.member(member);
            previous = Some(member);
        }
        self.dedent();
        self.write_indent();
        self.push("}");
    }

    fn member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Field(field) => {
                self.annotation_lines(&field.annotations);
                self.write_indent();
                self.modifiers(&field.modifiers);
                self.push(&field.type_ref.to_string());
                self.push(" ");
                self.declarators(&field.variables);
                self.push(";\n");
            }
            ClassMember::Method(method) => {
                self.annotation_lines(&method.annotations);
                self.write_indent();
                self.modifiers(&method.modifiers);
                if !method.type_params.is_empty() {
                    self.type_params(&method.type_params);
                    self.push(" ");
                }
                match &method.return_type {
                    Some(return_type) => self.push(&return_type.to_string()),
                    None => self.push("void"),
                }
                self.push(" ");
                self.push(&method.name);
                self.parameters(&method.parameters);
                self.type_list(" throws ", &method.throws);
                match &method.body {
                    Some(body) => {
                        self.push(" ");
                        self.block(body);
                        self.newline();
                    }
                    None => self.push(";\n"),
                }
            }
            ClassMember::Constructor(ctor) => {
                self.annotation_lines(&ctor.annotations);
                self.write_indent();
                self.modifiers(&ctor.modifiers);
                self.push(&ctor.name);
                self.parameters(&ctor.parameters);
                self.type_list(" throws ", &ctor.throws);
                self.push(" ");
                self.block(&ctor.body);
                self.newline();
            }
            ClassMember::Initializer(init) => {
                self.write_indent();
                if init.is_static {
                    self.push("static ");
                }
                self.block(&init.body);
                self.newline();
            }
            ClassMember::Class(class) => self.class_decl(class),
            ClassMember::Comment(comment) => self.comment_line(comment),
        }
    }

    fn parameters(&mut self, parameters: &[Parameter]) {
        self.push("(");
        self.comma_separated(parameters, |p, parameter| p.parameter(parameter));
        self.push(")");
    }

    fn parameter(&mut self, parameter: &Parameter) {
        for annotation in &parameter.annotations {
            self.annotation(annotation);
            self.push(" ");
        }
        self.modifiers(&parameter.modifiers);
        self.push(&parameter.type_ref.to_string());
        if parameter.varargs {
            self.push("...");
        }
        self.push(" ");
        self.push(&parameter.name);
    }

    fn declarators(&mut self, variables: &[VariableDeclarator]) {
        self.comma_separated(variables, |p, var| {
            p.push(&var.name);
            for _ in 0..var.array_dims {
                p.push("[]");
            }
            if let Some(init) = &var.initializer {
                p.push(" = ");
                p.operand(init, ASSIGNMENT);
            }
        });
    }

    fn var_decl(&mut self, decl: &VarDeclStmt) {
        self.modifiers(&decl.modifiers);
        self.push(&decl.type_ref.to_string());
        self.push(" ");
        self.declarators(&decl.variables);
    }

    // Statements

    /// `{ statements }`, ending at the closing brace
    fn block(&mut self, block: &Block) {
        self.push("{\n");
        self.indent();
        for comment in &block.comments {
            self.comment_line(comment);
        }
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.dedent();
        self.write_indent();
        self.push("}");
    }

    /// A complete statement on its own line(s)
    fn statement(&mut self, stmt: &Stmt) {
        if let Stmt::LocalClass(class) = stmt {
            self.class_decl(class);
            return;
        }
        self.write_indent();
        self.statement_body(stmt);
    }

    /// The body of a compound statement. Returns true when it ended with a
    /// closing brace and no newline.
    fn body(&mut self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Block(block) => {
                self.push(" ");
                self.block(block);
                true
            }
            other => {
                self.newline();
                self.indent();
                self.statement(other);
                self.dedent();
                false
            }
        }
    }

    /// Statement text after the indentation, through the final newline
    fn statement_body(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(s) => {
                self.expr(&s.expr);
                self.push(";\n");
            }
            Stmt::Declaration(decl) => {
                self.var_decl(decl);
                self.push(";\n");
            }
            Stmt::LocalClass(class) => {
                self.newline();
                self.class_decl(class);
            }
            Stmt::If(s) => self.if_stmt(s),
            Stmt::While(s) => {
                self.push("while (");
                self.expr(&s.condition);
                self.push(")");
                if self.body(&s.body) {
                    self.newline();
                }
            }
            Stmt::DoWhile(s) => {
                self.push("do");
                if self.body(&s.body) {
                    self.push(" ");
                } else {
                    self.write_indent();
                }
                self.push("while (");
                self.expr(&s.condition);
                self.push(");\n");
            }
            Stmt::For(s) => {
                self.push("for (");
                match s.init.as_slice() {
                    [Stmt::Declaration(decl)] => self.var_decl(decl),
                    init => self.comma_separated(init, |p, stmt| {
                        if let Stmt::Expression(e) = stmt {
                            p.expr(&e.expr);
                        }
                    }),
                }
                self.push(";");
                if let Some(condition) = &s.condition {
                    self.push(" ");
                    self.expr(condition);
                }
                self.push(";");
                if !s.update.is_empty() {
                    self.push(" ");
                    self.comma_separated(&s.update, |p, update| p.expr(&update.expr));
                }
                self.push(")");
                if self.body(&s.body) {
                    self.newline();
                }
            }
            Stmt::Switch(s) => {
                self.push("switch (");
                self.expr(&s.expression);
                self.push(") {\n");
                self.indent();
                for case in &s.cases {
                    if case.labels.is_empty() {
                        self.writeln("default:");
                    }
                    for label in &case.labels {
                        self.write_indent();
                        self.push("case ");
                        self.expr(label);
                        self.push(":\n");
                    }
                    self.indent();
                    for stmt in &case.statements {
                        self.statement(stmt);
                    }
                    self.dedent();
                }
                self.dedent();
                self.writeln("}");
            }
            Stmt::Return(s) => {
                self.push("return");
                if let Some(value) = &s.value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";\n");
            }
            Stmt::Break(s) => self.jump("break", s.label.as_deref()),
            Stmt::Continue(s) => self.jump("continue", s.label.as_deref()),
            Stmt::Try(s) => {
                self.push("try ");
                self.block(&s.try_block);
                for catch in &s.catch_clauses {
                    self.push(" catch (");
                    self.parameter(&catch.parameter);
                    self.push(") ");
                    self.block(&catch.block);
                }
                if let Some(finally) = &s.finally_block {
                    self.push(" finally ");
                    self.block(finally);
                }
                self.newline();
            }
            Stmt::Throw(s) => {
                self.push("throw ");
                self.expr(&s.expr);
                self.push(";\n");
            }
            Stmt::Assert(s) => {
                self.push("assert ");
                self.expr(&s.condition);
                if let Some(message) = &s.message {
                    self.push(" : ");
                    self.expr(message);
                }
                self.push(";\n");
            }
            Stmt::Synchronized(s) => {
                self.push("synchronized (");
                self.expr(&s.lock);
                self.push(") ");
                self.block(&s.body);
                self.newline();
            }
            Stmt::Labeled(s) => {
                self.push(&s.label);
                self.push(": ");
                self.statement_body(&s.statement);
            }
            Stmt::Block(block) => {
                self.block(block);
                self.newline();
            }
            Stmt::Comment(comment) => {
                self.comment(comment);
                self.newline();
            }
            Stmt::Empty => self.push(";\n"),
        }
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.push("if (");
        self.expr(&s.condition);
        self.push(")");
        let braced = match s.else_branch {
            // an else-less `if` at the end of the then-branch would take the else
            Some(_) if !matches!(*s.then_branch, Stmt::Block(_)) && ends_open(&s.then_branch) => {
                self.push(" {\n");
                self.indent();
                self.statement(&s.then_branch);
                self.dedent();
                self.write_indent();
                self.push("}");
                true
            }
            _ => self.body(&s.then_branch),
        };
        match s.else_branch.as_deref() {
            None => {
                if braced {
                    self.newline();
                }
            }
            Some(else_branch) => {
                if braced {
                    self.push(" else");
                } else {
                    self.write_indent();
                    self.push("else");
                }
                match else_branch {
                    Stmt::If(chained) => {
                        self.push(" ");
                        self.if_stmt(chained);
                    }
                    other => {
                        if self.body(other) {
                            self.newline();
                        }
                    }
                }
            }
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.push(keyword);
        if let Some(label) = label {
            self.push(" ");
            self.push(label);
        }
        self.push(";\n");
    }

    // Expressions

    /// Write `expr`, parenthesized when it binds looser than `required`
    fn operand(&mut self, expr: &Expr, required: u8) {
        if precedence(expr) < required {
            self.push("(");
            self.expr(expr);
            self.push(")");
        } else {
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(e) => self.literal(&e.value),
            Expr::Identifier(e) => self.push(&e.name),
            Expr::Binary(e) => {
                let level = e.operator.precedence();
                self.operand(&e.left, level);
                self.push(" ");
                self.push(e.operator.symbol());
                self.push(" ");
                self.operand(&e.right, level + 1);
            }
            Expr::Unary(e) if e.operator.is_postfix() => {
                self.operand(&e.operand, NEW_ARRAY);
                self.push(e.operator.symbol());
            }
            Expr::Unary(e) => {
                let symbol = e.operator.symbol();
                self.push(symbol);
                // `- -x` and `+ +x` must not fuse into `--x`/`++x`
                if leading_sign(&e.operand).is_some_and(|sign| symbol.starts_with(sign)) {
                    self.push(" ");
                }
                self.operand(&e.operand, PREFIX);
            }
            Expr::Assignment(e) => {
                self.operand(&e.target, NEW_ARRAY);
                self.push(" ");
                self.push(e.operator.symbol());
                self.push(" ");
                self.operand(&e.value, ASSIGNMENT);
            }
            Expr::MethodCall(e) => {
                if let Some(target) = &e.target {
                    self.operand(target, NEW_ARRAY);
                    self.push(".");
                }
                self.push(&e.name);
                self.arguments(&e.arguments);
            }
            Expr::FieldAccess(e) => {
                self.operand(&e.target, NEW_ARRAY);
                self.push(".");
                self.push(&e.name);
            }
            Expr::ArrayAccess(e) => {
                self.operand(&e.array, PRIMARY);
                self.push("[");
                self.expr(&e.index);
                self.push("]");
            }
            Expr::Cast(e) => {
                self.push("(");
                self.push(&e.target_type.to_string());
                self.push(") ");
                // `(Integer) -x` would read as a subtraction
                let reference_cast = e.target_type.array_dims > 0
                    || crate::types::Primitive::from_keyword(&e.target_type.name).is_none();
                if reference_cast && leading_sign(&e.expr).is_some() {
                    self.push("(");
                    self.expr(&e.expr);
                    self.push(")");
                } else {
                    self.operand(&e.expr, PREFIX);
                }
            }
            Expr::InstanceOf(e) => {
                self.operand(&e.expr, RELATIONAL);
                self.push(" instanceof ");
                self.push(&e.target_type.to_string());
            }
            Expr::Conditional(e) => {
                self.operand(&e.condition, CONDITIONAL + 1);
                self.push(" ? ");
                self.operand(&e.then_expr, ASSIGNMENT);
                self.push(" : ");
                self.operand(&e.else_expr, CONDITIONAL);
            }
            Expr::New(e) => {
                self.push("new ");
                self.push(&e.target_type.to_string());
                self.arguments(&e.arguments);
                if let Some(body) = &e.anonymous_body {
                    self.push(" ");
                    self.class_body(&body.body);
                }
            }
            Expr::NewArray(e) => {
                self.push("new ");
                self.push(&e.element_type.to_string());
                for dimension in &e.dimensions {
                    self.push("[");
                    self.expr(dimension);
                    self.push("]");
                }
                for _ in 0..e.extra_dims {
                    self.push("[]");
                }
                if let Some(init) = &e.initializer {
                    self.push(" ");
                    self.array_initializer(init);
                }
            }
            Expr::ArrayInitializer(e) => self.array_initializer(e),
            Expr::Parenthesized(e) => {
                self.push("(");
                for comment in &e.comments {
                    // line comments would swallow the closing parenthesis
                    let _ = write!(self.output, "/* {} */ ", comment.text);
                }
                self.expr(&e.expr);
                self.push(")");
            }
        }
    }

    fn arguments(&mut self, arguments: &[Expr]) {
        self.push("(");
        self.comma_separated(arguments, |p, argument| p.expr(argument));
        self.push(")");
    }

    fn array_initializer(&mut self, init: &ArrayInitializerExpr) {
        self.push("{");
        self.comma_separated(&init.values, |p, value| p.expr(value));
        self.push("}");
    }

    fn literal(&mut self, literal: &Literal) {
        let out = &mut self.output;
        let _ = match literal {
            Literal::Integer(value) => write!(out, "{}", value),
            Literal::Long(value) => write!(out, "{}L", value),
            Literal::Float(value) => match special_float(*value, "Float") {
                Some(constant) => write!(out, "{}", constant),
                None => write!(out, "{:?}f", value),
            },
            Literal::Double(value) => match special_float(*value, "Double") {
                Some(constant) => write!(out, "{}", constant),
                None => write!(out, "{:?}", value),
            },
            Literal::Boolean(value) => write!(out, "{}", value),
            Literal::Char(c) => {
                out.push('\'');
                escape_into(out, *c, '\'');
                out.push('\'');
                Ok(())
            }
            Literal::String(s) => {
                out.push('"');
                for c in s.chars() {
                    escape_into(out, c, '"');
                }
                out.push('"');
                Ok(())
            }
            Literal::Null => write!(out, "null"),
        };
    }
}

/// Whether `stmt` ends with an `if` that has no `else`
fn ends_open(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If(s) => s.else_branch.as_deref().map_or(true, ends_open),
        Stmt::While(s) => ends_open(&s.body),
        Stmt::For(s) => ends_open(&s.body),
        Stmt::Labeled(s) => ends_open(&s.statement),
        _ => false,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assignment(_) => ASSIGNMENT,
        Expr::Conditional(_) => CONDITIONAL,
        Expr::Binary(e) => e.operator.precedence(),
        Expr::InstanceOf(_) => RELATIONAL,
        Expr::Unary(e) if e.operator.is_postfix() => POSTFIX,
        Expr::Unary(_) | Expr::Cast(_) => PREFIX,
        Expr::Literal(_) if leading_sign(expr).is_some() => PREFIX,
        Expr::NewArray(_) => NEW_ARRAY,
        _ => PRIMARY,
    }
}

/// The sign an expression's source text starts with, if any
fn leading_sign(expr: &Expr) -> Option<char> {
    match expr {
        Expr::Unary(e) if !e.operator.is_postfix() => e.operator.symbol().chars().next(),
        Expr::Literal(LiteralExpr { value: Literal::Integer(v) | Literal::Long(v), .. }) if *v < 0 => Some('-'),
        Expr::Literal(LiteralExpr { value: Literal::Float(v) | Literal::Double(v), .. })
            if v.is_finite() && v.is_sign_negative() =>
        {
            Some('-')
        }
        _ => None,
    }
}

fn special_float(value: f64, class: &str) -> Option<String> {
    if value.is_nan() {
        Some(format!("{}.NaN", class))
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "POSITIVE" } else { "NEGATIVE" };
        Some(format!("{}.{}_INFINITY", class, sign))
    } else {
        None
    }
}

fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(unit: &CompilationUnit) -> String {
        CodeGenerator::default().generate_to_string(unit)
    }

    fn expression(expr: &Expr) -> String {
        CodeGenerator::default().expression(expr)
    }

    fn method(statements: Vec<Stmt>) -> ClassMember {
        ClassMember::Method(
            MethodDecl::new("m", Some(TypeRef::named("void")), Some(Block::new(statements)))
                .with_modifiers(vec![Modifier::Public]),
        )
    }

    #[test]
    fn imports_are_sorted_with_static_last() {
        let unit = CompilationUnit::new()
            .with_package("p")
            .with_import(ImportDecl {
                name: "java.lang.Math.max".into(),
                is_static: true,
                is_wildcard: false,
                span: Span::synthetic(),
            })
            .with_import(ImportDecl::wildcard("java.util"))
            .with_import(ImportDecl::single("java.io.File"))
            .with_type(ClassDecl::class("A"));
        assert_eq!(
            generate(&unit),
            "package p;\n\nimport java.io.File;\nimport java.util.*;\nimport static java.lang.Math.max;\n\nclass A {\n}\n"
        );
    }

    #[test]
    fn closing_braces_share_lines_with_continuations() {
        let if_chain = Stmt::if_else(
            Expr::name("a"),
            Stmt::block(vec![Stmt::ret(None)]),
            Some(Stmt::if_else(Expr::name("b"), Stmt::expr(Expr::call(None, "f", vec![])), None)),
        );
        let do_while = Stmt::DoWhile(DoWhileStmt {
            body: Box::new(Stmt::block(vec![])),
            condition: Expr::name("c"),
            span: Span::synthetic(),
        });
        let unit = CompilationUnit::new().with_type(ClassDecl::class("A").with_member(method(vec![if_chain, do_while])));
        let expected = "\
class A {
    public void m() {
        if (a) {
            return;
        } else if (b)
            f();
        do {
        } while (c);
    }
}
";
        assert_eq!(generate(&unit), expected);
    }

    #[test]
    fn nested_if_keeps_its_else_with_the_outer_if() {
        let call = |name: &str| Stmt::expr(Expr::call(None, name, vec![]));
        let dangling = Stmt::if_else(
            Expr::name("a"),
            Stmt::if_else(Expr::name("b"), call("x"), None),
            Some(call("y")),
        );
        let through_loop = Stmt::if_else(
            Expr::name("c"),
            Stmt::While(WhileStmt {
                condition: Expr::name("d"),
                body: Box::new(Stmt::if_else(Expr::name("e"), call("x"), None)),
                span: Span::synthetic(),
            }),
            Some(call("y")),
        );
        let closed = Stmt::if_else(
            Expr::name("f"),
            Stmt::if_else(Expr::name("g"), call("x"), Some(call("z"))),
            Some(call("y")),
        );
        let unit = CompilationUnit::new()
            .with_type(ClassDecl::class("A").with_member(method(vec![dangling, through_loop, closed])));
        let expected = "\
class A {
    public void m() {
        if (a) {
            if (b)
                x();
        } else
            y();
        if (c) {
            while (d)
                if (e)
                    x();
        } else
            y();
        if (f)
            if (g)
                x();
            else
                z();
        else
            y();
    }
}
";
        assert_eq!(generate(&unit), expected);
    }

    #[test]
    fn try_catch_finally() {
        let stmt = Stmt::Try(TryStmt {
            try_block: Block::new(vec![Stmt::expr(Expr::call(None, "risky", vec![]))]),
            catch_clauses: vec![CatchClause {
                parameter: Parameter::new(TypeRef::named("Exception"), "e"),
                block: Block::new(vec![]),
                span: Span::synthetic(),
            }],
            finally_block: Some(Block::new(vec![])),
            span: Span::synthetic(),
        });
        let text = CodeGenerator::default().statement(&stmt);
        assert_eq!(text, "try {\n    risky();\n} catch (Exception e) {\n} finally {\n}\n");
    }

    #[test]
    fn handler_built_trees_are_parenthesized() {
        let sum = Expr::binary(Expr::name("a"), BinaryOp::Add, Expr::name("b"));
        let product = Expr::binary(sum.clone(), BinaryOp::Mul, Expr::name("c"));
        assert_eq!(expression(&product), "(a + b) * c");

        let nested_right = Expr::binary(Expr::name("a"), BinaryOp::Sub, sum.clone());
        assert_eq!(expression(&nested_right), "a - (a + b)");

        let call = Expr::call(Some(sum), "hashCode", vec![]);
        assert_eq!(expression(&call), "(a + b).hashCode()");

        let assigned = Expr::assign(Expr::name("x"), AssignmentOp::Assign, Expr::assign(Expr::name("y"), AssignmentOp::Assign, Expr::int(1)));
        assert_eq!(expression(&assigned), "x = y = 1");

        let negated = Expr::Unary(UnaryExpr {
            operator: UnaryOp::Minus,
            operand: Box::new(Expr::int(-1)),
            span: Span::synthetic(),
        });
        assert_eq!(expression(&negated), "- -1");
    }

    #[test]
    fn literals_are_escaped_and_suffixed() {
        assert_eq!(expression(&Expr::string("a\"b\\c\n")), r#""a\"b\\c\n""#);
        assert_eq!(expression(&Expr::literal(Literal::Char('\''))), r"'\''");
        assert_eq!(expression(&Expr::literal(Literal::Long(7))), "7L");
        assert_eq!(expression(&Expr::literal(Literal::Float(1.5))), "1.5f");
        assert_eq!(expression(&Expr::literal(Literal::Double(2.0))), "2.0");
        assert_eq!(expression(&Expr::literal(Literal::Double(f64::NAN))), "Double.NaN");
    }

    #[test]
    fn anonymous_bodies_are_indented_with_their_statement() {
        let run = MethodDecl::new("run", Some(TypeRef::named("void")), Some(Block::new(vec![])));
        let anon = Expr::new_object(TypeRef::named("Runnable"), vec![], Some(ClassDecl::anonymous(vec![ClassMember::Method(run)])));
        let unit = CompilationUnit::new()
            .with_type(ClassDecl::class("A").with_member(method(vec![Stmt::var(TypeRef::named("Runnable"), "r", Some(anon))])));
        let expected = "\
class A {
    public void m() {
        Runnable r = new Runnable() {
            void run() {
            }
        };
    }
}
";
        assert_eq!(generate(&unit), expected);
    }

    #[test]
    fn indent_width_is_configurable() {
        let generator = CodeGenerator::new(&Config::default().with_indent_width(2));
        let unit = CompilationUnit::new().with_type(ClassDecl::class("A").with_member(method(vec![Stmt::ret(None)])));
        assert_eq!(
            generator.generate_to_string(&unit),
            "class A {\n  public void m() {\n    return;\n  }\n}\n"
        );
    }

    #[test]
    fn sink_errors_surface_as_io() {
        struct Closed;
        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let unit = CompilationUnit::new().with_type(ClassDecl::class("A"));
        let err = CodeGenerator::default().generate(&unit, &mut Closed).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
