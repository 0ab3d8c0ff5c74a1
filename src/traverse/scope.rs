//! Variable scopes and enclosing-class contexts
//!
//! Both stacks hand out guards, so a frame opened through the public API is
//! always closed again.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::types::Type;

#[derive(Debug, Default)]
struct Frame {
    variables: HashMap<String, Type>,
    type_variables: HashMap<String, Type>,
}

/// Lexical frames of variable bindings, innermost last
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the outermost frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Open a frame that is closed when the guard drops
    pub fn push_scope(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { stack: self }
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    pub(crate) fn pop_frame(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the outermost scope");
        self.frames.pop();
    }

    /// Bind in the innermost frame, shadowing outer bindings
    pub fn bind_variable(&mut self, name: impl Into<String>, ty: Type) {
        self.innermost().variables.insert(name.into(), ty);
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Type> {
        self.frames.iter().rev().find_map(|frame| frame.variables.get(name))
    }

    /// Bind a generic parameter to its erasure
    pub fn bind_type_variable(&mut self, name: impl Into<String>, erasure: Type) {
        self.innermost().type_variables.insert(name.into(), erasure);
    }

    pub fn lookup_type_variable(&self, name: &str) -> Option<&Type> {
        self.frames.iter().rev().find_map(|frame| frame.type_variables.get(name))
    }

    /// Number of open frames, the outermost included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn innermost(&mut self) -> &mut Frame {
        // the outermost frame is never popped
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

pub struct ScopeGuard<'a> {
    stack: &'a mut ScopeStack,
}

impl Deref for ScopeGuard<'_> {
    type Target = ScopeStack;

    fn deref(&self) -> &ScopeStack {
        self.stack
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ScopeStack {
        self.stack
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop_frame();
    }
}

/// Enclosing classes, innermost last
#[derive(Debug, Default)]
pub struct ClassContextStack {
    classes: Vec<Type>,
}

impl ClassContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a class until the guard drops
    pub fn enter_class(&mut self, class: Type) -> ClassGuard<'_> {
        self.classes.push(class);
        ClassGuard { stack: self }
    }

    pub(crate) fn push(&mut self, class: Type) {
        self.classes.push(class);
    }

    /// Leave the innermost class.
    ///
    /// # Panics
    ///
    /// Panics when no class has been entered.
    pub fn leave_class(&mut self) -> Type {
        match self.classes.pop() {
            Some(class) => class,
            None => panic!("leave_class called with no enclosing class"),
        }
    }

    pub fn current_class(&self) -> Option<&Type> {
        self.classes.last()
    }

    /// Package of the innermost class, or `unit_package` outside any class
    pub fn current_package<'a>(&'a self, unit_package: &'a str) -> &'a str {
        match self.current_class() {
            Some(class) => class.package(),
            None => unit_package,
        }
    }

    pub fn depth(&self) -> usize {
        self.classes.len()
    }
}

pub struct ClassGuard<'a> {
    stack: &'a mut ClassContextStack,
}

impl Deref for ClassGuard<'_> {
    type Target = ClassContextStack;

    fn deref(&self) -> &ClassContextStack {
        self.stack
    }
}

impl DerefMut for ClassGuard<'_> {
    fn deref_mut(&mut self) -> &mut ClassContextStack {
        self.stack
    }
}

impl Drop for ClassGuard<'_> {
    fn drop(&mut self) {
        self.stack.leave_class();
    }
}

/// Both stacks of one traversal
#[derive(Debug, Default)]
pub struct Tracker {
    pub scopes: ScopeStack,
    pub classes: ClassContextStack,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` inside a fresh variable frame
    pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut Tracker) -> R) -> R {
        self.scopes.push_frame();
        let result = f(self);
        self.scopes.pop_frame();
        result
    }

    /// Run `f` with `class` as the innermost enclosing class
    pub fn with_class<R>(&mut self, class: Type, f: impl FnOnce(&mut Tracker) -> R) -> R {
        self.classes.push(class);
        let result = f(self);
        self.classes.leave_class();
        result
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Type> {
        self.scopes.lookup_variable(name)
    }

    pub fn current_class(&self) -> Option<&Type> {
        self.classes.current_class()
    }
}
