//! Canonical type identities
//!
//! A [`Type`] is a cheap handle. Two handles are equal only when they point
//! at the same interned identity, so every class and array identity must be
//! obtained through a [`ClassCache`](crate::resolve::ClassCache). Primitive
//! identities are process-wide singletons.

pub mod spelling;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::ast::ClassKind;
use crate::consts::NESTED_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Short => 'S',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
            Primitive::Void => 'V',
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.keyword() == keyword)
    }

    pub fn from_descriptor(descriptor: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.descriptor() == descriptor)
    }
}

static PRIMITIVE_TYPES: Lazy<Vec<Type>> = Lazy::new(|| {
    Primitive::ALL
        .iter()
        .map(|p| Type(Arc::new(TypeKind::Primitive(*p))))
        .collect()
});

/// Identity data of a class or interface
#[derive(Debug)]
pub struct ClassType {
    /// Binary name: `java.util.Map$Entry`, `p.Outer$1`
    pub name: String,
    pub package: String,
    /// Name after the package, nesting included: `Map$Entry`
    pub simple_name: String,
    pub kind: ClassKind,
    pub owner: Option<Type>,
}

#[derive(Debug)]
pub enum TypeKind {
    Primitive(Primitive),
    /// `element` is never itself an array
    Array { element: Type, dims: usize },
    Class(ClassType),
}

/// Handle to an interned canonical type identity
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

impl Type {
    pub fn primitive(primitive: Primitive) -> Type {
        let index = Primitive::ALL
            .iter()
            .position(|p| *p == primitive)
            .unwrap_or_default();
        PRIMITIVE_TYPES[index].clone()
    }

    /// Fresh class identity. Only the interner calls this.
    pub(crate) fn new_class(name: &str, kind: ClassKind, owner: Option<Type>) -> Type {
        let (package, simple_name) = split_binary_name(name);
        Type(Arc::new(TypeKind::Class(ClassType {
            name: name.to_string(),
            package: package.to_string(),
            simple_name: simple_name.to_string(),
            kind,
            owner,
        })))
    }

    /// Fresh array identity. Only the interner calls this.
    pub(crate) fn new_array(element: Type, dims: usize) -> Type {
        let (element, dims) = match element.kind() {
            TypeKind::Array { element: inner, dims: inner_dims } => (inner.clone(), dims + inner_dims),
            _ => (element, dims),
        };
        Type(Arc::new(TypeKind::Array { element, dims }))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn is_primitive(&self) -> bool {
        matches!(*self.0, TypeKind::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(*self.0, TypeKind::Array { .. })
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match &*self.0 {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match &*self.0 {
            TypeKind::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Element type of an array, `None` for non-arrays
    pub fn element(&self) -> Option<&Type> {
        match &*self.0 {
            TypeKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Array depth, zero for non-arrays
    pub fn dimensions(&self) -> usize {
        match &*self.0 {
            TypeKind::Array { dims, .. } => *dims,
            _ => 0,
        }
    }

    /// Canonical name: `int`, `java.util.Map$Entry`, `int[][]`
    pub fn name(&self) -> String {
        match &*self.0 {
            TypeKind::Primitive(p) => p.keyword().to_string(),
            TypeKind::Class(class) => class.name.clone(),
            TypeKind::Array { element, dims } => format!("{}{}", element.name(), "[]".repeat(*dims)),
        }
    }

    /// Descriptor in dotted form: `I`, `Ljava.lang.String;`, `[[I`
    pub fn descriptor(&self) -> String {
        match &*self.0 {
            TypeKind::Primitive(p) => p.descriptor().to_string(),
            TypeKind::Class(class) => format!("L{};", class.name),
            TypeKind::Array { element, dims } => format!("{}{}", "[".repeat(*dims), element.descriptor()),
        }
    }

    /// Name as written in source: nested separators become dots
    pub fn source_name(&self) -> String {
        match &*self.0 {
            TypeKind::Class(class) => class.name.replace(NESTED_SEPARATOR, "."),
            TypeKind::Array { element, dims } => {
                format!("{}{}", element.source_name(), "[]".repeat(*dims))
            }
            TypeKind::Primitive(p) => p.keyword().to_string(),
        }
    }

    pub fn package(&self) -> &str {
        match &*self.0 {
            TypeKind::Class(class) => &class.package,
            TypeKind::Array { element, .. } => element.package(),
            TypeKind::Primitive(_) => "",
        }
    }

    pub fn owner(&self) -> Option<&Type> {
        self.as_class().and_then(|class| class.owner.as_ref())
    }

    pub fn is_interface(&self) -> bool {
        self.as_class().map_or(false, |class| class.kind == ClassKind::Interface)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Split a binary class name into package and the rest
pub fn split_binary_name(name: &str) -> (&str, &str) {
    // Dots never follow the first nested separator
    let head = name.find(NESTED_SEPARATOR).map_or(name, |i| &name[..i]);
    match head.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => ("", name),
    }
}

/// Binary name of the class enclosing a nested binary name
pub fn owner_binary_name(name: &str) -> Option<&str> {
    let (package, simple) = split_binary_name(name);
    let sep = simple.rfind(NESTED_SEPARATOR)?;
    if sep == 0 {
        return None;
    }
    let offset = if package.is_empty() { 0 } else { package.len() + 1 };
    Some(&name[..offset + sep])
}
