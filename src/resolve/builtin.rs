//! Built-in table of well-known JDK classes
//!
//! Lets units that only touch the standard library resolve without a JDK on
//! the search path.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::classes::{ClassInfo, ClassSource};
use crate::ast::ClassKind;

use ClassKind::{Class, Interface};

// (binary name, kind, superclass, interfaces)
type Entry = (&'static str, ClassKind, Option<&'static str>, &'static [&'static str]);

const SERIALIZABLE: &str = "java.io.Serializable";

static JDK_CLASSES: &[Entry] = &[
    // java.lang
    ("java.lang.Object", Class, None, &[]),
    ("java.lang.String", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Comparable", "java.lang.CharSequence"]),
    ("java.lang.CharSequence", Interface, None, &[]),
    ("java.lang.Comparable", Interface, None, &[]),
    ("java.lang.Cloneable", Interface, None, &[]),
    ("java.lang.Runnable", Interface, None, &[]),
    ("java.lang.Iterable", Interface, None, &[]),
    ("java.lang.AutoCloseable", Interface, None, &[]),
    ("java.lang.Appendable", Interface, None, &[]),
    ("java.lang.Class", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.lang.System", Class, Some("java.lang.Object"), &[]),
    ("java.lang.Math", Class, Some("java.lang.Object"), &[]),
    ("java.lang.Thread", Class, Some("java.lang.Object"), &["java.lang.Runnable"]),
    ("java.lang.Thread$State", Class, Some("java.lang.Enum"), &[]),
    ("java.lang.Enum", Class, Some("java.lang.Object"), &["java.lang.Comparable", SERIALIZABLE]),
    ("java.lang.Number", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.lang.Boolean", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Comparable"]),
    ("java.lang.Character", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Comparable"]),
    ("java.lang.Byte", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.Short", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.Integer", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.Long", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.Float", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.Double", Class, Some("java.lang.Number"), &["java.lang.Comparable"]),
    ("java.lang.StringBuilder", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.CharSequence", "java.lang.Appendable"]),
    ("java.lang.StringBuffer", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.CharSequence", "java.lang.Appendable"]),
    ("java.lang.Throwable", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.lang.Exception", Class, Some("java.lang.Throwable"), &[]),
    ("java.lang.Error", Class, Some("java.lang.Throwable"), &[]),
    ("java.lang.RuntimeException", Class, Some("java.lang.Exception"), &[]),
    ("java.lang.IllegalArgumentException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.IllegalStateException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.NullPointerException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.ArithmeticException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.ClassCastException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.IndexOutOfBoundsException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.ArrayIndexOutOfBoundsException", Class, Some("java.lang.IndexOutOfBoundsException"), &[]),
    ("java.lang.UnsupportedOperationException", Class, Some("java.lang.RuntimeException"), &[]),
    ("java.lang.InterruptedException", Class, Some("java.lang.Exception"), &[]),
    ("java.lang.CloneNotSupportedException", Class, Some("java.lang.Exception"), &[]),
    ("java.lang.AssertionError", Class, Some("java.lang.Error"), &[]),
    ("java.lang.Override", Interface, None, &["java.lang.annotation.Annotation"]),
    ("java.lang.Deprecated", Interface, None, &["java.lang.annotation.Annotation"]),
    ("java.lang.SuppressWarnings", Interface, None, &["java.lang.annotation.Annotation"]),
    ("java.lang.FunctionalInterface", Interface, None, &["java.lang.annotation.Annotation"]),
    ("java.lang.annotation.Annotation", Interface, None, &[]),
    // java.io
    ("java.io.Serializable", Interface, None, &[]),
    ("java.io.Closeable", Interface, None, &["java.lang.AutoCloseable"]),
    ("java.io.Flushable", Interface, None, &[]),
    ("java.io.IOException", Class, Some("java.lang.Exception"), &[]),
    ("java.io.File", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Comparable"]),
    ("java.io.InputStream", Class, Some("java.lang.Object"), &["java.io.Closeable"]),
    ("java.io.OutputStream", Class, Some("java.lang.Object"), &["java.io.Closeable", "java.io.Flushable"]),
    ("java.io.FilterOutputStream", Class, Some("java.io.OutputStream"), &[]),
    ("java.io.PrintStream", Class, Some("java.io.FilterOutputStream"), &["java.lang.Appendable", "java.io.Closeable"]),
    ("java.io.Reader", Class, Some("java.lang.Object"), &["java.io.Closeable"]),
    ("java.io.Writer", Class, Some("java.lang.Object"), &["java.lang.Appendable", "java.io.Closeable", "java.io.Flushable"]),
    // java.util
    ("java.util.Collection", Interface, None, &["java.lang.Iterable"]),
    ("java.util.List", Interface, None, &["java.util.Collection"]),
    ("java.util.Set", Interface, None, &["java.util.Collection"]),
    ("java.util.Queue", Interface, None, &["java.util.Collection"]),
    ("java.util.Deque", Interface, None, &["java.util.Queue"]),
    ("java.util.Map", Interface, None, &[]),
    ("java.util.Map$Entry", Interface, None, &[]),
    ("java.util.Iterator", Interface, None, &[]),
    ("java.util.Enumeration", Interface, None, &[]),
    ("java.util.Comparator", Interface, None, &[]),
    ("java.util.RandomAccess", Interface, None, &[]),
    ("java.util.AbstractCollection", Class, Some("java.lang.Object"), &["java.util.Collection"]),
    ("java.util.AbstractList", Class, Some("java.util.AbstractCollection"), &["java.util.List"]),
    ("java.util.ArrayList", Class, Some("java.util.AbstractList"), &["java.util.List", "java.util.RandomAccess", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.LinkedList", Class, Some("java.util.AbstractList"), &["java.util.List", "java.util.Deque", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.Vector", Class, Some("java.util.AbstractList"), &["java.util.List", "java.util.RandomAccess", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.Stack", Class, Some("java.util.Vector"), &[]),
    ("java.util.AbstractMap", Class, Some("java.lang.Object"), &["java.util.Map"]),
    ("java.util.HashMap", Class, Some("java.util.AbstractMap"), &["java.util.Map", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.TreeMap", Class, Some("java.util.AbstractMap"), &["java.util.Map", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.Dictionary", Class, Some("java.lang.Object"), &[]),
    ("java.util.Hashtable", Class, Some("java.util.Dictionary"), &["java.util.Map", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.Properties", Class, Some("java.util.Hashtable"), &[]),
    ("java.util.AbstractSet", Class, Some("java.util.AbstractCollection"), &["java.util.Set"]),
    ("java.util.HashSet", Class, Some("java.util.AbstractSet"), &["java.util.Set", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.TreeSet", Class, Some("java.util.AbstractSet"), &["java.util.Set", "java.lang.Cloneable", SERIALIZABLE]),
    ("java.util.Arrays", Class, Some("java.lang.Object"), &[]),
    ("java.util.Collections", Class, Some("java.lang.Object"), &[]),
    ("java.util.Objects", Class, Some("java.lang.Object"), &[]),
    ("java.util.Random", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.util.Date", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Cloneable", "java.lang.Comparable"]),
    ("java.util.EventObject", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.util.EventListener", Interface, None, &[]),
    // java.awt
    ("java.awt.Component", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.awt.Container", Class, Some("java.awt.Component"), &[]),
    ("java.awt.List", Class, Some("java.awt.Component"), &[]),
    ("java.awt.Color", Class, Some("java.lang.Object"), &[SERIALIZABLE]),
    ("java.awt.Point", Class, Some("java.lang.Object"), &[SERIALIZABLE, "java.lang.Cloneable"]),
    ("java.awt.event.ActionListener", Interface, None, &["java.util.EventListener"]),
    ("java.awt.event.ActionEvent", Class, Some("java.util.EventObject"), &[]),
];

static INDEX: Lazy<HashMap<&'static str, &'static Entry>> =
    Lazy::new(|| JDK_CLASSES.iter().map(|entry| (entry.0, entry)).collect());

/// Class source backed by the built-in JDK table
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinClasses;

impl BuiltinClasses {
    pub fn new() -> Self {
        Self
    }

    /// Binary names of every built-in class
    pub fn names() -> impl Iterator<Item = &'static str> {
        JDK_CLASSES.iter().map(|entry| entry.0)
    }
}

impl ClassSource for BuiltinClasses {
    fn label(&self) -> &str {
        "builtin"
    }

    fn find(&self, name: &str) -> Option<ClassInfo> {
        let (binary, kind, superclass, interfaces) = **INDEX.get(name)?;
        let mut info = ClassInfo::new(binary, kind).with_interfaces(interfaces.iter().copied());
        info.superclass = superclass.map(str::to_string);
        Some(info)
    }
}
