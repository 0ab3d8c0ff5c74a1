//! The class universe: every class a direct lookup can find
//!
//! Sources are consulted in order; the first one that knows a canonical
//! name answers for it.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;

use crate::ast::ClassKind;
use crate::consts::OBJECT_CLASS;
use crate::types::owner_binary_name;

/// What a source knows about one class. All names are binary names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub kind: ClassKind,
    pub owner: Option<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassInfo {
    /// A class whose owner follows from its binary name and whose
    /// supertypes are not known yet
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let name = name.into();
        let owner = owner_binary_name(&name).map(str::to_string);
        Self {
            name,
            kind,
            owner,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces = interfaces.into_iter().map(Into::into).collect();
        self
    }
}

/// A provider of class information keyed by binary name
pub trait ClassSource: Send + Sync {
    /// Short label used in log output
    fn label(&self) -> &str;

    fn find(&self, name: &str) -> Option<ClassInfo>;
}

/// Owner, superclass and interfaces of a class, by binary name.
///
/// This is all the nested-class search needs to know about the type system.
pub trait Hierarchy {
    fn owner(&self, class: &str) -> Option<String>;
    fn superclass(&self, class: &str) -> Option<String>;
    fn interfaces(&self, class: &str) -> Vec<String>;
}

/// Visit `start` and everything reachable through owner, superclass and
/// interface edges, breadth-first and each class once, until `visit`
/// returns a result.
pub fn breadth_first<H, T, F>(hierarchy: &H, start: &str, mut visit: F) -> Option<T>
where
    H: Hierarchy + ?Sized,
    F: FnMut(&str) -> Option<T>,
{
    let mut visited = HashSet::new();
    let mut worklist = VecDeque::new();
    worklist.push_back(start.to_string());

    while let Some(class) = worklist.pop_front() {
        if !visited.insert(class.clone()) {
            continue;
        }
        if let Some(found) = visit(&class) {
            return Some(found);
        }

        let neighbours = hierarchy
            .owner(&class)
            .into_iter()
            .chain(hierarchy.superclass(&class))
            .chain(hierarchy.interfaces(&class));
        for next in neighbours {
            if !visited.contains(&next) {
                worklist.push_back(next);
            }
        }
    }
    None
}

/// Concurrency-safe in-memory class table.
///
/// Holds the classes declared by the units being transformed and anything
/// a caller registers up front.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: DashMap<String, ClassInfo>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a class
    pub fn register(&self, info: ClassInfo) {
        log::trace!("registering class {}", info.name);
        self.classes.insert(info.name.clone(), info);
    }

    /// Record the supertypes of an already registered class
    pub fn set_supertypes(&self, name: &str, superclass: Option<String>, interfaces: Vec<String>) -> bool {
        match self.classes.get_mut(name) {
            Some(mut entry) => {
                entry.superclass = superclass;
                entry.interfaces = interfaces;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassSource for ClassRegistry {
    fn label(&self) -> &str {
        "registry"
    }

    fn find(&self, name: &str) -> Option<ClassInfo> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }
}

/// Ordered list of class sources
#[derive(Clone, Default)]
pub struct ClassUniverse {
    sources: Vec<Arc<dyn ClassSource>>,
}

impl ClassUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn ClassSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn push(&mut self, source: Arc<dyn ClassSource>) {
        self.sources.push(source);
    }

    pub fn find(&self, name: &str) -> Option<ClassInfo> {
        self.sources.iter().find_map(|source| {
            let found = source.find(name);
            if found.is_some() {
                log::trace!("{} found in {}", name, source.label());
            }
            found
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Hierarchy for ClassUniverse {
    fn owner(&self, class: &str) -> Option<String> {
        self.find(class).and_then(|info| info.owner)
    }

    fn superclass(&self, class: &str) -> Option<String> {
        let info = self.find(class)?;
        match info.superclass {
            Some(superclass) => Some(superclass),
            None if info.kind == ClassKind::Class && info.name != OBJECT_CLASS => Some(OBJECT_CLASS.to_string()),
            None => None,
        }
    }

    fn interfaces(&self, class: &str) -> Vec<String> {
        self.find(class).map(|info| info.interfaces).unwrap_or_default()
    }
}
