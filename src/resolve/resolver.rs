//! Name resolution
//!
//! A candidate spelling is resolved by trying, in order:
//! 1. array spellings (`T[]...`, `[[I`) and primitive keywords
//! 2. nested classes of the current class, its owners and its supertypes
//! 3. the candidate as a full name
//! 4. single-type imports matching the leading segment
//! 5. the current package
//! 6. wildcard imports, in import order
//! 7. the implicit package
//! 8. the candidate with trailing dots progressively mangled to `$`
//!
//! The first step that finds a class wins.

use std::fmt;
use std::sync::Arc;

use super::builtin::BuiltinClasses;
use super::cache::ClassCache;
use super::classes::{breadth_first, ClassInfo, ClassRegistry, ClassUniverse};
use super::classpath::ClasspathSource;
use super::imports::ImportTable;
use crate::ast::{AstNode, TypeRef};
use crate::config::Config;
use crate::consts::NESTED_SEPARATOR;
use crate::error::{Error, Result};
use crate::types::spelling::{self, ElementSpelling};
use crate::types::Type;

/// Where a name is being resolved
#[derive(Debug, Clone, Copy)]
pub struct ResolutionScope<'a> {
    pub current_class: Option<&'a Type>,
    /// Empty for the default package
    pub package: &'a str,
    pub imports: &'a ImportTable,
}

impl<'a> ResolutionScope<'a> {
    pub fn new(imports: &'a ImportTable, package: &'a str) -> Self {
        Self {
            current_class: None,
            package,
            imports,
        }
    }

    pub fn in_class(mut self, class: Option<&'a Type>) -> Self {
        self.current_class = class;
        self
    }
}

/// Which resolution step produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Array,
    Primitive,
    Nested,
    FullName,
    ExplicitImport,
    CurrentPackage,
    WildcardImport,
    ImplicitPackage,
    Mangled,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Array => "array",
            Step::Primitive => "primitive",
            Step::Nested => "nested class",
            Step::FullName => "full name",
            Step::ExplicitImport => "explicit import",
            Step::CurrentPackage => "current package",
            Step::WildcardImport => "wildcard import",
            Step::ImplicitPackage => "implicit package",
            Step::Mangled => "mangled name",
        };
        f.write_str(label)
    }
}

pub struct NameResolver {
    universe: ClassUniverse,
    cache: Arc<ClassCache>,
}

impl NameResolver {
    pub fn new(universe: ClassUniverse, cache: Arc<ClassCache>) -> Self {
        Self { universe, cache }
    }

    /// Resolver over `registry`, then the built-in table and the search
    /// paths when the configuration enables them
    pub fn from_config(config: &Config, registry: Arc<ClassRegistry>, cache: Arc<ClassCache>) -> Self {
        let mut universe = ClassUniverse::new().with_source(registry);
        if config.builtin_classes {
            universe.push(Arc::new(BuiltinClasses::new()));
        }
        if !config.search_paths.is_empty() {
            universe.push(Arc::new(ClasspathSource::new(config.search_paths.iter().cloned())));
        }
        Self::new(universe, cache)
    }

    pub fn cache(&self) -> &Arc<ClassCache> {
        &self.cache
    }

    pub fn universe(&self) -> &ClassUniverse {
        &self.universe
    }

    pub fn class_info(&self, name: &str) -> Option<ClassInfo> {
        self.universe.find(name)
    }

    pub fn resolve(&self, name: &str, scope: &ResolutionScope<'_>) -> Result<Type> {
        self.resolve_with_step(name, scope).map(|(ty, _)| ty)
    }

    /// Resolve a type reference as written, array dimensions included
    pub fn resolve_type_ref(&self, type_ref: &TypeRef, scope: &ResolutionScope<'_>) -> Result<Type> {
        self.resolve(&type_ref.spelling(), scope)
            .map_err(|err| err.at(type_ref.location()))
    }

    /// Resolve and report which step succeeded
    pub fn resolve_with_step(&self, name: &str, scope: &ResolutionScope<'_>) -> Result<(Type, Step)> {
        let candidate = name.trim();
        if candidate.is_empty() {
            return Err(Error::malformed_type_name(name, "empty name"));
        }

        if let Some((element, dims)) = spelling::parse_array(candidate)? {
            let element = match element {
                ElementSpelling::Primitive(primitive) => Type::primitive(primitive),
                ElementSpelling::Named(element) => self.resolve(&element, scope)?,
            };
            let ty = self.cache.intern_array(&element, dims);
            log::trace!("resolved '{}' -> {} ({})", candidate, ty, Step::Array);
            return Ok((ty, Step::Array));
        }

        if let Some(primitive) = crate::types::Primitive::from_keyword(candidate) {
            return Ok((Type::primitive(primitive), Step::Primitive));
        }

        if spelling::is_anonymous_spelling(candidate) {
            return Err(Error::AnonymousClassSpelling {
                name: candidate.to_string(),
            });
        }

        let found = self
            .nested_class(candidate, scope)
            .map(|ty| (ty, Step::Nested))
            .or_else(|| self.lookup_canonical(candidate).map(|ty| (ty, Step::FullName)))
            .or_else(|| self.explicit_import(candidate, scope).map(|ty| (ty, Step::ExplicitImport)))
            .or_else(|| self.current_package(candidate, scope).map(|ty| (ty, Step::CurrentPackage)))
            .or_else(|| self.wildcard_import(candidate, scope).map(|ty| (ty, Step::WildcardImport)))
            .or_else(|| {
                self.prefixed(scope.imports.implicit_package(), candidate)
                    .map(|ty| (ty, Step::ImplicitPackage))
            })
            .or_else(|| self.mangled(candidate).map(|ty| (ty, Step::Mangled)));

        match found {
            Some((ty, step)) => {
                log::debug!("resolved '{}' -> {} ({})", candidate, ty, step);
                Ok((ty, step))
            }
            None => {
                log::debug!("'{}' not found", candidate);
                Err(Error::class_not_found(candidate))
            }
        }
    }

    /// Direct lookup by binary name, memoized under that exact spelling.
    ///
    /// This is also how the unit's own classes, anonymous ones included,
    /// are looked up once the numbering pass has named them.
    pub fn lookup_canonical(&self, name: &str) -> Option<Type> {
        if let Some(ty) = self.cache.get(name) {
            return Some(ty);
        }

        let info = self.universe.find(name)?;
        let owner = info.owner.as_deref().and_then(|owner| self.lookup_canonical(owner));
        let ty = self.cache.intern_class(&info, owner);
        self.cache.remember(name, &ty);
        Some(ty)
    }

    fn nested_class(&self, candidate: &str, scope: &ResolutionScope<'_>) -> Option<Type> {
        let start = scope.current_class?.as_class()?;
        let member = spelling::mangle_all(candidate);
        breadth_first(&self.universe, &start.name, |class| {
            let name = format!("{}{}{}", class, NESTED_SEPARATOR, member);
            self.lookup_canonical(&name)
        })
    }

    fn explicit_import(&self, candidate: &str, scope: &ResolutionScope<'_>) -> Option<Type> {
        let leading = candidate.split('.').next().unwrap_or(candidate);
        scope
            .imports
            .singles_named(leading)
            .find_map(|import| self.prefixed(&import.owner, candidate))
    }

    fn current_package(&self, candidate: &str, scope: &ResolutionScope<'_>) -> Option<Type> {
        if scope.package.is_empty() {
            return None;
        }
        self.prefixed(scope.package, candidate)
    }

    fn wildcard_import(&self, candidate: &str, scope: &ResolutionScope<'_>) -> Option<Type> {
        scope
            .imports
            .wildcards()
            .iter()
            .find_map(|package| self.prefixed(package, candidate))
    }

    /// `prefix.candidate`, then the same with trailing dots mangled
    fn prefixed(&self, prefix: &str, candidate: &str) -> Option<Type> {
        let full = if prefix.is_empty() {
            candidate.to_string()
        } else {
            format!("{}.{}", prefix, candidate)
        };
        self.lookup_canonical(&full).or_else(|| self.mangled(&full))
    }

    fn mangled(&self, name: &str) -> Option<Type> {
        spelling::mangled_variants(name)
            .into_iter()
            .find_map(|variant| self.lookup_canonical(&variant))
    }
}
