//! Class entry
//!
//! Every class of the unit is registered under the binary name the
//! numbering pass gave it, before any name in the unit is resolved. Then
//! the `extends` and `implements` clauses are resolved, outermost classes
//! first, so nested-class lookups can see through supertypes.

use crate::ast::{AstNode, ClassId, TypeRef};
use crate::consts::{NESTED_SEPARATOR, OBJECT_CLASS};
use crate::error::{Error, Result};
use crate::resolve::{ClassInfo, ClassRegistry, ImportTable, NameResolver, ResolutionScope};
use crate::summary::{Numbering, SummaryParent, SummaryTree};
use crate::types::{spelling, Type};

fn binary_name<'n>(numbering: &'n Numbering, tree: &SummaryTree, id: ClassId) -> Result<&'n str> {
    numbering.binary_name(id).ok_or_else(|| {
        Error::transform(format!("class #{} has no binary name", id.0)).at(tree.class(id).location)
    })
}

/// Register every summarized class with `registry`
pub fn enter_classes(tree: &SummaryTree, numbering: &Numbering, registry: &ClassRegistry) -> Result<()> {
    for class in tree.classes() {
        let name = binary_name(numbering, tree, class.id)?;
        let owner = match tree.enclosing_class(class.id) {
            Some(enclosing) => Some(binary_name(numbering, tree, enclosing)?.to_string()),
            None => None,
        };
        registry.register(ClassInfo {
            name: name.to_string(),
            kind: class.kind,
            owner,
            superclass: None,
            interfaces: Vec::new(),
        });
    }
    log::debug!("entered {} classes", tree.len());
    Ok(())
}

/// Resolve the supertypes of every entered class and record them
pub fn complete_hierarchy(
    tree: &SummaryTree,
    numbering: &Numbering,
    resolver: &NameResolver,
    imports: &ImportTable,
    registry: &ClassRegistry,
) -> Result<()> {
    for class in tree.classes() {
        let name = binary_name(numbering, tree, class.id)?;
        let context: Option<Type> = match tree.enclosing_class(class.id) {
            Some(enclosing) => resolver.lookup_canonical(binary_name(numbering, tree, enclosing)?),
            None => None,
        };
        let package = context.as_ref().map_or(tree.package(), Type::package);
        let scope = ResolutionScope::new(imports, package).in_class(context.as_ref());

        let supertype = |type_ref: &TypeRef| -> Result<Type> {
            match local_class(tree, numbering, resolver, class.id, type_ref)? {
                Some(ty) => Ok(ty),
                None => resolver.resolve_type_ref(type_ref, &scope),
            }
        };
        let superclass = match &class.superclass {
            Some(type_ref) => Some(supertype(type_ref)?),
            None => None,
        };
        let mut interfaces = Vec::with_capacity(class.interfaces.len());
        for type_ref in &class.interfaces {
            interfaces.push(supertype(type_ref)?.name());
        }

        let superclass = match superclass {
            // `new I() { ... }` implements I and extends Object
            Some(ty) if class.is_anonymous() && ty.is_interface() => {
                interfaces.push(ty.name());
                Some(OBJECT_CLASS.to_string())
            }
            Some(ty) => Some(ty.name()),
            None => None,
        };

        log::trace!("{} extends {:?} implements {:?}", name, superclass, interfaces);
        registry.set_supertypes(name, superclass, interfaces);
    }
    Ok(())
}

/// A supertype spelled through a local class declared before `id` in one of
/// the method bodies enclosing it (`L1`, `L1.Inner`)
fn local_class(
    tree: &SummaryTree,
    numbering: &Numbering,
    resolver: &NameResolver,
    id: ClassId,
    type_ref: &TypeRef,
) -> Result<Option<Type>> {
    let (leading, rest) = match type_ref.name.split_once('.') {
        Some((leading, rest)) => (leading, Some(rest)),
        None => (type_ref.name.as_str(), None),
    };

    let mut current = tree.class(id);
    let found = loop {
        match current.parent {
            SummaryParent::Unit => break None,
            SummaryParent::Class(parent) => current = tree.class(parent),
            SummaryParent::Method(method) => {
                let method = tree.method(method);
                // a local class is in scope inside its own body, not in its own header
                let own = Some(current.id).filter(|own| *own != id);
                let visible = method
                    .classes
                    .iter()
                    .copied()
                    .take_while(|candidate| *candidate != current.id)
                    .chain(own)
                    .find(|candidate| {
                        let local = tree.class(*candidate);
                        local.is_local() && local.name == leading
                    });
                if visible.is_some() {
                    break visible;
                }
                current = tree.class(method.owner);
            }
        }
    };
    let local = match found {
        Some(local) => local,
        None => return Ok(None),
    };

    let mut name = binary_name(numbering, tree, local)?.to_string();
    if let Some(rest) = rest {
        name.push(NESTED_SEPARATOR);
        name.push_str(&spelling::mangle_all(rest));
    }
    resolver
        .lookup_canonical(&name)
        .map(Some)
        .ok_or_else(|| Error::class_not_found(type_ref.name.as_str()).at(type_ref.location()))
}
