//! Name resolution through the public API

mod common;

use std::sync::Arc;

use recast::ast::{ClassKind, ImportDecl};
use recast::resolve::{
    ClassCache, ClassInfo, ClassRegistry, ClassSource, ClasspathSource, ImportTable, NameResolver, ResolutionScope, Step,
};
use recast::types::Primitive;
use recast::{Config, Error};
use tempfile::TempDir;

fn resolver(classes: &[ClassInfo], config: &Config) -> NameResolver {
    let registry = Arc::new(ClassRegistry::new());
    for class in classes {
        registry.register(class.clone());
    }
    NameResolver::from_config(config, registry, Arc::new(ClassCache::new()))
}

#[test]
fn resolving_twice_yields_the_same_identity() {
    let resolver = resolver(&[], &Config::default());
    let mut imports = ImportTable::default();
    imports.add(&ImportDecl::wildcard("java.util"));
    let scope = ResolutionScope::new(&imports, "p");

    for name in ["Hashtable", "String", "Map.Entry", "java.util.Map$Entry", "int", "Object[][]"] {
        let first = resolver.resolve(name, &scope).unwrap();
        let second = resolver.resolve(name, &scope).unwrap();
        assert_eq!(first, second, "{name}");
    }
    assert_eq!(
        resolver.resolve("Map.Entry", &scope).unwrap(),
        resolver.resolve("java.util.Map.Entry", &scope).unwrap()
    );
}

#[test]
fn explicit_import_beats_wildcard() {
    let resolver = resolver(&[], &Config::default());
    let mut imports = ImportTable::default();
    imports.add(&ImportDecl::wildcard("java.awt"));
    imports.add(&ImportDecl::single("java.util.List"));
    let scope = ResolutionScope::new(&imports, "p");

    let (ty, step) = resolver.resolve_with_step("List", &scope).unwrap();
    assert_eq!(ty.name(), "java.util.List");
    assert_eq!(step, Step::ExplicitImport);

    let mut wildcard_only = ImportTable::default();
    wildcard_only.add(&ImportDecl::wildcard("java.awt"));
    let scope = ResolutionScope::new(&wildcard_only, "p");
    let (ty, step) = resolver.resolve_with_step("List", &scope).unwrap();
    assert_eq!(ty.name(), "java.awt.List");
    assert_eq!(step, Step::WildcardImport);
}

#[test]
fn own_nested_class_wins_over_package_class() {
    let resolver = resolver(
        &[
            ClassInfo::new("p.Outer", ClassKind::Class),
            ClassInfo::new("p.Outer$A", ClassKind::Class),
            ClassInfo::new("p.Outer$A$B", ClassKind::Class),
            ClassInfo::new("p.B", ClassKind::Class),
        ],
        &Config::default(),
    );
    let imports = ImportTable::default();
    let current = resolver.lookup_canonical("p.Outer$A").unwrap();
    let scope = ResolutionScope::new(&imports, "p").in_class(Some(&current));

    let (ty, step) = resolver.resolve_with_step("B", &scope).unwrap();
    assert_eq!(ty.name(), "p.Outer$A$B");
    assert_eq!(step, Step::Nested);
    assert_eq!(ty.owner(), Some(&current));

    let outside = ResolutionScope::new(&imports, "p");
    assert_eq!(resolver.resolve("B", &outside).unwrap().name(), "p.B");
}

#[test]
fn nested_classes_are_found_through_supertypes() {
    let resolver = resolver(
        &[
            ClassInfo::new("q.Base", ClassKind::Class),
            ClassInfo::new("q.Base$Node", ClassKind::Class),
            ClassInfo::new("p.Derived", ClassKind::Class).with_superclass("q.Base"),
        ],
        &Config::default(),
    );
    let imports = ImportTable::default();
    let current = resolver.lookup_canonical("p.Derived").unwrap();
    let scope = ResolutionScope::new(&imports, "p").in_class(Some(&current));

    let (ty, step) = resolver.resolve_with_step("Node", &scope).unwrap();
    assert_eq!(ty.name(), "q.Base$Node");
    assert_eq!(step, Step::Nested);
}

#[test]
fn array_spellings_share_one_identity() {
    let resolver = resolver(&[], &Config::default());
    let imports = ImportTable::default();
    let scope = ResolutionScope::new(&imports, "");

    let source = resolver.resolve("int[][]", &scope).unwrap();
    assert_eq!(source, resolver.resolve("int[][]", &scope).unwrap());
    assert_eq!(source, resolver.resolve("[[I", &scope).unwrap());
    assert_eq!(source.dimensions(), 2);
    assert_eq!(source.element().and_then(|e| e.as_primitive()), Some(Primitive::Int));

    let strings = resolver.resolve("String[]", &scope).unwrap();
    assert_eq!(strings, resolver.resolve("[Ljava.lang.String;", &scope).unwrap());
}

#[test]
fn wildcard_import_resolves_hashtable() {
    let resolver = resolver(&[ClassInfo::new("p.A", ClassKind::Class)], &Config::default());
    let unit = common::hashtable_unit();
    let imports = ImportTable::from_unit(&unit, "java.lang");
    let class = resolver.lookup_canonical("p.A").unwrap();
    let scope = ResolutionScope::new(&imports, "p").in_class(Some(&class));

    let (ty, step) = resolver.resolve_with_step("Hashtable", &scope).unwrap();
    assert_eq!(ty.name(), "java.util.Hashtable");
    assert_eq!(step, Step::WildcardImport);
}

#[test]
fn builtin_table_can_be_disabled() {
    let resolver = resolver(&[], &Config::default().without_builtin_classes());
    let imports = ImportTable::default();
    let scope = ResolutionScope::new(&imports, "p");
    assert!(matches!(resolver.resolve("String", &scope), Err(Error::ClassNotFound { .. })));
    assert!(resolver.resolve("int", &scope).is_ok());
}

#[test]
fn search_paths_supply_classes_and_supertypes() {
    let dir = TempDir::new().unwrap();
    common::write_class(
        dir.path(),
        "lib.Widget",
        &common::class_file_bytes("lib.Widget", "java.lang.Thread", &["java.lang.Runnable"], 0x0021),
    );
    common::write_class(
        dir.path(),
        "lib.Widget$Part",
        &common::class_file_bytes("lib.Widget$Part", "java.lang.Object", &[], 0x0021),
    );
    std::fs::write(dir.path().join("lib").join("Shape.java"), "class Shape {}").unwrap();

    let config = Config::default().with_search_paths([dir.path()]);
    let resolver = resolver(&[ClassInfo::new("p.Custom", ClassKind::Class).with_superclass("lib.Widget")], &config);

    let mut imports = ImportTable::default();
    imports.add(&ImportDecl::wildcard("lib"));
    let scope = ResolutionScope::new(&imports, "p");
    assert_eq!(resolver.resolve("Widget", &scope).unwrap().name(), "lib.Widget");
    assert_eq!(resolver.resolve("Shape", &scope).unwrap().name(), "lib.Shape");
    assert_eq!(resolver.resolve("Widget.Part", &scope).unwrap().name(), "lib.Widget$Part");

    let widget = resolver.class_info("lib.Widget").unwrap();
    assert_eq!(widget.superclass.as_deref(), Some("java.lang.Thread"));
    assert_eq!(widget.interfaces, vec!["java.lang.Runnable".to_string()]);

    // Part is inherited from the class-file superclass chain
    let custom = resolver.lookup_canonical("p.Custom").unwrap();
    let inside = ResolutionScope::new(&imports, "p").in_class(Some(&custom));
    let (ty, step) = resolver.resolve_with_step("Part", &inside).unwrap();
    assert_eq!(ty.name(), "lib.Widget$Part");
    assert_eq!(step, Step::Nested);
}

#[test]
fn class_file_headers_give_kind_and_supertypes() {
    let dir = TempDir::new().unwrap();
    common::write_class(
        dir.path(),
        "a.b.Task",
        &common::class_file_bytes("a.b.Task", "java.lang.Object", &["java.lang.Runnable"], 0x0601),
    );
    let truncated = common::class_file_bytes("a.b.Broken", "java.lang.Thread", &[], 0x0021);
    common::write_class(dir.path(), "a.b.Broken", &truncated[..truncated.len() - 3]);

    let source = ClasspathSource::new([dir.path()]);
    assert_eq!(source.class_names(), vec!["a.b.Broken", "a.b.Task"]);

    // interfaces drop the java.lang.Object superclass their header records
    let task = source.find("a.b.Task").unwrap();
    assert_eq!(task.kind, ClassKind::Interface);
    assert_eq!(task.superclass, None);
    assert_eq!(task.interfaces, vec!["java.lang.Runnable".to_string()]);

    // unreadable headers still make the class known
    let broken = source.find("a.b.Broken").unwrap();
    assert_eq!(broken.kind, ClassKind::Class);
    assert_eq!(broken.superclass, None);
    assert!(source.find("a.b.Missing").is_none());
}

#[test]
fn shared_cache_keeps_identities_across_resolvers() {
    let cache = Arc::new(ClassCache::new());
    let first = NameResolver::from_config(&Config::default(), Arc::new(ClassRegistry::new()), cache.clone());
    let second = NameResolver::from_config(&Config::default(), Arc::new(ClassRegistry::new()), cache);

    let none = ImportTable::default();
    let mut single = ImportTable::default();
    single.add(&ImportDecl::single("java.util.Vector"));

    let direct = first.resolve("java.util.Vector", &ResolutionScope::new(&none, "")).unwrap();
    let array = second.resolve("Vector[]", &ResolutionScope::new(&single, "p")).unwrap();
    assert_eq!(array.element(), Some(&direct));
}
