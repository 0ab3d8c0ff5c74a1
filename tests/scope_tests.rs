//! Scope and class-context tracking

use recast::resolve::{ClassCache, ClassInfo};
use recast::traverse::{ScopeStack, Tracker};
use recast::types::{Primitive, Type};
use recast::ast::ClassKind;

#[test]
fn inner_frame_shadows_until_popped() {
    let int = Type::primitive(Primitive::Int);
    let boolean = Type::primitive(Primitive::Boolean);
    let mut scopes = ScopeStack::new();
    scopes.bind_variable("x", int.clone());

    {
        let mut inner = scopes.push_scope();
        inner.bind_variable("x", boolean.clone());
        assert_eq!(inner.lookup_variable("x"), Some(&boolean));
        assert_eq!(inner.depth(), 2);
    }

    assert_eq!(scopes.lookup_variable("x"), Some(&int));
    assert_eq!(scopes.depth(), 1);
}

#[test]
fn tracker_nests_classes_and_frames() {
    let cache = ClassCache::new();
    let outer = cache.intern_class(&ClassInfo::new("p.Outer", ClassKind::Class), None);
    let inner = cache.intern_class(&ClassInfo::new("p.Outer$Inner", ClassKind::Class), Some(outer.clone()));
    let int = Type::primitive(Primitive::Int);

    let mut tracker = Tracker::new();
    tracker.with_class(outer.clone(), |t| {
        t.scopes.bind_variable("count", int.clone());
        t.with_class(inner.clone(), |t| {
            t.with_scope(|t| {
                assert_eq!(t.current_class(), Some(&inner));
                assert_eq!(t.lookup_variable("count"), Some(&int));
                assert_eq!(t.classes.current_package("q"), "p");
            });
        });
        assert_eq!(t.current_class(), Some(&outer));
    });

    assert_eq!(tracker.current_class(), None);
    assert_eq!(tracker.classes.current_package("q"), "q");
}
