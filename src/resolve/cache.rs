//! Resolution cache and identity interner
//!
//! Successful direct lookups are memoized under the exact spelling that was
//! queried. Identities are interned by canonical name, so a class reached
//! through two spellings still has a single identity.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use super::classes::ClassInfo;
use crate::types::Type;

static GLOBAL: Lazy<Arc<ClassCache>> = Lazy::new(|| Arc::new(ClassCache::new()));

#[derive(Debug, Default)]
pub struct ClassCache {
    /// spelling queried -> identity
    lookups: DashMap<String, Type>,
    /// binary name or array descriptor -> identity
    identities: DashMap<String, Type>,
}

impl ClassCache {
    /// A fresh cache, typically one per invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, for callers that share lookups across files
    pub fn global() -> Arc<ClassCache> {
        GLOBAL.clone()
    }

    pub fn get(&self, spelling: &str) -> Option<Type> {
        self.lookups.get(spelling).map(|entry| entry.value().clone())
    }

    pub fn remember(&self, spelling: &str, ty: &Type) {
        self.lookups.insert(spelling.to_string(), ty.clone());
    }

    /// Identity for a class, created on first request.
    ///
    /// `owner` is only used when the identity does not exist yet.
    pub fn intern_class(&self, info: &ClassInfo, owner: Option<Type>) -> Type {
        self.identities
            .entry(info.name.clone())
            .or_insert_with(|| Type::new_class(&info.name, info.kind, owner))
            .value()
            .clone()
    }

    /// Identity for an array of `element`; nested arrays are flattened
    pub fn intern_array(&self, element: &Type, dims: usize) -> Type {
        if dims == 0 {
            return element.clone();
        }
        let flattened = Type::new_array(element.clone(), dims);
        self.identities
            .entry(flattened.descriptor())
            .or_insert(flattened)
            .value()
            .clone()
    }

    /// Interned identity by binary name, without consulting any class source
    pub fn identity(&self, name: &str) -> Option<Type> {
        self.identities.get(name).map(|entry| entry.value().clone())
    }

    /// Number of memoized spellings
    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Forget memoized spellings. Interned identities stay valid.
    pub fn clear_lookups(&self) {
        self.lookups.clear();
    }
}
