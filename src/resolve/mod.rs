//! Resolution of type names to canonical identities

pub mod builtin;
pub mod cache;
pub mod classes;
pub mod classpath;
pub mod imports;
pub mod resolver;

pub use builtin::BuiltinClasses;
pub use cache::ClassCache;
pub use classes::{breadth_first, ClassInfo, ClassRegistry, ClassSource, ClassUniverse, Hierarchy};
pub use classpath::ClasspathSource;
pub use imports::{ImportTable, SingleImport};
pub use resolver::{NameResolver, ResolutionScope, Step};
