// Naming constants shared by the resolver, the summary pass and the generator

/// Package searched last by every unit without being imported
pub const IMPLICIT_PACKAGE: &str = "java.lang";

/// Root of every class hierarchy
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// Separator between an owner's binary name and a nested class name
pub const NESTED_SEPARATOR: char = '$';

/// Summary pseudo-methods holding field initializers and initializer blocks
/// carry names with this prefix.
pub const INITIALIZER_PREFIX: &str = "$initializer";

/// Name given to the instance-initializer pseudo-method
pub const INSTANCE_INITIALIZER: &str = "$initializer";

/// Name given to the static-initializer pseudo-method
pub const STATIC_INITIALIZER: &str = "$initializer$static";

/// Default indentation width of the code generator
pub const DEFAULT_INDENT: usize = 4;

/// Environment variable consulted before `CLASSPATH`
pub const SEARCH_PATH_ENV: &str = "RECAST_CLASSPATH";

/// Summary name of constructors
pub const CONSTRUCTOR_NAME: &str = "<init>";
