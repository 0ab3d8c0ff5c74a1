//! Scoped traversal with assignment interception
//!
//! Entering classes and completing their supertypes happens before the walk,
//! so every class of the unit is resolvable while its members are visited.

pub mod enter;
pub mod handlers;
pub mod scope;
pub mod walker;

pub use enter::{complete_hierarchy, enter_classes};
pub use handlers::{
    AssignmentHandler, AssignmentSite, HandlerContext, HandlerRegistry, RegistrationId, Replacement, Rule,
};
pub use scope::{ClassContextStack, ClassGuard, ScopeGuard, ScopeStack, Tracker};
pub use walker::Walker;
