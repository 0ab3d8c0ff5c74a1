//! recast
//!
//! Source-to-source transformation for Java-shaped programs: every type name
//! is resolved to a canonical identity, pluggable handlers rewrite assignment
//! sites, and the rewritten tree is printed back as source.
//!
//! ## Architecture
//!
//! - **ast**: Tree model handed over by a parser collaborator, plus mutation primitives
//! - **types**: Canonical type identities and type-name spellings
//! - **resolve**: Class sources, the resolution cache and the 8-step name resolver
//! - **summary**: Class summary tree and javac-compatible anonymous class numbering
//! - **traverse**: Scope tracking, class entry, handler registry and the tree walker
//! - **rules**: Ready-made rules
//! - **codegen**: Source generation and the debugging tree dump
//! - **pipeline**: Entry points tying the phases together
//!
//! ## Transformation Flow
//!
//! ```text
//! Source → Parser → AST → Rules (before) → Summary → Enter → Walk → Rules (after) → Source
//!                                             ↓                 ↓
//!                                        Renumbering     Resolve / Handlers
//! ```

pub mod ast;
pub mod types;
pub mod resolve;
pub mod summary;
pub mod traverse;
pub mod rules;
pub mod codegen;
pub mod pipeline;
pub mod error;
pub mod config;
pub mod consts;

pub use error::{Result, Error};
pub use config::Config;
pub use codegen::{CodeGenerator, TreeDump};
pub use pipeline::{transform_file, transform_text, Pipeline, SourceParser};
pub use resolve::{ClassCache, NameResolver, ResolutionScope};
pub use rules::AssignmentTraceRule;
pub use traverse::{AssignmentHandler, AssignmentSite, HandlerContext, Replacement, Rule};
pub use types::Type;
