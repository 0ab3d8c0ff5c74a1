//! Source regeneration and the debugging tree dump

pub mod dump;
pub mod generator;

pub use dump::TreeDump;
pub use generator::CodeGenerator;
