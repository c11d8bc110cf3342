//! Type checking passes over the surface AST.
//!
//! - [`kind`]: type elaboration and kind inference
//! - [`decl`]: data and alias declarations
//! - [`lit`]: literals
//! - [`pat`]: patterns
//! - [`expr`]: expressions and binding groups
//! - [`recursion`]: `let rec` initializer validation

pub mod decl;
pub mod expr;
pub mod kind;
pub mod lit;
pub mod pat;
pub mod recursion;

pub use decl::{check_alias, check_data};
pub use expr::{check, check_bindings, infer};
pub use kind::{KindChecker, elaborate_annotation};
pub use lit::check_lit;
pub use pat::check_pattern;
