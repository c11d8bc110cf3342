//! Type representation.
//!
//! - [`ty`]: the checker's types and type variables
//! - [`kind`]: kinds of type expressions
//! - [`template`]: shared definitions behind nominal types
//! - [`display`]: rendering types for error messages

pub mod display;
pub mod kind;
pub mod template;
pub mod ty;

pub use display::DisplayTy;
pub use kind::Kind;
pub use template::{Builtin, Case, Template, TemplateId, TemplateState};
pub use ty::{Ty, TyVar};
