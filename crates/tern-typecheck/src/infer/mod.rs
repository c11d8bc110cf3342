//! Type inference engine.
//!
//! - [`unify`]: structural unification over the substitution
//! - [`context`]: the checking session that drives every pass

pub mod context;
pub mod unify;

pub use context::Context;
pub use unify::{Unifier, UnifyError};
