//! Session state shared by every checking pass.
//!
//! - **Subst**: type variable cells with union-find lookup and journaling
//! - **TypeEnv**: value names to schemes, with lexical scoping
//! - **TypeRegistry**: type names, templates and data constructors

pub mod env;
pub mod registry;
pub mod subst;

pub use env::{Scheme, TypeEnv};
pub use registry::{CtorInfo, RegistryCheckpoint, TypeDef, TypeRegistry};
pub use subst::{Cell, Subst, SubstSnapshot};
