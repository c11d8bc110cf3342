//! Memory infrastructure for the `tern` checker.
//!
//! - **Symbols**: 32-bit handles for interned identifiers
//! - **String interning**: one table per session, shared by the parser and
//!   the checker, which also mints compiler temporaries
//! - **Typed arenas**: index-addressed storage with checkpoint/truncate,
//!   used to allocate declaration templates and discard them as a unit

pub mod arena;
pub mod interner;
pub mod symbol;

pub use arena::{Arena, ArenaCheckpoint, Idx};
pub use interner::StringInterner;
pub use symbol::Symbol;
