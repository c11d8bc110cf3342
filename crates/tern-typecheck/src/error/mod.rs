//! Type checking errors.
//!
//! Every error is fatal to the top-level unit that raised it and to nothing
//! else. Types inside errors are rendered to strings when the error is
//! built, because the substitution they refer to is rolled back right after.

use std::fmt;
use tern_syntax::Span;

/// What sort of name a [`TypeError::DuplicateName`] or
/// [`TypeError::UndeclaredName`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Type constructor or alias
    Type,
    /// Type variable or quantifier
    TypeVar,
    /// Data constructor
    Constructor,
    /// Value binding
    Value,
    /// Name captured by a pattern
    Capture,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Type => "type",
            Self::TypeVar => "type variable",
            Self::Constructor => "constructor",
            Self::Value => "value",
            Self::Capture => "pattern variable",
        };
        f.write_str(s)
    }
}

/// Why a `let rec` initializer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecursionViolation {
    /// The initializer uses the group before it can be built
    NotConstructive,
    /// The initializer is just another member of the group
    ImmediatelyLinked,
}

impl fmt::Display for RecursionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConstructive => {
                f.write_str("its initializer must be a function or constructor application")
            }
            Self::ImmediatelyLinked => {
                f.write_str("its initializer is an alias of a binding in the same group")
            }
        }
    }
}

/// The error categories a driver can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Incompatible types, kinds, or a rigid variable violation
    UnificationFailure,
    /// A quantified variable escapes its scope
    ScopeEscape,
    /// A name is declared twice
    DuplicateName,
    /// A name is not in scope
    UndeclaredName,
    /// A constructor is used with the wrong number of fields
    MalformedConstructor,
    /// A `let rec` initializer is ill-founded
    IllegalRecursiveBinding,
    /// A literal is out of range or badly escaped
    InvalidLiteral,
}

/// Type checking errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Two types could not be unified.
    Mismatch {
        /// The type required by context
        expected: String,
        /// The type that was found
        found: String,
        /// Source location
        span: Span,
    },

    /// A variable would have to contain itself.
    InfiniteType {
        /// The variable
        var: String,
        /// The type it would be bound to
        ty: String,
        /// Source location
        span: Span,
    },

    /// Kinds do not agree, e.g. `bool bool`.
    KindMismatch {
        /// The kind required by context
        expected: String,
        /// The kind that was found
        found: String,
        /// Source location
        span: Span,
    },

    /// A rigid type variable would be specialized or generalized outside
    /// the annotation that introduced it.
    ScopeEscape {
        /// The rigid variable
        var: String,
        /// What it was asked to become, if anything
        ty: Option<String>,
        /// Source location
        span: Span,
    },

    /// A name is declared twice in one group or pattern.
    DuplicateName {
        /// What kind of name
        what: NameKind,
        /// The name
        name: String,
        /// Source location
        span: Span,
    },

    /// A name is not in scope.
    UndeclaredName {
        /// What kind of name
        what: NameKind,
        /// The name
        name: String,
        /// Source location
        span: Span,
    },

    /// Wrong number of fields for a constructor.
    MalformedConstructor {
        /// Constructor name
        name: String,
        /// Declared fields
        expected: usize,
        /// Fields given
        found: usize,
        /// Source location
        span: Span,
    },

    /// An ill-founded `let rec` initializer.
    IllegalRecursiveBinding {
        /// The binding
        name: String,
        /// What is wrong with it
        reason: RecursionViolation,
        /// Source location
        span: Span,
    },

    /// An integer out of range, a bad width, or a bad escape.
    InvalidLiteral {
        /// What is wrong with it
        reason: String,
        /// Source location
        span: Span,
    },
}

impl TypeError {
    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Mismatch { .. } | Self::InfiniteType { .. } | Self::KindMismatch { .. } => {
                ErrorKind::UnificationFailure
            }
            Self::ScopeEscape { .. } => ErrorKind::ScopeEscape,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::UndeclaredName { .. } => ErrorKind::UndeclaredName,
            Self::MalformedConstructor { .. } => ErrorKind::MalformedConstructor,
            Self::IllegalRecursiveBinding { .. } => ErrorKind::IllegalRecursiveBinding,
            Self::InvalidLiteral { .. } => ErrorKind::InvalidLiteral,
        }
    }

    /// Get the span of this error.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Mismatch { span, .. }
            | Self::InfiniteType { span, .. }
            | Self::KindMismatch { span, .. }
            | Self::ScopeEscape { span, .. }
            | Self::DuplicateName { span, .. }
            | Self::UndeclaredName { span, .. }
            | Self::MalformedConstructor { span, .. }
            | Self::IllegalRecursiveBinding { span, .. }
            | Self::InvalidLiteral { span, .. } => *span,
        }
    }

    /// Get a short description of this error.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } => "type mismatch",
            Self::InfiniteType { .. } => "infinite type",
            Self::KindMismatch { .. } => "kind mismatch",
            Self::ScopeEscape { .. } => "type variable escapes its scope",
            Self::DuplicateName { .. } => "duplicate name",
            Self::UndeclaredName { .. } => "undeclared name",
            Self::MalformedConstructor { .. } => "malformed constructor",
            Self::IllegalRecursiveBinding { .. } => "illegal recursive binding",
            Self::InvalidLiteral { .. } => "invalid literal",
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch {
                expected, found, ..
            } => write!(f, "type mismatch: expected {expected}, found {found}"),

            Self::InfiniteType { var, ty, .. } => {
                write!(f, "infinite type: {var} occurs in {ty}")
            }

            Self::KindMismatch {
                expected, found, ..
            } => write!(f, "kind mismatch: expected {expected}, found {found}"),

            Self::ScopeEscape { var, ty: Some(ty), .. } => {
                write!(f, "type variable {var} is rigid and cannot be {ty}")
            }

            Self::ScopeEscape { var, ty: None, .. } => {
                write!(f, "type variable {var} escapes its scope")
            }

            Self::DuplicateName { what, name, .. } => {
                write!(f, "{what} {name} is declared more than once")
            }

            Self::UndeclaredName { what, name, .. } => {
                write!(f, "undeclared {what}: {name}")
            }

            Self::MalformedConstructor {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "constructor {name} takes {expected} field(s) but {found} were given"
            ),

            Self::IllegalRecursiveBinding { name, reason, .. } => {
                write!(f, "illegal recursive binding {name}: {reason}")
            }

            Self::InvalidLiteral { reason, .. } => write!(f, "invalid literal: {reason}"),
        }
    }
}

impl std::error::Error for TypeError {}

/// A result type for type checking operations.
pub type Result<T> = std::result::Result<T, TypeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 0, 0, 0, 0, 0)
    }

    #[test]
    fn test_error_display() {
        let err = TypeError::UndeclaredName {
            what: NameKind::Value,
            name: "x".to_string(),
            span: span(),
        };
        assert_eq!(err.to_string(), "undeclared value: x");
        assert_eq!(err.kind(), ErrorKind::UndeclaredName);
    }

    #[test]
    fn test_mismatch_error() {
        let err = TypeError::Mismatch {
            expected: "bool".to_string(),
            found: "i32".to_string(),
            span: span(),
        };
        assert_eq!(err.to_string(), "type mismatch: expected bool, found i32");
        assert_eq!(err.description(), "type mismatch");
    }

    #[test]
    fn test_unification_failures_share_a_kind() {
        let infinite = TypeError::InfiniteType {
            var: "?0".to_string(),
            ty: "?0 -> ?0".to_string(),
            span: span(),
        };
        let kind = TypeError::KindMismatch {
            expected: "*".to_string(),
            found: "* -> *".to_string(),
            span: span(),
        };
        assert_eq!(infinite.kind(), ErrorKind::UnificationFailure);
        assert_eq!(kind.kind(), ErrorKind::UnificationFailure);
    }

    #[test]
    fn test_scope_escape_display() {
        let rigid = TypeError::ScopeEscape {
            var: "'a".to_string(),
            ty: Some("bool".to_string()),
            span: span(),
        };
        assert_eq!(rigid.to_string(), "type variable 'a is rigid and cannot be bool");

        let escaped = TypeError::ScopeEscape {
            var: "'a".to_string(),
            ty: None,
            span: span(),
        };
        assert_eq!(escaped.kind(), ErrorKind::ScopeEscape);
    }

    #[test]
    fn test_recursion_display() {
        let err = TypeError::IllegalRecursiveBinding {
            name: "x".to_string(),
            reason: RecursionViolation::ImmediatelyLinked,
            span: span(),
        };
        assert!(err.to_string().starts_with("illegal recursive binding x"));
    }
}
