//! Constructor sets.
//!
//! A [`CtorSet`] describes the head constructors a type can have, which is
//! all coverage checking and match compilation need to know about it:
//! whether a set of observed heads spans the type, which head is missing,
//! and what the fields of a head are.
//!
//! Integer families are never enumerated. Spanning compares the number of
//! distinct observed values against `2^width` with checked arithmetic, and
//! a missing value is found by a gap scan over the sorted observed values.

use crate::context::{Subst, TypeRegistry};
use crate::pattern::{Ctor, Pat};
use crate::types::{Builtin, TemplateId, Ty};

/// Head constructors of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtorSet {
    /// `true` and `false`
    Bool,
    /// The single tuple constructor, with its element types
    Tuple(Vec<Ty>),
    /// The cases of a data type instance
    Enum {
        /// Data type
        template: TemplateId,
        /// Instantiation
        args: Vec<Ty>,
    },
    /// Every value of a bounded integer type
    Int {
        /// Bit width
        width: u32,
    },
    /// Strings; never spanned
    Str,
    /// Functions and unresolved types; no constructors are visible
    Opaque,
}

impl CtorSet {
    /// The constructor set of `ty`.
    #[must_use]
    pub fn of(ty: &Ty, subst: &Subst, registry: &TypeRegistry) -> Self {
        match subst.shallow(ty) {
            Ty::Tuple(elems) => CtorSet::Tuple(elems),
            Ty::Nominal { template, args } => match registry.template(template).builtin {
                Some(Builtin::Bool) => CtorSet::Bool,
                Some(Builtin::Str) => CtorSet::Str,
                Some(Builtin::Int(width)) => CtorSet::Int { width },
                None => CtorSet::Enum { template, args },
            },
            _ => CtorSet::Opaque,
        }
    }

    /// Whether no finite set of constructors can span this family.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, CtorSet::Str | CtorSet::Opaque)
    }

    /// Whether the distinct constructors in `seen` cover the family.
    #[must_use]
    pub fn is_spanned_by(&self, seen: &[Ctor], registry: &TypeRegistry) -> bool {
        match self {
            CtorSet::Bool => {
                seen.contains(&Ctor::Bool(true)) && seen.contains(&Ctor::Bool(false))
            }
            CtorSet::Tuple(_) => !seen.is_empty(),
            CtorSet::Enum { template, .. } => {
                let cases = registry.template(*template).cases.len();
                (0..cases).all(|case| seen.contains(&Ctor::Variant(case)))
            }
            CtorSet::Int { width } => match 1u128.checked_shl(*width) {
                Some(cardinality) => seen.len() as u128 >= cardinality,
                None => false,
            },
            CtorSet::Str | CtorSet::Opaque => false,
        }
    }

    /// A constructor of the family that is not in `seen`.
    ///
    /// Returns `None` when the family is spanned, or when it is opaque and
    /// no constructor can be named.
    #[must_use]
    pub fn missing(&self, seen: &[Ctor], registry: &TypeRegistry) -> Option<Ctor> {
        match self {
            CtorSet::Bool => [true, false]
                .into_iter()
                .map(Ctor::Bool)
                .find(|c| !seen.contains(c)),
            CtorSet::Tuple(elems) => seen.is_empty().then_some(Ctor::Tuple(elems.len())),
            CtorSet::Enum { template, .. } => {
                let cases = registry.template(*template).cases.len();
                (0..cases)
                    .map(Ctor::Variant)
                    .find(|c| !seen.contains(c))
            }
            CtorSet::Int { width } => missing_int(*width, seen).map(Ctor::Int),
            CtorSet::Str => {
                let mut candidate = Vec::new();
                while seen.contains(&Ctor::Str(candidate.clone())) {
                    candidate.push(b'a');
                }
                Some(Ctor::Str(candidate))
            }
            CtorSet::Opaque => None,
        }
    }

    /// Number of fields of `ctor`.
    #[must_use]
    pub fn arity(&self, ctor: &Ctor, registry: &TypeRegistry) -> usize {
        match (self, ctor) {
            (CtorSet::Tuple(elems), _) => elems.len(),
            (CtorSet::Enum { template, .. }, Ctor::Variant(case)) => registry
                .template(*template)
                .cases
                .get(*case)
                .map_or(0, |c| c.fields.len()),
            _ => 0,
        }
    }

    /// Field types of `ctor` at this instantiation.
    #[must_use]
    pub fn field_types(&self, ctor: &Ctor, registry: &TypeRegistry) -> Vec<Ty> {
        match (self, ctor) {
            (CtorSet::Tuple(elems), _) => elems.clone(),
            (CtorSet::Enum { template, args }, Ctor::Variant(case)) => registry
                .template(*template)
                .instantiate_fields(*case, args)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// `ctor` applied to wildcards.
    #[must_use]
    pub fn pattern(&self, ctor: &Ctor, registry: &TypeRegistry) -> Pat {
        let fields = Pat::wilds(self.arity(ctor, registry));
        match (self, ctor) {
            (_, Ctor::Bool(b)) => Pat::Bool(*b),
            (CtorSet::Int { width }, Ctor::Int(value)) => Pat::Int {
                width: *width,
                value: *value,
            },
            (_, Ctor::Str(bytes)) => Pat::Str(bytes.clone()),
            (_, Ctor::Tuple(_)) => Pat::Tuple(fields),
            (CtorSet::Enum { template, .. }, Ctor::Variant(case)) => {
                let name = registry.template(*template).cases[*case].name;
                Pat::Ctor {
                    name,
                    template: *template,
                    case: *case,
                    args: fields,
                }
            }
            _ => Pat::wild(),
        }
    }
}

/// Smallest-magnitude search for an unlisted `width`-bit value: zero if it
/// is free, otherwise the first gap above the minimum.
fn missing_int(width: u32, seen: &[Ctor]) -> Option<i128> {
    if width == 0 || width > 128 {
        return None;
    }
    let (min, max) = if width == 128 {
        (i128::MIN, i128::MAX)
    } else {
        let half = 1i128 << (width - 1);
        (-half, half - 1)
    };

    let mut values: Vec<i128> = seen
        .iter()
        .filter_map(|c| match c {
            Ctor::Int(v) => Some(*v),
            _ => None,
        })
        .collect();
    if !values.contains(&0) {
        return Some(0);
    }
    values.sort_unstable();
    values.dedup();

    let mut candidate = min;
    for value in values {
        if value > candidate {
            break;
        }
        if value == candidate {
            candidate = candidate.checked_add(1)?;
        }
    }
    (candidate <= max).then_some(candidate)
}
