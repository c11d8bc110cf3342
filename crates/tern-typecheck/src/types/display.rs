//! Type pretty-printing for error messages.
//!
//! Types are resolved through the substitution before printing, so what is
//! shown is what the checker currently knows. Flexible variables print as
//! `?n`, rigid variables as `'name` (or `'?n` when they have no source name).

use crate::context::{Cell, Subst, TypeRegistry};
use crate::types::Ty;
use std::fmt;
use tern_mem::StringInterner;

/// Where a type is being printed, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    /// Anywhere a full type is allowed
    Top,
    /// Left of an arrow
    ArrowParam,
    /// Argument of an application
    Arg,
}

/// A wrapper type for displaying types.
pub struct DisplayTy<'a> {
    ty: Ty,
    interner: &'a StringInterner,
    registry: &'a TypeRegistry,
    subst: &'a Subst,
}

impl<'a> DisplayTy<'a> {
    /// Create a new display wrapper for a type.
    pub fn new(
        ty: &Ty,
        interner: &'a StringInterner,
        registry: &'a TypeRegistry,
        subst: &'a Subst,
    ) -> Self {
        Self {
            ty: subst.zonk(ty),
            interner,
            registry,
            subst,
        }
    }

    fn format_type(&self, ty: &Ty, prec: Prec, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ty {
            Ty::Var(var) => {
                let root = self.subst.root(*var);
                match self.subst.cell(root) {
                    Cell::Grounded(Some(name)) => write!(f, "'{}", self.interner.display(*name)),
                    Cell::Grounded(None) => write!(f, "'?{}", root.0),
                    _ => write!(f, "?{}", root.0),
                }
            }

            Ty::Arrow(param, result) => {
                if prec > Prec::Top {
                    write!(f, "(")?;
                }
                self.format_type(param, Prec::ArrowParam, f)?;
                write!(f, " -> ")?;
                self.format_type(result, Prec::Top, f)?;
                if prec > Prec::Top {
                    write!(f, ")")?;
                }
                Ok(())
            }

            Ty::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.format_type(elem, Prec::Top, f)?;
                }
                write!(f, ")")
            }

            Ty::Nominal { template, args } => {
                let name = self.interner.display(self.registry.template(*template).name);
                if args.is_empty() {
                    return write!(f, "{name}");
                }
                if prec == Prec::Arg {
                    write!(f, "(")?;
                }
                write!(f, "{name}")?;
                for arg in args {
                    write!(f, " ")?;
                    self.format_type(arg, Prec::Arg, f)?;
                }
                if prec == Prec::Arg {
                    write!(f, ")")?;
                }
                Ok(())
            }

            Ty::Forall(params, body) => {
                if prec > Prec::Top {
                    write!(f, "(")?;
                }
                write!(f, "forall")?;
                for param in params {
                    write!(f, " ")?;
                    self.format_type(&Ty::Var(*param), Prec::Arg, f)?;
                }
                write!(f, ". ")?;
                self.format_type(body, Prec::Top, f)?;
                if prec > Prec::Top {
                    write!(f, ")")?;
                }
                Ok(())
            }

            Ty::App(head, args) => {
                if prec == Prec::Arg {
                    write!(f, "(")?;
                }
                self.format_type(head, Prec::Arg, f)?;
                for arg in args {
                    write!(f, " ")?;
                    self.format_type(arg, Prec::Arg, f)?;
                }
                if prec == Prec::Arg {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DisplayTy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_type(&self.ty, Prec::Top, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, Template};

    fn show(ty: &Ty, interner: &StringInterner, registry: &TypeRegistry, subst: &Subst) -> String {
        DisplayTy::new(ty, interner, registry, subst).to_string()
    }

    #[test]
    fn test_display_arrows() {
        let mut interner = StringInterner::new();
        let registry = TypeRegistry::new(&mut interner);
        let subst = Subst::new();
        let b = registry.bool_ty();

        let curried = Ty::arrow(b.clone(), Ty::arrow(b.clone(), b.clone()));
        let higher = Ty::arrow(Ty::arrow(b.clone(), b.clone()), b.clone());
        assert_eq!(show(&curried, &interner, &registry, &subst), "bool -> bool -> bool");
        assert_eq!(show(&higher, &interner, &registry, &subst), "(bool -> bool) -> bool");
    }

    #[test]
    fn test_display_nominal_and_tuple() {
        let mut interner = StringInterner::new();
        let mut registry = TypeRegistry::new(&mut interner);
        let mut subst = Subst::new();
        let a = subst.fresh_grounded(interner.intern("a"));
        let option = registry.alloc_template(Template::open(
            interner.intern("option"),
            vec![(a, Kind::Star)],
        ));
        let inner = Ty::Nominal {
            template: option,
            args: vec![registry.string_ty()],
        };
        let nested = Ty::Nominal {
            template: option,
            args: vec![inner.clone()],
        };
        let pair = Ty::Tuple(vec![inner, Ty::unit()]);

        assert_eq!(show(&nested, &interner, &registry, &subst), "option (option string)");
        assert_eq!(show(&pair, &interner, &registry, &subst), "(option string, ())");
    }

    #[test]
    fn test_display_vars_and_forall() {
        let mut interner = StringInterner::new();
        let registry = TypeRegistry::new(&mut interner);
        let mut subst = Subst::new();
        let flex = subst.fresh_unifiable();
        let rigid = subst.fresh_grounded(interner.intern("a"));
        let skolem = subst.fresh_skolem();

        let id = Ty::Forall(vec![rigid], Box::new(Ty::arrow(Ty::Var(rigid), Ty::Var(rigid))));
        assert_eq!(show(&id, &interner, &registry, &subst), "forall 'a. 'a -> 'a");
        assert_eq!(show(&Ty::Var(flex), &interner, &registry, &subst), "?0");
        assert_eq!(show(&Ty::Var(skolem), &interner, &registry, &subst), "'?2");

        subst.bind(flex, registry.bool_ty());
        assert_eq!(show(&Ty::Var(flex), &interner, &registry, &subst), "bool");
    }
}
