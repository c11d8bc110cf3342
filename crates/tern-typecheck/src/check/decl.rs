//! Data and alias declarations.
//!
//! A data group is registered in three steps: every type of the group gets
//! an open template first, so fields can refer to any type in the group;
//! then each case is elaborated and appended; finally the kinds are
//! defaulted, the templates sealed and the constructors registered. The
//! caller rolls the registry back if any step fails.

use crate::context::{CtorInfo, Scheme, TypeDef};
use crate::error::{NameKind, Result, TypeError};
use crate::infer::Context;
use crate::types::{Kind, Template, TemplateId, Ty, TyVar};
use fxhash::FxHashSet;
use tern_log::debug;
use tern_mem::Symbol;
use tern_syntax::Span;
use tern_syntax::ast::{DataDecl, Type};

use super::kind::KindChecker;

fn check_unique(
    ctx: &Context,
    names: impl IntoIterator<Item = Symbol>,
    what: NameKind,
    span: Span,
) -> Result<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(TypeError::DuplicateName {
                what,
                name: ctx.name(name),
                span,
            });
        }
    }
    Ok(())
}

fn bind_params(
    ctx: &mut Context,
    kc: &mut KindChecker,
    params: &[Symbol],
) -> Vec<(TyVar, Kind)> {
    params
        .iter()
        .map(|&name| {
            let var = ctx.subst.fresh_grounded(name);
            let kind = kc.fresh_kind();
            kc.push_var(name, var, kind.clone());
            (var, kind)
        })
        .collect()
}

/// Checks and registers a group of mutually recursive data types.
///
/// # Errors
///
/// `DuplicateName` for repeated type, parameter or case names in the group,
/// and any elaboration error from the field types.
pub fn check_data(ctx: &mut Context, group: &[DataDecl]) -> Result<Vec<TemplateId>> {
    if let Some(first) = group.first() {
        check_unique(ctx, group.iter().map(|d| d.name), NameKind::Type, first.span)?;
        check_unique(
            ctx,
            group.iter().flat_map(|d| d.cases.iter().map(|c| c.name)),
            NameKind::Constructor,
            first.span,
        )?;
    }

    let mut kc = KindChecker::for_declaration();
    let mut ids = Vec::with_capacity(group.len());
    for decl in group {
        check_unique(ctx, decl.params.iter().copied(), NameKind::TypeVar, decl.span)?;
        let params = bind_params(ctx, &mut kc, &decl.params);
        kc.clear_scope();
        let id = ctx.registry.alloc_template(Template::open(decl.name, params));
        ctx.registry.define_type(decl.name, TypeDef::Data(id));
        ids.push(id);
    }

    for (decl, &id) in group.iter().zip(&ids) {
        kc.clear_scope();
        let params = ctx.registry.template(id).params.clone();
        for (&name, (var, kind)) in decl.params.iter().zip(params) {
            kc.push_var(name, var, kind);
        }

        for case in &decl.cases {
            let fields = case
                .fields
                .iter()
                .map(|field| kc.elaborate_star(ctx, field))
                .collect::<Result<Vec<_>>>()?;
            if ctx.registry.template_mut(id).add_case(case.name, fields).is_none() {
                return Err(TypeError::DuplicateName {
                    what: NameKind::Constructor,
                    name: ctx.name(case.name),
                    span: case.span,
                });
            }
        }
    }

    for &id in &ids {
        let template = ctx.registry.template_mut(id);
        for (_, kind) in &mut template.params {
            *kind = kc.default_kind(kind);
        }
        template.seal();
    }

    for &id in &ids {
        let template = ctx.registry.template(id);
        let self_ty = template.self_ty(id);
        let vars = template.param_vars();
        let ctors: Vec<CtorInfo> = template
            .cases
            .iter()
            .enumerate()
            .map(|(index, case)| {
                let ty = match case.fields.as_slice() {
                    [] => self_ty.clone(),
                    [field] => Ty::arrow(field.clone(), self_ty.clone()),
                    fields => Ty::arrow(Ty::Tuple(fields.to_vec()), self_ty.clone()),
                };
                CtorInfo {
                    name: case.name,
                    template: id,
                    case: index,
                    arity: case.fields.len(),
                    scheme: Scheme::poly(vars.clone(), ty),
                }
            })
            .collect();
        for info in ctors {
            ctx.registry.define_ctor(info);
        }
        debug!(
            "registered data type {} with kind {}",
            ctx.name(ctx.registry.template(id).name),
            ctx.registry.template(id).kind()
        );
    }

    Ok(ids)
}

/// Checks and registers `type name params = body`.
///
/// The alias is not in scope in its own body.
///
/// # Errors
///
/// `DuplicateName` for repeated parameters, and any elaboration error from
/// the body.
pub fn check_alias(
    ctx: &mut Context,
    name: Symbol,
    params: &[Symbol],
    body: &Type,
    span: Span,
) -> Result<()> {
    check_unique(ctx, params.iter().copied(), NameKind::TypeVar, span)?;

    let mut kc = KindChecker::for_declaration();
    let params = bind_params(ctx, &mut kc, params);
    let (body, body_kind) = kc.elaborate(ctx, body)?;

    let kind = Kind::function(
        params.iter().map(|(_, k)| kc.default_kind(k)),
        kc.default_kind(&body_kind),
    );
    let ty = if params.is_empty() {
        body
    } else {
        Ty::Forall(params.iter().map(|(v, _)| *v).collect(), Box::new(body))
    };
    debug!("registered alias {} with kind {kind}", ctx.name(name));
    ctx.registry.define_type(name, TypeDef::Alias { ty, kind });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tern_syntax::ast::CaseDecl;

    fn span() -> Span {
        Span::new(0, 0, 0, 0, 0, 0)
    }

    fn tname(ctx: &mut Context, s: &str) -> Type {
        Type::Name {
            name: ctx.intern(s),
            span: span(),
        }
    }

    fn tvar(ctx: &mut Context, s: &str) -> Type {
        Type::Var {
            name: ctx.intern(s),
            span: span(),
        }
    }

    fn case(ctx: &mut Context, name: &str, fields: Vec<Type>) -> CaseDecl {
        CaseDecl {
            name: ctx.intern(name),
            fields,
            span: span(),
        }
    }

    fn option_decl(ctx: &mut Context) -> DataDecl {
        let a = tvar(ctx, "a");
        DataDecl {
            name: ctx.intern("option"),
            params: vec![ctx.intern("a")],
            cases: vec![case(ctx, "None", vec![]), case(ctx, "Some", vec![a])],
            span: span(),
        }
    }

    #[test]
    fn test_option_registers_ctors() {
        let mut ctx = Context::new();
        let decl = option_decl(&mut ctx);
        let ids = check_data(&mut ctx, &[decl]).unwrap();
        let template = ctx.registry.template(ids[0]);
        assert!(template.is_sealed());
        assert_eq!(template.kind(), Kind::of_arity(1));

        let some = ctx.intern("Some");
        let info = ctx.registry.lookup_ctor(some).unwrap().clone();
        assert_eq!(info.arity, 1);
        assert_eq!(info.case, 1);
        assert_eq!(ctx.display_ty(&info.scheme.ty), "'a -> option 'a");

        let none = ctx.intern("None");
        let info = ctx.registry.lookup_ctor(none).unwrap().clone();
        assert_eq!(ctx.display_ty(&info.scheme.ty), "option 'a");
    }

    #[test]
    fn test_mutually_recursive_group() {
        let mut ctx = Context::new();
        // data tree = Leaf | Node forest and forest = Nil | Cons (tree, forest)
        let forest = tname(&mut ctx, "forest");
        let tree = tname(&mut ctx, "tree");
        let forest2 = tname(&mut ctx, "forest");
        let group = vec![
            DataDecl {
                name: ctx.intern("tree"),
                params: vec![],
                cases: vec![case(&mut ctx, "Leaf", vec![]), case(&mut ctx, "Node", vec![forest])],
                span: span(),
            },
            DataDecl {
                name: ctx.intern("forest"),
                params: vec![],
                cases: vec![
                    case(&mut ctx, "Nil", vec![]),
                    case(&mut ctx, "Cons", vec![tree, forest2]),
                ],
                span: span(),
            },
        ];
        let ids = check_data(&mut ctx, &group).unwrap();
        assert_eq!(ids.len(), 2);

        let cons = ctx.intern("Cons");
        let info = ctx.registry.lookup_ctor(cons).unwrap().clone();
        assert_eq!(info.arity, 2);
        assert_eq!(ctx.display_ty(&info.scheme.ty), "(tree, forest) -> forest");
    }

    #[test]
    fn test_higher_kinded_param() {
        let mut ctx = Context::new();
        // data wrap f a = Wrap (f a)
        let f = tvar(&mut ctx, "f");
        let a = tvar(&mut ctx, "a");
        let field = Type::App {
            head: Box::new(f),
            args: vec![a],
            span: span(),
        };
        let decl = DataDecl {
            name: ctx.intern("wrap"),
            params: vec![ctx.intern("f"), ctx.intern("a")],
            cases: vec![case(&mut ctx, "Wrap", vec![field])],
            span: span(),
        };
        let ids = check_data(&mut ctx, &[decl]).unwrap();
        let expected = Kind::function(
            [Kind::of_arity(1), Kind::Star].into_iter(),
            Kind::Star,
        );
        assert_eq!(ctx.registry.template(ids[0]).kind(), expected);
    }

    #[test]
    fn test_duplicate_case_names() {
        let mut ctx = Context::new();
        let decl = DataDecl {
            name: ctx.intern("t"),
            params: vec![],
            cases: vec![case(&mut ctx, "A", vec![]), case(&mut ctx, "A", vec![])],
            span: span(),
        };
        let err = check_data(&mut ctx, &[decl]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn test_duplicate_params() {
        let mut ctx = Context::new();
        let decl = DataDecl {
            name: ctx.intern("t"),
            params: vec![ctx.intern("a"), ctx.intern("a")],
            cases: vec![],
            span: span(),
        };
        let err = check_data(&mut ctx, &[decl]).unwrap_err();
        assert!(matches!(
            err,
            TypeError::DuplicateName {
                what: NameKind::TypeVar,
                ..
            }
        ));
    }

    #[test]
    fn test_alias_expands() {
        let mut ctx = Context::new();
        let decl = option_decl(&mut ctx);
        check_data(&mut ctx, &[decl]).unwrap();

        // type maybe a = option a
        let name = ctx.intern("maybe");
        let a = ctx.intern("a");
        let body = Type::App {
            head: Box::new(tname(&mut ctx, "option")),
            args: vec![tvar(&mut ctx, "a")],
            span: span(),
        };
        check_alias(&mut ctx, name, &[a], &body, span()).unwrap();

        let use_site = Type::App {
            head: Box::new(tname(&mut ctx, "maybe")),
            args: vec![tname(&mut ctx, "bool")],
            span: span(),
        };
        let ty = crate::check::elaborate_annotation(&mut ctx, &use_site).unwrap();
        assert_eq!(ctx.display_ty(&ty), "option bool");
    }

    #[test]
    fn test_alias_is_not_recursive() {
        let mut ctx = Context::new();
        let name = ctx.intern("loop");
        let body = tname(&mut ctx, "loop");
        let err = check_alias(&mut ctx, name, &[], &body, span()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndeclaredName);
        assert!(ctx.registry.lookup_type(name).is_none());
    }
}
