//! Templates: the shared definitions behind nominal types.
//!
//! A nominal type `option bool` is a reference to the `option` template plus
//! its arguments. Templates are allocated in the registry's arena, so a data
//! type whose cases mention itself refers to its own [`TemplateId`] rather
//! than to an expanded copy of itself.
//!
//! A template is [`TemplateState::Open`] while its declaration group is
//! being checked, when cases are appended one at a time, and
//! [`TemplateState::Sealed`] afterwards.

use crate::types::{Kind, Ty, TyVar};
use fxhash::FxHashMap;
use tern_mem::{Idx, Symbol};

/// Index of a template in the registry's arena.
pub type TemplateId = Idx<Template>;

/// Lifecycle of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateState {
    /// Cases are still being added
    Open,
    /// Frozen
    Sealed,
}

/// Families the checker knows without a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `bool`, whose values are the literals `true` and `false`
    Bool,
    /// `string`
    Str,
    /// Two's-complement integer of the given bit width
    Int(u32),
}

/// One case of a data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Constructor name
    pub name: Symbol,
    /// Field types, over the template's parameters
    pub fields: Vec<Ty>,
}

/// Definition of a nominal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Type name
    pub name: Symbol,
    /// Parameters: rigid variables and their kinds
    pub params: Vec<(TyVar, Kind)>,
    /// Cases in declaration order
    pub cases: Vec<Case>,
    /// Lifecycle state
    pub state: TemplateState,
    /// Set for built-in families
    pub builtin: Option<Builtin>,
}

impl Template {
    /// An open data type template with no cases yet.
    #[must_use]
    pub fn open(name: Symbol, params: Vec<(TyVar, Kind)>) -> Self {
        Self {
            name,
            params,
            cases: Vec::new(),
            state: TemplateState::Open,
            builtin: None,
        }
    }

    /// A sealed template for a built-in family.
    #[must_use]
    pub fn builtin(name: Symbol, builtin: Builtin) -> Self {
        Self {
            name,
            params: Vec::new(),
            cases: Vec::new(),
            state: TemplateState::Sealed,
            builtin: Some(builtin),
        }
    }

    /// Appends a case, returning its index.
    ///
    /// Returns `None` if the template is sealed or already has a case with
    /// this name.
    pub fn add_case(&mut self, name: Symbol, fields: Vec<Ty>) -> Option<usize> {
        if self.state == TemplateState::Sealed || self.case_index(name).is_some() {
            return None;
        }
        self.cases.push(Case { name, fields });
        Some(self.cases.len() - 1)
    }

    /// Freezes the template.
    pub fn seal(&mut self) {
        self.state = TemplateState::Sealed;
    }

    /// Whether [`Template::seal`] has been called.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.state == TemplateState::Sealed
    }

    /// Index of the case named `name`.
    #[must_use]
    pub fn case_index(&self, name: Symbol) -> Option<usize> {
        self.cases.iter().position(|case| case.name == name)
    }

    /// Parameter variables, in order.
    #[must_use]
    pub fn param_vars(&self) -> Vec<TyVar> {
        self.params.iter().map(|(v, _)| *v).collect()
    }

    /// Kind of the type constructor.
    #[must_use]
    pub fn kind(&self) -> Kind {
        Kind::function(self.params.iter().map(|(_, k)| k.clone()), Kind::Star)
    }

    /// The nominal type instantiated at its own parameters.
    #[must_use]
    pub fn self_ty(&self, id: TemplateId) -> Ty {
        Ty::Nominal {
            template: id,
            args: self.params.iter().map(|(v, _)| Ty::Var(*v)).collect(),
        }
    }

    /// Field types of case `case` at the instantiation `args`.
    ///
    /// Returns `None` for an out-of-range case.
    #[must_use]
    pub fn instantiate_fields(&self, case: usize, args: &[Ty]) -> Option<Vec<Ty>> {
        let fields = &self.cases.get(case)?.fields;
        let map: FxHashMap<TyVar, Ty> = self
            .params
            .iter()
            .map(|(v, _)| *v)
            .zip(args.iter().cloned())
            .collect();
        Some(fields.iter().map(|f| f.substitute(&map)).collect())
    }
}
