//! Registry of type names, templates and data constructors.
//!
//! Every mutation is journaled while a checkpoint is open. Templates live
//! in an append-only arena, so rolling a failed declaration group back is a
//! journal replay plus an arena truncation: nothing the group registered
//! stays visible, and everything registered before it is untouched.

use crate::context::env::Scheme;
use crate::types::{Builtin, Kind, Template, TemplateId, Ty};
use fxhash::FxHashMap;
use tern_mem::{Arena, ArenaCheckpoint, StringInterner, Symbol};

/// What a type name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    /// A type alias; `ty` is a `Forall` when the alias has parameters.
    Alias {
        /// Expansion
        ty: Ty,
        /// Kind of the alias
        kind: Kind,
    },
    /// A data type or built-in family
    Data(TemplateId),
}

/// A registered data constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorInfo {
    /// Constructor name
    pub name: Symbol,
    /// Template the constructor belongs to
    pub template: TemplateId,
    /// Case index within the template
    pub case: usize,
    /// Number of fields
    pub arity: usize,
    /// `forall params. field -> T params`, or `forall params. T params`
    pub scheme: Scheme,
}

#[derive(Debug, Clone)]
enum Undo {
    Type(Symbol, Option<TypeDef>),
    Ctor(Symbol, Option<CtorInfo>),
    IntTemplate(u32),
}

/// Position in the registry's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCheckpoint {
    templates: ArenaCheckpoint,
    journal: usize,
}

/// Registry for type names, templates and constructors.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    templates: Arena<Template>,
    types: FxHashMap<Symbol, TypeDef>,
    ctors: FxHashMap<Symbol, CtorInfo>,
    ints: FxHashMap<u32, TemplateId>,
    bool_template: TemplateId,
    str_template: TemplateId,
    journal: Vec<Undo>,
    open: usize,
}

impl TypeRegistry {
    /// Create a registry with `bool` and `string` defined.
    pub fn new(interner: &mut StringInterner) -> Self {
        let mut templates = Arena::new();
        let bool_name = interner.intern("bool");
        let str_name = interner.intern("string");
        let bool_template = templates.alloc(Template::builtin(bool_name, Builtin::Bool));
        let str_template = templates.alloc(Template::builtin(str_name, Builtin::Str));

        let mut types = FxHashMap::default();
        types.insert(bool_name, TypeDef::Data(bool_template));
        types.insert(str_name, TypeDef::Data(str_template));

        Self {
            templates,
            types,
            ctors: FxHashMap::default(),
            ints: FxHashMap::default(),
            bool_template,
            str_template,
            journal: Vec::new(),
            open: 0,
        }
    }

    /// `bool`
    #[must_use]
    pub fn bool_ty(&self) -> Ty {
        Ty::nominal(self.bool_template)
    }

    /// `string`
    #[must_use]
    pub fn string_ty(&self) -> Ty {
        Ty::nominal(self.str_template)
    }

    /// Template of the `width`-bit integer type, created on first use.
    pub fn int_template(&mut self, width: u32, interner: &mut StringInterner) -> TemplateId {
        if let Some(&id) = self.ints.get(&width) {
            return id;
        }
        let name = interner.intern(&format!("i{width}"));
        let id = self
            .templates
            .alloc(Template::builtin(name, Builtin::Int(width)));
        self.ints.insert(width, id);
        if self.open > 0 {
            self.journal.push(Undo::IntTemplate(width));
        }
        id
    }

    /// The `width`-bit integer type.
    pub fn int_ty(&mut self, width: u32, interner: &mut StringInterner) -> Ty {
        Ty::nominal(self.int_template(width, interner))
    }

    /// Stores a new template.
    pub fn alloc_template(&mut self, template: Template) -> TemplateId {
        self.templates.alloc(template)
    }

    /// The template `id`.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> &Template {
        &self.templates[id]
    }

    /// Mutable access to the template `id`.
    pub fn template_mut(&mut self, id: TemplateId) -> &mut Template {
        &mut self.templates[id]
    }

    /// All templates in allocation order.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateId, &Template)> {
        self.templates.iter()
    }

    /// Defines (or shadows) a type name.
    pub fn define_type(&mut self, name: Symbol, def: TypeDef) {
        let old = self.types.insert(name, def);
        if self.open > 0 {
            self.journal.push(Undo::Type(name, old));
        }
    }

    /// What `name` refers to.
    #[must_use]
    pub fn lookup_type(&self, name: Symbol) -> Option<&TypeDef> {
        self.types.get(&name)
    }

    /// Registers (or shadows) a constructor.
    pub fn define_ctor(&mut self, info: CtorInfo) {
        let name = info.name;
        let old = self.ctors.insert(name, info);
        if self.open > 0 {
            self.journal.push(Undo::Ctor(name, old));
        }
    }

    /// The constructor named `name`.
    #[must_use]
    pub fn lookup_ctor(&self, name: Symbol) -> Option<&CtorInfo> {
        self.ctors.get(&name)
    }

    /// All constructors, in no particular order.
    pub fn ctors(&self) -> impl Iterator<Item = &CtorInfo> {
        self.ctors.values()
    }

    /// Starts journaling.
    pub fn checkpoint(&mut self) -> RegistryCheckpoint {
        self.open += 1;
        RegistryCheckpoint {
            templates: self.templates.checkpoint(),
            journal: self.journal.len(),
        }
    }

    /// Forgets everything registered since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: RegistryCheckpoint) {
        while self.journal.len() > checkpoint.journal {
            let Some(undo) = self.journal.pop() else {
                break;
            };
            match undo {
                Undo::Type(name, Some(old)) => {
                    self.types.insert(name, old);
                }
                Undo::Type(name, None) => {
                    self.types.remove(&name);
                }
                Undo::Ctor(name, Some(old)) => {
                    self.ctors.insert(name, old);
                }
                Undo::Ctor(name, None) => {
                    self.ctors.remove(&name);
                }
                Undo::IntTemplate(width) => {
                    self.ints.remove(&width);
                }
            }
        }
        self.templates.truncate(checkpoint.templates);
        self.close();
    }

    /// Keeps everything registered since `checkpoint`.
    pub fn commit(&mut self, checkpoint: RegistryCheckpoint) {
        debug_assert!(self.journal.len() >= checkpoint.journal);
        self.close();
    }

    fn close(&mut self) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }
}
