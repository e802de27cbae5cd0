//! Declaration Pass - register types and signatures before bodies are walked.
//!
//! The pass reads the top level of one environment and fills its tables so
//! later code can refer to anything declared anywhere in the file. Bodies,
//! field initializers and local declarations are left to the walker.
//!
//! ## Steps
//!
//! ```text
//! 0. root `use` statements      imports recorded, in order
//! 1. class/entity/enum/alias    names claimed, first declaration wins
//! 2. aliases                    target types resolved
//! 3. members                    fields, methods, constructors, entity contracts
//! 4. top-level functions        bound as constants in the root scope
//! 5. imported environments      walked, unless one is waiting on this one
//! ```
//!
//! A type resolved through an import walks that import early. Everything
//! else an import needs from this environment is registered by the time
//! step 5 walks it.
//!
//! Names are claimed before any type is resolved, so a field may use a class
//! declared further down and two entities may refer to each other.

use hybroid_ast::{
    AliasDecl, ClassDecl, EntityDecl, EntityFunctionDecl, EntityFunctionKind, EnumDecl,
    FunctionDecl, Ident, Stmt, VariableDecl,
};
use hybroid_core::{Alert, AlertKind, FixedKind, Library, Span, Type};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::values::{
    AliasVal, ClassVal, DeclRef, EntityVal, EnumVal, FunctionVal, Members, Value, VariableVal,
    to_value,
};
use crate::walker::Walker;

/// Output of the declaration pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationOutput {
    /// Classes, entities, enums and aliases registered.
    pub types_registered: usize,
    /// Functions, methods, constructors and entity functions registered.
    pub functions_registered: usize,
}

/// Registers the declarations of one environment.
pub struct DeclarationPass<'w, 's> {
    walker: &'w mut Walker<'s>,
    types_registered: usize,
    functions_registered: usize,
}

impl<'w, 's> DeclarationPass<'w, 's> {
    /// Create a pass that registers into the walker's environment.
    pub fn new(walker: &'w mut Walker<'s>) -> Self {
        Self {
            walker,
            types_registered: 0,
            functions_registered: 0,
        }
    }

    /// Run every step over the top-level statements.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, body: &[Stmt]) -> DeclarationOutput {
        for stmt in body {
            if let Stmt::Use(use_stmt) = stmt {
                self.walker.import_environment(use_stmt);
            }
        }

        for stmt in body {
            match stmt {
                Stmt::Class(decl) => self.claim_class(decl),
                Stmt::Entity(decl) => self.claim_entity(decl),
                Stmt::Enum(decl) => self.register_enum(decl),
                Stmt::Alias(decl) => self.claim_alias(decl),
                _ => {}
            }
        }

        self.resolve_aliases(body);

        for stmt in body {
            match stmt {
                Stmt::Class(decl) => self.register_class_members(decl),
                Stmt::Entity(decl) => self.register_entity_members(decl),
                _ => {}
            }
        }

        for stmt in body {
            if let Stmt::Function(decl) = stmt {
                self.register_function(decl);
            }
        }

        self.walker.walk_imports(body);

        DeclarationOutput {
            types_registered: self.types_registered,
            functions_registered: self.functions_registered,
        }
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// Claim a type name. Returns `false` and reports when it is taken.
    fn claim(&mut self, name: &Ident, what: &'static str) -> bool {
        let Some(original) = self.walker.env().declared_span(name.as_str()) else {
            self.types_registered += 1;
            return true;
        };
        self.walker.push_alert(
            Alert::new(
                AlertKind::Redeclaration {
                    name: name.name.clone(),
                    what,
                },
                name.span,
            )
            .with_span(original),
        );
        false
    }

    fn decl_ref(&self, name: &Ident) -> DeclRef {
        DeclRef::new(self.walker.env_id(), name.as_str())
    }

    fn claim_class(&mut self, decl: &ClassDecl) {
        if !self.claim(&decl.name, "class") {
            return;
        }
        let class = ClassVal {
            ty: self.decl_ref(&decl.name),
            span: decl.name.span,
            is_pub: decl.is_pub,
            members: Members::default(),
            constructor: None,
        };
        self.walker
            .env_mut()
            .classes
            .insert(decl.name.name.clone(), class);
    }

    fn claim_entity(&mut self, decl: &EntityDecl) {
        if !self.claim(&decl.name, "entity") {
            return;
        }
        let entity = EntityVal {
            ty: self.decl_ref(&decl.name),
            span: decl.name.span,
            is_pub: decl.is_pub,
            members: Members::default(),
            spawner: None,
            destroyer: None,
            callbacks: FxHashMap::default(),
        };
        self.walker
            .env_mut()
            .entities
            .insert(decl.name.name.clone(), entity);
    }

    /// Enums need nothing resolved and are complete after this step.
    fn register_enum(&mut self, decl: &EnumDecl) {
        if !self.claim(&decl.name, "enum") {
            return;
        }
        if decl.fields.is_empty() {
            self.walker.report(
                AlertKind::EmptyEnum {
                    name: decl.name.name.clone(),
                },
                decl.name.span,
            );
        }

        let mut fields: Vec<String> = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            if fields.contains(&field.name) {
                self.walker.report(
                    AlertKind::DuplicateElement {
                        name: field.name.clone(),
                    },
                    field.span,
                );
                continue;
            }
            fields.push(field.name.clone());
        }

        let enum_val = EnumVal {
            ty: self.decl_ref(&decl.name),
            span: decl.name.span,
            is_pub: decl.is_pub,
            fields,
        };
        self.walker
            .env_mut()
            .enums
            .insert(decl.name.name.clone(), enum_val);
    }

    fn claim_alias(&mut self, decl: &AliasDecl) {
        if !self.claim(&decl.name, "alias") {
            return;
        }
        let alias = AliasVal {
            ty: Type::Invalid,
            span: decl.name.span,
            is_pub: decl.is_pub,
        };
        self.walker
            .env_mut()
            .aliases
            .insert(decl.name.name.clone(), alias);
    }

    // ==========================================================================
    // Aliases
    // ==========================================================================

    /// Resolve every alias, following aliases of aliases in any order.
    fn resolve_aliases(&mut self, body: &[Stmt]) {
        let decls: FxHashMap<&str, &AliasDecl> = body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Alias(decl) if self.is_first(decl.name.span, &decl.name) => {
                    Some((decl.name.as_str(), decl))
                }
                _ => None,
            })
            .collect();

        let mut resolved = FxHashSet::default();
        let mut order: Vec<&str> = decls.keys().copied().collect();
        order.sort_by_key(|name| decls[name].span);
        for name in order {
            self.resolve_alias(name, &decls, &mut resolved, &mut Vec::new());
        }
    }

    fn resolve_alias<'a>(
        &mut self,
        name: &'a str,
        decls: &FxHashMap<&'a str, &'a AliasDecl>,
        resolved: &mut FxHashSet<&'a str>,
        visiting: &mut Vec<&'a str>,
    ) {
        if resolved.contains(name) {
            return;
        }
        let Some(&decl) = decls.get(name) else {
            return;
        };
        if visiting.contains(&name) {
            // A cycle stays Invalid.
            self.walker.report(
                AlertKind::InvalidType {
                    name: name.to_string(),
                },
                decl.name.span,
            );
            resolved.insert(name);
            return;
        }

        visiting.push(name);
        let mut pending = Vec::new();
        collect_local_names(&decl.ty, &mut pending);
        for dependency in pending {
            if decls.contains_key(dependency) {
                self.resolve_alias(dependency, decls, resolved, visiting);
            }
        }
        visiting.pop();

        if resolved.insert(name) {
            let ty = self.walker.resolve_type(&decl.ty);
            tracing::trace!(alias = name, %ty, "resolved alias");
            if let Some(alias) = self.walker.env_mut().aliases.get_mut(name) {
                alias.ty = ty;
            }
        }
    }

    /// Whether the declaration at `span` is the one that owns `name`.
    fn is_first(&self, span: Span, name: &Ident) -> bool {
        self.walker.env().declared_span(name.as_str()) == Some(span)
    }

    // ==========================================================================
    // Members
    // ==========================================================================

    fn register_class_members(&mut self, decl: &ClassDecl) {
        if !self.is_first(decl.name.span, &decl.name) {
            return;
        }
        let mut members = Members::default();
        self.register_fields(&decl.fields, &mut members);
        self.register_methods(&decl.methods, &mut members);

        let constructor = match &decl.constructor {
            Some(ctor) => {
                self.functions_registered += 1;
                Some(self.walker.resolve_signature(&ctor.generics, &ctor.params, &[]))
            }
            None => {
                self.walker.report(
                    AlertKind::MissingConstructor {
                        class: decl.name.name.clone(),
                    },
                    decl.name.span,
                );
                None
            }
        };

        if let Some(class) = self.walker.env_mut().classes.get_mut(decl.name.as_str()) {
            class.members = members;
            class.constructor = constructor;
        }
    }

    fn register_entity_members(&mut self, decl: &EntityDecl) {
        if !self.is_first(decl.name.span, &decl.name) {
            return;
        }
        let mut members = Members::default();
        self.register_fields(&decl.fields, &mut members);
        self.register_methods(&decl.methods, &mut members);

        let mut spawner = None;
        let mut destroyer = None;
        let mut callbacks = FxHashMap::default();
        let mut first_spans: FxHashMap<EntityFunctionKind, Span> = FxHashMap::default();

        for function in &decl.functions {
            if let Some(original) = first_spans.get(&function.kind) {
                self.walker.push_alert(
                    Alert::new(
                        AlertKind::MultipleEntityFunctions {
                            entity: decl.name.name.clone(),
                            function: function.kind.as_str(),
                        },
                        function.span,
                    )
                    .with_span(*original),
                );
                continue;
            }
            first_spans.insert(function.kind, function.span);

            let sig = self.entity_function_signature(function);
            self.functions_registered += 1;
            match function.kind {
                EntityFunctionKind::Spawn => spawner = Some(sig),
                EntityFunctionKind::Destroy => destroyer = Some(sig),
                kind => {
                    callbacks.insert(kind, sig);
                }
            }
        }

        for (registered, function) in [(&spawner, "spawn"), (&destroyer, "destroy")] {
            if registered.is_none() {
                self.walker.report(
                    AlertKind::MissingEntityFunction {
                        entity: decl.name.name.clone(),
                        function,
                    },
                    decl.name.span,
                );
            }
        }

        if let Some(entity) = self.walker.env_mut().entities.get_mut(decl.name.as_str()) {
            entity.members = members;
            entity.spawner = spawner;
            entity.destroyer = destroyer;
            entity.callbacks = callbacks;
        }
    }

    /// Resolve a lifecycle function and check it against the engine contract.
    fn entity_function_signature(&mut self, function: &EntityFunctionDecl) -> FunctionVal {
        let sig =
            self.walker
                .resolve_signature(&function.generics, &function.params, &function.returns);
        let kind = function.kind;

        if !kind.is_callback() {
            if kind == EntityFunctionKind::Spawn && !has_position_params(&sig) {
                self.walker
                    .report(AlertKind::SpawnerParameters, function.span);
            }
            if !sig.returns.is_empty() {
                self.walker.report(
                    AlertKind::LifecycleReturns {
                        function: kind.as_str(),
                    },
                    function.span,
                );
            }
            return sig;
        }

        if let Some(expected) = expected_callback(kind) {
            let got = sig.ty();
            if got != expected.ty() || !sig.generics.is_empty() {
                self.walker.report(
                    AlertKind::EntityFunctionSignatureMismatch {
                        function: kind.as_str(),
                        expected: expected.ty(),
                        got,
                    },
                    function.span,
                );
            }
        }
        sig
    }

    fn register_fields(&mut self, fields: &[VariableDecl], members: &mut Members) {
        for field in fields {
            let declared = field.ty.as_ref().map(|ty| self.walker.resolve_type(ty));
            let one_to_one = field.values.len() == field.identifiers.len();
            for (index, ident) in field.identifiers.iter().enumerate() {
                let value = match &declared {
                    Some(ty) => to_value(ty),
                    None => match field.values.get(index).and_then(|v| v.as_literal()) {
                        Some(lit) if one_to_one => match self.walker.walk_literal(lit) {
                            Value::Number(_) => Value::NUMBER,
                            other => other,
                        },
                        _ => Value::Unknown,
                    },
                };
                let variable = VariableVal::new(ident.as_str(), value, ident.span)
                    .public(field.is_pub)
                    .constant(field.is_const)
                    .initialized(!field.values.is_empty());
                if let Err(original) = members.add_field(variable) {
                    self.member_clash(ident, "field", original);
                }
            }
        }
    }

    fn register_methods(&mut self, methods: &[FunctionDecl], members: &mut Members) {
        for method in methods {
            let sig =
                self.walker
                    .resolve_signature(&method.generics, &method.params, &method.returns);
            match members.add_method(method.name.as_str(), sig, method.name.span) {
                Ok(()) => self.functions_registered += 1,
                Err(original) => self.member_clash(&method.name, "method", original),
            }
        }
    }

    fn member_clash(&mut self, name: &Ident, what: &'static str, original: Span) {
        self.walker.push_alert(
            Alert::new(
                AlertKind::Redeclaration {
                    name: name.name.clone(),
                    what,
                },
                name.span,
            )
            .with_span(original),
        );
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    fn register_function(&mut self, decl: &FunctionDecl) {
        let sig = self
            .walker
            .resolve_signature(&decl.generics, &decl.params, &decl.returns);
        let variable = VariableVal::new(decl.name.as_str(), Value::Function(sig), decl.name.span)
            .public(decl.is_pub)
            .constant(true)
            .initialized(true);
        match self.walker.scopes_mut().declare_root(variable) {
            Ok(()) => self.functions_registered += 1,
            Err(err) => self.walker.report_scope_error(err, decl.name.span, "function"),
        }
    }
}

/// Names of this environment an alias target may refer to.
fn collect_local_names<'a>(ty: &'a hybroid_ast::TypeExpr, out: &mut Vec<&'a str>) {
    if ty.env.is_none() {
        out.push(ty.name.as_str());
    }
    for inner in ty.wrapped.iter().chain(&ty.params).chain(&ty.returns) {
        collect_local_names(inner, out);
    }
}

fn has_position_params(sig: &FunctionVal) -> bool {
    sig.params.len() >= 2
        && sig.params[..2]
            .iter()
            .all(|p| matches!(p, Type::Fixed(FixedKind::Fixed) | Type::Invalid))
}

/// The signature the engine calls an entity callback with.
fn expected_callback(kind: EntityFunctionKind) -> Option<FunctionVal> {
    let sig = match kind {
        EntityFunctionKind::WallCollision => {
            FunctionVal::new(vec![Type::FIXED, Type::FIXED], vec![])
        }
        EntityFunctionKind::WeaponCollision => FunctionVal::new(
            vec![
                Type::NUMBER,
                Type::Enum {
                    env: Library::Pewpew.env_id(),
                    name: "WeaponType".to_string(),
                },
            ],
            vec![Type::BOOL],
        ),
        EntityFunctionKind::PlayerCollision => {
            FunctionVal::new(vec![Type::NUMBER, Type::RawEntity], vec![])
        }
        EntityFunctionKind::Update => FunctionVal::new(vec![], vec![]),
        EntityFunctionKind::Spawn | EntityFunctionKind::Destroy => return None,
    };
    Some(sig)
}
