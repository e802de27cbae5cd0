//! Class and entity bodies.
//!
//! Signatures and field types were registered by the declaration pass;
//! this walks what it skipped. A container scope binds the fields and
//! methods so bodies can use them without `self.`:
//!
//! ```text
//! Class/Entity scope (SELF_ALLOWING)
//! ├── field initializers   (SELF_ALLOWING removed)
//! ├── new / spawn          first, then: every field assigned?
//! ├── destroy, callbacks
//! └── methods
//! ```

use hybroid_ast::{ClassDecl, EntityDecl, EntityFunctionKind, FunctionDecl, VariableDecl};
use hybroid_core::{Alert, AlertKind, CompileError, NamedKind, Span, Type};
use rustc_hash::FxHashSet;

use super::Walker;
use crate::scope::{ScopeAttributes, ScopeTag};
use crate::values::{DeclRef, Members, Value, VariableVal};

impl<'s> Walker<'s> {
    pub(crate) fn walk_class(&mut self, decl: &mut ClassDecl) {
        let Some(class) = self.env().classes.get(decl.name.as_str()) else {
            self.fail(CompileError::UnregisteredContainer {
                container: decl.name.name.clone(),
                member: "new".to_string(),
            });
            return;
        };
        // Later declarations under the same name were already reported.
        if class.span != decl.name.span {
            return;
        }
        let owner = class.ty.clone();
        let members = class.members.clone();
        let constructor = class.constructor.clone();

        self.enter_container(ScopeTag::Class(owner.clone()), &members);
        self.walk_field_initializers(&owner, NamedKind::Class, &mut decl.fields, &members);
        if let (Some(ctor), Some(sig)) = (&mut decl.constructor, constructor) {
            self.walk_function_body(&sig, &ctor.params, &mut ctor.body, ctor.span);
            self.check_fields_initialized(ctor.span);
        }
        self.walk_methods(&mut decl.methods, &members);
        self.scopes_mut().close();
    }

    pub(crate) fn walk_entity(&mut self, decl: &mut EntityDecl) {
        let Some(entity) = self.env().entities.get(decl.name.as_str()) else {
            self.fail(CompileError::UnregisteredContainer {
                container: decl.name.name.clone(),
                member: "spawn".to_string(),
            });
            return;
        };
        if entity.span != decl.name.span {
            return;
        }
        let owner = entity.ty.clone();
        let members = entity.members.clone();
        let spawner = entity.spawner.clone();
        let destroyer = entity.destroyer.clone();
        let callbacks = entity.callbacks.clone();

        self.enter_container(ScopeTag::Entity(owner.clone()), &members);
        self.walk_field_initializers(&owner, NamedKind::Entity, &mut decl.fields, &members);

        // Spawner first: only its assignments initialize fields.
        let spawn_at = decl
            .functions
            .iter()
            .position(|f| f.kind == EntityFunctionKind::Spawn);
        let order: Vec<usize> = spawn_at
            .into_iter()
            .chain((0..decl.functions.len()).filter(|i| Some(*i) != spawn_at))
            .collect();

        let mut seen = FxHashSet::default();
        for index in order {
            let function = &mut decl.functions[index];
            let registered = match function.kind {
                EntityFunctionKind::Spawn => spawner.clone(),
                EntityFunctionKind::Destroy => destroyer.clone(),
                kind => callbacks.get(&kind).cloned(),
            };
            // Duplicates were reported; their bodies still get checked.
            let first = registered.is_some() && seen.insert(function.kind);
            let sig = match registered {
                Some(sig) if first => sig,
                _ => self.resolve_signature(
                    &function.generics,
                    &function.params,
                    &function.returns,
                ),
            };
            self.walk_function_body(&sig, &function.params, &mut function.body, function.span);
            if first && function.kind == EntityFunctionKind::Spawn {
                self.check_fields_initialized(function.span);
            }
        }

        self.walk_methods(&mut decl.methods, &members);
        self.scopes_mut().close();
    }

    /// Open a container scope with its fields and methods bound.
    fn enter_container(&mut self, tag: ScopeTag, members: &Members) {
        self.scopes_mut().push(tag, ScopeAttributes::SELF_ALLOWING);
        for field in members.fields() {
            self.declare(field.clone(), "field");
        }
        for (name, method) in members.methods() {
            let span = members.method_span(name).unwrap_or_default();
            let variable = VariableVal::new(name.as_str(), Value::Function(method.clone()), span)
                .constant(true)
                .initialized(true);
            self.declare(variable, "method");
        }
    }

    /// Check field initializers against the registered field types.
    ///
    /// Initializers cannot use `self`. A field registered without a known
    /// type takes the type of its initializer.
    fn walk_field_initializers(
        &mut self,
        owner: &DeclRef,
        kind: NamedKind,
        fields: &mut [VariableDecl],
        members: &Members,
    ) {
        for field in fields {
            if field.values.is_empty() {
                continue;
            }
            let registered: Vec<Option<Value>> = field
                .identifiers
                .iter()
                .map(|i| members.field(i.as_str()).map(|(_, f)| f.value.clone()))
                .collect();
            let expected: Vec<Type> = registered
                .iter()
                .map(|v| v.as_ref().map_or(Type::Invalid, Value::ty))
                .collect();

            self.scopes_mut()
                .push_restricted(ScopeTag::Untagged, ScopeAttributes::SELF_ALLOWING);
            let values = self.walk_values(&mut field.values, &expected);
            self.scopes_mut().close();

            self.check_value_count(field.identifiers.len(), &values, field.span, "field");
            for ((ident, registered), (value, span)) in
                field.identifiers.iter().zip(&registered).zip(&values)
            {
                match registered {
                    Some(Value::Unknown) => {
                        self.refine_field(owner, kind, ident.as_str(), value.clone())
                    }
                    Some(registered) => {
                        let (expected, got) = (registered.ty(), value.ty());
                        if got != expected {
                            self.report(
                                AlertKind::TypeMismatch {
                                    expected,
                                    got,
                                    context: "field",
                                },
                                *span,
                            );
                        }
                    }
                    None => {}
                }
            }
        }
    }

    /// Store the inferred value of a field both in the container scope and
    /// in the declared container.
    fn refine_field(&mut self, owner: &DeclRef, kind: NamedKind, name: &str, value: Value) {
        let scope = self.scopes().current_id();
        if let Some(variable) = self.scopes_mut().variable_mut(scope, name) {
            variable.value = value.clone();
        }
        let env = self.env_mut();
        let members = match kind {
            NamedKind::Class => env.classes.get_mut(&owner.name).map(|c| &mut c.members),
            NamedKind::Entity => env.entities.get_mut(&owner.name).map(|e| &mut e.members),
        };
        if let Some(field) = members.and_then(|m| m.field_mut(name)) {
            field.value = value;
        }
    }

    /// Report every field of the current container scope left unassigned.
    fn check_fields_initialized(&mut self, span: Span) {
        let mut missing: Vec<(String, Span)> = self
            .scopes()
            .current()
            .variables()
            .filter(|v| !v.is_init)
            .map(|v| (v.name.clone(), v.span))
            .collect();
        missing.sort_by_key(|(_, span)| *span);
        for (field, field_span) in missing {
            self.push_alert(
                Alert::new(AlertKind::UninitializedField { field }, field_span).with_span(span),
            );
        }
    }

    fn walk_methods(&mut self, methods: &mut [FunctionDecl], members: &Members) {
        for method in methods {
            let name = method.name.as_str();
            let sig = match members.method(name) {
                Some(sig) if members.method_span(name) == Some(method.name.span) => sig.clone(),
                _ => self.resolve_signature(&method.generics, &method.params, &method.returns),
            };
            self.walk_function_body(&sig, &method.params, &mut method.body, method.span);
        }
    }
}
