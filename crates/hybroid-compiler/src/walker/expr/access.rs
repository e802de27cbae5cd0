//! `value.field` and `value[index]`.

use hybroid_ast::{Expr, FieldExpr, LiteralExpr, MemberExpr};
use hybroid_core::{AlertKind, CompileError, NamedKind, Type};

use super::{Rewrite, Walker};
use crate::values::{DeclRef, Value, to_value};

impl<'s> Walker<'s> {
    /// `value.field`
    pub(crate) fn walk_field(&mut self, field: &mut FieldExpr) -> (Value, Rewrite<Expr>) {
        let target = self.walk_single(&mut field.target, None);
        let name = field.field.as_str();

        match target {
            Value::Class(r) => (self.member_value(field, r, NamedKind::Class), Rewrite::Unchanged),
            Value::Entity(r) => (
                self.member_value(field, r, NamedKind::Entity),
                Rewrite::Unchanged,
            ),
            Value::Enum(r) => {
                let index = self.enum_val(&r).map(|e| e.field_index(name));
                match index {
                    Some(Some(i)) if !r.env.is_library() => {
                        let lit = LiteralExpr::number((i + 1).to_string(), field.span);
                        (Value::EnumField(r), Rewrite::Replace(Expr::Literal(lit)))
                    }
                    Some(Some(_)) => (Value::EnumField(r), Rewrite::Unchanged),
                    _ => {
                        self.report(
                            AlertKind::InvalidField {
                                owner: r.name,
                                field: name.to_string(),
                            },
                            field.field.span,
                        );
                        (Value::Invalid, Rewrite::Unchanged)
                    }
                }
            }
            Value::List(_) | Value::Map(_) => {
                self.report(
                    AlertKind::FieldAccessOnListOrMap {
                        field: name.to_string(),
                    },
                    field.field.span,
                );
                (Value::Invalid, Rewrite::Unchanged)
            }
            Value::Invalid => (Value::Invalid, Rewrite::Unchanged),
            other => {
                self.report(
                    AlertKind::InvalidAccessValue { ty: other.ty() },
                    field.target.span(),
                );
                (Value::Invalid, Rewrite::Unchanged)
            }
        }
    }

    /// A field or method of a class or entity instance.
    fn member_value(&mut self, field: &mut FieldExpr, owner: DeclRef, kind: NamedKind) -> Value {
        let members = match kind {
            NamedKind::Class => self.class(&owner).map(|c| &c.members),
            NamedKind::Entity => self.entity(&owner).map(|e| &e.members),
        };
        let Some(members) = members else {
            self.fail(CompileError::UnregisteredContainer {
                container: owner.name,
                member: field.field.name.clone(),
            });
            return Value::Invalid;
        };

        let name = field.field.as_str();
        if let Some((index, variable)) = members.field(name) {
            let value = variable.value.clone();
            field.index = Some(index);
            return value;
        }
        if let Some(method) = members.method(name) {
            return Value::Function(method.clone().with_owner(owner, kind));
        }

        self.report(
            AlertKind::InvalidField {
                owner: owner.name,
                field: name.to_string(),
            },
            field.field.span,
        );
        Value::Invalid
    }

    /// `value[index]`
    pub(crate) fn walk_member(&mut self, member: &mut MemberExpr) -> Value {
        let target = self.walk_single(&mut member.target, None);
        let index = self.walk_single(&mut member.index, None);
        let index_span = member.index.span();

        match target {
            Value::List(elem) => {
                let got = index.ty();
                if got != Type::NUMBER {
                    self.report(
                        AlertKind::InvalidMemberIndex {
                            container: "list",
                            expected: Type::NUMBER,
                            got,
                        },
                        index_span,
                    );
                } else if let Some(n) = index.literal_number() {
                    if n < 1.0 {
                        self.report(AlertKind::ListIndexOutOfBounds { index: n }, index_span);
                    } else if n.fract() != 0.0 {
                        self.report(AlertKind::InvalidListIndex { index: n }, index_span);
                    }
                }
                to_value(&elem)
            }
            Value::Map(elem) => {
                let got = index.ty();
                if got != Type::TEXT {
                    self.report(
                        AlertKind::InvalidMemberIndex {
                            container: "map",
                            expected: Type::TEXT,
                            got,
                        },
                        index_span,
                    );
                }
                to_value(&elem)
            }
            Value::Invalid => Value::Invalid,
            other => {
                self.report(
                    AlertKind::MemberAccessOnNonListOrMap { ty: other.ty() },
                    member.target.span(),
                );
                Value::Invalid
            }
        }
    }
}
