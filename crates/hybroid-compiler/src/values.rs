//! Analysis-time values.
//!
//! A [`Value`] mirrors a [`Type`] with the extra facts the walker needs:
//! literal numbers for index checks, method owners for call rewriting, and
//! tuples for calls that produce several values. Values of expressions are
//! created and dropped per expression; declared classes, entities and enums
//! live in their environment for the whole session.

use hybroid_ast::{EntityFunctionKind, Expr, FunctionExpr, ListExpr, LiteralExpr, MapExpr};
use hybroid_core::{EnvId, FixedKind, NamedKind, Primitive, Span, Type, WrapperKind};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

// ============================================================================
// Value
// ============================================================================

/// Handle to a declared class, entity or enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclRef {
    /// Declaring environment
    pub env: EnvId,
    /// Declared name
    pub name: String,
}

impl DeclRef {
    /// Create a handle.
    pub fn new(env: EnvId, name: impl Into<String>) -> Self {
        Self {
            env,
            name: name.into(),
        }
    }
}

/// A number, with its value when it is known at analysis time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberVal {
    /// Literal value, if folded from source
    pub literal: Option<OrderedFloat<f64>>,
}

/// A class or entity a method was looked up on.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodOwner {
    /// Owner type
    pub ty: DeclRef,
    /// Class or entity
    pub kind: NamedKind,
}

/// A callable signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionVal {
    /// Generic parameter names
    pub generics: Vec<String>,
    /// Parameter types
    pub params: Vec<Type>,
    /// Return types
    pub returns: Vec<Type>,
    /// Set when the function was reached as a method
    pub owner: Option<MethodOwner>,
}

impl FunctionVal {
    /// A non-generic signature.
    pub fn new(params: Vec<Type>, returns: Vec<Type>) -> Self {
        Self {
            params,
            returns,
            ..Self::default()
        }
    }

    /// A generic signature.
    pub fn generic(generics: &[&str], params: Vec<Type>, returns: Vec<Type>) -> Self {
        Self {
            generics: generics.iter().map(|g| g.to_string()).collect(),
            params,
            returns,
            owner: None,
        }
    }

    /// The signature as a type.
    pub fn ty(&self) -> Type {
        Type::Function {
            params: self.params.clone(),
            returns: self.returns.clone(),
            generics: self.generics.clone(),
        }
    }

    /// The same signature reached through `owner`.
    pub fn with_owner(mut self, ty: DeclRef, kind: NamedKind) -> Self {
        self.owner = Some(MethodOwner { ty, kind });
        self
    }
}

/// The value of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `number`
    Number(NumberVal),
    /// `fixed`, `radian`, `degree`
    Fixed(FixedKind),
    /// `bool`
    Bool,
    /// `text`
    Text,
    /// A function
    Function(FunctionVal),
    /// `list<T>`
    List(Type),
    /// `map<T>`
    Map(Type),
    /// Instance of a class
    Class(DeclRef),
    /// Instance of an entity
    Entity(DeclRef),
    /// Some entity
    RawEntity,
    /// An enum itself, as in `Color` of `Color.Red`
    Enum(DeclRef),
    /// One field of an enum
    EnumField(DeclRef),
    /// Value of a generic parameter
    Generic(String),
    /// Several values produced by one call or match
    Tuple(Vec<Value>),
    /// Error sentinel
    Invalid,
    /// Anything (library `object` parameters)
    Unknown,
}

impl Value {
    /// A number with no known value.
    pub const NUMBER: Value = Value::Number(NumberVal { literal: None });

    /// A number known at analysis time.
    pub fn number_literal(value: f64) -> Value {
        Value::Number(NumberVal {
            literal: Some(OrderedFloat(value)),
        })
    }

    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Number(_) => Type::NUMBER,
            Value::Fixed(kind) => Type::Fixed(*kind),
            Value::Bool => Type::BOOL,
            Value::Text => Type::TEXT,
            Value::Function(f) => f.ty(),
            Value::List(elem) => Type::list(elem.clone()),
            Value::Map(elem) => Type::map(elem.clone()),
            Value::Class(r) => Type::Named {
                env: r.env,
                name: r.name.clone(),
                kind: NamedKind::Class,
            },
            Value::Entity(r) => Type::Named {
                env: r.env,
                name: r.name.clone(),
                kind: NamedKind::Entity,
            },
            Value::RawEntity => Type::RawEntity,
            Value::Enum(r) | Value::EnumField(r) => Type::Enum {
                env: r.env,
                name: r.name.clone(),
            },
            Value::Generic(name) => Type::Generic(name.clone()),
            Value::Tuple(values) => values.first().map_or(Type::Invalid, Value::ty),
            Value::Invalid => Type::Invalid,
            Value::Unknown => Type::Object,
        }
    }

    /// Whether this is the error sentinel.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }

    /// The first value of a tuple, or the value itself.
    pub fn single(self) -> Value {
        match self {
            Value::Tuple(values) => values.into_iter().next().unwrap_or(Value::Invalid),
            other => other,
        }
    }

    /// Every value a tuple carries, or the value itself.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Value::Tuple(values) => values,
            other => vec![other],
        }
    }

    /// Wrap several values, collapsing a single one.
    pub fn from_values(mut values: Vec<Value>) -> Value {
        if values.len() == 1 {
            values.pop().unwrap_or(Value::Invalid)
        } else {
            Value::Tuple(values)
        }
    }

    /// The literal value of a folded number.
    pub fn literal_number(&self) -> Option<f64> {
        match self {
            Value::Number(NumberVal { literal: Some(n) }) => Some(n.into_inner()),
            _ => None,
        }
    }
}

// ============================================================================
// Type to value
// ============================================================================

/// Build the value a variable of type `ty` holds before anything is known.
///
/// Generics and invalid types degrade to `Generic`/`Invalid` instead of failing.
pub fn to_value(ty: &Type) -> Value {
    match ty {
        Type::Basic(Primitive::Number) => Value::NUMBER,
        Type::Basic(Primitive::Text) => Value::Text,
        Type::Basic(Primitive::Bool) => Value::Bool,
        Type::Fixed(kind) => Value::Fixed(*kind),
        Type::Named {
            env,
            name,
            kind: NamedKind::Class,
        } => Value::Class(DeclRef::new(*env, name.clone())),
        Type::Named {
            env,
            name,
            kind: NamedKind::Entity,
        } => Value::Entity(DeclRef::new(*env, name.clone())),
        Type::Enum { env, name } => Value::EnumField(DeclRef::new(*env, name.clone())),
        Type::Function {
            params,
            returns,
            generics,
        } => Value::Function(FunctionVal {
            generics: generics.clone(),
            params: params.clone(),
            returns: returns.clone(),
            owner: None,
        }),
        Type::Wrapper {
            kind: WrapperKind::List,
            elem,
        } => Value::List((**elem).clone()),
        Type::Wrapper {
            kind: WrapperKind::Map,
            elem,
        } => Value::Map((**elem).clone()),
        Type::Variadic(elem) => Value::List((**elem).clone()),
        Type::Generic(name) => Value::Generic(name.clone()),
        Type::RawEntity => Value::RawEntity,
        Type::Object => Value::Unknown,
        Type::Invalid => Value::Invalid,
    }
}

/// The literal a typed declaration without a value is initialized with.
///
/// `None` means the type has no sensible default (classes, entities, enums,
/// generics) and the declaration must be given a value.
pub fn default_literal(ty: &Type, span: Span) -> Option<Expr> {
    let expr = match ty {
        Type::Basic(Primitive::Number) => Expr::Literal(LiteralExpr::number("0", span)),
        Type::Basic(Primitive::Text) => Expr::Literal(LiteralExpr::text("\"\"", span)),
        Type::Basic(Primitive::Bool) => Expr::Literal(LiteralExpr::bool(false, span)),
        Type::Fixed(kind) => Expr::Literal(LiteralExpr::fixed(
            *kind,
            format!("0{}", kind.suffix()),
            span,
        )),
        Type::Wrapper {
            kind: WrapperKind::List,
            ..
        } => Expr::List(ListExpr {
            elems: Vec::new(),
            span,
        }),
        Type::Wrapper {
            kind: WrapperKind::Map,
            ..
        } => Expr::Map(MapExpr {
            entries: Vec::new(),
            span,
        }),
        Type::Function { .. } => Expr::Function(Box::new(FunctionExpr {
            params: Vec::new(),
            returns: Vec::new(),
            body: Vec::new(),
            span,
        })),
        _ => return None,
    };
    Some(expr)
}

// ============================================================================
// Declared values
// ============================================================================

/// A named binding in a scope, a class field or a library member.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableVal {
    /// Bound name
    pub name: String,
    /// Current value
    pub value: Value,
    /// Declaring position
    pub span: Span,
    /// `pub`
    pub is_pub: bool,
    /// `const`
    pub is_const: bool,
    /// Read at least once
    pub is_used: bool,
    /// Assigned a value
    pub is_init: bool,
    /// Literal to inline at every use of a constant
    pub constant: Option<LiteralExpr>,
}

impl VariableVal {
    /// An initialized, private, mutable binding.
    pub fn new(name: impl Into<String>, value: Value, span: Span) -> Self {
        Self {
            name: name.into(),
            value,
            span,
            is_pub: false,
            is_const: false,
            is_used: false,
            is_init: true,
            constant: None,
        }
    }

    /// Mark the binding public.
    pub fn public(mut self, is_pub: bool) -> Self {
        self.is_pub = is_pub;
        self
    }

    /// Mark the binding constant.
    pub fn constant(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    /// Set whether the binding holds a value yet.
    pub fn initialized(mut self, is_init: bool) -> Self {
        self.is_init = is_init;
        self
    }
}

/// Fields and methods shared by classes and entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    fields: Vec<VariableVal>,
    field_index: FxHashMap<String, usize>,
    methods: FxHashMap<String, FunctionVal>,
    method_spans: FxHashMap<String, Span>,
}

impl Members {
    /// Add a field. Returns the span of the existing member on a clash.
    pub fn add_field(&mut self, field: VariableVal) -> Result<(), Span> {
        if let Some(existing) = self.member_span(&field.name) {
            return Err(existing);
        }
        self.field_index
            .insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    /// Add a method. Returns the span of the existing member on a clash.
    pub fn add_method(&mut self, name: &str, method: FunctionVal, span: Span) -> Result<(), Span> {
        if let Some(existing) = self.member_span(name) {
            return Err(existing);
        }
        self.methods.insert(name.to_string(), method);
        self.method_spans.insert(name.to_string(), span);
        Ok(())
    }

    fn member_span(&self, name: &str) -> Option<Span> {
        self.field(name)
            .map(|(_, f)| f.span)
            .or_else(|| self.method_spans.get(name).copied())
    }

    /// A field by name with its declaration order.
    pub fn field(&self, name: &str) -> Option<(usize, &VariableVal)> {
        let index = *self.field_index.get(name)?;
        self.fields.get(index).map(|f| (index, f))
    }

    /// A field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut VariableVal> {
        let index = *self.field_index.get(name)?;
        self.fields.get_mut(index)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[VariableVal] {
        &self.fields
    }

    /// A method by name.
    pub fn method(&self, name: &str) -> Option<&FunctionVal> {
        self.methods.get(name)
    }

    /// Where a method was declared.
    pub fn method_span(&self, name: &str) -> Option<Span> {
        self.method_spans.get(name).copied()
    }

    /// Whether a method with this name exists.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Methods, unordered.
    pub fn methods(&self) -> impl Iterator<Item = (&String, &FunctionVal)> {
        self.methods.iter()
    }
}

/// A declared class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassVal {
    /// Handle of this class
    pub ty: DeclRef,
    /// Declaring position
    pub span: Span,
    /// `pub`
    pub is_pub: bool,
    /// Fields and methods
    pub members: Members,
    /// Constructor signature
    pub constructor: Option<FunctionVal>,
}

/// A declared entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityVal {
    /// Handle of this entity
    pub ty: DeclRef,
    /// Declaring position
    pub span: Span,
    /// `pub`
    pub is_pub: bool,
    /// Fields and methods
    pub members: Members,
    /// `spawn` signature
    pub spawner: Option<FunctionVal>,
    /// `destroy` signature
    pub destroyer: Option<FunctionVal>,
    /// Engine callbacks
    pub callbacks: FxHashMap<EntityFunctionKind, FunctionVal>,
}

/// A declared enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVal {
    /// Handle of this enum
    pub ty: DeclRef,
    /// Declaring position
    pub span: Span,
    /// `pub`
    pub is_pub: bool,
    /// Field names in declaration order
    pub fields: Vec<String>,
}

impl EnumVal {
    /// Position of a field, starting at 0.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}

/// A declared alias.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasVal {
    /// Aliased type
    pub ty: Type,
    /// Declaring position
    pub span: Span,
    /// `pub`
    pub is_pub: bool,
}
