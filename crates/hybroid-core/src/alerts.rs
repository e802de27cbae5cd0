//! Recoverable diagnostics ("alerts") produced by the analyzer.
//!
//! Every problem found in user code is an [`AlertKind`] variant carrying its
//! own typed payload. An [`Alert`] attaches spans and an optional note, and
//! [`Diagnostics`] collects them in the order they were reported.
//!
//! ## Categories
//!
//! ```text
//! Structural     - redeclarations, entity contracts, environment setup, cycles
//! Environment    - cross-environment and library access rules
//! Type           - mismatches, arity, generics, containers
//! Control flow   - misplaced exits, missing returns, unreachable code
//! Accessibility  - private cross-environment access
//! ```
//!
//! No alert aborts analysis. Rendering (source snippets, colors) is left to
//! the consumer; [`Alert`]'s `Display` is a single plain line.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::{EnvKind, Span, Type};

// ============================================================================
// Alert kinds
// ============================================================================

/// Every diagnostic the analyzer can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlertKind {
    // Structural
    /// A name declared twice in the same scope.
    #[error("{what} '{name}' is already declared in this scope")]
    Redeclaration { name: String, what: &'static str },

    /// Two source files declare the same environment name.
    #[error("environment name '{name}' is already used by '{other_path}'")]
    DuplicateEnvironmentName { name: String, other_path: String },

    /// A second `env` statement in one file.
    #[error("the environment is already declared")]
    EnvironmentRedeclaration,

    /// The file does not start with an `env` statement.
    #[error("expected an environment declaration as the first statement")]
    MissingEnvironmentDeclaration,

    /// Unknown kind in `env Name as Kind`.
    #[error("'{kind}' is not an environment type")]
    InvalidEnvironmentType { kind: String },

    /// Two or more environments that depend on each other.
    #[error("import cycle detected: {}", cycle.join(" -> "))]
    ImportCycle { cycle: Vec<String> },

    /// An entity without a spawn or destroy function.
    #[error("entity '{entity}' is missing a {function} function")]
    MissingEntityFunction {
        entity: String,
        function: &'static str,
    },

    /// An entity with more than one function of a kind.
    #[error("entity '{entity}' has more than one {function} function")]
    MultipleEntityFunctions {
        entity: String,
        function: &'static str,
    },

    /// A lifecycle callback whose signature differs from the engine's.
    #[error("{function} function has signature {got}, expected {expected}")]
    EntityFunctionSignatureMismatch {
        function: &'static str,
        expected: Type,
        got: Type,
    },

    /// A spawner whose first two parameters are not fixed-point.
    #[error("the spawn function must start with two fixed parameters for the position")]
    SpawnerParameters,

    /// A spawn or destroy function declaring return types.
    #[error("the {function} function cannot return values")]
    LifecycleReturns { function: &'static str },

    /// A field never assigned by the end of the constructor or spawner.
    #[error("field '{field}' is not initialized")]
    UninitializedField { field: String },

    /// A class declared without `new`.
    #[error("class '{class}' has no constructor")]
    MissingConstructor { class: String },

    /// The same generic name listed twice.
    #[error("generic parameter '{name}' is declared more than once")]
    DuplicateGenericParameter { name: String },

    /// An enum without fields.
    #[error("enum '{name}' has no fields")]
    EmptyEnum { name: String },

    /// `pub` below the root scope.
    #[error("public declarations are only allowed at the root scope")]
    PublicDeclarationInLocalScope,

    /// A class, entity, enum or alias declared below the root scope.
    #[error("{what} declarations are only allowed at the root scope")]
    DeclarationInLocalScope { what: &'static str },

    // Environment access
    /// Reference to an environment that does not exist.
    #[error("environment '{name}' does not exist")]
    InvalidEnvironment { name: String },

    /// A name that the target environment does not declare.
    #[error("'{name}' does not exist in environment '{env}'")]
    InvalidEnvironmentAccess { env: String, name: String },

    /// Access forbidden by the environment kinds.
    #[error("a {from} environment cannot access the {to} environment '{target}'")]
    UnallowedEnvironmentAccess {
        from: EnvKind,
        to: EnvKind,
        target: String,
    },

    /// A library forbidden for the environment kind.
    #[error("the {library} library cannot be used in a {kind} environment")]
    UnallowedLibraryUse { library: String, kind: EnvKind },

    /// A type name declared by more than one imported environment.
    #[error("'{name}' is declared in both '{first}' and '{second}'")]
    EnvironmentAccessAmbiguity {
        name: String,
        first: String,
        second: String,
    },

    // Type
    /// The same key or field listed twice.
    #[error("duplicate element '{name}'")]
    DuplicateElement { name: String },

    /// A value of the wrong type.
    #[error("expected {expected} in {context}, got {got}")]
    TypeMismatch {
        expected: Type,
        got: Type,
        context: &'static str,
    },

    /// Binary operands that cannot be combined.
    #[error("operator '{op}' cannot combine {left} and {right}")]
    TypesMismatch {
        op: &'static str,
        left: Type,
        right: Type,
    },

    /// An operand of the wrong category for its operator.
    #[error("operator '{op}' expects {expected}, got {got}")]
    InvalidOperand {
        op: &'static str,
        expected: &'static str,
        got: Type,
    },

    /// A value that does not match the declared type of a variable.
    #[error("'{name}' is declared as {expected} but given {got}")]
    ExplicitTypeMismatch {
        name: String,
        expected: Type,
        got: Type,
    },

    /// A declaration with neither type nor value.
    #[error("'{name}' needs an explicit type or a value")]
    ExplicitTypeRequiredInDeclaration { name: String },

    /// A declared type that has no default value.
    #[error("type {ty} has no default value, give '{name}' an initial value")]
    ExplicitTypeNotAllowed { name: String, ty: Type },

    /// A type on a constant, which is always inferred.
    #[error("constants take the type of their value")]
    UnnecessaryTypeInConstDeclaration,

    /// A constant without a value.
    #[error("constant '{name}' needs a value")]
    NoValueGivenForConstant { name: String },

    /// A call argument of the wrong type.
    #[error("argument {position} expects {expected}, got {got}")]
    InvalidArgumentType {
        position: usize,
        expected: Type,
        got: Type,
    },

    /// Fewer values than slots.
    #[error("too few values in {context}: expected {expected}, got {got}")]
    TooFewValuesGiven {
        expected: usize,
        got: usize,
        context: &'static str,
    },

    /// More values than slots.
    #[error("too many values in {context}: expected {expected}, got {got}")]
    TooManyValuesGiven {
        expected: usize,
        got: usize,
        context: &'static str,
    },

    /// Wrapped types on a type that takes none.
    #[error("type '{name}' does not take wrapped types")]
    TooManyElementsGiven { name: String },

    /// A call on something that is not a function.
    #[error("a value of type {ty} cannot be called")]
    InvalidCallerType { ty: Type },

    /// Field access on something without fields.
    #[error("a value of type {ty} has no fields")]
    InvalidAccessValue { ty: Type },

    /// `xs.field` on a list or map.
    #[error("'{field}' cannot be accessed with '.' on a list or map, use brackets")]
    FieldAccessOnListOrMap { field: String },

    /// `value[index]` on something that is not a list or map.
    #[error("a value of type {ty} cannot be indexed")]
    MemberAccessOnNonListOrMap { ty: Type },

    /// A field or method that does not exist.
    #[error("'{owner}' has no field or method '{field}'")]
    InvalidField { owner: String, field: String },

    /// An index of the wrong type.
    #[error("{container} index must be {expected}, got {got}")]
    InvalidMemberIndex {
        container: &'static str,
        expected: Type,
        got: Type,
    },

    /// A literal list index below 1.
    #[error("list index {index} is out of bounds, lists start at 1")]
    ListIndexOutOfBounds { index: f64 },

    /// A literal list index with a fractional part.
    #[error("list index {index} is not a whole number")]
    InvalidListIndex { index: f64 },

    /// An empty container literal with no declared type.
    #[error("the contents of an empty list or map cannot be inferred")]
    UnknownListOrMapContents,

    /// A container literal with elements of different types.
    #[error("list or map elements must share one type: expected {expected}, got {got}")]
    MixedMapOrListContents { expected: Type, got: Type },

    /// `list`/`map` without exactly one wrapped type.
    #[error("list and map take exactly one wrapped type, got {count}")]
    InvalidListOrMapWrappedType { count: usize },

    /// A type name that resolves to nothing.
    #[error("unknown type '{name}'")]
    InvalidType { name: String },

    /// A type that cannot be built with `new` or `spawn`.
    #[error("'{name}' cannot be created with '{keyword}'")]
    NotConstructible { name: String, keyword: &'static str },

    /// A generic parameter left unbound after inference.
    #[error("generic parameter '{name}' could not be inferred")]
    UnresolvedGeneric { name: String },

    /// A match arm whose pattern type differs from the subject.
    #[error("case of type {got} cannot match a value of type {expected}")]
    InvalidCaseType { expected: Type, got: Type },

    /// Assignment to a constant.
    #[error("cannot assign to constant '{name}'")]
    ConstAssignment { name: String },

    /// Reference to a name that resolves to nothing.
    #[error("'{name}' is not declared")]
    UndeclaredVariableAccess { name: String },

    /// `self` outside of a class or entity body.
    #[error("'self' is not available here")]
    InvalidUseOfSelf,

    /// An entity narrowing binding under `or`.
    #[error("entity conversions cannot be bound under an 'or' condition")]
    EntityConversionWithOrCondition,

    /// An entity narrowing binding against an engine entity.
    #[error("'{entity}' is an engine entity and cannot be bound to a name")]
    OfficialEntityConversion { entity: String },

    // Control flow
    /// An exit statement where it is not permitted.
    #[error("'{statement}' cannot be used here")]
    InvalidUseOfExitStatement { statement: &'static str },

    /// A body that does not exit on every path.
    #[error("not all code paths {exit}")]
    NotAllCodePathsExit { exit: &'static str },

    /// Statements after a guaranteed exit.
    #[error("unreachable code")]
    UnreachableCode,

    /// A match expression without an `else` arm.
    #[error("match expressions need an 'else' arm")]
    DefaultCaseMissing,

    /// An `else` arm that is not last.
    #[error("the 'else' arm must be the last arm")]
    InvalidDefaultCasePlacement,

    /// A match with too few arms to be useful.
    #[error("a match needs at least one case besides 'else'")]
    InsufficientCases,

    // Accessibility
    /// Private name reached from another environment.
    #[error("'{name}' is not public in environment '{env}'")]
    ForeignLocalVariableAccess { name: String, env: String },
}

/// Stable identifier of an [`AlertKind`], rendered as `HYB###`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum AlertCode {
    Redeclaration = 1,
    DuplicateEnvironmentName = 2,
    EnvironmentRedeclaration = 3,
    MissingEnvironmentDeclaration = 4,
    InvalidEnvironmentType = 5,
    ImportCycle = 6,
    MissingEntityFunction = 7,
    MultipleEntityFunctions = 8,
    EntityFunctionSignatureMismatch = 9,
    SpawnerParameters = 10,
    LifecycleReturns = 11,
    UninitializedField = 12,
    MissingConstructor = 13,
    DuplicateGenericParameter = 14,
    EmptyEnum = 15,
    PublicDeclarationInLocalScope = 16,
    DeclarationInLocalScope = 17,

    InvalidEnvironment = 30,
    InvalidEnvironmentAccess = 31,
    UnallowedEnvironmentAccess = 32,
    UnallowedLibraryUse = 33,
    EnvironmentAccessAmbiguity = 34,

    DuplicateElement = 50,
    TypeMismatch = 51,
    TypesMismatch = 52,
    InvalidOperand = 53,
    ExplicitTypeMismatch = 54,
    ExplicitTypeRequiredInDeclaration = 55,
    ExplicitTypeNotAllowed = 56,
    UnnecessaryTypeInConstDeclaration = 57,
    NoValueGivenForConstant = 58,
    InvalidArgumentType = 59,
    TooFewValuesGiven = 60,
    TooManyValuesGiven = 61,
    TooManyElementsGiven = 62,
    InvalidCallerType = 63,
    InvalidAccessValue = 64,
    FieldAccessOnListOrMap = 65,
    MemberAccessOnNonListOrMap = 66,
    InvalidField = 67,
    InvalidMemberIndex = 68,
    ListIndexOutOfBounds = 69,
    InvalidListIndex = 70,
    UnknownListOrMapContents = 71,
    MixedMapOrListContents = 72,
    InvalidListOrMapWrappedType = 73,
    InvalidType = 74,
    NotConstructible = 75,
    UnresolvedGeneric = 76,
    InvalidCaseType = 77,
    ConstAssignment = 78,
    UndeclaredVariableAccess = 79,
    InvalidUseOfSelf = 80,
    EntityConversionWithOrCondition = 81,
    OfficialEntityConversion = 82,

    InvalidUseOfExitStatement = 100,
    NotAllCodePathsExit = 101,
    UnreachableCode = 102,
    DefaultCaseMissing = 103,
    InvalidDefaultCasePlacement = 104,
    InsufficientCases = 105,

    ForeignLocalVariableAccess = 120,
}

impl fmt::Display for AlertCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HYB{:03}", u16::from(*self))
    }
}

/// How serious an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The program is invalid.
    Error,
    /// The program is valid but probably not what was meant.
    Warning,
}

/// Broad grouping of alert kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Structural,
    Environment,
    Type,
    ControlFlow,
    Accessibility,
}

impl AlertKind {
    /// The stable code of this kind.
    pub fn code(&self) -> AlertCode {
        use AlertKind as K;
        match self {
            K::Redeclaration { .. } => AlertCode::Redeclaration,
            K::DuplicateEnvironmentName { .. } => AlertCode::DuplicateEnvironmentName,
            K::EnvironmentRedeclaration => AlertCode::EnvironmentRedeclaration,
            K::MissingEnvironmentDeclaration => AlertCode::MissingEnvironmentDeclaration,
            K::InvalidEnvironmentType { .. } => AlertCode::InvalidEnvironmentType,
            K::ImportCycle { .. } => AlertCode::ImportCycle,
            K::MissingEntityFunction { .. } => AlertCode::MissingEntityFunction,
            K::MultipleEntityFunctions { .. } => AlertCode::MultipleEntityFunctions,
            K::EntityFunctionSignatureMismatch { .. } => {
                AlertCode::EntityFunctionSignatureMismatch
            }
            K::SpawnerParameters => AlertCode::SpawnerParameters,
            K::LifecycleReturns { .. } => AlertCode::LifecycleReturns,
            K::UninitializedField { .. } => AlertCode::UninitializedField,
            K::MissingConstructor { .. } => AlertCode::MissingConstructor,
            K::DuplicateGenericParameter { .. } => AlertCode::DuplicateGenericParameter,
            K::EmptyEnum { .. } => AlertCode::EmptyEnum,
            K::PublicDeclarationInLocalScope => AlertCode::PublicDeclarationInLocalScope,
            K::DeclarationInLocalScope { .. } => AlertCode::DeclarationInLocalScope,
            K::InvalidEnvironment { .. } => AlertCode::InvalidEnvironment,
            K::InvalidEnvironmentAccess { .. } => AlertCode::InvalidEnvironmentAccess,
            K::UnallowedEnvironmentAccess { .. } => AlertCode::UnallowedEnvironmentAccess,
            K::UnallowedLibraryUse { .. } => AlertCode::UnallowedLibraryUse,
            K::EnvironmentAccessAmbiguity { .. } => AlertCode::EnvironmentAccessAmbiguity,
            K::DuplicateElement { .. } => AlertCode::DuplicateElement,
            K::TypeMismatch { .. } => AlertCode::TypeMismatch,
            K::TypesMismatch { .. } => AlertCode::TypesMismatch,
            K::InvalidOperand { .. } => AlertCode::InvalidOperand,
            K::ExplicitTypeMismatch { .. } => AlertCode::ExplicitTypeMismatch,
            K::ExplicitTypeRequiredInDeclaration { .. } => {
                AlertCode::ExplicitTypeRequiredInDeclaration
            }
            K::ExplicitTypeNotAllowed { .. } => AlertCode::ExplicitTypeNotAllowed,
            K::UnnecessaryTypeInConstDeclaration => AlertCode::UnnecessaryTypeInConstDeclaration,
            K::NoValueGivenForConstant { .. } => AlertCode::NoValueGivenForConstant,
            K::InvalidArgumentType { .. } => AlertCode::InvalidArgumentType,
            K::TooFewValuesGiven { .. } => AlertCode::TooFewValuesGiven,
            K::TooManyValuesGiven { .. } => AlertCode::TooManyValuesGiven,
            K::TooManyElementsGiven { .. } => AlertCode::TooManyElementsGiven,
            K::InvalidCallerType { .. } => AlertCode::InvalidCallerType,
            K::InvalidAccessValue { .. } => AlertCode::InvalidAccessValue,
            K::FieldAccessOnListOrMap { .. } => AlertCode::FieldAccessOnListOrMap,
            K::MemberAccessOnNonListOrMap { .. } => AlertCode::MemberAccessOnNonListOrMap,
            K::InvalidField { .. } => AlertCode::InvalidField,
            K::InvalidMemberIndex { .. } => AlertCode::InvalidMemberIndex,
            K::ListIndexOutOfBounds { .. } => AlertCode::ListIndexOutOfBounds,
            K::InvalidListIndex { .. } => AlertCode::InvalidListIndex,
            K::UnknownListOrMapContents => AlertCode::UnknownListOrMapContents,
            K::MixedMapOrListContents { .. } => AlertCode::MixedMapOrListContents,
            K::InvalidListOrMapWrappedType { .. } => AlertCode::InvalidListOrMapWrappedType,
            K::InvalidType { .. } => AlertCode::InvalidType,
            K::NotConstructible { .. } => AlertCode::NotConstructible,
            K::UnresolvedGeneric { .. } => AlertCode::UnresolvedGeneric,
            K::InvalidCaseType { .. } => AlertCode::InvalidCaseType,
            K::ConstAssignment { .. } => AlertCode::ConstAssignment,
            K::UndeclaredVariableAccess { .. } => AlertCode::UndeclaredVariableAccess,
            K::InvalidUseOfSelf => AlertCode::InvalidUseOfSelf,
            K::EntityConversionWithOrCondition => AlertCode::EntityConversionWithOrCondition,
            K::OfficialEntityConversion { .. } => AlertCode::OfficialEntityConversion,
            K::InvalidUseOfExitStatement { .. } => AlertCode::InvalidUseOfExitStatement,
            K::NotAllCodePathsExit { .. } => AlertCode::NotAllCodePathsExit,
            K::UnreachableCode => AlertCode::UnreachableCode,
            K::DefaultCaseMissing => AlertCode::DefaultCaseMissing,
            K::InvalidDefaultCasePlacement => AlertCode::InvalidDefaultCasePlacement,
            K::InsufficientCases => AlertCode::InsufficientCases,
            K::ForeignLocalVariableAccess { .. } => AlertCode::ForeignLocalVariableAccess,
        }
    }

    /// Severity of this kind. Only unreachable code is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::UnreachableCode => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Broad grouping, derived from the code ranges.
    pub fn category(&self) -> Category {
        match u16::from(self.code()) {
            0..30 => Category::Structural,
            30..50 => Category::Environment,
            50..100 => Category::Type,
            100..120 => Category::ControlFlow,
            _ => Category::Accessibility,
        }
    }
}

// ============================================================================
// Alert
// ============================================================================

/// A reported problem with its source positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// What went wrong.
    pub kind: AlertKind,
    /// Source positions, primary first. Never empty.
    pub spans: Vec<Span>,
    /// Optional remediation hint.
    pub note: Option<String>,
}

impl Alert {
    /// Create an alert pointing at one span.
    pub fn new(kind: AlertKind, span: Span) -> Self {
        Self {
            kind,
            spans: vec![span],
            note: None,
        }
    }

    /// Attach a secondary span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    /// Attach a remediation note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The primary span.
    pub fn span(&self) -> Span {
        self.spans.first().copied().unwrap_or_default()
    }

    /// Stable code.
    pub fn code(&self) -> AlertCode {
        self.kind.code()
    }

    /// Severity.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Whether this alert is an error.
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {level}[{}]: {}", self.span(), self.code(), self.kind)?;
        if let Some(note) = &self.note {
            write!(f, " (note: {note})")?;
        }
        Ok(())
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Ordered collection of alerts for one environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    alerts: Vec<Alert>,
    error_count: usize,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert.
    pub fn push(&mut self, alert: Alert) {
        if alert.is_error() {
            self.error_count += 1;
        }
        self.alerts.push(alert);
    }

    /// Append an alert built from a kind and a span.
    pub fn report(&mut self, kind: AlertKind, span: Span) {
        self.push(Alert::new(kind, span));
    }

    /// Move every alert of `other` into this collection.
    pub fn append(&mut self, other: Diagnostics) {
        for alert in other.alerts {
            self.push(alert);
        }
    }

    /// Whether any error was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Whether any warning was reported.
    pub fn has_warnings(&self) -> bool {
        self.alerts.len() > self.error_count
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.alerts.len() - self.error_count
    }

    /// Total number of alerts.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Iterate in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Alert> {
        self.alerts.iter()
    }

    /// Only the errors.
    pub fn errors(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.is_error())
    }

    /// Only the warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.is_error())
    }

    /// Codes in report order.
    pub fn codes(&self) -> Vec<AlertCode> {
        self.alerts.iter().map(Alert::code).collect()
    }

    /// Number of alerts with the given code.
    pub fn count(&self, code: AlertCode) -> usize {
        self.alerts.iter().filter(|a| a.code() == code).count()
    }

    /// The alerts as a slice.
    pub fn as_slice(&self) -> &[Alert] {
        &self.alerts
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Alert;
    type IntoIter = std::slice::Iter<'a, Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.alerts.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for alert in &self.alerts {
            writeln!(f, "{alert}")?;
        }
        Ok(())
    }
}
