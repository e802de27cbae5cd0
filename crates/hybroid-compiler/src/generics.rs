//! Generic parameter resolution and argument validation.
//!
//! A call of a generic function binds each declared generic either from an
//! explicit generic argument or, failing that, from the first argument whose
//! declared parameter mentions it. Binding walks both types in lockstep
//! through list/map nesting, variadics and function signatures, so
//! `list<T>` against `list<number>` binds `T = number`.
//!
//! Nothing here is fatal: unbound generics become [`Type::Invalid`] so the
//! rest of the call still gets checked.

use hybroid_core::{Alert, AlertKind, Span, Type};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Generic name to concrete type.
pub type Bindings = FxHashMap<String, Type>;

/// Failure to resolve the generic arguments of a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenericError {
    /// More explicit generic arguments than declared generics.
    #[error("expected at most {expected} generic arguments, got {got}")]
    TooMany { expected: usize, got: usize },
}

/// The declared parameter an argument at `index` is checked against.
///
/// Arguments past a trailing variadic all match its element type.
fn param_for(params: &[Type], index: usize) -> Option<&Type> {
    let last = params.len().checked_sub(1)?;
    match &params[last] {
        Type::Variadic(elem) if index >= last => Some(elem),
        _ => params.get(index),
    }
}

/// Bind `name` by matching the declared `param` against the actual `arg`.
pub fn infer(name: &str, param: &Type, arg: &Type) -> Option<Type> {
    match (param, arg) {
        (_, Type::Invalid) => None,
        (Type::Generic(g), _) if g == name => Some(arg.clone()),
        (Type::Wrapper { kind, elem }, Type::Wrapper { kind: k2, elem: e2 }) if kind == k2 => {
            infer(name, elem, e2)
        }
        (Type::Variadic(elem), Type::Variadic(e2)) => infer(name, elem, e2),
        (Type::Variadic(elem), _) => infer(name, elem, arg),
        (
            Type::Function {
                params, returns, ..
            },
            Type::Function {
                params: p2,
                returns: r2,
                ..
            },
        ) => params
            .iter()
            .zip(p2)
            .chain(returns.iter().zip(r2))
            .find_map(|(p, a)| infer(name, p, a)),
        _ => None,
    }
}

/// Bind the declared generics of a call.
///
/// `explicit` are the generic arguments written at the call site, bound in
/// order; the rest are inferred from `args`. Generics that cannot be bound
/// are left out of the result.
pub fn resolve_generics(
    explicit: &[Type],
    declared: &[String],
    params: &[Type],
    args: &[Type],
) -> Result<Bindings, GenericError> {
    if explicit.len() > declared.len() {
        return Err(GenericError::TooMany {
            expected: declared.len(),
            got: explicit.len(),
        });
    }

    let mut bindings = Bindings::default();
    for (name, ty) in declared.iter().zip(explicit) {
        bindings.insert(name.clone(), ty.clone());
    }

    for name in &declared[explicit.len()..] {
        let source = args.iter().enumerate().find_map(|(index, arg)| {
            let param = param_for(params, index)?;
            param.contains_generic(name).then_some((param, arg))
        });
        if let Some((param, arg)) = source
            && let Some(bound) = infer(name, param, arg)
        {
            bindings.insert(name.clone(), bound);
        }
    }

    Ok(bindings)
}

/// Replace every bound generic in `ty`.
pub fn substitute(ty: &Type, bindings: &Bindings) -> Type {
    match ty {
        Type::Generic(name) => bindings.get(name).cloned().unwrap_or_else(|| ty.clone()),
        Type::Wrapper { kind, elem } => Type::Wrapper {
            kind: *kind,
            elem: Box::new(substitute(elem, bindings)),
        },
        Type::Variadic(elem) => Type::Variadic(Box::new(substitute(elem, bindings))),
        Type::Function {
            params,
            returns,
            generics,
        } => Type::Function {
            params: params.iter().map(|p| substitute(p, bindings)).collect(),
            returns: returns.iter().map(|r| substitute(r, bindings)).collect(),
            generics: generics
                .iter()
                .filter(|g| !bindings.contains_key(*g))
                .cloned()
                .collect(),
        },
        other => other.clone(),
    }
}

/// Bind every declared generic that is still unbound to [`Type::Invalid`],
/// returning the names that had to be filled.
pub fn fill_unbound(declared: &[String], bindings: &mut Bindings) -> Vec<String> {
    let mut missing = Vec::new();
    for name in declared {
        if !bindings.contains_key(name) {
            bindings.insert(name.clone(), Type::Invalid);
            missing.push(name.clone());
        }
    }
    missing
}

/// Check `args` against `params`, reporting one alert per mismatching
/// argument and a single alert for a missing or surplus run.
pub fn validate_arguments(params: &[Type], args: &[(Type, Span)], call: Span) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let variadic = matches!(params.last(), Some(Type::Variadic(_)));
    let required = if variadic {
        params.len() - 1
    } else {
        params.len()
    };

    if args.len() < required {
        let span = args.last().map_or(call, |(_, span)| *span);
        alerts.push(Alert::new(
            AlertKind::TooFewValuesGiven {
                expected: required,
                got: args.len(),
                context: "arguments",
            },
            span,
        ));
    }

    if !variadic && args.len() > required {
        let first = args[required].1;
        let last = args[args.len() - 1].1;
        alerts.push(Alert::new(
            AlertKind::TooManyValuesGiven {
                expected: required,
                got: args.len(),
                context: "arguments",
            },
            first.to(last),
        ));
    }

    for (index, (arg, span)) in args.iter().enumerate() {
        let Some(param) = param_for(params, index) else {
            break;
        };
        if *param != *arg {
            alerts.push(Alert::new(
                AlertKind::InvalidArgumentType {
                    position: index + 1,
                    expected: param.clone(),
                    got: arg.clone(),
                },
                *span,
            ));
        }
    }

    alerts
}
