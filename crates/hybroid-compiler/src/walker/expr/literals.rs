//! Literals and container literals.

use hybroid_ast::{ListExpr, LiteralExpr, LiteralKind, MapExpr};
use hybroid_core::{AlertKind, Type, WrapperKind};
use rustc_hash::FxHashSet;

use super::Walker;
use crate::values::Value;

/// Parse the source text of a number literal.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let clean = text.replace('_', "");
    if let Some(hex) = clean
        .strip_prefix("0x")
        .or_else(|| clean.strip_prefix("0X"))
    {
        return i64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    if let Some(bin) = clean
        .strip_prefix("0b")
        .or_else(|| clean.strip_prefix("0B"))
    {
        return i64::from_str_radix(bin, 2).ok().map(|n| n as f64);
    }
    clean.parse().ok()
}

impl<'s> Walker<'s> {
    pub(crate) fn walk_literal(&mut self, lit: &LiteralExpr) -> Value {
        match lit.kind {
            LiteralKind::Number => match parse_number(&lit.value) {
                Some(n) => Value::number_literal(n),
                None => Value::NUMBER,
            },
            LiteralKind::Fixed(kind) => Value::Fixed(kind),
            LiteralKind::Text => Value::Text,
            LiteralKind::Bool => Value::Bool,
            LiteralKind::Nil => Value::Unknown,
        }
    }

    /// `{a, b, c}`
    pub(crate) fn walk_list(&mut self, list: &mut ListExpr, hint: Option<&Type>) -> Value {
        let hinted = element_hint(hint, WrapperKind::List);
        if list.elems.is_empty() {
            return match hinted {
                Some(elem) => Value::List(elem),
                None => {
                    self.report(AlertKind::UnknownListOrMapContents, list.span);
                    Value::List(Type::Invalid)
                }
            };
        }

        let mut reference = hinted;
        for elem in &mut list.elems {
            let value = self.walk_single(elem, reference.as_ref());
            let got = value.ty();
            match &reference {
                None => reference = Some(got),
                Some(expected) if *expected != got => self.report(
                    AlertKind::MixedMapOrListContents {
                        expected: expected.clone(),
                        got,
                    },
                    elem.span(),
                ),
                Some(_) => {}
            }
        }
        Value::List(reference.unwrap_or(Type::Invalid))
    }

    /// `{a = 1, b = 2}`
    pub(crate) fn walk_map(&mut self, map: &mut MapExpr, hint: Option<&Type>) -> Value {
        let hinted = element_hint(hint, WrapperKind::Map);
        if map.entries.is_empty() {
            return match hinted {
                Some(elem) => Value::Map(elem),
                None => {
                    self.report(AlertKind::UnknownListOrMapContents, map.span);
                    Value::Map(Type::Invalid)
                }
            };
        }

        let mut keys = FxHashSet::default();
        let mut reference = hinted;
        for entry in &mut map.entries {
            if !keys.insert(entry.key.name.clone()) {
                self.report(
                    AlertKind::DuplicateElement {
                        name: entry.key.name.clone(),
                    },
                    entry.key.span,
                );
            }
            let value = self.walk_single(&mut entry.value, reference.as_ref());
            let got = value.ty();
            match &reference {
                None => reference = Some(got),
                Some(expected) if *expected != got => self.report(
                    AlertKind::MixedMapOrListContents {
                        expected: expected.clone(),
                        got,
                    },
                    entry.value.span(),
                ),
                Some(_) => {}
            }
        }
        Value::Map(reference.unwrap_or(Type::Invalid))
    }
}

fn element_hint(hint: Option<&Type>, kind: WrapperKind) -> Option<Type> {
    match hint?.wrapped()? {
        (k, elem) if k == kind => Some(elem.clone()),
        _ => None,
    }
}
