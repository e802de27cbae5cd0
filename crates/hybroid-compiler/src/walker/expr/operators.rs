//! Unary and binary operators.

use hybroid_ast::{BinaryExpr, BinaryOp, UnaryExpr, UnaryOp};
use hybroid_core::{AlertKind, Span, Type};

use super::Walker;
use crate::values::{NumberVal, Value};

impl<'s> Walker<'s> {
    pub(crate) fn walk_binary(&mut self, binary: &mut BinaryExpr) -> Value {
        let before = self.context.conversions.len();
        let left = self.walk_single(&mut binary.left, None);
        let hint = left.ty();
        let right = self.walk_single(&mut binary.right, Some(&hint));

        if binary.op == BinaryOp::Or && self.context.conversions.len() > before {
            self.report(AlertKind::EntityConversionWithOrCondition, binary.span);
            self.context.conversions.truncate(before);
        }
        self.binary_value(binary.op, &left, &right, binary.span)
    }

    /// The value of `left op right`, shared with compound assignment.
    pub(crate) fn binary_value(
        &mut self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
    ) -> Value {
        let (lt, rt) = (left.ty(), right.ty());
        if lt.is_invalid() || rt.is_invalid() {
            return if op.is_comparison() || op.is_logical() {
                Value::Bool
            } else {
                Value::Invalid
            };
        }

        if op.is_arithmetic() {
            if !lt.is_numeric() || !rt.is_numeric() || lt != rt {
                self.types_mismatch(op, lt, rt, span);
                return Value::Invalid;
            }
            return match left {
                Value::Number(_) | Value::Enum(_) | Value::EnumField(_) => {
                    Value::Number(NumberVal::default())
                }
                other => other.clone(),
            };
        }

        if op == BinaryOp::Concat {
            if !lt.is_text() && !rt.is_text() {
                self.types_mismatch(op, lt, rt, span);
                return Value::Invalid;
            }
            return Value::Text;
        }

        if op.is_comparison() {
            if lt != rt {
                self.types_mismatch(op, lt, rt, span);
            }
            return Value::Bool;
        }

        if op.is_logical() {
            for ty in [lt, rt] {
                if ty != Type::BOOL {
                    self.invalid_operand(op.as_str(), "bool", ty, span);
                }
            }
            return Value::Bool;
        }

        for ty in [lt, rt] {
            if ty != Type::NUMBER {
                self.invalid_operand(op.as_str(), "number", ty, span);
            }
        }
        Value::NUMBER
    }

    pub(crate) fn walk_unary(&mut self, unary: &mut UnaryExpr) -> Value {
        let operand = self.walk_single(&mut unary.operand, None);
        let ty = operand.ty();
        if ty.is_invalid() {
            return match unary.op {
                UnaryOp::Not => Value::Bool,
                UnaryOp::Len => Value::NUMBER,
                UnaryOp::Neg => Value::Invalid,
            };
        }

        match unary.op {
            UnaryOp::Not => {
                if ty != Type::BOOL {
                    self.invalid_operand("!", "bool", ty, unary.span);
                }
                Value::Bool
            }
            UnaryOp::Neg => {
                if !ty.is_numeric() {
                    self.invalid_operand("-", "a number", ty, unary.span);
                    return Value::Invalid;
                }
                match operand {
                    Value::Number(_) => operand
                        .literal_number()
                        .map_or(Value::NUMBER, |n| Value::number_literal(-n)),
                    Value::Enum(_) | Value::EnumField(_) => Value::NUMBER,
                    other => other,
                }
            }
            UnaryOp::Len => {
                if !matches!(operand, Value::List(_)) && !ty.is_text() {
                    self.invalid_operand("#", "a list or text", ty, unary.span);
                }
                Value::NUMBER
            }
        }
    }

    fn types_mismatch(&mut self, op: BinaryOp, left: Type, right: Type, span: Span) {
        self.report(
            AlertKind::TypesMismatch {
                op: op.as_str(),
                left,
                right,
            },
            span,
        );
    }

    fn invalid_operand(&mut self, op: &'static str, expected: &'static str, got: Type, span: Span) {
        self.report(AlertKind::InvalidOperand { op, expected, got }, span);
    }
}
