use crate::comparison::{cmp_values, str_test};
use crate::path::Accessor;
use crate::value::Value;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

/// Folded predicate tree produced by the expression builder.
#[derive(Debug, Clone)]
pub enum FilterExpr {
    /// Constant outcome; an empty filter folds to `Const(true)`.
    Const(bool),
    Eq(Operand, Operand),
    Ne(Operand, Operand),
    Lt(Operand, Operand),
    Lte(Operand, Operand),
    Gt(Operand, Operand),
    Gte(Operand, Operand),
    Contains(Operand, Operand),
    StartsWith(Operand, Operand),
    EndsWith(Operand, Operand),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
}

#[derive(Debug, Clone)]
pub enum Operand {
    Field(Accessor), // model.Address.City
    Literal(Value),  // "abc", 123, 2024-01-01
}

pub fn eval_filter(expr: &FilterExpr, current: &dyn Any) -> bool {
    match expr {
        FilterExpr::Const(b) => *b,
        FilterExpr::Eq(a, b) => cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_eq(),
        ),
        FilterExpr::Ne(a, b) => !cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_eq(),
        ),
        FilterExpr::Lt(a, b) => cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_lt(),
        ),
        FilterExpr::Lte(a, b) => cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_le(),
        ),
        FilterExpr::Gt(a, b) => cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_gt(),
        ),
        FilterExpr::Gte(a, b) => cmp_values(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |o| o.is_ge(),
        ),
        FilterExpr::Contains(a, b) => str_test(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |h, n| h.contains(n),
        ),
        FilterExpr::StartsWith(a, b) => str_test(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |h, n| h.starts_with(n),
        ),
        FilterExpr::EndsWith(a, b) => str_test(
            &eval_operand(a, current),
            &eval_operand(b, current),
            |h, n| h.ends_with(n),
        ),
        FilterExpr::And(l, r) => eval_filter(l, current) && eval_filter(r, current),
        FilterExpr::Or(l, r) => eval_filter(l, current) || eval_filter(r, current),
        FilterExpr::Not(i) => !eval_filter(i, current),
    }
}

fn eval_operand<'a>(op: &'a Operand, current: &dyn Any) -> Cow<'a, Value> {
    match op {
        Operand::Literal(v) => Cow::Borrowed(v),
        Operand::Field(accessor) => Cow::Owned(accessor.read(current)),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(accessor) => write!(f, "model.{}", accessor.path()),
            Operand::Literal(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Const(b) => write!(f, "{b}"),
            FilterExpr::Eq(a, b) => write!(f, "({a} == {b})"),
            FilterExpr::Ne(a, b) => write!(f, "({a} != {b})"),
            FilterExpr::Lt(a, b) => write!(f, "({a} < {b})"),
            FilterExpr::Lte(a, b) => write!(f, "({a} <= {b})"),
            FilterExpr::Gt(a, b) => write!(f, "({a} > {b})"),
            FilterExpr::Gte(a, b) => write!(f, "({a} >= {b})"),
            FilterExpr::Contains(a, b) => write!(f, "{a}.Contains({b})"),
            FilterExpr::StartsWith(a, b) => write!(f, "{a}.StartsWith({b})"),
            FilterExpr::EndsWith(a, b) => write!(f, "{a}.EndsWith({b})"),
            FilterExpr::And(l, r) => write!(f, "({l} && {r})"),
            FilterExpr::Or(l, r) => write!(f, "({l} || {r})"),
            FilterExpr::Not(i) => write!(f, "!{i}"),
        }
    }
}
