//! Incremental construction of a filter predicate.
//!
//! The builder keeps a stack of open groups. Leaf conditions are appended to
//! the innermost group; `begin_group`/`end_group` push and pop. `finalize`
//! closes whatever is still open and folds every group left to right with its
//! join into a single [`FilterExpr`].

use crate::coerce::coerce;
use crate::context::Context;
use crate::errors::{FqlError, Result};
use crate::filter::{eval_filter, FilterExpr, Operand};
use crate::model::LogicType;
use crate::path::resolve;
use crate::shape::{Model, Shape};
use crate::value::FieldType;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    All,
    Any,
}

impl TryFrom<LogicType> for Join {
    type Error = FqlError;

    fn try_from(logic: LogicType) -> Result<Self> {
        match logic {
            LogicType::And => Ok(Join::All),
            LogicType::Or => Ok(Join::Any),
            LogicType::Not => Err(FqlError::InvalidGroupLogic),
        }
    }
}

enum Step {
    Leaf(FilterExpr),
    Group(Group),
}

struct Group {
    join: Join,
    steps: Vec<Step>,
}

impl Group {
    fn new(join: Join) -> Self {
        Self {
            join,
            steps: Vec::new(),
        }
    }

    // Empty groups contribute nothing to their parent.
    fn fold(self) -> Option<FilterExpr> {
        let join = self.join;
        self.steps
            .into_iter()
            .filter_map(|step| match step {
                Step::Leaf(expr) => Some(expr),
                Step::Group(group) => group.fold(),
            })
            .reduce(|acc, next| match join {
                Join::All => FilterExpr::And(Box::new(acc), Box::new(next)),
                Join::Any => FilterExpr::Or(Box::new(acc), Box::new(next)),
            })
    }
}

/// What a comparison requires of its operands.
#[derive(Clone, Copy)]
enum Check {
    Equality,
    Ordering,
    Text,
}

pub struct ExpressionBuilder<'s, T> {
    shape: &'s Shape,
    ctx: Context,
    stack: Vec<Group>,
    _model: PhantomData<fn(&T)>,
}

impl<T: Model> ExpressionBuilder<'static, T> {
    /// Builder over the declared shape of `T`, joining top-level steps with `logic`.
    pub fn new(logic: LogicType) -> Result<Self> {
        Self::for_shape(T::shape(), logic, &Context::default())
    }
}

impl<'s, T: 'static> ExpressionBuilder<'s, T> {
    pub fn for_shape(shape: &'s Shape, logic: LogicType, ctx: &Context) -> Result<Self> {
        Ok(Self {
            shape,
            ctx: ctx.clone(),
            stack: vec![Group::new(Join::try_from(logic)?)],
            _model: PhantomData,
        })
    }

    pub fn begin_group(&mut self, logic: LogicType) -> Result<()> {
        let join = Join::try_from(logic)?;
        trace!(depth = self.stack.len(), ?logic, "begin group");
        self.stack.push(Group::new(join));
        Ok(())
    }

    /// Close the innermost group. Closing the root is a no-op.
    pub fn end_group(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(group) = self.stack.pop() {
            self.current().steps.push(Step::Group(group));
        }
    }

    pub fn build_eq(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("Eq", Check::Equality), FilterExpr::Eq)
    }

    pub fn build_neq(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("NEq", Check::Equality), FilterExpr::Ne)
    }

    pub fn build_gt(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("GT", Check::Ordering), FilterExpr::Gt)
    }

    pub fn build_lt(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("LT", Check::Ordering), FilterExpr::Lt)
    }

    pub fn build_gte(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("GTE", Check::Ordering), FilterExpr::Gte)
    }

    pub fn build_lte(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("LTE", Check::Ordering), FilterExpr::Lte)
    }

    pub fn build_contains(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("Contains", Check::Text), FilterExpr::Contains)
    }

    pub fn build_not_contains(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("NotContains", Check::Text), |l, r| {
            FilterExpr::Not(Box::new(FilterExpr::Contains(l, r)))
        })
    }

    pub fn build_starts_with(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("StartsWith", Check::Text), FilterExpr::StartsWith)
    }

    pub fn build_ends_with(&mut self, property: &str, value: &str, value_is_property: bool) -> Result<()> {
        self.build(property, value, value_is_property, ("EndsWith", Check::Text), FilterExpr::EndsWith)
    }

    /// Close open groups and fold everything into a predicate.
    pub fn finalize(mut self) -> Predicate<T> {
        while self.stack.len() > 1 {
            self.end_group();
        }
        let expr = self
            .stack
            .pop()
            .and_then(Group::fold)
            .unwrap_or(FilterExpr::Const(true));
        debug!(model = self.shape.name(), %expr, "filter expression finalized");
        Predicate {
            expr: Arc::new(expr),
            _model: PhantomData,
        }
    }

    fn build(
        &mut self,
        property: &str,
        value: &str,
        value_is_property: bool,
        (op, check): (&str, Check),
        join: impl FnOnce(Operand, Operand) -> FilterExpr,
    ) -> Result<()> {
        if property.trim().is_empty() {
            return Err(FqlError::EmptyField);
        }
        let left = resolve(self.shape, &self.ctx.convert(property))?;
        let literal = if value_is_property {
            self.ctx.convert(value)
        } else {
            value.to_string()
        };
        check_left(left.leaf_type(), left.path(), check, op)?;

        let right = coerce(&literal, left.leaf_type(), value_is_property, self.shape)?;
        if let Operand::Field(other) = &right {
            check_fields(left.leaf_type(), other.leaf_type(), check, op)?;
        }

        let expr = join(Operand::Field(left), right);
        trace!(%expr, "leaf built");
        self.current().steps.push(Step::Leaf(expr));
        Ok(())
    }

    fn current(&mut self) -> &mut Group {
        // the root group is never popped before finalize
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

fn check_left(ty: &FieldType, path: &str, check: Check, op: &str) -> Result<()> {
    match (check, ty) {
        (_, FieldType::Object(_)) | (Check::Ordering, FieldType::Bool) => Err(FqlError::TypeMismatch {
            op: op.to_string(),
            left: format!("`{path}` ({ty})"),
            right: "a value".into(),
        }),
        (Check::Text, FieldType::String) => Ok(()),
        (Check::Text, other) => Err(FqlError::StringOperation {
            op: op.to_string(),
            path: path.to_string(),
            actual: other.describe(),
        }),
        _ => Ok(()),
    }
}

fn check_fields(left: &FieldType, right: &FieldType, check: Check, op: &str) -> Result<()> {
    let compatible = match check {
        Check::Text => matches!(right, FieldType::String),
        Check::Equality | Check::Ordering => left.is_comparable_with(right),
    };
    if compatible {
        Ok(())
    } else {
        Err(FqlError::TypeMismatch {
            op: op.to_string(),
            left: left.describe(),
            right: right.describe(),
        })
    }
}

/// Compiled filter over records of type `T`.
pub struct Predicate<T> {
    expr: Arc<FilterExpr>,
    _model: PhantomData<fn(&T) -> bool>,
}

impl<T: 'static> Predicate<T> {
    pub fn test(&self, record: &T) -> bool {
        eval_filter(&self.expr, record)
    }

    /// Borrowing closure form, e.g. for `Vec::retain`.
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + '_ {
        move |record: &T| self.test(record)
    }

    pub fn expr(&self) -> &FilterExpr {
        &self.expr
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            expr: Arc::clone(&self.expr),
            _model: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.expr).finish()
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
