use crate::builder::{ExpressionBuilder, Predicate};
use crate::context::Context;
use crate::errors::{FqlError, Result};
use crate::model::{FilterItem, FilterQueryLanguage, LogicType, Operation};
use crate::shape::Shape;
use tracing::debug;

/// Upper-case the first character, e.g. `startDate` -> `StartDate`.
/// Names of one character or less are returned unchanged.
pub fn to_pascal_case(field: &str) -> String {
    let mut chars = field.chars();
    match (chars.next(), chars.as_str()) {
        (Some(first), rest) if !rest.is_empty() => first.to_uppercase().chain(rest.chars()).collect(),
        _ => field.to_string(),
    }
}

/// Turns a filter-query document into a [`Predicate`] over one shape.
pub struct FilterCompiler<'s> {
    shape: &'s Shape,
    ctx: Context,
}

impl<'s> FilterCompiler<'s> {
    pub fn new(shape: &'s Shape, ctx: &Context) -> Self {
        Self {
            shape,
            ctx: ctx.clone(),
        }
    }

    pub fn compile<T: 'static>(&self, fql: &FilterQueryLanguage) -> Result<Predicate<T>> {
        debug!(
            model = self.shape.name(),
            queries = fql.filter_queries.len(),
            logic = %fql.logic,
            "compiling filter"
        );
        if fql.filter_queries.is_empty() {
            // the root join is never consulted when there is nothing to join
            return Ok(ExpressionBuilder::<T>::for_shape(self.shape, LogicType::And, &self.ctx)?.finalize());
        }
        let mut builder = ExpressionBuilder::<T>::for_shape(self.shape, fql.logic, &self.ctx)?;

        for query in &fql.filter_queries {
            // a single item needs no wrapper group
            let grouped = query.filter_items.len() > 1;
            if grouped {
                builder.begin_group(query.logic)?;
            }
            for item in &query.filter_items {
                dispatch(&mut builder, &query.field, item)?;
            }
            if grouped {
                builder.end_group();
            }
        }

        Ok(builder.finalize())
    }
}

fn dispatch<T: 'static>(builder: &mut ExpressionBuilder<'_, T>, field: &str, item: &FilterItem) -> Result<()> {
    let value = item.value.as_str();
    let preset = item.is_preset;
    match &item.operation {
        Operation::Eq => builder.build_eq(field, value, preset),
        Operation::NEq => builder.build_neq(field, value, preset),
        Operation::Gt => builder.build_gt(field, value, preset),
        Operation::Lt => builder.build_lt(field, value, preset),
        Operation::Gte => builder.build_gte(field, value, preset),
        Operation::Lte => builder.build_lte(field, value, preset),
        Operation::Contains => builder.build_contains(field, value, preset),
        Operation::NotContains => builder.build_not_contains(field, value, preset),
        Operation::StartsWith => builder.build_starts_with(field, value, preset),
        Operation::EndsWith => builder.build_ends_with(field, value, preset),
        Operation::Unknown(name) => Err(FqlError::NotImplemented(name.clone())),
    }
}
