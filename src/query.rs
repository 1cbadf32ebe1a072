//! Filter, sort and paginate an in-memory sequence from one document.
//!
//! The stages always run in that order and each is skipped when its section
//! of the document is absent or empty.

use crate::builder::Predicate;
use crate::comparison::sort_cmp;
use crate::compiler::FilterCompiler;
use crate::context::Context;
use crate::errors::{FqlError, Result};
use crate::model::{FilterQueryLanguage, SortDescriptor, SortDirection};
use crate::path::{resolve, Accessor};
use crate::shape::Shape;
use crate::value::FieldType;
use itertools::Itertools;
use std::any::Any;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// One resolved ordering key.
#[derive(Debug, Clone)]
pub struct SortKey {
    accessor: Accessor,
    descending: bool,
}

impl SortKey {
    pub fn resolve(shape: &Shape, sort: &SortDescriptor, ctx: &Context) -> Result<Self> {
        if sort.field.trim().is_empty() {
            return Err(FqlError::EmptyField);
        }
        let descending = match &sort.direction {
            SortDirection::Ascending => false,
            SortDirection::Descending => true,
            SortDirection::Unknown(direction) => {
                return Err(FqlError::InvalidSortDirection {
                    field: sort.field.clone(),
                    direction: direction.clone(),
                })
            }
        };
        let accessor = resolve(shape, &ctx.convert(&sort.field))?;
        if let FieldType::Object(_) = accessor.leaf_type() {
            return Err(FqlError::TypeMismatch {
                op: "OrderBy".into(),
                left: format!("`{}` ({})", accessor.path(), accessor.leaf_type()),
                right: "a sortable value".into(),
            });
        }
        Ok(Self { accessor, descending })
    }

    pub fn path(&self) -> &str {
        self.accessor.path()
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    fn compare(&self, a: &dyn Any, b: &dyn Any) -> Ordering {
        let ordering = sort_cmp(&self.accessor.read(a), &self.accessor.read(b));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Sequences the applicator can drive.
pub trait Queryable<T>: Sized {
    fn count(&self) -> usize;

    fn filter_by(self, predicate: &Predicate<T>) -> Self;

    /// Stable sort; later keys only break ties left by earlier ones.
    fn order_by(self, keys: &[SortKey]) -> Self;

    fn skip_take(self, skip: usize, take: usize) -> Self;
}

impl<T: 'static> Queryable<T> for Vec<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn filter_by(mut self, predicate: &Predicate<T>) -> Self {
        self.retain(predicate.as_fn());
        self
    }

    fn order_by(self, keys: &[SortKey]) -> Self {
        if keys.is_empty() {
            return self;
        }
        self.into_iter()
            .sorted_by(|a, b| {
                keys.iter()
                    .fold(Ordering::Equal, |acc, key| acc.then_with(|| key.compare(a, b)))
            })
            .collect()
    }

    fn skip_take(self, skip: usize, take: usize) -> Self {
        self.into_iter().skip(skip).take(take).collect()
    }
}

pub struct QueryApplicator<'s> {
    shape: &'s Shape,
    ctx: Context,
}

impl<'s> QueryApplicator<'s> {
    pub fn new(shape: &'s Shape, ctx: &Context) -> Self {
        Self {
            shape,
            ctx: ctx.clone(),
        }
    }

    pub fn apply<T, Q>(&self, source: Q, fql: &FilterQueryLanguage) -> Result<Q>
    where
        T: 'static,
        Q: Queryable<T>,
    {
        let before = source.count();
        let mut current = source;

        if !fql.filter_queries.is_empty() {
            let predicate = FilterCompiler::new(self.shape, &self.ctx).compile::<T>(fql)?;
            current = current.filter_by(&predicate);
        }

        if !fql.sorting.is_empty() {
            let keys = fql
                .sorting
                .iter()
                .map(|sort| SortKey::resolve(self.shape, sort, &self.ctx))
                .collect::<Result<Vec<_>>>()?;
            current = current.order_by(&keys);
        }

        if let Some(requested) = fql.pagination {
            let page = requested.clamped();
            if page != requested {
                warn!(
                    page = requested.page,
                    page_size = requested.page_size,
                    "pagination out of range, clamped to {}/{}",
                    page.page,
                    page.page_size
                );
            }
            current = current.skip_take(page.skip(), page.take());
        }

        debug!(
            model = self.shape.name(),
            records_in = before,
            records_out = current.count(),
            "query applied"
        );
        Ok(current)
    }
}
