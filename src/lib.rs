//! Compile filter-query documents into predicates over typed records.
//!
//! A document names fields by dotted path, lists conditions per field and
//! optionally asks for sorting and pagination. [`validate`] reports every
//! problem it finds without failing; [`compile`] turns a document into a
//! [`Predicate`]; [`apply`] runs filter, sort and pagination over a `Vec`.
//! The `_with` forms take a [`Context`] carrying the field-name converter.

pub mod errors;
pub mod context;
pub mod model;
pub mod value;
pub mod shape;
pub mod path;
pub mod coerce;
pub mod comparison;
pub mod filter;
pub mod builder;
pub mod compiler;
pub mod validator;
pub mod query;
pub mod logging;

pub use builder::{ExpressionBuilder, Predicate};
pub use compiler::{to_pascal_case, FilterCompiler};
pub use context::Context;
pub use errors::{FqlError, Result};
pub use filter::{FilterExpr, Operand};
pub use model::{
    FilterItem, FilterQuery, FilterQueryLanguage, LogicType, Operation, PaginationOptions, SortDescriptor,
    SortDirection,
};
pub use query::{QueryApplicator, Queryable, SortKey};
pub use shape::{Model, Shape, ShapeBuilder};
pub use validator::{ValidationResult, Validator};
pub use value::{FieldType, Value};

pub fn compile<T: Model>(fql: &FilterQueryLanguage) -> Result<Predicate<T>> {
    compile_with(fql, &Context::default())
}

pub fn compile_with<T: Model>(fql: &FilterQueryLanguage, ctx: &Context) -> Result<Predicate<T>> {
    FilterCompiler::new(T::shape(), ctx).compile(fql)
}

/// Validate against `T`. `None` stands for a missing document.
pub fn validate<T: Model>(fql: Option<&FilterQueryLanguage>) -> ValidationResult {
    validate_with::<T>(fql, &Context::default())
}

pub fn validate_with<T: Model>(fql: Option<&FilterQueryLanguage>, ctx: &Context) -> ValidationResult {
    Validator::new(T::shape(), ctx).validate(fql)
}

pub fn apply<T: Model>(records: Vec<T>, fql: &FilterQueryLanguage) -> Result<Vec<T>> {
    apply_with(records, fql, &Context::default())
}

pub fn apply_with<T: Model>(records: Vec<T>, fql: &FilterQueryLanguage, ctx: &Context) -> Result<Vec<T>> {
    QueryApplicator::new(T::shape(), ctx).apply(records, fql)
}
