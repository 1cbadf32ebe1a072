//! Advisory checks over a filter-query document.
//!
//! Nothing here fails: every problem found becomes an error or a warning on
//! the returned [`ValidationResult`], in the order the document declares
//! queries, items, sort descriptors and pagination. Errors make the document
//! unsafe to compile; warnings never affect validity.

use crate::context::Context;
use crate::model::{FilterItem, FilterQuery, FilterQueryLanguage, LogicType, PaginationOptions, SortDescriptor, SortDirection};
use crate::path::resolve;
use crate::shape::Shape;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for (title, messages) in [("Errors", &self.errors), ("Warnings", &self.warnings)] {
            if messages.is_empty() {
                continue;
            }
            lines.push(format!("{title} ({}):", messages.len()));
            lines.extend(messages.iter().map(|m| format!("  - {m}")));
        }
        if lines.is_empty() {
            f.write_str("Validation passed with no errors or warnings.")
        } else {
            f.write_str(&lines.join("\n"))
        }
    }
}

pub struct Validator<'s> {
    shape: &'s Shape,
    ctx: Context,
}

impl<'s> Validator<'s> {
    pub fn new(shape: &'s Shape, ctx: &Context) -> Self {
        Self {
            shape,
            ctx: ctx.clone(),
        }
    }

    pub fn validate(&self, fql: Option<&FilterQueryLanguage>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let Some(fql) = fql else {
            result.add_error("FQL object cannot be null.");
            return result;
        };

        if fql.logic == LogicType::Not && !fql.filter_queries.is_empty() {
            result.add_error("Cannot group filters using 'Not' logic at the root of a filter query.");
        }

        if fql.filter_queries.is_empty() {
            result.add_warning("FilterQueries is empty. No filtering will be applied.");
        }
        for query in &fql.filter_queries {
            self.check_query(query, &mut result);
        }

        for sort in &fql.sorting {
            self.check_sort(sort, &mut result);
        }

        if let Some(pagination) = &fql.pagination {
            self.check_pagination(pagination, &mut result);
        }

        debug!(
            model = self.shape.name(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated filter"
        );
        result
    }

    fn check_query(&self, query: &FilterQuery, result: &mut ValidationResult) {
        let field = query.field.as_str();
        if field.trim().is_empty() {
            result.add_error("Filter query has empty or null field name.");
        } else {
            let converted = self.ctx.convert(field);
            if resolve(self.shape, &converted).is_err() {
                result.add_error(format!(
                    "Field '{field}' (converted to '{converted}') does not exist on type '{}'.",
                    self.shape.name()
                ));
            }
        }

        if query.filter_items.is_empty() {
            result.add_warning(format!("Filter query for field '{field}' has no filter items."));
            return;
        }
        if query.filter_items.len() > 1 && query.logic == LogicType::Not {
            result.add_error(format!("Cannot group filters using 'Not' logic for field '{field}'."));
        }
        for item in &query.filter_items {
            check_item(item, field, result);
        }
    }

    fn check_sort(&self, sort: &SortDescriptor, result: &mut ValidationResult) {
        let field = sort.field.as_str();
        if field.trim().is_empty() {
            result.add_error("Sort descriptor has empty or null field name.");
        } else {
            let converted = self.ctx.convert(field);
            if resolve(self.shape, &converted).is_err() {
                result.add_error(format!(
                    "Sort field '{field}' (converted to '{converted}') does not exist on type '{}'.",
                    self.shape.name()
                ));
            }
        }
        if let SortDirection::Unknown(direction) = &sort.direction {
            result.add_error(format!("Invalid sort direction '{direction}' for field '{field}'."));
        }
    }

    fn check_pagination(&self, pagination: &PaginationOptions, result: &mut ValidationResult) {
        if pagination.page < 1 {
            result.add_error(format!("Page number must be >= 1. Current value: {}", pagination.page));
        }
        if pagination.page_size < 1 {
            result.add_error(format!("Page size must be >= 1. Current value: {}", pagination.page_size));
        }
        if pagination.page_size > self.ctx.large_page_size {
            result.add_warning(format!(
                "Page size is very large ({}). Consider using a smaller value for better performance.",
                pagination.page_size
            ));
        }
    }
}

fn check_item(item: &FilterItem, field: &str, result: &mut ValidationResult) {
    let op = &item.operation;
    if !op.is_known() {
        result.add_error(format!("Invalid operation type '{op}' for field '{field}'."));
    }
    if item.value.trim().is_empty() {
        result.add_warning(format!("Filter item for field '{field}' has empty or null value."));
    }
    if op.is_string_operation() {
        result.add_warning(format!(
            "String operation '{op}' used on field '{field}'. Ensure this field is of type string."
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Model, ShapeBuilder};
    use crate::value::FieldType;
    use pretty_assertions::assert_eq;
    use std::sync::OnceLock;

    struct Customer {
        id: i64,
        name: String,
    }

    impl Model for Customer {
        fn shape() -> &'static Shape {
            static SHAPE: OnceLock<Shape> = OnceLock::new();
            SHAPE.get_or_init(|| {
                ShapeBuilder::<Customer>::new("Customer")
                    .field("Id", FieldType::Int, |c| c.id.into())
                    .field("Name", FieldType::String, |c| c.name.as_str().into())
                    .build()
            })
        }
    }

    fn validate(fql: Option<&FilterQueryLanguage>) -> ValidationResult {
        Validator::new(Customer::shape(), &Context::default()).validate(fql)
    }

    #[test]
    fn null_document_short_circuits() {
        let result = validate(None);
        assert!(!result.is_valid());
        assert_eq!(result.errors, vec!["FQL object cannot be null."]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_document_only_warns() {
        let result = validate(Some(&FilterQueryLanguage::default()));
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["FilterQueries is empty. No filtering will be applied."]);
    }

    #[test]
    fn problems_accumulate_in_order() {
        let fql = FilterQueryLanguage::new(LogicType::And)
            .query(FilterQuery::new("name", LogicType::And).item(FilterItem::new("Contains", "")))
            .query(FilterQuery::new("Id", LogicType::And).item(FilterItem::new("Between", "1")))
            .query(FilterQuery::new("Id", LogicType::And))
            .sort("Nope", SortDirection::Unknown("Up".into()))
            .paginate(0, 5000);
        let result = validate(Some(&fql));

        assert_eq!(
            result.errors,
            vec![
                "Field 'name' (converted to 'name') does not exist on type 'Customer'.",
                "Invalid operation type 'Between' for field 'Id'.",
                "Sort field 'Nope' (converted to 'Nope') does not exist on type 'Customer'.",
                "Invalid sort direction 'Up' for field 'Nope'.",
                "Page number must be >= 1. Current value: 0",
            ]
        );
        assert_eq!(
            result.warnings,
            vec![
                "Filter item for field 'name' has empty or null value.",
                "String operation 'Contains' used on field 'name'. Ensure this field is of type string.",
                "Filter query for field 'Id' has no filter items.",
                "Page size is very large (5000). Consider using a smaller value for better performance.",
            ]
        );
    }

    #[test]
    fn converter_is_applied_before_lookup() {
        let fql = FilterQueryLanguage::new(LogicType::And)
            .query(FilterQuery::new("name", LogicType::And).item(FilterItem::new("Eq", "x")))
            .sort("id", SortDirection::Descending);
        let result = Validator::new(Customer::shape(), &Context::pascal_case()).validate(Some(&fql));
        assert!(result.is_valid(), "{result}");
    }

    #[test]
    fn blank_names_are_errors() {
        let fql = FilterQueryLanguage::new(LogicType::And)
            .query(FilterQuery::new("  ", LogicType::And).item(FilterItem::new("Eq", "x")))
            .sort("", SortDirection::Ascending);
        let result = validate(Some(&fql));
        assert_eq!(
            result.errors,
            vec![
                "Filter query has empty or null field name.",
                "Sort descriptor has empty or null field name.",
            ]
        );
    }

    #[test]
    fn not_logic_is_reported_where_it_groups() {
        let fql = FilterQueryLanguage::new(LogicType::Not)
            .query(
                FilterQuery::new("Id", LogicType::Not)
                    .item(FilterItem::new("GT", "1"))
                    .item(FilterItem::new("LT", "9")),
            )
            .query(FilterQuery::new("Name", LogicType::Not).item(FilterItem::new("Eq", "a")));
        let result = validate(Some(&fql));
        assert_eq!(
            result.errors,
            vec![
                "Cannot group filters using 'Not' logic at the root of a filter query.",
                "Cannot group filters using 'Not' logic for field 'Id'.",
            ]
        );
    }

    #[test]
    fn not_root_without_queries_is_accepted() {
        let result = validate(Some(&FilterQueryLanguage::new(LogicType::Not)));
        assert!(result.is_valid());
    }

    #[test]
    fn page_size_threshold_comes_from_context() {
        let fql = FilterQueryLanguage::new(LogicType::And).paginate(1, 200);
        let ctx = Context::new().with_large_page_size(100);
        let result = Validator::new(Customer::shape(), &ctx).validate(Some(&fql));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 2);
        assert!(validate(Some(&fql)).warnings.len() == 1);
    }

    #[test]
    fn renders_summary() {
        let mut result = ValidationResult::default();
        assert_eq!(result.to_string(), "Validation passed with no errors or warnings.");
        result.add_error("bad");
        result.add_warning("meh");
        result.add_warning("hmm");
        assert_eq!(
            result.to_string(),
            "Errors (1):\n  - bad\nWarnings (2):\n  - meh\n  - hmm"
        );
    }
}
