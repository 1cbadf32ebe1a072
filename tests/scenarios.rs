mod common;

use common::{ids, order, orders, Order};
use fql_filter as fql;
use fql::{Context, FilterItem, FilterQuery, FilterQueryLanguage, FqlError, LogicType, PaginationOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_eq_on_single_field() {
    let doc = FilterQueryLanguage::new(LogicType::And)
        .query(FilterQuery::new("Name", LogicType::And).item(FilterItem::new("Eq", "Test")));
    let predicate = fql::compile::<Order>(&doc).unwrap();

    assert_eq!(predicate.to_string(), "(model.Name == \"Test\")");
    assert!(predicate.test(&order(1, "Test")));
    assert!(!predicate.test(&order(1, "Tester")));
    assert!(!predicate.test(&order(1, "test")));
}

#[test]
fn test_field_name_case_needs_converter() {
    let doc = FilterQueryLanguage::new(LogicType::And)
        .query(FilterQuery::new("name", LogicType::And).item(FilterItem::new("Eq", "Test")));

    let report = fql::validate::<Order>(Some(&doc));
    assert_eq!(
        report.errors,
        vec!["Field 'name' (converted to 'name') does not exist on type 'Order'."]
    );
    let err = fql::compile::<Order>(&doc).unwrap_err();
    assert_eq!(err.to_string(), "field `name` does not exist on type `Order`");

    let ctx = Context::pascal_case();
    assert!(fql::validate_with::<Order>(Some(&doc), &ctx).is_valid());
    let predicate = fql::compile_with::<Order>(&doc, &ctx).unwrap();
    assert!(predicate.test(&order(7, "Test")));
}

#[test]
fn test_and_of_single_item_and_or_group() {
    let doc: FilterQueryLanguage = serde_json::from_str(
        r#"{
            "logic": "And",
            "filterQueries": [
                { "field": "Id", "filterItems": [ { "operation": "GT", "value": "100" } ] },
                { "field": "Name", "logic": "Or", "filterItems": [
                    { "operation": "Contains", "value": "John" },
                    { "operation": "Contains", "value": "Jane" }
                ] }
            ]
        }"#,
    )
    .unwrap();

    let out = fql::apply(orders(), &doc).unwrap();
    assert_eq!(ids(&out), vec![101, 150, 120]);
}

#[test]
fn test_page_zero_is_reported_then_clamped() {
    let doc = FilterQueryLanguage {
        pagination: Some(PaginationOptions::new(0, 20)),
        ..FilterQueryLanguage::default()
    };

    let report = fql::validate::<Order>(Some(&doc));
    assert!(!report.is_valid());
    assert_eq!(report.errors, vec!["Page number must be >= 1. Current value: 0"]);

    let out = fql::apply(orders(), &doc).unwrap();
    assert_eq!(ids(&out), ids(&orders()));
    assert_eq!(doc.pagination, Some(PaginationOptions::new(0, 20)));
}

#[test]
fn test_unknown_operation() {
    let doc: FilterQueryLanguage = serde_json::from_str(
        r#"{ "filterQueries": [ { "field": "Id", "filterItems": [ { "operation": "Between", "value": "1" } ] } ] }"#,
    )
    .unwrap();

    let report = fql::validate::<Order>(Some(&doc));
    assert_eq!(report.errors, vec!["Invalid operation type 'Between' for field 'Id'."]);

    match fql::compile::<Order>(&doc) {
        Err(FqlError::NotImplemented(op)) => assert_eq!(op, "Between"),
        other => panic!("expected NotImplemented, got {other:?}"),
    }
}

#[test]
fn test_validation_report_rendering() {
    let doc = FilterQueryLanguage::new(LogicType::And)
        .query(FilterQuery::new("Name", LogicType::And).item(FilterItem::new("StartsWith", "")));
    let report = fql::validate::<Order>(Some(&doc));
    assert_eq!(
        report.to_string(),
        "Warnings (2):\n  - Filter item for field 'Name' has empty or null value.\n  - String operation 'StartsWith' used on field 'Name'. Ensure this field is of type string."
    );
}
