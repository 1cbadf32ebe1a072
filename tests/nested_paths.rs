mod common;

use common::{date, ids, order, orders, Address, Order};
use fql_filter as fql;
use fql::{FilterItem, FilterQuery, FilterQueryLanguage, FqlError, LogicType};
use pretty_assertions::assert_eq;

fn single(field: &str, item: FilterItem) -> FilterQueryLanguage {
    FilterQueryLanguage::new(LogicType::And).query(FilterQuery::new(field, LogicType::And).item(item))
}

#[test]
fn test_two_level_path() {
    let doc = single("Address.City", FilterItem::new("Eq", "Portland"));
    let predicate = fql::compile::<Order>(&doc).unwrap();
    assert_eq!(predicate.to_string(), "(model.Address.City == \"Portland\")");
    assert_eq!(ids(&fql::apply(orders(), &doc).unwrap()), vec![50]);
}

#[test]
fn test_absent_nested_object_never_matches() {
    let doc = single("Billing.City", FilterItem::new("StartsWith", "B"));
    assert_eq!(ids(&fql::apply(orders(), &doc).unwrap()), vec![150]);

    let ne = single("Billing.City", FilterItem::new("NEq", "Boston"));
    // null != "Boston" holds for every record without a billing address
    assert_eq!(ids(&fql::apply(orders(), &ne).unwrap()), vec![101, 50, 200, 120]);
}

#[test]
fn test_missing_last_segment_is_named_in_full() {
    let doc = single("Address.InvalidProperty", FilterItem::new("Eq", "x"));

    let report = fql::validate::<Order>(Some(&doc));
    assert_eq!(
        report.errors,
        vec!["Field 'Address.InvalidProperty' (converted to 'Address.InvalidProperty') does not exist on type 'Order'."]
    );
    let err = fql::compile::<Order>(&doc).unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `Address.InvalidProperty` does not exist on type `Order`"
    );
}

#[test]
fn test_path_through_scalar_fails() {
    let doc = single("Name.Length", FilterItem::new("GT", "3"));
    assert!(matches!(
        fql::compile::<Order>(&doc),
        Err(FqlError::FieldNotFound { path, model }) if path == "Name.Length" && model == "Order"
    ));
}

#[test]
fn test_object_field_cannot_be_compared() {
    let doc = single("Address", FilterItem::new("Eq", "Seattle"));
    assert!(matches!(
        fql::compile::<Order>(&doc),
        Err(FqlError::TypeMismatch { .. })
    ));
}

#[test]
fn test_nested_field_to_field() {
    let doc = single("Billing.City", FilterItem::field("NEq", "Address.City"));
    let predicate = fql::compile::<Order>(&doc).unwrap();
    assert_eq!(predicate.to_string(), "(model.Billing.City != model.Address.City)");

    let mut same = order(1, "x");
    same.billing = Some(Address {
        city: "Seattle".into(),
        zip: "0".into(),
    });
    assert!(!predicate.test(&same));
    assert!(predicate.test(&order(2, "y")));
}

#[test]
fn test_date_field_to_field() {
    let doc = single("StartDate", FilterItem::field("LT", "EndDate"));
    // open-ended orders have a null EndDate and never satisfy an ordering
    assert_eq!(ids(&fql::apply(orders(), &doc).unwrap()), vec![101, 120]);

    let mut open = order(9, "open");
    open.end_date = Some(date(2023, 12, 31));
    assert!(!fql::compile::<Order>(&doc).unwrap().test(&open));
}
