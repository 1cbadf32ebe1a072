use crate::value::Value;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use std::cmp::Ordering;

/// Order two values, or `None` when they are not comparable.
/// Null only compares equal to null.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    use Value::*;
    match (a, b) {
        (Null, Null) => Some(Ordering::Equal),
        (Null, _) | (_, Null) => None,
        (Bool(x), Bool(y)) => Some(x.cmp(y)),
        (Int(x), Int(y)) => Some(x.cmp(y)),
        (Float(x), Float(y)) => x.partial_cmp(y),
        (Int(x), Float(y)) => (*x as f64).partial_cmp(y),
        (Float(x), Int(y)) => x.partial_cmp(&(*y as f64)),
        (Decimal(x), Decimal(y)) => Some(x.cmp(y)),
        (Decimal(x), Int(y)) => Some(x.cmp(&BigDecimal::from(*y))),
        (Int(x), Decimal(y)) => Some(BigDecimal::from(*x).cmp(y)),
        (Decimal(x), Float(y)) => BigDecimal::from_f64(*y).map(|y| x.cmp(&y)),
        (Float(x), Decimal(y)) => y.to_f64().and_then(|y| x.partial_cmp(&y)),
        (String(x), String(y)) => Some(x.cmp(y)),
        (Date(x), Date(y)) => Some(x.cmp(y)),
        (DateTime(x), DateTime(y)) => Some(x.cmp(y)),
        (Date(x), DateTime(y)) => x.and_hms_opt(0, 0, 0).map(|x| x.and_utc().cmp(y)),
        (DateTime(x), Date(y)) => y.and_hms_opt(0, 0, 0).map(|y| x.cmp(&y.and_utc())),
        (Enum { ordinal: x, .. }, Enum { ordinal: y, .. }) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Apply `pred_on_ord` to the ordering of `a` and `b`; incomparable is false.
pub fn cmp_values<F>(a: &Value, b: &Value, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    compare(a, b).map(pred_on_ord).unwrap_or(false)
}

/// Total order for sorting: nulls (and NaN) first, incomparable values tie.
pub fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    match (sorts_as_null(a), sorts_as_null(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

// NaN sorts with nulls.
fn sorts_as_null(v: &Value) -> bool {
    match v {
        Value::Float(x) => x.is_nan(),
        other => other.is_null(),
    }
}

/// String membership test; false unless both sides are strings.
pub fn str_test<F>(a: &Value, b: &Value, test: F) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    match (a.as_str(), b.as_str()) {
        (Some(haystack), Some(needle)) => test(haystack, needle),
        _ => false,
    }
}
