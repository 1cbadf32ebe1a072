//! Filter-query documents as they arrive from a client.
//!
//! Wire names are camelCase. Operation and sort-direction values outside the
//! known set still deserialize (into `Unknown`) so that validation can report
//! them instead of failing the whole document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How sibling conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicType {
    #[default]
    #[serde(alias = "AND", alias = "and")]
    And,
    #[serde(alias = "OR", alias = "or")]
    Or,
    #[serde(alias = "NOT", alias = "not")]
    Not,
}

impl fmt::Display for LogicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicType::And => "And",
            LogicType::Or => "Or",
            LogicType::Not => "Not",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Eq,
    NEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Unknown(String),
}

impl Operation {
    pub fn is_known(&self) -> bool {
        !matches!(self, Operation::Unknown(_))
    }

    /// Operations that only make sense on string fields.
    pub fn is_string_operation(&self) -> bool {
        matches!(
            self,
            Operation::Contains | Operation::NotContains | Operation::StartsWith | Operation::EndsWith
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operation::Eq => "Eq",
            Operation::NEq => "NEq",
            Operation::Gt => "GT",
            Operation::Lt => "LT",
            Operation::Gte => "GTE",
            Operation::Lte => "LTE",
            Operation::Contains => "Contains",
            Operation::NotContains => "NotContains",
            Operation::StartsWith => "StartsWith",
            Operation::EndsWith => "EndsWith",
            Operation::Unknown(name) => name,
        }
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        // older documents use upper-case names, e.g. NCONTAINS and STARTS
        match name.to_ascii_lowercase().as_str() {
            "eq" => Operation::Eq,
            "neq" => Operation::NEq,
            "gt" => Operation::Gt,
            "lt" => Operation::Lt,
            "gte" => Operation::Gte,
            "lte" => Operation::Lte,
            "contains" => Operation::Contains,
            "notcontains" | "ncontains" => Operation::NotContains,
            "startswith" | "starts" => Operation::StartsWith,
            "endswith" | "ends" => Operation::EndsWith,
            _ => Operation::Unknown(name),
        }
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::from(name.to_string())
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
    Unknown(String),
}

impl SortDirection {
    pub fn as_str(&self) -> &str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
            SortDirection::Unknown(name) => name,
        }
    }
}

impl From<String> for SortDirection {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => SortDirection::Ascending,
            "descending" | "desc" => SortDirection::Descending,
            _ => SortDirection::Unknown(name),
        }
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        direction.as_str().to_string()
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operation applied to the field of its enclosing [`FilterQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItem {
    pub operation: Operation,
    #[serde(default)]
    pub value: String,
    /// When set, `value` names another field to compare against.
    #[serde(default)]
    pub is_preset: bool,
}

impl FilterItem {
    pub fn new(operation: impl Into<Operation>, value: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            value: value.into(),
            is_preset: false,
        }
    }

    /// Compare against another field of the same record.
    pub fn field(operation: impl Into<Operation>, other: impl Into<String>) -> Self {
        Self {
            is_preset: true,
            ..Self::new(operation, other)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub logic: LogicType,
    #[serde(default)]
    pub filter_items: Vec<FilterItem>,
}

impl FilterQuery {
    pub fn new(field: impl Into<String>, logic: LogicType) -> Self {
        Self {
            field: field.into(),
            logic,
            filter_items: Vec::new(),
        }
    }

    pub fn item(mut self, item: FilterItem) -> Self {
        self.filter_items.push(item);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    pub page: i64,
    pub page_size: i64,
}

impl PaginationOptions {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Copy with out-of-range values raised to 1.
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.max(1),
        }
    }

    /// Number of records preceding the page. Values below 1 count as 1.
    pub fn skip(&self) -> usize {
        let pages = self.page.saturating_sub(1).max(0);
        usize::try_from(pages.saturating_mul(self.page_size.max(0))).unwrap_or(usize::MAX)
    }

    /// Page size, with negative sizes taking nothing.
    pub fn take(&self) -> usize {
        usize::try_from(self.page_size.max(0)).unwrap_or(usize::MAX)
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// Root of a filter-query document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryLanguage {
    #[serde(default)]
    pub logic: LogicType,
    #[serde(default)]
    pub filter_queries: Vec<FilterQuery>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationOptions>,
}

impl FilterQueryLanguage {
    pub fn new(logic: LogicType) -> Self {
        Self {
            logic,
            ..Self::default()
        }
    }

    pub fn query(mut self, query: FilterQuery) -> Self {
        self.filter_queries.push(query);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sorting.push(SortDescriptor::new(field, direction));
        self
    }

    pub fn paginate(mut self, page: i64, page_size: i64) -> Self {
        self.pagination = Some(PaginationOptions::new(page, page_size));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_camel_case_document() {
        let doc = r#"{
            "logic": "And",
            "filterQueries": [
                { "field": "Name", "logic": "Or", "filterItems": [
                    { "operation": "Contains", "value": "John" },
                    { "operation": "STARTS", "value": "Ja", "isPreset": false }
                ]}
            ],
            "sorting": [{ "field": "Id", "direction": "desc" }],
            "pagination": { "page": 2, "pageSize": 5 }
        }"#;
        let fql: FilterQueryLanguage = serde_json::from_str(doc).unwrap();
        let expected = FilterQueryLanguage::new(LogicType::And)
            .query(
                FilterQuery::new("Name", LogicType::Or)
                    .item(FilterItem::new(Operation::Contains, "John"))
                    .item(FilterItem::new(Operation::StartsWith, "Ja")),
            )
            .sort("Id", SortDirection::Descending)
            .paginate(2, 5);
        assert_eq!(fql, expected);
    }

    #[test]
    fn unknown_values_are_kept() {
        let item: FilterItem =
            serde_json::from_str(r#"{ "operation": "Between", "value": "1" }"#).unwrap();
        assert_eq!(item.operation, Operation::Unknown("Between".into()));
        assert!(!item.operation.is_known());

        let sort: SortDescriptor =
            serde_json::from_str(r#"{ "field": "Id", "direction": "Sideways" }"#).unwrap();
        assert_eq!(sort.direction, SortDirection::Unknown("Sideways".into()));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let fql: FilterQueryLanguage = serde_json::from_str("{}").unwrap();
        assert_eq!(fql.logic, LogicType::And);
        assert!(fql.filter_queries.is_empty());
        assert!(fql.sorting.is_empty());
        assert_eq!(fql.pagination, None);

        let page: PaginationOptions = serde_json::from_str(r#"{ "page": 3 }"#).unwrap();
        assert_eq!(page, PaginationOptions::new(3, 20));
    }

    #[test]
    fn operations_serialize_canonically() {
        let json = serde_json::to_string(&FilterItem::new("ncontains", "x")).unwrap();
        assert_eq!(json, r#"{"operation":"NotContains","value":"x","isPreset":false}"#);
    }

    #[test]
    fn clamp_raises_to_minimum() {
        let page = PaginationOptions::new(0, -4).clamped();
        assert_eq!(page, PaginationOptions::new(1, 1));
        assert_eq!(PaginationOptions::new(3, 10).skip(), 20);
    }

    #[test]
    fn skip_and_take_are_total() {
        assert_eq!(PaginationOptions::new(i64::MIN, 10).skip(), 0);
        assert_eq!(PaginationOptions::new(5, -3).skip(), 0);
        assert_eq!(PaginationOptions::new(5, -3).take(), 0);
        assert_eq!(PaginationOptions::new(i64::MAX, i64::MAX).skip(), i64::MAX as usize);
    }
}
