#![allow(dead_code)]

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use fql_filter::{FieldType, Model, Shape, ShapeBuilder};
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Shipped,
    Delivered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

impl Model for Address {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Address>::new("Address")
                .field("City", FieldType::String, |a| a.city.as_str().into())
                .field("Zip", FieldType::String, |a| a.zip.as_str().into())
                .build()
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub name: String,
    pub total: BigDecimal,
    pub paid: bool,
    pub status: Status,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub address: Address,
    pub billing: Option<Address>,
}

impl Model for Order {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Order>::new("Order")
                .field("Id", FieldType::Int, |o| o.id.into())
                .field("Name", FieldType::String, |o| o.name.as_str().into())
                .field("Total", FieldType::Decimal, |o| o.total.clone().into())
                .field("Paid", FieldType::Bool, |o| o.paid.into())
                .enumeration("Status", &["Pending", "Shipped", "Delivered"], |o| o.status as usize)
                .field("StartDate", FieldType::Date, |o| o.start_date.into())
                .field("EndDate", FieldType::Date, |o| o.end_date.into())
                .nested("Address", |o| Some(&o.address))
                .nested("Billing", |o| o.billing.as_ref())
                .build()
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn order(id: i64, name: &str) -> Order {
    Order {
        id,
        name: name.to_string(),
        total: BigDecimal::from(id),
        paid: id % 2 == 0,
        status: Status::Pending,
        start_date: date(2024, 1, 1),
        end_date: None,
        address: Address {
            city: "Seattle".into(),
            zip: "98101".into(),
        },
        billing: None,
    }
}

/// A small fixed data set covering every field kind.
pub fn orders() -> Vec<Order> {
    vec![
        Order {
            total: BigDecimal::from_str("250.00").unwrap(),
            status: Status::Shipped,
            end_date: Some(date(2024, 2, 1)),
            ..order(101, "John Smith")
        },
        Order {
            total: BigDecimal::from_str("19.99").unwrap(),
            address: Address {
                city: "Portland".into(),
                zip: "97201".into(),
            },
            ..order(50, "Jane Doe")
        },
        Order {
            total: BigDecimal::from_str("99.50").unwrap(),
            status: Status::Delivered,
            start_date: date(2024, 3, 10),
            end_date: Some(date(2024, 3, 1)),
            billing: Some(Address {
                city: "Boston".into(),
                zip: "02108".into(),
            }),
            ..order(150, "Jane Roe")
        },
        order(200, "Bob Stone"),
        Order {
            status: Status::Delivered,
            end_date: Some(date(2024, 6, 30)),
            ..order(120, "Johnny Cash")
        },
    ]
}

pub fn ids(records: &[Order]) -> Vec<i64> {
    records.iter().map(|o| o.id).collect()
}
