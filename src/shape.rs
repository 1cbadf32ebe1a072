//! Model shapes: a per-type table of named fields and how to read them.
//!
//! A [`Shape`] stands in for runtime reflection. Each field carries its
//! declared [`FieldType`] and a type-erased getter that reads it from a
//! record passed as `&dyn Any`. Nested objects are followed by handing the
//! inner record back out as another `&dyn Any`, so a dotted path becomes a
//! chain of getters (see [`crate::path`]).
//!
//! Static models implement [`Model`] with a [`ShapeBuilder`] and cache the
//! result in a `OnceLock`:
//!
//! ```
//! use std::sync::OnceLock;
//! use fql_filter::{FieldType, Model, Shape, ShapeBuilder};
//!
//! struct User { id: i64, name: String }
//!
//! impl Model for User {
//!     fn shape() -> &'static Shape {
//!         static SHAPE: OnceLock<Shape> = OnceLock::new();
//!         SHAPE.get_or_init(|| {
//!             ShapeBuilder::<User>::new("User")
//!                 .field("Id", FieldType::Int, |u| u.id.into())
//!                 .field("Name", FieldType::String, |u| u.name.as_str().into())
//!                 .build()
//!         })
//!     }
//! }
//!
//! assert!(User::shape().field("Name").is_some());
//! ```
//!
//! Records that only exist as JSON use [`Shape::from_json`] instead.

use crate::coerce::parse_literal;
use crate::errors::{FqlError, Result};
use crate::value::{FieldType, Value};
use bigdecimal::BigDecimal;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// What a getter produced for one record.
pub enum Slot<'a> {
    Value(Value),
    Object(&'a dyn Any),
    Null,
}

pub(crate) type Getter = Arc<dyn for<'a> Fn(&'a dyn Any) -> Slot<'a> + Send + Sync>;

// Pins the higher-ranked signature so closures may return borrows of their input.
fn getter<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> Slot<'a>,
{
    f
}

/// Types whose fields can be addressed by name in a filter query.
pub trait Model: 'static {
    fn shape() -> &'static Shape;
}

/// Reference to the shape of a nested object field.
#[derive(Clone)]
pub enum ShapeRef {
    /// Resolved lazily, so self-referencing models do not recurse at build time.
    Static(fn() -> &'static Shape),
    Shared(Arc<Shape>),
}

impl ShapeRef {
    pub fn get(&self) -> &Shape {
        match self {
            ShapeRef::Static(shape) => shape(),
            ShapeRef::Shared(shape) => shape,
        }
    }
}

#[derive(Clone)]
pub struct FieldDef {
    name: String,
    ty: FieldType,
    pub(crate) get: Getter,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }
}

/// Named fields of one model type, looked up by exact (case-sensitive) name.
pub struct Shape {
    name: String,
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl Shape {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    fn from_defs(name: String, defs: Vec<FieldDef>) -> Self {
        let mut fields: Vec<FieldDef> = Vec::with_capacity(defs.len());
        let mut index = HashMap::with_capacity(defs.len());
        for def in defs {
            // a repeated name replaces the earlier definition
            match index.get(&def.name) {
                Some(&i) => fields[i] = def,
                None => {
                    index.insert(def.name.clone(), fields.len());
                    fields.push(def);
                }
            }
        }
        Self {
            name,
            fields,
            index,
        }
    }

    /// Build a shape for `serde_json::Value` records from a schema document:
    ///
    /// ```json
    /// { "name": "Order",
    ///   "fields": { "Id": "int", "Status": { "enum": ["Open", "Closed"] },
    ///               "Address": { "name": "Address", "fields": { "City": "string" } } } }
    /// ```
    pub fn from_json(schema: &serde_json::Value) -> Result<Arc<Shape>> {
        let name = schema
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| FqlError::Schema("shape is missing a string `name`".into()))?;
        let fields = schema
            .get("fields")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| FqlError::Schema(format!("shape `{name}` is missing a `fields` object")))?;

        let mut defs = Vec::with_capacity(fields.len());
        for (field, decl) in fields {
            let ty = json_field_type(name, field, decl)?;
            defs.push(FieldDef {
                name: field.clone(),
                get: json_getter(field.clone(), ty.clone()),
                ty,
            });
        }
        Ok(Arc::new(Shape::from_defs(name.to_string(), defs)))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.fields.iter().map(|d| (&d.name, &d.ty)).collect();
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("fields", &fields)
            .finish()
    }
}

fn json_field_type(shape: &str, field: &str, decl: &serde_json::Value) -> Result<FieldType> {
    if let Some(kind) = decl.as_str() {
        return match kind {
            "bool" => Ok(FieldType::Bool),
            "int" => Ok(FieldType::Int),
            "float" => Ok(FieldType::Float),
            "decimal" => Ok(FieldType::Decimal),
            "string" => Ok(FieldType::String),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            other => Err(FqlError::Schema(format!(
                "unknown type `{other}` for field `{shape}.{field}`"
            ))),
        };
    }
    if let Some(members) = decl.get("enum").and_then(serde_json::Value::as_array) {
        let members = members
            .iter()
            .map(|m| {
                m.as_str().map(str::to_string).ok_or_else(|| {
                    FqlError::Schema(format!("enum members of `{shape}.{field}` must be strings"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(FieldType::Enum(members.into()));
    }
    if decl.get("fields").is_some() {
        return Ok(FieldType::Object(ShapeRef::Shared(Shape::from_json(decl)?)));
    }
    Err(FqlError::Schema(format!("invalid declaration for field `{shape}.{field}`")))
}

fn json_getter(key: String, ty: FieldType) -> Getter {
    Arc::new(getter(move |record: &dyn Any| {
        let Some(raw) = record
            .downcast_ref::<serde_json::Value>()
            .and_then(|obj| obj.get(&key))
        else {
            return Slot::Null;
        };
        match (&ty, raw) {
            (_, serde_json::Value::Null) => Slot::Null,
            (FieldType::Object(_), serde_json::Value::Object(_)) => Slot::Object(raw),
            (_, raw) => json_scalar(raw, &ty).map_or(Slot::Null, Slot::Value),
        }
    }))
}

// Values of the wrong JSON kind read as null rather than failing the filter.
fn json_scalar(raw: &serde_json::Value, ty: &FieldType) -> Option<Value> {
    use serde_json::Value as Json;
    match (ty, raw) {
        (FieldType::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::Int, Json::Number(n)) => n.as_i64().map(Value::Int),
        (FieldType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (FieldType::Decimal, Json::Number(n)) => {
            n.to_string().parse::<BigDecimal>().ok().map(Value::Decimal)
        }
        (FieldType::Object(_), _) => None,
        (_, Json::String(s)) => parse_literal(s, ty).ok(),
        _ => None,
    }
}

/// Incrementally declares the fields of `T`.
pub struct ShapeBuilder<T> {
    name: String,
    fields: Vec<FieldDef>,
    _model: PhantomData<fn(&T)>,
}

impl<T: 'static> ShapeBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Scalar field. `read` should return [`Value::Null`] for absent values.
    pub fn field<F>(self, name: &str, ty: FieldType, read: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let get = getter(move |record: &dyn Any| match record.downcast_ref::<T>() {
            Some(record) => Slot::Value(read(record)),
            None => Slot::Null,
        });
        self.push(name, ty, Arc::new(get))
    }

    /// Enumeration field read as the ordinal of one of `members`.
    pub fn enumeration<F>(self, name: &str, members: &[&str], ordinal: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        let names: Arc<[String]> = members.iter().map(|m| m.to_string()).collect();
        self.field(name, FieldType::Enum(names.clone()), move |record| {
            let index = ordinal(record);
            match names.get(index) {
                Some(name) => Value::Enum {
                    ordinal: index,
                    name: name.clone(),
                },
                None => Value::Null,
            }
        })
    }

    /// Nested model field; `None` reads as null for every deeper segment.
    pub fn nested<U, F>(self, name: &str, read: F) -> Self
    where
        U: Model,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        let get = getter(move |record: &dyn Any| {
            match record.downcast_ref::<T>().and_then(|record| read(record)) {
                Some(inner) => Slot::Object(inner),
                None => Slot::Null,
            }
        });
        self.push(name, FieldType::Object(ShapeRef::Static(U::shape)), Arc::new(get))
    }

    pub fn build(self) -> Shape {
        Shape::from_defs(self.name, self.fields)
    }

    fn push(mut self, name: &str, ty: FieldType, get: Getter) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            ty,
            get,
        });
        self
    }
}
