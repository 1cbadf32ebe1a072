use crate::errors::{FqlError, Result};
use crate::shape::{Getter, Shape, Slot};
use crate::value::{FieldType, Value};
use std::any::Any;
use std::fmt;

/// A resolved dotted path: one getter per segment plus the leaf's declared type.
#[derive(Clone)]
pub struct Accessor {
    path: String,
    steps: Vec<Getter>,
    leaf: FieldType,
}

impl Accessor {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn leaf_type(&self) -> &FieldType {
        &self.leaf
    }

    /// Read the leaf value; any absent object along the way yields null.
    pub fn read(&self, record: &dyn Any) -> Value {
        let Some((last, parents)) = self.steps.split_last() else {
            return Value::Null;
        };
        let mut current = record;
        for step in parents {
            match step(current) {
                Slot::Object(next) => current = next,
                Slot::Value(_) | Slot::Null => return Value::Null,
            }
        }
        match last(current) {
            Slot::Value(value) => value,
            Slot::Object(_) | Slot::Null => Value::Null,
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("path", &self.path)
            .field("leaf", &self.leaf)
            .finish()
    }
}

/// Walk `path` segment by segment against `shape`.
///
/// Segments match field names exactly. The error always reports the full
/// path and the root model, never just the segment that failed.
pub fn resolve(shape: &Shape, path: &str) -> Result<Accessor> {
    if path.trim().is_empty() {
        return Err(FqlError::EmptyField);
    }
    let not_found = || FqlError::FieldNotFound {
        path: path.to_string(),
        model: shape.name().to_string(),
    };

    let mut owner = Some(shape);
    let mut steps = Vec::new();
    let mut leaf = None;
    for segment in path.split('.') {
        // a scalar cannot have members
        let current = owner.ok_or_else(not_found)?;
        let field = current.field(segment).ok_or_else(not_found)?;
        steps.push(field.get.clone());
        owner = match field.field_type() {
            FieldType::Object(nested) => Some(nested.get()),
            _ => None,
        };
        leaf = Some(field.field_type().clone());
    }

    Ok(Accessor {
        path: path.to_string(),
        steps,
        leaf: leaf.ok_or_else(not_found)?,
    })
}
