use std::fmt;
use std::sync::Arc;

/// Page sizes above this produce a validator warning.
pub const DEFAULT_LARGE_PAGE_SIZE: i64 = 1000;

type Converter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Per-call options shared by compile, validate and apply.
///
/// The field-name converter is applied to every field reference (filter
/// fields, preset values naming fields, sort fields) before resolution.
#[derive(Clone)]
pub struct Context {
    converter: Converter,
    pub(crate) large_page_size: i64,
}

impl Context {
    pub fn new() -> Self {
        Self {
            converter: Arc::new(|field: &str| field.to_string()),
            large_page_size: DEFAULT_LARGE_PAGE_SIZE,
        }
    }

    /// Context whose converter upper-cases the first letter of each field.
    pub fn pascal_case() -> Self {
        Self::new().with_converter(crate::compiler::to_pascal_case)
    }

    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.converter = Arc::new(converter);
        self
    }

    pub fn with_large_page_size(mut self, threshold: i64) -> Self {
        self.large_page_size = threshold;
        self
    }

    pub fn convert(&self, field: &str) -> String {
        (self.converter)(field)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("large_page_size", &self.large_page_size)
            .finish_non_exhaustive()
    }
}
