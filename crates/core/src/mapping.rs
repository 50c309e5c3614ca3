//! Field mappings: template field → dataset column bindings for one job.

use serde::{Deserialize, Serialize};

/// Binds one template field to one dataset column for a generation run.
///
/// `format` carries an optional transform spec dispatched by prefix:
/// `date:<pattern>`, `number:<spec>` or `text:<template>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Template field name; unique within the job's mapping list.
    pub field: String,
    /// 1-based dataset column number.
    pub column: u32,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Render order on the page; mappings are drawn ascending.
    #[serde(default)]
    pub order: u32,
}

impl FieldMapping {
    pub fn new(field: impl Into<String>, column: u32) -> Self {
        Self {
            field: field.into(),
            column,
            default_value: None,
            format: None,
            required: false,
            order: 0,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}
