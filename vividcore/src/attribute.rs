use vividset::ValueSet;

use crate::utils::error::{VividError, VividResult};

/// A labelled attribute and the values it may take.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    label: String,
    possible_values: ValueSet,
}

impl Attribute {
    pub fn new(label: impl Into<String>, possible_values: impl Into<ValueSet>) -> VividResult<Self> {
        let label = label.into();
        let possible_values = possible_values.into();
        if possible_values.is_empty() {
            return Err(VividError::EmptyAttribute { label });
        }
        Ok(Self {
            label,
            possible_values,
        })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn possible_values(&self) -> &ValueSet {
        &self.possible_values
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.possible_values)
    }
}
