use log::warn;
use thiserror::Error;

/// A replicated-field declaration that cannot be woven. Each one is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeaveError {
    /// No method with the hook's name takes two parameters
    #[error("Could not find hook for '{type_name}.{field}', hook name '{hook}'. Method signature should be {expected}")]
    HookNotFound {
        type_name: String,
        field: String,
        hook: String,
        expected: String,
    },

    /// Two-parameter candidates exist but none takes the field type twice
    #[error("Wrong type for Parameter in hook for '{type_name}.{field}', hook name '{hook}'. Method signature should be {expected}")]
    HookSignatureMismatch {
        type_name: String,
        field: String,
        hook: String,
        expected: String,
    },

    /// Associated consts and statics are shared, not per-object state
    #[error("'{type_name}.{field}' cannot be static")]
    StaticField { type_name: String, field: String },

    /// Arrays have no change tracking of their own
    #[error("'{type_name}.{field}' has invalid type {ty}. Use ReplicatedList instead of arrays")]
    ArrayField {
        type_name: String,
        field: String,
        ty: String,
    },

    /// More replicated members than bits in the dirty mask
    #[error("'{type_name}' declares {count} replicated {kind}, but a dirty mask only holds {capacity}")]
    BitSpaceExhausted {
        type_name: String,
        kind: &'static str,
        count: usize,
        capacity: usize,
    },
}

impl WeaveError {
    /// Name of the type the error was reported against
    pub fn type_name(&self) -> &str {
        match self {
            WeaveError::HookNotFound { type_name, .. }
            | WeaveError::HookSignatureMismatch { type_name, .. }
            | WeaveError::StaticField { type_name, .. }
            | WeaveError::ArrayField { type_name, .. }
            | WeaveError::BitSpaceExhausted { type_name, .. } => type_name,
        }
    }

    /// Field the error points at, if it is about a single field
    pub fn field(&self) -> Option<&str> {
        match self {
            WeaveError::HookNotFound { field, .. }
            | WeaveError::HookSignatureMismatch { field, .. }
            | WeaveError::StaticField { field, .. }
            | WeaveError::ArrayField { field, .. } => Some(field),
            WeaveError::BitSpaceExhausted { .. } => None,
        }
    }
}

/// A suspicious but harmless declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeaveWarning {
    #[error("'{type_name}.{field}' has a #[replicated] marker. Replicated collections track their own changes and should not be marked")]
    RedundantCollectionMarker { type_name: String, field: String },
}

impl WeaveWarning {
    pub fn type_name(&self) -> &str {
        match self {
            WeaveWarning::RedundantCollectionMarker { type_name, .. } => type_name,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            WeaveWarning::RedundantCollectionMarker { field, .. } => field,
        }
    }
}

/// Every diagnostic found in a weave that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Weaving failed with {} error(s)", errors.len())]
pub struct WeaveFailure {
    pub errors: Vec<WeaveError>,
    pub warnings: Vec<WeaveWarning>,
}

/// Collects diagnostics across a whole weave instead of stopping at the first
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<WeaveError>,
    warnings: Vec<WeaveWarning>,
}

impl Diagnostics {
    pub fn error(&mut self, error: WeaveError) {
        self.errors.push(error);
    }

    pub fn warning(&mut self, warning: WeaveWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_parts(self) -> (Vec<WeaveError>, Vec<WeaveWarning>) {
        (self.errors, self.warnings)
    }
}
