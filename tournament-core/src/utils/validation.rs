//! Validation plumbing used at two layers:
//!
//! - `FieldError`/`ValidationErrors`: a single bad field on an entity under
//!   construction, surfaced through `CoreError::Validation`.
//! - `ValidationIssue`/`ValidationResult`: the richer errors+warnings report
//!   produced by the Validator component (team composition, event
//!   entries, heat constraints).

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{self, Display},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    code: String,
    message: String,
    params: HashMap<String, String>,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}: {}", self.field, self.code)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        for (key, value) in self.params.iter() {
            write!(f, "\n{key}: {value}")?;
        }
        Ok(())
    }
}

impl FieldError {
    pub fn get_field(&self) -> &str {
        &self.field
    }
    pub fn get_code(&self) -> &str {
        self.code.as_str()
    }
    pub fn get_message(&self) -> &str {
        &self.message
    }
    pub fn builder() -> FieldErrorBuilder<NoField> {
        FieldErrorBuilder {
            field: NoField {},
            code: String::new(),
            message: String::new(),
            params: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Error, Default, Serialize, Deserialize, PartialEq, Eq)]
#[error("validation failed with {} error(s)", errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }
    pub fn add(&mut self, err: FieldError) {
        self.errors.push(err);
    }
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
    pub fn single(
        code: impl Into<String>,
        message: impl Into<String>,
        field: Option<String>,
        _entity_id: Option<Uuid>,
    ) -> Self {
        let mut b = FieldError::builder();
        if let Some(field) = field {
            b = b.set_field(field);
        } else {
            b = b.set_field("");
        }
        Self {
            errors: vec![b.add_user_defined_code(&code.into()).add_message(message).build()],
        }
    }
}

pub struct NoField {}
pub struct Field(String);

pub struct FieldErrorBuilder<F> {
    field: F,
    code: String,
    message: String,
    params: HashMap<String, String>,
}

impl FieldErrorBuilder<NoField> {
    pub fn set_field(self, field: impl Into<String>) -> FieldErrorBuilder<Field> {
        FieldErrorBuilder {
            field: Field(field.into()),
            code: self.code,
            message: self.message,
            params: self.params,
        }
    }
}

impl FieldErrorBuilder<Field> {
    pub fn add_required(mut self) -> Self {
        self.code = "required".into();
        self
    }
    pub fn add_invalid_format(mut self) -> Self {
        self.code = "invalid_format".into();
        self
    }
    pub fn add_user_defined_code(mut self, code: &str) -> Self {
        self.code = code.into();
        self
    }
    pub fn add_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
    pub fn add_params(mut self, key: String, value: impl Into<String>) -> Self {
        self.params.insert(key, value.into());
        self
    }
    pub fn build(self) -> FieldError {
        FieldError {
            field: self.field.0,
            code: self.code,
            message: self.message,
            params: self.params,
        }
    }
}

// ---------------------------------------------------------------------
// Validator-component errors+warnings report
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
    pub entity_id: Option<Uuid>,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        field: Option<String>,
        entity_id: Option<Uuid>,
    ) -> Self {
        ValidationIssue {
            code: code.into(),
            message: message.into(),
            field,
            entity_id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_error(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        field: Option<String>,
        entity_id: Option<Uuid>,
    ) {
        self.errors
            .push(ValidationIssue::new(code, message, field, entity_id));
    }

    pub fn add_warning(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        field: Option<String>,
        entity_id: Option<Uuid>,
    ) {
        self.warnings
            .push(ValidationIssue::new(code, message, field, entity_id));
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
