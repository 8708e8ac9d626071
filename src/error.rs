//! Error types for the entry form
//!
//! Every variant is a user input error: it ends the current save attempt,
//! never the application.

use std::fmt;

use thiserror::Error;

use crate::form::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} required")]
    MissingField(Field),

    #[error("{0} not a valid number")]
    InvalidNumber(Field),

    #[error("Persona already exists")]
    DuplicateRecord,

    #[error("row {0} no longer exists")]
    RowNotFound(usize),
}

impl FormError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            FormError::MissingField(field) | FormError::InvalidNumber(field) => Some(*field),
            FormError::DuplicateRecord | FormError::RowNotFound(_) => None,
        }
    }
}

/// Collected validation errors, in field order.
///
/// Displays as one error per line, which is what the alert shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FormError>);

impl FormErrors {
    pub fn new() -> Self {
        FormErrors(Vec::new())
    }

    pub fn push(&mut self, error: FormError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormError> {
        self.0.iter()
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

impl std::error::Error for FormErrors {}

impl From<FormError> for FormErrors {
    fn from(error: FormError) -> Self {
        FormErrors(vec![error])
    }
}

impl<'a> IntoIterator for &'a FormErrors {
    type Item = &'a FormError;
    type IntoIter = std::slice::Iter<'a, FormError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
