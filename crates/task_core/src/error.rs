use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("validation_error - {message}")]
    Validation {
        fields: Vec<String>,
        message: String,
    },
    #[error("not_found - the task with id \"{0}\" does not exist")]
    NotFound(String),
    #[error("data_corruption - {0}")]
    DataCorruption(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("invalid_input - {0}")]
    InvalidInput(String),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new<R: Into<String>>(field: &'static str, reason: R) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = errors
            .iter()
            .map(|err| format!("{}: {}", err.field, err.reason))
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation {
            fields: errors.iter().map(|err| err.field.to_string()).collect(),
            message,
        }
    }

    pub fn invalid_field<R: Into<String>>(field: &'static str, reason: R) -> Self {
        Self::validation(vec![FieldError::new(field, reason)])
    }

    pub fn not_found<I: Into<String>>(id: I) -> Self {
        Self::NotFound(id.into())
    }

    pub fn data_corruption<M: Into<String>>(message: M) -> Self {
        Self::DataCorruption(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::DataCorruption(_) => "data_corruption",
            Self::Io(_) => "io_error",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// Names of the offending fields for validation failures, empty otherwise.
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &[],
        }
    }
}
