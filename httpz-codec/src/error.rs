use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpZErrorKind {
    /// The input does not follow the message grammar at some point.
    Format,
    /// A model field is missing, empty or of the wrong shape.
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", details_suffix(.details))]
pub struct HttpZError {
    pub kind: HttpZErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl HttpZError {
    pub fn format(message: impl Into<String>) -> Self {
        Self {
            kind: HttpZErrorKind::Format,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: HttpZErrorKind::Validation,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_format(&self) -> bool {
        self.kind == HttpZErrorKind::Format
    }

    pub fn is_validation(&self) -> bool {
        self.kind == HttpZErrorKind::Validation
    }
}

fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(details) => format!(" ({details})"),
        None => String::new(),
    }
}
