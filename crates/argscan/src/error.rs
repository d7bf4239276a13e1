use std::fmt;

use serde_json::Value;

use crate::validator::ValidatorError;

/// Why a parse was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// A flag token matched no declared parameter.
    UnknownOption,
    /// A value was given where none is accepted, or a positional token had no
    /// declared positional parameter left to bind to.
    UnexpectedValue,
    /// A value-taking flag was the last token.
    MissingValue,
    /// A non-accumulating parameter was bound twice.
    DuplicateOption,
    /// A validator rejected a value.
    ValidationError,
    /// A required parameter is still unset after defaulting.
    MissingParameter,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownOption => "unknownOption",
            Self::UnexpectedValue => "unexpectedValue",
            Self::MissingValue => "missingValue",
            Self::DuplicateOption => "duplicateOption",
            Self::ValidationError => "validationError",
            Self::MissingParameter => "missingParameter",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error kind produced by a parse.
///
/// Every failure aborts the parse; the first violation in token order wins.
/// Context fields are filled in where they are meaningful for the reason.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    reason: Reason,
    message: String,
    param: Option<String>,
    index: Option<usize>,
    flag: Option<String>,
    value: Option<Value>,
    #[source]
    validator: Option<ValidatorError>,
}

impl ParseError {
    pub(crate) fn new(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            param: None,
            index: None,
            flag: None,
            value: None,
            validator: None,
        }
    }

    pub(crate) fn with_param(mut self, id: &str) -> Self {
        self.param = Some(id.to_string());
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn with_flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.to_string());
        self
    }

    pub(crate) fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn with_validator(mut self, err: ValidatorError) -> Self {
        self.validator = Some(err);
        self
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Id of the offending parameter, if one was resolved.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Index of the token being processed when the error was raised.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The flag text for `UnknownOption` / `MissingValue`.
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref()
    }

    /// The raw value that was rejected.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The validator failure behind a `ValidationError`.
    pub fn validator_error(&self) -> Option<&ValidatorError> {
        self.validator.as_ref()
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
