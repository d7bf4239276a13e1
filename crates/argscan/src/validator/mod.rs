//! Validators check and transform bound values.
//!
//! Every accepted specifier shape is resolved once, at normalization time, into
//! a [`Validator`]: a uniform `(value, context) -> value` callable. A validator
//! may reject the value, replace it, or drop the occurrence altogether by
//! returning `Ok(None)`.

pub mod builtin;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::param::Param;
use crate::result::SourceKind;

/// What a validator produces: the (possibly replaced) value, or `None` to drop
/// this occurrence without recording it.
pub type Outcome = Result<Option<Value>, ValidatorError>;

type ValidateFn = dyn Fn(Value, &ValidationContext<'_>) -> Outcome + Send + Sync;

/// Everything a validator may look at besides the value itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// The parameter the value is being bound to.
    pub param: &'a Param,
    pub id: &'a str,
    /// `User` for tokens from the input, `Default` / `None` for optional-value
    /// switches given without a value.
    pub source: SourceKind,
    /// Index of the token the value came from.
    pub index: usize,
    /// Values bound so far, in binding order.
    pub result: &'a IndexMap<String, Value>,
    pub params: &'a [Param],
    pub args: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorErrorKind {
    NumberExpected,
    IntegerExpected,
    JsonExpected,
    BooleanExpected,
    /// Not one of the allowed values.
    NotAllowed,
    /// Did not match the pattern.
    NoMatch,
    OutOfRange,
    /// Raised by a user-supplied validator.
    Custom,
}

/// A rejected value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidatorError {
    kind: ValidatorErrorKind,
    message: String,
}

impl ValidatorError {
    pub fn new(kind: ValidatorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ValidatorErrorKind::Custom, message)
    }

    pub fn kind(&self) -> ValidatorErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ValidatorError {
    fn from(message: String) -> Self {
        Self::custom(message)
    }
}

impl From<&str> for ValidatorError {
    fn from(message: &str) -> Self {
        Self::custom(message)
    }
}

/// A resolved validation/transformation callable.
#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value, &ValidationContext<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A validator that ignores the context and never drops.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        Self::new(move |value, _| f(value).map(Some))
    }

    pub fn call(&self, value: Value, ctx: &ValidationContext<'_>) -> Outcome {
        (self.0)(value, ctx)
    }

    /// Replace the failure message, keeping the failure kind.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |value, ctx| {
            self.call(value, ctx)
                .map_err(|err| ValidatorError::new(err.kind(), message.clone()))
        })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// An object exposing a single validation method.
pub trait Validate: Send + Sync {
    fn validate(&self, value: Value, ctx: &ValidationContext<'_>) -> Outcome;
}

/// The accepted validator specifier shapes.
#[derive(Clone)]
pub enum ValidatorSpec {
    /// A callable, used as-is.
    Func(Validator),
    /// The value must equal one of these entries.
    OneOf(Vec<Value>),
    /// The value must match.
    Pattern(Regex),
    /// A built-in by name: `number`, `int`, `json` or `boolean`.
    Named(String),
    Object(Arc<dyn Validate>),
    /// Stages applied in order; the first drop or failure ends the chain.
    Queue(Vec<ValidatorSpec>),
}

impl ValidatorSpec {
    pub fn object<V: Validate + 'static>(obj: V) -> Self {
        Self::Object(Arc::new(obj))
    }
}

impl fmt::Debug for ValidatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Func(..)"),
            Self::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Queue(stages) => f.debug_tuple("Queue").field(stages).finish(),
        }
    }
}

impl From<Validator> for ValidatorSpec {
    fn from(v: Validator) -> Self {
        Self::Func(v)
    }
}

impl From<Regex> for ValidatorSpec {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<&str> for ValidatorSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<Vec<Value>> for ValidatorSpec {
    fn from(values: Vec<Value>) -> Self {
        Self::OneOf(values)
    }
}

/// Resolve a specifier into a callable. Unknown built-in names resolve to `None`,
/// which leaves raw tokens unmodified.
pub fn resolve(spec: ValidatorSpec) -> Option<Validator> {
    match spec {
        ValidatorSpec::Func(v) => Some(v),
        ValidatorSpec::OneOf(values) => Some(builtin::one_of(values)),
        ValidatorSpec::Pattern(re) => Some(builtin::pattern(re)),
        ValidatorSpec::Named(name) => match name.as_str() {
            "number" => Some(builtin::number()),
            "int" => Some(builtin::int()),
            "json" => Some(builtin::json()),
            "boolean" => Some(builtin::boolean(false)),
            other => {
                tracing::warn!(name = other, "unknown built-in validator; ignoring");
                None
            }
        },
        ValidatorSpec::Object(obj) => Some(Validator::new(move |value, ctx| obj.validate(value, ctx))),
        ValidatorSpec::Queue(stages) => Some(builtin::queue(stages)),
    }
}
