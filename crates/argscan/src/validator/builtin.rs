//! Built-in validators.

use regex::Regex;
use serde_json::Value;

use super::{Validator, ValidatorError, ValidatorErrorKind, ValidatorSpec, resolve};
use crate::value;

/// Parse a numeric literal into a floating-point number.
pub fn number() -> Validator {
    Validator::map(|v| {
        if v.is_number() {
            return Ok(v);
        }
        value::number(&v)
            .map(Value::from)
            .ok_or_else(|| ValidatorError::new(ValidatorErrorKind::NumberExpected, "Number expected"))
    })
}

/// Parse an integer. The literal must be numeric and have no fractional part,
/// so `12.4` is rejected while `12` yields `12`.
pub fn int() -> Validator {
    Validator::map(|v| {
        value::number(&v)
            .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
            .map(|n| Value::from(n as i64))
            .ok_or_else(|| ValidatorError::new(ValidatorErrorKind::IntegerExpected, "Integer expected"))
    })
}

/// Parse the value as JSON.
pub fn json() -> Validator {
    Validator::map(parse_json)
}

/// Parse the value as JSON, then hand the parsed structure to `transform`.
pub fn json_with(transform: Validator) -> Validator {
    Validator::new(move |v, ctx| {
        let parsed = parse_json(v)?;
        transform.call(parsed, ctx)
    })
}

fn parse_json(v: Value) -> Result<Value, ValidatorError> {
    match v {
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|_| ValidatorError::new(ValidatorErrorKind::JsonExpected, "JSON expected")),
        other => Ok(other),
    }
}

const TRUTHY: &[&str] = &["on", "t", "true", "y", "yes"];
const FALSY: &[&str] = &["off", "f", "false", "n", "no"];

/// Case-insensitive boolean. The lenient set accepts `on/t/true/y/yes` and
/// `off/f/false/n/no`; `strict` accepts only `true` and `false`.
pub fn boolean(strict: bool) -> Validator {
    Validator::map(move |v| {
        if let Value::Bool(_) = v {
            return Ok(v);
        }
        let text = value::text(&v).to_ascii_lowercase();
        let (truthy, falsy) = if strict {
            (&["true"][..], &["false"][..])
        } else {
            (TRUTHY, FALSY)
        };
        if truthy.contains(&text.as_str()) {
            Ok(Value::Bool(true))
        } else if falsy.contains(&text.as_str()) {
            Ok(Value::Bool(false))
        } else {
            Err(ValidatorError::new(
                ValidatorErrorKind::BooleanExpected,
                "Boolean expected",
            ))
        }
    })
}

/// The value must equal one of `allowed`. Equality is strict: the string `"1"`
/// does not equal the number `1`.
pub fn one_of(allowed: Vec<Value>) -> Validator {
    let message = expected_either(&allowed);
    Validator::map(move |v| {
        if allowed.contains(&v) {
            Ok(v)
        } else {
            Err(ValidatorError::new(ValidatorErrorKind::NotAllowed, message.clone()))
        }
    })
}

fn expected_either(allowed: &[Value]) -> String {
    let names: Vec<String> = allowed.iter().map(value::display).collect();
    match names.split_last() {
        None => "Expected either".to_string(),
        Some((last, [])) => format!("Expected either {last}"),
        Some((last, init)) => format!("Expected either {} or {last}", init.join(", ")),
    }
}

/// The value's text must match `re`.
pub fn pattern(re: Regex) -> Validator {
    Validator::map(move |v| {
        if re.is_match(&value::text(&v)) {
            Ok(v)
        } else {
            Err(ValidatorError::new(
                ValidatorErrorKind::NoMatch,
                format!("Expected /{}/", re.as_str()),
            ))
        }
    })
}

/// The value must be numeric and lie within `min..=max`. Usually queued after
/// [`int`] or [`number`].
pub fn range(min: f64, max: f64) -> Validator {
    Validator::map(move |v| match value::number(&v) {
        Some(n) if n >= min && n <= max => Ok(v),
        _ => Err(ValidatorError::new(
            ValidatorErrorKind::OutOfRange,
            format!("Must be between {min} and {max}"),
        )),
    })
}

/// Compose specifiers: each stage's output feeds the next stage. Specifiers
/// that resolve to nothing are skipped.
pub fn queue(stages: Vec<ValidatorSpec>) -> Validator {
    let stages: Vec<Validator> = stages.into_iter().filter_map(resolve).collect();
    Validator::new(move |v, ctx| {
        let mut current = v;
        for stage in &stages {
            match stage.call(current, ctx)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    })
}
