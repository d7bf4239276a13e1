//! JSON parameter declarations for `argscan`.
//!
//! A command spec file looks like:
//!
//! ```json
//! {
//!   "name": "fetch",
//!   "summary": "Download a file",
//!   "params": [
//!     { "id": "verbose", "flags": ["v", "verbose"], "isSwitch": true },
//!     { "id": "retries", "flags": "r", "defaultValue": "3", "validator": "int" },
//!     { "id": "url", "required": true, "validator": { "regex": "^https?://" } }
//!   ]
//! }
//! ```
//!
//! Descriptors map one-to-one onto [`argscan::ParamDef`]. Validators are
//! limited to what JSON can express: built-in names, allowed-value lists,
//! patterns, numeric ranges and queues of those.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use argscan::{ParamDef, Parser, ValidatorSpec, validators};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid command spec: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter {param}: invalid pattern `{pattern}`")]
    InvalidPattern {
        param: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("parameter {param}: unknown validator `{name}`")]
    UnknownValidator { param: String, name: String },
    #[error("parameter {param}: empty range {min}..{max}")]
    InvalidRange { param: String, min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// A named command and its parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDescriptor>,
}

/// One flag or a list of flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flags {
    One(String),
    Many(Vec<String>),
}

impl Default for Flags {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Flags {
    fn is_empty(&self) -> bool {
        matches!(self, Self::Many(flags) if flags.is_empty())
    }

    fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(flag) => vec![flag.clone()],
            Self::Many(flags) => flags.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Flags::is_empty")]
    pub flags: Flags,
    #[serde(default)]
    pub is_switch: bool,
    #[serde(default)]
    pub optional_value: bool,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub greedy: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorDescriptor>,
}

/// Validators as they can be written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidatorDescriptor {
    /// `number`, `int`, `json`, `boolean` or `strictBoolean`.
    Named(String),
    OneOf(Vec<Value>),
    Regex { regex: PatternDescriptor },
    Range { range: [f64; 2] },
    Queue { queue: Vec<ValidatorDescriptor> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternDescriptor {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        pattern: String,
        #[serde(default)]
        case_insensitive: bool,
    },
}

impl ValidatorDescriptor {
    /// Build the validator specifier. `param` only labels errors.
    pub fn to_spec(&self, param: &str) -> Result<ValidatorSpec> {
        let spec = match self {
            Self::Named(name) => match name.as_str() {
                "number" | "int" | "json" | "boolean" => ValidatorSpec::Named(name.clone()),
                "strictBoolean" => validators::boolean(true).into(),
                _ => {
                    return Err(SchemaError::UnknownValidator {
                        param: param.to_string(),
                        name: name.clone(),
                    });
                }
            },
            Self::OneOf(values) => ValidatorSpec::OneOf(values.clone()),
            Self::Regex { regex } => {
                let (pattern, case_insensitive) = match regex {
                    PatternDescriptor::Plain(p) => (p, false),
                    PatternDescriptor::Detailed {
                        pattern,
                        case_insensitive,
                    } => (pattern, *case_insensitive),
                };
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|source| SchemaError::InvalidPattern {
                        param: param.to_string(),
                        pattern: pattern.clone(),
                        source,
                    })?;
                ValidatorSpec::Pattern(re)
            }
            Self::Range { range: [min, max] } => {
                if min > max || min.is_nan() || max.is_nan() {
                    return Err(SchemaError::InvalidRange {
                        param: param.to_string(),
                        min: *min,
                        max: *max,
                    });
                }
                validators::range(*min, *max).into()
            }
            Self::Queue { queue } => ValidatorSpec::Queue(
                queue
                    .iter()
                    .map(|stage| stage.to_spec(param))
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(spec)
    }
}

impl ParamDescriptor {
    /// Convert into a parameter definition. `ordinal` labels errors for
    /// descriptors without an id or name.
    pub fn to_def(&self, ordinal: usize) -> Result<ParamDef> {
        let label = self
            .id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("#{ordinal}"));

        Ok(ParamDef {
            id: self.id.clone(),
            name: self.name.clone(),
            flags: self.flags.to_vec(),
            is_switch: self.is_switch,
            optional_value: self.optional_value,
            special: self.special,
            greedy: self.greedy,
            multiple: self.multiple,
            default_value: self.default_value.clone(),
            help: self.help.clone(),
            usage: self.usage.clone(),
            required: self.required,
            validator: self
                .validator
                .as_ref()
                .map(|v| v.to_spec(&label))
                .transpose()?,
        })
    }
}

impl CommandSpec {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: Self = text.parse()?;
        tracing::debug!(path = %path.display(), params = spec.params.len(), "loaded command spec");
        Ok(spec)
    }

    pub fn param_defs(&self) -> Result<Vec<ParamDef>> {
        self.params
            .iter()
            .enumerate()
            .map(|(ordinal, p)| p.to_def(ordinal))
            .collect()
    }

    pub fn parser(&self) -> Result<Parser> {
        Ok(Parser::new(&self.param_defs()?))
    }
}

impl FromStr for CommandSpec {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
