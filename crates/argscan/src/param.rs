//! Parameter declarations.
//!
//! [`ParamDef`] is the loose, builder-style descriptor a caller writes;
//! [`normalize`] turns a list of them into canonical, immutable [`Param`]s with
//! every implicit default filled in.

use serde_json::Value;

use crate::validator::{Validator, ValidatorSpec, resolve};

/// A loosely specified option descriptor. Every field may be left unset.
#[derive(Debug, Clone, Default)]
pub struct ParamDef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub flags: Vec<String>,
    pub is_switch: bool,
    pub optional_value: bool,
    pub special: bool,
    pub greedy: bool,
    pub multiple: bool,
    pub default_value: Option<Value>,
    pub help: Option<String>,
    pub usage: Option<String>,
    pub required: bool,
    pub validator: Option<ValidatorSpec>,
}

impl ParamDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add one trigger token, e.g. `"f"` or `"foo"` (without dashes).
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn switch(mut self) -> Self {
        self.is_switch = true;
        self
    }

    pub fn optional_value(mut self) -> Self {
        self.optional_value = true;
        self
    }

    pub fn special(mut self) -> Self {
        self.special = true;
        self
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Custom usage text, replacing the generated one.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validator(mut self, spec: impl Into<ValidatorSpec>) -> Self {
        self.validator = Some(spec.into());
        self
    }
}

/// A canonical parameter.
///
/// A parameter is either flagged (it has at least one flag) or positional.
/// `greedy` only survives normalization on positional parameters;
/// `is_switch`, `optional_value` and `multiple` only on flagged ones.
#[derive(Debug, Clone)]
pub struct Param {
    id: String,
    name: String,
    flags: Vec<String>,
    is_switch: bool,
    optional_value: bool,
    special: bool,
    greedy: bool,
    multiple: bool,
    default_value: Value,
    help: Option<String>,
    usage: Option<String>,
    required: bool,
    validator: Option<Validator>,
}

impl Param {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name used in usage text and error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn is_switch(&self) -> bool {
        self.is_switch
    }

    pub fn optional_value(&self) -> bool {
        self.optional_value
    }

    pub fn special(&self) -> bool {
        self.special
    }

    pub fn greedy(&self) -> bool {
        self.greedy
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Whether repeated bindings accumulate into a sequence.
    pub(crate) fn accumulates(&self) -> bool {
        self.multiple || self.greedy
    }
}

/// Normalize descriptors into canonical parameters.
///
/// Never fails: an unset `id` becomes the ordinal position, an unset `name`
/// the id, and the default value is `false` for a non-multiple switch and
/// `null` otherwise. Descriptors are cloned, never aliased.
pub fn normalize(defs: &[ParamDef]) -> Vec<Param> {
    defs.iter()
        .enumerate()
        .map(|(ordinal, def)| normalize_one(ordinal, def))
        .collect()
}

fn normalize_one(ordinal: usize, def: &ParamDef) -> Param {
    let id = def.id.clone().unwrap_or_else(|| ordinal.to_string());
    let name = def.name.clone().unwrap_or_else(|| id.clone());

    let mut flags: Vec<String> = Vec::with_capacity(def.flags.len());
    for flag in &def.flags {
        if !flag.is_empty() && !flags.contains(flag) {
            flags.push(flag.clone());
        }
    }
    let flagged = !flags.is_empty();

    let is_switch = flagged && def.is_switch;
    let optional_value = is_switch && def.optional_value;
    let greedy = !flagged && def.greedy;
    let multiple = flagged && def.multiple;

    let default_value = match &def.default_value {
        Some(v) if !v.is_null() => v.clone(),
        _ if is_switch && !multiple => Value::Bool(false),
        _ => Value::Null,
    };

    Param {
        id,
        name,
        flags,
        is_switch,
        optional_value,
        special: def.special,
        greedy,
        multiple,
        default_value,
        help: def.help.clone(),
        usage: def.usage.clone(),
        required: def.required,
        validator: def.validator.clone().and_then(resolve),
    }
}
