use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    User,
    Default,
    /// No meaningful value: unset with no default, or an optional-value switch
    /// given without a value or default.
    None,
}

/// Token index of a recorded value; a sequence for accumulating parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceIndex {
    One(usize),
    Many(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<SourceIndex>,
}

impl Source {
    pub(crate) fn unset() -> Self {
        Self {
            kind: SourceKind::None,
            index: None,
        }
    }

    pub(crate) fn record(&mut self, kind: SourceKind, index: usize, accumulates: bool) {
        self.kind = kind;
        if !accumulates {
            self.index = Some(SourceIndex::One(index));
            return;
        }
        match &mut self.index {
            Some(SourceIndex::Many(indices)) => indices.push(index),
            slot => *slot = Some(SourceIndex::Many(vec![index])),
        }
    }
}

pub type SourceMap = IndexMap<String, Source>;

/// A completed parse: every declared id mapped to its value (or default), in
/// declaration order, plus the source map when tracking was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matches {
    values: IndexMap<String, Value>,
    sources: Option<SourceMap>,
}

impl Matches {
    pub(crate) fn new(values: IndexMap<String, Value>, sources: Option<SourceMap>) -> Self {
        Self { values, sources }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// The value as a string slice, if it is a string.
    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Value::as_str)
    }

    /// Whether the value is set to something other than `null` / `false`.
    pub fn is_set(&self, id: &str) -> bool {
        !matches!(self.get(id), None | Some(Value::Null) | Some(Value::Bool(false)))
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }

    /// `None` unless the parse ran with tracking enabled.
    pub fn sources(&self) -> Option<&SourceMap> {
        self.sources.as_ref()
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.as_ref().and_then(|s| s.get(id))
    }

    /// Render as one JSON object. With tracking, sources are nested under
    /// `"$": { "source": { ... } }`.
    pub fn to_json(&self) -> Value {
        let mut out: Map<String, Value> = self
            .values
            .iter()
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();
        if let Some(sources) = &self.sources {
            let source = serde_json::to_value(sources).unwrap_or_default();
            let mut meta = Map::new();
            meta.insert("source".to_string(), source);
            out.insert("$".to_string(), Value::Object(meta));
        }
        Value::Object(out)
    }
}
