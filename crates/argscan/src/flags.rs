use indexmap::IndexMap;

use crate::param::Param;

/// Lookup table from every declared flag token to its owning parameter.
///
/// When two parameters declare the same token the later declaration wins; the
/// collision is logged, not rejected. Unknown flags are a parse-time concern.
#[derive(Debug, Clone, Default)]
pub struct FlagIndex<'a> {
    entries: IndexMap<&'a str, &'a Param>,
}

impl<'a> FlagIndex<'a> {
    pub fn build(params: &'a [Param]) -> Self {
        let mut entries: IndexMap<&'a str, &'a Param> = IndexMap::new();
        for param in params.iter().filter(|p| p.is_flagged()) {
            for flag in param.flags() {
                if let Some(prev) = entries.insert(flag.as_str(), param) {
                    if prev.id() != param.id() {
                        tracing::warn!(
                            flag = flag.as_str(),
                            previous = prev.id(),
                            current = param.id(),
                            "flag declared by two parameters; the later one wins"
                        );
                    }
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, flag: &str) -> Option<&'a Param> {
        self.entries.get(flag).copied()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.entries.contains_key(flag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Param)> + '_ {
        self.entries.iter().map(|(flag, param)| (*flag, *param))
    }
}
