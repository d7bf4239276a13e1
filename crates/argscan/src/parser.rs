//! The scan-and-bind engine.
//!
//! Tokens are consumed left to right. A token starting with `-` (other than a
//! lone `-`) is a flag token; everything else, and everything after a bare
//! `--`, is positional. Each step consumes at least one token:
//!
//! - `--name`, `--name=value`, `--name:value`, `--name value`
//! - `-abc` clusters: each character is a flag; a non-switch takes the rest
//!   of the token as its value (`-Dkey=val`, `-ofile`), the last character may
//!   take an attached value (`-f:x`) or the next token (`-f x`).
//! - positional tokens bind to the n-th positional parameter, unless a greedy
//!   one is reached first, which absorbs every remaining positional token.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ParseError, ParseResult, Reason};
use crate::flags::FlagIndex;
use crate::help;
use crate::param::{Param, ParamDef, normalize};
use crate::result::{Matches, Source, SourceKind, SourceMap};
use crate::validator::ValidationContext;

/// Options for a single parse call.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Record where each value came from.
    pub track: bool,
    /// Token source for [`Parser::parse_env`]; process arguments otherwise.
    pub args: Option<Vec<String>>,
}

impl ParseOptions {
    pub fn tracked() -> Self {
        Self {
            track: true,
            args: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }
}

/// A set of declared parameters.
///
/// Parsing takes `&self` and keeps all of its state local, so one parser can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    params: Vec<Param>,
}

impl Parser {
    pub fn new(defs: &[ParamDef]) -> Self {
        Self {
            params: normalize(defs),
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Replace every declared parameter.
    pub fn set_params(&mut self, defs: &[ParamDef]) -> &[Param] {
        self.params = normalize(defs);
        &self.params
    }

    pub fn param(&self, id: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.id() == id)
    }

    pub fn param_by_flag(&self, flag: &str) -> Option<&Param> {
        self.flags().get(flag)
    }

    /// Parameters keyed by id, in declaration order.
    pub fn assoc(&self) -> IndexMap<&str, &Param> {
        self.params.iter().map(|p| (p.id(), p)).collect()
    }

    pub fn flags(&self) -> FlagIndex<'_> {
        FlagIndex::build(&self.params)
    }

    pub fn parse<S: AsRef<str>>(&self, args: &[S], options: &ParseOptions) -> ParseResult<Matches> {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        scan(&self.params, &args, options.track)
    }

    /// Parse `options.args`, or the process arguments without the program name.
    pub fn parse_env(&self, options: &ParseOptions) -> ParseResult<Matches> {
        let args: Vec<String> = match &options.args {
            Some(args) => args.clone(),
            None => std::env::args().skip(1).collect(),
        };
        scan(&self.params, &args, options.track)
    }

    /// One line listing every parameter, optional ones in brackets.
    pub fn usage(&self) -> String {
        help::usage(&self.params)
    }

    pub fn param_usage(&self, param: &Param) -> String {
        help::param_usage(param)
    }

    /// Per-parameter usage, help text and defaults.
    pub fn help(&self) -> String {
        help::help(&self.params)
    }

    /// Usage line, a blank line, then the help block.
    pub fn help_text(&self) -> String {
        help::help_text(&self.params)
    }
}

/// Run the engine over an explicit token sequence.
pub fn scan(params: &[Param], args: &[String], track: bool) -> ParseResult<Matches> {
    tracing::debug!(tokens = args.len(), params = params.len(), track, "scanning arguments");
    let mut scan = Scan::new(params, args, track);
    while scan.i < args.len() {
        scan.step()?;
    }
    scan.finish()
}

struct Scan<'a> {
    params: &'a [Param],
    flags: FlagIndex<'a>,
    args: &'a [String],
    track: bool,
    values: IndexMap<String, Value>,
    sources: SourceMap,
    special_seen: bool,
    positional_count: usize,
    options_ended: bool,
    i: usize,
}

impl<'a> Scan<'a> {
    fn new(params: &'a [Param], args: &'a [String], track: bool) -> Self {
        let sources = if track {
            params
                .iter()
                .map(|p| (p.id().to_string(), Source::unset()))
                .collect()
        } else {
            SourceMap::new()
        };
        Self {
            params,
            flags: FlagIndex::build(params),
            args,
            track,
            values: IndexMap::new(),
            sources,
            special_seen: false,
            positional_count: 0,
            options_ended: false,
            i: 0,
        }
    }

    fn step(&mut self) -> ParseResult<()> {
        let args = self.args;
        let token = args[self.i].as_str();
        if !self.options_ended {
            if token == "--" {
                self.options_ended = true;
                self.i += 1;
                return Ok(());
            }
            if token != "-" && token.starts_with('-') {
                return self.flagged(token);
            }
        }
        self.positional(token)
    }

    fn positional(&mut self, token: &'a str) -> ParseResult<()> {
        self.positional_count += 1;
        let Some(param) = self.positional_param() else {
            return Err(
                ParseError::new(Reason::UnexpectedValue, format!("No value expected: {token}"))
                    .with_index(self.i)
                    .with_value(Value::from(token)),
            );
        };
        self.bind(param, Value::from(token), self.i, SourceKind::User)?;
        self.i += 1;
        Ok(())
    }

    fn positional_param(&self) -> Option<&'a Param> {
        let params = self.params;
        let mut ordinal = 0;
        for param in params.iter().filter(|p| !p.is_flagged()) {
            ordinal += 1;
            if param.greedy() || ordinal == self.positional_count {
                return Some(param);
            }
        }
        None
    }

    fn flagged(&mut self, token: &'a str) -> ParseResult<()> {
        if token.starts_with("--") {
            let (flag, attached) = split_attached(token.trim_start_matches('-'));
            let param = self.lookup(flag)?;
            let consumed = self.bind_flag(param, flag, attached, true)?;
            self.i += consumed;
            return Ok(());
        }

        let body = &token[1..];
        for (pos, ch) in body.char_indices() {
            let after = pos + ch.len_utf8();
            let flag = &body[pos..after];
            let param = self.lookup(flag)?;
            let is_last = matches!(body[after..].chars().next(), None | Some('=') | Some(':'));
            if is_last {
                let (flag, attached) = split_attached(&body[pos..]);
                let consumed = self.bind_flag(param, flag, attached, true)?;
                self.i += consumed;
                return Ok(());
            }
            if !param.is_switch() {
                let consumed = self.bind_flag(param, flag, Some(&body[after..]), false)?;
                self.i += consumed;
                return Ok(());
            }
            self.bind_flag(param, flag, None, false)?;
        }
        self.i += 1;
        Ok(())
    }

    fn lookup(&self, flag: &str) -> ParseResult<&'a Param> {
        self.flags.get(flag).ok_or_else(|| {
            ParseError::new(Reason::UnknownOption, format!("Unknown option: {flag}"))
                .with_index(self.i)
                .with_flag(flag)
        })
    }

    /// Determine the value of one flag occurrence and record it. Returns the
    /// number of tokens consumed.
    fn bind_flag(
        &mut self,
        param: &'a Param,
        flag: &str,
        attached: Option<&'a str>,
        may_consume_next: bool,
    ) -> ParseResult<usize> {
        let index = self.i;
        if param.is_switch() {
            let (value, kind) = match attached {
                Some(v) if !param.optional_value() => {
                    return Err(ParseError::new(
                        Reason::UnexpectedValue,
                        format!("No value expected: {flag}={v}"),
                    )
                    .with_param(param.id())
                    .with_index(index)
                    .with_value(Value::from(v)));
                }
                None if param.optional_value() => {
                    if *param.default_value() != Value::Bool(false) {
                        (param.default_value().clone(), SourceKind::Default)
                    } else {
                        (Value::Bool(true), SourceKind::None)
                    }
                }
                Some(v) => (Value::from(v), SourceKind::User),
                None => (Value::Bool(true), SourceKind::User),
            };
            self.bind(param, value, index, kind)?;
            return Ok(1);
        }

        if let Some(v) = attached {
            self.bind(param, Value::from(v), index, SourceKind::User)?;
            return Ok(1);
        }
        if may_consume_next && index + 1 < self.args.len() {
            let args = self.args;
            let value = Value::from(args[index + 1].as_str());
            self.bind(param, value, index + 1, SourceKind::User)?;
            return Ok(2);
        }
        Err(
            ParseError::new(Reason::MissingValue, format!("Expected value: {flag}"))
                .with_param(param.id())
                .with_index(index)
                .with_flag(flag),
        )
    }

    /// Validate and record one value.
    fn bind(&mut self, param: &'a Param, value: Value, index: usize, kind: SourceKind) -> ParseResult<()> {
        let value = match param.validator() {
            Some(validator) => {
                let ctx = ValidationContext {
                    param,
                    id: param.id(),
                    source: kind,
                    index,
                    result: &self.values,
                    params: self.params,
                    args: self.args,
                };
                match validator.call(value.clone(), &ctx) {
                    Ok(Some(v)) => v,
                    Ok(None) => {
                        tracing::debug!(id = param.id(), index, "validator dropped value");
                        return Ok(());
                    }
                    Err(err) => {
                        return Err(ParseError::new(
                            Reason::ValidationError,
                            format!("{}: {err}", param.name()),
                        )
                        .with_param(param.id())
                        .with_index(self.i)
                        .with_value(value)
                        .with_validator(err));
                    }
                }
            }
            None => value,
        };

        tracing::trace!(id = param.id(), index, ?kind, "bound value");
        if param.accumulates() {
            let slot = self
                .values
                .entry(param.id().to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = slot {
                items.push(value);
            }
        } else if self.values.contains_key(param.id()) {
            return Err(
                ParseError::new(
                    Reason::DuplicateOption,
                    format!("Duplicate option: {}", param.name()),
                )
                .with_param(param.id())
                .with_index(index),
            );
        } else {
            self.values.insert(param.id().to_string(), value);
        }

        if param.special() {
            self.special_seen = true;
        }
        if self.track {
            if let Some(source) = self.sources.get_mut(param.id()) {
                source.record(kind, index, param.accumulates());
            }
        }
        Ok(())
    }

    /// Apply defaults, classify implied sources and check required parameters.
    fn finish(mut self) -> ParseResult<Matches> {
        let mut values = IndexMap::with_capacity(self.params.len());
        for param in self.params {
            if let Some(v) = self.values.get(param.id()) {
                values.insert(param.id().to_string(), v.clone());
                continue;
            }
            if self.track {
                if let Some(source) = self.sources.get_mut(param.id()) {
                    source.kind = implied_source(param);
                }
            }
            values.insert(param.id().to_string(), param.default_value().clone());
        }

        if !self.special_seen {
            if let Some(missing) = self
                .params
                .iter()
                .find(|p| p.required() && values.get(p.id()).is_none_or(Value::is_null))
            {
                return Err(ParseError::new(
                    Reason::MissingParameter,
                    format!("Missing parameter: {}", missing.name()),
                )
                .with_param(missing.id()));
            }
        }

        tracing::debug!(special = self.special_seen, "scan complete");
        let sources = self.track.then_some(self.sources);
        Ok(Matches::new(values, sources))
    }
}

/// The source reported for a parameter that received its default.
fn implied_source(param: &Param) -> SourceKind {
    let default = param.default_value();
    let meaningless = default.is_null()
        || (param.is_switch() && (param.optional_value() || *default == Value::Bool(false)));
    if meaningless {
        SourceKind::None
    } else {
        SourceKind::Default
    }
}

/// Split `flag=value` / `flag:value` at whichever separator comes first.
fn split_attached(body: &str) -> (&str, Option<&str>) {
    match body.find(['=', ':']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    }
}
