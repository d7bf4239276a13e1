//! Declarative command-line argument scanning.
//!
//! Declare the accepted parameters as [`ParamDef`]s, build a [`Parser`], and
//! hand it an explicit token sequence. The result maps every parameter id to
//! its value (or default), optionally with the source of each value.
//!
//! ```
//! use argscan::{ParamDef, ParseOptions, Parser};
//!
//! let parser = Parser::new(&[
//!     ParamDef::new().id("verbose").flags(["v", "verbose"]).switch(),
//!     ParamDef::new().id("count").flags(["n"]).validator("int"),
//!     ParamDef::new().id("files").greedy().required(),
//! ]);
//! let m = parser
//!     .parse(&["-vn:3", "a.txt", "b.txt"], &ParseOptions::default())
//!     .unwrap();
//! assert_eq!(m.get("verbose"), Some(&true.into()));
//! assert_eq!(m.get("count"), Some(&3.into()));
//! assert_eq!(m.get("files"), Some(&serde_json::json!(["a.txt", "b.txt"])));
//! ```

pub mod error;
pub mod flags;
pub mod help;
pub mod param;
pub mod parser;
pub mod result;
pub mod validator;
pub mod value;

pub use error::{ParseError, ParseResult, Reason};
pub use flags::FlagIndex;
pub use param::{Param, ParamDef, normalize};
pub use parser::{ParseOptions, Parser, scan};
pub use result::{Matches, Source, SourceIndex, SourceKind, SourceMap};
pub use validator::builtin as validators;
pub use validator::{
    Validate, ValidationContext, Validator, ValidatorError, ValidatorErrorKind, ValidatorSpec,
    resolve,
};
pub use value::Value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `args` against `defs` in one call.
pub fn parse<S: AsRef<str>>(
    defs: &[ParamDef],
    args: &[S],
    options: &ParseOptions,
) -> ParseResult<Matches> {
    Parser::new(defs).parse(args, options)
}
