use std::sync::{Arc, Mutex};

use argscan::{
    ParamDef, ParseOptions, Parser, Reason, Validate, ValidationContext, Validator,
    ValidatorErrorKind, ValidatorSpec, validators,
};
use regex::Regex;
use serde_json::{Value, json};

fn parse(defs: &[ParamDef], args: &[&str]) -> argscan::ParseResult<argscan::Matches> {
    Parser::new(defs).parse(args, &ParseOptions::default())
}

#[test]
fn int_rejects_fractions() {
    let defs = [ParamDef::new().id("count").flag("n").validator("int")];
    let err = parse(&defs, &["-n", "12.4"]).unwrap_err();
    assert_eq!(err.reason(), Reason::ValidationError);
    assert_eq!(err.message(), "count: Integer expected");
    assert_eq!(err.param(), Some("count"));
    assert_eq!(err.value(), Some(&json!("12.4")));
    assert_eq!(
        err.validator_error().map(|e| e.kind()),
        Some(ValidatorErrorKind::IntegerExpected)
    );

    let m = parse(&defs, &["-n", "12"]).unwrap();
    assert_eq!(m.get("count"), Some(&json!(12)));
}

#[test]
fn number_and_boolean_transform() {
    let defs = [
        ParamDef::new().id("ratio").flag("r").validator("number"),
        ParamDef::new().id("debug").flag("d").validator("boolean"),
    ];
    let m = parse(&defs, &["-r", " 0.25 ", "-d", "YES"]).unwrap();
    assert_eq!(m.get("ratio"), Some(&json!(0.25)));
    assert_eq!(m.get("debug"), Some(&json!(true)));

    let err = parse(&defs, &["-r", ""]).unwrap_err();
    assert_eq!(err.message(), "ratio: Number expected");
    let err = parse(&defs, &["-d", "maybe"]).unwrap_err();
    assert_eq!(err.message(), "debug: Boolean expected");
}

#[test]
fn strict_boolean_only_accepts_true_and_false() {
    let defs = [ParamDef::new()
        .id("b")
        .flag("b")
        .validator(validators::boolean(true))];
    assert_eq!(parse(&defs, &["-b", "False"]).unwrap().get("b"), Some(&json!(false)));
    assert!(parse(&defs, &["-b", "yes"]).is_err());
}

#[test]
fn json_values_are_parsed() {
    let defs = [ParamDef::new().id("cfg").flag("c").validator("json")];
    let m = parse(&defs, &["-c", r#"{"a":[1,2]}"#]).unwrap();
    assert_eq!(m.get("cfg"), Some(&json!({ "a": [1, 2] })));
    let err = parse(&defs, &["-c", "{oops"]).unwrap_err();
    assert_eq!(err.message(), "cfg: JSON expected");
}

#[test]
fn allowed_values_and_patterns() {
    let defs = [
        ParamDef::new()
            .id("mode")
            .flag("m")
            .validator(vec![json!("fast"), json!("safe"), json!("slow")]),
        ParamDef::new()
            .id("tag")
            .flag("t")
            .validator(Regex::new("^v[0-9]+$").unwrap()),
    ];
    let m = parse(&defs, &["-m", "safe", "-t", "v12"]).unwrap();
    assert_eq!(m.get_str("mode"), Some("safe"));
    assert_eq!(m.get_str("tag"), Some("v12"));

    let err = parse(&defs, &["-m", "reckless"]).unwrap_err();
    assert_eq!(err.message(), "mode: Expected either fast, safe or slow");
    let err = parse(&defs, &["-t", "12"]).unwrap_err();
    assert_eq!(err.message(), "tag: Expected /^v[0-9]+$/");
}

#[test]
fn queued_int_and_range() {
    let defs = [ParamDef::new().id("port").flag("p").validator(ValidatorSpec::Queue(vec![
        "int".into(),
        validators::range(1.0, 65535.0).into(),
    ]))];
    assert_eq!(parse(&defs, &["-p", "8080"]).unwrap().get("port"), Some(&json!(8080)));
    let err = parse(&defs, &["-p", "70000"]).unwrap_err();
    assert_eq!(
        err.validator_error().map(|e| e.kind()),
        Some(ValidatorErrorKind::OutOfRange)
    );
    assert_eq!(err.message(), "port: Must be between 1 and 65535");
}

fn remove_invalid() -> Validator {
    Validator::new(|value, _| match value.as_str().map(str::parse::<i64>) {
        Some(Ok(_)) => Ok(Some(value)),
        _ => Ok(None),
    })
}

#[test]
fn dropped_values_fall_back_to_the_default() {
    let defs = [ParamDef::new()
        .id("z")
        .flag("z")
        .default_value("123")
        .validator(remove_invalid())];
    let m = parse(&defs, &["-z=notANumber"]).unwrap();
    assert_eq!(m.get_str("z"), Some("123"));

    let m = parse(&defs, &["-z=7"]).unwrap();
    assert_eq!(m.get_str("z"), Some("7"));
}

#[test]
fn dropped_values_do_not_count_as_duplicates() {
    let defs = [ParamDef::new().id("z").flag("z").validator(remove_invalid())];
    let m = parse(&defs, &["-z", "bad", "-z", "5"]).unwrap();
    assert_eq!(m.get_str("z"), Some("5"));
    let err = parse(&defs, &["-z", "4", "-z", "5"]).unwrap_err();
    assert_eq!(err.reason(), Reason::DuplicateOption);
}

#[test]
fn dropped_values_are_not_accumulated() {
    let defs = [ParamDef::new()
        .id("z")
        .flag("z")
        .multiple()
        .validator(remove_invalid())];
    let m = parse(&defs, &["-z", "1", "-z", "x", "-z", "3"]).unwrap();
    assert_eq!(m.get("z"), Some(&json!(["1", "3"])));
}

#[test]
fn custom_error_message() {
    let defs = [ParamDef::new()
        .id("when")
        .flag("w")
        .validator(Validator::new(|value, _| match value.as_str() {
            Some("night" | "day") => Ok(Some(value)),
            _ => Err("Expected night or day".into()),
        }))];
    let err = parse(&defs, &["-w", "noon"]).unwrap_err();
    assert_eq!(err.message(), "when: Expected night or day");
    assert_eq!(
        err.validator_error().map(|e| e.kind()),
        Some(ValidatorErrorKind::Custom)
    );
}

struct FirstTokenOnly;

impl Validate for FirstTokenOnly {
    fn validate(&self, value: Value, ctx: &ValidationContext<'_>) -> argscan::validator::Outcome {
        if ctx.index <= 1 {
            Ok(Some(value))
        } else {
            Err(format!("{} must come first", ctx.param.name()).into())
        }
    }
}

#[test]
fn validator_objects_see_the_token_index() {
    let defs = [
        ParamDef::new().id("first").flag("f").validator(ValidatorSpec::object(FirstTokenOnly)),
        ParamDef::new().id("other").flag("o").switch(),
    ];
    assert!(parse(&defs, &["-f", "x", "-o"]).is_ok());
    let err = parse(&defs, &["-o", "-f", "x"]).unwrap_err();
    assert_eq!(err.message(), "first: first must come first");
}

#[test]
fn identity_validator_is_transparent() {
    let plain = [
        ParamDef::new().id("a").flag("a"),
        ParamDef::new().id("b").flag("b").multiple(),
        ParamDef::new().id("rest").greedy(),
    ];
    let identity = || Validator::new(|value, _| Ok(Some(value)));
    let checked = [
        ParamDef::new().id("a").flag("a").validator(identity()),
        ParamDef::new().id("b").flag("b").multiple().validator(identity()),
        ParamDef::new().id("rest").greedy().validator(identity()),
    ];
    let args = ["-a", "1", "-b", "2", "-b:3", "x", "y"];
    let options = ParseOptions::tracked();
    assert_eq!(
        Parser::new(&plain).parse(&args, &options).unwrap(),
        Parser::new(&checked).parse(&args, &options).unwrap()
    );
}

#[test]
fn context_exposes_args_and_bound_values() {
    let seen: Arc<Mutex<Vec<(Vec<String>, Option<Value>, usize)>>> = Arc::default();
    let record = Arc::clone(&seen);
    let defs = [
        ParamDef::new().id("name").flag("n"),
        ParamDef::new()
            .id("greeting")
            .flag("g")
            .validator(Validator::new(move |value, ctx| {
                if let Ok(mut seen) = record.lock() {
                    seen.push((ctx.args.to_vec(), ctx.result.get("name").cloned(), ctx.index));
                }
                let name = ctx.result.get("name").and_then(Value::as_str).unwrap_or("you");
                Ok(Some(json!(format!("{} {name}", value.as_str().unwrap_or_default()))))
            })),
    ];
    let m = parse(&defs, &["-n", "Ada", "-g", "hello"]).unwrap();
    assert_eq!(m.get_str("greeting"), Some("hello Ada"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, ["-n", "Ada", "-g", "hello"]);
    assert_eq!(seen[0].1, Some(json!("Ada")));
    assert_eq!(seen[0].2, 3);
}

#[test]
fn defaults_are_not_validated() {
    let defs = [ParamDef::new()
        .id("count")
        .flag("n")
        .default_value("not a number")
        .validator("int")];
    let m = parse(&defs, &[]).unwrap();
    assert_eq!(m.get_str("count"), Some("not a number"));
}

#[test]
fn optional_value_switch_defaults_pass_through_the_validator() {
    let defs = [ParamDef::new()
        .id("level")
        .flag("l")
        .switch()
        .optional_value()
        .default_value("2")
        .validator("int")];
    assert_eq!(parse(&defs, &["-l"]).unwrap().get("level"), Some(&json!(2)));
    assert_eq!(parse(&defs, &["-l:5"]).unwrap().get("level"), Some(&json!(5)));
}

#[test]
fn unknown_builtin_names_leave_tokens_untouched() {
    let defs = [ParamDef::new().id("x").flag("x").validator("float")];
    assert_eq!(parse(&defs, &["-x", "1.5"]).unwrap().get_str("x"), Some("1.5"));
}
