use argscan::{ParamDef, ParseOptions, Parser, Source, SourceIndex, SourceKind};
use serde_json::json;

fn parser() -> Parser {
    Parser::new(&[
        ParamDef::new()
            .id("switch1")
            .flag("s1")
            .switch()
            .optional_value()
            .default_value("0"),
        ParamDef::new()
            .id("switch2")
            .flag("s2")
            .switch()
            .optional_value()
            .default_value("log.txt"),
        ParamDef::new().id("switch3").flag("s3").switch().optional_value(),
        ParamDef::new().id("switch4").flag("s4").switch(),
        ParamDef::new().id("switch5").flag("s5").switch().multiple(),
        ParamDef::new().id("flagged1").flag("a"),
        ParamDef::new().id("flagged2").flag("b").default_value("bdefault"),
        ParamDef::new().id("flagged3").flag("c").multiple(),
        ParamDef::new().id("unflagged1"),
        ParamDef::new().id("unflagged2").default_value("no"),
        ParamDef::new()
            .id("unflagged3")
            .greedy()
            .default_value(json!(["foo", "bar"])),
    ])
}

fn kind(kind: SourceKind) -> Source {
    Source { kind, index: None }
}

fn at(kind: SourceKind, index: usize) -> Source {
    Source {
        kind,
        index: Some(SourceIndex::One(index)),
    }
}

fn baseline() -> Vec<(&'static str, Source)> {
    vec![
        ("switch1", kind(SourceKind::None)),
        ("switch2", kind(SourceKind::None)),
        ("switch3", kind(SourceKind::None)),
        ("switch4", kind(SourceKind::None)),
        ("switch5", kind(SourceKind::None)),
        ("flagged1", kind(SourceKind::None)),
        ("flagged2", kind(SourceKind::Default)),
        ("flagged3", kind(SourceKind::None)),
        ("unflagged1", kind(SourceKind::None)),
        ("unflagged2", kind(SourceKind::Default)),
        ("unflagged3", kind(SourceKind::Default)),
    ]
}

fn check(args: &[&str], overrides: &[(&str, Source)]) {
    let m = parser().parse(args, &ParseOptions::tracked()).unwrap();
    let sources = m.sources().expect("tracking enabled");
    for (id, mut expected) in baseline() {
        if let Some((_, o)) = overrides.iter().find(|(oid, _)| *oid == id) {
            expected = o.clone();
        }
        assert_eq!(sources.get(id), Some(&expected), "{id} for {args:?}");
    }
}

#[test]
fn untracked_parse_has_no_sources() {
    let m = parser().parse(&[] as &[&str], &ParseOptions::default()).unwrap();
    assert!(m.sources().is_none());
    assert!(m.to_json().get("$").is_none());
}

#[test]
fn no_arguments() {
    check(&[], &[]);
}

#[test]
fn bare_optional_value_switches_report_default_or_none() {
    check(&["--s1"], &[("switch1", at(SourceKind::Default, 0))]);
    check(&["--s2"], &[("switch2", at(SourceKind::Default, 0))]);
    check(&["--s3"], &[("switch3", at(SourceKind::None, 0))]);
}

#[test]
fn attached_values_are_user() {
    check(&["--s2:test"], &[("switch2", at(SourceKind::User, 0))]);
    check(&["--s3:test"], &[("switch3", at(SourceKind::User, 0))]);
}

#[test]
fn positions() {
    check(
        &["--s1", "-c", "bar", "--s2:test", "--s3:foo", "-c:bar", "-a", "ten"],
        &[
            ("switch1", at(SourceKind::Default, 0)),
            ("switch2", at(SourceKind::User, 3)),
            ("switch3", at(SourceKind::User, 4)),
            (
                "flagged3",
                Source {
                    kind: SourceKind::User,
                    index: Some(SourceIndex::Many(vec![2, 5])),
                },
            ),
            ("flagged1", at(SourceKind::User, 7)),
        ],
    );
}

#[test]
fn greedy_and_multiple_switch_indices() {
    check(
        &["--s5", "x", "--s5", "y", "z"],
        &[
            (
                "switch5",
                Source {
                    kind: SourceKind::User,
                    index: Some(SourceIndex::Many(vec![0, 2])),
                },
            ),
            ("unflagged1", at(SourceKind::User, 1)),
            ("unflagged2", at(SourceKind::User, 3)),
            (
                "unflagged3",
                Source {
                    kind: SourceKind::User,
                    index: Some(SourceIndex::Many(vec![4])),
                },
            ),
        ],
    );
}

#[test]
fn indices_point_at_value_tokens() {
    let m = parser()
        .parse(&["--s4", "-a", "x", "-b", "bval"], &ParseOptions::tracked())
        .unwrap();
    assert_eq!(m.source("switch4"), Some(&at(SourceKind::User, 0)));
    assert_eq!(m.source("flagged2"), Some(&at(SourceKind::User, 4)));
    assert_eq!(m.get_str("flagged2"), Some("bval"));

    let json = m.to_json();
    assert_eq!(json["$"]["source"]["flagged1"], json!({ "type": "user", "index": 2 }));
    assert_eq!(json["$"]["source"]["switch1"], json!({ "type": "none" }));
}

#[test]
fn cluster_members_share_the_token_index() {
    let p = Parser::new(&[
        ParamDef::new().id("x").flag("x").switch(),
        ParamDef::new().id("y").flag("y").switch(),
        ParamDef::new().id("out").flag("o"),
    ]);
    let m = p.parse(&[] as &[&str], &ParseOptions::tracked()).unwrap();
    assert_eq!(m.source("out"), Some(&kind(SourceKind::None)));

    let m = p.parse(&["-xyo", "file"], &ParseOptions::tracked()).unwrap();
    assert_eq!(m.source("x"), Some(&at(SourceKind::User, 0)));
    assert_eq!(m.source("y"), Some(&at(SourceKind::User, 0)));
    assert_eq!(m.source("out"), Some(&at(SourceKind::User, 1)));
}

#[test]
fn dropped_values_leave_the_source_untouched() {
    let p = Parser::new(&[ParamDef::new()
        .id("n")
        .flag("n")
        .default_value("1")
        .validator(argscan::Validator::new(|_, _| Ok(None)))]);
    let m = p.parse(&["-n", "5"], &ParseOptions::tracked()).unwrap();
    assert_eq!(m.get_str("n"), Some("1"));
    assert_eq!(m.source("n"), Some(&kind(SourceKind::Default)));
}
