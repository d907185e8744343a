//! End-to-end scenarios: built-in dialects, configuration and verification.

use loggercheck::model::{
    BasicKind, CallExpr, ConstValue, Expr, FuncSymbol, ObjKind, PackageUnit, Pos, Signature,
    SourceFile, Span, Type,
};
use loggercheck::{new_analyzer, Analyzer, AnalyzerError, Config, RulesError};
use std::io::Write as _;

const ODD: &str = "odd number of arguments passed as key-value pairs for logging";

fn string() -> Type {
    Type::basic(BasicKind::String)
}

fn logr_info() -> FuncSymbol {
    FuncSymbol::new(
        "github.com/go-logr/logr",
        "Info",
        Signature::key_values(vec![string()])
            .with_receiver(Type::named("github.com/go-logr/logr", "Logger")),
    )
}

fn klog_info_s(package: &str) -> FuncSymbol {
    FuncSymbol::new(package, "InfoS", Signature::key_values(vec![string()]))
}

fn zap_infow() -> FuncSymbol {
    FuncSymbol::new(
        "go.uber.org/zap",
        "Infow",
        Signature::key_values(vec![string()])
            .with_receiver(Type::pointer(Type::named("go.uber.org/zap", "SugaredLogger"))),
    )
}

fn slog_info() -> FuncSymbol {
    FuncSymbol::new(
        "log/slog",
        "Info",
        Signature::new(vec![string(), Type::slice(Type::any())], true),
    )
}

fn kitlog_log() -> FuncSymbol {
    FuncSymbol::new(
        "github.com/go-kit/log",
        "Log",
        Signature::key_values(vec![])
            .with_receiver(Type::named("github.com/go-kit/log", "Logger")),
    )
}

/// Builds `log.<name>(args...)` with every argument on its own span.
fn call(callee: FuncSymbol, args: Vec<Expr>) -> Expr {
    let mut offset = 20;
    let args = args
        .into_iter()
        .map(|arg| {
            let len = arg.render().len();
            let span = Span::new(
                Pos::new(offset, 1, offset + 1),
                Pos::new(offset + len, 1, offset + len + 1),
            );
            offset += len + 2;
            arg.with_span(span)
        })
        .collect();
    let fun = Expr::selector(
        Expr::ident("log", Some(ObjKind::Var)),
        callee.name.clone(),
        Some(ObjKind::Func),
    );
    Expr::call(CallExpr::new(fun, args).with_callee(callee))
}

fn s(value: &str) -> Expr {
    Expr::string_lit(value)
}

fn messages(analyzer: &Analyzer, exprs: Vec<Expr>) -> Vec<String> {
    let unit = PackageUnit {
        path: "example.com/app".into(),
        files: vec![SourceFile {
            path: "main.go".into(),
            content: None,
            exprs,
        }],
    };
    analyzer
        .analyze(&unit)
        .findings
        .into_iter()
        .map(|f| f.diagnostic.message)
        .collect()
}

fn default_analyzer() -> Analyzer {
    new_analyzer(&Config::default()).expect("default config is valid")
}

#[test]
fn odd_key_values_report_once() {
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![call(logr_info(), vec![s("message"), s("key1"), s("value1"), s("key2")])],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn balanced_key_values_are_clean() {
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![
            call(logr_info(), vec![s("message"), s("key1"), s("value1")]),
            call(logr_info(), vec![s("message")]),
        ],
    );
    assert!(found.is_empty(), "unexpected findings: {found:?}");
}

#[test]
fn parity_span_covers_key_values() {
    let analyzer = default_analyzer();
    let unit = PackageUnit {
        path: "example.com/app".into(),
        files: vec![SourceFile {
            path: "main.go".into(),
            content: None,
            exprs: vec![call(klog_info_s("k8s.io/klog/v2"), vec![s("msg"), s("k"), s("v"), s("x")])],
        }],
    };
    let result = analyzer.analyze(&unit);
    let span = result.findings[0].diagnostic.span;
    // "msg" occupies 20..25, the key-values start right after ", "
    assert_eq!(span.start.offset, 27);
    assert_eq!(span.end.offset, 27 + 3 + 2 + 3 + 2 + 3);
}

#[test]
fn malformed_inline_rule_fails_setup() {
    let config = Config {
        rules: vec!["xxx".into()],
        ..Config::default()
    };
    let err = new_analyzer(&config).expect_err("rule is malformed");
    assert!(err.to_string().contains("invalid rule format"), "{err}");
}

#[test]
fn malformed_rule_file_names_the_line() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "(*example.com/log.Logger).Infow").expect("write");
    writeln!(file, "(*example.com/log/Logger).Infow").expect("write");

    let config = Config {
        rule_file: Some(file.path().to_path_buf()),
        ..Config::default()
    };
    let err = new_analyzer(&config).expect_err("line 2 is malformed");
    assert!(matches!(
        err,
        AnalyzerError::Rules(RulesError::Parse { line: 2, .. })
    ));
    assert!(err.to_string().contains("line 2"), "{err}");
}

#[test]
fn printf_directive_in_message_is_reported() {
    let config = Config {
        no_printf_like: true,
        ..Config::default()
    };
    let analyzer = new_analyzer(&config).expect("valid config");
    let found = messages(
        &analyzer,
        vec![call(logr_info(), vec![s("hello %s"), s("intKey"), s("1")])],
    );
    assert_eq!(
        found,
        vec![r#"logging message should not contain format specifiers, found "%s""#]
    );
}

#[test]
fn printf_check_ignores_key_values() {
    let config = Config {
        no_printf_like: true,
        ..Config::default()
    };
    let analyzer = new_analyzer(&config).expect("valid config");
    let found = messages(
        &analyzer,
        vec![call(logr_info(), vec![s("hello"), s("key"), s("%d")])],
    );
    assert!(found.is_empty(), "unexpected findings: {found:?}");
}

#[test]
fn vendored_package_matches() {
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![
            call(
                klog_info_s("github.com/x/y/vendor/k8s.io/klog/v2"),
                vec![s("msg"), s("k")],
            ),
            call(klog_info_s("otherpkg"), vec![s("msg"), s("k")]),
        ],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn disabled_dialect_is_skipped() {
    let config = Config {
        disable: vec!["klog".into()],
        ..Config::default()
    };
    let analyzer = new_analyzer(&config).expect("valid config");
    let found = messages(
        &analyzer,
        vec![
            call(klog_info_s("k8s.io/klog/v2"), vec![s("msg"), s("k")]),
            call(logr_info(), vec![s("msg"), s("k")]),
        ],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn unknown_disabled_name_fails_setup() {
    let config = Config {
        disable: vec!["logrus".into()],
        ..Config::default()
    };
    let err = new_analyzer(&config).expect_err("unknown dialect");
    assert!(matches!(err, AnalyzerError::UnknownDialect { ref name, .. } if name == "logrus"));
}

#[test]
fn zap_fields_are_not_key_values() {
    let field = |name: &str| {
        Expr::call(CallExpr::new(
            Expr::selector(Expr::ident("zap", Some(ObjKind::Package)), "String", None),
            vec![s(name), s("v")],
        ))
        .with_type(Type::named("go.uber.org/zap", "Field"))
    };
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![
            call(zap_infow(), vec![s("msg"), field("a"), s("k"), s("v"), field("b")]),
            call(zap_infow(), vec![s("msg"), s("k"), field("a")]),
        ],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn slog_attrs_are_not_key_values() {
    let attr = Expr::ident("attr", Some(ObjKind::Var)).with_type(Type::named("log/slog", "Attr"));
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![
            call(slog_info(), vec![s("msg"), attr.clone(), s("k"), s("v")]),
            call(slog_info(), vec![s("msg"), attr, s("k")]),
        ],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn kitlog_log_has_no_message_argument() {
    let analyzer = default_analyzer();
    let found = messages(
        &analyzer,
        vec![
            call(kitlog_log(), vec![s("k1"), s("v1"), s("k2")]),
            call(kitlog_log(), vec![s("k1"), s("v1")]),
        ],
    );
    assert_eq!(found, vec![ODD]);
}

#[test]
fn custom_rules_extend_builtin_dialects() {
    let custom = FuncSymbol::new(
        "example.com/log",
        "Infow",
        Signature::key_values(vec![string()])
            .with_receiver(Type::pointer(Type::named("example.com/log", "Logger"))),
    );
    let config = Config {
        rules: vec!["(*example.com/log.Logger).Infow".into()],
        ..Config::default()
    };

    assert!(messages(&default_analyzer(), vec![call(custom.clone(), vec![s("m"), s("k")])])
        .is_empty());

    let analyzer = new_analyzer(&config).expect("valid config");
    let found = messages(&analyzer, vec![call(custom, vec![s("m"), s("k")])]);
    assert_eq!(found, vec![ODD]);
}

#[test]
fn first_matching_ruleset_picks_the_dialect() {
    let field = Expr::ident("f", Some(ObjKind::Var)).with_type(Type::named("go.uber.org/zap", "Field"));
    let exprs = || vec![call(zap_infow(), vec![s("m"), field.clone(), s("k"), s("v")])];
    let rules = vec!["(*go.uber.org/zap.SugaredLogger).Infow".to_string()];

    let with_zap = new_analyzer(&Config {
        rules: rules.clone(),
        ..Config::default()
    })
    .expect("valid config");
    assert_eq!(
        with_zap.matching_ruleset(&zap_infow()).map(|r| r.name()),
        Some("zap")
    );
    assert!(messages(&with_zap, exprs()).is_empty());

    let custom_only = new_analyzer(&Config {
        disable: vec!["zap".into()],
        rules,
        ..Config::default()
    })
    .expect("valid config");
    assert_eq!(
        custom_only.matching_ruleset(&zap_infow()).map(|r| r.name()),
        Some("custom")
    );
    assert_eq!(messages(&custom_only, exprs()), vec![ODD]);
}

#[test]
fn string_keys_are_enforced_when_required() {
    let config = Config {
        require_string_key: true,
        ..Config::default()
    };
    let analyzer = new_analyzer(&config).expect("valid config");

    let key_const = Expr::constant(
        "KeyName",
        Type::basic(BasicKind::UntypedString),
        ConstValue::String("key".into()),
    );
    let key_var = Expr::ident("key1", Some(ObjKind::Var)).with_type(string());
    let conversion = Expr::call(CallExpr::new(
        Expr::ident("string", Some(ObjKind::TypeName)),
        vec![key_var.clone()],
    ))
    .with_type(string());

    let found = messages(
        &analyzer,
        vec![
            call(logr_info(), vec![s("m"), s("key"), s("v"), key_const, s("v")]),
            call(logr_info(), vec![s("m"), conversion, s("v")]),
            call(logr_info(), vec![s("m"), s("键1"), s("v")]),
        ],
    );
    assert_eq!(
        found,
        vec![
            r#"logging keys are expected to be inlined constant strings, please replace "string(key1)" provided with string"#,
            r#"logging keys are expected to be alphanumeric strings, please remove any non-latin characters from "键1""#,
        ]
    );
}

#[test]
fn spread_arguments_are_skipped() {
    let analyzer = default_analyzer();
    let Expr { kind, .. } = call(logr_info(), vec![s("msg"), Expr::ident("kvs", Some(ObjKind::Var))]);
    let loggercheck::model::ExprKind::Call(inner) = kind else {
        unreachable!("call() builds a call");
    };
    let spread = Expr::call((*inner).with_ellipsis());
    assert!(messages(&analyzer, vec![spread]).is_empty());
}

#[test]
fn analyzer_is_shared_across_threads() {
    let analyzer = default_analyzer();
    let exprs = || vec![call(logr_info(), vec![s("message"), s("key1")])];
    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| messages(&analyzer, exprs()).len()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    });
    assert_eq!(counts, vec![1, 1, 1, 1]);
}
