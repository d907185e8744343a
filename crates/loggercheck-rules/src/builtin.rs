//! Built-in logger dialects.

use loggercheck_core::{Dialect, Ruleset, RulesetList};
use std::sync::OnceLock;
use tracing::debug;

/// `github.com/go-logr/logr`
pub const LOGR: &str = "logr";
/// `k8s.io/klog/v2`
pub const KLOG: &str = "klog";
/// `go.uber.org/zap` sugared logger
pub const ZAP: &str = "zap";
/// `github.com/go-kit/log`
pub const KITLOG: &str = "kitlog";
/// `log/slog`
pub const SLOG: &str = "slog";

const LOGR_RULES: &[&str] = &[
    "(github.com/go-logr/logr.Logger).Error",
    "(github.com/go-logr/logr.Logger).Info",
    "(github.com/go-logr/logr.Logger).WithValues",
];

const KLOG_RULES: &[&str] = &[
    "k8s.io/klog/v2.InfoS",
    "k8s.io/klog/v2.InfoSDepth",
    "k8s.io/klog/v2.ErrorS",
    "(k8s.io/klog/v2.Verbose).InfoS",
    "(k8s.io/klog/v2.Verbose).InfoSDepth",
    "(k8s.io/klog/v2.Verbose).ErrorS",
];

const ZAP_RULES: &[&str] = &[
    "(*go.uber.org/zap.SugaredLogger).With",
    "(*go.uber.org/zap.SugaredLogger).Debugw",
    "(*go.uber.org/zap.SugaredLogger).Infow",
    "(*go.uber.org/zap.SugaredLogger).Warnw",
    "(*go.uber.org/zap.SugaredLogger).Errorw",
    "(*go.uber.org/zap.SugaredLogger).DPanicw",
    "(*go.uber.org/zap.SugaredLogger).Panicw",
    "(*go.uber.org/zap.SugaredLogger).Fatalw",
];

const KITLOG_RULES: &[&str] = &[
    "github.com/go-kit/log.With",
    "github.com/go-kit/log.WithPrefix",
    "github.com/go-kit/log.WithSuffix",
    "(github.com/go-kit/log.Logger).Log",
];

const SLOG_RULES: &[&str] = &[
    "log/slog.Group",
    "log/slog.With",
    "log/slog.Debug",
    "log/slog.Info",
    "log/slog.Warn",
    "log/slog.Error",
    "log/slog.DebugContext",
    "log/slog.InfoContext",
    "log/slog.WarnContext",
    "log/slog.ErrorContext",
    "log/slog.Log",
    "(*log/slog.Logger).With",
    "(*log/slog.Logger).Debug",
    "(*log/slog.Logger).Info",
    "(*log/slog.Logger).Warn",
    "(*log/slog.Logger).Error",
    "(*log/slog.Logger).DebugContext",
    "(*log/slog.Logger).InfoContext",
    "(*log/slog.Logger).WarnContext",
    "(*log/slog.Logger).ErrorContext",
    "(*log/slog.Logger).Log",
];

/// Builds a ruleset from a fixed table that must hold one import path.
///
/// # Panics
///
/// Panics if the table is empty, malformed, or spans several import paths.
fn must_new_static_ruleset(name: &str, dialect: Dialect, rules: &[&str]) -> Ruleset {
    assert!(!rules.is_empty(), "no rules provided for {name}");
    let list = RulesetList::parse(rules)
        .unwrap_or_else(|e| panic!("invalid built-in rules for {name}: {e}"));
    let count = list.len();
    let mut rulesets = list.into_iter();
    match (rulesets.next(), rulesets.next()) {
        (Some(ruleset), None) => ruleset.with_name(name).with_dialect(dialect),
        _ => panic!("expected 1 ruleset for {name}, got {count}"),
    }
}

/// Returns the built-in rulesets, in matching order.
///
/// The table is built on first use and shared for the life of the process.
#[must_use]
pub fn builtin_rulesets() -> &'static RulesetList {
    static BUILTIN: OnceLock<RulesetList> = OnceLock::new();
    BUILTIN.get_or_init(|| {
        let list = RulesetList::new(vec![
            must_new_static_ruleset(LOGR, Dialect::General, LOGR_RULES),
            must_new_static_ruleset(KLOG, Dialect::General, KLOG_RULES),
            must_new_static_ruleset(ZAP, Dialect::structured_field("Field"), ZAP_RULES),
            must_new_static_ruleset(KITLOG, Dialect::General, KITLOG_RULES),
            must_new_static_ruleset(SLOG, Dialect::group_attribute("Attr"), SLOG_RULES),
        ]);
        debug!("Initialized {} built-in rulesets", list.len());
        list
    })
}

/// Returns the sorted names of the built-in dialects.
#[must_use]
pub fn builtin_names() -> Vec<&'static str> {
    builtin_rulesets().names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loggercheck_core::model::{BasicKind, Signature, Type};
    use loggercheck_core::FuncSymbol;

    #[test]
    fn names_are_sorted() {
        assert_eq!(builtin_names(), vec!["kitlog", "klog", "logr", "slog", "zap"]);
    }

    #[test]
    fn table_is_initialized_once() {
        assert!(std::ptr::eq(builtin_rulesets(), builtin_rulesets()));
    }

    #[test]
    fn dialects_are_assigned() {
        let dialect_of = |name: &str| {
            builtin_rulesets()
                .iter()
                .find(|rs| rs.name() == name)
                .map(|rs| rs.dialect().clone())
        };
        assert_eq!(dialect_of(ZAP), Some(Dialect::structured_field("Field")));
        assert_eq!(dialect_of(SLOG), Some(Dialect::group_attribute("Attr")));
        assert_eq!(dialect_of(KLOG), Some(Dialect::General));
    }

    #[test]
    fn rules_render_back_to_table_text() {
        let rendered: Vec<String> = builtin_rulesets()
            .iter()
            .filter(|rs| rs.name() == ZAP)
            .flat_map(|rs| {
                rs.rules()
                    .iter()
                    .map(move |r| r.display(rs.package_import()).to_string())
            })
            .collect();
        assert_eq!(rendered, ZAP_RULES);
    }

    #[test]
    fn klog_verbose_methods_match() {
        let verbose = FuncSymbol::new(
            "k8s.io/klog/v2",
            "InfoS",
            Signature::key_values(vec![Type::basic(BasicKind::String)])
                .with_receiver(Type::named("k8s.io/klog/v2", "Verbose")),
        );
        let klog = builtin_rulesets()
            .iter()
            .find(|rs| rs.name() == KLOG)
            .expect("klog is built in");
        assert!(klog.matches(&verbose));
    }

    #[test]
    #[should_panic(expected = "expected 1 ruleset for mixed, got 2")]
    fn mixed_import_paths_panic() {
        let _ = must_new_static_ruleset("mixed", Dialect::General, &["a.F", "b.G"]);
    }

    #[test]
    #[should_panic(expected = "invalid built-in rules for broken")]
    fn malformed_table_panics() {
        let _ = must_new_static_ruleset("broken", Dialect::General, &["xxx"]);
    }
}
