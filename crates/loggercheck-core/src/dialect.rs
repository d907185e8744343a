//! Per-library argument extraction.
//!
//! Every matched call hands its variadic arguments to the ruleset's
//! [`Dialect`], which returns the key-value sub-sequence to verify.

use crate::context::CallContext;
use crate::model::Expr;

/// How a logging library lays out key-value arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Every variadic argument is part of the key-value sequence.
    #[default]
    General,
    /// Strongly-typed field values (e.g. zap's `Field`) may be mixed into
    /// the variadic arguments and are not part of the sequence.
    StructuredField {
        /// Bare name of the field type.
        type_name: String,
    },
    /// Group attribute values (e.g. slog's `Attr`) may be mixed into the
    /// variadic arguments and are not part of the sequence.
    GroupAttribute {
        /// Bare name of the attribute type.
        type_name: String,
    },
}

impl Dialect {
    /// Creates a structured-field dialect consuming `type_name` values.
    #[must_use]
    pub fn structured_field(type_name: impl Into<String>) -> Self {
        Self::StructuredField {
            type_name: type_name.into(),
        }
    }

    /// Creates a group-attribute dialect consuming `type_name` values.
    #[must_use]
    pub fn group_attribute(type_name: impl Into<String>) -> Self {
        Self::GroupAttribute {
            type_name: type_name.into(),
        }
    }

    /// Short label used in listings.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::General => "general".to_string(),
            Self::StructuredField { type_name } => format!("structured field ({type_name})"),
            Self::GroupAttribute { type_name } => format!("group attribute ({type_name})"),
        }
    }

    /// Returns the key-value arguments of the call, in source order.
    #[must_use]
    pub fn extract_key_values<'a>(&self, ctx: &CallContext<'a>) -> Vec<&'a Expr> {
        let args = ctx.variadic_args();
        match self {
            Self::General => args.iter().collect(),
            Self::StructuredField { type_name } | Self::GroupAttribute { type_name } => args
                .iter()
                .filter(|arg| !has_type_name(arg, type_name))
                .collect(),
        }
    }
}

/// Matches the bare type name only; the declaring package is not checked.
fn has_type_name(expr: &Expr, type_name: &str) -> bool {
    expr.ty
        .as_ref()
        .and_then(|ty| ty.type_name())
        .is_some_and(|name| name == type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallExpr, FuncSymbol, ObjKind, Signature, Type};

    fn field(name: &str) -> Expr {
        Expr::ident(name, Some(ObjKind::Var)).with_type(Type::named("go.uber.org/zap", "Field"))
    }

    fn call(args: Vec<Expr>) -> CallExpr {
        CallExpr::new(Expr::ident("Infow", Some(ObjKind::Func)), args).with_callee(
            FuncSymbol::new(
                "go.uber.org/zap",
                "Infow",
                Signature::key_values(vec![Type::basic(crate::model::BasicKind::String)]),
            ),
        )
    }

    fn rendered(exprs: &[&Expr]) -> Vec<String> {
        exprs.iter().map(|e| e.render()).collect()
    }

    #[test]
    fn general_takes_every_variadic_argument() {
        let call = call(vec![
            Expr::string_lit("msg"),
            Expr::string_lit("k"),
            field("f"),
        ]);
        let ctx = CallContext::new(&call).expect("verifiable call");
        let kv = Dialect::General.extract_key_values(&ctx);
        assert_eq!(rendered(&kv), vec!["\"k\"", "f"]);
    }

    #[test]
    fn structured_field_filters_fields_and_keeps_order() {
        let call = call(vec![
            Expr::string_lit("msg"),
            field("a"),
            Expr::string_lit("k1"),
            field("b"),
            Expr::int_lit(1),
            Expr::string_lit("k2"),
        ]);
        let ctx = CallContext::new(&call).expect("verifiable call");
        let kv = Dialect::structured_field("Field").extract_key_values(&ctx);
        assert_eq!(rendered(&kv), vec!["\"k1\"", "1", "\"k2\""]);
    }

    #[test]
    fn filtering_accepts_aliases_by_bare_name() {
        let attr = Expr::ident("g", Some(ObjKind::Var)).with_type(Type::alias(
            Some("log/slog".into()),
            "Attr",
            Type::named("log/slog/internal", "attr"),
        ));
        let other_pkg = Expr::ident("h", Some(ObjKind::Var))
            .with_type(Type::named("example.com/unrelated", "Attr"));
        let call = call(vec![Expr::string_lit("msg"), attr, other_pkg]);
        let ctx = CallContext::new(&call).expect("verifiable call");
        let kv = Dialect::group_attribute("Attr").extract_key_values(&ctx);
        assert!(kv.is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(Dialect::General.label(), "general");
        assert_eq!(
            Dialect::structured_field("Field").label(),
            "structured field (Field)"
        );
    }
}
