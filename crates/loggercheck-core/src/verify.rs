//! Verification of extracted key-value arguments.
//!
//! Each stage is independent and returns its own diagnostics; a single call
//! may fail several of them.

use crate::context::CallContext;
use crate::model::{ConstValue, Expr, ExprKind, LitKind, ObjKind};
use crate::printf;
use crate::types::Diagnostic;
use crate::utils::{ellipsize, unquote};
use std::borrow::Cow;

/// Message reported for an odd-length key-value sequence.
pub const ODD_KEY_VALUES: &str = "odd number of arguments passed as key-value pairs for logging";

/// Optional verification stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checks {
    /// Require keys to be constant ASCII strings.
    pub require_string_key: bool,
    /// Reject printf-style directives in message arguments.
    pub no_printf_like: bool,
}

/// Runs every enabled stage over one call.
#[must_use]
pub fn verify(ctx: &CallContext<'_>, key_values: &[&Expr], checks: Checks) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    diagnostics.extend(check_parity(key_values));
    if checks.require_string_key {
        diagnostics.extend(check_keys(key_values));
    }
    if checks.no_printf_like {
        diagnostics.extend(check_printf_like(ctx.message_args()));
    }
    diagnostics
}

/// Reports an odd-length sequence, spanning its first to last element.
#[must_use]
pub fn check_parity(key_values: &[&Expr]) -> Option<Diagnostic> {
    if key_values.len() % 2 == 0 {
        return None;
    }
    let first = key_values.first()?;
    let last = key_values.last()?;
    Some(Diagnostic::new(first.span.to(last.span), ODD_KEY_VALUES))
}

/// Checks every key (even position) of the sequence.
#[must_use]
pub fn check_keys(key_values: &[&Expr]) -> Vec<Diagnostic> {
    key_values
        .iter()
        .step_by(2)
        .filter_map(|key| check_key(key))
        .collect()
}

fn check_key(key: &Expr) -> Option<Diagnostic> {
    match string_value(key) {
        Some(value) if value.is_ascii() => None,
        Some(value) => Some(Diagnostic::new(
            key.span,
            format!(
                "logging keys are expected to be alphanumeric strings, please remove any non-latin characters from {value:?}"
            ),
        )),
        None => Some(Diagnostic::new(
            key.span,
            format!(
                "logging keys are expected to be inlined constant strings, please replace {:?} provided with string",
                ellipsize(&key.render())
            ),
        )),
    }
}

/// Reports the first message argument that contains a format directive.
#[must_use]
pub fn check_printf_like(message_args: &[Expr]) -> Option<Diagnostic> {
    message_args.iter().find_map(|arg| {
        let format = string_value(arg)?;
        let directive = printf::first_specifier(&format)?;
        Some(Diagnostic::new(
            arg.span,
            format!("logging message should not contain format specifiers, found {directive:?}"),
        ))
    })
}

/// Returns the value of a string literal, or of an identifier (plain or
/// package-qualified) bound to a string constant.
///
/// A constant value computed by the host wins over decoding the literal
/// token. A string constant without a host value falls back to its name.
#[must_use]
pub fn string_value(expr: &Expr) -> Option<Cow<'_, str>> {
    let computed = match &expr.value {
        Some(ConstValue::String(s)) => Some(Cow::Borrowed(s.as_str())),
        _ => None,
    };
    match &expr.kind {
        ExprKind::BasicLit {
            lit: LitKind::String,
            token,
        } => computed.or_else(|| unquote(token).map(Cow::Owned)),
        ExprKind::Ident {
            name,
            obj: Some(ObjKind::Const),
        }
        | ExprKind::Selector {
            sel: name,
            obj: Some(ObjKind::Const),
            ..
        } => {
            if !expr.ty.as_ref().is_some_and(crate::model::Type::is_string) {
                return None;
            }
            computed.or(Some(Cow::Borrowed(name.as_str())))
        }
        _ => None,
    }
}
