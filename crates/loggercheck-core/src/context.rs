//! Per-call context shared by the extraction and verification stages.

use crate::model::{CallExpr, Expr, FuncSymbol};

/// Why a call site cannot be verified.
///
/// Such calls are skipped silently; the reason only shows up in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unverifiable {
    /// The host did not resolve a callee (function values, conversions).
    #[error("callee is not resolved")]
    Unresolved,
    /// The callee is not variadic.
    #[error("callee is not variadic")]
    NotVariadic,
    /// The variadic element type is not the empty interface.
    #[error("variadic parameter is not an empty interface")]
    NotEmptyInterface,
    /// A slice is spread into the variadic slot with `...`.
    #[error("arguments are spread into the variadic parameter")]
    Spread,
    /// Fewer arguments than fixed parameters.
    #[error("call has fewer arguments than parameters")]
    MissingArguments,
}

/// A call site whose shape allows its key-value arguments to be checked.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    call: &'a CallExpr,
    func: &'a FuncSymbol,
    variadic_start: usize,
}

impl<'a> CallContext<'a> {
    /// Builds a context for `call`.
    ///
    /// # Errors
    ///
    /// Returns the reason the call cannot be verified: an unresolved or
    /// non-variadic callee, a variadic parameter that is not `...interface{}`,
    /// a spread argument, or missing fixed arguments.
    pub fn new(call: &'a CallExpr) -> Result<Self, Unverifiable> {
        let func = call.callee.as_ref().ok_or(Unverifiable::Unresolved)?;
        let signature = &func.signature;
        if !signature.variadic {
            return Err(Unverifiable::NotVariadic);
        }
        if call.ellipsis {
            return Err(Unverifiable::Spread);
        }
        if !signature
            .variadic_elem()
            .is_some_and(crate::model::Type::is_empty_interface)
        {
            return Err(Unverifiable::NotEmptyInterface);
        }
        let variadic_start = signature.params.len().saturating_sub(1);
        if call.args.len() < variadic_start {
            return Err(Unverifiable::MissingArguments);
        }
        Ok(Self {
            call,
            func,
            variadic_start,
        })
    }

    /// The resolved callee.
    #[must_use]
    pub fn func(&self) -> &'a FuncSymbol {
        self.func
    }

    /// Arguments bound to fixed parameters, i.e. the message arguments.
    #[must_use]
    pub fn message_args(&self) -> &'a [Expr] {
        &self.call.args[..self.variadic_start]
    }

    /// Arguments bound to the variadic parameter.
    #[must_use]
    pub fn variadic_args(&self) -> &'a [Expr] {
        &self.call.args[self.variadic_start..]
    }
}
