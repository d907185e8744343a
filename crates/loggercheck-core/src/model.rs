//! Typed syntax model lent to the analyzer by its host.
//!
//! The analyzer never builds these values from source text. A front-end that
//! has already parsed and type-checked a package produces them (directly, or
//! through the JSON dump consumed by the CLI) and the analyzer only reads them
//! for the duration of a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position in a source file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    /// Byte offset from the start of the file.
    #[serde(default)]
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// A source range, from `start` up to (not including) `end`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    /// First position covered by the range.
    pub start: Pos,
    /// Position just past the range.
    pub end: Pos,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }
}

/// Predeclared (basic) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    /// `bool`
    Bool,
    /// Any sized or unsized integer type.
    Int,
    /// Any floating point type.
    Float,
    /// Any complex type.
    Complex,
    /// `string`
    String,
    /// Untyped boolean constant.
    UntypedBool,
    /// Untyped integer constant.
    UntypedInt,
    /// Untyped rune constant.
    UntypedRune,
    /// Untyped floating point constant.
    UntypedFloat,
    /// Untyped string constant.
    UntypedString,
    /// The untyped `nil` value.
    UntypedNil,
}

impl BasicKind {
    /// Returns true for `string` and untyped string constants.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(self, Self::String | Self::UntypedString)
    }

    /// Returns the source spelling of this type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float64",
            Self::Complex => "complex128",
            Self::String => "string",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedString => "untyped string",
            Self::UntypedNil => "untyped nil",
        }
    }
}

/// A resolved static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// A predeclared type.
    Basic {
        /// Which basic type.
        basic: BasicKind,
    },
    /// A defined type, e.g. `zap.SugaredLogger` or `logr.Logger`.
    Named {
        /// Import path of the declaring package.
        #[serde(default)]
        package: Option<String>,
        /// Bare type name.
        name: String,
        /// Instantiated type arguments, if the type is generic.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_args: Vec<Type>,
    },
    /// A type alias, e.g. `any` or `zap.Field`.
    Alias {
        /// Import path of the declaring package.
        #[serde(default)]
        package: Option<String>,
        /// Alias name.
        name: String,
        /// The aliased type.
        target: Box<Type>,
    },
    /// `*T`
    Pointer {
        /// Pointee type.
        elem: Box<Type>,
    },
    /// `[]T`
    Slice {
        /// Element type.
        elem: Box<Type>,
    },
    /// An interface type literal.
    Interface {
        /// Method names; empty for the universal interface.
        #[serde(default)]
        methods: Vec<String>,
    },
    /// Any other type, kept only for display.
    Other {
        /// Source rendering of the type.
        repr: String,
    },
}

impl Type {
    /// Creates a basic type.
    #[must_use]
    pub fn basic(basic: BasicKind) -> Self {
        Self::Basic { basic }
    }

    /// Creates a non-generic named type.
    #[must_use]
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: Some(package.into()),
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// Creates an alias of `target`.
    #[must_use]
    pub fn alias(package: Option<String>, name: impl Into<String>, target: Type) -> Self {
        Self::Alias {
            package,
            name: name.into(),
            target: Box::new(target),
        }
    }

    /// Creates `*elem`.
    #[must_use]
    pub fn pointer(elem: Type) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    /// Creates `[]elem`.
    #[must_use]
    pub fn slice(elem: Type) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    /// Creates `interface{}`.
    #[must_use]
    pub fn empty_interface() -> Self {
        Self::Interface {
            methods: Vec::new(),
        }
    }

    /// Creates the predeclared `any` alias.
    #[must_use]
    pub fn any() -> Self {
        Self::alias(None, "any", Self::empty_interface())
    }

    /// Follows alias chains down to the first non-alias type.
    #[must_use]
    pub fn unalias(&self) -> &Type {
        let mut ty = self;
        while let Self::Alias { target, .. } = ty {
            ty = target;
        }
        ty
    }

    /// Returns true if this type is (an alias of) the universal interface.
    #[must_use]
    pub fn is_empty_interface(&self) -> bool {
        matches!(self.unalias(), Self::Interface { methods } if methods.is_empty())
    }

    /// Returns true if this type is (an alias of) a basic string type.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.unalias(), Self::Basic { basic } if basic.is_string())
    }

    /// Returns the bare name of a named or alias type.
    ///
    /// The declaring package is deliberately ignored.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } | Self::Alias { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Renders the type without package qualifiers, e.g. `*SugaredLogger`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { basic } => f.write_str(basic.name()),
            Self::Named {
                name, type_args, ..
            } => {
                f.write_str(name)?;
                if !type_args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            Self::Alias { name, .. } => f.write_str(name),
            Self::Pointer { elem } => write!(f, "*{elem}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Interface { methods } if methods.is_empty() => f.write_str("interface{}"),
            Self::Interface { methods } => write!(f, "interface{{{}}}", methods.join("; ")),
            Self::Other { repr } => f.write_str(repr),
        }
    }
}

/// A function parameter or method receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name; empty when unnamed.
    #[serde(default)]
    pub name: String,
    /// Declared type. For the variadic parameter this is the slice type.
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Param {
    /// Creates an unnamed parameter.
    #[must_use]
    pub fn new(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// A resolved function or method signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Method receiver, absent for free functions.
    #[serde(default)]
    pub recv: Option<Param>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Whether the final parameter is variadic.
    #[serde(default)]
    pub variadic: bool,
}

impl Signature {
    /// Creates a signature from parameter types.
    ///
    /// When `variadic` is set, the last type must already be the slice type.
    #[must_use]
    pub fn new(params: Vec<Type>, variadic: bool) -> Self {
        Self {
            recv: None,
            params: params.into_iter().map(Param::new).collect(),
            variadic,
        }
    }

    /// Creates a variadic signature whose trailing parameter is `...interface{}`.
    #[must_use]
    pub fn key_values(leading: Vec<Type>) -> Self {
        let mut params = leading;
        params.push(Type::slice(Type::empty_interface()));
        Self::new(params, true)
    }

    /// Sets the method receiver.
    #[must_use]
    pub fn with_receiver(mut self, recv: Type) -> Self {
        self.recv = Some(Param::new(recv));
        self
    }

    /// Returns the element type of the variadic parameter.
    #[must_use]
    pub fn variadic_elem(&self) -> Option<&Type> {
        if !self.variadic {
            return None;
        }
        match self.params.last().map(|p| p.ty.unalias()) {
            Some(Type::Slice { elem }) => Some(elem),
            _ => None,
        }
    }
}

/// A resolved function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSymbol {
    /// Function or method name.
    pub name: String,
    /// Import path of the declaring package; absent for builtins.
    #[serde(default)]
    pub package: Option<String>,
    /// Resolved signature.
    pub signature: Signature,
}

impl FuncSymbol {
    /// Creates a function symbol declared in `package`.
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            package: Some(package.into()),
            signature,
        }
    }
}

/// What kind of object an identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjKind {
    /// A compile-time constant.
    Const,
    /// A variable or parameter.
    Var,
    /// A type name.
    TypeName,
    /// A function.
    Func,
    /// An imported package name.
    Package,
    /// A builtin function.
    Builtin,
    /// The predeclared `nil`.
    Nil,
}

/// Kind of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    /// Integer literal.
    Int,
    /// Floating point literal.
    Float,
    /// Imaginary literal.
    Imag,
    /// Rune literal.
    Char,
    /// Interpreted or raw string literal.
    String,
}

/// A constant value computed by the host's type checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    /// Boolean constant.
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Floating point constant.
    Float(f64),
    /// String constant.
    String(String),
}

/// Expression node variants the analyzer distinguishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKind {
    /// A literal token.
    BasicLit {
        /// Literal kind.
        lit: LitKind,
        /// Token text as written, quotes included.
        token: String,
    },
    /// A plain identifier.
    Ident {
        /// Identifier name.
        name: String,
        /// What the identifier resolves to.
        #[serde(default)]
        obj: Option<ObjKind>,
    },
    /// A selector `x.sel`, including package-qualified identifiers.
    Selector {
        /// Operand.
        x: Box<Expr>,
        /// Selected name.
        sel: String,
        /// What the selected name resolves to.
        #[serde(default)]
        obj: Option<ObjKind>,
    },
    /// A call or conversion.
    Call(Box<CallExpr>),
    /// Any other expression; nested expressions are kept so that calls
    /// inside them are still visited.
    Other {
        /// Directly nested expressions.
        #[serde(default)]
        children: Vec<Expr>,
    },
}

/// An expression with the type information the host resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Node variant.
    #[serde(flatten)]
    pub kind: ExprKind,
    /// Source range of the expression.
    #[serde(default)]
    pub span: Span,
    /// Static type, if known.
    #[serde(default, rename = "type")]
    pub ty: Option<Type>,
    /// Constant value, for constant expressions.
    #[serde(default)]
    pub value: Option<ConstValue>,
    /// Source text as printed by the host.
    #[serde(default)]
    pub text: Option<String>,
}

impl Expr {
    /// Creates an expression of the given kind with no type information.
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::default(),
            ty: None,
            value: None,
            text: None,
        }
    }

    /// Creates an interpreted string literal holding `value`.
    #[must_use]
    pub fn string_lit(value: &str) -> Self {
        let mut token = String::with_capacity(value.len() + 2);
        token.push('"');
        for c in value.chars() {
            match c {
                '"' | '\\' => {
                    token.push('\\');
                    token.push(c);
                }
                '\n' => token.push_str("\\n"),
                '\t' => token.push_str("\\t"),
                _ => token.push(c),
            }
        }
        token.push('"');
        Self::new(ExprKind::BasicLit {
            lit: LitKind::String,
            token,
        })
        .with_type(Type::basic(BasicKind::UntypedString))
        .with_value(ConstValue::String(value.to_string()))
    }

    /// Creates an integer literal.
    #[must_use]
    pub fn int_lit(value: i64) -> Self {
        Self::new(ExprKind::BasicLit {
            lit: LitKind::Int,
            token: value.to_string(),
        })
        .with_type(Type::basic(BasicKind::UntypedInt))
        .with_value(ConstValue::Int(value))
    }

    /// Creates an identifier resolving to `obj`.
    #[must_use]
    pub fn ident(name: impl Into<String>, obj: Option<ObjKind>) -> Self {
        Self::new(ExprKind::Ident {
            name: name.into(),
            obj,
        })
    }

    /// Creates an identifier bound to a constant.
    #[must_use]
    pub fn constant(name: impl Into<String>, ty: Type, value: ConstValue) -> Self {
        Self::ident(name, Some(ObjKind::Const))
            .with_type(ty)
            .with_value(value)
    }

    /// Creates a selector `x.sel`.
    #[must_use]
    pub fn selector(x: Expr, sel: impl Into<String>, obj: Option<ObjKind>) -> Self {
        Self::new(ExprKind::Selector {
            x: Box::new(x),
            sel: sel.into(),
            obj,
        })
    }

    /// Wraps a call expression.
    #[must_use]
    pub fn call(call: CallExpr) -> Self {
        Self::new(ExprKind::Call(Box::new(call)))
    }

    /// Sets the source range.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets the static type.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the constant value.
    #[must_use]
    pub fn with_value(mut self, value: ConstValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the printed source text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the source text of the expression.
    ///
    /// Uses the host's printed text when present, otherwise reconstructs it
    /// from the node structure.
    #[must_use]
    pub fn render(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        match &self.kind {
            ExprKind::BasicLit { token, .. } => token.clone(),
            ExprKind::Ident { name, .. } => name.clone(),
            ExprKind::Selector { x, sel, .. } => format!("{}.{sel}", x.render()),
            ExprKind::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(Expr::render)
                    .collect::<Vec<_>>()
                    .join(", ");
                let spread = if call.ellipsis { "..." } else { "" };
                format!("{}({args}{spread})", call.fun.render())
            }
            ExprKind::Other { .. } => "<expr>".to_string(),
        }
    }

    /// Visits every call expression in this tree in preorder.
    pub fn for_each_call<'a>(&'a self, f: &mut dyn FnMut(&'a CallExpr)) {
        match &self.kind {
            ExprKind::Call(call) => {
                f(call);
                call.fun.for_each_call(f);
                for arg in &call.args {
                    arg.for_each_call(f);
                }
            }
            ExprKind::Selector { x, .. } => x.for_each_call(f),
            ExprKind::Other { children } => {
                for child in children {
                    child.for_each_call(f);
                }
            }
            ExprKind::BasicLit { .. } | ExprKind::Ident { .. } => {}
        }
    }
}

/// A call expression together with its resolved callee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// The called expression, e.g. `log.Info`.
    pub fun: Box<Expr>,
    /// Call arguments in source order.
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Whether the last argument is spread with `...`.
    #[serde(default)]
    pub ellipsis: bool,
    /// Resolved callee. Absent for function values, conversions and
    /// anything the host could not resolve.
    #[serde(default)]
    pub callee: Option<FuncSymbol>,
}

impl CallExpr {
    /// Creates a call with no resolved callee.
    #[must_use]
    pub fn new(fun: Expr, args: Vec<Expr>) -> Self {
        Self {
            fun: Box::new(fun),
            args,
            ellipsis: false,
            callee: None,
        }
    }

    /// Sets the resolved callee.
    #[must_use]
    pub fn with_callee(mut self, callee: FuncSymbol) -> Self {
        self.callee = Some(callee);
        self
    }

    /// Marks the final argument as spread.
    #[must_use]
    pub fn with_ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }
}

/// One source file of a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the file, as it should appear in reports.
    pub path: PathBuf,
    /// Full file contents, used only for rendering snippets.
    #[serde(default)]
    pub content: Option<String>,
    /// Root expressions of the file. Calls nested anywhere below them are
    /// visited too.
    #[serde(default)]
    pub exprs: Vec<Expr>,
}

/// A type-checked package handed over by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageUnit {
    /// Import path of the package.
    pub path: String,
    /// Files belonging to the package.
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strips_package_qualifier() {
        let ty = Type::pointer(Type::named("go.uber.org/zap", "SugaredLogger"));
        assert_eq!(ty.to_string(), "*SugaredLogger");

        let generic = Type::Named {
            package: Some("example.com/log".into()),
            name: "Logger".into(),
            type_args: vec![Type::basic(BasicKind::String), Type::basic(BasicKind::Int)],
        };
        assert_eq!(generic.to_string(), "Logger[string, int]");
    }

    #[test]
    fn any_is_empty_interface() {
        assert!(Type::any().is_empty_interface());
        assert!(Type::empty_interface().is_empty_interface());
        assert!(!Type::Interface {
            methods: vec!["Error".into()]
        }
        .is_empty_interface());
        assert!(!Type::basic(BasicKind::String).is_empty_interface());
    }

    #[test]
    fn named_string_type_is_not_string() {
        assert!(Type::basic(BasicKind::UntypedString).is_string());
        assert!(Type::alias(None, "String", Type::basic(BasicKind::String)).is_string());
        assert!(!Type::named("a", "Str").is_string());
    }

    #[test]
    fn variadic_elem_requires_slice() {
        let sig = Signature::key_values(vec![Type::basic(BasicKind::String)]);
        assert_eq!(sig.variadic_elem(), Some(&Type::empty_interface()));
        assert_eq!(Signature::new(vec![], true).variadic_elem(), None);
        let plain = Signature::new(vec![Type::slice(Type::any())], false);
        assert_eq!(plain.variadic_elem(), None);
    }

    #[test]
    fn render_reconstructs_source() {
        let inner = CallExpr::new(
            Expr::ident("string", Some(ObjKind::TypeName)),
            vec![Expr::ident("key1", Some(ObjKind::Var))],
        );
        assert_eq!(Expr::call(inner).render(), "string(key1)");

        let sel = Expr::selector(
            Expr::ident("otherpkg", Some(ObjKind::Package)),
            "KeyStr",
            Some(ObjKind::Const),
        );
        assert_eq!(sel.render(), "otherpkg.KeyStr");
        assert_eq!(Expr::string_lit("a\"b").render(), r#""a\"b""#);
        assert_eq!(sel.with_text("printed").render(), "printed");
    }

    #[test]
    fn for_each_call_visits_nested_calls_in_preorder() {
        // log.With("k", "v").Info("msg")
        let with = CallExpr::new(
            Expr::ident("With", None),
            vec![Expr::string_lit("k"), Expr::string_lit("v")],
        );
        let outer = CallExpr::new(
            Expr::selector(Expr::call(with), "Info", None),
            vec![Expr::string_lit("msg")],
        );
        let root = Expr::call(outer);

        let mut seen = Vec::new();
        root.for_each_call(&mut |call| seen.push(call.args.len()));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn deserializes_host_dump() {
        let json = r#"{
            "expr": "call",
            "fun": { "expr": "ident", "name": "InfoS" },
            "args": [
                { "expr": "basic_lit", "lit": "string", "token": "\"msg\"",
                  "span": { "start": { "line": 3, "column": 12 }, "end": { "line": 3, "column": 17 } } },
                { "expr": "ident", "name": "Key", "obj": "const",
                  "type": { "kind": "basic", "basic": "string" }, "value": "key" }
            ],
            "callee": {
                "name": "InfoS",
                "package": "k8s.io/klog/v2",
                "signature": {
                    "params": [
                        { "type": { "kind": "basic", "basic": "string" } },
                        { "type": { "kind": "slice", "elem": { "kind": "interface" } } }
                    ],
                    "variadic": true
                }
            }
        }"#;
        let expr: Expr = serde_json::from_str(json).expect("dump should deserialize");
        let ExprKind::Call(call) = &expr.kind else {
            panic!("expected a call, got {expr:?}");
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[0].span.start.column, 12);
        assert_eq!(call.args[1].value, Some(ConstValue::String("key".into())));
        let callee = call.callee.as_ref().expect("callee");
        assert_eq!(
            callee.signature.variadic_elem(),
            Some(&Type::empty_interface())
        );
    }
}
