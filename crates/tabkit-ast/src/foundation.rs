//! Foundation types shared by the parser, the schema model and the compiler.
//!
//! - [`Span`]: byte range of a construct inside one expression string
//! - [`BinaryOp`], [`UnaryOp`]: the closed operator sets of the language
//! - [`Type`]: the four-level value type lattice and its inference rules

use std::fmt;
use std::str::FromStr;

/// Byte range inside a single expression string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span from byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Binary operators supported by the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `**`
    Pow,
    /// `/`
    Div,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Operator as written in the expression language.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Pow => "**",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// Operator as written in awk. `and`/`or` map to the short-circuit
    /// operators and `**` to the POSIX `^`.
    pub fn awk_symbol(self) -> &'static str {
        match self {
            BinaryOp::Pow => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            other => other.symbol(),
        }
    }

    /// `==`, `!=`, `<`, `<=`, `>`, `>=`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }

    /// `and`, `or`
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators supported by the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `not x`
    Not,
}

impl UnaryOp {
    /// Operator as written in the expression language.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }

    /// Operator as written in awk.
    pub fn awk_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Value type of a column or compiled expression.
///
/// The four types form a total order from widest to narrowest:
/// `String > Floating > Integer > Boolean`. Widening is used when streams are
/// unioned, narrowing when they are intersected (inner joins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Arbitrary text (`str`).
    String,
    /// Floating point number (`float`).
    Floating,
    /// Integer number (`int`).
    Integer,
    /// Boolean (`bool`): `"0"` and the empty text are false.
    Boolean,
}

/// Error returned when a type name is not one of `str`, `float`, `int`, `bool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown type '{}'", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl Type {
    /// All types, widest first.
    pub const HIERARCHY: [Type; 4] = [Type::String, Type::Floating, Type::Integer, Type::Boolean];

    fn rank(self) -> usize {
        match self {
            Type::String => 0,
            Type::Floating => 1,
            Type::Integer => 2,
            Type::Boolean => 3,
        }
    }

    /// Widest type present in `types`, `None` for an empty set.
    pub fn widest<I: IntoIterator<Item = Type>>(types: I) -> Option<Type> {
        types.into_iter().min_by_key(|ty| ty.rank())
    }

    /// Narrowest type present in `types`, `None` for an empty set.
    pub fn narrowest<I: IntoIterator<Item = Type>>(types: I) -> Option<Type> {
        types.into_iter().max_by_key(|ty| ty.rank())
    }

    /// Pairwise [`Type::widest`].
    pub fn wider(self, other: Type) -> Type {
        if other.rank() < self.rank() {
            other
        } else {
            self
        }
    }

    /// Pairwise [`Type::narrowest`].
    pub fn narrower(self, other: Type) -> Type {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Name used in headers.
    pub fn name(self) -> &'static str {
        match self {
            Type::String => "str",
            Type::Floating => "float",
            Type::Integer => "int",
            Type::Boolean => "bool",
        }
    }

    /// Result type of a binary operation.
    ///
    /// `+ - * **` yield `Floating` if either side is floating and `Integer`
    /// otherwise, `/` always yields `Floating`, comparisons and logical
    /// operators yield `Boolean`.
    pub fn infer_binary(op: BinaryOp, left: Type, right: Type) -> Type {
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Pow => {
                if left == Type::Floating || right == Type::Floating {
                    Type::Floating
                } else {
                    Type::Integer
                }
            }
            BinaryOp::Div => Type::Floating,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::And
            | BinaryOp::Or => Type::Boolean,
        }
    }

    /// Result type of a unary operation.
    pub fn infer_unary(op: UnaryOp, operand: Type) -> Type {
        match op {
            UnaryOp::Neg if operand == Type::Floating => Type::Floating,
            UnaryOp::Neg => Type::Integer,
            UnaryOp::Not => Type::Boolean,
        }
    }

    /// Result type of a scalar function call, `None` for unknown functions.
    ///
    /// Every scalar function has a fixed result type regardless of its
    /// argument types.
    pub fn infer_call(function: &str, _args: &[Type]) -> Option<Type> {
        match function {
            "int" => Some(Type::Integer),
            "sprintf" => Some(Type::String),
            "log" | "exp" => Some(Type::Floating),
            "bool" => Some(Type::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(Type::String),
            "float" => Ok(Type::Floating),
            "int" => Ok(Type::Integer),
            "bool" => Ok(Type::Boolean),
            other => Err(UnknownType(other.to_string())),
        }
    }
}

/// Interpret a column value as a boolean: `"0"` and `""` are false.
pub fn parse_boolean(text: &str) -> bool {
    !text.is_empty() && text != "0"
}
