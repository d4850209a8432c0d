// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the tabkit expression language.
//!
//! Expressions are tiny: names, numeric and string literals, arithmetic,
//! comparisons, `and`/`or`/`not`, function calls and assignments. Statements
//! are separated by `;` or newlines.
//!
//! # Design
//!
//! - `Token`: every token kind, derived with logos
//! - `#` comments, spaces and tabs are skipped (newlines are tokens)
//! - Anything the grammar does not know (`.`, `[`, `@`, ...) is a lexer error,
//!   which the parser reports as an unsupported construct
//!
//! # Examples
//!
//! ```
//! # use tabkit_lexer::Token;
//! # use logos::Logos;
//! let tokens: Vec<Result<Token, ()>> = Token::lexer("total = a + b").collect();
//! assert_eq!(tokens.len(), 5);
//! ```

use logos::Logos;
use std::rc::Rc;

/// Expression-language token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // === Keywords ===
    /// Keyword `and`
    #[token("and")]
    And,
    /// Keyword `or`
    #[token("or")]
    Or,
    /// Keyword `not`
    #[token("not")]
    Not,

    // === Operators ===
    /// Operator `+`
    #[token("+")]
    Plus,
    /// Operator `-`
    #[token("-")]
    Minus,
    /// Operator `*`
    #[token("*")]
    Star,
    /// Operator `**`
    #[token("**")]
    StarStar,
    /// Operator `/`
    #[token("/")]
    Slash,
    /// Operator `==`
    #[token("==")]
    EqEq,
    /// Operator `!=`
    #[token("!=")]
    BangEq,
    /// Operator `<`
    #[token("<")]
    Lt,
    /// Operator `<=`
    #[token("<=")]
    LtEq,
    /// Operator `>`
    #[token(">")]
    Gt,
    /// Operator `>=`
    #[token(">=")]
    GtEq,
    /// Assignment `=`
    #[token("=")]
    Eq,

    // === Delimiters ===
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Delimiter `,`
    #[token(",")]
    Comma,
    /// Statement separator `;`
    #[token(";")]
    Semicolon,
    /// Statement separator (line break)
    #[token("\n")]
    Newline,

    // === Literals ===
    /// Integer literal (e.g., 42, 0, 1000)
    ///
    /// Overflowing literals fail the callback and surface as a lexer error
    /// carrying the literal text.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    /// Float literal (e.g., 3.14, 1., .5, 5.67e-8)
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// String literal, double or single quoted (e.g., "a,b", 'x')
    ///
    /// Uses `Rc<str>` for cheap cloning through the parser.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| unquote(lex.slice()))]
    String(Rc<str>),

    /// Identifier (column names, bound names, function names)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Strip the surrounding quotes and resolve escapes.
fn unquote(literal: &str) -> Option<Rc<str>> {
    let content = &literal[1..literal.len() - 1];
    unescape_string(content).map(|s| Rc::from(s.as_str()))
}

/// Unescape a string literal content.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                // Unsupported escape sequence or trailing backslash
                Some(_) | None => return None,
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

impl Token {
    /// Returns true for tokens that end a statement.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Semicolon | Token::Newline)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Token::Integer(n) => return write!(f, "{}", n),
            Token::Float(x) => return write!(f, "{}", x),
            Token::String(s) => return write!(f, "{:?}", s),
            Token::Ident(id) => return write!(f, "{}", id),
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::StarStar => "**",
            Token::Slash => "/",
            Token::EqEq => "==",
            Token::BangEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Eq => "=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Newline => "newline",
        };
        f.write_str(text)
    }
}
