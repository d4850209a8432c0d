//! Atomic expressions - literals, names, calls, parenthesized expressions.

use super::super::{ParseError, TokenStream};
use tabkit_ast::{Expr, ExprKind};
use tabkit_lexer::Token;

/// Parse atomic expressions (literals, names, calls, parentheses).
pub(super) fn parse_atom(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let span = stream.current_span();

    let expr = match stream.peek() {
        Some(Token::Integer(n)) => {
            stream.advance();
            Expr::new(ExprKind::Integer(*n), span)
        }
        Some(Token::Float(x)) => {
            stream.advance();
            Expr::new(ExprKind::Float(*x), span)
        }
        Some(Token::String(s)) => {
            stream.advance();
            Expr::new(ExprKind::String(s.to_string()), span)
        }
        Some(Token::Ident(name)) => {
            stream.advance();
            if stream.check(&Token::LParen) {
                return parse_call(stream, name.to_string(), span);
            }
            Expr::new(ExprKind::Name(name.to_string()), span)
        }
        Some(Token::LParen) => parse_parenthesized(stream)?,
        other => {
            return Err(ParseError::unexpected_token(other, "in expression", span));
        }
    };

    if stream.check(&Token::LParen) {
        return Err(ParseError::invalid_syntax(
            format!("a {} cannot be called", expr.describe()),
            stream.current_span(),
        ));
    }

    Ok(expr)
}

/// Parse parenthesized expression.
fn parse_parenthesized(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let open = stream.expect(Token::LParen)?;
    let mut expr = super::parse_expr(stream)?;
    let close = stream.expect(Token::RParen)?;
    expr.span = open.merge(close);
    Ok(expr)
}

/// Parse a call's argument list; the function name is already consumed.
///
/// Only positional arguments are accepted: `f(x=1)`, `f(*xs)` and
/// `f(**kw)` are rejected.
fn parse_call(
    stream: &mut TokenStream,
    function: String,
    start: tabkit_ast::Span,
) -> Result<Expr, ParseError> {
    stream.expect(Token::LParen)?;

    let mut args = Vec::new();
    while !stream.check(&Token::RParen) {
        if matches!(stream.peek(), Some(Token::Star) | Some(Token::StarStar)) {
            return Err(ParseError::unsupported(
                "only positional arguments to functions allowed",
                stream.current_span(),
            ));
        }

        args.push(super::parse_expr(stream)?);

        if stream.check(&Token::Eq) {
            return Err(ParseError::unsupported(
                "only positional arguments to functions allowed",
                stream.current_span(),
            ));
        }
        if !stream.check(&Token::RParen) {
            stream.expect(Token::Comma)?;
        }
    }

    let close = stream.expect(Token::RParen)?;

    Ok(Expr::new(
        ExprKind::Call { function, args },
        start.merge(close),
    ))
}
