//! Statement blocks: `name = expr` assignments and bare expressions.

use super::{expr, ParseError, TokenStream};
use tabkit_ast::{Stmt, StmtKind};
use tabkit_lexer::Token;

/// Parse statements until end of input.
pub(super) fn parse_block(stream: &mut TokenStream) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();

    loop {
        stream.skip_separators();
        if stream.at_end() {
            break;
        }

        statements.push(parse_statement(stream)?);

        match stream.peek() {
            None => break,
            Some(token) if token.is_separator() => continue,
            Some(token) => {
                return Err(ParseError::unexpected_token(
                    Some(token),
                    "after statement",
                    stream.current_span(),
                ));
            }
        }
    }

    Ok(statements)
}

/// Parse one statement.
fn parse_statement(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let lhs = expr::parse_expr(stream)?;

    if !stream.check(&Token::Eq) {
        let span = lhs.span;
        return Ok(Stmt::new(StmtKind::Expr(lhs), span));
    }

    let target = match lhs.as_name() {
        Some(name) => name.to_string(),
        None => {
            return Err(ParseError::invalid_syntax(
                format!("cannot assign to {}", lhs.describe()),
                lhs.span,
            ));
        }
    };
    stream.advance();

    let value = expr::parse_expr(stream)?;
    if stream.check(&Token::Eq) {
        return Err(ParseError::unsupported(
            "multiple targets are not allowed in assignment",
            stream.current_span(),
        ));
    }

    let span = lhs.span.merge(value.span);
    Ok(Stmt::new(StmtKind::Assign { target, value }, span))
}
