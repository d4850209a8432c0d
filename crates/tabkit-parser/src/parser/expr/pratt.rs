//! Pratt parser core - precedence climbing for binary and unary operators.

use super::super::{ParseError, TokenStream};
use super::atoms;
use tabkit_ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use tabkit_lexer::Token;

/// Binding power of the operand of `not`: comparisons and tighter.
const NOT_PREC: u8 = 30;

/// Binding power of the operand of unary `-`: only `**` binds tighter.
const NEG_PREC: u8 = 70;

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Get binary operator metadata (precedence, associativity, and operator enum).
///
/// Returns (precedence, associativity, op) where higher precedence = tighter binding.
/// This is the single source of truth for binary operator parsing.
fn binary_op_info(token: &Token) -> Option<(u8, Assoc, BinaryOp)> {
    match token {
        Token::Or => Some((10, Assoc::Left, BinaryOp::Or)),
        Token::And => Some((20, Assoc::Left, BinaryOp::And)),
        Token::EqEq => Some((40, Assoc::Left, BinaryOp::Eq)),
        Token::BangEq => Some((40, Assoc::Left, BinaryOp::Ne)),
        Token::Lt => Some((40, Assoc::Left, BinaryOp::Lt)),
        Token::LtEq => Some((40, Assoc::Left, BinaryOp::Le)),
        Token::Gt => Some((40, Assoc::Left, BinaryOp::Gt)),
        Token::GtEq => Some((40, Assoc::Left, BinaryOp::Ge)),
        Token::Plus => Some((50, Assoc::Left, BinaryOp::Add)),
        Token::Minus => Some((50, Assoc::Left, BinaryOp::Sub)),
        Token::Star => Some((60, Assoc::Left, BinaryOp::Mul)),
        Token::Slash => Some((60, Assoc::Left, BinaryOp::Div)),
        Token::StarStar => Some((80, Assoc::Right, BinaryOp::Pow)),
        _ => None,
    }
}

/// Pratt parser - handles binary operators with precedence climbing.
///
/// Comparisons do not chain: `a < b < c` is rejected instead of being read
/// as `(a < b) < c`.
pub(super) fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    let mut left = parse_prefix(stream, min_prec)?;
    let mut after_comparison = false;

    while let Some(token) = stream.peek() {
        let Some((prec, assoc, op)) = binary_op_info(token) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        if op.is_comparison() && after_comparison {
            return Err(ParseError::unsupported(
                "multiple comparators are not supported",
                stream.current_span(),
            ));
        }

        stream.advance();

        let next_prec = if assoc == Assoc::Left { prec + 1 } else { prec };
        let right = parse_pratt(stream, next_prec)?;

        let span = left.span.merge(right.span);
        left = Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        );
        after_comparison = op.is_comparison();
    }

    Ok(left)
}

/// Parse prefix expressions (unary operators, atoms).
///
/// `not` binds looser than comparisons and arithmetic, so it cannot start
/// an operand of one without parentheses: `a == not b` is rejected.
fn parse_prefix(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    let (op, operand_prec) = match stream.peek() {
        Some(Token::Minus) => (UnaryOp::Neg, NEG_PREC),
        Some(Token::Not) if min_prec > NOT_PREC => {
            return Err(ParseError::unsupported(
                "'not' must be parenthesized as an operand of a comparison or arithmetic",
                stream.current_span(),
            ));
        }
        Some(Token::Not) => (UnaryOp::Not, NOT_PREC),
        _ => return atoms::parse_atom(stream),
    };

    let start = stream.current_span();
    stream.advance();
    let operand = parse_pratt(stream, operand_prec)?;
    let span = start.merge(operand.span);

    Ok(Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    ))
}
