//! Parenthesis check.
//!
//! Runs on the raw token list before any reduction, so a missing closer is
//! reported once at a sensible place instead of as a cascade of syntax
//! errors further on.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, Position};
use a68_lexer::Token;

use crate::Parser;

/// Check that every opening bracket is closed by its partner.
///
/// Returns `false` after reporting the first imbalance.
pub(crate) fn check(parser: &mut Parser<'_>, tokens: &[Token]) -> Result<bool, Fatal> {
    match first_imbalance(tokens) {
        None => Ok(true),
        Some((position, expected)) => {
            tracing::debug!(?position, %expected, "unbalanced brackets");
            parser.error(
                ErrorCode::E1001,
                position,
                format!("parenthesis error, check for {expected}"),
            )?;
            Ok(false)
        }
    }
}

/// Position and expected bracket of the first mismatch, if any.
fn first_imbalance(tokens: &[Token]) -> Option<(Position, Attribute)> {
    let mut open: Vec<&Token> = Vec::new();
    for token in tokens {
        if token.attribute.closer_of().is_some() {
            open.push(token);
        } else if let Some(opener) = token.attribute.opener_of() {
            match open.pop() {
                Some(top) if top.attribute == opener => {}
                Some(top) => {
                    let expected = top.attribute.closer_of()?;
                    return Some((token.position, expected));
                }
                None => return Some((token.position, opener)),
            }
        }
    }
    let top = open.pop()?;
    Some((top.position, top.attribute.closer_of()?))
}

/// Bracket depth change caused by `attribute`.
pub(crate) fn depth_change(attribute: Attribute) -> isize {
    if attribute.closer_of().is_some() {
        1
    } else if attribute.opener_of().is_some() {
        -1
    } else {
        0
    }
}
