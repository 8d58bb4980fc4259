//! Refinement substitution.
//!
//! A program may end with a list of refinements after its outermost `.`:
//!
//! ```text
//! BEGIN read input; print result END.
//! read input: read (x).
//! print result: print (x * x).
//! ```
//!
//! Each applied occurrence of a refinement name is replaced by its tokens
//! before the structure is built. A refinement may be applied once.

use a68_diagnostic::{ErrorCode, Fatal};
use a68_ir::{Attribute, Name, Refinement};
use a68_lexer::Token;
use rustc_hash::FxHashMap;

use crate::brackets::depth_change;
use crate::Parser;

struct Definition {
    refinement: Refinement,
    body: Vec<Token>,
}

/// Split off and substitute refinements.
///
/// Returns the tokens of the main part with every application expanded,
/// and the bookkeeping record of each refinement.
pub(crate) fn substitute(
    parser: &mut Parser<'_>,
    tokens: &[Token],
) -> Result<(Vec<Token>, Vec<Refinement>), Fatal> {
    let Some(point) = outer_point(tokens) else {
        return Ok((tokens.to_vec(), Vec::new()));
    };
    let (main, definitions) = (&tokens[..point], &tokens[point + 1..]);

    let mut order = Vec::new();
    let mut by_name = FxHashMap::default();
    for (name_token, body) in split_definitions(parser, definitions)? {
        if by_name.contains_key(&name_token.symbol) {
            parser.error(
                ErrorCode::E1005,
                name_token.position,
                format!(
                    "refinement \"{}\" is defined more than once",
                    parser.text(name_token.symbol)
                ),
            )?;
            continue;
        }
        by_name.insert(name_token.symbol, order.len());
        order.push(Definition {
            refinement: Refinement::new(name_token.symbol, name_token.position.line),
            body,
        });
    }

    let mut expanded = Vec::with_capacity(main.len());
    let mut active = Vec::new();
    expand(parser, main, &by_name, &mut order, &mut active, &mut expanded)?;

    for definition in &order {
        let refinement = &definition.refinement;
        if refinement.applications == 0 {
            let position = definition
                .body
                .first()
                .map_or(a68_ir::Position::new(refinement.line_defined, 0), |t| t.position);
            parser.warning(
                ErrorCode::W0002,
                position,
                format!("refinement \"{}\" is not applied", parser.text(refinement.name)),
            )?;
        }
    }
    tracing::debug!(refinements = order.len(), "refinements substituted");
    Ok((expanded, order.into_iter().map(|d| d.refinement).collect()))
}

/// Index of the first `.` outside every bracket.
fn outer_point(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0isize;
    for (i, token) in tokens.iter().enumerate() {
        depth += depth_change(token.attribute);
        if depth == 0 && token.attribute == Attribute::PointSymbol {
            return Some(i);
        }
    }
    None
}

/// Split `name: tokens .` definitions; a missing final `.` is tolerated.
fn split_definitions(
    parser: &mut Parser<'_>,
    tokens: &[Token],
) -> Result<Vec<(Token, Vec<Token>)>, Fatal> {
    let mut definitions = Vec::new();
    let mut rest = tokens;
    while let Some(first) = rest.first() {
        let is_header = first.attribute == Attribute::Identifier
            && rest.get(1).is_some_and(|t| t.attribute == Attribute::ColonSymbol);
        if !is_header {
            parser.expected(first.position, "refinement definition")?;
            return Ok(definitions);
        }
        let body = &rest[2..];
        let end = outer_point(body).unwrap_or(body.len());
        definitions.push((*first, body[..end].to_vec()));
        rest = body.get(end + 1..).unwrap_or_default();
    }
    Ok(definitions)
}

fn expand(
    parser: &mut Parser<'_>,
    tokens: &[Token],
    by_name: &FxHashMap<Name, usize>,
    order: &mut Vec<Definition>,
    active: &mut Vec<usize>,
    out: &mut Vec<Token>,
) -> Result<(), Fatal> {
    for (i, token) in tokens.iter().enumerate() {
        let applied = token.attribute == Attribute::Identifier
            && !tokens
                .get(i + 1)
                .is_some_and(|t| t.attribute == Attribute::ColonSymbol);
        let Some(&index) = by_name.get(&token.symbol).filter(|_| applied) else {
            out.push(*token);
            continue;
        };
        let refinement = &mut order[index].refinement;
        refinement.applications += 1;
        if refinement.applications > 1 || active.contains(&index) {
            let name = refinement.name;
            parser.error(
                ErrorCode::E1006,
                token.position,
                format!("refinement \"{}\" is applied more than once", parser.text(name)),
            )?;
            continue;
        }
        refinement.line_applied = Some(token.position.line);
        let body = order[index].body.clone();
        active.push(index);
        a68_stack::ensure_sufficient_stack(|| {
            expand(parser, &body, by_name, order, active, out)
        })?;
        active.pop();
    }
    Ok(())
}
