//! Lexer for Algol 68 source.
//!
//! Reads [`SourceLines`] and produces a flat list of [`Token`]s. Both
//! stropping regimes are supported:
//!
//! - bold (upper) stropping: `BEGIN INT x = 1; print (x) END`
//! - quote stropping: `'begin' 'int' x = 1; print (x) 'end'`
//!
//! Comments (`# .. #`, `CO .. CO`, `COMMENT .. COMMENT`) are skipped.
//! Pragmats (`PR .. PR`, `PRAGMAT .. PRAGMAT`) fold their items into the
//! [`Options`], so `PR quote stropping PR` switches regime mid-source.

mod cursor;
pub mod keywords;
mod scanner;

use a68_diagnostic::{Diagnostics, Fatal};
use a68_ir::{Attribute, Name, Options, Position, SourceLines, StringInterner, Stropping};

/// One lexeme.
///
/// `symbol` holds the lexeme text: the identifier with spaces removed, the
/// bold word without stropping, the operator, or the denotation. String
/// denotations hold their contents with doubled quotes collapsed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub attribute: Attribute,
    pub symbol: Name,
    pub position: Position,
}

a68_ir::static_assert_size!(Token, 16);

/// Split the source into tokens.
///
/// Lexical errors are reported to `diagnostics` and scanning continues;
/// only the error cap stops it.
#[tracing::instrument(level = "debug", skip_all, fields(file = lines.file()))]
pub fn lex(
    lines: &mut SourceLines,
    options: &mut Options,
    interner: &StringInterner,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Token>, Fatal> {
    scanner::Scanner::new(lines, options, interner, diagnostics).run()
}

/// Print tokens back as source text, one space between tokens.
///
/// Lexing the result again yields the same attributes and symbols.
pub fn print_tokens(tokens: &[Token], interner: &StringInterner, stropping: Stropping) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            // Spaces inside identifiers are not significant, so an
            // identifier and a following word must be split by a newline.
            let glued = tokens[i - 1].attribute == Attribute::Identifier
                && matches!(
                    token.attribute,
                    Attribute::Identifier
                        | Attribute::IntDenotation
                        | Attribute::RealDenotation
                        | Attribute::BitsDenotation
                );
            out.push(if glued { '\n' } else { ' ' });
        }
        let text = interner.lookup(token.symbol);
        match token.attribute {
            Attribute::RowCharDenotation => {
                out.push('"');
                out.push_str(&text.replace('"', "\"\""));
                out.push('"');
            }
            Attribute::GotoSymbol => push_bold(&mut out, "GOTO", stropping),
            Attribute::BoldTag => push_bold(&mut out, text, stropping),
            attribute if keywords::lookup_bold(text) == Some(attribute) => {
                push_bold(&mut out, text, stropping);
            }
            _ => out.push_str(text),
        }
    }
    out
}

fn push_bold(out: &mut String, word: &str, stropping: Stropping) {
    match stropping {
        Stropping::Bold => out.push_str(word),
        Stropping::Quote => {
            out.push('\'');
            out.push_str(&word.to_ascii_lowercase());
            out.push('\'');
        }
    }
}

#[cfg(test)]
mod tests;
