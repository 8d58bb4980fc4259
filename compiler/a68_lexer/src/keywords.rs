//! Reserved bold words and symbolic lexemes.
//!
//! Bold words that are not reserved are bold tags; the parser decides
//! whether each names a mode or an operator.

use a68_ir::Attribute;

/// Look up a reserved bold word (upper case, after stropping is removed).
///
/// `GO` is not listed: it is only a keyword when followed by `TO`, which
/// the scanner handles.
pub fn lookup_bold(word: &str) -> Option<Attribute> {
    // Bucket by length to keep each match small.
    match word.len() {
        2 => match word {
            "IF" => Some(Attribute::IfSymbol),
            "FI" => Some(Attribute::FiSymbol),
            "IN" => Some(Attribute::InSymbol),
            "BY" => Some(Attribute::BySymbol),
            "TO" => Some(Attribute::ToSymbol),
            "DO" => Some(Attribute::DoSymbol),
            "OD" => Some(Attribute::OdSymbol),
            "OP" => Some(Attribute::OpSymbol),
            "OF" => Some(Attribute::OfSymbol),
            "IS" => Some(Attribute::IsSymbol),
            _ => None,
        },
        3 => match word {
            "END" => Some(Attribute::EndSymbol),
            "OUT" => Some(Attribute::OutSymbol),
            "FOR" => Some(Attribute::ForSymbol),
            "NIL" => Some(Attribute::NilSymbol),
            "LOC" => Some(Attribute::LocSymbol),
            "REF" => Some(Attribute::RefSymbol),
            "ORF" => Some(Attribute::OrfSymbol),
            _ => None,
        },
        4 => match word {
            "THEN" => Some(Attribute::ThenSymbol),
            "ELIF" => Some(Attribute::ElifSymbol),
            "ELSE" => Some(Attribute::ElseSymbol),
            "CASE" => Some(Attribute::CaseSymbol),
            "OUSE" => Some(Attribute::OuseSymbol),
            "ESAC" => Some(Attribute::EsacSymbol),
            "FROM" => Some(Attribute::FromSymbol),
            "EXIT" => Some(Attribute::ExitSymbol),
            "GOTO" => Some(Attribute::GotoSymbol),
            "SKIP" => Some(Attribute::SkipSymbol),
            "TRUE" => Some(Attribute::TrueSymbol),
            "MODE" => Some(Attribute::ModeSymbol),
            "PRIO" => Some(Attribute::PrioSymbol),
            "PROC" => Some(Attribute::ProcSymbol),
            "HEAP" => Some(Attribute::HeapSymbol),
            "FLEX" => Some(Attribute::FlexSymbol),
            "LONG" => Some(Attribute::LongSymbol),
            "ISNT" => Some(Attribute::IsntSymbol),
            "ANDF" => Some(Attribute::AndfSymbol),
            "OREL" => Some(Attribute::OrfSymbol),
            _ => None,
        },
        5 => match word {
            "BEGIN" => Some(Attribute::BeginSymbol),
            "WHILE" => Some(Attribute::WhileSymbol),
            "EMPTY" => Some(Attribute::EmptySymbol),
            "FALSE" => Some(Attribute::FalseSymbol),
            "UNION" => Some(Attribute::UnionSymbol),
            "ANDTH" => Some(Attribute::AndfSymbol),
            _ => None,
        },
        6 => match word {
            "STRUCT" => Some(Attribute::StructSymbol),
            _ => None,
        },
        _ => None,
    }
}

/// Comment and pragmat delimiters among bold words.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Delimiter {
    Comment,
    Pragmat,
}

/// Whether `word` opens a comment or pragmat.
pub fn delimiter(word: &str) -> Option<Delimiter> {
    match word {
        "CO" | "COMMENT" => Some(Delimiter::Comment),
        "PR" | "PRAGMAT" => Some(Delimiter::Pragmat),
        _ => None,
    }
}

/// Characters that may start an operator symbol.
pub const fn is_monad(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '~' | '^' | '&' | '!' | '?' | '\\'
    )
}

/// Characters that may continue an operator symbol.
pub const fn is_nomad(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '/' | '*')
}

/// Attribute of a single punctuation character.
pub fn punctuation(c: char, brackets: bool) -> Option<Attribute> {
    match c {
        '(' => Some(Attribute::OpenSymbol),
        ')' => Some(Attribute::CloseSymbol),
        '[' => Some(Attribute::SubSymbol),
        ']' => Some(Attribute::BusSymbol),
        ',' => Some(Attribute::CommaSymbol),
        ';' => Some(Attribute::SemiSymbol),
        '{' if brackets => Some(Attribute::OpenSymbol),
        '}' if brackets => Some(Attribute::CloseSymbol),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
