//! The scanner proper: turns characters into [`Token`]s.

use a68_diagnostic::{Diagnostic, Diagnostics, ErrorCode, Fatal};
use a68_ir::{Attribute, Options, SourceLines, StringInterner, Stropping};

use crate::cursor::Cursor;
use crate::keywords::{self, Delimiter};
use crate::Token;

pub(crate) struct Scanner<'a> {
    cursor: Cursor,
    lines: &'a mut SourceLines,
    options: &'a mut Options,
    interner: &'a StringInterner,
    diagnostics: &'a mut Diagnostics,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(
        lines: &'a mut SourceLines,
        options: &'a mut Options,
        interner: &'a StringInterner,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        let cursor = Cursor::new(lines);
        diagnostics.set_no_warnings(options.no_warnings);
        Scanner {
            cursor,
            lines,
            options,
            interner,
            diagnostics,
            tokens: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Vec<Token>, Fatal> {
        loop {
            self.cursor.take_while(char::is_whitespace);
            let Some(c) = self.cursor.current() else {
                break;
            };
            let start = self.cursor.offset();
            match c {
                '#' => self.hash_comment(start)?,
                '"' => self.string(start)?,
                ':' => self.colon(start),
                '|' => {
                    self.cursor.bump();
                    if self.cursor.eat(':') {
                        self.push(Attribute::ElseBarSymbol, "|:", start);
                    } else {
                        self.push(Attribute::BarSymbol, "|", start);
                    }
                }
                '.' if self.cursor.peek(1).is_some_and(|d| d.is_ascii_digit()) => {
                    self.number(start)?;
                }
                '.' => {
                    self.cursor.bump();
                    self.push(Attribute::PointSymbol, ".", start);
                }
                '0'..='9' => self.number(start)?,
                '\'' if self.options.stropping == Stropping::Quote => self.quoted_word(start)?,
                c if c.is_ascii_uppercase() && self.options.stropping == Stropping::Bold => {
                    let word = self
                        .cursor
                        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
                    self.bold_word(word, start)?;
                }
                c if c.is_ascii_alphabetic() => self.identifier(start),
                c if keywords::is_monad(c) => self.operator(start),
                c => {
                    if let Some(attribute) = keywords::punctuation(c, self.options.brackets) {
                        self.cursor.bump();
                        self.push(attribute, attribute.name(), start);
                    } else {
                        self.cursor.bump();
                        self.error(
                            ErrorCode::E0002,
                            start,
                            format!("character \"{c}\" is not allowed here"),
                        )?;
                    }
                }
            }
        }
        tracing::debug!(tokens = self.tokens.len(), "scanned source");
        Ok(self.tokens)
    }

    fn push(&mut self, attribute: Attribute, text: &str, start: usize) {
        let symbol = self.interner.intern(text);
        let position = self.cursor.position_of(start);
        self.tokens.push(Token {
            attribute,
            symbol,
            position,
        });
    }

    fn error(&mut self, code: ErrorCode, start: usize, message: String) -> Result<(), Fatal> {
        let position = self.cursor.position_of(start);
        self.diagnostics
            .report(self.lines, Diagnostic::error(code, position, message))?;
        Ok(())
    }

    fn warning(&mut self, code: ErrorCode, start: usize, message: String) -> Result<(), Fatal> {
        let position = self.cursor.position_of(start);
        self.diagnostics
            .report(self.lines, Diagnostic::warning(code, position, message))?;
        Ok(())
    }

    /// A bold word with its stropping already removed.
    fn bold_word(&mut self, word: String, start: usize) -> Result<(), Fatal> {
        if let Some(delimiter) = keywords::delimiter(&word) {
            return self.enclosed(delimiter, &word, start);
        }
        if word == "GO" {
            let resume = self.cursor.offset();
            self.cursor.take_while(char::is_whitespace);
            if self.next_bold_word().as_deref() == Some("TO") {
                self.push(Attribute::GotoSymbol, "GOTO", start);
                return Ok(());
            }
            self.cursor.seek(resume);
        }
        match keywords::lookup_bold(&word) {
            Some(attribute) => self.push(attribute, &word, start),
            None => self.push(Attribute::BoldTag, &word, start),
        }
        Ok(())
    }

    /// Read the bold word at the cursor in the current stropping, if any.
    fn next_bold_word(&mut self) -> Option<String> {
        match self.options.stropping {
            Stropping::Bold => {
                let c = self.cursor.current()?;
                if !c.is_ascii_uppercase() {
                    return None;
                }
                Some(
                    self.cursor
                        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
                )
            }
            Stropping::Quote => {
                if self.cursor.current() != Some('\'') {
                    return None;
                }
                self.cursor.bump();
                let word = self
                    .cursor
                    .take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                self.cursor.eat('\'').then(|| word.to_ascii_uppercase())
            }
        }
    }

    fn quoted_word(&mut self, start: usize) -> Result<(), Fatal> {
        self.cursor.bump();
        let word = self
            .cursor
            .take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if !self.cursor.eat('\'') {
            self.error(
                ErrorCode::E0002,
                start,
                format!("quote-stropped word '{word} is not closed"),
            )?;
        }
        if word.is_empty() {
            return Ok(());
        }
        self.bold_word(word.to_ascii_uppercase(), start)
    }

    /// Skip a comment or read a pragmat up to the matching closing word.
    fn enclosed(&mut self, delimiter: Delimiter, word: &str, start: usize) -> Result<(), Fatal> {
        let mut text = String::new();
        loop {
            let Some(c) = self.cursor.current() else {
                let (code, what) = match delimiter {
                    Delimiter::Comment => (ErrorCode::E0004, "comment"),
                    Delimiter::Pragmat => (ErrorCode::E0005, "pragmat"),
                };
                return self.error(code, start, format!("{what} opened by {word} is not closed"));
            };
            let at_word = match self.options.stropping {
                Stropping::Bold => c.is_ascii_uppercase(),
                Stropping::Quote => c == '\'',
            };
            if at_word {
                if let Some(inner) = self.next_bold_word() {
                    if inner == word {
                        break;
                    }
                    text.push_str(&inner);
                    continue;
                }
                continue;
            }
            text.push(c);
            self.cursor.bump();
        }
        if delimiter == Delimiter::Pragmat {
            self.pragmat(&text, start)?;
        }
        Ok(())
    }

    fn pragmat(&mut self, text: &str, start: usize) -> Result<(), Fatal> {
        for item in text.split_whitespace() {
            if self.options.apply_pragmat_item(item) {
                tracing::debug!(item, "pragmat item");
            } else {
                self.warning(
                    ErrorCode::W0003,
                    start,
                    format!("pragmat item \"{item}\" is not recognised"),
                )?;
            }
        }
        self.diagnostics.set_no_warnings(self.options.no_warnings);
        Ok(())
    }

    fn hash_comment(&mut self, start: usize) -> Result<(), Fatal> {
        self.cursor.bump();
        loop {
            match self.cursor.bump() {
                Some('#') => return Ok(()),
                Some(_) => {}
                None => {
                    return self.error(
                        ErrorCode::E0004,
                        start,
                        "comment opened by # is not closed".to_owned(),
                    );
                }
            }
        }
    }

    fn string(&mut self, start: usize) -> Result<(), Fatal> {
        self.cursor.bump();
        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None | Some('\n') => {
                    self.error(
                        ErrorCode::E0001,
                        start,
                        "string denotation is not closed".to_owned(),
                    )?;
                    break;
                }
                Some('"') => {
                    self.cursor.bump();
                    if self.cursor.eat('"') {
                        text.push('"');
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.cursor.bump();
                }
            }
        }
        self.push(Attribute::RowCharDenotation, &text, start);
        Ok(())
    }

    fn colon(&mut self, start: usize) {
        if self.cursor.starts_with(":=:") {
            self.advance(3);
            self.push(Attribute::IsSymbol, ":=:", start);
        } else if self.cursor.starts_with(":/=:") {
            self.advance(4);
            self.push(Attribute::IsntSymbol, ":/=:", start);
        } else if self.cursor.starts_with(":=") {
            self.advance(2);
            self.push(Attribute::AssignSymbol, ":=", start);
        } else {
            self.advance(1);
            self.push(Attribute::ColonSymbol, ":", start);
        }
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.cursor.bump();
        }
    }

    /// Identifiers may contain spaces, which are not significant.
    fn identifier(&mut self, start: usize) {
        let quote = self.options.stropping == Stropping::Quote;
        let continues = |c: char| {
            c.is_ascii_digit() || c == '_' || c.is_ascii_lowercase() || (quote && c.is_ascii_alphabetic())
        };
        let mut name = String::new();
        loop {
            name.push_str(&self.cursor.take_while(continues));
            let mut ahead = 0;
            while matches!(self.cursor.peek(ahead), Some(' ' | '\t')) {
                ahead += 1;
            }
            match self.cursor.peek(ahead) {
                Some(c) if ahead > 0 && continues(c) => self.advance(ahead),
                _ => break,
            }
        }
        self.push(Attribute::Identifier, &name, start);
    }

    fn number(&mut self, start: usize) -> Result<(), Fatal> {
        let mut text = self.cursor.take_while(|c| c.is_ascii_digit());

        if self.cursor.current() == Some('r')
            && self.cursor.peek(1).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.cursor.bump();
            let digits = self.cursor.take_while(|c| c.is_ascii_hexdigit());
            if !matches!(text.as_str(), "2" | "4" | "8" | "16") {
                self.error(
                    ErrorCode::E0003,
                    start,
                    format!("radix {text} is not 2, 4, 8 or 16"),
                )?;
            }
            text.push('r');
            text.push_str(&digits.to_ascii_lowercase());
            self.push(Attribute::BitsDenotation, &text, start);
            return Ok(());
        }

        let mut real = false;
        if self.cursor.current() == Some('.')
            && self.cursor.peek(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.bump();
            text.push('.');
            text.push_str(&self.cursor.take_while(|c| c.is_ascii_digit()));
            real = true;
        }

        let exponent = match self.cursor.current() {
            Some('e' | '\\') => true,
            Some('E') => self.options.stropping == Stropping::Quote,
            _ => false,
        };
        if exponent {
            let sign = matches!(self.cursor.peek(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.cursor.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.bump();
                text.push('e');
                if sign {
                    text.extend(self.cursor.bump());
                }
                text.push_str(&self.cursor.take_while(|c| c.is_ascii_digit()));
                real = true;
            } else if sign {
                self.advance(2);
                self.error(
                    ErrorCode::E0003,
                    start,
                    format!("exponent of {text} has no digits"),
                )?;
                real = true;
            }
        }

        let attribute = if real {
            Attribute::RealDenotation
        } else {
            Attribute::IntDenotation
        };
        self.push(attribute, &text, start);
        Ok(())
    }

    /// An operator is a monad, at most one nomad, and an optional
    /// `:=` or `=:` suffix.
    fn operator(&mut self, start: usize) {
        let mut text = String::new();
        text.extend(self.cursor.bump());
        if let Some(c) = self.cursor.current().filter(|c| keywords::is_nomad(*c)) {
            // `=` followed by `:` is the start of `=:`, not a nomad.
            if !(c == '=' && self.cursor.peek(1) == Some(':')) {
                text.push(c);
                self.cursor.bump();
            }
        }
        if self.cursor.starts_with(":=") && !self.cursor.starts_with(":=:") {
            self.advance(2);
            text.push_str(":=");
        } else if self.cursor.starts_with("=:") {
            self.advance(2);
            text.push_str("=:");
        }
        if text == "=" {
            self.push(Attribute::EqualsSymbol, "=", start);
        } else {
            self.push(Attribute::Operator, &text, start);
        }
    }
}
