//! Lexer for the Go subset, including Go's automatic semicolon insertion.
//!
//! Comments are discarded; a comment containing a newline counts as a
//! newline for semicolon insertion, as in the Go scanner.

use gobloat_syntax::{Span, Token, TokenKind};
use smol_str::SmolStr;

use crate::ParseError;

pub(crate) struct Lexer<'a> {
    file: &'a str,
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(file: &'a str, src: &'a str) -> Self {
        Self {
            file,
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        loop {
            match self.scan_one()? {
                true => continue,
                false => break,
            }
        }
        self.insert_semi(self.pos);
        self.push(TokenKind::Eof, self.pos, self.pos);
        Ok(self.tokens)
    }

    /// Scan one token or skip one run of trivia. Returns false at EOF.
    fn scan_one(&mut self) -> Result<bool, ParseError> {
        loop {
            match self.peek() {
                None => return Ok(false),
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.pos += 1;
                }
                Some(b'\n') => {
                    self.insert_semi(self.pos);
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.skip_block_comment()?;
                }
                Some(_) => break,
            }
        }

        let start = self.pos;
        let c = self.bytes[self.pos];
        match c {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_word(start),
            0x80.. => self.scan_word(start),
            b'0'..=b'9' => self.scan_number(start)?,
            b'.' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => self.scan_number(start)?,
            b'"' => self.scan_string(start)?,
            b'`' => self.scan_raw_string(start)?,
            b'\'' => self.scan_rune(start)?,
            _ => self.scan_operator(start)?,
        }
        Ok(true)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    /// Insert a semicolon at a newline (or EOF) when the previous token can
    /// end a statement.
    fn insert_semi(&mut self, at: usize) {
        if let Some(last) = self.tokens.last() {
            if last.kind.ends_statement() {
                self.push(TokenKind::Semi, at, at);
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        let mut had_newline = false;
        loop {
            match self.peek() {
                None => return Err(self.error(start, "unterminated block comment")),
                Some(b'\n') => {
                    had_newline = true;
                    self.pos += 1;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        if had_newline {
            self.insert_semi(start);
        }
        Ok(())
    }

    fn scan_word(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            match c {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | 0x80.. => self.pos += 1,
                _ => break,
            }
        }
        let text = &self.src[start..self.pos];
        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(SmolStr::new(text)));
        self.push(kind, start, self.pos);
    }

    fn scan_number(&mut self, start: usize) -> Result<(), ParseError> {
        let mut is_float = false;
        if self.peek() == Some(b'0')
            && matches!(
                self.peek_at(1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            )
        {
            self.pos += 2;
            while matches!(
                self.peek(),
                Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' | b'_')
            ) {
                self.pos += 1;
            }
        } else {
            while matches!(self.peek(), Some(b'0'..=b'9' | b'_')) {
                self.pos += 1;
            }
            if self.peek() == Some(b'.') && !matches!(self.peek_at(1), Some(b'.')) {
                is_float = true;
                self.pos += 1;
                while matches!(self.peek(), Some(b'0'..=b'9' | b'_')) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                if !matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.error(self.pos, "malformed floating-point exponent"));
                }
                while matches!(self.peek(), Some(b'0'..=b'9' | b'_')) {
                    self.pos += 1;
                }
            }
        }
        let text = SmolStr::new(&self.src[start..self.pos]);
        let kind = if self.peek() == Some(b'i') {
            self.pos += 1;
            TokenKind::Imag(SmolStr::new(&self.src[start..self.pos]))
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        self.push(kind, start, self.pos);
        Ok(())
    }

    fn scan_string(&mut self, start: usize) -> Result<(), ParseError> {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(self.error(start, "unterminated string literal"))
                }
                Some(b'\\') => {
                    if self.peek_at(1).is_none() {
                        return Err(self.error(start, "unterminated string literal"));
                    }
                    self.pos += 2;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text = SmolStr::new(&self.src[start..self.pos]);
        self.push(TokenKind::Str(text), start, self.pos);
        Ok(())
    }

    fn scan_raw_string(&mut self, start: usize) -> Result<(), ParseError> {
        self.pos += 1;
        loop {
            match self.peek() {
                None => return Err(self.error(start, "unterminated raw string literal")),
                Some(b'`') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text = SmolStr::new(&self.src[start..self.pos]);
        self.push(TokenKind::Str(text), start, self.pos);
        Ok(())
    }

    fn scan_rune(&mut self, start: usize) -> Result<(), ParseError> {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(self.error(start, "unterminated rune literal")),
                Some(b'\\') => {
                    if self.peek_at(1).is_none() {
                        return Err(self.error(start, "unterminated rune literal"));
                    }
                    self.pos += 2;
                }
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text = SmolStr::new(&self.src[start..self.pos]);
        self.push(TokenKind::Rune(text), start, self.pos);
        Ok(())
    }

    fn scan_operator(&mut self, start: usize) -> Result<(), ParseError> {
        use TokenKind::*;
        let rest = &self.bytes[self.pos..];
        // Longest match first.
        let table: &[(&[u8], TokenKind)] = &[
            (b"<<=", ShlEq),
            (b">>=", ShrEq),
            (b"&^=", AmpCaretEq),
            (b"...", Ellipsis),
            (b"+=", PlusEq),
            (b"-=", MinusEq),
            (b"*=", StarEq),
            (b"/=", SlashEq),
            (b"%=", PercentEq),
            (b"&=", AmpEq),
            (b"|=", PipeEq),
            (b"^=", CaretEq),
            (b"&&", AndAnd),
            (b"||", OrOr),
            (b"<-", Arrow),
            (b"++", Inc),
            (b"--", Dec),
            (b"==", EqEq),
            (b"!=", NotEq),
            (b"<=", LtEq),
            (b">=", GtEq),
            (b":=", Define),
            (b"<<", Shl),
            (b">>", Shr),
            (b"&^", AmpCaret),
            (b"+", Plus),
            (b"-", Minus),
            (b"*", Star),
            (b"/", Slash),
            (b"%", Percent),
            (b"&", Amp),
            (b"|", Pipe),
            (b"^", Caret),
            (b"<", Lt),
            (b">", Gt),
            (b"=", Eq),
            (b"!", Not),
            (b"(", LParen),
            (b"[", LBracket),
            (b"{", LBrace),
            (b",", Comma),
            (b".", Dot),
            (b")", RParen),
            (b"]", RBracket),
            (b"}", RBrace),
            (b";", Semi),
            (b":", Colon),
        ];
        for (text, kind) in table {
            if rest.starts_with(text) {
                self.pos += text.len();
                self.push(kind.clone(), start, self.pos);
                return Ok(());
            }
        }
        Err(self.error(
            start,
            format!("unexpected character {:?}", self.src[start..].chars().next().unwrap_or('\0')),
        ))
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.file, self.src, offset as u32, message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new("test.go", src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn inserts_semicolons_at_newlines() {
        let toks = kinds("x = 1\ny++\n");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int("1".into()),
                TokenKind::Semi,
                TokenKind::Ident("y".into()),
                TokenKind::Inc,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operators() {
        let toks = kinds("x +\n1\n");
        // No semicolon after '+'; one after the trailing literal.
        let semis = toks.iter().filter(|k| **k == TokenKind::Semi).count();
        assert_eq!(semis, 1);
        assert_eq!(toks.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn keywords_and_defines() {
        let toks = kinds("if x := recover(); x != nil {}");
        assert_eq!(toks[0], TokenKind::If);
        assert!(toks.contains(&TokenKind::Define));
        assert!(toks.contains(&TokenKind::NotEq));
    }

    #[test]
    fn line_comments_count_as_newlines() {
        let toks = kinds("x = 1 // trailing\ny = 2");
        let semis = toks.iter().filter(|k| **k == TokenKind::Semi).count();
        assert_eq!(semis, 2); // one per line, the last inserted at EOF
    }

    #[test]
    fn raw_strings_keep_newlines() {
        let toks = kinds("s := `a\nb`");
        assert!(matches!(&toks[2], TokenKind::Str(t) if t.as_str() == "`a\nb`"));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::new("test.go", "s := \"abc\n").tokenize().is_err());
    }
}
