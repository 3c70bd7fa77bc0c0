use tx_core::tokens::{Token, TokenKind};

mod lex_numbers;
mod lex_strings;

#[cfg(test)]
mod tests;

pub(crate) fn is_digit(chr: u8) -> bool {
  chr.is_ascii_digit()
}

pub(crate) fn is_hex_digit(chr: u8) -> bool {
  chr.is_ascii_hexdigit()
}

pub(crate) fn is_alpha(chr: u8) -> bool {
  chr.is_ascii_alphabetic() || chr == b'_'
}

/// A pull-driven tokenizer over a UTF-8 source string.
///
/// The compiler calls `scan_token` one token at a time; the
/// scanner never materializes the full token stream. Errors are
/// reported as `ERROR` tokens with the message in the lexeme.
pub struct Scanner<'src> {
  /// The source text being scanned.
  source: &'src str,
  /// The byte offset of the first character of the current token.
  start: usize,
  /// The byte offset of the next character to consume.
  current: usize,
  /// The current line number.
  line: usize,
  /// One open-brace counter per active string interpolation.
  /// When the top counter reaches zero the matching `}` closed
  /// the interpolation and string scanning resumes.
  interp_braces: Vec<u32>,
}

impl<'src> Scanner<'src> {
  pub fn new(source: &'src str) -> Scanner<'src> {
    Scanner {
      source,
      start: 0,
      current: 0,
      line: 1,
      interp_braces: Vec::new(),
    }
  }

  /// Scans and returns the next token in the source.
  pub fn scan_token(&mut self) -> Token<'src> {
    use TokenKind::*;

    self.skip_whitespace();
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(EOF);
    }

    let chr = self.advance();
    match chr {
      b'(' => self.make_token(LEFT_PAREN),
      b')' => self.make_token(RIGHT_PAREN),
      b'{' => {
        // Inside an interpolated expression, track the "{"
        if let Some(top) = self.interp_braces.last_mut() {
          *top += 1;
        }
        self.make_token(LEFT_BRACE)
      }
      b'}' => {
        // A "}" closing the innermost interpolation resumes the
        // surrounding string literal.
        if let Some(top) = self.interp_braces.last_mut() {
          *top -= 1;
          if *top == 0 {
            self.interp_braces.pop();
            return self.string();
          }
        }
        self.make_token(RIGHT_BRACE)
      }
      b'[' => self.make_token(LEFT_BRACKET),
      b']' => self.make_token(RIGHT_BRACKET),
      b':' => self.make_token(COLON),
      b';' => self.make_token(SEMICOLON),
      b',' => self.make_token(COMMA),
      b'.' => self.make_token(DOT),
      b'-' => self.make_token(MINUS),
      b'|' => self.make_token(PIPE),
      b'+' => self.make_token(PLUS),
      b'/' => self.make_token(SLASH),
      b'*' => self.make_token(STAR),
      b'!' => {
        let kind = if self.match_byte(b'=') { BANG_EQUAL } else { BANG };
        self.make_token(kind)
      }
      b'=' => {
        let kind = if self.match_byte(b'=') { EQUAL_EQUAL } else { EQUAL };
        self.make_token(kind)
      }
      b'<' => {
        let kind = if self.match_byte(b'=') { LESS_EQUAL } else { LESS };
        self.make_token(kind)
      }
      b'>' => {
        let kind = if self.match_byte(b'=') { GREATER_EQUAL } else { GREATER };
        self.make_token(kind)
      }
      b'"' => {
        if self.peek() == b'"' && self.peek_next() == b'"' {
          return self.raw_string();
        }
        self.string()
      }
      b'\'' => self.char_literal(),
      b'0' if self.peek() == b'x' || self.peek() == b'X' => self.hex_number(),
      chr if is_digit(chr) => self.number(),
      chr if is_alpha(chr) => self.identifier(),
      _ => self.error_token("Unexpected character."),
    }
  }

  /// Checks if the scanner is at the end of the source.
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  /// The current byte without consuming it; NUL at the end.
  pub(crate) fn peek(&self) -> u8 {
    if self.is_at_end() {
      return 0;
    }
    self.source.as_bytes()[self.current]
  }

  /// The byte at the given lookahead offset; NUL past the end.
  pub(crate) fn peek_at(&self, offset: usize) -> u8 {
    if self.current + offset >= self.source.len() {
      return 0;
    }
    self.source.as_bytes()[self.current + offset]
  }

  pub(crate) fn peek_next(&self) -> u8 {
    self.peek_at(1)
  }

  /// Consumes and returns the next byte; NUL at the end.
  pub(crate) fn advance(&mut self) -> u8 {
    if self.is_at_end() {
      return 0;
    }
    let chr = self.source.as_bytes()[self.current];
    self.current += 1;
    chr
  }

  /// Consumes and returns the next character, decoding UTF-8.
  /// Used inside string and character literals, where arbitrary
  /// text is allowed.
  pub(crate) fn advance_char(&mut self) -> char {
    let chr = self.source[self.current..].chars().next().unwrap_or('\0');
    self.current += chr.len_utf8();
    chr
  }

  /// Consumes the next byte only when it matches.
  pub(crate) fn match_byte(&mut self, expected: u8) -> bool {
    if self.is_at_end() || self.peek() != expected {
      return false;
    }
    self.current += 1;
    true
  }

  /// Skips spaces, tabs, carriage returns, newlines and `#` line
  /// comments, counting lines along the way.
  fn skip_whitespace(&mut self) {
    loop {
      match self.peek() {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.advance();
        }
        b'#' => {
          while self.peek() != b'\n' && !self.is_at_end() {
            self.advance();
          }
        }
        _ => return,
      }
    }
  }

  /// The lexeme of the token being scanned.
  pub(crate) fn lexeme(&self) -> &'src str {
    &self.source[self.start..self.current]
  }

  /// Generates a token spanning from the token start to the
  /// current position.
  pub(crate) fn make_token(&self, kind: TokenKind) -> Token<'src> {
    Token {
      kind,
      lexeme: self.lexeme(),
      line: self.line,
      literal: None,
    }
  }

  pub(crate) fn make_literal_token(
    &self,
    kind: TokenKind,
    literal: tx_core::tokens::Literal,
  ) -> Token<'src> {
    Token {
      kind,
      lexeme: self.lexeme(),
      line: self.line,
      literal: Some(literal),
    }
  }

  /// Generates an error token carrying the message as lexeme.
  pub(crate) fn error_token(&self, message: &'static str) -> Token<'src> {
    Token {
      kind: TokenKind::ERROR,
      lexeme: message,
      line: self.line,
      literal: None,
    }
  }

  /// Scans the remainder of an identifier and classifies it.
  fn identifier(&mut self) -> Token<'src> {
    while is_alpha(self.peek()) || is_digit(self.peek()) {
      self.advance();
    }
    self.make_token(self.identifier_kind())
  }

  /// Matches the tail of a keyword candidate against `rest`.
  fn check_keyword(&self, offset: usize, rest: &str, kind: TokenKind) -> TokenKind {
    if &self.source[self.start + offset..self.current] == rest {
      kind
    } else {
      TokenKind::IDENTIFIER
    }
  }

  /// Classifies the current lexeme as a keyword or identifier
  /// with a small trie over the first one to three bytes.
  fn identifier_kind(&self) -> TokenKind {
    use TokenKind::*;

    let lexeme = &self.source.as_bytes()[self.start..self.current];
    match lexeme[0] {
      b'a' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'n' => return self.check_keyword(2, "d", AND),
            b's' => {
              if lexeme.len() > 2 && lexeme[2] == b'y' {
                return self.check_keyword(3, "nc", ASYNC);
              }
              return self.check_keyword(2, "", AS);
            }
            b'w' => return self.check_keyword(2, "ait", AWAIT),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b'b' => self.check_keyword(1, "reak", BREAK),
      b'c' => self.check_keyword(1, "ontinue", CONTINUE),
      b'e' => self.check_keyword(1, "lse", ELSE),
      b'f' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'a' => return self.check_keyword(2, "lse", FALSE),
            b'o' => return self.check_keyword(2, "r", FOR),
            b'n' => return self.check_keyword(2, "", FN),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b'i' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'f' => return self.check_keyword(2, "", IF),
            b'm' => return self.check_keyword(2, "port", IMPORT),
            b'n' => {
              if lexeme.len() > 2 && lexeme[2] == b'o' {
                return self.check_keyword(3, "ut", INOUT);
              }
              return self.check_keyword(2, "", IN);
            }
            b's' => return self.check_keyword(2, "", IS),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b'l' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'e' => return self.check_keyword(2, "t", LET),
            b'o' => return self.check_keyword(2, "op", LOOP),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b'm' => self.check_keyword(1, "atch", MATCH),
      b'n' => self.check_keyword(1, "il", NIL),
      b'o' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'u' => return self.check_keyword(2, "t", OUT),
            b'r' => return self.check_keyword(2, "", OR),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b'r' => self.check_keyword(1, "eturn", RETURN),
      b's' => {
        if lexeme.len() > 1 {
          match lexeme[1] {
            b'e' => return self.check_keyword(2, "lf", SELF),
            b't' => return self.check_keyword(2, "ruct", STRUCT),
            b'u' => return self.check_keyword(2, "per", SUPER),
            _ => {}
          }
        }
        IDENTIFIER
      }
      b't' => self.check_keyword(1, "rue", TRUE),
      b'v' => self.check_keyword(1, "ar", VAR),
      b'w' => self.check_keyword(1, "hile", WHILE),
      b'A' => self.check_keyword(1, "ny", ANY_TYPE),
      b'B' => self.check_keyword(1, "ool", BOOL_TYPE),
      b'C' => self.check_keyword(1, "har", CHAR_TYPE),
      b'F' => self.check_keyword(1, "loat", FLOAT_TYPE),
      b'I' => self.check_keyword(1, "nt", INT_TYPE),
      b'N' => self.check_keyword(1, "il", NIL_TYPE),
      b'S' => self.check_keyword(1, "tr", STR_TYPE),
      _ => IDENTIFIER,
    }
  }
}
