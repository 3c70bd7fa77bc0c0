use tx_core::tokens::{Literal, Token, TokenKind};
use tx_core::MAX_INTERP_DEPTH;

use crate::{is_hex_digit, Scanner};

impl<'src> Scanner<'src> {
  /// Scans a plain string literal, decoding escape sequences into
  /// the token's literal value. The opening quote (or, when
  /// resuming after an interpolated expression, the closing `}`)
  /// has been consumed.
  ///
  /// On `${` the decoded prefix is emitted as a `STRING_INTERP`
  /// token and the caller's token stream continues with the
  /// embedded expression; `scan_token` resumes the string at the
  /// matching `}`.
  pub(crate) fn string(&mut self) -> Token<'src> {
    let mut value = String::new();

    loop {
      if self.is_at_end() {
        return self.error_token("Unterminated string.");
      }
      match self.peek() {
        b'"' => break,
        b'\n' => {
          self.line += 1;
          value.push('\n');
          self.advance();
        }
        // Bare carriage returns are dropped so that CRLF sources
        // produce the same strings as LF sources.
        b'\r' => {
          self.advance();
        }
        b'$' => {
          self.advance();
          if self.interp_braces.len() >= MAX_INTERP_DEPTH {
            return self.error_token("Nested string interpolation too deep.");
          }
          if self.peek() != b'{' {
            return self.error_token("Expect '{' after '$'.");
          }
          self.interp_braces.push(1);
          self.advance();
          return self.make_literal_token(TokenKind::STRING_INTERP, Literal::Str(value));
        }
        b'\\' => {
          self.advance();
          match self.escape_char() {
            Ok(chr) => value.push(chr),
            Err(message) => return self.error_token(message),
          }
        }
        _ => value.push(self.advance_char()),
      }
    }

    self.advance(); // the closing quote
    self.make_literal_token(TokenKind::STRING_LITERAL, Literal::Str(value))
  }

  /// Scans a triple-quoted raw string. No escape processing; a
  /// newline directly after the opening quotes and one directly
  /// before the closing quotes are stripped.
  pub(crate) fn raw_string(&mut self) -> Token<'src> {
    self.advance();
    self.advance();

    while !(self.peek() == b'"' && self.peek_next() == b'"' && self.peek_at(2) == b'"')
      && !self.is_at_end()
    {
      if self.peek() == b'\n' {
        self.line += 1;
      }
      self.advance();
    }
    if self.is_at_end() {
      return self.error_token("Unterminated raw string.");
    }
    self.advance();
    self.advance();
    self.advance();

    let lexeme = self.lexeme();
    let mut content = &lexeme[3..lexeme.len() - 3];
    if let Some(stripped) = content.strip_prefix('\n') {
      content = stripped;
    }
    if let Some(stripped) = content.strip_suffix('\n') {
      content = stripped;
    }
    self.make_literal_token(TokenKind::STRING_LITERAL, Literal::Str(content.to_owned()))
  }

  /// Scans a character literal. The opening quote has been
  /// consumed; escapes share the string escape table.
  pub(crate) fn char_literal(&mut self) -> Token<'src> {
    let value = match self.peek() {
      0 => return self.error_token("Unterminated character literal."),
      b'\n' => return self.error_token("Unterminated character literal."),
      b'\'' => {
        self.advance();
        return self.error_token("Empty character literal.");
      }
      b'\\' => {
        self.advance();
        match self.escape_char() {
          Ok(chr) => chr,
          Err(message) => return self.error_token(message),
        }
      }
      _ => self.advance_char(),
    };

    if !self.match_byte(b'\'') {
      return self.error_token("Unterminated character literal.");
    }
    self.make_literal_token(TokenKind::CHAR_LITERAL, Literal::Char(value))
  }

  /// Decodes one escape sequence; the backslash has been
  /// consumed.
  fn escape_char(&mut self) -> Result<char, &'static str> {
    match self.advance() {
      b'\\' => Ok('\\'),
      b'"' => Ok('"'),
      b'\'' => Ok('\''),
      b'$' => Ok('$'),
      b'0' => Ok('\0'),
      b'a' => Ok('\x07'),
      b'b' => Ok('\x08'),
      b'e' => Ok('\x1b'),
      b'f' => Ok('\x0c'),
      b'n' => Ok('\n'),
      b'r' => Ok('\r'),
      b't' => Ok('\t'),
      b'v' => Ok('\x0b'),
      b'x' => self
        .hex_escape(2)
        .and_then(char::from_u32)
        .ok_or("Invalid byte escape sequence."),
      b'u' => self
        .hex_escape(4)
        .and_then(char::from_u32)
        .ok_or("Invalid 16-bits Unicode escape sequence."),
      b'U' => self
        .hex_escape(8)
        .and_then(char::from_u32)
        .ok_or("Invalid 32-bits Unicode escape sequence."),
      _ => Err("Invalid escape character."),
    }
  }

  /// Consumes exactly `digits` hex digits and returns their
  /// value, or `None` when one of them is not a hex digit.
  fn hex_escape(&mut self, digits: usize) -> Option<u32> {
    let escape_start = self.current;
    for _ in 0..digits {
      if !is_hex_digit(self.peek()) {
        return None;
      }
      self.advance();
    }
    u32::from_str_radix(&self.source[escape_start..self.current], 16).ok()
  }
}
