use tx_core::tokens::{Literal, Token, TokenKind};
use tx_core::{utils, MAX_CHARS_IN_NUMERIC_LITERAL};

use crate::{is_digit, is_hex_digit, Scanner};

impl<'src> Scanner<'src> {
  /// Scans a decimal numeric literal. The first digit has been
  /// consumed. A `.` followed by a digit or separator, or an
  /// `e`/`E` exponent, promotes the literal to a float.
  pub(crate) fn number(&mut self) -> Token<'src> {
    let mut kind = TokenKind::INTEGER_LITERAL;

    while is_digit(self.peek()) || self.peek() == b'_' {
      self.advance();
    }

    if self.peek() == b'.' && (is_digit(self.peek_next()) || self.peek_next() == b'_') {
      self.advance();
      while is_digit(self.peek()) || self.peek() == b'_' {
        self.advance();
      }
      kind = TokenKind::FLOAT_LITERAL;
    }

    if self.match_byte(b'e') || self.match_byte(b'E') {
      if !self.match_byte(b'+') {
        self.match_byte(b'-');
      }
      if !is_digit(self.peek()) && self.peek() != b'_' {
        return self.error_token("Unterminated scientific notation.");
      }
      while is_digit(self.peek()) || self.peek() == b'_' {
        self.advance();
      }
      kind = TokenKind::FLOAT_LITERAL;
    }

    let lexeme = self.lexeme();
    if lexeme.len() > MAX_CHARS_IN_NUMERIC_LITERAL {
      return self.error_token("Numeric literal too long.");
    }

    match kind {
      TokenKind::INTEGER_LITERAL => match utils::parse_int_lexeme(lexeme) {
        Ok(value) => self.make_literal_token(kind, Literal::Int(value)),
        Err(_) => self.error_token("Numeric literal out of range."),
      },
      _ => match utils::parse_float_lexeme(lexeme) {
        Ok(value) => self.make_literal_token(kind, Literal::Float(value)),
        Err(_) => self.error_token("Numeric literal out of range."),
      },
    }
  }

  /// Scans a `0x`/`0X` hexadecimal integer literal. The leading
  /// zero has been consumed.
  pub(crate) fn hex_number(&mut self) -> Token<'src> {
    self.advance(); // the 'x'

    while is_hex_digit(self.peek()) || self.peek() == b'_' {
      self.advance();
    }

    let lexeme = self.lexeme();
    if lexeme.len() > MAX_CHARS_IN_NUMERIC_LITERAL {
      return self.error_token("Hexadecimal integer literal too long.");
    }

    match utils::parse_hex_lexeme(lexeme) {
      Ok(value) => self.make_literal_token(TokenKind::INTEGER_LITERAL, Literal::Int(value)),
      Err(_) => self.error_token("Hexadecimal integer literal out of range."),
    }
  }
}
