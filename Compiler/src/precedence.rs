use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use tx_core::tokens::TokenKind;

/// Expression precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[repr(u8)]
pub enum Precedence {
  None,
  Assignment, // =
  Or,         // or
  And,        // and
  Equality,   // == !=
  Comparison, // < <= > >=
  Term,       // + -
  Factor,     // * /
  Unary,      // ! -
  Call,       // ( .
  Primary,
}

impl Precedence {
  /// The next-higher precedence level. Used by left-associative
  /// infix rules to bind their right operand tighter.
  pub fn next(self) -> Precedence {
    FromPrimitive::from_u8(self as u8 + 1).unwrap_or(Precedence::Primary)
  }
}

/// The parse actions a token can trigger. Dispatched through a
/// `match` in the parser rather than through function pointers.
#[derive(Debug, Clone, Copy)]
pub enum ParseFn {
  Grouping,
  Unary,
  Binary,
  Literal,
  Interpolation,
  Variable,
  And,
  Or,
  Call,
  Block,
  If,
  Loop,
  Fn,
}

/// One row of the Pratt rule table.
pub struct ParseRule {
  pub prefix: Option<ParseFn>,
  pub infix: Option<ParseFn>,
  pub precedence: Precedence,
}

const fn rule(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> ParseRule {
  ParseRule {
    prefix,
    infix,
    precedence,
  }
}

/// The rule for a token kind. Tokens with no entry can neither
/// start nor continue an expression.
pub fn get_rule(kind: TokenKind) -> ParseRule {
  use Precedence as P;
  use TokenKind::*;

  match kind {
    LEFT_PAREN => rule(Some(ParseFn::Grouping), Some(ParseFn::Call), P::Call),
    LEFT_BRACE => rule(Some(ParseFn::Block), None, P::None),
    MINUS => rule(Some(ParseFn::Unary), Some(ParseFn::Binary), P::Term),
    PLUS => rule(None, Some(ParseFn::Binary), P::Term),
    SLASH | STAR => rule(None, Some(ParseFn::Binary), P::Factor),
    BANG => rule(Some(ParseFn::Unary), None, P::None),
    BANG_EQUAL | EQUAL_EQUAL => rule(None, Some(ParseFn::Binary), P::Equality),
    LESS | LESS_EQUAL | GREATER | GREATER_EQUAL => {
      rule(None, Some(ParseFn::Binary), P::Comparison)
    }
    IDENTIFIER => rule(Some(ParseFn::Variable), None, P::None),
    INTEGER_LITERAL | FLOAT_LITERAL | CHAR_LITERAL | STRING_LITERAL | NIL | TRUE | FALSE => {
      rule(Some(ParseFn::Literal), None, P::None)
    }
    STRING_INTERP => rule(Some(ParseFn::Interpolation), None, P::None),
    AND => rule(None, Some(ParseFn::And), P::And),
    OR => rule(None, Some(ParseFn::Or), P::Or),
    IF => rule(Some(ParseFn::If), None, P::None),
    LOOP => rule(Some(ParseFn::Loop), None, P::None),
    FN => rule(Some(ParseFn::Fn), None, P::None),
    _ => rule(None, None, P::None),
  }
}
