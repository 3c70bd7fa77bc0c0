/// A token that represents a single unit of tx code.
#[derive(Debug, Clone)]
pub struct Token<'src> {
  /// The token's type.
  pub kind: TokenKind,
  /// The token's lexeme. For `ERROR` tokens this holds the
  /// error message instead of a source span.
  pub lexeme: &'src str,
  /// The token's line number.
  pub line: usize,
  /// The literal value decoded by the scanner, if any.
  pub literal: Option<Literal>,
}

impl<'src> Token<'src> {
  /// A placeholder token used to prime the compiler before the
  /// first call to `advance`.
  pub fn empty() -> Token<'src> {
    Token {
      kind: TokenKind::EOF,
      lexeme: "",
      line: 0,
      literal: None,
    }
  }
}

/// A literal value attached to a token by the scanner. String
/// payloads arrive fully decoded (escapes resolved) but not yet
/// interned; interning happens in the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
  Int(i64),
  Float(f64),
  Char(char),
  Str(String),
}

/// The types of tokens in a tx program.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
  // Single-character tokens
  LEFT_PAREN,    // (
  RIGHT_PAREN,   // )
  LEFT_BRACE,    // {
  RIGHT_BRACE,   // }
  LEFT_BRACKET,  // [
  RIGHT_BRACKET, // ]
  COLON,         // :
  COMMA,         // ,
  DOT,           // .
  MINUS,         // -
  PIPE,          // |
  PLUS,          // +
  SEMICOLON,     // ;
  SLASH,         // /
  STAR,          // *

  // One or two character tokens
  BANG,          // !
  BANG_EQUAL,    // !=
  EQUAL,         // =
  EQUAL_EQUAL,   // ==
  LESS,          // <
  LESS_EQUAL,    // <=
  GREATER,       // >
  GREATER_EQUAL, // >=

  // Literals
  IDENTIFIER,
  INTEGER_LITERAL,
  FLOAT_LITERAL,
  CHAR_LITERAL,
  STRING_LITERAL,
  /// The decoded prefix of an interpolated string, emitted just
  /// before the tokens of the embedded expression.
  STRING_INTERP,

  // Keywords
  AND,
  AS,
  ASYNC,
  AWAIT,
  BREAK,
  CONTINUE,
  ELSE,
  FALSE,
  FOR,
  FN,
  IF,
  IMPORT,
  IN,
  INOUT,
  IS,
  LET,
  LOOP,
  NIL,
  MATCH,
  OR,
  OUT,
  RETURN,
  SELF,
  STRUCT,
  SUPER,
  TRUE,
  VAR,
  WHILE,

  // Built-in type names. Scanned so that the reserved words
  // cannot be used as identifiers; no parse rules in the core.
  ANY_TYPE,
  BOOL_TYPE,
  CHAR_TYPE,
  FLOAT_TYPE,
  INT_TYPE,
  NIL_TYPE,
  STR_TYPE,

  ERROR,
  EOF,
}
