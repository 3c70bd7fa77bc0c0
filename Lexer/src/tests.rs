use tx_core::tokens::{Literal, TokenKind, TokenKind::*};

use crate::Scanner;

fn kinds(source: &str) -> Vec<TokenKind> {
  let mut scanner = Scanner::new(source);
  let mut found = vec![];
  loop {
    let token = scanner.scan_token();
    let kind = token.kind;
    found.push(kind);
    if kind == EOF {
      return found;
    }
  }
}

fn single(source: &str) -> (TokenKind, Option<Literal>, String) {
  let mut scanner = Scanner::new(source);
  let token = scanner.scan_token();
  (token.kind, token.literal, token.lexeme.to_string())
}

#[test]
fn scans_punctuation_and_operators() {
  assert_eq!(
    kinds("( ) { } [ ] : , . - | + ; / * ! != = == < <= > >="),
    vec![
      LEFT_PAREN,
      RIGHT_PAREN,
      LEFT_BRACE,
      RIGHT_BRACE,
      LEFT_BRACKET,
      RIGHT_BRACKET,
      COLON,
      COMMA,
      DOT,
      MINUS,
      PIPE,
      PLUS,
      SEMICOLON,
      SLASH,
      STAR,
      BANG,
      BANG_EQUAL,
      EQUAL,
      EQUAL_EQUAL,
      LESS,
      LESS_EQUAL,
      GREATER,
      GREATER_EQUAL,
      EOF,
    ]
  );
}

#[test]
fn keyword_trie_separates_keywords_from_identifiers() {
  assert_eq!(
    kinds("and as async await break continue else false for fn if import"),
    vec![AND, AS, ASYNC, AWAIT, BREAK, CONTINUE, ELSE, FALSE, FOR, FN, IF, IMPORT, EOF]
  );
  assert_eq!(
    kinds("in inout is let loop nil match or out return self struct super true var while"),
    vec![
      IN, INOUT, IS, LET, LOOP, NIL, MATCH, OR, OUT, RETURN, SELF, STRUCT, SUPER, TRUE, VAR,
      WHILE, EOF
    ]
  );
  assert_eq!(
    kinds("Any Bool Char Float Int Nil Str"),
    vec![ANY_TYPE, BOOL_TYPE, CHAR_TYPE, FLOAT_TYPE, INT_TYPE, NIL_TYPE, STR_TYPE, EOF]
  );
  // Prefixes and extensions of keywords stay identifiers.
  assert_eq!(
    kinds("fnord lets inn ino input whiles Anything _if"),
    vec![
      IDENTIFIER, IDENTIFIER, IDENTIFIER, IDENTIFIER, IDENTIFIER, IDENTIFIER, IDENTIFIER,
      IDENTIFIER, EOF
    ]
  );
}

#[test]
fn scans_integer_literals() {
  assert_eq!(single("42"), (INTEGER_LITERAL, Some(Literal::Int(42)), "42".into()));
  assert_eq!(
    single("1_000_000"),
    (INTEGER_LITERAL, Some(Literal::Int(1_000_000)), "1_000_000".into())
  );
  assert_eq!(
    single("0xff_ff"),
    (INTEGER_LITERAL, Some(Literal::Int(0xffff)), "0xff_ff".into())
  );
}

#[test]
fn promotes_to_float_on_dot_or_exponent() {
  assert_eq!(single("3.25").0, FLOAT_LITERAL);
  assert_eq!(single("3.25").1, Some(Literal::Float(3.25)));
  assert_eq!(single("1e3").1, Some(Literal::Float(1000.0)));
  assert_eq!(single("2E-2").1, Some(Literal::Float(0.02)));
  assert_eq!(single("1_0.5").1, Some(Literal::Float(10.5)));
  // A dot not followed by a digit is not part of the number.
  let mut scanner = Scanner::new("1.x");
  assert_eq!(scanner.scan_token().kind, INTEGER_LITERAL);
  assert_eq!(scanner.scan_token().kind, DOT);
  assert_eq!(scanner.scan_token().kind, IDENTIFIER);
}

#[test]
fn rejects_bad_numeric_literals() {
  let (kind, _, message) = single("99999999999999999999999");
  assert_eq!(kind, ERROR);
  assert_eq!(message, "Numeric literal out of range.");

  let (kind, _, message) = single("1e");
  assert_eq!(kind, ERROR);
  assert_eq!(message, "Unterminated scientific notation.");

  let long = "1".repeat(300);
  assert_eq!(single(&long).0, ERROR);
}

#[test]
fn decodes_string_escapes() {
  let (kind, literal, _) = single(r#""a\n\t\"\\\$b""#);
  assert_eq!(kind, STRING_LITERAL);
  assert_eq!(literal, Some(Literal::Str("a\n\t\"\\$b".into())));

  let (_, literal, _) = single(r#""\x41B\U00000043""#);
  assert_eq!(literal, Some(Literal::Str("ABC".into())));
}

#[test]
fn rejects_bad_strings() {
  assert_eq!(single(r#""\q""#).2, "Invalid escape character.");
  assert_eq!(single(r#""\xZZ""#).2, "Invalid byte escape sequence.");
  assert_eq!(single("\"abc").2, "Unterminated string.");
  assert_eq!(single(r#""a$b""#).2, "Expect '{' after '$'.");
}

#[test]
fn raw_strings_skip_escapes_and_strip_newlines() {
  let (kind, literal, _) = single("\"\"\"\nkeep \\n raw\n\"\"\"");
  assert_eq!(kind, STRING_LITERAL);
  assert_eq!(literal, Some(Literal::Str("keep \\n raw".into())));

  let (_, literal, _) = single("\"\"\"inline\"\"\"");
  assert_eq!(literal, Some(Literal::Str("inline".into())));
}

#[test]
fn interpolation_splits_the_token_stream() {
  let mut scanner = Scanner::new(r#""a${1 + 2}b""#);

  let prefix = scanner.scan_token();
  assert_eq!(prefix.kind, STRING_INTERP);
  assert_eq!(prefix.literal, Some(Literal::Str("a".into())));

  assert_eq!(scanner.scan_token().kind, INTEGER_LITERAL);
  assert_eq!(scanner.scan_token().kind, PLUS);
  assert_eq!(scanner.scan_token().kind, INTEGER_LITERAL);

  let tail = scanner.scan_token();
  assert_eq!(tail.kind, STRING_LITERAL);
  assert_eq!(tail.literal, Some(Literal::Str("b".into())));
  assert_eq!(scanner.scan_token().kind, EOF);
}

#[test]
fn interpolation_tracks_inner_braces() {
  // The block expression's braces must not end the interpolation.
  let mut scanner = Scanner::new(r#""v=${ { 1 } }!""#);

  assert_eq!(scanner.scan_token().kind, STRING_INTERP);
  assert_eq!(scanner.scan_token().kind, LEFT_BRACE);
  assert_eq!(scanner.scan_token().kind, INTEGER_LITERAL);
  assert_eq!(scanner.scan_token().kind, RIGHT_BRACE);

  let tail = scanner.scan_token();
  assert_eq!(tail.kind, STRING_LITERAL);
  assert_eq!(tail.literal, Some(Literal::Str("!".into())));
}

#[test]
fn interpolation_depth_is_capped() {
  let source = r#""${"${"${"${"${1}"}"}"}"}""#;
  let mut scanner = Scanner::new(source);
  let mut saw_depth_error = false;
  for _ in 0..32 {
    let token = scanner.scan_token();
    if token.kind == ERROR && token.lexeme == "Nested string interpolation too deep." {
      saw_depth_error = true;
      break;
    }
    if token.kind == EOF {
      break;
    }
  }
  assert!(saw_depth_error);
}

#[test]
fn scans_char_literals() {
  assert_eq!(single("'x'"), (CHAR_LITERAL, Some(Literal::Char('x')), "'x'".into()));
  assert_eq!(single(r"'\n'").1, Some(Literal::Char('\n')));
  assert_eq!(single(r"'\0'").1, Some(Literal::Char('\0')));
  assert_eq!(single("'é'").1, Some(Literal::Char('é')));
  assert_eq!(single("''").2, "Empty character literal.");
  assert_eq!(single("'ab'").2, "Unterminated character literal.");
}

#[test]
fn counts_lines_and_skips_comments() {
  let mut scanner = Scanner::new("1\n# a comment\n2");
  assert_eq!(scanner.scan_token().line, 1);
  let second = scanner.scan_token();
  assert_eq!(second.kind, INTEGER_LITERAL);
  assert_eq!(second.line, 3);
  assert_eq!(scanner.scan_token().kind, EOF);
}
